//! Ring animation state: which rings are active and where each one is in its loop.
//!
//! Every frame the host hands the current monotonic time (milliseconds) to
//! [`AnimationContext::frame`]. Rings switch on once their staggered delay has
//! passed, then travel away from the camera on a fixed loop, fading out over
//! the tail of each cycle and shrinking as they go.
//!
//! # Invariants
//! - Activation is one-way: an active ring is never deactivated.
//! - Opacity stays in `[0, 1]` and scale stays positive.
//! - Ring state is a pure function of absolute time since activation; the
//!   per-frame delta is reported but never integrated.

pub mod config;
pub mod context;
pub mod motion;
pub mod ring;
pub mod scheduler;

pub use config::{AnimationConfig, ConfigError};
pub use context::{AnimationContext, FrameStats};
pub use motion::RingSample;
pub use ring::{Ring, RingInstance};

pub fn crate_info() -> &'static str {
    "ringflow-anim v0.1.0"
}
