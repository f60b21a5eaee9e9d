//! wgpu render backend for the ring demo.
//!
//! Draws every active ring as an instance of one shared torus mesh with an
//! unlit, alpha-blended material. The camera orbits a fixed target with
//! damped rotation and clamped zoom.
//!
//! # Invariants
//! - Renderer never mutates animation state.
//! - Camera motion is independent of the ring animation clock.

mod camera;
mod gpu;
mod shaders;
mod torus;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
pub use torus::{TorusGeometry, Vertex};
