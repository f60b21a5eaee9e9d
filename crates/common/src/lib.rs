//! Shared types used by the animation, render and app crates.

mod color;
mod types;

pub use color::{Color, ColorParseError};
pub use types::Transform;
