//! Shared types used throughout the library.

mod axis;
mod transform;

pub use axis::Axis;
pub use transform::{CoordinateConversion, WorldTransform};

/// RGBA color with float channels, nominally in `[0, 1]`.
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

/// Normal used when the source mesh has none for a corner.
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];
