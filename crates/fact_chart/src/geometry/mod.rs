//! Geometric building blocks shared by shapes, scenes and the renderer.
pub mod align;
pub mod color;
pub mod transform;

pub use align::{is_valid_rotation, rotation_between};
pub use color::Color;
pub use transform::{euler_xyz, Transform};
