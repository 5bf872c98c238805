mod aabb;
mod color;

pub use aabb::{AABB, BOX_EDGES};
pub use color::{hex_to_rgb, rgb_to_rgba8};
