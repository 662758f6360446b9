// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod interval;
mod ray;
pub mod sampling;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{near_zero, reflect, refract};
