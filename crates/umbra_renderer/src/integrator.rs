//! Light transport.
//!
//! `trace` follows a single path through the scene. Each bounce multiplies a
//! running attenuation product, and the path ends when it escapes to the
//! background, gets absorbed, or runs out of bounces. It is a loop, so stack
//! usage does not grow with the bounce budget.

use crate::{Color, Hittable, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use umbra_math::Interval;

/// Minimum hit distance for secondary rays, suppresses shadow acne.
pub const T_MIN: f32 = 0.001;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Vertical white-to-blue gradient
    #[default]
    Sky,
    /// A single uniform color
    Solid(Color),
}

impl Background {
    /// Radiance arriving along a ray that hit nothing.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Compute the color seen by a ray with at most `depth` bounces.
///
/// A budget of zero returns black.
pub fn trace(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut current = *ray;
    let mut attenuation = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&current, Interval::new(T_MIN, f32::INFINITY)) else {
            return attenuation * background.color(&current);
        };

        match rec.material.scatter(&current, &rec, rng) {
            Some(result) => {
                attenuation *= result.attenuation;
                current = result.scattered;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    // Bounce budget exhausted
    Color::ZERO
}
