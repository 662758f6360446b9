//! Vector helpers used by the scattering model.

use crate::Vec3;

/// Threshold below which every component counts as zero.
const NEAR_ZERO: f32 = 1e-8;

/// True if the vector is close to zero in all dimensions.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO && v.y.abs() < NEAR_ZERO && v.z.abs() < NEAR_ZERO
}

/// Reflect a vector about a normal.
///
/// `n` must be unit length. The result has the same length as `v`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices on the incident and
/// transmitted sides. Callers are expected to have ruled out total internal
/// reflection already.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    (r_out_perp + r_out_parallel).normalize_or_zero()
}
