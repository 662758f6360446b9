//! Sphere primitive for ray tracing.

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use umbra_math::{Interval, Vec3};

/// A sphere primitive.
///
/// A negative radius is allowed and flips the outward normal. Nesting a
/// negative-radius sphere inside a slightly larger positive one with the
/// same dielectric material models a hollow glass shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> SceneResult<Self> {
        if !center.is_finite() {
            return Err(SceneError::InvalidCenter);
        }
        if !radius.is_finite() || radius == 0.0 {
            return Err(SceneError::InvalidRadius(radius));
        }

        Ok(Self {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Outward normal at a point on the surface.
    ///
    /// Dividing by the signed radius is what turns a negative-radius sphere
    /// inside out.
    #[inline]
    pub fn outward_normal(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        Some(HitRecord::with_face_normal(
            ray,
            root,
            self.outward_normal(ray.point_at(root)),
            &self.material,
        ))
    }
}
