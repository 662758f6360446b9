//! Flat collection of primitives.

use crate::{
    error::SceneResult,
    hittable::{HitRecord, Hittable},
    Material, Ray, Sphere,
};
use umbra_math::{Interval, Vec3};

/// The objects to render.
///
/// Lookups scan every primitive in insertion order. Built once, then shared
/// read-only by all render workers.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Validate and add a sphere.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) -> SceneResult<()> {
        let sphere = Sphere::new(center, radius, material)?;
        self.add(Box::new(sphere));
        Ok(())
    }

    /// Remove all objects from the scene.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Hittable> {
        self.objects.iter().map(|object| object.as_ref())
    }
}

impl FromIterator<Sphere> for Scene {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        let mut scene = Scene::new();
        for sphere in iter {
            scene.add(Box::new(sphere));
        }
        scene
    }
}

impl Hittable for Scene {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
