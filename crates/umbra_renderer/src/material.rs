//! Surface scattering model.
//!
//! The set of materials is closed: [`Material`] is an enum over the three
//! supported surface types and dispatches `scatter` with a `match`. Each
//! variant wraps a small struct whose constructor validates its parameters,
//! so a `Material` that exists is always physically meaningful.

use crate::{error::SceneError, error::SceneResult, HitRecord, Ray};
use rand::RngCore;
use umbra_math::sampling::{gen_f32, random_unit_vector};
use umbra_math::{near_zero, reflect, refract, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter event that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel energy kept by the bounce
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Diffuse material with the given albedo.
    pub fn lambertian(albedo: Color) -> SceneResult<Self> {
        Lambertian::new(albedo).map(Material::Lambertian)
    }

    /// Reflective material. `fuzz` above 1 is clamped to 1.
    pub fn metal(albedo: Color, fuzz: f32) -> SceneResult<Self> {
        Metal::new(albedo, fuzz).map(Material::Metal)
    }

    /// Refractive material such as glass or water.
    pub fn dielectric(refraction_index: f32) -> SceneResult<Self> {
        Dielectric::new(refraction_index).map(Material::Dielectric)
    }

    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or `None` if the ray is
    /// absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => Some(m.scatter(rec, rng)),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => Some(m.scatter(ray_in, rec, rng)),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

fn validate_albedo(albedo: Color) -> SceneResult<Color> {
    if albedo.is_finite() && albedo.min_element() >= 0.0 {
        Ok(albedo)
    } else {
        Err(SceneError::InvalidAlbedo(albedo.x, albedo.y, albedo.z))
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> SceneResult<Self> {
        Ok(Self {
            albedo: validate_albedo(albedo)?,
        })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(&self, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.point, scatter_direction),
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> SceneResult<Self> {
        if fuzz.is_nan() || fuzz < 0.0 {
            return Err(SceneError::InvalidFuzz(fuzz));
        }
        Ok(Self {
            albedo: validate_albedo(albedo)?,
            fuzz: fuzz.min(1.0),
        })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz pushed the reflection below the surface
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.point, scattered_dir),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    refraction_index: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f32) -> SceneResult<Self> {
        if !refraction_index.is_finite() || refraction_index <= 0.0 {
            return Err(SceneError::InvalidRefractionIndex(refraction_index));
        }
        Ok(Self { refraction_index })
    }

    pub fn refraction_index(&self) -> f32 {
        self.refraction_index
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || gen_f32(rng) < reflectance(cos_theta, refraction_ratio) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.point, direction),
        }
    }
}

/// Schlick's approximation for reflectance, clamped to [0, 1].
pub fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    (r0 + (1.0 - r0) * (1.0 - cosine).powi(5)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            point: Vec3::ZERO,
            normal,
            t: 1.0,
            front_face,
            material,
        }
    }

    #[test]
    fn test_constructor_validation() {
        assert!(Material::lambertian(Color::new(0.5, 0.5, 0.5)).is_ok());
        assert_eq!(
            Material::lambertian(Color::new(-0.1, 0.5, 0.5)),
            Err(SceneError::InvalidAlbedo(-0.1, 0.5, 0.5))
        );
        assert!(Material::lambertian(Color::new(f32::NAN, 0.0, 0.0)).is_err());

        assert_eq!(Material::metal(Color::ONE, -0.5), Err(SceneError::InvalidFuzz(-0.5)));
        assert!(Material::metal(Color::ONE, f32::NAN).is_err());

        assert_eq!(
            Material::dielectric(0.0),
            Err(SceneError::InvalidRefractionIndex(0.0))
        );
        assert!(Material::dielectric(-1.5).is_err());
        assert!(Material::dielectric(f32::INFINITY).is_err());
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let metal = Metal::new(Color::ONE, 3.0).unwrap();
        assert_eq!(metal.fuzz(), 1.0);

        let metal = Metal::new(Color::ONE, 0.25).unwrap();
        assert_eq!(metal.fuzz(), 0.25);
    }

    #[test]
    fn test_lambertian_always_scatters_above_surface() {
        let material = Material::lambertian(Color::new(0.8, 0.3, 0.3)).unwrap();
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..500 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), rec.point);
            // normal + unit vector never points below the tangent plane
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert!(!near_zero(result.scattered.direction()));
        }
    }

    /// Replays a fixed sequence of `next_u32` values.
    struct SequenceRng {
        values: Vec<u32>,
        next: usize,
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let bytes = self.next_u32().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_lambertian_degenerate_direction_uses_normal() {
        let material = Material::lambertian(Color::splat(0.5)).unwrap();
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        // 0.5, 0.25, 0.5 map to (0, -0.5, 0), so the unit vector is exactly -normal
        let mut rng = SequenceRng {
            values: vec![0x8000_0000, 0x4000_0000, 0x8000_0000],
            next: 0,
        };

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.scattered.direction(), Vec3::Y);
        assert_eq!(result.scattered.origin(), rec.point);
    }

    #[test]
    fn test_perfect_mirror_reflects() {
        let material = Material::metal(Color::new(0.9, 0.9, 0.9), 0.0).unwrap();
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(2.0, -2.0, 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(result.attenuation, Color::new(0.9, 0.9, 0.9));
    }

    #[test]
    fn test_fuzzy_metal_absorbs_grazing_rays() {
        let material = Material::metal(Color::ONE, 1.0).unwrap();
        let rec = record(&material, Vec3::Y, true);
        // Nearly parallel to the surface, the fuzz ball dips below it often
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        let absorbed = (0..1000)
            .filter(|_| material.scatter(&ray, &rec, &mut rng).is_none())
            .count();
        assert!(absorbed > 100, "absorbed = {absorbed}");

        for _ in 0..200 {
            if let Some(result) = material.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_dielectric_attenuation_is_white() {
        let material = Material::dielectric(1.5).unwrap();
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!((result.scattered.direction().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5).unwrap();
        // Inside the glass: ratio = 1.5, sin(theta) = 0.8 -> 1.2 > 1
        let rec = record(&material, Vec3::Y, false);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.8, -0.6, 0.0));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = Vec3::new(0.8, 0.6, 0.0);
            assert!((result.scattered.direction() - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let material = Material::dielectric(1.5).unwrap();
        let rec = record(&material, Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(6);

        // Normal incidence reflectance is r0 = 0.04
        let refracted = (0..1000)
            .filter(|_| {
                let result = material.scatter(&ray, &rec, &mut rng).unwrap();
                result.scattered.direction().y < 0.0
            })
            .count();
        assert!(refracted > 900, "refracted = {refracted}");
    }

    #[test]
    fn test_reflectance_near_grazing() {
        let ratio = 1.0_f32 / 1.5;
        let cosine = 1e-4_f32;
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        let expected = r0 + (1.0 - r0) * (1.0 - cosine).powi(5);

        let r = reflectance(cosine, ratio);
        assert!((r - expected).abs() < 1e-3);
        assert!((r - 1.0).abs() < 1e-3);

        // Glass entered from the inside approaches total reflection as well
        assert!((reflectance(1e-4, 1.5) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_reflectance_normal_incidence() {
        let r = reflectance(1.0, 1.0 / 1.5);
        assert!((r - 0.04).abs() < 1e-4);
        assert_eq!(reflectance(1.0, 1.0), 0.0);
    }
}
