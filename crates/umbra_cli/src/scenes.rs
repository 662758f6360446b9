//! Built-in demo scenes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use umbra_math::Vec3;
use umbra_renderer::{CameraConfig, Color, Material, Scene, SceneError};

use crate::cli::SceneName;

/// Build a named scene together with the camera that frames it.
pub fn build(name: SceneName, seed: u64) -> Result<(Scene, CameraConfig), SceneError> {
    match name {
        SceneName::Cover => cover(seed),
        SceneName::HollowGlass => hollow_glass(),
    }
}

/// Ground, matte, metal, and a glass sphere with a negative-radius inner wall.
fn hollow_glass() -> Result<(Scene, CameraConfig), SceneError> {
    let mut world = Scene::new();

    world.add_sphere(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        Material::lambertian(Color::new(0.8, 0.8, 0.0))?,
    )?;
    world.add_sphere(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Material::lambertian(Color::new(0.1, 0.2, 0.5))?,
    )?;

    let glass = Material::dielectric(1.5)?;
    world.add_sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass)?;
    world.add_sphere(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass)?;

    world.add_sphere(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Material::metal(Color::new(0.8, 0.6, 0.2), 0.0)?,
    )?;

    let eye = Vec3::new(3.0, 3.0, 2.0);
    let look_at = Vec3::new(0.0, 0.0, -1.0);
    let camera = CameraConfig::default()
        .with_position(eye, look_at, Vec3::Y)
        .with_lens(20.0, 2.0, (eye - look_at).length());

    Ok((world, camera))
}

/// Random field of small spheres around three large ones.
///
/// Placement is drawn from its own seeded generator so the scene is the
/// same on every run with the same seed.
fn cover(seed: u64) -> Result<(Scene, CameraConfig), SceneError> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut world = Scene::new();

    world.add_sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(Color::new(0.5, 0.5, 0.5))?,
    )?;

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(&mut rng) * random_color(&mut rng);
                Material::lambertian(albedo)?
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::splat(0.5) + 0.5 * random_color(&mut rng);
                Material::metal(albedo, 0.5 * rng.gen::<f32>())?
            } else {
                // Glass
                Material::dielectric(1.5)?
            };
            world.add_sphere(center, 0.2, material)?;
        }
    }

    world.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Material::dielectric(1.5)?)?;
    world.add_sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::lambertian(Color::new(0.4, 0.2, 0.1))?,
    )?;
    world.add_sphere(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)?,
    )?;

    let camera = CameraConfig::default()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0);

    Ok((world, camera))
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hollow_glass_scene() {
        let (world, camera) = build(SceneName::HollowGlass, 0).unwrap();
        assert_eq!(world.len(), 5);
        assert!(camera.build().is_ok());
    }

    #[test]
    fn test_cover_scene_is_seeded() {
        let (a, _) = build(SceneName::Cover, 42).unwrap();
        let (b, _) = build(SceneName::Cover, 42).unwrap();

        assert_eq!(a.len(), b.len());
        // Ground, three big spheres, and most of the 22x22 grid
        assert!(a.len() > 400);
    }

    #[test]
    fn test_cover_camera_is_valid() {
        let (_, camera) = build(SceneName::Cover, 1).unwrap();
        assert!(camera.with_resolution(1200, 800).build().is_ok());
    }
}
