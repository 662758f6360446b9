//! Simple path tracer example.
//!
//! Renders a small scene with one of each material and saves it as PPM.

use std::fs::File;
use std::io::{BufWriter, Write};

use umbra_renderer::{
    color_to_rgb, render, CameraConfig, Color, ImageBuffer, Material, RenderSettings, Scene,
    SceneError, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Umbra Path Tracer - Simple Example");
    println!("==================================");

    let world = build_scene()?;
    println!("Created {} objects", world.len());

    let settings = RenderSettings {
        image_width: 400,
        image_height: 225,
        samples_per_pixel: 50,
        max_bounce_depth: 10,
        ..RenderSettings::default()
    };

    let camera = CameraConfig::default()
        .with_position(
            Vec3::new(-2.0, 2.0, 1.0), // eye
            Vec3::new(0.0, 0.0, -1.0), // look_at
            Vec3::new(0.0, 1.0, 0.0),  // up
        )
        .with_lens(20.0, 0.1, 3.4)
        .with_resolution(settings.image_width, settings.image_height)
        .build()?;

    println!(
        "Rendering {}x{} @ {} spp...",
        settings.image_width, settings.image_height, settings.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&camera, &world, &settings)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene, SceneError> {
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

    // Hollow glass bubble
    let glass = Material::dielectric(1.5)?;
    world.add_sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass)?;
    world.add_sphere(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass)?;

    world.add_sphere(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Material::metal(Color::new(0.8, 0.6, 0.2), 0.0)?,
    )?;

    Ok(world)
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgb = color_to_rgb(image.get(x, y));
            writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }
    }

    Ok(())
}
