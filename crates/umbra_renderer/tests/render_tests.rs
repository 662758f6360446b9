use umbra_renderer::{
    render, render_with_cancel, Background, CameraConfig, CancelToken, Color, Material,
    RenderError, RenderSettings, Scene, Vec3,
};

fn settings(width: u32, height: u32) -> RenderSettings {
    RenderSettings {
        image_width: width,
        image_height: height,
        samples_per_pixel: 4,
        max_bounce_depth: 8,
        seed: 1,
        threads: 2,
        bucket_size: 8,
        background: Background::Sky,
    }
}

fn camera_for(settings: &RenderSettings) -> umbra_renderer::Camera {
    CameraConfig::default()
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_resolution(settings.image_width, settings.image_height)
        .build()
        .unwrap()
}

fn three_spheres() -> Scene {
    let mut scene = Scene::new();
    scene
        .add_sphere(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::lambertian(Color::new(0.8, 0.8, 0.0)).unwrap(),
        )
        .unwrap();
    scene
        .add_sphere(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::lambertian(Color::new(0.1, 0.2, 0.5)).unwrap(),
        )
        .unwrap();
    scene
        .add_sphere(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Material::metal(Color::new(0.8, 0.6, 0.2), 0.3).unwrap(),
        )
        .unwrap();
    // Hollow glass shell
    let glass = Material::dielectric(1.5).unwrap();
    scene.add_sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass).unwrap();
    scene.add_sphere(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass).unwrap();
    scene
}

#[test]
fn render_outputs_requested_size() {
    let settings = settings(24, 16);
    let image = render(&camera_for(&settings), &three_spheres(), &settings).unwrap();

    assert_eq!(image.width, 24);
    assert_eq!(image.height, 16);
    assert_eq!(image.pixels.len(), 24 * 16);
    assert_eq!(image.to_rgb8().len(), 24 * 16 * 3);
    for pixel in &image.pixels {
        assert!(pixel.min_element() >= 0.0 && pixel.max_element() <= 1.0);
    }
}

#[test]
fn same_seed_is_bit_identical_across_thread_counts() {
    let scene = three_spheres();
    let base = settings(20, 12);
    let camera = camera_for(&base);

    let single = RenderSettings {
        threads: 1,
        ..base.clone()
    };
    let many = RenderSettings {
        threads: 4,
        ..base.clone()
    };

    let a = render(&camera, &scene, &single).unwrap();
    let b = render(&camera, &scene, &many).unwrap();
    let c = render(&camera, &scene, &many).unwrap();

    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn different_seeds_differ() {
    let scene = three_spheres();
    let first = settings(20, 12);
    let second = RenderSettings {
        seed: 2,
        ..first.clone()
    };
    let camera = camera_for(&first);

    let a = render(&camera, &scene, &first).unwrap();
    let b = render(&camera, &scene, &second).unwrap();

    assert_ne!(a, b);
}

#[test]
fn lambertian_sphere_is_darker_than_uniform_background() {
    let background = Color::splat(0.8);
    let mut scene = Scene::new();
    scene
        .add_sphere(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::lambertian(Color::splat(0.5)).unwrap(),
        )
        .unwrap();

    let settings = RenderSettings {
        background: Background::Solid(background),
        ..settings(32, 18)
    };
    let image = render(&camera_for(&settings), &scene, &settings).unwrap();

    let background_brightness = background.x.sqrt();
    assert!(image.mean_luminance() < background_brightness);

    // Nothing is brighter than the background itself
    for pixel in &image.pixels {
        assert!(pixel.max_element() <= background_brightness + 1e-6);
    }
}

#[test]
fn zero_bounce_budget_renders_black() {
    let settings = RenderSettings {
        max_bounce_depth: 0,
        ..settings(16, 9)
    };
    let image = render(&camera_for(&settings), &three_spheres(), &settings).unwrap();

    assert!(image.pixels.iter().all(|pixel| *pixel == Color::ZERO));
}

#[test]
fn empty_scene_shows_sky() {
    let settings = settings(8, 8);
    let image = render(&camera_for(&settings), &Scene::new(), &settings).unwrap();

    // Top rows look further up, so they are bluer (less red)
    assert!(image.get(4, 0).x < image.get(4, 7).x);
}

#[test]
fn single_pixel_image() {
    let settings = settings(1, 1);
    let image = render(&camera_for(&settings), &three_spheres(), &settings).unwrap();

    assert_eq!(image.pixels.len(), 1);
}

#[test]
fn cancelled_render_returns_error() {
    let settings = settings(16, 16);
    let token = CancelToken::new();
    token.cancel();

    let result = render_with_cancel(&camera_for(&settings), &three_spheres(), &settings, &token);
    match result {
        Err(RenderError::Cancelled { completed, total }) => {
            assert_eq!(completed, 0);
            assert_eq!(total, 4);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn invalid_settings_are_rejected_before_rendering() {
    let settings = RenderSettings {
        samples_per_pixel: 0,
        ..settings(8, 8)
    };
    let result = render(&camera_for(&settings), &three_spheres(), &settings);

    assert!(matches!(result, Err(RenderError::InvalidSettings(_))));
}
