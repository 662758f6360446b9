//! Umbra Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres with diffuse, metal and glass
//! materials. Rendering is split into buckets that run in parallel, each
//! with its own seeded generator, so a given seed always produces the same
//! image regardless of thread count.
//!
//! # Example
//!
//! ```no_run
//! use umbra_renderer::{render, CameraConfig, Color, Material, RenderSettings, Scene, Vec3};
//!
//! let mut scene = Scene::new();
//! scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::lambertian(Color::splat(0.5))?)?;
//!
//! let settings = RenderSettings::default();
//! let camera = CameraConfig::default()
//!     .with_resolution(settings.image_width, settings.image_height)
//!     .build()?;
//! let image = render(&camera, &scene, &settings)?;
//! println!("mean luminance {}", image.mean_luminance());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bucket;
mod camera;
pub mod error;
mod hittable;
mod integrator;
mod material;
mod renderer;
mod scene;
mod sphere;

pub use bucket::{
    generate_buckets, partition_seed, render_bucket, render_pixel, Bucket, BucketResult,
    DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, CameraConfig};
pub use error::{CameraError, RenderError, SceneError};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{trace, Background, T_MIN};
pub use material::{reflectance, Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, gamma_correct, linear_to_gamma, render, render_with_cancel, CancelToken,
    ImageBuffer, RenderSettings,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from umbra_math
pub use umbra_math::{Interval, Ray, Vec3};
