//! Parallel render scheduler.
//!
//! The image is split into buckets that rayon workers render independently.
//! Every bucket returns its own pixel vector and the results are stitched
//! into the output buffer once all workers are done, so no two workers ever
//! write to shared memory.

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::integrator::Background;
use crate::{Camera, Color, Hittable};
use umbra_math::Interval;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub image_width: u32,
    /// Output height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_bounce_depth: u32,
    /// Base seed, combined with each bucket index
    pub seed: u64,
    /// Worker threads, 0 uses the global rayon pool
    pub threads: usize,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Color returned for rays that escape the scene
    pub background: Background,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_bounce_depth: 50,
            seed: 0,
            threads: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            background: Background::Sky,
        }
    }
}

impl RenderSettings {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if u64::from(self.image_width) * u64::from(self.image_height) > u64::from(u32::MAX) {
            return Err(RenderError::InvalidSettings(format!(
                "image size {}x{} exceeds {} pixels",
                self.image_width,
                self.image_height,
                u32::MAX
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidSettings(
                "bucket_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared with the render workers.
///
/// Checked before each bucket starts. Buckets already in flight finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    Interval::new(0.0, 1.0).clamp(x)
}

/// Gamma-correct a linear color and clamp it for display.
#[inline]
pub fn gamma_correct(color: Color) -> Color {
    Color::new(
        clamp_01(linear_to_gamma(color.x)),
        clamp_01(linear_to_gamma(color.y)),
        clamp_01(linear_to_gamma(color.z)),
    )
}

/// Quantize a display color (already gamma corrected) to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        (255.0 * clamp_01(color.x)) as u8,
        (255.0 * clamp_01(color.y)) as u8,
        (255.0 * clamp_01(color.z)) as u8,
    ]
}

/// Image buffer holding gamma-corrected colors in [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Mean luminance, taking each pixel as the unweighted mean of its channels.
    pub fn mean_luminance(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.pixels.iter().map(|c| c.element_sum() / 3.0).sum();
        sum / self.pixels.len() as f32
    }

    /// Convert to packed 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Convert to an `image` crate buffer for encoding.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        })
    }
}

/// Number of workers a render with `threads` will use.
fn worker_count(threads: usize) -> usize {
    if threads == 0 {
        rayon::current_num_threads()
    } else {
        threads
    }
}

/// Render the entire scene.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
) -> RenderResult<ImageBuffer> {
    render_with_cancel(camera, world, settings, &CancelToken::new())
}

/// Render the entire scene, stopping early if `cancel` is triggered.
///
/// A cancelled render returns [`RenderError::Cancelled`] rather than a
/// partially filled image.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    cancel: &CancelToken,
) -> RenderResult<ImageBuffer> {
    settings.validate()?;

    let buckets = generate_buckets(
        settings.image_width,
        settings.image_height,
        settings.bucket_size,
    );
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} buckets, {} threads, seed {}",
        settings.image_width,
        settings.image_height,
        settings.samples_per_pixel,
        settings.max_bounce_depth,
        total,
        worker_count(settings.threads),
        settings.seed
    );

    let start = Instant::now();
    let completed = AtomicUsize::new(0);
    let progress_every = (total / 10).max(1);

    let render_all = || -> Vec<Option<BucketResult>> {
        buckets
            .par_iter()
            .map(|bucket| {
                if cancel.is_cancelled() {
                    return None;
                }
                let pixels = render_bucket(bucket, camera, world, settings);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log::trace!("Bucket {} finished ({}/{})", bucket.index, done, total);
                if done % progress_every == 0 {
                    log::debug!(
                        "Progress {:.0}% ({:.1}s elapsed)",
                        100.0 * done as f32 / total as f32,
                        start.elapsed().as_secs_f32()
                    );
                }

                Some(BucketResult::new(*bucket, pixels))
            })
            .collect()
    };

    let results = if settings.threads == 0 {
        render_all()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build()?
            .install(render_all)
    };

    let completed = completed.into_inner();
    if completed < total {
        log::warn!("Render cancelled after {}/{} buckets", completed, total);
        return Err(RenderError::Cancelled { completed, total });
    }

    let mut image = ImageBuffer::new(settings.image_width, settings.image_height);
    for mut result in results.into_iter().flatten() {
        for color in &mut result.pixels {
            *color = gamma_correct(*color);
        }
        image.write_bucket(&result);
    }

    log::info!("Rendered in {:.2}s", start.elapsed().as_secs_f32());
    Ok(image)
}
