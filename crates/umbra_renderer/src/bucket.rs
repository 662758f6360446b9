//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel. Each bucket draws its random numbers from a generator
//! seeded by the render seed and the bucket index, so the image does not
//! depend on which thread picked up which bucket.

use crate::integrator::trace;
use crate::{Camera, Color, Hittable, RenderSettings};
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use umbra_math::sampling::gen_f32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner (row 0 is the top of the image)
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Position of this bucket in row-major order, also its seed index
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's private generator.
    pub fn seed(&self, base_seed: u64) -> u64 {
        partition_seed(base_seed, self.index as u64)
    }

    /// Fresh generator for this bucket.
    pub fn rng(&self, base_seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed(base_seed))
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Mix a base seed and a partition index into a well-spread 64-bit seed.
///
/// SplitMix64 finalizer over the pair, so neighbouring partitions get
/// unrelated streams.
pub fn partition_seed(base_seed: u64, index: u64) -> u64 {
    let mut v = base_seed ^ index.wrapping_mul(0x9e3779b97f4a7c15);
    v = v.wrapping_add(0x9e3779b97f4a7c15);
    v = (v ^ (v >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    v = (v ^ (v >> 27)).wrapping_mul(0x94d049bb133111eb);
    v ^ (v >> 31)
}

/// Generate buckets covering an image in row-major order.
///
/// The layout depends only on the image size and bucket size. Edge buckets
/// are clipped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` jittered samples in linear
/// color, before gamma correction.
///
/// `y` counts rows from the top and should be below `image_height`. Rows past
/// the bottom edge are sampled as the bottom row.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let s_scale = 1.0 / settings.image_width.saturating_sub(1).max(1) as f32;
    let t_scale = 1.0 / settings.image_height.saturating_sub(1).max(1) as f32;
    // The camera's t axis runs bottom to top
    let row_from_bottom = settings.image_height.saturating_sub(1).saturating_sub(y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..settings.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) * s_scale;
        let t = (row_from_bottom + gen_f32(rng)) * t_scale;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += trace(
            &ray,
            world,
            settings.max_bounce_depth,
            &settings.background,
            rng,
        );
    }

    pixel_color / settings.samples_per_pixel as f32
}

/// Render a single bucket to a vector of colors.
///
/// Returns linear pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
) -> Vec<Color> {
    let mut rng = bucket.rng(settings.seed);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, world, global_x, global_y, settings, &mut rng);
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Linear pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
