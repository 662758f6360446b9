//! Camera for ray generation.

use crate::error::{CameraError, CameraResult};
use crate::Ray;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use umbra_math::sampling::random_in_unit_disk;
use umbra_math::Vec3;

/// High-level camera description.
///
/// Missing fields fall back to [`CameraConfig::default`] when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position
    pub eye: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Approximate up direction, need not be orthogonal to the view
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov_degrees: f32,
    /// Image width divided by height
    pub aspect_ratio: f32,
    /// Lens diameter, 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from the eye to the plane of perfect focus
    pub focus_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vertical_fov_degrees: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 1.0,
        }
    }
}

impl CameraConfig {
    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.eye = eye;
        self.look_at = look_at;
        self.up = up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vertical_fov_degrees: f32, aperture: f32, focus_distance: f32) -> Self {
        self.vertical_fov_degrees = vertical_fov_degrees;
        self.aperture = aperture;
        self.focus_distance = focus_distance;
        self
    }

    /// Set aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Aspect ratio matching an image resolution.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.with_aspect_ratio(width as f32 / height.max(1) as f32)
    }

    /// Derive the camera.
    pub fn build(&self) -> CameraResult<Camera> {
        Camera::new(self)
    }
}

/// Camera for generating rays into the scene.
///
/// All fields are derived once from a [`CameraConfig`] and never change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
    focus_distance: f32,
}

impl Camera {
    /// Validate a configuration and derive the camera basis and image plane.
    pub fn new(config: &CameraConfig) -> CameraResult<Self> {
        let fov = config.vertical_fov_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(CameraError::InvalidFieldOfView(fov));
        }
        if !config.aspect_ratio.is_finite() || config.aspect_ratio <= 0.0 {
            return Err(CameraError::InvalidAspectRatio(config.aspect_ratio));
        }
        if !config.aperture.is_finite() || config.aperture < 0.0 {
            return Err(CameraError::InvalidAperture(config.aperture));
        }
        if !config.focus_distance.is_finite() || config.focus_distance <= 0.0 {
            return Err(CameraError::InvalidFocusDistance(config.focus_distance));
        }
        if !config.eye.is_finite() || !config.look_at.is_finite() || !config.up.is_finite() {
            return Err(CameraError::DegenerateView("camera vectors must be finite"));
        }

        let view = config.eye - config.look_at;
        if view.length_squared() == 0.0 {
            return Err(CameraError::DegenerateView("eye and look_at coincide"));
        }
        let w = view.normalize();
        let side = config.up.cross(w);
        if side.length_squared() < 1e-12 {
            return Err(CameraError::DegenerateView("up is parallel to the view direction"));
        }
        let u = side.normalize();
        let v = w.cross(u);

        // Viewport dimensions on the focus plane
        let h = (fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        let origin = config.eye;
        let horizontal = config.focus_distance * viewport_width * u;
        let vertical = config.focus_distance * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - config.focus_distance * w;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: config.aperture / 2.0,
            focus_distance: config.focus_distance,
        })
    }

    /// Generate a ray through image-plane coordinates (s, t).
    ///
    /// `s` runs left to right and `t` bottom to top, both over [0, 1]. The
    /// origin is jittered over the lens disk when the aperture is open.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Camera basis: right, up, and backwards (opposite the view direction).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }
}
