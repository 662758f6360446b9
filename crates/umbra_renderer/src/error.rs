//! Error types for scene, camera and render setup.
//!
//! All of these are raised before rendering starts. The render loop itself
//! has no failure modes apart from cancellation.

use thiserror::Error;

/// Errors raised while building primitives and materials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Albedo must be finite and non-negative, got [{0}, {1}, {2}]")]
    InvalidAlbedo(f32, f32, f32),

    #[error("Metal fuzz must be a non-negative number, got {0}")]
    InvalidFuzz(f32),

    #[error("Refraction index must be finite and greater than zero, got {0}")]
    InvalidRefractionIndex(f32),

    #[error("Sphere radius must be finite and non-zero, got {0}")]
    InvalidRadius(f32),

    #[error("Sphere center must be finite")]
    InvalidCenter,
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while deriving a camera from its configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("Aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    #[error("Aperture must be finite and non-negative, got {0}")]
    InvalidAperture(f32),

    #[error("Focus distance must be finite and positive, got {0}")]
    InvalidFocusDistance(f32),

    #[error("Degenerate view: {0}")]
    DegenerateView(&'static str),
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Errors returned by the render scheduler.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Render cancelled after {completed} of {total} buckets")]
    Cancelled { completed: usize, total: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
