//! Render job configuration: JSON file plus command line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use umbra_renderer::{CameraConfig, RenderSettings};

use crate::cli::Args;

/// Contents of a `--config` file. Both sections are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobFile {
    pub render: RenderSettings,
    /// Replaces the scene's own camera when present
    pub camera: Option<CameraConfig>,
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Apply command line overrides on top of the file settings.
    pub fn apply_args(mut self, args: &Args) -> Self {
        let render = &mut self.render;
        if let Some(width) = args.width {
            render.image_width = width;
        }
        if let Some(height) = args.height {
            render.image_height = height;
        }
        if let Some(samples) = args.samples {
            render.samples_per_pixel = samples;
        }
        if let Some(depth) = args.depth {
            render.max_bounce_depth = depth;
        }
        if let Some(seed) = args.seed {
            render.seed = seed;
        }
        if let Some(threads) = args.threads {
            render.threads = threads;
        }
        self
    }
}
