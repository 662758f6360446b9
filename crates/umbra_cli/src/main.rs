use anyhow::{Context, Result};
use clap::Parser;
use umbra_renderer::{render_with_cancel, CancelToken};

mod cli;
mod config;
mod scenes;

use cli::Args;
use config::JobFile;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Umbra");

    let job = match &args.config {
        Some(path) => JobFile::load(path)?,
        None => JobFile::default(),
    }
    .apply_args(&args);
    let settings = job.render;

    let (world, scene_camera) = scenes::build(args.scene, settings.seed)
        .with_context(|| format!("Failed to build scene {:?}", args.scene))?;
    log::info!("Scene {:?} has {} objects", args.scene, world.len());

    let camera = job
        .camera
        .unwrap_or(scene_camera)
        .with_resolution(settings.image_width, settings.image_height)
        .build()
        .context("Invalid camera configuration")?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        log::warn!("Interrupt received, stopping after in-flight buckets");
        handler_token.cancel();
    })
    .context("Failed to install Ctrl-C handler")?;

    let image = render_with_cancel(&camera, &world, &settings, &cancel)?;

    image
        .to_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
