//! # CINDER Soak Runner
//!
//! Drives the particle engine headless through a scripted effect schedule
//! and logs pool statistics. No window, no GPU: vertices are packed into a
//! CPU buffer every frame and discarded.
//!
//! ```bash
//! RUST_LOG=debug cinder --frames 1200 --map e1m1
//! ```

mod cli;
mod soak;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use cinder_effects::{EffectsResult, EngineConfig, Palette, ParticleEngine};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "soak run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> EffectsResult<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.random.seed = seed;
    }

    let mut engine = ParticleEngine::new(config);
    let palette = Palette::grayscale();

    if let Some(path) = cli.point_file() {
        match engine.load_point_file(&path) {
            Ok(report) => tracing::info!(points = report.points_read, "point file traced"),
            Err(err) => tracing::warn!(error = %err, "skipping point file"),
        }
    }

    let dt = cli.frame_time();
    let report_every = cli.report_every.max(1);
    let started = Instant::now();
    let mut peak_alive = 0;
    let mut truncated = 0;

    for frame in 0..cli.frames {
        soak::schedule(&mut engine, frame);
        let stats = engine.advance_by(dt);
        engine.fill_vertices(&palette);

        peak_alive = peak_alive.max(stats.alive);
        truncated += stats.truncated_effects;

        if frame % report_every == 0 {
            tracing::info!(
                frame,
                alive = stats.alive,
                spawned = stats.spawned_this_frame,
                expired = stats.expired_this_frame,
                truncated = stats.truncated_effects,
                bytes = engine.vertex_bytes().len(),
                "frame"
            );
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(
        frames = cli.frames,
        peak_alive,
        truncated,
        elapsed_ms = elapsed.as_millis(),
        "soak run complete"
    );
    Ok(())
}
