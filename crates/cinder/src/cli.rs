//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Headless soak runner for the particle engine.
#[derive(Parser, Debug)]
#[command(name = "cinder", version, about = "Headless particle engine soak runner")]
pub struct Cli {
    /// Engine configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Overrides the configured random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames to simulate.
    #[arg(short, long, default_value_t = 600)]
    pub frames: u32,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Map whose point file (`maps/<map>.pts`) is traced before the run.
    #[arg(long)]
    pub map: Option<String>,

    /// Explicit point file, instead of the map convention.
    #[arg(long, conflicts_with = "map")]
    pub points: Option<PathBuf>,

    /// Log pool statistics every this many frames.
    #[arg(long, default_value_t = 60)]
    pub report_every: u32,
}

impl Cli {
    /// Length of one frame in seconds.
    #[must_use]
    pub fn frame_time(&self) -> f32 {
        if self.fps > 0.0 {
            1.0 / self.fps
        } else {
            1.0 / 60.0
        }
    }

    /// The point file to trace, if any.
    #[must_use]
    pub fn point_file(&self) -> Option<PathBuf> {
        self.points
            .clone()
            .or_else(|| self.map.as_deref().map(cinder_effects::point_file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["cinder"]);
        assert_eq!(cli.frames, 600);
        assert!(cli.config.is_none());
        assert!(cli.point_file().is_none());
        assert!((cli.frame_time() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_map_resolves_point_file() {
        let cli = Cli::parse_from(["cinder", "--map", "e1m1"]);
        assert_eq!(cli.point_file(), Some(PathBuf::from("maps/e1m1.pts")));
    }

    #[test]
    fn test_map_and_points_conflict() {
        let result = Cli::try_parse_from(["cinder", "--map", "e1m1", "--points", "x.pts"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_fps_falls_back() {
        let cli = Cli::parse_from(["cinder", "--fps", "0"]);
        assert!((cli.frame_time() - 1.0 / 60.0).abs() < 1e-7);
    }
}
