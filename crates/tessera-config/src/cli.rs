//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ThreadingMode};

/// Tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tessera", about = "Chunked voxel volume meshing")]
pub struct CliArgs {
    /// Volume size in voxels, as X Y Z.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub volume_size: Option<Vec<i32>>,

    /// Chunk size in voxels, as X Y Z.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub chunk_size: Option<Vec<i32>>,

    /// Mesh on the calling thread instead of the worker pool.
    #[arg(long)]
    pub single_threaded: bool,

    /// Background meshing worker threads (0 = automatic).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of demo ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Seed for the demo's random fill.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of voxels the demo writes per tick.
    #[arg(long)]
    pub fill_ratio: Option<f32>,
}

fn as_triple(values: &[i32]) -> Option<[i32; 3]> {
    values.try_into().ok()
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.volume_size.as_deref().and_then(as_triple) {
            self.volume.volume_size = size;
        }
        if let Some(size) = args.chunk_size.as_deref().and_then(as_triple) {
            self.volume.chunk_size = size;
        }
        if args.single_threaded {
            self.volume.threading = ThreadingMode::SingleThreaded;
        }
        if let Some(workers) = args.workers {
            self.meshing.worker_threads = workers;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ticks) = args.ticks {
            self.demo.ticks = ticks;
        }
        if let Some(seed) = args.seed {
            self.demo.seed = seed;
        }
        if let Some(ratio) = args.fill_ratio {
            self.demo.fill_ratio = ratio.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from([
            "tessera",
            "--volume-size",
            "32",
            "8",
            "32",
            "--single-threaded",
            "--log-level",
            "debug",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.volume.volume_size, [32, 8, 32]);
        assert_eq!(config.volume.threading, ThreadingMode::SingleThreaded);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.volume.chunk_size, [8, 8, 8]);
        assert_eq!(config.demo.ticks, 10);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_fill_ratio_is_clamped() {
        let mut config = Config::default();
        let args = CliArgs {
            fill_ratio: Some(3.0),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.demo.fill_ratio, 1.0);
    }

    #[test]
    fn test_size_needs_three_values() {
        let result = CliArgs::try_parse_from(["tessera", "--chunk-size", "4", "4"]);
        assert!(result.is_err());
    }
}
