//! Command-line argument parsing for the headless host.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// geode command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "geode", about = "Chunked voxel world simulation")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of ticks to simulate before exiting (0 = forever).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Terrain generation radius in chunks.
    #[arg(long)]
    pub terrain_radius: Option<u32>,

    /// Mesh building radius in chunks.
    #[arg(long)]
    pub render_radius: Option<u32>,

    /// Console log level, e.g. `debug` or `geode_gods=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding `config.ron` and `logs/`.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Overwrite every setting that was given on the command line.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ticks) = args.ticks {
            self.simulation.max_ticks = ticks;
        }
        if let Some(radius) = args.terrain_radius {
            self.gods.terrain_radius = radius;
        }
        if let Some(radius) = args.render_radius {
            self.gods.render_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
