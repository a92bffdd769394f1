//! Configuration system for the geode voxel world.
//!
//! Runtime settings persist to disk as a RON file. CLI flags (clap) override
//! whatever was loaded, and unknown or missing fields fall back to defaults so
//! older config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, GodsConfig, NoiseProfileConfig, PhysicsConfig,
    PlayerConfig, SimulationConfig, TerrainConfig, WorldConfig, default_config_dir,
};
pub use error::ConfigError;
