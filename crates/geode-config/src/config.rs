//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for a geode world session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity.
    pub world: WorldConfig,
    /// Terrain noise profiles and classification thresholds.
    pub terrain: TerrainConfig,
    /// Motion resolver tuning.
    pub physics: PhysicsConfig,
    /// The locally controlled entity.
    pub player: PlayerConfig,
    /// Domain manager radii and cadences.
    pub gods: GodsConfig,
    /// Host loop settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for all procedural generation. Immutable once the world exists.
    pub seed: u64,
}

/// One weighted noise layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NoiseProfileConfig {
    /// Lattice spacing in blocks. Larger values give broader features.
    pub scale: f64,
    /// Contribution of this layer to the compound density.
    pub weight: f64,
}

/// Terrain generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise layers summed into the compound density.
    pub profiles: Vec<NoiseProfileConfig>,
    /// Block height where air and solid are equally likely.
    pub ground_level: f64,
    /// Half-height of the band over which the air threshold ramps.
    pub ruggedness: f64,
    /// Thickness of the soil band, as a fraction of the total profile weight.
    pub soil_band: f64,
}

/// Motion resolver tuning, in blocks and ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration applied every tick.
    pub gravity: f32,
    /// Upward velocity added when a grounded entity jumps.
    pub jump_impulse: f32,
    /// Ground friction coefficient, scaled by the vertical reaction.
    pub friction: f32,
    /// Sweep retry limit per tick.
    pub max_iterations: u32,
}

/// The player entity spawned by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Unique entity name.
    pub name: String,
    /// Maximum horizontal speed in blocks per tick.
    pub max_speed: f32,
    /// Hitbox dimensions in blocks.
    pub hitbox: [f32; 3],
    /// Spawn column; the host drops the player onto the highest solid block.
    pub spawn: [f32; 3],
}

/// Domain manager settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GodsConfig {
    /// Terrain generation radius in chunks.
    pub terrain_radius: u32,
    /// Mesh building radius in chunks.
    pub render_radius: u32,
    /// Ticks between terrain manager launches.
    pub terrain_interval_ticks: u64,
    /// Ticks between render manager launches.
    pub render_interval_ticks: u64,
    /// Extra chunks beyond the render radius before a mesh is culled.
    pub cull_allowance: u32,
    /// Maximum meshes handed to the renderer per tick.
    pub upload_budget: usize,
    /// Build a flat stone platform of this radius (in chunks) instead of
    /// relying on generated terrain around spawn.
    pub spawn_platform_radius: Option<u32>,
}

/// Host loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate.
    pub tick_rate_hz: u32,
    /// Ticks to run before the headless host exits (0 = run forever).
    pub max_ticks: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            profiles: vec![
                NoiseProfileConfig {
                    scale: 48.0,
                    weight: 1.0,
                },
                NoiseProfileConfig {
                    scale: 12.0,
                    weight: 0.35,
                },
            ],
            ground_level: 0.0,
            ruggedness: 24.0,
            soil_band: 0.12,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.01,
            jump_impulse: 0.22,
            friction: 0.5,
            max_iterations: 10,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "player".to_string(),
            max_speed: 0.15,
            hitbox: [0.75, 0.9375, 0.75],
            spawn: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for GodsConfig {
    fn default() -> Self {
        Self {
            terrain_radius: 3,
            render_radius: 3,
            terrain_interval_ticks: 20,
            render_interval_ticks: 10,
            cull_allowance: 1,
            upload_budget: 4,
            spawn_platform_radius: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 20,
            max_ticks: 600,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for geode, falling back to `./.geode`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("geode"))
        .unwrap_or_else(|| PathBuf::from(".geode"))
}

// --- Load / Save / Reload ---

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Write this config to `config_dir/config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Re-read `config.ron`. Returns the new config only if it differs.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("seed: 42"));
        assert!(ron_str.contains("max_iterations: 10"));
    }

    #[test]
    fn test_default_terrain_has_two_profiles() {
        let terrain = TerrainConfig::default();
        assert_eq!(terrain.profiles.len(), 2);
        assert!(
            terrain.profiles[0].scale > terrain.profiles[1].scale,
            "first profile should be the broad one"
        );
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(world: (seed: 7), terrain: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.physics, PhysicsConfig::default());
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = 1234;
        config.gods.render_radius = 6;
        config.gods.spawn_platform_radius = Some(4);
        config.terrain.profiles.push(NoiseProfileConfig {
            scale: 4.0,
            weight: 0.1,
        });

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.physics.gravity = 0.02;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.physics.gravity), Some(0.02));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        match result {
            Err(ConfigError::Parse { path, .. }) => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
