//! Maps loaded config onto the library types.

use geode_config::Config;
use geode_physics::PhysicsParams;
use geode_terrain::{NoiseProfile, TerrainParams};
use geode_voxel::{Entity, Hitbox};
use glam::Vec3;

/// Terrain parameters for the configured seed and profiles.
pub fn terrain_params(config: &Config) -> TerrainParams {
    TerrainParams {
        seed: config.world.seed,
        profiles: config
            .terrain
            .profiles
            .iter()
            .map(|p| NoiseProfile {
                scale: p.scale,
                weight: p.weight,
            })
            .collect(),
        ground_level: config.terrain.ground_level,
        ruggedness: config.terrain.ruggedness,
        soil_band: config.terrain.soil_band,
    }
}

/// Resolver constants.
pub fn physics_params(config: &Config) -> PhysicsParams {
    PhysicsParams {
        gravity: config.physics.gravity,
        jump_impulse: config.physics.jump_impulse,
        friction: config.physics.friction,
        max_iterations: config.physics.max_iterations.max(1),
    }
}

/// The player entity at its configured spawn point.
pub fn player_entity(config: &Config) -> Entity {
    let player = &config.player;
    Entity::new(
        player.name.clone(),
        Vec3::from_array(player.spawn),
        Hitbox::new(Vec3::from_array(player.hitbox)),
        player.max_speed,
    )
}

#[cfg(test)]
mod tests {
    use geode_config::NoiseProfileConfig;

    use super::*;

    #[test]
    fn test_terrain_params_follow_config() {
        let mut config = Config::default();
        config.world.seed = 7;
        config.terrain.profiles = vec![NoiseProfileConfig {
            scale: 8.0,
            weight: 2.0,
        }];
        let params = terrain_params(&config);
        assert_eq!(params.seed, 7);
        assert_eq!(params.profiles.len(), 1);
        assert_eq!(params.profiles[0].scale, 8.0);
        assert_eq!(params.profiles[0].weight, 2.0);
        assert_eq!(params.ruggedness, config.terrain.ruggedness);
    }

    #[test]
    fn test_default_physics_match_library_defaults() {
        assert_eq!(physics_params(&Config::default()), PhysicsParams::default());
    }

    #[test]
    fn test_zero_iterations_is_raised_to_one() {
        let mut config = Config::default();
        config.physics.max_iterations = 0;
        assert_eq!(physics_params(&config).max_iterations, 1);
    }

    #[test]
    fn test_player_entity() {
        let mut config = Config::default();
        config.player.spawn = [1.0, 20.0, -3.0];
        let player = player_entity(&config);
        assert_eq!(player.name, "player");
        assert_eq!(player.position, Vec3::new(1.0, 20.0, -3.0));
        assert_eq!(player.hitbox.half_extents(), Vec3::new(0.375, 0.46875, 0.375));
        assert_eq!(player.max_speed, 0.15);
    }
}
