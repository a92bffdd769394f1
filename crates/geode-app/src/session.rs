//! One running world: store, managers and the player.
//!
//! The entity god runs on the caller's thread every tick. The terrain and
//! render gods follow the player's block on their own cadence, each on a
//! background thread, and meshes reach the renderer through the shared
//! render cache.

use std::sync::Arc;

use geode_config::{Config, GodsConfig};
use geode_gods::{EntityGod, God, RenderCache, RenderCacheHandle, RenderGod, TerrainGod};
use geode_mesh::{AtlasLayout, RenderSink};
use geode_terrain::{TerrainGenerator, default_worker_count};
use geode_voxel::{BlockType, CHUNK_SIZE, Entity, World, block_to_chunk, chunk_origin};
use glam::{IVec3, Vec3};
use tracing::{info, warn};

use crate::background::BackgroundGod;
use crate::error::AppError;
use crate::settings::{physics_params, player_entity, terrain_params};

/// Player input for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Walk impulse, in blocks per tick.
    pub step: Option<Vec3>,
    /// Jump if standing on something.
    pub jump: bool,
}

/// The world and every manager driving it.
pub struct Session {
    world: Arc<World>,
    entities: EntityGod,
    terrain: BackgroundGod<TerrainGod>,
    render: BackgroundGod<RenderGod>,
    cache: RenderCacheHandle,
    player: String,
    focus: IVec3,
    cadence: GodsConfig,
}

impl Session {
    /// Build the world, generate the spawn area synchronously, place the
    /// player on the surface and start the first meshing pass.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let world = Arc::new(World::new(config.world.seed));
        let generator = TerrainGenerator::new(terrain_params(config))?;
        let gods = &config.gods;

        let mut player = player_entity(config);
        let spawn = player.block();

        let mut terrain = TerrainGod::new(
            Arc::clone(&world),
            generator,
            gods.terrain_radius,
            default_worker_count(),
        );
        if let Some(radius) = gods.spawn_platform_radius {
            terrain.generate_spawn(radius);
        }
        terrain.set_origin(spawn);
        let created = terrain.update();

        match surface_below(&world, spawn, gods.terrain_radius) {
            Some(ground) => {
                player.position.y = ground as f32 + 0.5 + player.hitbox.half_extents().y;
            }
            None => warn!(block = %spawn, "no standing spot above spawn, using configured position"),
        }

        let mut entities = EntityGod::new(Arc::clone(&world), physics_params(config));
        let name = player.name.clone();
        let focus = player.block();
        entities.create_entity(player)?;

        let cache = RenderCache::shared();
        let mut render = RenderGod::new(
            Arc::clone(&world),
            Arc::clone(&cache),
            AtlasLayout::default(),
            gods.render_radius,
        );
        render.set_origin(focus);
        let mut render = BackgroundGod::new(render);
        render.launch()?;

        info!(
            seed = world.seed(),
            chunks = created,
            player = %name,
            block = %focus,
            "session started"
        );

        Ok(Self {
            world,
            entities,
            terrain: BackgroundGod::new(terrain),
            render,
            cache,
            player: name,
            focus,
            cadence: gods.clone(),
        })
    }

    /// Apply input, step every entity, then relaunch the background gods
    /// whose cadence is due. Returns the number of entities stepped.
    pub fn tick(&mut self, input: &TickInput) -> Result<usize, AppError> {
        if let Some(step) = input.step {
            self.entities.step(&self.player, step)?;
        }
        if input.jump {
            self.entities.jump(&self.player)?;
        }
        let stepped = self.entities.update();
        let tick = self.world.ticks();

        if let Some(player) = self.entities.entity(&self.player) {
            self.focus = player.block();
        }
        let focus = self.focus;

        if tick % self.cadence.terrain_interval_ticks.max(1) == 0 {
            self.terrain.with(|god| god.set_origin(focus))?;
            self.terrain.launch()?;
        }
        if tick % self.cadence.render_interval_ticks.max(1) == 0 {
            let allowance = self.cadence.cull_allowance;
            self.render.with(|god| {
                god.set_origin(focus);
                god.cull_far_chunks(allowance)
            })?;
            self.render.launch()?;
        }
        Ok(stepped)
    }

    /// Hand up to the configured budget of meshes to `sink`.
    pub fn upload(&self, sink: &mut dyn RenderSink) -> usize {
        RenderCache::lock(&self.cache).upload(self.cadence.upload_budget, sink)
    }

    /// Wait for both background gods to finish their current run.
    pub fn settle(&mut self) -> Result<(), AppError> {
        self.terrain.join()?;
        self.render.join()
    }

    /// The shared world.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Current state of the player.
    pub fn player(&self) -> Option<Entity> {
        self.entities.entity(&self.player)
    }

    /// Block the background gods are centered on.
    pub fn focus(&self) -> IVec3 {
        self.focus
    }

    /// Meshes waiting for upload.
    pub fn pending_meshes(&self) -> usize {
        RenderCache::lock(&self.cache).pending_count()
    }

    /// Join the background gods and end the session.
    pub fn shutdown(mut self) -> Result<(), AppError> {
        self.settle()?;
        info!(
            ticks = self.world.ticks(),
            chunks = self.world.chunk_count(),
            "session ended"
        );
        Ok(())
    }
}

/// Highest solid block in the column through `block` that has generated air
/// above it, searching the chunks within `radius` rows of `block`'s chunk.
pub fn surface_below(world: &World, block: IVec3, radius: u32) -> Option<i32> {
    let chunk = block_to_chunk(block);
    let rows = radius as i32;
    let top = chunk_origin(chunk + IVec3::Y * rows).y + CHUNK_SIZE - 1;
    let bottom = chunk_origin(chunk - IVec3::Y * rows).y;
    (bottom..top).rev().find(|&y| {
        let ground = IVec3::new(block.x, y, block.z);
        world.get_block(ground).is_some_and(BlockType::is_solid)
            && world.get_block(ground + IVec3::Y) == Some(BlockType::AIR)
    })
}

#[cfg(test)]
mod tests {
    use geode_mesh::ChunkMesh;
    use geode_terrain::flat_chunk;
    use geode_voxel::Chunk;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        created: Vec<String>,
    }

    impl RenderSink for Recorder {
        fn create_mesh(&mut self, key: &str, _mesh: &ChunkMesh) {
            self.created.push(key.to_string());
        }

        fn delete_mesh(&mut self, _key: &str) {}
    }

    /// Terrain sunk far below the spawn area, so the platform is the only
    /// ground.
    fn platform_config() -> Config {
        let mut config = Config::default();
        config.terrain.ground_level = -200.0;
        config.gods.terrain_radius = 1;
        config.gods.render_radius = 1;
        config.gods.terrain_interval_ticks = 1;
        config.gods.render_interval_ticks = 1;
        config.gods.spawn_platform_radius = Some(1);
        config
    }

    #[test]
    fn test_player_starts_on_the_platform() {
        let mut session = Session::new(&platform_config()).unwrap();
        let player = session.player().unwrap();
        assert_eq!(player.position.y, -2.0 + 0.5 + 0.46875);
        assert_eq!(session.focus(), IVec3::new(0, -1, 0));

        for _ in 0..10 {
            session.tick(&TickInput::default()).unwrap();
        }
        let player = session.player().unwrap();
        assert_eq!(player.position.y, -1.03125, "resting, not sinking");
        assert_eq!(session.world().ticks(), 10);
        session.shutdown().unwrap();
    }

    #[test]
    fn test_walking_moves_the_player() {
        let mut session = Session::new(&platform_config()).unwrap();
        let input = TickInput {
            step: Some(Vec3::new(0.1, 0.0, 0.0)),
            jump: false,
        };
        for _ in 0..20 {
            session.tick(&input).unwrap();
        }
        let player = session.player().unwrap();
        assert!(player.position.x > 1.0, "walked to x = {}", player.position.x);
        assert_eq!(player.position.y, -1.03125);
        session.shutdown().unwrap();
    }

    #[test]
    fn test_upload_starts_with_the_player_chunk() {
        let mut session = Session::new(&platform_config()).unwrap();
        session.settle().unwrap();
        // Render sphere around chunk (0,-1,0); only (0,-2,0) was never
        // generated.
        assert_eq!(session.pending_meshes(), 6);

        let mut sink = Recorder::default();
        assert_eq!(session.upload(&mut sink), 4);
        assert_eq!(sink.created[0], "0,-1,0");
        assert_eq!(session.upload(&mut sink), 2);
        assert_eq!(session.upload(&mut sink), 0);
    }

    #[test]
    fn test_invalid_terrain_is_rejected() {
        let mut config = platform_config();
        config.terrain.profiles.clear();
        assert!(matches!(Session::new(&config), Err(AppError::Terrain(_))));
    }

    #[test]
    fn test_surface_below_finds_highest_ground() {
        let world = World::new(0);
        world.set_chunk(IVec3::ZERO, flat_chunk(4, BlockType::STONE));
        world.set_chunk(IVec3::Y, Chunk::new());
        assert_eq!(surface_below(&world, IVec3::new(3, 20, 3), 1), Some(4));
        assert_eq!(surface_below(&world, IVec3::new(3, 20, 3), 0), None);
    }
}
