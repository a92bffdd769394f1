//! Generates every missing chunk in its domain.

use std::sync::Arc;

use geode_terrain::{TerrainGenerator, flat_chunk, generate_batch};
use geode_voxel::{BlockType, World};
use glam::IVec3;
use tracing::{debug, info, warn};

use crate::god::{Domain, God};

/// Local height of the spawn platform layer inside chunk row `y = -1`.
const SPAWN_LAYER: u32 = 14;

/// Fills its domain with generated terrain.
///
/// Generation runs on worker threads without any world lock. Each result is
/// committed only if the chunk is still absent, so a chunk that appeared in
/// the meantime (for example the spawn platform) is never overwritten.
pub struct TerrainGod {
    world: Arc<World>,
    generator: TerrainGenerator,
    workers: usize,
    domain: Domain,
}

impl TerrainGod {
    /// A terrain god around the world origin.
    ///
    /// The world's seed wins: a generator built with a different seed is
    /// reseeded so every committed chunk belongs to `world`.
    pub fn new(world: Arc<World>, generator: TerrainGenerator, radius: u32, workers: usize) -> Self {
        let generator = if generator.seed() == world.seed() {
            generator
        } else {
            warn!(
                world = world.seed(),
                generator = generator.seed(),
                "terrain seed differs from world seed, using world seed"
            );
            generator.with_seed(world.seed())
        };
        Self {
            world,
            generator,
            workers: workers.max(1),
            domain: Domain::new(IVec3::ZERO, radius),
        }
    }

    /// The generator in use.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Lay a flat stone platform over chunks `(x, -1, z)` with
    /// `|x|, |z| <= radius`, replacing whatever was there. Returns the number
    /// of chunks written.
    pub fn generate_spawn(&mut self, radius: u32) -> usize {
        let r = radius as i32;
        let platform = flat_chunk(SPAWN_LAYER, BlockType::STONE);
        let mut written = 0;
        for z in -r..=r {
            for x in -r..=r {
                let coord = IVec3::new(x, -1, z);
                self.world.set_chunk(coord, platform.clone());
                self.domain.realm.insert(coord);
                written += 1;
            }
        }
        info!(radius, chunks = written, "generated spawn platform");
        written
    }
}

impl God for TerrainGod {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    fn name(&self) -> &'static str {
        "terrain"
    }

    fn update(&mut self) -> usize {
        let wanted = self.domain.chunks();
        let domain = &self.domain;
        let missing: Vec<IVec3> = wanted
            .iter()
            .copied()
            .filter(|c| !domain.realm.contains(c) && !self.world.has_chunk(*c))
            .collect();

        let mut created = 0;
        for generated in generate_batch(&self.generator, &missing, self.workers) {
            if self.world.insert_chunk_if_absent(generated.coord, generated.chunk) {
                created += 1;
                debug!(
                    chunk = %generated.coord,
                    time_us = generated.generation_time_us,
                    "committed chunk"
                );
            }
        }

        let world = &self.world;
        self.domain.realm.retain(|c| world.has_chunk(*c));
        self.domain
            .realm
            .extend(wanted.into_iter().filter(|c| world.has_chunk(*c)));

        if created > 0 {
            info!(created, realm = self.domain.realm.len(), "terrain update");
        }
        created
    }
}
