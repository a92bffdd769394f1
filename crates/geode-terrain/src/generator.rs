//! Density-based terrain classification.
//!
//! The compound density at a block is the weighted sum of every noise
//! profile's sample there. The block is air if that density falls below an
//! air threshold that ramps smoothly from `-W` (always solid) deep underground
//! to `+W` (always air) high above, where `W` is the total profile weight. The
//! ramp is centered on `ground_level` and spans `2 * ruggedness` blocks.
//!
//! Solid blocks within `soil_band * W` of the threshold become soil, and
//! anything denser becomes stone. Soil directly under air is dressed as grass.

use geode_voxel::{BlockType, CHUNK_SIZE, Chunk, chunk_origin};
use glam::{IVec3, UVec3};
use tracing::debug;

use crate::error::TerrainError;
use crate::noise_field::{NoiseLattice, fade};

/// One weighted noise layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseProfile {
    /// Lattice spacing in blocks.
    pub scale: f64,
    /// Contribution to the compound density.
    pub weight: f64,
}

/// Everything that determines generated terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    /// World seed.
    pub seed: u64,
    /// Noise layers summed into the density.
    pub profiles: Vec<NoiseProfile>,
    /// Height where air and solid are equally likely.
    pub ground_level: f64,
    /// Half-height of the threshold ramp.
    pub ruggedness: f64,
    /// Soil thickness as a fraction of the total weight.
    pub soil_band: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 42,
            profiles: vec![
                NoiseProfile {
                    scale: 48.0,
                    weight: 1.0,
                },
                NoiseProfile {
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

impl TerrainParams {
    /// Check that the parameters describe a usable density field.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.profiles.is_empty() {
            return Err(TerrainError::NoProfiles);
        }
        for (index, profile) in self.profiles.iter().enumerate() {
            if !(profile.scale.is_finite() && profile.scale > 0.0) {
                return Err(TerrainError::InvalidScale {
                    index,
                    scale: profile.scale,
                });
            }
            if !profile.weight.is_finite() {
                return Err(TerrainError::InvalidWeight {
                    index,
                    weight: profile.weight,
                });
            }
        }
        if !(self.ruggedness.is_finite() && self.ruggedness > 0.0) {
            return Err(TerrainError::InvalidRuggedness(self.ruggedness));
        }
        Ok(())
    }

    /// Sum of absolute profile weights.
    pub fn total_weight(&self) -> f64 {
        self.profiles.iter().map(|p| p.weight.abs()).sum()
    }

    /// Density below which a block at height `y` is air.
    pub fn air_threshold(&self, y: f64) -> f64 {
        let w = self.total_weight();
        let bottom = self.ground_level - self.ruggedness;
        let t = ((y - bottom) / (2.0 * self.ruggedness)).clamp(0.0, 1.0);
        -w + 2.0 * w * fade(t)
    }

    /// Classify a density at height `y`, ignoring grass dressing.
    pub fn classify(&self, y: f64, density: f64) -> BlockType {
        let threshold = self.air_threshold(y);
        if density < threshold {
            BlockType::AIR
        } else if density < threshold + self.soil_band * self.total_weight() {
            BlockType::SOIL
        } else {
            BlockType::STONE
        }
    }
}

/// Pure chunk generator. Cheap to share across threads.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    params: TerrainParams,
}

impl TerrainGenerator {
    /// Validate `params` and build a generator.
    pub fn new(params: TerrainParams) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters this generator was built with.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    /// Same parameters with a different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    /// Compound density at one block.
    ///
    /// Builds throwaway lattices, so prefer [`TerrainGenerator::generate`] for
    /// whole chunks.
    pub fn density_at(&self, block: IVec3) -> f64 {
        self.params
            .profiles
            .iter()
            .map(|p| {
                let lattice = NoiseLattice::covering(self.params.seed, p.scale, block, block);
                p.weight * lattice.sample(block)
            })
            .sum()
    }

    /// Generate the chunk at `coord`. Has no side effects.
    pub fn generate(&self, coord: IVec3) -> Chunk {
        let origin = chunk_origin(coord);
        // One extra row above the chunk decides grass on the top layer.
        let last = origin + IVec3::new(CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE - 1);
        let layers: Vec<(f64, NoiseLattice)> = self
            .params
            .profiles
            .iter()
            .map(|p| {
                (
                    p.weight,
                    NoiseLattice::covering(self.params.seed, p.scale, origin, last),
                )
            })
            .collect();

        let size = CHUNK_SIZE as usize;
        let rows = size + 1;
        let mut classes = vec![BlockType::AIR; size * rows * size];
        let column = |x: usize, y: usize, z: usize| (y * size + z) * size + x;

        for y in 0..rows {
            let world_y = origin.y + y as i32;
            for z in 0..size {
                for x in 0..size {
                    let block = origin + IVec3::new(x as i32, y as i32, z as i32);
                    let density: f64 = layers
                        .iter()
                        .map(|(weight, lattice)| weight * lattice.sample(block))
                        .sum();
                    classes[column(x, y, z)] = self.params.classify(f64::from(world_y), density);
                }
            }
        }

        let chunk = Chunk::from_fn(|local: UVec3| {
            let (x, y, z) = (local.x as usize, local.y as usize, local.z as usize);
            let block = classes[column(x, y, z)];
            if block == BlockType::SOIL && classes[column(x, y + 1, z)].is_air() {
                BlockType::GRASS
            } else {
                block
            }
        });

        debug!(chunk = %coord, solid = chunk.solid_count(), "generated chunk");
        chunk
    }
}

/// An air chunk with one full layer of `block` at local height `surface_y`.
/// Used for the spawn platform.
pub fn flat_chunk(surface_y: u32, block: BlockType) -> Chunk {
    assert!(
        surface_y < CHUNK_SIZE as u32,
        "surface layer {surface_y} outside chunk"
    );
    Chunk::from_fn(|local| {
        if local.y == surface_y {
            block
        } else {
            BlockType::AIR
        }
    })
}
