//! Procedural terrain for geode.
//!
//! [`NoiseLattice`] caches classic gradient noise over one chunk at one
//! scale. [`TerrainGenerator`] sums weighted lattices into a density field and
//! classifies every block. Generation is a pure function of the seed, the
//! chunk coordinate and the parameters, so adjacent chunks agree at their
//! borders without any coordination.

mod batch;
mod error;
mod generator;
mod noise_field;
mod seed;

pub use batch::{GeneratedChunk, default_worker_count, generate_batch};
pub use error::TerrainError;
pub use generator::{NoiseProfile, TerrainGenerator, TerrainParams, flat_chunk};
pub use noise_field::{NoiseLattice, fade, gradient};
pub use seed::{hash_chunk, lattice_seed, mix64};
