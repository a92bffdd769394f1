//! World store for geode: block types, 16³ chunks, the entity arena, and the
//! shared [`World`] that every domain manager reads and writes.
//!
//! The world is sparse. A chunk that is absent from the map is *ungenerated*,
//! which is different from a chunk full of air.

mod arena;
mod block;
mod chunk;
mod coords;
mod entity;
mod error;
mod source;
mod world;

pub use arena::EntityArena;
pub use block::BlockType;
pub use chunk::{BlockArray, Chunk, ChunkSnapshot};
pub use coords::{
    CHUNK_SIZE, CHUNK_VOLUME, block_to_chunk, block_to_local, chunk_distance_sq, chunk_key,
    chunk_origin, chunks_in_sphere, position_to_block,
};
pub use entity::{Entity, EntityId, Hitbox};
pub use error::WorldError;
pub use source::BlockSource;
pub use world::World;
