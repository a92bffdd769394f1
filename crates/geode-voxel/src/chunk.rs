//! Dense 16³ block storage plus the per-chunk entity index.
//!
//! Block data sits behind an [`Arc`] so that handing a copy to a worker thread
//! (terrain, meshing) is a reference-count bump. Writes go through
//! [`Arc::make_mut`], which clones only if a snapshot is still alive.

use std::sync::Arc;

use glam::{IVec3, UVec3};
use rustc_hash::FxHashSet;

use crate::block::BlockType;
use crate::coords::{CHUNK_SIZE, CHUNK_VOLUME};
use crate::entity::EntityId;

/// Raw block array for one chunk, indexed by [`Chunk::index`].
pub type BlockArray = [BlockType; CHUNK_VOLUME];

/// One 16³ region of the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    blocks: Arc<BlockArray>,
    /// Entities whose last known position lies in this chunk.
    entities: FxHashSet<EntityId>,
}

impl Chunk {
    /// A chunk filled with air.
    pub fn new() -> Self {
        Self::filled(BlockType::AIR)
    }

    /// A chunk where every block is `block`.
    pub fn filled(block: BlockType) -> Self {
        Self {
            blocks: Arc::new([block; CHUNK_VOLUME]),
            entities: FxHashSet::default(),
        }
    }

    /// Build a chunk by evaluating `f` at every local position.
    pub fn from_fn(mut f: impl FnMut(UVec3) -> BlockType) -> Self {
        let mut blocks = [BlockType::AIR; CHUNK_VOLUME];
        for (i, slot) in blocks.iter_mut().enumerate() {
            *slot = f(Self::local_of(i));
        }
        Self {
            blocks: Arc::new(blocks),
            entities: FxHashSet::default(),
        }
    }

    /// Linear index of a local position. X varies fastest, then Z, then Y.
    #[inline]
    pub fn index(local: UVec3) -> usize {
        debug_assert!(
            local.max_element() < CHUNK_SIZE as u32,
            "local position {local} out of chunk bounds"
        );
        let size = CHUNK_SIZE as usize;
        (local.y as usize * size + local.z as usize) * size + local.x as usize
    }

    /// Inverse of [`Chunk::index`].
    #[inline]
    pub fn local_of(index: usize) -> UVec3 {
        let size = CHUNK_SIZE as usize;
        UVec3::new(
            (index % size) as u32,
            (index / (size * size)) as u32,
            ((index / size) % size) as u32,
        )
    }

    /// Returns `true` if a signed local position lies inside the chunk.
    #[inline]
    pub fn contains_local(local: IVec3) -> bool {
        local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(CHUNK_SIZE)).all()
    }

    /// Block at a local position.
    #[inline]
    pub fn get(&self, local: UVec3) -> BlockType {
        self.blocks[Self::index(local)]
    }

    /// Overwrite one block. Clones the block array if a snapshot shares it.
    pub fn set(&mut self, local: UVec3, block: BlockType) {
        Arc::make_mut(&mut self.blocks)[Self::index(local)] = block;
    }

    /// Read-only view of the raw block array.
    pub fn blocks(&self) -> &BlockArray {
        &self.blocks
    }

    /// Cheap, owned copy of the block data for use off-thread.
    pub fn snapshot(&self) -> ChunkSnapshot {
        ChunkSnapshot {
            blocks: Arc::clone(&self.blocks),
        }
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }

    /// Returns `true` if every block is air.
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// Returns `true` if both chunks hold identical block data. The entity
    /// index is not compared.
    pub fn same_blocks(&self, other: &Chunk) -> bool {
        Arc::ptr_eq(&self.blocks, &other.blocks) || self.blocks[..] == other.blocks[..]
    }

    /// Handles of entities indexed in this chunk.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Number of entities indexed in this chunk.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if `id` is indexed in this chunk.
    pub fn has_entity(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub(crate) fn index_entity(&mut self, id: EntityId) -> bool {
        self.entities.insert(id)
    }

    pub(crate) fn unindex_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id)
    }

    pub(crate) fn take_entities(&mut self) -> FxHashSet<EntityId> {
        std::mem::take(&mut self.entities)
    }

    pub(crate) fn adopt_entities(&mut self, entities: FxHashSet<EntityId>) {
        self.entities.extend(entities);
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable block data detached from the world, safe to send to workers.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot {
    blocks: Arc<BlockArray>,
}

impl ChunkSnapshot {
    /// Block at a local position.
    #[inline]
    pub fn get(&self, local: UVec3) -> BlockType {
        self.blocks[Chunk::index(local)]
    }

    /// Block at a signed local position, or `None` if it falls outside.
    #[inline]
    pub fn get_signed(&self, local: IVec3) -> Option<BlockType> {
        Chunk::contains_local(local).then(|| self.get(local.as_uvec3()))
    }

    /// Read-only view of the raw block array.
    pub fn blocks(&self) -> &BlockArray {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new();
        assert!(chunk.is_all_air());
        assert_eq!(chunk.solid_count(), 0);
        assert_eq!(chunk.entity_count(), 0);
    }

    #[test]
    fn test_index_roundtrip_covers_volume() {
        let mut seen = vec![false; CHUNK_VOLUME];
        for i in 0..CHUNK_VOLUME {
            let local = Chunk::local_of(i);
            assert_eq!(Chunk::index(local), i);
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_set_and_get() {
        let mut chunk = Chunk::new();
        chunk.set(UVec3::new(3, 15, 0), BlockType::STONE);
        assert_eq!(chunk.get(UVec3::new(3, 15, 0)), BlockType::STONE);
        assert_eq!(chunk.get(UVec3::new(3, 14, 0)), BlockType::AIR);
        assert_eq!(chunk.solid_count(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let mut chunk = Chunk::filled(BlockType::SOIL);
        let snapshot = chunk.snapshot();
        chunk.set(UVec3::ZERO, BlockType::AIR);
        assert_eq!(snapshot.get(UVec3::ZERO), BlockType::SOIL);
        assert_eq!(chunk.get(UVec3::ZERO), BlockType::AIR);
    }

    #[test]
    fn test_from_fn_places_layer() {
        let chunk = Chunk::from_fn(|p| {
            if p.y == 4 {
                BlockType::STONE
            } else {
                BlockType::AIR
            }
        });
        assert_eq!(chunk.solid_count(), 16 * 16);
        assert_eq!(chunk.get(UVec3::new(15, 4, 15)), BlockType::STONE);
    }

    #[test]
    fn test_snapshot_signed_lookup_bounds() {
        let snapshot = Chunk::filled(BlockType::STONE).snapshot();
        assert_eq!(snapshot.get_signed(IVec3::new(0, 0, 15)), Some(BlockType::STONE));
        assert_eq!(snapshot.get_signed(IVec3::new(-1, 0, 0)), None);
        assert_eq!(snapshot.get_signed(IVec3::new(0, 16, 0)), None);
    }

    #[test]
    fn test_same_blocks_ignores_entities() {
        let a = Chunk::filled(BlockType::STONE);
        let mut b = Chunk::filled(BlockType::STONE);
        b.index_entity(EntityId::new(0, 0));
        assert!(a.same_blocks(&b));
    }
}
