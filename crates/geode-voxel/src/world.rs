//! The shared world: sparse chunk map, entity arena, seed, and tick counter.
//!
//! Chunks live in a sharded [`DashMap`], so a reader locks one shard, never
//! the whole world. A chunk is only ever inserted as a finished value, which
//! means every observer sees it either absent or fully generated.
//!
//! Entities live in one [`EntityArena`] behind an [`RwLock`]. Lock order is
//! arena first, then chunk shards. No method takes the arena lock while it
//! holds a shard guard. Within one method, at most one shard guard is held
//! at a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use glam::IVec3;
use rustc_hash::FxBuildHasher;
use tracing::{debug, info};

use crate::arena::EntityArena;
use crate::block::BlockType;
use crate::chunk::{Chunk, ChunkSnapshot};
use crate::coords::{block_to_chunk, block_to_local};
use crate::entity::{Entity, EntityId};
use crate::error::WorldError;
use crate::source::BlockSource;

/// Sparse voxel world shared by every domain manager.
pub struct World {
    seed: u64,
    chunks: DashMap<IVec3, Chunk, FxBuildHasher>,
    entities: RwLock<EntityArena>,
    ticks: AtomicU64,
}

impl World {
    /// An empty world. The seed never changes afterwards.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chunks: DashMap::with_hasher(FxBuildHasher),
            entities: RwLock::new(EntityArena::new()),
            ticks: AtomicU64::new(0),
        }
    }

    /// World seed used for all procedural generation.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    // -----------------------------------------------------------------------
    // Chunks
    // -----------------------------------------------------------------------

    /// Returns `true` if the chunk has been generated.
    pub fn has_chunk(&self, chunk: IVec3) -> bool {
        self.chunks.contains_key(&chunk)
    }

    /// Snapshot of a chunk's block data, or `None` if it is ungenerated.
    pub fn get_chunk(&self, chunk: IVec3) -> Option<ChunkSnapshot> {
        self.chunks.get(&chunk).map(|c| c.snapshot())
    }

    /// Run `f` against a chunk while holding its shard's read guard.
    pub fn with_chunk<R>(&self, chunk: IVec3, f: impl FnOnce(&Chunk) -> R) -> Option<R> {
        self.chunks.get(&chunk).map(|c| f(&c))
    }

    /// Insert or replace a chunk.
    ///
    /// Entities indexed in a replaced chunk stay indexed in the new one.
    /// Returns the previous chunk, if any.
    pub fn set_chunk(&self, coord: IVec3, mut chunk: Chunk) -> Option<Chunk> {
        match self.chunks.entry(coord) {
            Entry::Occupied(mut slot) => {
                chunk.adopt_entities(slot.get_mut().take_entities());
                Some(slot.insert(chunk))
            }
            Entry::Vacant(slot) => {
                slot.insert(chunk);
                None
            }
        }
    }

    /// Insert a chunk only if none exists at `coord`. Returns `true` if it was
    /// inserted. Generation commits through this so a slower generator never
    /// overwrites a chunk that appeared in the meantime.
    pub fn insert_chunk_if_absent(&self, coord: IVec3, chunk: Chunk) -> bool {
        match self.chunks.entry(coord) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(chunk);
                true
            }
        }
    }

    /// Number of generated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Coordinates of every generated chunk, in no particular order.
    pub fn chunk_coords(&self) -> Vec<IVec3> {
        self.chunks.iter().map(|entry| *entry.key()).collect()
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// Returns `true` if the chunk containing `block` exists.
    pub fn has_block(&self, block: IVec3) -> bool {
        self.has_chunk(block_to_chunk(block))
    }

    /// Block at a world coordinate, or `None` if its chunk is ungenerated.
    pub fn get_block(&self, block: IVec3) -> Option<BlockType> {
        self.chunks
            .get(&block_to_chunk(block))
            .map(|chunk| chunk.get(block_to_local(block)))
    }

    /// Overwrite one block. Returns `false` if its chunk is ungenerated.
    pub fn set_block(&self, block: IVec3, block_type: BlockType) -> bool {
        match self.chunks.get_mut(&block_to_chunk(block)) {
            Some(mut chunk) => {
                chunk.set(block_to_local(block), block_type);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Register an entity and index it in the chunk containing its position.
    ///
    /// Spawning into an ungenerated chunk is rejected. The entity is not added
    /// anywhere in that case.
    pub fn spawn_entity(&self, entity: Entity) -> Result<EntityId, WorldError> {
        let mut arena = self.arena_write();
        if arena.lookup(&entity.name).is_some() {
            return Err(WorldError::DuplicateName(entity.name));
        }

        let home = entity.chunk();
        let Some(mut chunk) = self.chunks.get_mut(&home) else {
            return Err(WorldError::ChunkNotGenerated {
                name: entity.name,
                chunk: home,
            });
        };

        let name = entity.name.clone();
        let id = arena
            .insert(entity, home)
            .ok_or_else(|| WorldError::DuplicateName(name.clone()))?;
        chunk.index_entity(id);
        info!(entity = %name, %id, chunk = %home, "spawned entity");
        Ok(id)
    }

    /// Remove an entity and drop it from its chunk's index.
    pub fn remove_entity(&self, id: EntityId) -> Option<Entity> {
        let mut arena = self.arena_write();
        let (entity, home) = arena.remove(id)?;
        if let Some(mut chunk) = self.chunks.get_mut(&home) {
            chunk.unindex_entity(id);
        }
        debug!(entity = %entity.name, %id, "removed entity");
        Some(entity)
    }

    /// Handle registered under `name`.
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.arena_read().lookup(name)
    }

    /// Returns `true` if an entity with this name exists.
    pub fn sees_entity(&self, name: &str) -> bool {
        self.entity_id(name).is_some()
    }

    /// Copy of an entity's current state.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.arena_read().get(id).cloned()
    }

    /// Chunk whose index lists the entity.
    pub fn entity_home(&self, id: EntityId) -> Option<IVec3> {
        self.arena_read().home(id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.arena_read().len()
    }

    /// Copies of every entity with its handle, in arena order.
    pub fn entities(&self) -> Vec<(EntityId, Entity)> {
        self.arena_read()
            .iter()
            .map(|(id, entity)| (id, entity.clone()))
            .collect()
    }

    /// Handles indexed in a chunk. Empty if the chunk is ungenerated.
    pub fn entities_in_chunk(&self, chunk: IVec3) -> Vec<EntityId> {
        self.chunks
            .get(&chunk)
            .map(|c| c.entities().collect())
            .unwrap_or_default()
    }

    /// Mutate one entity by name while holding the arena lock.
    pub fn with_entity_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Entity) -> R,
    ) -> Result<R, WorldError> {
        let mut arena = self.arena_write();
        let id = arena
            .lookup(name)
            .ok_or_else(|| WorldError::UnknownEntity(name.to_string()))?;
        let entity = arena
            .get_mut(id)
            .ok_or_else(|| WorldError::UnknownEntity(name.to_string()))?;
        Ok(f(entity))
    }

    /// Run `f` on every entity under one arena write lock, then move each
    /// entity's handle to the chunk its new position falls in.
    ///
    /// An entity whose new chunk is ungenerated stays indexed where it was.
    /// Returns the number of entities visited.
    pub fn update_entities(&self, mut f: impl FnMut(EntityId, &mut Entity)) -> usize {
        let mut arena = self.arena_write();
        let mut targets = Vec::with_capacity(arena.len());

        for (id, entity) in arena.iter_mut() {
            f(id, entity);
            targets.push((id, entity.chunk()));
        }

        for &(id, target) in &targets {
            self.relocate(&mut arena, id, target);
        }
        targets.len()
    }

    /// Move an entity's handle from the index of chunk `from` to that of
    /// chunk `to`.
    ///
    /// Does nothing and returns `false` if the entity is unknown, is not
    /// currently indexed in `from`, or `to` has not been generated. The
    /// entity's position is not touched.
    pub fn relocate_entity(&self, id: EntityId, from: IVec3, to: IVec3) -> bool {
        let mut arena = self.arena_write();
        if arena.home(id) != Some(from) {
            return false;
        }
        self.relocate(&mut arena, id, to)
    }

    fn relocate(&self, arena: &mut EntityArena, id: EntityId, target: IVec3) -> bool {
        let Some(home) = arena.home(id) else {
            return false;
        };
        if home == target {
            return false;
        }

        match self.chunks.get_mut(&target) {
            Some(mut chunk) => {
                chunk.index_entity(id);
            }
            None => {
                debug!(%id, chunk = %target, home = %home, "entity entered ungenerated chunk, keeping old index");
                return false;
            }
        }
        if let Some(mut previous) = self.chunks.get_mut(&home) {
            previous.unindex_entity(id);
        }
        arena.set_home(id, target);
        true
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Simulated ticks elapsed.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Advance the tick counter by one and return the new value.
    pub fn advance_time(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn arena_read(&self) -> RwLockReadGuard<'_, EntityArena> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn arena_write(&self) -> RwLockWriteGuard<'_, EntityArena> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlockSource for World {
    fn block_at(&self, block: IVec3) -> Option<BlockType> {
        self.get_block(block)
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
