//! Generational arena of entities with a unique-name index.

use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::entity::{Entity, EntityId};

#[derive(Debug)]
struct Occupant {
    entity: Entity,
    /// Chunk whose entity index currently lists this entity.
    home: IVec3,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    occupant: Option<Occupant>,
}

/// Owns every entity in the world.
///
/// Slots are recycled through a free list. Reuse bumps the slot generation so
/// stale [`EntityId`]s miss.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    names: FxHashMap<String, EntityId>,
}

impl EntityArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity indexed in chunk `home`.
    ///
    /// Returns `None` if the name is already taken.
    pub fn insert(&mut self, entity: Entity, home: IVec3) -> Option<EntityId> {
        if self.names.contains_key(&entity.name) {
            return None;
        }

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                EntityId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    occupant: None,
                });
                EntityId::new((self.slots.len() - 1) as u32, 0)
            }
        };

        self.names.insert(entity.name.clone(), id);
        self.slots[id.index() as usize].occupant = Some(Occupant { entity, home });
        Some(id)
    }

    /// Remove an entity, returning it with the chunk it was indexed in.
    pub fn remove(&mut self, id: EntityId) -> Option<(Entity, IVec3)> {
        let slot = self.slot_mut(id)?;
        let occupant = slot.occupant.take()?;
        self.names.remove(&occupant.entity.name);
        self.free.push(id.index());
        Some((occupant.entity, occupant.home))
    }

    /// Shared access by handle.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.occupant(id).map(|o| &o.entity)
    }

    /// Exclusive access by handle.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slot_mut(id)?.occupant.as_mut().map(|o| &mut o.entity)
    }

    /// Handle registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Chunk whose index currently lists `id`.
    pub fn home(&self, id: EntityId) -> Option<IVec3> {
        self.occupant(id).map(|o| o.home)
    }

    pub(crate) fn set_home(&mut self, id: EntityId, home: IVec3) {
        if let Some(occupant) = self.slot_mut(id).and_then(|s| s.occupant.as_mut()) {
            occupant.home = home;
        }
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no entities are alive.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.occupant
                .as_ref()
                .map(|o| (EntityId::new(index as u32, slot.generation), &o.entity))
        })
    }

    /// Mutable iteration over live entities in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.occupant
                .as_mut()
                .map(|o| (EntityId::new(index as u32, generation), &mut o.entity))
        })
    }

    fn occupant(&self, id: EntityId) -> Option<&Occupant> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.occupant.as_ref()
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        (slot.generation == id.generation()).then_some(slot)
    }
}
