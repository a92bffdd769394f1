//! Steps every entity once per tick.

use std::sync::Arc;

use geode_physics::{PhysicsParams, update_entity};
use geode_voxel::{Entity, EntityId, World, WorldError};
use glam::Vec3;
use tracing::debug;

use crate::god::{Domain, God};

/// Runs the motion resolver for every entity and advances world time.
///
/// Its realm is the set of chunks that currently host an entity.
pub struct EntityGod {
    world: Arc<World>,
    params: PhysicsParams,
    domain: Domain,
}

impl EntityGod {
    /// An entity god using `params` for every entity.
    pub fn new(world: Arc<World>, params: PhysicsParams) -> Self {
        Self {
            world,
            params,
            domain: Domain::default(),
        }
    }

    /// Physics constants in use.
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Add an entity to the world. Fails if its chunk is not generated or its
    /// name is taken.
    pub fn create_entity(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let id = self.world.spawn_entity(entity)?;
        if let Some(home) = self.world.entity_home(id) {
            self.domain.realm.insert(home);
        }
        Ok(id)
    }

    /// Remove an entity by name.
    pub fn remove_entity(&mut self, name: &str) -> Result<Entity, WorldError> {
        let unknown = || WorldError::UnknownEntity(name.to_string());
        let id = self.world.entity_id(name).ok_or_else(unknown)?;
        self.world.remove_entity(id).ok_or_else(unknown)
    }

    /// Copy of an entity's current state.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.world.entity(self.world.entity_id(name)?)
    }

    /// Returns `true` if an entity with this name exists.
    pub fn sees_entity(&self, name: &str) -> bool {
        self.world.sees_entity(name)
    }

    /// Queue a walk impulse for the next tick.
    pub fn step(&self, name: &str, impulse: Vec3) -> Result<(), WorldError> {
        self.world.with_entity_mut(name, |e| e.step(impulse))
    }

    /// Request a jump on the next tick.
    pub fn jump(&self, name: &str) -> Result<(), WorldError> {
        self.world.with_entity_mut(name, Entity::jump)
    }
}

impl God for EntityGod {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    fn name(&self) -> &'static str {
        "entity"
    }

    fn update(&mut self) -> usize {
        let world = self.world.as_ref();
        let params = self.params;
        let mut unsettled = 0;
        let stepped = world.update_entities(|_, entity| {
            if !update_entity(entity, world, &params).converged {
                unsettled += 1;
            }
        });

        self.domain.realm = world
            .entities()
            .into_iter()
            .filter_map(|(id, _)| world.entity_home(id))
            .collect();
        let tick = world.advance_time();
        if unsettled > 0 {
            debug!(tick, unsettled, "entities left unsettled this tick");
        }
        stepped
    }
}

#[cfg(test)]
mod tests {
    use geode_terrain::flat_chunk;
    use geode_voxel::{BlockType, Chunk, Hitbox};
    use glam::IVec3;

    use super::*;

    /// Stone floor at block y = 0 across chunk row y = 0, air above.
    fn floor_world() -> Arc<World> {
        let world = Arc::new(World::new(0));
        for x in -1..=1 {
            for z in -1..=1 {
                world.set_chunk(IVec3::new(x, 0, z), flat_chunk(0, BlockType::STONE));
                world.set_chunk(IVec3::new(x, 1, z), Chunk::new());
                world.set_chunk(IVec3::new(x, -1, z), Chunk::new());
            }
        }
        world
    }

    fn player(position: Vec3) -> Entity {
        Entity::new("player", position, Hitbox::unit(), 0.15)
    }

    #[test]
    fn test_update_steps_entities_and_time() {
        let world = floor_world();
        let mut god = EntityGod::new(Arc::clone(&world), PhysicsParams::default());
        god.create_entity(player(Vec3::new(0.0, 5.0, 0.0))).unwrap();

        for _ in 0..100 {
            assert_eq!(god.update(), 1);
        }
        assert_eq!(world.ticks(), 100);
        let player = god.entity("player").unwrap();
        assert_eq!(player.position.y, 1.0, "rests on the floor");
        assert_eq!(god.realm().len(), 1);
        assert!(god.realm().contains(&IVec3::ZERO));
    }

    #[test]
    fn test_realm_follows_entity_across_chunks() {
        let world = floor_world();
        let mut god = EntityGod::new(Arc::clone(&world), PhysicsParams::default());
        god.create_entity(player(Vec3::new(14.0, 1.0, 3.0))).unwrap();

        for _ in 0..40 {
            god.step("player", Vec3::new(0.15, 0.0, 0.0)).unwrap();
            god.update();
        }
        let player = god.entity("player").unwrap();
        assert!(player.position.x > 15.5, "crossed into the next chunk");
        assert!(god.realm().contains(&IVec3::new(1, 0, 0)));
        assert_eq!(world.entities_in_chunk(IVec3::new(1, 0, 0)).len(), 1);
    }

    #[test]
    fn test_jump_leaves_the_ground() {
        let world = floor_world();
        let mut god = EntityGod::new(Arc::clone(&world), PhysicsParams::default());
        god.create_entity(player(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        god.update();

        god.jump("player").unwrap();
        god.update();
        let player = god.entity("player").unwrap();
        assert!(player.position.y > 1.0);
        assert!(player.velocity.y > 0.0);
    }

    #[test]
    fn test_spawn_into_missing_chunk_is_rejected() {
        let world = floor_world();
        let mut god = EntityGod::new(world, PhysicsParams::default());
        let err = god
            .create_entity(player(Vec3::new(0.0, 100.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, WorldError::ChunkNotGenerated { .. }));
        assert!(!god.sees_entity("player"));
        assert!(god.realm().is_empty());
    }

    #[test]
    fn test_input_hooks_on_unknown_entity() {
        let world = floor_world();
        let mut god = EntityGod::new(world, PhysicsParams::default());
        assert_eq!(
            god.step("ghost", Vec3::X),
            Err(WorldError::UnknownEntity("ghost".to_string()))
        );
        assert!(god.jump("ghost").is_err());
        assert!(god.remove_entity("ghost").is_err());
        assert!(god.entity("ghost").is_none());
    }

    #[test]
    fn test_remove_entity() {
        let world = floor_world();
        let mut god = EntityGod::new(Arc::clone(&world), PhysicsParams::default());
        god.create_entity(player(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        let removed = god.remove_entity("player").unwrap();
        assert_eq!(removed.name, "player");
        assert_eq!(world.entity_count(), 0);
        god.update();
        assert!(god.realm().is_empty());
    }
}
