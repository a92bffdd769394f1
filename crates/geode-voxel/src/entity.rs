//! Physics-driven entities and their stable handles.

use std::fmt;

use glam::{IVec3, Vec3};

use crate::coords::{block_to_chunk, position_to_block};

/// Stable handle into the [`EntityArena`](crate::EntityArena).
///
/// The generation changes every time a slot is reused, so a handle held past
/// its entity's removal resolves to nothing instead of to a newcomer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the arena.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Axis-aligned bounding box dimensions, centered on the entity position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    /// Full extent along each axis, in blocks.
    pub size: Vec3,
}

impl Hitbox {
    /// A hitbox with the given full dimensions.
    pub fn new(size: Vec3) -> Self {
        debug_assert!(size.min_element() > 0.0, "hitbox must have positive size");
        Self { size }
    }

    /// A unit cube, one block on each side.
    pub fn unit() -> Self {
        Self::new(Vec3::ONE)
    }

    /// Half of [`Hitbox::size`].
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Minimum corner when centered on `position`.
    #[inline]
    pub fn min(&self, position: Vec3) -> Vec3 {
        position - self.half_extents()
    }

    /// Maximum corner when centered on `position`.
    #[inline]
    pub fn max(&self, position: Vec3) -> Vec3 {
        position + self.half_extents()
    }
}

/// A named body moved by the motion resolver.
///
/// `step` and `jump` only record a request. The next physics update consumes
/// both and clears them.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Unique name.
    pub name: String,
    /// Center of the hitbox, in blocks.
    pub position: Vec3,
    /// Blocks per tick.
    pub velocity: Vec3,
    /// Collision box.
    pub hitbox: Hitbox,
    /// Per-axis speed cap applied when blending step impulses.
    pub max_speed: f32,
    pending_step: Option<Vec3>,
    jump_requested: bool,
}

impl Entity {
    /// Create a resting entity.
    pub fn new(name: impl Into<String>, position: Vec3, hitbox: Hitbox, max_speed: f32) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec3::ZERO,
            hitbox,
            max_speed,
            pending_step: None,
            jump_requested: false,
        }
    }

    /// Request a movement impulse for the next tick. Repeated calls within one
    /// tick accumulate.
    pub fn step(&mut self, impulse: Vec3) {
        self.pending_step = Some(self.pending_step.unwrap_or(Vec3::ZERO) + impulse);
    }

    /// Request a jump for the next tick. Only honored if the entity lands on
    /// something during that tick.
    pub fn jump(&mut self) {
        self.jump_requested = true;
    }

    /// The pending step impulse, if any.
    pub fn pending_step(&self) -> Option<Vec3> {
        self.pending_step
    }

    /// Whether a jump has been requested.
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Drop both one-shot requests.
    pub fn clear_requests(&mut self) {
        self.pending_step = None;
        self.jump_requested = false;
    }

    /// Block containing the entity's center.
    pub fn block(&self) -> IVec3 {
        position_to_block(self.position)
    }

    /// Chunk containing the entity's center.
    pub fn chunk(&self) -> IVec3 {
        block_to_chunk(self.block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_accumulates_until_cleared() {
        let mut entity = Entity::new("a", Vec3::ZERO, Hitbox::unit(), 0.2);
        entity.step(Vec3::X * 0.1);
        entity.step(Vec3::Z * 0.1);
        assert_eq!(entity.pending_step(), Some(Vec3::new(0.1, 0.0, 0.1)));
        entity.jump();
        assert!(entity.jump_requested());

        entity.clear_requests();
        assert_eq!(entity.pending_step(), None);
        assert!(!entity.jump_requested());
    }

    #[test]
    fn test_chunk_of_negative_position() {
        let entity = Entity::new("b", Vec3::new(-0.6, 3.0, 15.6), Hitbox::unit(), 0.2);
        assert_eq!(entity.block(), IVec3::new(-1, 3, 16));
        assert_eq!(entity.chunk(), IVec3::new(-1, 0, 1));
    }

    #[test]
    fn test_hitbox_corners() {
        let hitbox = Hitbox::new(Vec3::new(0.75, 0.9375, 0.75));
        let min = hitbox.min(Vec3::ZERO);
        let max = hitbox.max(Vec3::ZERO);
        assert!((max - min - hitbox.size).length() < 1e-6);
    }
}
