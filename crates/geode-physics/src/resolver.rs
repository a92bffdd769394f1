//! One fixed tick of entity motion.

use geode_voxel::{BlockSource, Entity};
use glam::Vec3;
use tracing::warn;

use crate::params::PhysicsParams;
use crate::sweep::next_collision;

/// What happened to an entity during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionReport {
    /// Sweep iterations used.
    pub iterations: u32,
    /// Faces hit.
    pub collisions: u32,
    /// A downward hit occurred, i.e. the entity stood on something.
    pub grounded: bool,
    /// The sweep consumed the whole tick before hitting the iteration limit.
    pub converged: bool,
}

/// Add `impulse` to one velocity component without pushing it past `cap`.
///
/// A component already at or beyond the cap in the impulse's direction is
/// left alone, so walk input never slows an entity that is moving faster for
/// other reasons.
#[inline]
pub fn blend_step(velocity: f32, impulse: f32, cap: f32) -> f32 {
    if impulse > 0.0 {
        if velocity >= cap {
            velocity
        } else {
            (velocity + impulse).min(cap)
        }
    } else if impulse < 0.0 {
        if velocity <= -cap {
            velocity
        } else {
            (velocity + impulse).max(-cap)
        }
    } else {
        velocity
    }
}

fn apply_friction(velocity: &mut Vec3, friction: f32, reaction: f32) {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let speed = horizontal.length();
    if speed == 0.0 {
        return;
    }
    let slowed = speed - (friction * reaction).min(speed);
    let scaled = horizontal * (slowed / speed);
    velocity.x = scaled.x;
    velocity.z = scaled.z;
}

/// Advance `entity` by one tick against `blocks`.
///
/// Applies gravity and any pending walk step, then sweeps the hitbox along its
/// velocity, stopping at the first exposed face, snapping to it, and
/// continuing with the remaining time. Hits from below ground the entity,
/// which triggers a requested jump and horizontal friction. Pending requests
/// are cleared afterwards whether or not they took effect.
pub fn update_entity(
    entity: &mut Entity,
    blocks: &impl BlockSource,
    params: &PhysicsParams,
) -> MotionReport {
    entity.velocity.y -= params.gravity;
    if let Some(step) = entity.pending_step() {
        let cap = entity.max_speed;
        let v = &mut entity.velocity;
        v.x = blend_step(v.x, step.x, cap);
        v.y = blend_step(v.y, step.y, cap);
        v.z = blend_step(v.z, step.z, cap);
    }

    let half = entity.hitbox.half_extents();
    let mut jump_pending = entity.jump_requested();
    let mut remaining = 1.0_f32;
    let mut report = MotionReport::default();

    while report.iterations < params.max_iterations {
        report.iterations += 1;
        let Some(hit) = next_collision(
            entity.position,
            entity.velocity,
            &entity.hitbox,
            remaining,
            blocks,
        ) else {
            entity.position += entity.velocity * remaining;
            report.converged = true;
            break;
        };

        entity.position += entity.velocity * hit.time;
        entity.position[hit.axis] = hit.boundary - hit.direction * half[hit.axis];
        remaining -= hit.time;
        report.collisions += 1;

        let reaction = -entity.velocity[hit.axis];
        entity.velocity[hit.axis] = 0.0;
        if hit.axis == 1 && reaction > 0.0 {
            report.grounded = true;
            if jump_pending {
                entity.velocity.y += params.jump_impulse;
                jump_pending = false;
            }
            apply_friction(&mut entity.velocity, params.friction, reaction);
        }
    }

    if !report.converged {
        warn!(
            entity = %entity.name,
            iterations = report.iterations,
            remaining,
            "motion did not settle within the iteration limit"
        );
    }

    entity.clear_requests();
    report
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
