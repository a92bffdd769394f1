//! Swept AABB motion against the voxel grid.
//!
//! [`update_entity`] advances one entity by one fixed tick: gravity and walk
//! input first, then an iterative per-axis sweep that stops the box at the
//! first exposed block face in its path. Ungenerated chunks count as solid.

mod params;
mod resolver;
mod sweep;

pub use params::PhysicsParams;
pub use resolver::{MotionReport, blend_step, update_entity};
pub use sweep::{AxisHit, BOUNDARY_EPSILON, next_boundary, next_collision, overlaps_solid};
