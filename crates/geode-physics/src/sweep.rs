//! Per-axis swept AABB queries against the block grid.
//!
//! Block `b` spans `[b - 0.5, b + 0.5]` on every axis, so the grid lines a
//! moving face can cross sit at half-integers. A face moving along one axis
//! collides with the first grid line where, for any cell in its cross-section
//! at that instant, the cell in front is solid and the cell behind is not.
//! Only exposed faces stop motion, so an entity that is already touching a
//! solid wall can slide along it.

use geode_voxel::{BlockSource, Hitbox};
use glam::{IVec3, Vec3};

/// Tolerance for snapping to grid lines and shrinking footprints.
pub const BOUNDARY_EPSILON: f32 = 1e-4;

/// Axis order used to break ties between simultaneous hits. Vertical first,
/// so landing is resolved before any horizontal hit at the same instant.
const AXIS_ORDER: [usize; 3] = [1, 0, 2];

/// The earliest collision on one axis within a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisHit {
    /// 0 for x, 1 for y, 2 for z.
    pub axis: usize,
    /// Grid line the leading face stops on.
    pub boundary: f32,
    /// `1.0` when moving toward positive, `-1.0` toward negative.
    pub direction: f32,
    /// Fraction of the remaining tick at which the face reaches `boundary`.
    pub time: f32,
}

/// First grid line at or past `face` in `direction`, within tolerance.
///
/// A face sitting within [`BOUNDARY_EPSILON`] of a grid line, on either side,
/// reports that line.
#[inline]
pub fn next_boundary(face: f32, direction: f32) -> f32 {
    if direction > 0.0 {
        (face + 0.5 - BOUNDARY_EPSILON).ceil() - 0.5
    } else {
        (face + 0.5 + BOUNDARY_EPSILON).floor() - 0.5
    }
}

#[inline]
fn cell_of(x: f32) -> i32 {
    (x + 0.5).floor() as i32
}

#[inline]
fn on_grid_line(x: f32) -> bool {
    let shifted = x + 0.5;
    (shifted - shifted.round()).abs() < BOUNDARY_EPSILON
}

/// Inclusive range of cells a box edge `[center - half, center + half]`
/// overlaps. Touching is not overlapping, except that an edge sitting on a
/// grid line and moving across it also claims the cell it is entering.
fn footprint(center: f32, half: f32, velocity: f32) -> (i32, i32) {
    let lo = center - half;
    let hi = center + half;
    let mut first = cell_of(lo + BOUNDARY_EPSILON);
    let mut last = cell_of(hi - BOUNDARY_EPSILON);
    if velocity > 0.0 && on_grid_line(hi) {
        last = last.max(cell_of(hi + BOUNDARY_EPSILON));
    }
    if velocity < 0.0 && on_grid_line(lo) {
        first = first.min(cell_of(lo - BOUNDARY_EPSILON));
    }
    (first, last)
}

#[inline]
fn perpendicular(axis: usize) -> (usize, usize) {
    ((axis + 1) % 3, (axis + 2) % 3)
}

/// Returns `true` if the face crossing `boundary` at `time` meets an exposed
/// solid face.
#[allow(clippy::too_many_arguments)]
fn blocked_at(
    axis: usize,
    boundary: f32,
    direction: f32,
    time: f32,
    position: Vec3,
    velocity: Vec3,
    half: Vec3,
    blocks: &impl BlockSource,
) -> bool {
    let front = (boundary + 0.5 * direction).round() as i32;
    let behind = front - direction as i32;
    let (a, b) = perpendicular(axis);
    let (a_first, a_last) = footprint(position[a] + velocity[a] * time, half[a], velocity[a]);
    let (b_first, b_last) = footprint(position[b] + velocity[b] * time, half[b], velocity[b]);

    for ca in a_first..=a_last {
        for cb in b_first..=b_last {
            let mut cell = IVec3::ZERO;
            cell[a] = ca;
            cell[b] = cb;
            cell[axis] = front;
            if !blocks.is_solid_at(cell) {
                continue;
            }
            cell[axis] = behind;
            if !blocks.is_solid_at(cell) {
                return true;
            }
        }
    }
    false
}

fn sweep_axis(
    axis: usize,
    position: Vec3,
    velocity: Vec3,
    half: Vec3,
    remaining: f32,
    blocks: &impl BlockSource,
) -> Option<AxisHit> {
    let v = velocity[axis];
    if v == 0.0 || !v.is_finite() {
        return None;
    }
    let direction = v.signum();
    let face = position[axis] + direction * half[axis];
    let mut boundary = next_boundary(face, direction);
    loop {
        // A face that drifted just past the line still reports it at time 0.
        let time = ((boundary - face) / v).max(0.0);
        if time > remaining {
            return None;
        }
        if blocked_at(axis, boundary, direction, time, position, velocity, half, blocks) {
            return Some(AxisHit {
                axis,
                boundary,
                direction,
                time,
            });
        }
        boundary += direction;
    }
}

/// Earliest collision of a box moving at `velocity` for `remaining` of a
/// tick, or `None` if the path is clear. Ties resolve the vertical axis first,
/// then x, then z.
pub fn next_collision(
    position: Vec3,
    velocity: Vec3,
    hitbox: &Hitbox,
    remaining: f32,
    blocks: &impl BlockSource,
) -> Option<AxisHit> {
    let half = hitbox.half_extents();
    let mut best: Option<AxisHit> = None;
    for axis in AXIS_ORDER {
        if let Some(hit) = sweep_axis(axis, position, velocity, half, remaining, blocks)
            && best.is_none_or(|b| hit.time < b.time)
        {
            best = Some(hit);
        }
    }
    best
}

/// Returns `true` if the box at `position` overlaps any solid or ungenerated
/// cell. Faces exactly on a grid line do not count as overlap.
pub fn overlaps_solid(position: Vec3, hitbox: &Hitbox, blocks: &impl BlockSource) -> bool {
    let first = hitbox.min(position) + Vec3::splat(BOUNDARY_EPSILON);
    let last = hitbox.max(position) - Vec3::splat(BOUNDARY_EPSILON);
    for z in cell_of(first.z)..=cell_of(last.z) {
        for y in cell_of(first.y)..=cell_of(last.y) {
            for x in cell_of(first.x)..=cell_of(last.x) {
                if blocks.is_solid_at(IVec3::new(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_boundary_positive() {
        assert_eq!(next_boundary(0.3, 1.0), 0.5);
        assert_eq!(next_boundary(0.5, 1.0), 0.5);
        assert_eq!(next_boundary(0.50005, 1.0), 0.5, "drift past a line keeps it");
        assert_eq!(next_boundary(0.6, 1.0), 1.5);
    }

    #[test]
    fn test_next_boundary_negative() {
        assert_eq!(next_boundary(0.7, -1.0), 0.5);
        assert_eq!(next_boundary(0.5, -1.0), 0.5);
        assert_eq!(next_boundary(0.49995, -1.0), 0.5);
        assert_eq!(next_boundary(-0.7, -1.0), -1.5);
    }

    #[test]
    fn test_footprint_ignores_touching_cells() {
        // Box [0.5, 1.5] touches cells 0 and 2 but overlaps only cell 1.
        assert_eq!(footprint(1.0, 0.5, 0.0), (1, 1));
        assert_eq!(footprint(1.0, 0.5, 0.2), (1, 2));
        assert_eq!(footprint(1.0, 0.5, -0.2), (0, 1));
        assert_eq!(footprint(1.2, 0.5, 0.0), (1, 2));
    }
}
