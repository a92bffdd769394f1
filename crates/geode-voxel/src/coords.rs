//! Block and chunk coordinate conversions.
//!
//! Blocks use the block-center convention: block `b` spans `[b - 0.5, b + 0.5]`
//! on every axis, so a world-space position maps to a block by rounding.

use glam::{IVec3, UVec3, Vec3};

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Number of blocks in one chunk (16³ = 4096).
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Chunk containing `block`. Floors toward negative infinity, so block `-1`
/// lives in chunk `-1`, not chunk `0`.
#[inline]
pub fn block_to_chunk(block: IVec3) -> IVec3 {
    IVec3::new(
        block.x.div_euclid(CHUNK_SIZE),
        block.y.div_euclid(CHUNK_SIZE),
        block.z.div_euclid(CHUNK_SIZE),
    )
}

/// Position of `block` inside its chunk, each component in `0..CHUNK_SIZE`.
#[inline]
pub fn block_to_local(block: IVec3) -> UVec3 {
    UVec3::new(
        block.x.rem_euclid(CHUNK_SIZE) as u32,
        block.y.rem_euclid(CHUNK_SIZE) as u32,
        block.z.rem_euclid(CHUNK_SIZE) as u32,
    )
}

/// World coordinate of the chunk's first (minimum-corner) block.
#[inline]
pub fn chunk_origin(chunk: IVec3) -> IVec3 {
    chunk * CHUNK_SIZE
}

/// Block whose unit cube contains the world-space `position`.
#[inline]
pub fn position_to_block(position: Vec3) -> IVec3 {
    (position + Vec3::splat(0.5)).floor().as_ivec3()
}

/// Squared Euclidean distance between two chunk coordinates.
///
/// Uses `i64` to avoid overflow for distant chunks.
#[inline]
pub fn chunk_distance_sq(a: IVec3, b: IVec3) -> i64 {
    let d = (a - b).as_i64vec3();
    d.x * d.x + d.y * d.y + d.z * d.z
}

/// Every chunk within Euclidean `radius` (inclusive) of `center`, nearest
/// first. Ties are broken by coordinate so the order is deterministic.
pub fn chunks_in_sphere(center: IVec3, radius: u32) -> Vec<IVec3> {
    let r = radius as i32;
    let r_sq = i64::from(radius) * i64::from(radius);
    let mut result = Vec::new();

    for dx in -r..=r {
        for dy in -r..=r {
            for dz in -r..=r {
                let coord = center + IVec3::new(dx, dy, dz);
                if chunk_distance_sq(coord, center) <= r_sq {
                    result.push(coord);
                }
            }
        }
    }

    result.sort_by_key(|c| (chunk_distance_sq(*c, center), c.x, c.y, c.z));
    result
}

/// Stable string key for a chunk, `"x,y,z"`. Used to name meshes handed to
/// the renderer.
pub fn chunk_key(chunk: IVec3) -> String {
    format!("{},{},{}", chunk.x, chunk.y, chunk.z)
}
