//! Stateless seed mixing and chunk fingerprints.
//!
//! Every random draw in terrain generation starts from a seed computed here.
//! There is no shared generator state: the same inputs always produce the same
//! seed on every thread and platform.

use geode_voxel::Chunk;
use glam::IVec3;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer. A bijective avalanche on 64 bits.
#[inline]
pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for the gradient at one lattice point of one noise scale.
///
/// The scale participates by bit pattern, so profiles at different scales
/// never share gradients even where their lattices coincide.
pub fn lattice_seed(world_seed: u64, scale: f64, lattice: IVec3) -> u64 {
    let words = [
        scale.to_bits(),
        lattice.x as u32 as u64,
        lattice.y as u32 as u64,
        lattice.z as u32 as u64,
    ];
    words.iter().fold(mix64(world_seed ^ GOLDEN_GAMMA), |acc, word| {
        mix64(acc.rotate_left(5) ^ word).wrapping_add(GOLDEN_GAMMA)
    })
}

/// FNV-1a digest of a chunk's block bytes. Used to compare generations
/// cheaply in tests and logs.
pub fn hash_chunk(chunk: &Chunk) -> u64 {
    const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

    chunk.blocks().iter().fold(FNV_OFFSET, |hash, block| {
        (hash ^ u64::from(block.0)).wrapping_mul(FNV_PRIME)
    })
}
