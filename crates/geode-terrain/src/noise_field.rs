//! Per-chunk gradient noise cache.
//!
//! A [`NoiseLattice`] holds one unit gradient per integer lattice point in the
//! smallest box that covers a block range at a given scale. Sampling finds the
//! enclosing lattice cell, dots each corner gradient with the offset to the
//! sample point, and blends the eight results with the smoothstep fade
//! `3t² − 2t³`.
//!
//! Gradients come from [`gradient`], a pure function of
//! `(seed, scale, lattice point)`. Two lattices built for neighboring chunks
//! therefore hold bit-identical vectors wherever they overlap.
//!
//! Sampling outside the cached box panics. A clamped or wrapped lookup would
//! silently produce seams at chunk borders.

use geode_voxel::{CHUNK_SIZE, chunk_origin};
use glam::{DVec3, IVec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::seed::lattice_seed;

/// Unit gradient vector at `lattice` for the given seed and scale.
///
/// Seeds a ChaCha8 stream from the inputs, draws three uniforms, centers them
/// on zero and normalizes. A zero-length draw (measure-zero) is redrawn from
/// the same stream, which keeps the result deterministic.
pub fn gradient(seed: u64, scale: f64, lattice: IVec3) -> DVec3 {
    let mut rng = ChaCha8Rng::seed_from_u64(lattice_seed(seed, scale, lattice));
    loop {
        let x = rng.random::<f64>() - 0.5;
        let y = rng.random::<f64>() - 0.5;
        let z = rng.random::<f64>() - 0.5;
        let v = DVec3::new(x, y, z);
        let length_sq = v.length_squared();
        if length_sq > 1e-12 {
            return v / libm::sqrt(length_sq);
        }
    }
}

/// Smoothstep fade `3t² − 2t³`.
///
/// # Panics
///
/// If `t` is outside `[0, 1]`.
#[inline]
pub fn fade(t: f64) -> f64 {
    assert!(
        (0.0..=1.0).contains(&t),
        "interpolation weight {t} outside [0, 1]"
    );
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Gradient cache over a lattice box, valid for one scale and one seed.
#[derive(Clone, Debug)]
pub struct NoiseLattice {
    scale: f64,
    min: IVec3,
    max: IVec3,
    extent: IVec3,
    gradients: Vec<DVec3>,
}

impl NoiseLattice {
    /// Lattice covering every block of `chunk`.
    pub fn for_chunk(seed: u64, scale: f64, chunk: IVec3) -> Self {
        let origin = chunk_origin(chunk);
        Self::covering(seed, scale, origin, origin + IVec3::splat(CHUNK_SIZE - 1))
    }

    /// Lattice covering the inclusive block range `first..=last`.
    ///
    /// The lower corner is `floor(first / scale)`. The upper corner is
    /// `floor(last / scale) + 1`, so the cell of the last block has both of
    /// its corners in range even when that block sits exactly on a lattice
    /// line.
    ///
    /// # Panics
    ///
    /// If `scale` is not finite and positive, or `first > last` on any axis.
    pub fn covering(seed: u64, scale: f64, first: IVec3, last: IVec3) -> Self {
        assert!(
            scale.is_finite() && scale > 0.0,
            "noise scale must be finite and positive, got {scale}"
        );
        assert!(
            first.cmple(last).all(),
            "empty block range {first}..={last}"
        );

        let min = (first.as_dvec3() / scale).floor().as_ivec3();
        let max = (last.as_dvec3() / scale).floor().as_ivec3() + IVec3::ONE;
        let extent = max - min + IVec3::ONE;

        let mut gradients = Vec::with_capacity((extent.x * extent.y * extent.z) as usize);
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    gradients.push(gradient(seed, scale, IVec3::new(x, y, z)));
                }
            }
        }

        Self {
            scale,
            min,
            max,
            extent,
            gradients,
        }
    }

    /// Block units per lattice cell.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Lowest cached lattice point.
    pub fn min(&self) -> IVec3 {
        self.min
    }

    /// Highest cached lattice point (inclusive).
    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Number of cached gradients.
    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    /// Returns `true` if no gradients are cached. Never true for a lattice
    /// built by the constructors.
    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    /// Returns `true` if `lattice` lies inside the cached box.
    #[inline]
    pub fn contains(&self, lattice: IVec3) -> bool {
        lattice.cmpge(self.min).all() && lattice.cmple(self.max).all()
    }

    /// Array offset of a lattice point.
    ///
    /// # Panics
    ///
    /// If the point is outside the cached box.
    #[inline]
    pub fn offset(&self, lattice: IVec3) -> usize {
        assert!(
            self.contains(lattice),
            "lattice point {lattice} outside cached bounds {}..={}",
            self.min,
            self.max
        );
        let d = lattice - self.min;
        ((d.z * self.extent.y + d.y) * self.extent.x + d.x) as usize
    }

    /// Cached gradient at a lattice point.
    #[inline]
    pub fn gradient_at(&self, lattice: IVec3) -> DVec3 {
        self.gradients[self.offset(lattice)]
    }

    /// Noise value at a block coordinate.
    pub fn sample(&self, block: IVec3) -> f64 {
        self.sample_point(block.as_dvec3())
    }

    /// Noise value at an arbitrary point in block space.
    ///
    /// # Panics
    ///
    /// If the enclosing lattice cell is not fully cached.
    pub fn sample_point(&self, point: DVec3) -> f64 {
        let p = point / self.scale;
        let cell = p.floor();
        let base = cell.as_ivec3();
        let t = p - cell;

        let corner = |dx: i32, dy: i32, dz: i32| {
            let offset = IVec3::new(dx, dy, dz);
            self.gradient_at(base + offset)
                .dot(t - offset.as_dvec3())
        };

        let d000 = corner(0, 0, 0);
        let d100 = corner(1, 0, 0);
        let d010 = corner(0, 1, 0);
        let d110 = corner(1, 1, 0);
        let d001 = corner(0, 0, 1);
        let d101 = corner(1, 0, 1);
        let d011 = corner(0, 1, 1);
        let d111 = corner(1, 1, 1);

        let u = fade(t.x);
        let v = fade(t.y);
        let w = fade(t.z);

        lerp(
            w,
            lerp(v, lerp(u, d000, d100), lerp(u, d010, d110)),
            lerp(v, lerp(u, d001, d101), lerp(u, d011, d111)),
        )
    }

    /// Re-derive every cached gradient from scratch and compare bitwise.
    pub fn is_consistent(&self, seed: u64) -> bool {
        let mut i = 0;
        for z in self.min.z..=self.max.z {
            for y in self.min.y..=self.max.y {
                for x in self.min.x..=self.max.x {
                    let fresh = gradient(seed, self.scale, IVec3::new(x, y, z));
                    if fresh.to_array().map(f64::to_bits)
                        != self.gradients[i].to_array().map(f64::to_bits)
                    {
                        return false;
                    }
                    i += 1;
                }
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "noise_field_tests.rs"]
mod tests;
