use geode_voxel::{block_to_chunk, chunk_distance_sq, chunks_in_sphere};
use glam::IVec3;
use rustc_hash::FxHashSet;

/// Origin, radius and realm shared by every god.
#[derive(Clone, Debug, Default)]
pub struct Domain {
    /// Block coordinate the domain is centered on.
    pub origin: IVec3,
    /// Radius in chunks.
    pub radius: u32,
    /// Chunks already handled.
    pub realm: FxHashSet<IVec3>,
}

impl Domain {
    /// An empty realm around `origin`.
    pub fn new(origin: IVec3, radius: u32) -> Self {
        Self {
            origin,
            radius,
            realm: FxHashSet::default(),
        }
    }

    /// Chunk containing the origin.
    pub fn center_chunk(&self) -> IVec3 {
        block_to_chunk(self.origin)
    }

    /// Returns `true` if `chunk` lies within `radius + allowance` chunks of
    /// the center.
    pub fn within(&self, chunk: IVec3, allowance: u32) -> bool {
        let reach = i64::from(self.radius) + i64::from(allowance);
        chunk_distance_sq(chunk, self.center_chunk()) <= reach * reach
    }

    /// Every chunk in the domain, nearest first.
    pub fn chunks(&self) -> Vec<IVec3> {
        chunks_in_sphere(self.center_chunk(), self.radius)
    }
}

/// Common contract of the domain managers.
pub trait God: Send {
    /// Shared domain state.
    fn domain(&self) -> &Domain;

    /// Shared domain state, mutably.
    fn domain_mut(&mut self) -> &mut Domain;

    /// Do one round of work. Returns how many units of work were done.
    fn update(&mut self) -> usize;

    /// Short name for logs and thread names.
    fn name(&self) -> &'static str;

    /// Move the domain to be centered on a block coordinate.
    fn set_origin(&mut self, origin: IVec3) {
        self.domain_mut().origin = origin;
    }

    /// Change the domain radius, in chunks.
    fn set_radius(&mut self, radius: u32) {
        self.domain_mut().radius = radius;
    }

    /// Block coordinate the domain is centered on.
    fn origin(&self) -> IVec3 {
        self.domain().origin
    }

    /// Radius in chunks.
    fn radius(&self) -> u32 {
        self.domain().radius
    }

    /// Chunks already handled.
    fn realm(&self) -> &FxHashSet<IVec3> {
        &self.domain().realm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_chunk_follows_origin() {
        let domain = Domain::new(IVec3::new(-1, 20, 33), 2);
        assert_eq!(domain.center_chunk(), IVec3::new(-1, 1, 2));
    }

    #[test]
    fn test_within_uses_euclidean_distance() {
        let domain = Domain::new(IVec3::ZERO, 2);
        assert!(domain.within(IVec3::new(2, 0, 0), 0));
        assert!(!domain.within(IVec3::new(2, 1, 0), 0), "d² = 5 > 4");
        assert!(domain.within(IVec3::new(2, 1, 0), 1));
        assert!(domain.chunks().iter().all(|c| domain.within(*c, 0)));
    }
}
