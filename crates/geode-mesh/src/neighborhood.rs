//! Owned snapshot of a chunk and its six face neighbors.
//!
//! [`ChunkNeighborhood`] is copied out of the world while holding one shard
//! lock at a time, then meshed without any lock. Edge and corner neighbors
//! are never needed: face culling only looks one block along one axis.

use geode_voxel::{BlockType, CHUNK_SIZE, ChunkSnapshot};
use glam::IVec3;

use crate::face_direction::FaceDirection;

/// A center chunk plus whichever face neighbors existed at capture time.
#[derive(Clone, Debug)]
pub struct ChunkNeighborhood {
    coord: IVec3,
    center: ChunkSnapshot,
    /// Indexed by [`FaceDirection::index`].
    neighbors: [Option<ChunkSnapshot>; 6],
}

impl ChunkNeighborhood {
    /// Build from already captured snapshots.
    pub fn new(coord: IVec3, center: ChunkSnapshot, neighbors: [Option<ChunkSnapshot>; 6]) -> Self {
        Self {
            coord,
            center,
            neighbors,
        }
    }

    /// Capture the neighborhood of `coord` through `fetch`. Returns `None` if
    /// the center chunk itself is missing.
    pub fn capture(coord: IVec3, mut fetch: impl FnMut(IVec3) -> Option<ChunkSnapshot>) -> Option<Self> {
        let center = fetch(coord)?;
        let neighbors = FaceDirection::ALL.map(|dir| fetch(coord + dir.offset()));
        Some(Self::new(coord, center, neighbors))
    }

    /// Chunk coordinate of the center.
    pub fn coord(&self) -> IVec3 {
        self.coord
    }

    /// The center chunk's blocks.
    pub fn center(&self) -> &ChunkSnapshot {
        &self.center
    }

    /// Neighbor snapshot in `direction`, if it existed at capture time.
    pub fn neighbor(&self, direction: FaceDirection) -> Option<&ChunkSnapshot> {
        self.neighbors[direction.index()].as_ref()
    }

    /// Directions whose neighbor chunk was missing.
    pub fn missing_neighbors(&self) -> Vec<FaceDirection> {
        FaceDirection::ALL
            .into_iter()
            .filter(|dir| self.neighbors[dir.index()].is_none())
            .collect()
    }

    /// Block at a center-relative local position. Positions one step past a
    /// single face read from that neighbor. Returns `None` for missing
    /// neighbors and for anything further out.
    pub fn block(&self, local: IVec3) -> Option<BlockType> {
        if let Some(block) = self.center.get_signed(local) {
            return Some(block);
        }
        let size = CHUNK_SIZE;
        let direction = match (local.x, local.y, local.z) {
            (x, y, z) if x == size && in_range(y) && in_range(z) => FaceDirection::PosX,
            (-1, y, z) if in_range(y) && in_range(z) => FaceDirection::NegX,
            (x, y, z) if y == size && in_range(x) && in_range(z) => FaceDirection::PosY,
            (x, -1, z) if in_range(x) && in_range(z) => FaceDirection::NegY,
            (x, y, z) if z == size && in_range(x) && in_range(y) => FaceDirection::PosZ,
            (x, y, -1) if in_range(x) && in_range(y) => FaceDirection::NegZ,
            _ => return None,
        };
        let wrapped = local - direction.offset() * size;
        self.neighbor(direction)?.get_signed(wrapped)
    }
}

#[inline]
fn in_range(v: i32) -> bool {
    (0..CHUNK_SIZE).contains(&v)
}

#[cfg(test)]
mod tests {
    use geode_voxel::Chunk;
    use glam::UVec3;

    use super::*;

    fn marked(block: UVec3) -> ChunkSnapshot {
        let mut chunk = Chunk::new();
        chunk.set(block, BlockType::STONE);
        chunk.snapshot()
    }

    #[test]
    fn test_center_lookup() {
        let hood = ChunkNeighborhood::new(IVec3::ZERO, marked(UVec3::new(3, 4, 5)), Default::default());
        assert_eq!(hood.block(IVec3::new(3, 4, 5)), Some(BlockType::STONE));
        assert_eq!(hood.block(IVec3::new(0, 0, 0)), Some(BlockType::AIR));
    }

    #[test]
    fn test_lookup_wraps_into_face_neighbor() {
        let mut neighbors: [Option<ChunkSnapshot>; 6] = Default::default();
        neighbors[FaceDirection::PosX.index()] = Some(marked(UVec3::new(0, 2, 2)));
        neighbors[FaceDirection::NegY.index()] = Some(marked(UVec3::new(7, 15, 1)));
        let hood = ChunkNeighborhood::new(IVec3::ZERO, Chunk::new().snapshot(), neighbors);

        assert_eq!(hood.block(IVec3::new(16, 2, 2)), Some(BlockType::STONE));
        assert_eq!(hood.block(IVec3::new(7, -1, 1)), Some(BlockType::STONE));
        assert_eq!(hood.block(IVec3::new(16, 3, 2)), Some(BlockType::AIR));
    }

    #[test]
    fn test_missing_and_diagonal_lookups_are_none() {
        let mut neighbors: [Option<ChunkSnapshot>; 6] = Default::default();
        neighbors[FaceDirection::PosX.index()] = Some(Chunk::new().snapshot());
        let hood = ChunkNeighborhood::new(IVec3::ZERO, Chunk::new().snapshot(), neighbors);

        assert_eq!(hood.block(IVec3::new(-1, 0, 0)), None, "missing neighbor");
        assert_eq!(hood.block(IVec3::new(16, 16, 0)), None, "edge neighbor");
        assert_eq!(hood.block(IVec3::new(17, 0, 0)), None, "two chunks out");
        assert_eq!(hood.missing_neighbors().len(), 5);
        assert!(!hood.missing_neighbors().contains(&FaceDirection::PosX));
    }

    #[test]
    fn test_capture_requires_center() {
        assert!(ChunkNeighborhood::capture(IVec3::ZERO, |_| None).is_none());

        let hood = ChunkNeighborhood::capture(IVec3::new(1, 0, 0), |c| {
            (c.x >= 1).then(|| Chunk::new().snapshot())
        })
        .unwrap();
        assert_eq!(hood.coord(), IVec3::new(1, 0, 0));
        assert_eq!(hood.missing_neighbors(), vec![FaceDirection::NegX]);
    }
}
