//! Exposed face detection.

use geode_voxel::{BlockType, CHUNK_VOLUME, Chunk};
use glam::UVec3;

use crate::face_direction::FaceDirection;
use crate::neighborhood::ChunkNeighborhood;

/// One block face that needs geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExposedFace {
    /// Block position within the center chunk.
    pub local: UVec3,
    /// Direction the face points.
    pub direction: FaceDirection,
    /// Type of the block the face belongs to.
    pub block: BlockType,
}

/// Every face where a solid block of the center chunk touches air or a
/// missing neighbor chunk.
pub fn exposed_faces(neighborhood: &ChunkNeighborhood) -> Vec<ExposedFace> {
    let center = neighborhood.center();
    let mut faces = Vec::new();
    for index in 0..CHUNK_VOLUME {
        let local = Chunk::local_of(index);
        let block = center.get(local);
        if block.is_air() {
            continue;
        }
        for direction in FaceDirection::ALL {
            let beside = local.as_ivec3() + direction.offset();
            if neighborhood.block(beside).is_none_or(BlockType::is_air) {
                faces.push(ExposedFace {
                    local,
                    direction,
                    block,
                });
            }
        }
    }
    faces
}
