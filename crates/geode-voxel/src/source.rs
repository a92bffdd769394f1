//! Read-only block access used by collision queries.

use glam::IVec3;

use crate::block::BlockType;

/// Anything that can answer "what block is at this coordinate?".
///
/// `None` means the containing chunk does not exist. Collision treats that as
/// solid, so entities cannot fall off the edge of the generated world.
pub trait BlockSource {
    /// Block at `block`, or `None` if its chunk is missing.
    fn block_at(&self, block: IVec3) -> Option<BlockType>;

    /// Solid for collision purposes: non-air, or missing.
    fn is_solid_at(&self, block: IVec3) -> bool {
        self.block_at(block).is_none_or(BlockType::is_solid)
    }
}
