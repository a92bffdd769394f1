//! Texture atlas addressing.
//!
//! The atlas is a square grid of equally sized tiles. Block type `n` uses
//! slot `n - 1`; air has no tile.

use geode_voxel::BlockType;

/// Texture rectangle of one atlas tile, in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRect {
    /// Lower corner.
    pub min: [f32; 2],
    /// Side length.
    pub size: f32,
}

impl TileRect {
    /// Atlas coordinate of a point `(u, v)` in `[0, 1]²` within the tile.
    pub fn uv(&self, within: [f32; 2]) -> [f32; 2] {
        [
            self.min[0] + within[0] * self.size,
            self.min[1] + within[1] * self.size,
        ]
    }
}

/// Atlas texture name and grid size.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasLayout {
    /// Texture the renderer binds for chunk meshes.
    pub texture: String,
    /// Tiles per row (and per column).
    pub tiles_per_row: u32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self {
            texture: "blocks.png".to_string(),
            tiles_per_row: 4,
        }
    }
}

impl AtlasLayout {
    /// Atlas slot for a block type, or `None` for air.
    pub fn slot(&self, block: BlockType) -> Option<u32> {
        u32::from(block.0).checked_sub(1)
    }

    /// Tile rectangle for a block type, or `None` for air.
    pub fn tile(&self, block: BlockType) -> Option<TileRect> {
        let per_row = self.tiles_per_row.max(1);
        let slot = self.slot(block)?;
        let size = 1.0 / per_row as f32;
        Some(TileRect {
            min: [
                (slot % per_row) as f32 * size,
                (slot / per_row) as f32 * size,
            ],
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_is_block_minus_one() {
        let atlas = AtlasLayout::default();
        assert_eq!(atlas.slot(BlockType::AIR), None);
        assert_eq!(atlas.slot(BlockType::STONE), Some(0));
        assert_eq!(atlas.slot(BlockType::GRASS), Some(2));
    }

    #[test]
    fn test_tile_wraps_rows() {
        let atlas = AtlasLayout {
            tiles_per_row: 2,
            ..AtlasLayout::default()
        };
        let tile = atlas.tile(BlockType::GRASS).unwrap();
        assert_eq!(tile.min, [0.0, 0.5]);
        assert_eq!(tile.size, 0.5);
        assert_eq!(tile.uv([1.0, 1.0]), [0.5, 1.0]);
        assert!(atlas.tile(BlockType::AIR).is_none());
    }
}
