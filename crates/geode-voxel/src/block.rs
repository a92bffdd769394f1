//! Block type identifiers.

/// One byte of terrain category. `0` is air; every other value is solid.
///
/// Values beyond the named constants are opaque categories. Meshing and
/// physics only care whether a block is air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockType(pub u8);

impl BlockType {
    /// Empty space.
    pub const AIR: Self = Self(0);
    /// Core material found deep underground.
    pub const STONE: Self = Self(1);
    /// Near-surface material.
    pub const SOIL: Self = Self(2);
    /// Soil exposed to open air above.
    pub const GRASS: Self = Self(3);

    /// Returns `true` for air.
    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }

    /// Returns `true` for anything that is not air.
    #[inline]
    pub fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Human-readable name for the built-in categories.
    pub fn name(self) -> &'static str {
        match self {
            Self::AIR => "air",
            Self::STONE => "stone",
            Self::SOIL => "soil",
            Self::GRASS => "grass",
            _ => "unknown",
        }
    }
}

impl From<u8> for BlockType {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
