//! Terrain parameter validation errors.

/// Invalid terrain configuration, reported when a generator is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// At least one noise profile is required.
    #[error("terrain needs at least one noise profile")]
    NoProfiles,

    /// A profile scale must be finite and strictly positive.
    #[error("noise profile {index} has invalid scale {scale}")]
    InvalidScale {
        /// Position of the profile in the list.
        index: usize,
        /// The rejected scale.
        scale: f64,
    },

    /// A profile weight must be finite.
    #[error("noise profile {index} has invalid weight {weight}")]
    InvalidWeight {
        /// Position of the profile in the list.
        index: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// The ruggedness band must be finite and strictly positive.
    #[error("ruggedness must be positive, got {0}")]
    InvalidRuggedness(f64),
}
