//! World store errors.

use glam::IVec3;

/// Errors returned by entity operations on the [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The entity's position lies in a chunk that has not been generated.
    #[error("cannot spawn `{name}`: chunk {chunk} has not been generated")]
    ChunkNotGenerated {
        /// Entity name.
        name: String,
        /// Chunk containing the requested position.
        chunk: IVec3,
    },

    /// Another entity already uses this name.
    #[error("an entity named `{0}` already exists")]
    DuplicateName(String),

    /// No entity is registered under this name.
    #[error("no entity named `{0}`")]
    UnknownEntity(String),
}
