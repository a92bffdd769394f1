//! Host errors.

use geode_config::ConfigError;
use geode_terrain::TerrainError;
use geode_voxel::WorldError;

/// Everything that can stop a session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Loading or saving the config failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The terrain parameters were rejected.
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// A world operation failed, usually spawning the player.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A background manager thread panicked, or never started. The manager
    /// is gone either way.
    #[error("the {0} manager is gone (its thread panicked or failed to start)")]
    ManagerPanicked(&'static str),

    /// The renderer thread could not be started.
    #[error("failed to start the renderer thread")]
    RendererSpawn(#[source] std::io::Error),

    /// The renderer thread panicked before draining its channel.
    #[error("the renderer thread panicked")]
    RendererPanicked,
}
