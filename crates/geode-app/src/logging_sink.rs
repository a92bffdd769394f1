//! A render sink for headless runs.

use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use geode_mesh::{ChunkMesh, RenderCommand, RenderSink};
use tracing::debug;

use crate::error::AppError;

/// Logs every mesh change and keeps running totals instead of drawing.
#[derive(Debug, Default)]
pub struct LoggingSink {
    created: usize,
    deleted: usize,
    triangles: usize,
}

impl LoggingSink {
    /// Meshes created so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Meshes deleted so far.
    pub fn deleted(&self) -> usize {
        self.deleted
    }

    /// Triangles across every created mesh.
    pub fn triangles(&self) -> usize {
        self.triangles
    }

    /// Apply one command received from a [`geode_mesh::ChannelSink`].
    pub fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::Create { key, mesh } => self.create_mesh(&key, &mesh),
            RenderCommand::Delete { key } => self.delete_mesh(&key),
        }
    }
}

/// Drain `receiver` into a [`LoggingSink`] on a `renderer` thread until every
/// sender is dropped. Joining the handle yields the totals.
pub fn spawn_renderer(receiver: Receiver<RenderCommand>) -> Result<JoinHandle<LoggingSink>, AppError> {
    thread::Builder::new()
        .name("renderer".to_string())
        .spawn(move || {
            let mut sink = LoggingSink::default();
            for command in receiver {
                sink.apply(command);
            }
            debug!(created = sink.created, deleted = sink.deleted, "renderer drained");
            sink
        })
        .map_err(AppError::RendererSpawn)
}

impl RenderSink for LoggingSink {
    fn create_mesh(&mut self, key: &str, mesh: &ChunkMesh) {
        self.created += 1;
        self.triangles += mesh.triangle_count();
        debug!(
            chunk = key,
            triangles = mesh.triangle_count(),
            bytes = mesh.vertex_bytes().len() + mesh.index_bytes().len(),
            "create mesh"
        );
    }

    fn delete_mesh(&mut self, key: &str) {
        self.deleted += 1;
        debug!(chunk = key, "delete mesh");
    }
}
