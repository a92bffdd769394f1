//! Renderer-facing output.
//!
//! Meshes are handed to a [`RenderSink`] keyed by `chunk_key` strings
//! (`"x,y,z"`). The sink owns GPU resources; this crate never touches them.

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::chunk_mesh::ChunkMesh;

/// Anything that can take chunk meshes for display.
pub trait RenderSink {
    /// Create or replace the mesh stored under `key`.
    fn create_mesh(&mut self, key: &str, mesh: &ChunkMesh);
    /// Drop the mesh stored under `key`. Unknown keys are ignored.
    fn delete_mesh(&mut self, key: &str);
}

/// A mesh change sent to a renderer thread.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Create or replace a mesh.
    Create {
        /// Chunk key.
        key: String,
        /// Mesh data.
        mesh: ChunkMesh,
    },
    /// Drop a mesh.
    Delete {
        /// Chunk key.
        key: String,
    },
}

impl RenderCommand {
    /// Chunk key the command refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Create { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Forwards mesh changes over a channel to a renderer running elsewhere.
pub struct ChannelSink {
    sender: Sender<RenderCommand>,
}

impl ChannelSink {
    /// Creates a sink and the receiver the renderer drains.
    pub fn new() -> (Self, Receiver<RenderCommand>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, command: RenderCommand) {
        if self.sender.send(command).is_err() {
            warn!("render command dropped: receiver disconnected");
        }
    }
}

impl RenderSink for ChannelSink {
    fn create_mesh(&mut self, key: &str, mesh: &ChunkMesh) {
        self.send(RenderCommand::Create {
            key: key.to_string(),
            mesh: mesh.clone(),
        });
    }

    fn delete_mesh(&mut self, key: &str) {
        self.send(RenderCommand::Delete {
            key: key.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards_in_order() {
        let (mut sink, receiver) = ChannelSink::new();
        let mesh = ChunkMesh {
            texture: "atlas".to_string(),
            ..ChunkMesh::default()
        };
        sink.delete_mesh("0,0,0");
        sink.create_mesh("1,0,0", &mesh);

        let commands: Vec<RenderCommand> = receiver.try_iter().collect();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            RenderCommand::Delete {
                key: "0,0,0".to_string()
            }
        );
        assert_eq!(commands[1].key(), "1,0,0");
        assert!(matches!(&commands[1], RenderCommand::Create { mesh: m, .. } if m.texture == "atlas"));
    }

    #[test]
    fn test_disconnected_receiver_is_not_fatal() {
        let (mut sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.delete_mesh("0,0,0");
    }
}
