//! Chunk meshing and the bridge to an external renderer.

pub mod atlas;
pub mod chunk_mesh;
pub mod face_direction;
pub mod neighborhood;
pub mod sink;
pub mod vertex;
pub mod visible_faces;

pub use atlas::{AtlasLayout, TileRect};
pub use chunk_mesh::{ChunkMesh, MeshBuilder, mesh_chunk};
pub use face_direction::FaceDirection;
pub use neighborhood::ChunkNeighborhood;
pub use sink::{ChannelSink, RenderCommand, RenderSink};
pub use vertex::MeshVertex;
pub use visible_faces::{ExposedFace, exposed_faces};
