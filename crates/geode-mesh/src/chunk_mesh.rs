//! Chunk mesh data and the face-by-face builder that produces it.

use geode_voxel::chunk_origin;
use glam::Vec3;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::atlas::{AtlasLayout, TileRect};
use crate::face_direction::FaceDirection;
use crate::neighborhood::ChunkNeighborhood;
use crate::vertex::MeshVertex;
use crate::visible_faces::exposed_faces;

/// Triangle corners of a face quad, two counter-clockwise triangles.
const FACE_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// The mesh output of a chunk meshing pass, ready for upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// Atlas texture the uvs refer to.
    pub texture: String,
}

impl ChunkMesh {
    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of block faces (two triangles each).
    pub fn face_count(&self) -> usize {
        self.indices.len() / FACE_TRIANGLES.len()
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Accumulates faces into an indexed mesh, sharing identical vertices.
#[derive(Default)]
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    lookup: FxHashMap<[u32; 8], u32>,
}

impl MeshBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `vertex`, adding it if no identical vertex exists yet.
    pub fn push_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let next = self.vertices.len() as u32;
        let index = *self.lookup.entry(vertex.key()).or_insert(next);
        if index == next {
            self.vertices.push(vertex);
        }
        index
    }

    /// Emit one face of the block centered at `center`: six vertex
    /// references forming two triangles.
    pub fn push_face(&mut self, center: Vec3, direction: FaceDirection, tile: TileRect) {
        let normal = direction.normal();
        let corners = direction.corners().map(|(offset, within)| {
            self.push_vertex(MeshVertex {
                position: (center + offset).to_array(),
                normal,
                uv: tile.uv(within),
            })
        });
        self.indices
            .extend(FACE_TRIANGLES.iter().map(|&corner| corners[corner]));
    }

    /// Unique vertices so far.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Finish the mesh.
    pub fn build(self, texture: impl Into<String>) -> ChunkMesh {
        ChunkMesh {
            vertices: self.vertices,
            indices: self.indices,
            texture: texture.into(),
        }
    }
}

/// Mesh every exposed face of the neighborhood's center chunk, in world
/// coordinates.
pub fn mesh_chunk(neighborhood: &ChunkNeighborhood, atlas: &AtlasLayout) -> ChunkMesh {
    let origin = chunk_origin(neighborhood.coord()).as_vec3();
    let mut builder = MeshBuilder::new();
    let faces = exposed_faces(neighborhood);
    for face in &faces {
        let Some(tile) = atlas.tile(face.block) else {
            continue;
        };
        builder.push_face(origin + face.local.as_vec3(), face.direction, tile);
    }
    debug!(
        chunk = %neighborhood.coord(),
        faces = faces.len(),
        vertices = builder.vertex_count(),
        "meshed chunk"
    );
    builder.build(atlas.texture.clone())
}

#[cfg(test)]
mod tests {
    use geode_voxel::{BlockType, Chunk, ChunkSnapshot};
    use glam::{IVec3, UVec3};

    use super::*;

    fn lone_block(coord: IVec3, local: UVec3) -> ChunkNeighborhood {
        let mut center = Chunk::new();
        center.set(local, BlockType::STONE);
        let air: [Option<ChunkSnapshot>; 6] = std::array::from_fn(|_| Some(Chunk::new().snapshot()));
        ChunkNeighborhood::new(coord, center.snapshot(), air)
    }

    #[test]
    fn test_empty_builder() {
        let mesh = MeshBuilder::new().build("atlas");
        assert!(mesh.is_empty());
        assert_eq!(mesh.texture, "atlas");
        assert!(mesh.vertex_bytes().is_empty());
    }

    #[test]
    fn test_single_face_emits_six_references() {
        let mut builder = MeshBuilder::new();
        let tile = AtlasLayout::default().tile(BlockType::STONE).unwrap();
        builder.push_face(Vec3::ZERO, FaceDirection::PosY, tile);
        let mesh = builder.build("atlas");
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.5));
    }

    #[test]
    fn test_identical_vertices_are_shared() {
        let mut builder = MeshBuilder::new();
        let tile = AtlasLayout::default().tile(BlockType::STONE).unwrap();
        builder.push_face(Vec3::ZERO, FaceDirection::PosX, tile);
        builder.push_face(Vec3::ZERO, FaceDirection::PosX, tile);
        let mesh = builder.build("atlas");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(mesh.indices[..6], mesh.indices[6..]);
    }

    #[test]
    fn test_cube_mesh_in_world_space() {
        let hood = lone_block(IVec3::new(1, 0, -1), UVec3::new(2, 3, 4));
        let mesh = mesh_chunk(&hood, &AtlasLayout::default());

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        // Each face has its own normal, so no corner is shared across faces.
        assert_eq!(mesh.vertices.len(), 24);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

        let center = Vec3::new(18.0, 3.0, -12.0);
        for vertex in &mesh.vertices {
            let offset = Vec3::from(vertex.position) - center;
            assert_eq!(offset.abs(), Vec3::splat(0.5), "corner {offset}");
        }
        assert_eq!(mesh.vertex_bytes().len(), 24 * 32);
        assert_eq!(mesh.index_bytes().len(), 36 * 4);
    }

    #[test]
    fn test_uvs_stay_inside_tile() {
        let atlas = AtlasLayout::default();
        let tile = atlas.tile(BlockType::STONE).unwrap();
        let mesh = mesh_chunk(&lone_block(IVec3::ZERO, UVec3::ZERO), &atlas);
        for vertex in &mesh.vertices {
            for (axis, value) in vertex.uv.iter().enumerate() {
                assert!(
                    (tile.min[axis]..=tile.min[axis] + tile.size).contains(value),
                    "uv {:?} outside tile",
                    vertex.uv
                );
            }
        }
    }
}
