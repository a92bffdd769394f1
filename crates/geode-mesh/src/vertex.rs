//! GPU-ready vertex format.

/// One mesh vertex: world position, face normal and atlas texture coordinate.
///
/// Layout (32 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` normal `[f32; 3]`
///   - `[24..32]` uv `[f32; 2]`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Unit face normal.
    pub normal: [f32; 3],
    /// Texture coordinate in the atlas, each component in `[0, 1]`.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

impl MeshVertex {
    /// Bit pattern of every component, for exact deduplication.
    pub fn key(&self) -> [u32; 8] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.uv;
        [px, py, pz, nx, ny, nz, u, v].map(f32::to_bits)
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::Zeroable;

    use super::*;

    #[test]
    fn test_vertex_casts_to_bytes() {
        let vertex = MeshVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.25, 0.5],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[28..32], &0.5f32.to_ne_bytes());
    }

    #[test]
    fn test_key_distinguishes_signed_zero() {
        let a = MeshVertex::zeroed();
        let mut b = a;
        b.normal[0] = -0.0;
        assert_ne!(a.key(), b.key());
    }
}
