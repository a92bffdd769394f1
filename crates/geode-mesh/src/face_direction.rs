//! The six axis directions a block face can point.

use glam::{IVec3, Vec3};

/// One of the six cardinal directions a block face can point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// Face looking toward +X.
    PosX = 0,
    /// Face looking toward -X.
    NegX = 1,
    /// Top face.
    PosY = 2,
    /// Bottom face.
    NegY = 3,
    /// Face looking toward +Z.
    PosZ = 4,
    /// Face looking toward -Z.
    NegZ = 5,
}

impl FaceDirection {
    /// Every direction, in discriminant order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Unit normal as `[f32; 3]`.
    pub fn normal(self) -> [f32; 3] {
        self.offset().as_vec3().to_array()
    }

    /// Offset to the neighboring block in this direction.
    pub fn offset(self) -> IVec3 {
        match self {
            Self::PosX => IVec3::X,
            Self::NegX => IVec3::NEG_X,
            Self::PosY => IVec3::Y,
            Self::NegY => IVec3::NEG_Y,
            Self::PosZ => IVec3::Z,
            Self::NegZ => IVec3::NEG_Z,
        }
    }

    /// Position in [`FaceDirection::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Two in-plane axes `(u, v)` with `u × v` equal to the normal.
    pub fn tangents(self) -> (Vec3, Vec3) {
        match self {
            Self::PosX => (Vec3::Y, Vec3::Z),
            Self::NegX => (Vec3::Z, Vec3::Y),
            Self::PosY => (Vec3::Z, Vec3::X),
            Self::NegY => (Vec3::X, Vec3::Z),
            Self::PosZ => (Vec3::X, Vec3::Y),
            Self::NegZ => (Vec3::Y, Vec3::X),
        }
    }

    /// Face corners relative to the block center, counter-clockwise seen
    /// from outside, paired with their `(u, v)` position within the face.
    pub fn corners(self) -> [(Vec3, [f32; 2]); 4] {
        let normal = self.offset().as_vec3() * 0.5;
        let (u, v) = self.tangents();
        [
            (normal - u * 0.5 - v * 0.5, [0.0, 0.0]),
            (normal + u * 0.5 - v * 0.5, [1.0, 0.0]),
            (normal + u * 0.5 + v * 0.5, [1.0, 1.0]),
            (normal - u * 0.5 + v * 0.5, [0.0, 1.0]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_are_distinct() {
        for (i, a) in FaceDirection::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            for b in &FaceDirection::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_offsets_cancel_out() {
        let sum = FaceDirection::ALL.iter().fold(IVec3::ZERO, |acc, dir| acc + dir.offset());
        assert_eq!(sum, IVec3::ZERO);
    }

    #[test]
    fn test_neg_x_offset_points_west() {
        assert_eq!(IVec3::ZERO + FaceDirection::NegX.offset(), IVec3::new(-1, 0, 0));
    }

    #[test]
    fn test_tangents_span_face() {
        for dir in FaceDirection::ALL {
            let (u, v) = dir.tangents();
            assert_eq!(u.cross(v), Vec3::from(dir.normal()), "{dir:?}");
        }
    }

    #[test]
    fn test_corners_wind_counter_clockwise() {
        for dir in FaceDirection::ALL {
            let normal = Vec3::from(dir.normal());
            let [(a, _), (b, _), (c, _), (d, _)] = dir.corners();
            assert!((b - a).cross(c - a).dot(normal) > 0.0, "{dir:?} first triangle");
            assert!((c - a).cross(d - a).dot(normal) > 0.0, "{dir:?} second triangle");
            for corner in [a, b, c, d] {
                assert_eq!(corner.dot(normal), 0.5, "{dir:?} corner off the face plane");
            }
        }
    }
}
