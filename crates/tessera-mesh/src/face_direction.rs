//! The six axis-aligned faces of a voxel, in mesh emission order.

/// One of the six directions a voxel face can point.
///
/// The `repr(u8)` discriminant doubles as the bit index inside
/// [`super::VisibleFaces`] and matches the order faces are emitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +Y.
    Top = 0,
    /// +X.
    Right = 1,
    /// −X.
    Left = 2,
    /// +Z.
    Front = 3,
    /// −Z.
    Back = 4,
    /// −Y.
    Bottom = 5,
}

impl FaceDirection {
    /// All six directions in emission order.
    pub const ALL: [FaceDirection; 6] = [
        Self::Top,
        Self::Right,
        Self::Left,
        Self::Front,
        Self::Back,
        Self::Bottom,
    ];

    /// Cube-corner indices (into [`crate::CUBE_CORNERS`]) for the two triangles
    /// of this face. The winding is fixed; renderers derive outward normals from it.
    pub const fn triangle_corners(self) -> [usize; 6] {
        match self {
            Self::Top => [7, 6, 5, 7, 5, 4],
            Self::Right => [5, 6, 2, 1, 5, 2],
            Self::Left => [7, 4, 0, 3, 7, 0],
            Self::Front => [6, 7, 3, 2, 6, 3],
            Self::Back => [0, 4, 5, 5, 1, 0],
            Self::Bottom => [3, 0, 1, 2, 3, 1],
        }
    }

    /// Unit offset to the neighbor across this face.
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Self::Top => (0, 1, 0),
            Self::Right => (1, 0, 0),
            Self::Left => (-1, 0, 0),
            Self::Front => (0, 0, 1),
            Self::Back => (0, 0, -1),
            Self::Bottom => (0, -1, 0),
        }
    }

    /// Returns the neighbor coordinate across this face.
    pub fn offset(self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        let (dx, dy, dz) = self.delta();
        (x + dx, y + dy, z + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_directions_unique() {
        for (i, a) in FaceDirection::ALL.iter().enumerate() {
            for (j, b) in FaceDirection::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, dir) in FaceDirection::ALL.iter().enumerate() {
            assert_eq!(*dir as usize, i);
        }
    }

    #[test]
    fn test_offset_right_and_left() {
        assert_eq!(FaceDirection::Right.offset(5, 10, 15), (6, 10, 15));
        assert_eq!(FaceDirection::Left.offset(0, 0, 0), (-1, 0, 0));
    }

    /// Every corner used by a face lies on that face's plane.
    #[test]
    fn test_triangle_corners_lie_on_face_plane() {
        use crate::CUBE_CORNERS;
        for dir in FaceDirection::ALL {
            let (dx, dy, dz) = dir.delta();
            let n = [dx, dy, dz];
            let axis = n.iter().position(|c| *c != 0).unwrap();
            let plane = if n[axis] > 0 { 1.0 } else { 0.0 };
            for corner in dir.triangle_corners() {
                assert_eq!(CUBE_CORNERS[corner][axis], plane, "{dir:?} corner {corner}");
            }
        }
    }
}
