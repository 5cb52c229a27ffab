//! Chunk mesh buffers: positions, per-vertex colors, and a triangle index list.

use glam::{IVec3, Vec3};
use tessera_voxel::Rgba8;

use crate::face_direction::FaceDirection;

/// Largest vertex count addressable by a 16-bit index buffer.
///
/// Meshes above this still build, but many renderers will not draw them.
pub const MAX_INDEXABLE_VERTICES: usize = 65_535;

/// Each face is two unshared triangles.
pub const VERTICES_PER_FACE: usize = 6;

/// Corners of the unit cube, indexed by [`FaceDirection::triangle_corners`].
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Metadata for one emitted face, for statistics and debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceInfo {
    pub direction: FaceDirection,
    /// Chunk-local cell the face belongs to.
    pub cell: IVec3,
}

/// The mesh output of a chunk meshing pass.
///
/// `positions` and `colors` are parallel arrays. `indices` holds one triple per
/// triangle; faces are not shared, so the index list is `0..vertex_count`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<Rgba8>,
    pub indices: Vec<u32>,
    pub faces: Vec<FaceInfo>,
}

impl ChunkMesh {
    /// Creates an empty mesh with room for `faces` faces.
    pub fn with_face_capacity(faces: usize) -> Self {
        let vertices = faces * VERTICES_PER_FACE;
        Self {
            positions: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Appends one face (two triangles, six vertices) of the cell at `cell`,
    /// flat-colored with `color`. Positions are cube corners offset by the cell
    /// and scaled per axis by `scale`.
    pub fn push_face(&mut self, direction: FaceDirection, cell: IVec3, scale: Vec3, color: Rgba8) {
        let offset = cell.as_vec3();
        for corner in direction.triangle_corners() {
            let p = (Vec3::from_array(CUBE_CORNERS[corner]) + offset) * scale;
            self.indices.push(self.positions.len() as u32);
            self.positions.push(p.to_array());
            self.colors.push(color);
        }
        self.faces.push(FaceInfo { direction, cell });
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the total number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Counts the number of faces emitted for a specific direction.
    pub fn count_faces_for_direction(&self, direction: FaceDirection) -> usize {
        self.faces
            .iter()
            .filter(|f| f.direction == direction)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns `true` if the mesh has more vertices than `limit`.
    pub fn exceeds_vertex_limit(&self, limit: usize) -> bool {
        self.vertex_count() > limit
    }

    /// Raw bytes of the position buffer, ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the color buffer, ready for upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw bytes of the index buffer, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = ChunkMesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.indices.len(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_push_single_face() {
        let mut mesh = ChunkMesh::default();
        mesh.push_face(FaceDirection::Top, IVec3::ZERO, Vec3::ONE, Rgba8::RED);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.colors, vec![Rgba8::RED; 6]);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_top_face_positions_follow_corner_table() {
        let mut mesh = ChunkMesh::default();
        mesh.push_face(
            FaceDirection::Top,
            IVec3::new(1, 2, 3),
            Vec3::new(2.0, 1.0, 0.5),
            Rgba8::RED,
        );
        // Corner 7 is (0,1,1): offset (1,3,4), scaled (2,3,2).
        assert_eq!(mesh.positions[0], [2.0, 3.0, 2.0]);
        // Corner 6 is (1,1,1): offset (2,3,4), scaled (4,3,2).
        assert_eq!(mesh.positions[1], [4.0, 3.0, 2.0]);
        // Corner 4 is (0,1,0): offset (1,3,3), scaled (2,3,1.5).
        assert_eq!(mesh.positions[5], [2.0, 3.0, 1.5]);
    }

    #[test]
    fn test_count_faces_by_direction() {
        let mut mesh = ChunkMesh::default();
        mesh.push_face(FaceDirection::Top, IVec3::ZERO, Vec3::ONE, Rgba8::RED);
        mesh.push_face(FaceDirection::Top, IVec3::X, Vec3::ONE, Rgba8::RED);
        mesh.push_face(FaceDirection::Bottom, IVec3::ZERO, Vec3::ONE, Rgba8::RED);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::Top), 2);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::Bottom), 1);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::Right), 0);
    }

    #[test]
    fn test_byte_views_cover_whole_buffers() {
        let mut mesh = ChunkMesh::default();
        mesh.push_face(FaceDirection::Back, IVec3::ZERO, Vec3::ONE, Rgba8::BLUE);
        assert_eq!(mesh.position_bytes().len(), 6 * 12);
        assert_eq!(mesh.color_bytes().len(), 6 * 4);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_vertex_limit_check() {
        let mut mesh = ChunkMesh::default();
        mesh.push_face(FaceDirection::Top, IVec3::ZERO, Vec3::ONE, Rgba8::RED);
        assert!(!mesh.exceeds_vertex_limit(6));
        assert!(mesh.exceeds_vertex_limit(5));
    }
}
