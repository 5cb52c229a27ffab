//! Visible face detection: a face of a solid voxel is exposed when the cell
//! across it is empty or lies outside the block's stored window.

use tessera_voxel::{VoxelBlock, flat_index};

use crate::face_direction::FaceDirection;
use crate::visible_faces::VisibleFaces;

/// Visible faces of the core cell `(x, y, z)`.
///
/// Empty cells have no faces. For a solid cell, each neighbor is looked up in
/// the block; neighbors outside an unpadded block count as empty, so faces on
/// the chunk boundary are always visible. A padded block answers those lookups
/// from its halo instead.
#[inline]
pub fn cell_visibility(block: &VoxelBlock, x: i32, y: i32, z: i32) -> VisibleFaces {
    let mut faces = VisibleFaces::NONE;
    if !block.is_solid(x, y, z) {
        return faces;
    }
    for dir in FaceDirection::ALL {
        let (nx, ny, nz) = dir.offset(x, y, z);
        if !block.is_solid(nx, ny, nz) {
            faces.set_visible(dir);
        }
    }
    faces
}

/// Computes per-voxel visible-face bitmasks for a block's core.
///
/// Returns a flat `Vec` with one entry per core cell, indexed with
/// [`flat_index`] over the core dimensions.
pub fn compute_visible_faces(block: &VoxelBlock) -> Vec<VisibleFaces> {
    let dims = block.dims();
    let (sx, sy) = (dims.x as usize, dims.y as usize);
    let mut result = vec![VisibleFaces::NONE; sx * sy * dims.z as usize];

    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                let idx = flat_index(sx, sy, x as usize, y as usize, z as usize);
                result[idx] = cell_visibility(block, x, y, z);
            }
        }
    }

    result
}

/// Counts the total number of visible faces in a visibility array.
pub fn count_visible_faces(faces: &[VisibleFaces]) -> u32 {
    faces.iter().map(|vf| vf.count()).sum()
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use tessera_voxel::Rgba8;

    use super::*;

    fn block(dims: i32) -> VoxelBlock {
        VoxelBlock::empty(IVec3::splat(dims)).unwrap()
    }

    #[test]
    fn test_single_voxel_in_empty_block_has_six_visible_faces() {
        let mut b = block(3);
        b.set(1, 1, 1, Rgba8::RED);
        assert_eq!(cell_visibility(&b, 1, 1, 1), VisibleFaces::ALL);
    }

    #[test]
    fn test_two_adjacent_solid_voxels_share_hidden_face() {
        let mut b = block(4);
        b.set(1, 1, 1, Rgba8::RED);
        b.set(2, 1, 1, Rgba8::BLUE);

        let a = cell_visibility(&b, 1, 1, 1);
        let c = cell_visibility(&b, 2, 1, 1);
        assert!(!a.is_visible(FaceDirection::Right));
        assert!(!c.is_visible(FaceDirection::Left));
        assert_eq!(a.count(), 5);
        assert_eq!(c.count(), 5);
    }

    /// A zero-alpha neighbor is empty no matter what its RGB channels hold.
    #[test]
    fn test_transparent_neighbor_exposes_face() {
        let mut b = block(3);
        b.set(1, 1, 1, Rgba8::RED);
        b.set(1, 2, 1, Rgba8::GREEN.with_alpha(0));
        assert!(cell_visibility(&b, 1, 1, 1).is_visible(FaceDirection::Top));
    }

    #[test]
    fn test_boundary_voxel_always_shows_boundary_face() {
        let mut b = block(2);
        b.set(0, 0, 0, Rgba8::RED);
        let vf = cell_visibility(&b, 0, 0, 0);
        assert!(vf.is_visible(FaceDirection::Left));
        assert!(vf.is_visible(FaceDirection::Bottom));
        assert!(vf.is_visible(FaceDirection::Back));
    }

    #[test]
    fn test_padded_halo_hides_boundary_face() {
        let mut b = VoxelBlock::empty_padded(IVec3::splat(2)).unwrap();
        b.set(0, 0, 0, Rgba8::RED);
        b.set(-1, 0, 0, Rgba8::BLUE);
        let vf = cell_visibility(&b, 0, 0, 0);
        assert!(!vf.is_visible(FaceDirection::Left));
        assert_eq!(vf.count(), 5);
    }

    #[test]
    fn test_enclosed_voxel_has_no_visible_faces() {
        let mut b = block(3);
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    b.set(x, y, z, Rgba8::WHITE);
                }
            }
        }
        assert_eq!(cell_visibility(&b, 1, 1, 1), VisibleFaces::NONE);
    }

    #[test]
    fn test_empty_block_produces_zero_faces() {
        let faces = compute_visible_faces(&block(4));
        assert_eq!(faces.len(), 64);
        assert_eq!(count_visible_faces(&faces), 0);
    }

    #[test]
    fn test_count_helpers() {
        let mut b = block(4);
        b.set(0, 0, 0, Rgba8::RED);
        b.set(1, 0, 0, Rgba8::RED);
        let faces = compute_visible_faces(&b);
        assert_eq!(count_visible_faces(&faces), 10);
        assert_eq!(faces[flat_index(4, 4, 1, 0, 0)].count(), 5);
    }
}
