//! Mesh invalidation: determines which chunks need remeshing after a voxel edit.

use glam::IVec3;

use crate::face_direction::FaceDirection;

/// Determines which chunks need remeshing after a voxel edit.
pub struct MeshInvalidator;

impl MeshInvalidator {
    /// Returns the chunk indices to invalidate after editing the voxel at
    /// chunk-local `local` inside `edited_chunk`.
    ///
    /// The edited chunk itself is always first. A neighbor across a chunk face
    /// is included when the edit touches that face, because its halo then
    /// contains the edited voxel. Neighbors outside `0..grid_extent` are skipped.
    pub fn invalidate(
        edited_chunk: IVec3,
        local: IVec3,
        chunk_dims: IVec3,
        grid_extent: IVec3,
    ) -> Vec<IVec3> {
        let mut dirty = vec![edited_chunk];

        for dir in FaceDirection::ALL {
            let (dx, dy, dz) = dir.delta();
            let delta = IVec3::new(dx, dy, dz);
            let on_face = (0..3).any(|axis| match delta[axis] {
                -1 => local[axis] == 0,
                1 => local[axis] == chunk_dims[axis] - 1,
                _ => false,
            });
            if !on_face {
                continue;
            }
            let neighbor = edited_chunk + delta;
            if neighbor.cmpge(IVec3::ZERO).all() && neighbor.cmplt(grid_extent).all() {
                dirty.push(neighbor);
            }
        }

        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: IVec3 = IVec3::splat(8);
    const EXTENT: IVec3 = IVec3::splat(3);

    /// Changing a voxel should invalidate the chunk's own mesh.
    #[test]
    fn test_voxel_change_invalidates_own_mesh() {
        let c = IVec3::ONE;
        let dirty = MeshInvalidator::invalidate(c, IVec3::splat(4), DIMS, EXTENT);
        assert_eq!(dirty, vec![c]);
    }

    /// Changing a voxel at a chunk boundary should invalidate the neighbor.
    #[test]
    fn test_boundary_voxel_change_invalidates_neighbor_mesh() {
        let c = IVec3::ONE;

        let dirty = MeshInvalidator::invalidate(c, IVec3::new(0, 4, 4), DIMS, EXTENT);
        assert!(dirty.contains(&IVec3::new(0, 1, 1)));

        let dirty = MeshInvalidator::invalidate(c, IVec3::new(7, 4, 4), DIMS, EXTENT);
        assert!(dirty.contains(&IVec3::new(2, 1, 1)));

        let dirty = MeshInvalidator::invalidate(c, IVec3::new(4, 0, 4), DIMS, EXTENT);
        assert!(dirty.contains(&IVec3::new(1, 0, 1)));
    }

    /// A corner edit should invalidate 3 face neighbors + self.
    #[test]
    fn test_corner_edit_invalidates_three_face_neighbors() {
        let c = IVec3::ONE;
        let dirty = MeshInvalidator::invalidate(c, IVec3::ZERO, DIMS, EXTENT);
        assert_eq!(dirty.len(), 4);
        assert!(dirty.contains(&IVec3::new(0, 1, 1)));
        assert!(dirty.contains(&IVec3::new(1, 0, 1)));
        assert!(dirty.contains(&IVec3::new(1, 1, 0)));
    }

    /// Neighbors outside the chunk grid are never reported.
    #[test]
    fn test_edge_of_grid_is_clipped() {
        let dirty = MeshInvalidator::invalidate(IVec3::ZERO, IVec3::ZERO, DIMS, EXTENT);
        assert_eq!(dirty, vec![IVec3::ZERO]);
    }

    /// With a one-voxel-thick chunk every edit touches both faces on that axis.
    #[test]
    fn test_thin_chunk_touches_both_sides() {
        let dims = IVec3::new(1, 8, 8);
        let dirty = MeshInvalidator::invalidate(IVec3::ONE, IVec3::new(0, 4, 4), dims, EXTENT);
        assert!(dirty.contains(&IVec3::new(0, 1, 1)));
        assert!(dirty.contains(&IVec3::new(2, 1, 1)));
        assert_eq!(dirty.len(), 3);
    }
}
