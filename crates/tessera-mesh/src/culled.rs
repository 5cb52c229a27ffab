//! Culled face meshing: one quad (two triangles) per exposed voxel face.
//!
//! Cells are visited with x outermost and z innermost, and each cell's faces
//! in [`FaceDirection::ALL`](crate::FaceDirection::ALL) order, so identical
//! input always produces byte-identical buffers.

use glam::{IVec3, Vec3};
use tessera_voxel::{VoxelBlock, flat_index};

use crate::chunk_mesh::ChunkMesh;
use crate::visibility::{compute_visible_faces, count_visible_faces};

/// Meshes the core of `block`, emitting every face whose neighbor is empty or
/// outside the block. `voxel_scale` is the world-space size of one voxel.
pub fn culled_mesh(block: &VoxelBlock, voxel_scale: Vec3) -> ChunkMesh {
    let dims = block.dims();
    let (sx, sy) = (dims.x as usize, dims.y as usize);
    let visible = compute_visible_faces(block);
    let mut mesh = ChunkMesh::with_face_capacity(count_visible_faces(&visible) as usize);

    for x in 0..dims.x {
        for y in 0..dims.y {
            for z in 0..dims.z {
                let faces = visible[flat_index(sx, sy, x as usize, y as usize, z as usize)];
                if faces.is_empty() {
                    continue;
                }
                // Solid by construction: empty cells have no visible faces.
                let Some(color) = block.get(x, y, z) else {
                    continue;
                };
                let cell = IVec3::new(x, y, z);
                for dir in faces.iter() {
                    mesh.push_face(dir, cell, voxel_scale, color);
                }
            }
        }
    }

    mesh
}
