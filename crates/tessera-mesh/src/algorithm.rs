//! Meshing algorithm selection and the mesh generation entry points.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use tessera_voxel::{Rgba8, VoxelBlock};

use crate::chunk_mesh::ChunkMesh;
use crate::culled::culled_mesh;
use crate::error::MeshingError;

/// Which meshing strategy turns a voxel block into triangles.
///
/// Only [`MeshingAlgorithm::Culled`] is implemented. The others are accepted
/// in configuration but rejected with [`MeshingError::UnsupportedAlgorithm`]
/// when a mesh is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshingAlgorithm {
    /// Reserved.
    All,
    /// One quad per exposed face.
    #[default]
    Culled,
    /// Merged coplanar faces. Not implemented.
    Greedy,
    /// Marching cubes surface extraction. Not implemented.
    Marching,
}

impl MeshingAlgorithm {
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Culled)
    }

    /// Returns `Err(UnsupportedAlgorithm)` unless this algorithm can run,
    /// logging the rejection at error level.
    pub fn ensure_supported(self) -> Result<(), MeshingError> {
        if self.is_supported() {
            Ok(())
        } else {
            tracing::error!("meshing algorithm {self:?} is not implemented");
            Err(MeshingError::UnsupportedAlgorithm(self))
        }
    }
}

/// Meshes a flat chunk buffer of exactly `chunk_dims.x * y * z` voxels.
pub fn generate_mesh(
    voxels: Vec<Rgba8>,
    chunk_dims: IVec3,
    voxel_scale: Vec3,
    algorithm: MeshingAlgorithm,
) -> Result<ChunkMesh, MeshingError> {
    algorithm.ensure_supported()?;
    let block = VoxelBlock::new(chunk_dims, voxels)?;
    Ok(culled_mesh(&block, voxel_scale))
}

/// Meshes a (possibly padded) voxel block.
pub fn generate_block_mesh(
    block: &VoxelBlock,
    voxel_scale: Vec3,
    algorithm: MeshingAlgorithm,
) -> Result<ChunkMesh, MeshingError> {
    algorithm.ensure_supported()?;
    Ok(culled_mesh(block, voxel_scale))
}
