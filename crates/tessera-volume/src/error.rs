//! Volume error types.

use glam::IVec3;
use tessera_mesh::MeshingError;
use tessera_voxel::BlockShapeError;

/// Errors raised while creating a volume or rebuilding its chunks.
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error(transparent)]
    Meshing(#[from] MeshingError),

    #[error("chunk block has the wrong shape: {0}")]
    Block(#[from] BlockShapeError),

    /// The requested grid has more cells than [`MAX_VOXELS`](crate::MAX_VOXELS).
    #[error("volume of {0} voxels is too large")]
    TooLarge(IVec3),

    #[error("chunk {0} is outside the chunk grid")]
    ChunkOutOfRange(IVec3),

    /// The background meshing pool could not start its threads.
    #[error("failed to start meshing workers: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
