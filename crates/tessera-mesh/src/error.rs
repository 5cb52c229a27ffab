//! Meshing error types.

use tessera_voxel::BlockShapeError;
use thiserror::Error;

use crate::algorithm::MeshingAlgorithm;

/// Errors that can occur while generating a chunk mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshingError {
    /// The selected algorithm has no implementation.
    #[error("unsupported meshing algorithm: {0:?}")]
    UnsupportedAlgorithm(MeshingAlgorithm),

    /// The voxel buffer does not match the chunk dimensions.
    #[error("invalid voxel block: {0}")]
    InvalidBlock(#[from] BlockShapeError),

    /// A meshing job panicked on a worker thread.
    #[error("meshing worker panicked: {0}")]
    WorkerPanicked(String),

    /// The worker pool has been shut down and accepts no more jobs.
    #[error("meshing pipeline is shut down")]
    PipelineClosed,
}
