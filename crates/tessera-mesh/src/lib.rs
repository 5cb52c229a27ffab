//! Meshing for colored voxel chunks: face visibility, culled face meshing,
//! mesh buffers, and a background meshing worker pool.

pub mod algorithm;
pub mod async_mesh;
pub mod chunk_mesh;
pub mod culled;
pub mod error;
pub mod face_direction;
pub mod invalidation;
pub mod mode;
pub mod visibility;
pub mod visible_faces;

pub use algorithm::{MeshingAlgorithm, generate_block_mesh, generate_mesh};
pub use async_mesh::{MeshCallback, MeshingPipeline, MeshingTask, default_worker_count};
pub use chunk_mesh::{CUBE_CORNERS, ChunkMesh, FaceInfo, MAX_INDEXABLE_VERTICES, VERTICES_PER_FACE};
pub use culled::culled_mesh;
pub use error::MeshingError;
pub use face_direction::FaceDirection;
pub use invalidation::MeshInvalidator;
pub use mode::{ColliderKind, ThreadingMode};
pub use visibility::{cell_visibility, compute_visible_faces, count_visible_faces};
pub use visible_faces::VisibleFaces;
