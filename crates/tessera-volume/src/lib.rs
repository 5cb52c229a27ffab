//! Chunked voxel volume: a dense color grid tiled into fixed-size chunks,
//! each of which rebuilds its mesh when edited.
//!
//! Edits go through [`Volume`], which marks the owning chunks dirty. Once per
//! frame the host calls [`Volume::tick`] to regenerate dirty chunks and then
//! [`Volume::deliver_ready`] to hand finished meshes to its renderer.

pub mod chunk;
pub mod consumer;
pub mod dirty;
pub mod error;
pub mod settings;
pub mod volume;

pub use chunk::{Chunk, MeshRequest, MeshScheduler, MeshSnapshot, MeshState};
pub use consumer::{MeshConsumer, ReadyMesh};
pub use dirty::DirtyChunks;
pub use error::VolumeError;
pub use settings::{MAX_CHUNK_SIZE, MaterialHandle, VolumeSettings};
pub use volume::{MAX_VOXELS, TickReport, Volume, VolumeBounds};

pub use tessera_mesh::{ColliderKind, MeshingAlgorithm, ThreadingMode};
