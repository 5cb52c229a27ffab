//! A single chunk and its mesh-regeneration state machine.
//!
//! ```text
//! Idle --regenerate(single)--> Generated --consume--> Idle
//! Idle --regenerate(multi)---> Generating --publish--> Generated --consume--> Idle
//!                               Generating --failure--> Idle, or Generated if
//!                                                       a mesh is still unconsumed
//! ```
//!
//! All mutable state sits behind one mutex that is held only to store a
//! request, publish a result, or consume it. Meshing itself always runs with
//! the lock released, on a private copy of the voxels.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::{IVec3, Vec3};
use tessera_mesh::{ChunkMesh, MeshingAlgorithm, MeshingError, MeshingPipeline, MeshingTask, ThreadingMode};
use tessera_voxel::VoxelBlock;

use crate::settings::MaterialHandle;

/// Where a chunk's mesh is in its rebuild cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MeshState {
    /// Nothing pending. The last published mesh (if any) has been consumed.
    #[default]
    Idle,
    /// A background rebuild is queued or running.
    Generating,
    /// A fresh mesh is waiting to be consumed.
    Generated,
}

/// A published mesh, shared cheaply between the chunk and its consumer.
#[derive(Clone, Debug)]
pub struct MeshSnapshot {
    pub mesh: Arc<ChunkMesh>,
    /// Request number this mesh was built for.
    pub generation: u64,
    /// The mesh has more vertices than the configured limit.
    pub degraded: bool,
}

/// Runs meshing jobs either inline or on a worker pool.
pub enum MeshScheduler {
    SingleThreaded,
    MultiThreaded(MeshingPipeline),
}

impl MeshScheduler {
    /// Builds the scheduler for `mode`, spawning `worker_threads` workers
    /// when meshing runs in the background.
    pub fn new(mode: ThreadingMode, worker_threads: usize) -> std::io::Result<Self> {
        Ok(match mode {
            ThreadingMode::SingleThreaded => Self::SingleThreaded,
            ThreadingMode::MultiThreaded => Self::MultiThreaded(MeshingPipeline::new(worker_threads)?),
        })
    }

    pub fn mode(&self) -> ThreadingMode {
        match self {
            Self::SingleThreaded => ThreadingMode::SingleThreaded,
            Self::MultiThreaded(_) => ThreadingMode::MultiThreaded,
        }
    }

    /// Jobs queued or running on the pool (always 0 inline).
    pub fn in_flight_count(&self) -> usize {
        match self {
            Self::SingleThreaded => 0,
            Self::MultiThreaded(pipeline) => pipeline.in_flight_count(),
        }
    }
}

/// Inputs for one rebuild of a chunk's mesh.
#[derive(Clone, Debug)]
pub struct MeshRequest {
    pub block: VoxelBlock,
    pub voxel_scale: Vec3,
    pub algorithm: MeshingAlgorithm,
    pub vertex_limit: usize,
    pub material: Option<MaterialHandle>,
}

#[derive(Debug, Default)]
struct MeshSlot {
    state: MeshState,
    /// Last voxel block handed to `regenerate`.
    voxels: Option<VoxelBlock>,
    material: Option<MaterialHandle>,
    latest: Option<MeshSnapshot>,
    /// `latest` was published but not yet consumed.
    pending: bool,
    /// Incremented by every `regenerate`; results for older numbers are stale.
    requested: u64,
    published: u64,
    last_error: Option<MeshingError>,
}

impl MeshSlot {
    /// Records a failed rebuild. An earlier mesh the host has not taken yet
    /// stays deliverable.
    fn fail(&mut self, err: MeshingError) {
        self.last_error = Some(err);
        self.state = if self.pending {
            MeshState::Generated
        } else {
            MeshState::Idle
        };
    }
}

#[derive(Debug, Default)]
struct ChunkShared {
    slot: Mutex<MeshSlot>,
}

impl ChunkShared {
    fn lock(&self) -> MutexGuard<'_, MeshSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(
        &self,
        chunk_index: IVec3,
        generation: u64,
        vertex_limit: usize,
        result: Result<ChunkMesh, MeshingError>,
    ) {
        let mut slot = self.lock();
        if generation != slot.requested {
            tracing::debug!(
                chunk = ?chunk_index,
                generation,
                latest = slot.requested,
                "discarding stale chunk mesh"
            );
            return;
        }

        match result {
            Ok(mesh) => {
                let degraded = mesh.exceeds_vertex_limit(vertex_limit);
                if degraded {
                    tracing::warn!(
                        chunk = ?chunk_index,
                        vertices = mesh.vertex_count(),
                        limit = vertex_limit,
                        "chunk mesh exceeds the indexable vertex limit"
                    );
                }
                slot.latest = Some(MeshSnapshot {
                    mesh: Arc::new(mesh),
                    generation,
                    degraded,
                });
                slot.published = generation;
                slot.pending = true;
                slot.last_error = None;
                slot.state = MeshState::Generated;
            }
            Err(err) => {
                tracing::error!(chunk = ?chunk_index, generation, "chunk meshing failed: {err}");
                slot.fail(err);
            }
        }
    }
}

/// One tile of a volume. Owns its latest mesh, never the volume's voxels.
#[derive(Debug)]
pub struct Chunk {
    index: IVec3,
    world_position: Vec3,
    shared: Arc<ChunkShared>,
}

impl Chunk {
    /// Creates an idle chunk at `index`, whose minimum corner sits at
    /// `world_position` relative to the volume origin.
    pub fn new(index: IVec3, world_position: Vec3) -> Self {
        Self {
            index,
            world_position,
            shared: Arc::new(ChunkShared::default()),
        }
    }

    pub fn index(&self) -> IVec3 {
        self.index
    }

    pub fn world_position(&self) -> Vec3 {
        self.world_position
    }

    /// Stores `request` as the chunk's current voxels and rebuilds the mesh.
    ///
    /// Inline scheduling meshes before returning and leaves the chunk
    /// `Generated`; an error is returned and also recorded on the chunk.
    /// Background scheduling marks the chunk `Generating` and returns once
    /// the job is queued; its result is published by the worker unless a
    /// newer request has been made in the meantime.
    pub fn regenerate(
        &self,
        request: MeshRequest,
        scheduler: &MeshScheduler,
    ) -> Result<(), MeshingError> {
        let MeshRequest {
            block,
            voxel_scale,
            algorithm,
            vertex_limit,
            material,
        } = request;

        let generation = {
            let mut slot = self.shared.lock();
            slot.requested += 1;
            slot.voxels = Some(block.clone());
            slot.material = material;
            if let MeshScheduler::MultiThreaded(_) = scheduler {
                slot.state = MeshState::Generating;
            }
            slot.requested
        };

        let chunk_index = self.index;
        let shared = Arc::clone(&self.shared);
        let task = MeshingTask {
            chunk_index,
            block,
            voxel_scale,
            algorithm,
            on_complete: Box::new(move |result| {
                shared.publish(chunk_index, generation, vertex_limit, result);
            }),
        };

        match scheduler {
            MeshScheduler::SingleThreaded => {
                task.run();
                let slot = self.shared.lock();
                match &slot.last_error {
                    Some(err) if slot.published != generation => Err(err.clone()),
                    _ => Ok(()),
                }
            }
            MeshScheduler::MultiThreaded(pipeline) => {
                pipeline.submit(task).inspect_err(|err| {
                    tracing::error!(chunk = ?chunk_index, "could not queue chunk mesh: {err}");
                    let mut slot = self.shared.lock();
                    if slot.requested == generation {
                        slot.fail(err.clone());
                    }
                })
            }
        }
    }

    /// Takes the freshly published mesh, if there is one, and returns the
    /// chunk to `Idle`.
    pub fn consume(&self) -> Option<MeshSnapshot> {
        let mut slot = self.shared.lock();
        if slot.state != MeshState::Generated {
            return None;
        }
        slot.state = MeshState::Idle;
        slot.pending = false;
        slot.latest.clone()
    }

    pub fn state(&self) -> MeshState {
        self.shared.lock().state
    }

    /// Number of the most recent rebuild request (0 before the first one).
    pub fn generation(&self) -> u64 {
        self.shared.lock().requested
    }

    /// Request number of the last mesh actually published.
    pub fn published_generation(&self) -> u64 {
        self.shared.lock().published
    }

    pub fn last_error(&self) -> Option<MeshingError> {
        self.shared.lock().last_error.clone()
    }

    /// Copy of the voxels from the most recent rebuild request.
    pub fn voxels(&self) -> Option<VoxelBlock> {
        self.shared.lock().voxels.clone()
    }

    /// The last published mesh, without changing state.
    pub fn latest_mesh(&self) -> Option<MeshSnapshot> {
        self.shared.lock().latest.clone()
    }

    pub fn material(&self) -> Option<MaterialHandle> {
        self.shared.lock().material
    }
}
