//! Background meshing: a fixed pool of worker threads fed over a channel.
//!
//! Each [`MeshingTask`] owns its voxel block, so workers never touch the
//! volume's grid. When a mesh is finished (or fails) the task's completion
//! callback runs on the worker thread; the callback is responsible for
//! publishing the result wherever it belongs.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use glam::{IVec3, Vec3};
use tessera_voxel::VoxelBlock;

use crate::algorithm::{MeshingAlgorithm, generate_block_mesh};
use crate::chunk_mesh::ChunkMesh;
use crate::error::MeshingError;

/// Completion callback invoked exactly once with the meshing outcome.
pub type MeshCallback = Box<dyn FnOnce(Result<ChunkMesh, MeshingError>) + Send + 'static>;

/// A self-contained meshing job that can run on any thread.
pub struct MeshingTask {
    /// Chunk the mesh is for (used for diagnostics).
    pub chunk_index: IVec3,
    /// Snapshot of the chunk's voxels, owned by the task.
    pub block: VoxelBlock,
    pub voxel_scale: Vec3,
    pub algorithm: MeshingAlgorithm,
    pub on_complete: MeshCallback,
}

impl MeshingTask {
    /// Runs the job on the current thread and hands the outcome to
    /// `on_complete`. Panics in the mesher are caught and reported as
    /// [`MeshingError::WorkerPanicked`]; the callback logs its own failures.
    pub fn run(self) {
        let MeshingTask {
            chunk_index,
            block,
            voxel_scale,
            algorithm,
            on_complete,
        } = self;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            generate_block_mesh(&block, voxel_scale, algorithm)
        }))
        .unwrap_or_else(|payload| Err(MeshingError::WorkerPanicked(panic_message(&*payload))));

        if panic::catch_unwind(AssertUnwindSafe(|| on_complete(result))).is_err() {
            tracing::error!(chunk = ?chunk_index, "mesh completion callback panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Worker pool that runs [`MeshingTask`]s off the main thread.
///
/// Submission never blocks: the task queue is unbounded, and every submitted
/// task runs to completion.
pub struct MeshingPipeline {
    /// Channel sender for submitting tasks to workers.
    task_sender: Option<crossbeam_channel::Sender<MeshingTask>>,
    /// Handles to the worker threads (for shutdown).
    worker_handles: Vec<JoinHandle<()>>,
    /// Current number of queued or running tasks.
    in_flight: Arc<AtomicUsize>,
}

impl MeshingPipeline {
    /// Spawns `worker_count` meshing threads (at least one).
    pub fn new(worker_count: usize) -> std::io::Result<Self> {
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<MeshingTask>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let worker_count = worker_count.max(1);
        let mut handles = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let rx = task_rx.clone();
            let flight = Arc::clone(&in_flight);

            let handle = std::thread::Builder::new()
                .name(format!("mesh-worker-{i}"))
                .spawn(move || {
                    while let Ok(task) = rx.recv() {
                        task.run();
                        flight.fetch_sub(1, Ordering::AcqRel);
                    }
                })?;
            handles.push(handle);
        }

        tracing::debug!("meshing pipeline started with {worker_count} workers");

        Ok(Self {
            task_sender: Some(task_tx),
            worker_handles: handles,
            in_flight,
        })
    }

    /// Queues a task. Fails only after [`shutdown`](Self::shutdown).
    pub fn submit(&self, task: MeshingTask) -> Result<(), MeshingError> {
        let sender = self
            .task_sender
            .as_ref()
            .ok_or(MeshingError::PipelineClosed)?;
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        if sender.send(task).is_err() {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            return Err(MeshingError::PipelineClosed);
        }
        Ok(())
    }

    /// Number of tasks currently being processed or queued by workers.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.task_sender.is_none()
    }

    /// Shut down all worker threads gracefully.
    ///
    /// Drops the task sender so workers exit once the queue is drained, then
    /// joins all threads.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for MeshingPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker count used when configuration asks for "automatic": all cores but one.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}
