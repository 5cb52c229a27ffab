//! Volume construction parameters.

use glam::{IVec3, Vec3};
use tessera_mesh::{
    ColliderKind, MAX_INDEXABLE_VERTICES, MeshingAlgorithm, ThreadingMode, default_worker_count,
};

/// Largest chunk edge, in voxels.
pub const MAX_CHUNK_SIZE: i32 = 16;

/// Opaque handle to the renderer's material. The volume only passes it along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// Everything [`Volume::create`](crate::Volume::create) needs.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeSettings {
    /// Voxels per chunk, clamped to `1..=16` per axis.
    pub chunk_dims: IVec3,
    /// Voxels in the whole volume, clamped to at least 1 per axis.
    pub volume_dims: IVec3,
    /// World position of voxel (0, 0, 0)'s minimum corner.
    pub origin: Vec3,
    pub voxel_scale: Vec3,
    pub material: Option<MaterialHandle>,
    pub collider: ColliderKind,
    pub threading: ThreadingMode,
    pub algorithm: MeshingAlgorithm,
    /// Feed each chunk mesher a one-voxel halo from its neighbors.
    pub seamless_chunks: bool,
    /// Background meshing threads; 0 picks a count from the CPU.
    pub worker_threads: usize,
    /// Meshes with more vertices than this are flagged as degraded.
    pub vertex_limit: usize,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            chunk_dims: IVec3::splat(8),
            volume_dims: IVec3::splat(16),
            origin: Vec3::ZERO,
            voxel_scale: Vec3::ONE,
            material: Some(MaterialHandle(0)),
            collider: ColliderKind::default(),
            threading: ThreadingMode::default(),
            algorithm: MeshingAlgorithm::default(),
            seamless_chunks: false,
            worker_threads: 0,
            vertex_limit: MAX_INDEXABLE_VERTICES,
        }
    }
}

impl VolumeSettings {
    /// Settings from the core creation parameters; the rest take defaults.
    pub fn new(
        chunk_dims: IVec3,
        volume_dims: IVec3,
        origin: Vec3,
        material: Option<MaterialHandle>,
        collider: ColliderKind,
        threading: ThreadingMode,
        algorithm: MeshingAlgorithm,
    ) -> Self {
        Self {
            chunk_dims,
            volume_dims,
            origin,
            material,
            collider,
            threading,
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_threading(mut self, threading: ThreadingMode) -> Self {
        self.threading = threading;
        self
    }

    pub fn with_voxel_scale(mut self, voxel_scale: Vec3) -> Self {
        self.voxel_scale = voxel_scale;
        self
    }

    pub fn with_seamless_chunks(mut self, seamless: bool) -> Self {
        self.seamless_chunks = seamless;
        self
    }

    /// Returns a copy with dimensions and scale forced into their legal
    /// ranges, logging a warning for every value that had to change.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();

        out.chunk_dims = self.chunk_dims.clamp(IVec3::ONE, IVec3::splat(MAX_CHUNK_SIZE));
        if out.chunk_dims != self.chunk_dims {
            tracing::warn!(
                requested = ?self.chunk_dims,
                clamped = ?out.chunk_dims,
                "chunk size out of range"
            );
        }

        out.volume_dims = self.volume_dims.max(IVec3::ONE);
        if out.volume_dims != self.volume_dims {
            tracing::warn!(
                requested = ?self.volume_dims,
                clamped = ?out.volume_dims,
                "volume size out of range"
            );
        }

        let scale = self.voxel_scale.to_array().map(|s| {
            if s.is_finite() && s > 0.0 { s } else { 1.0 }
        });
        out.voxel_scale = Vec3::from_array(scale);
        if out.voxel_scale != self.voxel_scale {
            tracing::warn!(
                requested = ?self.voxel_scale,
                used = ?out.voxel_scale,
                "voxel scale must be positive and finite"
            );
        }

        if self.vertex_limit == 0 {
            out.vertex_limit = MAX_INDEXABLE_VERTICES;
        }

        out
    }

    /// Worker count after resolving "automatic" (0).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            default_worker_count()
        } else {
            self.worker_threads
        }
    }
}
