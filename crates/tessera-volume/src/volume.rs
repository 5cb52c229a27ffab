//! The volume: owns the voxel grid, tiles it into chunks, and batches
//! edits into per-tick chunk rebuilds.

use std::time::{Duration, Instant};

use glam::{IVec3, Vec3};
use tessera_mesh::{ColliderKind, MeshInvalidator, ThreadingMode};
use tessera_voxel::{Rgba8, VoxelBlock, flat_index_ivec, grid_extent, unflatten_index};

use crate::chunk::{Chunk, MeshRequest, MeshScheduler, MeshState};
use crate::consumer::{MeshConsumer, ReadyMesh};
use crate::dirty::DirtyChunks;
use crate::error::VolumeError;
use crate::settings::VolumeSettings;

/// World-space axis-aligned box covered by a volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl VolumeBounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half-open containment: the max faces belong to the next voxel over.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }
}

/// Largest grid [`Volume::create`] accepts: 2³⁰ cells, 4 GiB of voxel data.
pub const MAX_VOXELS: usize = 1 << 30;

/// Cell count of a `dims`-shaped grid, or `None` if it does not fit in `usize`.
fn cell_count(dims: IVec3) -> Option<usize> {
    dims.to_array()
        .into_iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(usize::try_from(d).ok()?))
}

/// Outcome of one [`Volume::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks whose rebuild was started.
    pub regenerated: usize,
    /// Rebuilds that failed before returning. Background failures surface
    /// later through [`Chunk::last_error`].
    pub failed: usize,
}

/// A dense grid of colored voxels split into independently meshed chunks.
pub struct Volume {
    settings: VolumeSettings,
    voxels: Vec<Rgba8>,
    grid_extent: IVec3,
    /// Indexed by the linearized chunk index.
    chunks: Vec<Chunk>,
    dirty: DirtyChunks,
    scheduler: MeshScheduler,
}

impl Volume {
    /// Builds a volume of empty voxels and requests every chunk's first mesh.
    ///
    /// Dimensions are clamped into range. Fails if the meshing algorithm is
    /// not implemented, the grid holds more than [`MAX_VOXELS`] cells, or the
    /// worker pool cannot start.
    pub fn create(settings: VolumeSettings) -> Result<Self, VolumeError> {
        let settings = settings.sanitized();
        settings.algorithm.ensure_supported()?;

        let voxel_count = match cell_count(settings.volume_dims) {
            Some(count) if count <= MAX_VOXELS => count,
            _ => {
                tracing::error!(volume = ?settings.volume_dims, "volume exceeds {MAX_VOXELS} voxels");
                return Err(VolumeError::TooLarge(settings.volume_dims));
            }
        };

        if settings.material.is_none() {
            tracing::warn!("volume has no material; chunk meshes will render without one");
        }

        // Bounded by voxel_count since every chunk holds at least one cell.
        let grid_extent = grid_extent(settings.volume_dims, settings.chunk_dims);
        let chunk_count = grid_extent.x as usize * grid_extent.y as usize * grid_extent.z as usize;

        let chunks = (0..chunk_count)
            .map(|flat| {
                let (x, y, z) =
                    unflatten_index(grid_extent.x as usize, grid_extent.y as usize, flat);
                let index = IVec3::new(x as i32, y as i32, z as i32);
                Chunk::new(index, chunk_offset(index, &settings))
            })
            .collect();

        let scheduler = MeshScheduler::new(settings.threading, settings.resolved_worker_threads())?;

        tracing::debug!(
            volume = ?settings.volume_dims,
            chunk = ?settings.chunk_dims,
            chunks = chunk_count,
            threading = ?settings.threading,
            "created voxel volume"
        );

        let mut volume = Self {
            settings,
            voxels: vec![Rgba8::EMPTY; voxel_count],
            grid_extent,
            chunks,
            dirty: DirtyChunks::new(chunk_count),
            scheduler,
        };
        volume.regenerate_all();
        Ok(volume)
    }

    pub fn settings(&self) -> &VolumeSettings {
        &self.settings
    }

    pub fn volume_dims(&self) -> IVec3 {
        self.settings.volume_dims
    }

    pub fn chunk_dims(&self) -> IVec3 {
        self.settings.chunk_dims
    }

    pub fn origin(&self) -> Vec3 {
        self.settings.origin
    }

    pub fn voxel_scale(&self) -> Vec3 {
        self.settings.voxel_scale
    }

    pub fn collider(&self) -> ColliderKind {
        self.settings.collider
    }

    pub fn threading(&self) -> ThreadingMode {
        self.scheduler.mode()
    }

    /// Number of chunks along each axis.
    pub fn grid_extent(&self) -> IVec3 {
        self.grid_extent
    }

    /// The whole grid in x-fastest order.
    pub fn voxels(&self) -> &[Rgba8] {
        &self.voxels
    }

    // --- Voxel access ---

    fn contains_index(&self, index: IVec3) -> bool {
        index.cmpge(IVec3::ZERO).all() && index.cmplt(self.settings.volume_dims).all()
    }

    /// Writes one voxel and marks the chunks that must be rebuilt.
    /// Returns `false` (and changes nothing) when `index` is outside the grid.
    pub fn set_voxel(&mut self, index: IVec3, color: Rgba8) -> bool {
        if !self.contains_index(index) {
            tracing::trace!(?index, "set_voxel outside the volume");
            return false;
        }
        let offset = flat_index_ivec(self.settings.volume_dims, index);
        self.voxels[offset] = color;

        let chunk_index = self.chunk_index_of(index);
        if self.settings.seamless_chunks {
            let local = index - chunk_index * self.settings.chunk_dims;
            for chunk in MeshInvalidator::invalidate(
                chunk_index,
                local,
                self.settings.chunk_dims,
                self.grid_extent,
            ) {
                self.mark_dirty(chunk);
            }
        } else {
            self.mark_dirty(chunk_index);
        }
        true
    }

    pub fn get_voxel(&self, index: IVec3) -> Option<Rgba8> {
        if !self.contains_index(index) {
            tracing::trace!(?index, "get_voxel outside the volume");
            return None;
        }
        Some(self.voxels[flat_index_ivec(self.settings.volume_dims, index)])
    }

    /// Voxel index containing a world position, or `None` for non-finite input.
    /// The result may lie outside the grid.
    pub fn voxel_index_at_world(&self, position: Vec3) -> Option<IVec3> {
        if !position.is_finite() {
            return None;
        }
        let local = (position - self.settings.origin) / self.settings.voxel_scale;
        Some(local.floor().as_ivec3())
    }

    pub fn set_voxel_at_world(&mut self, position: Vec3, color: Rgba8) -> bool {
        self.voxel_index_at_world(position)
            .is_some_and(|index| self.set_voxel(index, color))
    }

    pub fn get_voxel_at_world(&self, position: Vec3) -> Option<Rgba8> {
        self.voxel_index_at_world(position)
            .and_then(|index| self.get_voxel(index))
    }

    /// Sets every voxel to `color`, or to `color` with zero alpha when
    /// `solid` is false, and marks every chunk dirty.
    pub fn fill(&mut self, color: Rgba8, solid: bool) {
        let color = if solid { color } else { color.with_alpha(0) };
        self.voxels.fill(color);
        for flat in 0..self.chunks.len() {
            self.dirty.mark(flat);
        }
    }

    // --- Chunks ---

    /// Chunk containing a voxel index.
    pub fn chunk_index_of(&self, voxel_index: IVec3) -> IVec3 {
        voxel_index.div_euclid(self.settings.chunk_dims)
    }

    /// Minimum corner of a chunk relative to the volume origin, or `None`
    /// outside the chunk grid.
    pub fn chunk_world_position(&self, chunk_index: IVec3) -> Option<Vec3> {
        self.chunk_slot(chunk_index)
            .map(|_| chunk_offset(chunk_index, &self.settings))
    }

    fn chunk_slot(&self, chunk_index: IVec3) -> Option<usize> {
        let in_grid = chunk_index.cmpge(IVec3::ZERO).all() && chunk_index.cmplt(self.grid_extent).all();
        in_grid.then(|| flat_index_ivec(self.grid_extent, chunk_index))
    }

    pub fn chunk(&self, chunk_index: IVec3) -> Option<&Chunk> {
        self.chunk_slot(chunk_index).map(|slot| &self.chunks[slot])
    }

    /// Chunks in linearized (x-fastest) order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Copies a chunk's voxels into a `chunk_dims`-shaped buffer. Cells past
    /// the volume edge (in a partial edge chunk) are empty. `None` outside
    /// the chunk grid.
    pub fn extract_chunk_voxels(&self, chunk_index: IVec3) -> Option<Vec<Rgba8>> {
        self.chunk_slot(chunk_index)?;
        let dims = self.settings.chunk_dims;
        let mut out = vec![Rgba8::EMPTY; dims.x as usize * dims.y as usize * dims.z as usize];
        let start = chunk_index * dims;
        let end = (start + dims).min(self.settings.volume_dims);

        for z in start.z.max(0)..end.z {
            for y in start.y.max(0)..end.y {
                for x in start.x.max(0)..end.x {
                    let global = IVec3::new(x, y, z);
                    out[flat_index_ivec(dims, global - start)] =
                        self.voxels[flat_index_ivec(self.settings.volume_dims, global)];
                }
            }
        }
        Some(out)
    }

    /// The block handed to the mesher for a chunk. With seamless chunks the
    /// block carries a one-voxel halo copied from the neighbors.
    pub fn extract_chunk_block(&self, chunk_index: IVec3) -> Result<VoxelBlock, VolumeError> {
        let dims = self.settings.chunk_dims;
        if !self.settings.seamless_chunks {
            let voxels = self
                .extract_chunk_voxels(chunk_index)
                .ok_or(VolumeError::ChunkOutOfRange(chunk_index))?;
            return Ok(VoxelBlock::new(dims, voxels)?);
        }
        if self.chunk_slot(chunk_index).is_none() {
            return Err(VolumeError::ChunkOutOfRange(chunk_index));
        }

        let mut block = VoxelBlock::empty_padded(dims)?;
        let start = chunk_index * dims;
        for z in -1..=dims.z {
            for y in -1..=dims.y {
                for x in -1..=dims.x {
                    if let Some(color) = self.get_voxel(start + IVec3::new(x, y, z)) {
                        block.set(x, y, z, color);
                    }
                }
            }
        }
        Ok(block)
    }

    // --- Regeneration ---

    fn mark_dirty(&mut self, chunk_index: IVec3) {
        if let Some(slot) = self.chunk_slot(chunk_index) {
            self.dirty.mark(slot);
        }
    }

    pub fn is_dirty(&self, chunk_index: IVec3) -> bool {
        self.chunk_slot(chunk_index)
            .is_some_and(|slot| self.dirty.is_dirty(slot))
    }

    /// Number of chunks waiting for the next tick.
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Rebuilds every dirty chunk once and clears the dirty set.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for slot in self.dirty.drain() {
            report.regenerated += 1;
            if let Err(err) = self.regenerate_slot(slot) {
                tracing::debug!(chunk = ?self.chunks[slot].index(), "chunk rebuild failed: {err}");
                report.failed += 1;
            }
        }
        report
    }

    /// Marks every chunk dirty and rebuilds them all now.
    pub fn regenerate_all(&mut self) -> TickReport {
        for slot in 0..self.chunks.len() {
            self.dirty.mark(slot);
        }
        self.tick()
    }

    fn regenerate_slot(&self, slot: usize) -> Result<(), VolumeError> {
        let chunk = &self.chunks[slot];
        let request = MeshRequest {
            block: self.extract_chunk_block(chunk.index())?,
            voxel_scale: self.settings.voxel_scale,
            algorithm: self.settings.algorithm,
            vertex_limit: self.settings.vertex_limit,
            material: self.settings.material,
        };
        chunk.regenerate(request, &self.scheduler)?;
        Ok(())
    }

    /// `true` while any chunk has a background rebuild queued or running.
    pub fn is_meshing(&self) -> bool {
        self.chunks.iter().any(|c| c.state() == MeshState::Generating)
    }

    /// Polls until no chunk is [`MeshState::Generating`] or `timeout` passes.
    /// Returns `false` on timeout.
    pub fn wait_for_meshes(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.is_meshing() {
            if start.elapsed() >= timeout {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }

    // --- Collaborator hand-off ---

    /// Consumes every freshly published chunk mesh.
    pub fn drain_ready(&self) -> Vec<ReadyMesh> {
        let mut ready = Vec::new();
        self.deliver_ready(&mut ready);
        ready
    }

    /// Passes every freshly published chunk mesh to `consumer`. Returns how
    /// many were delivered.
    pub fn deliver_ready(&self, consumer: &mut impl MeshConsumer) -> usize {
        let mut delivered = 0;
        for chunk in &self.chunks {
            if let Some(snapshot) = chunk.consume() {
                consumer.apply_mesh(ReadyMesh {
                    chunk_index: chunk.index(),
                    world_position: chunk.world_position(),
                    material: chunk.material(),
                    collider: self.settings.collider,
                    snapshot,
                });
                delivered += 1;
            }
        }
        delivered
    }

    // --- Trigger bounds ---

    /// World-space box covered by the volume.
    pub fn bounds(&self) -> VolumeBounds {
        let min = self.settings.origin;
        VolumeBounds {
            min,
            max: min + self.settings.volume_dims.as_vec3() * self.settings.voxel_scale,
        }
    }

    pub fn contains_world(&self, position: Vec3) -> bool {
        self.bounds().contains(position)
    }
}

fn chunk_offset(chunk_index: IVec3, settings: &VolumeSettings) -> Vec3 {
    (chunk_index * settings.chunk_dims).as_vec3() * settings.voxel_scale
}

#[cfg(test)]
mod tests {
    use tessera_mesh::{MeshingAlgorithm, MeshingError};

    use super::*;

    fn inline_settings(volume: IVec3, chunk: IVec3) -> VolumeSettings {
        VolumeSettings {
            volume_dims: volume,
            chunk_dims: chunk,
            ..VolumeSettings::default()
        }
        .with_threading(ThreadingMode::SingleThreaded)
    }

    #[test]
    fn test_create_tiles_uneven_grid() {
        let volume = Volume::create(inline_settings(IVec3::new(10, 4, 17), IVec3::new(4, 4, 8))).unwrap();
        assert_eq!(volume.grid_extent(), IVec3::new(3, 1, 3));
        assert_eq!(volume.chunk_count(), 9);
        assert_eq!(volume.voxels().len(), 10 * 4 * 17);
        assert!(volume.voxels().iter().all(|v| *v == Rgba8::EMPTY));
    }

    #[test]
    fn test_chunks_stored_in_linear_order() {
        let volume = Volume::create(inline_settings(IVec3::new(4, 4, 4), IVec3::splat(2))).unwrap();
        for (flat, chunk) in volume.chunks().enumerate() {
            assert_eq!(flat_index_ivec(volume.grid_extent(), chunk.index()), flat);
        }
    }

    #[test]
    fn test_create_builds_initial_meshes() {
        let volume = Volume::create(inline_settings(IVec3::splat(4), IVec3::splat(2))).unwrap();
        assert_eq!(volume.dirty_count(), 0);
        for chunk in volume.chunks() {
            assert_eq!(chunk.state(), MeshState::Generated);
            assert_eq!(chunk.generation(), 1);
        }
        let ready = volume.drain_ready();
        assert_eq!(ready.len(), 8);
        assert!(ready.iter().all(|r| r.snapshot.mesh.is_empty()));
    }

    #[test]
    fn test_create_rejects_reserved_algorithm() {
        let mut settings = inline_settings(IVec3::splat(4), IVec3::splat(2));
        settings.algorithm = MeshingAlgorithm::Greedy;
        let err = Volume::create(settings).err().unwrap();
        assert!(matches!(
            err,
            VolumeError::Meshing(MeshingError::UnsupportedAlgorithm(MeshingAlgorithm::Greedy))
        ));
    }

    #[test]
    fn test_missing_material_still_creates() {
        let mut settings = inline_settings(IVec3::splat(2), IVec3::splat(2));
        settings.material = None;
        let volume = Volume::create(settings).unwrap();
        assert!(volume.drain_ready()[0].material.is_none());
    }

    #[test]
    fn test_dims_clamped_on_create() {
        let volume = Volume::create(inline_settings(IVec3::new(0, 3, 3), IVec3::new(32, 0, 3))).unwrap();
        assert_eq!(volume.volume_dims(), IVec3::new(1, 3, 3));
        assert_eq!(volume.chunk_dims(), IVec3::new(16, 1, 3));
        assert_eq!(volume.grid_extent(), IVec3::new(1, 3, 1));
    }

    #[test]
    fn test_set_marks_owning_chunk_once() {
        let mut volume = Volume::create(inline_settings(IVec3::splat(8), IVec3::splat(4))).unwrap();
        assert!(volume.set_voxel(IVec3::new(5, 1, 2), Rgba8::RED));
        assert!(volume.set_voxel(IVec3::new(6, 1, 2), Rgba8::RED));
        assert_eq!(volume.dirty_count(), 1);
        assert!(volume.is_dirty(IVec3::new(1, 0, 0)));
        assert!(!volume.is_dirty(IVec3::ZERO));
    }

    #[test]
    fn test_out_of_range_set_changes_nothing() {
        let mut volume = Volume::create(inline_settings(IVec3::splat(4), IVec3::splat(2))).unwrap();
        assert!(!volume.set_voxel(IVec3::new(4, 0, 0), Rgba8::RED));
        assert!(!volume.set_voxel(IVec3::new(0, -1, 0), Rgba8::RED));
        assert_eq!(volume.dirty_count(), 0);
        assert_eq!(volume.get_voxel(IVec3::new(0, 0, 4)), None);
    }

    #[test]
    fn test_world_lookup_uses_floor() {
        let mut settings = inline_settings(IVec3::splat(4), IVec3::splat(2)).with_voxel_scale(Vec3::splat(0.5));
        settings.origin = Vec3::new(-1.0, 0.0, 0.0);
        let mut volume = Volume::create(settings).unwrap();

        assert_eq!(volume.voxel_index_at_world(Vec3::new(-0.74, 0.2, 1.99)), Some(IVec3::new(0, 0, 3)));
        assert_eq!(volume.voxel_index_at_world(Vec3::new(-1.01, 0.0, 0.0)), Some(IVec3::new(-1, 0, 0)));
        assert_eq!(volume.voxel_index_at_world(Vec3::NAN), None);

        assert!(volume.set_voxel_at_world(Vec3::new(0.1, 0.6, 0.0), Rgba8::BLUE));
        assert_eq!(volume.get_voxel(IVec3::new(2, 1, 0)), Some(Rgba8::BLUE));
        assert!(!volume.set_voxel_at_world(Vec3::new(-1.5, 0.0, 0.0), Rgba8::BLUE));
        assert_eq!(volume.get_voxel_at_world(Vec3::new(0.1, 0.6, 0.0)), Some(Rgba8::BLUE));
    }

    #[test]
    fn test_fill_non_solid_zeroes_alpha() {
        let mut volume = Volume::create(inline_settings(IVec3::splat(4), IVec3::splat(2))).unwrap();
        volume.fill(Rgba8::GREEN, false);
        assert_eq!(volume.dirty_count(), 8);
        assert!(volume.voxels().iter().all(|v| *v == Rgba8::new(0, 255, 0, 0)));

        volume.tick();
        assert!(volume.drain_ready().iter().all(|r| r.snapshot.mesh.is_empty()));
    }

    #[test]
    fn test_chunk_world_position() {
        let settings = inline_settings(IVec3::splat(8), IVec3::new(4, 2, 4)).with_voxel_scale(Vec3::splat(0.5));
        let volume = Volume::create(settings).unwrap();
        assert_eq!(volume.chunk_world_position(IVec3::new(1, 3, 0)), Some(Vec3::new(2.0, 3.0, 0.0)));
        assert_eq!(
            volume.chunk(IVec3::new(1, 3, 0)).unwrap().world_position(),
            Vec3::new(2.0, 3.0, 0.0)
        );
        assert!(volume.chunk(IVec3::new(2, 0, 0)).is_none());
        assert_eq!(volume.chunk_world_position(IVec3::new(2, 0, 0)), None);
    }

    #[test]
    fn test_out_of_grid_chunk_queries_return_none() {
        for seamless in [false, true] {
            let settings = inline_settings(IVec3::splat(4), IVec3::splat(2)).with_seamless_chunks(seamless);
            let volume = Volume::create(settings).unwrap();
            for index in [IVec3::splat(i32::MAX), IVec3::splat(i32::MIN), IVec3::new(0, -1, 0)] {
                assert_eq!(volume.chunk_world_position(index), None);
                assert_eq!(volume.extract_chunk_voxels(index), None);
                assert!(matches!(
                    volume.extract_chunk_block(index),
                    Err(VolumeError::ChunkOutOfRange(i)) if i == index
                ));
            }
        }
    }

    #[test]
    fn test_create_rejects_grid_past_voxel_cap() {
        let settings = inline_settings(IVec3::new(65536, 65536, 1), IVec3::splat(16));
        let err = Volume::create(settings).err().unwrap();
        assert!(matches!(err, VolumeError::TooLarge(dims) if dims == IVec3::new(65536, 65536, 1)));

        let settings = inline_settings(IVec3::splat(i32::MAX), IVec3::splat(16));
        assert!(matches!(Volume::create(settings).err().unwrap(), VolumeError::TooLarge(_)));
    }

    #[test]
    fn test_cell_count_detects_overflow() {
        assert_eq!(cell_count(IVec3::new(2, 3, 4)), Some(24));
        assert_eq!(cell_count(IVec3::new(-1, 3, 4)), None);
        assert_eq!(cell_count(IVec3::splat(1 << 10)), Some(1 << 30));
        assert_eq!(cell_count(IVec3::splat(i32::MAX)), None);
    }

    #[test]
    fn test_seamless_edit_on_face_dirties_neighbor() {
        let settings = inline_settings(IVec3::new(8, 4, 4), IVec3::splat(4)).with_seamless_chunks(true);
        let mut volume = Volume::create(settings).unwrap();
        volume.set_voxel(IVec3::new(3, 1, 1), Rgba8::RED);
        assert!(volume.is_dirty(IVec3::ZERO));
        assert!(volume.is_dirty(IVec3::new(1, 0, 0)));
        assert_eq!(volume.dirty_count(), 2);
    }

    #[test]
    fn test_seamless_block_carries_neighbor_halo() {
        let settings = inline_settings(IVec3::new(4, 2, 2), IVec3::new(2, 2, 2)).with_seamless_chunks(true);
        let mut volume = Volume::create(settings).unwrap();
        volume.set_voxel(IVec3::new(2, 0, 0), Rgba8::RED);

        let block = volume.extract_chunk_block(IVec3::ZERO).unwrap();
        assert!(block.is_padded());
        assert_eq!(block.get(2, 0, 0), Some(Rgba8::RED));
        assert_eq!(block.get(-1, 0, 0), Some(Rgba8::EMPTY));
    }

    #[test]
    fn test_bounds_and_trigger_containment() {
        let mut settings = inline_settings(IVec3::new(4, 2, 8), IVec3::splat(2)).with_voxel_scale(Vec3::splat(0.25));
        settings.origin = Vec3::new(10.0, 0.0, -1.0);
        let volume = Volume::create(settings).unwrap();

        let bounds = volume.bounds();
        assert_eq!(bounds.min, Vec3::new(10.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 0.5, 1.0));
        assert_eq!(bounds.size(), Vec3::new(1.0, 0.5, 2.0));
        assert!(volume.contains_world(Vec3::new(10.5, 0.25, 0.0)));
        assert!(!volume.contains_world(Vec3::new(11.0, 0.25, 0.0)));
    }
}
