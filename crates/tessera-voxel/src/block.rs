//! Owned, chunk-shaped windows of voxel data handed to the mesher.
//!
//! A [`VoxelBlock`] covers `dims` core cells. A padded block additionally
//! stores a one-cell halo on every side so neighbor lookups across the chunk
//! boundary can see real data. Coordinates passed to [`VoxelBlock::get`] are
//! always core-local: `0..dims` is the core, `-1` and `dims` are halo cells.

use glam::IVec3;
use thiserror::Error;

use crate::color::Rgba8;
use crate::coords::flat_index;

/// Errors raised when a voxel buffer does not match the declared block shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockShapeError {
    /// A dimension was zero or negative.
    #[error("block dimensions must be positive, got {0}")]
    InvalidDims(IVec3),
    /// The buffer length does not match the (possibly padded) shape.
    #[error("voxel buffer has {actual} cells, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A flat voxel buffer with its shape and optional one-cell halo.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelBlock {
    dims: IVec3,
    padding: i32,
    voxels: Vec<Rgba8>,
}

impl VoxelBlock {
    /// Wraps an unpadded buffer of exactly `dims.x * dims.y * dims.z` cells.
    pub fn new(dims: IVec3, voxels: Vec<Rgba8>) -> Result<Self, BlockShapeError> {
        Self::with_padding(dims, 0, voxels)
    }

    /// Wraps a buffer shaped `dims + 2` on every axis: the core plus a halo.
    pub fn padded(dims: IVec3, voxels: Vec<Rgba8>) -> Result<Self, BlockShapeError> {
        Self::with_padding(dims, 1, voxels)
    }

    /// An all-empty unpadded block.
    pub fn empty(dims: IVec3) -> Result<Self, BlockShapeError> {
        Self::new(dims, vec![Rgba8::EMPTY; Self::cell_count(dims, 0)?])
    }

    /// An all-empty padded block.
    pub fn empty_padded(dims: IVec3) -> Result<Self, BlockShapeError> {
        Self::padded(dims, vec![Rgba8::EMPTY; Self::cell_count(dims, 1)?])
    }

    fn with_padding(
        dims: IVec3,
        padding: i32,
        voxels: Vec<Rgba8>,
    ) -> Result<Self, BlockShapeError> {
        let expected = Self::cell_count(dims, padding)?;
        if voxels.len() != expected {
            return Err(BlockShapeError::LengthMismatch {
                expected,
                actual: voxels.len(),
            });
        }
        Ok(Self {
            dims,
            padding,
            voxels,
        })
    }

    fn cell_count(dims: IVec3, padding: i32) -> Result<usize, BlockShapeError> {
        if dims.cmple(IVec3::ZERO).any() {
            return Err(BlockShapeError::InvalidDims(dims));
        }
        let s = dims + IVec3::splat(2 * padding);
        Ok(s.x as usize * s.y as usize * s.z as usize)
    }

    /// Core dimensions (excluding the halo).
    pub fn dims(&self) -> IVec3 {
        self.dims
    }

    pub fn is_padded(&self) -> bool {
        self.padding > 0
    }

    /// Dimensions of the backing buffer (core plus halo on both sides).
    fn storage_dims(&self) -> IVec3 {
        self.dims + IVec3::splat(2 * self.padding)
    }

    /// Returns `true` if `(x, y, z)` addresses a stored cell (core or halo).
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let lo = -self.padding;
        let hi = self.dims + IVec3::splat(self.padding);
        x >= lo && y >= lo && z >= lo && x < hi.x && y < hi.y && z < hi.z
    }

    #[inline]
    fn offset(&self, x: i32, y: i32, z: i32) -> usize {
        let s = self.storage_dims();
        let p = self.padding;
        flat_index(
            s.x as usize,
            s.y as usize,
            (x + p) as usize,
            (y + p) as usize,
            (z + p) as usize,
        )
    }

    /// Voxel at core-local `(x, y, z)`, or `None` outside the stored cells.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Rgba8> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.voxels[self.offset(x, y, z)])
    }

    /// Returns `true` if a stored, solid voxel sits at `(x, y, z)`.
    ///
    /// Cells outside the stored window count as empty.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some_and(Rgba8::is_solid)
    }

    /// Writes a voxel at core-local `(x, y, z)`. Returns `false` outside the
    /// stored cells.
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: Rgba8) -> bool {
        if !self.contains(x, y, z) {
            return false;
        }
        let i = self.offset(x, y, z);
        self.voxels[i] = color;
        true
    }
}
