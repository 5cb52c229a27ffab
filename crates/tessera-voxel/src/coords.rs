//! Flat-index mapping shared by the voxel grid, chunk blocks, and the chunk table.
//!
//! All flat buffers use the same layout: x varies fastest, then y, then z.
//! None of these functions check bounds; callers validate coordinates first.

use glam::IVec3;

/// Linear offset of `(x, y, z)` in a buffer of width `size_x` and height `size_y`.
#[inline(always)]
pub const fn flat_index(size_x: usize, size_y: usize, x: usize, y: usize, z: usize) -> usize {
    x + size_x * (y + size_y * z)
}

/// [`flat_index`] for an in-range integer coordinate inside a grid of `size`.
#[inline(always)]
pub fn flat_index_ivec(size: IVec3, pos: IVec3) -> usize {
    debug_assert!(pos.cmpge(IVec3::ZERO).all() && pos.cmplt(size).all());
    flat_index(
        size.x as usize,
        size.y as usize,
        pos.x as usize,
        pos.y as usize,
        pos.z as usize,
    )
}

/// Inverse of [`flat_index`]: recovers `(x, y, z)` from a linear offset.
pub const fn unflatten_index(size_x: usize, size_y: usize, flat: usize) -> (usize, usize, usize) {
    let x = flat % size_x;
    let y = (flat / size_x) % size_y;
    let z = flat / (size_x * size_y);
    (x, y, z)
}

/// Number of chunks needed along each axis to tile `volume` with `chunk`-sized
/// blocks (`ceil(volume / chunk)` per component).
///
/// Both arguments must be positive on every axis.
pub fn grid_extent(volume: IVec3, chunk: IVec3) -> IVec3 {
    debug_assert!(volume.cmpgt(IVec3::ZERO).all() && chunk.cmpgt(IVec3::ZERO).all());
    (volume + chunk - IVec3::ONE) / chunk
}
