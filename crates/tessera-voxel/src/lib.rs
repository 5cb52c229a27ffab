//! Colored voxel values, flat-index coordinate tools, and chunk-shaped voxel blocks.

pub mod block;
pub mod color;
pub mod coords;

pub use block::{BlockShapeError, VoxelBlock};
pub use color::Rgba8;
pub use coords::{flat_index, flat_index_ivec, grid_extent, unflatten_index};
