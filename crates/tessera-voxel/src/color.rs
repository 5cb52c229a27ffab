//! RGBA voxel color. The alpha channel doubles as the occupancy flag:
//! alpha 0 is empty space, anything else is a solid voxel drawn with that color.

use serde::{Deserialize, Serialize};

/// A voxel value: 8 bits per channel, 4 bytes total.
///
/// Zero-initialized memory is `Rgba8::EMPTY`, so freshly allocated grids
/// represent empty space.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

static_assertions::assert_eq_size!(Rgba8, [u8; 4]);

impl Rgba8 {
    /// Fully transparent black; the value of every unwritten voxel.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha 255).
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns `true` if this voxel occupies space (alpha > 0).
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.a != 0
    }

    /// Returns `true` if this voxel is empty space (alpha == 0).
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.a == 0
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(c: Rgba8) -> Self {
        c.to_array()
    }
}
