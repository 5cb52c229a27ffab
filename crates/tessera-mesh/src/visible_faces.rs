//! Six-bit set of exposed cube faces.

use crate::face_direction::FaceDirection;

/// The faces of one voxel that border an empty cell.
///
/// Bit `n` stands for the [`FaceDirection`] whose discriminant is `n`; the two
/// high bits are always clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibleFaces(u8);

impl VisibleFaces {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b0011_1111);

    const fn bit(direction: FaceDirection) -> u8 {
        1 << direction as u8
    }

    pub fn is_visible(self, direction: FaceDirection) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn set_visible(&mut self, direction: FaceDirection) {
        self.0 |= Self::bit(direction);
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set directions, in [`FaceDirection::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = FaceDirection> {
        FaceDirection::ALL
            .into_iter()
            .filter(move |&direction| self.is_visible(direction))
    }
}
