//! Dense dirty-chunk tracking.
//!
//! One bit per chunk answers "is this chunk already queued?" in O(1), and a
//! side list keeps the order chunks were first marked so a tick rebuilds
//! them deterministically.

use bitvec::vec::BitVec;

/// Set of linearized chunk indices awaiting regeneration.
#[derive(Clone, Debug, Default)]
pub struct DirtyChunks {
    bits: BitVec,
    /// Marked indices in first-marked order (dedup guard is `bits`).
    pending: Vec<usize>,
}

impl DirtyChunks {
    /// Creates an empty set able to track `chunk_count` chunks.
    pub fn new(chunk_count: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, chunk_count),
            pending: Vec::new(),
        }
    }

    /// Marks a chunk dirty. Returns `true` if it was not dirty before.
    ///
    /// Indices past the tracked range are ignored.
    pub fn mark(&mut self, index: usize) -> bool {
        if index >= self.bits.len() || self.bits.replace(index, true) {
            return false;
        }
        self.pending.push(index);
        true
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Number of dirty chunks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of chunks the set can track.
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Removes and returns every dirty index in the order it was first marked.
    pub fn drain(&mut self) -> Vec<usize> {
        self.bits.fill(false);
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
        self.pending.clear();
    }
}
