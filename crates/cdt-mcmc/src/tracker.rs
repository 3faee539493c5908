use std::ops::{Add, AddAssign, Index, IndexMut};

use cdt_core::MoveType;
use serde::{Deserialize, Serialize};

/// Per-move-type counter used for every ledger of the engine and of move commands.
///
/// Counts only grow: by indexing (`tracker[MoveType::TwoThree] += 1`) or by
/// merging two trackers with `+`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTracker {
    counts: [u64; 6],
}

impl MoveTracker {
    /// A tracker with every count zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of one move type.
    pub fn record(&mut self, move_type: MoveType) {
        self[move_type] += 1;
    }

    /// Sum over all move types.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Count for the null move.
    pub fn null_moves(&self) -> u64 {
        self[MoveType::Null]
    }

    /// Count for (2,3) moves.
    pub fn two_three_moves(&self) -> u64 {
        self[MoveType::TwoThree]
    }

    /// Count for (3,2) moves.
    pub fn three_two_moves(&self) -> u64 {
        self[MoveType::ThreeTwo]
    }

    /// Count for (2,6) moves.
    pub fn two_six_moves(&self) -> u64 {
        self[MoveType::TwoSix]
    }

    /// Count for (6,2) moves.
    pub fn six_two_moves(&self) -> u64 {
        self[MoveType::SixTwo]
    }

    /// Count for (4,4) moves.
    pub fn four_four_moves(&self) -> u64 {
        self[MoveType::FourFour]
    }

    /// Iterates over `(move type, count)` in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = (MoveType, u64)> + '_ {
        MoveType::ALL
            .iter()
            .map(move |move_type| (*move_type, self[*move_type]))
    }
}

impl Index<MoveType> for MoveTracker {
    type Output = u64;

    fn index(&self, move_type: MoveType) -> &u64 {
        &self.counts[move_type.index()]
    }
}

impl IndexMut<MoveType> for MoveTracker {
    fn index_mut(&mut self, move_type: MoveType) -> &mut u64 {
        &mut self.counts[move_type.index()]
    }
}

impl Add for MoveTracker {
    type Output = MoveTracker;

    fn add(mut self, rhs: MoveTracker) -> MoveTracker {
        self += rhs;
        self
    }
}

impl AddAssign for MoveTracker {
    fn add_assign(&mut self, rhs: MoveTracker) {
        for (count, other) in self.counts.iter_mut().zip(rhs.counts) {
            *count += other;
        }
    }
}
