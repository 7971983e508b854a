//! Queues of found, not yet applied deductions.
//!
//! Finders never mutate candidates directly. They push records into these
//! queues and the engine applies them later, so a single finder pass can
//! batch everything it sees before the candidate state shifts under it.

use std::collections::VecDeque;

use crate::bitset::SymSet;
use crate::board::LineKind;

/// A cell whose candidate mask was reduced to a single symbol, or a symbol
/// claimed by a single cell of a house.
///
/// Both flavors commit `sym` into `cell`; the applier handles the case where
/// the cell still has several candidates.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct ForcedSingle {
    pub cell: u16,
    pub sym: u8,
}

/// Which part of a line/block intersection keeps the locked symbols.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum LockedTarget {
    /// Symbols confined to the intersection within the line; eliminate from
    /// the rest of the block.
    RestOfBlock,
    /// Symbols confined to the intersection within the block; eliminate from
    /// the rest of the line.
    RestOfLine,
}

/// Symbols locked into a single line/block intersection.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct LockedCands {
    pub syms: SymSet,
    pub line_kind: LineKind,
    pub line: u8,
    pub block: u8,
    pub target: LockedTarget,
}

/// A found deduction, created once by a finder and consumed once by an
/// applier.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Found {
    ForcedSingle(ForcedSingle),
    /// Subset eliminations are applied eagerly by the finder while it holds
    /// the house tracker; the marker only keeps queue-emptiness bookkeeping
    /// uniform.
    SubsetMarker,
    LockedCands(LockedCands),
}

/// The pending deduction queues, one per record kind, drained in priority
/// order (singles before subsets before intersections).
#[derive(Clone, Default, Debug)]
pub(crate) struct FoundQueues {
    forced_singles: VecDeque<ForcedSingle>,
    subsets: VecDeque<()>,
    locked_cands: VecDeque<LockedCands>,
}

impl FoundQueues {
    pub fn new() -> Self {
        FoundQueues::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forced_singles.is_empty() && self.subsets.is_empty() && self.locked_cands.is_empty()
    }

    /// Drops all pending records. Called when a frame unwinds; queued
    /// deductions refer to the abandoned state.
    pub fn clear(&mut self) {
        self.forced_singles.clear();
        self.subsets.clear();
        self.locked_cands.clear();
    }

    pub fn push_forced_single(&mut self, cell: u16, sym: u8) {
        self.forced_singles.push_back(ForcedSingle { cell, sym });
    }

    pub fn push_subset_marker(&mut self) {
        self.subsets.push_back(());
    }

    pub fn push_locked_cands(&mut self, found: LockedCands) {
        self.locked_cands.push_back(found);
    }

    /// Pops the highest priority record. Popping happens before applying;
    /// an applier may push new records while one is in flight.
    pub fn pop_first(&mut self) -> Option<Found> {
        if let Some(single) = self.forced_singles.pop_front() {
            return Some(Found::ForcedSingle(single));
        }
        if self.subsets.pop_front().is_some() {
            return Some(Found::SubsetMarker);
        }
        self.locked_cands.pop_front().map(Found::LockedCands)
    }
}
