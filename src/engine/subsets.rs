//! Per-house bookkeeping for the naked/hidden subset search.
//!
//! Each house owns a permutation of its N² cells, tagged with the candidate
//! count the subset finder last saw for them. The permutation is partitioned
//! into *runs*: groups of cells already known to share no subset with cells
//! of other runs. Solved cells bubble to the front of their run and split
//! off into size-one runs, so the searchable part of a house shrinks as the
//! grid fills in.
//!
//! This state is heuristic only. It may lag behind the candidate masks
//! between finder passes and is snapshotted and restored wholesale with the
//! rest of a guess frame.

use std::mem;

use crate::bitset::CellSet;
use crate::board::{HouseKind, Order};

/// One house cell as seen by the subset finder.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct CellTag {
    /// Row-major index of the cell in the grid.
    pub rmi: u16,
    /// Candidate count at the time of the last subset pass over this house.
    pub cand_count: u8,
}

/// The tagged cell permutation of a single house.
#[derive(Clone, Default, Debug)]
pub(crate) struct HouseCells {
    /// Permutation of the house's cells. Runs are contiguous.
    pub tags: Vec<CellTag>,
    /// Bit `i` marks `tags[i]` as the first cell of a run.
    pub run_begin: CellSet,
}

impl HouseCells {
    fn reset(&mut self, order: Order, kind: HouseKind, house: u8) {
        self.tags.clear();
        for idx in 0..order.symbol_count() {
            self.tags.push(CellTag {
                rmi: order.house_cell(kind, house, idx),
                cand_count: order.symbol_count(),
            });
        }
        self.run_begin = CellSet::from_index(0);
    }

    /// End (exclusive) of the run starting at `begin`.
    pub fn run_end(&self, begin: u8) -> u8 {
        debug_assert!(self.run_begin.contains(begin));
        let len = self.tags.len() as u8;
        (begin + 1..len)
            .find(|&idx| self.run_begin.contains(idx))
            .unwrap_or(len)
    }

}

/// Subset-search state for all 3·N² houses, row houses first, then columns,
/// then blocks.
#[derive(Clone, Debug)]
pub(crate) struct HouseSubsets {
    houses: Vec<HouseCells>,
}

impl HouseSubsets {
    pub fn new(order: Order) -> Self {
        let mut subsets = HouseSubsets {
            houses: vec![HouseCells::default(); usize::from(order.house_count())],
        };
        subsets.reset(order);
        subsets
    }

    /// Re-tags every house for a fresh grid.
    pub fn reset(&mut self, order: Order) {
        debug_assert_eq!(self.houses.len(), usize::from(order.house_count()));
        for &kind in &HouseKind::ALL {
            for house in 0..order.symbol_count() {
                let idx = Self::flat_index(order, kind, house);
                self.houses[idx].reset(order, kind, house);
            }
        }
    }

    #[inline]
    pub fn flat_index(order: Order, kind: HouseKind, house: u8) -> usize {
        kind.as_index() * usize::from(order.symbol_count()) + usize::from(house)
    }

    /// Moves a house's state out so the caller can mutate it while also
    /// reading the engine's candidate masks. Pair with [`put_house`].
    ///
    /// [`put_house`]: Self::put_house
    pub fn take_house(&mut self, idx: usize) -> HouseCells {
        mem::take(&mut self.houses[idx])
    }

    pub fn put_house(&mut self, idx: usize, house: HouseCells) {
        debug_assert!(self.houses[idx].tags.is_empty());
        self.houses[idx] = house;
    }
}
