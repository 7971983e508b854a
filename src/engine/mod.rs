//! The constraint propagation engine.
//!
//! The engine keeps one candidate mask per cell and refines them through
//! three phases that the caller drives explicitly: finders scan the masks
//! and queue deduction records, appliers pop the records and perform the
//! eliminations, and when no deduction is found a guess snapshots the state
//! and commits a speculative candidate.
//!
//! Contradictions never escape as errors. Whenever a mask would become
//! empty, the engine unwinds the most recent guess on its own and reports
//! the fact through [`UnwindInfo`], which every mutating operation returns.
//! Once an unwind runs past the last guess the engine is done: no solutions
//! remain in the search space.

pub(crate) mod apply;
pub(crate) mod find;
pub(crate) mod queues;
pub(crate) mod subsets;

use crate::bitset::SymSet;
use crate::board::{Grid, HouseKind, Order};

use self::queues::FoundQueues;
use self::subsets::HouseSubsets;

/// How much state an operation had to throw away.
///
/// Returned by every operation that can hit a contradiction. Must not be
/// ignored: after an unwind all previously found deductions are void and
/// the caller has to restart its deduction loop.
#[must_use]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnwindInfo {
    /// No contradiction was hit.
    NoUnwind,
    /// At least one guess was rolled back; the engine is at an older,
    /// still viable state.
    UnwoundOne,
    /// The contradiction ran past the oldest guess. The search space is
    /// exhausted and the engine is terminal.
    UnwoundPastRoot,
}

impl UnwindInfo {
    /// Whether any state was discarded.
    #[inline]
    pub fn did_unwind(self) -> bool {
        !matches!(self, UnwindInfo::NoUnwind)
    }

    /// Whether the engine became terminal.
    #[inline]
    pub fn did_unwind_root(self) -> bool {
        matches!(self, UnwindInfo::UnwoundPastRoot)
    }

    /// The "worse" of two outcomes, for chaining sub-operations.
    #[inline]
    pub(crate) fn and(self, other: UnwindInfo) -> UnwindInfo {
        std::cmp::max(self as u8, other as u8).into()
    }
}

impl From<u8> for UnwindInfo {
    fn from(val: u8) -> Self {
        match val {
            0 => UnwindInfo::NoUnwind,
            1 => UnwindInfo::UnwoundOne,
            _ => UnwindInfo::UnwoundPastRoot,
        }
    }
}

/// A speculative commitment of one symbol to one cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Guess {
    /// Row-major cell index.
    pub cell: u16,
    /// Symbol to commit.
    pub sym: u8,
}

/// Snapshot of everything a guess may corrupt.
///
/// The per-house solved masks are cheap to rebuild from the candidate
/// masks and deliberately not part of the snapshot.
#[derive(Clone, Debug)]
struct Frame {
    cells_cands: Vec<SymSet>,
    subsets: HouseSubsets,
    num_unsolved: u16,
}

#[derive(Clone, Debug)]
struct GuessFrame {
    frame: Frame,
    guess: Guess,
}

/// Candidate state and guess stack for one puzzle at a time.
///
/// Construct once per order with [`new`](Engine::new), then [`reinit`]
/// for each puzzle to reuse the allocations.
///
/// [`reinit`]: Engine::reinit
#[derive(Clone, Debug)]
pub struct Engine {
    order: Order,
    /// One candidate mask per cell. A mask of size one is a solved cell.
    cells_cands: Vec<SymSet>,
    /// Per house, the symbols already committed in it. Rebuilt after
    /// unwinds, not snapshotted.
    house_solved_syms: Vec<SymSet>,
    subsets: HouseSubsets,
    queues: FoundQueues,
    guess_stack: Vec<GuessFrame>,
    num_unsolved: u16,
    no_solutions_remain: bool,
}

impl Engine {
    /// Creates an engine for grids of the given order, initialized to the
    /// empty grid.
    pub fn new(order: Order) -> Engine {
        let full = SymSet::all(order.symbol_count());
        Engine {
            order,
            cells_cands: vec![full; usize::from(order.cell_count())],
            house_solved_syms: vec![SymSet::NONE; usize::from(order.house_count())],
            subsets: HouseSubsets::new(order),
            queues: FoundQueues::new(),
            guess_stack: vec![],
            num_unsolved: order.cell_count(),
            no_solutions_remain: false,
        }
    }

    /// Resets the engine and registers the givens of `grid`.
    ///
    /// Conflicting givens are not rejected here; the conflict surfaces as a
    /// terminal unwind on the first [`apply_all_queued`].
    ///
    /// # Precondition
    /// `grid` must have the engine's order (`debug_assert!`ed).
    ///
    /// [`apply_all_queued`]: Engine::apply_all_queued
    pub fn reinit(&mut self, grid: &Grid) {
        debug_assert_eq!(grid.order(), self.order);
        let full = SymSet::all(self.order.symbol_count());
        for cands in &mut self.cells_cands {
            *cands = full;
        }
        for solved in &mut self.house_solved_syms {
            *solved = SymSet::NONE;
        }
        self.subsets.reset(self.order);
        self.queues.clear();
        self.guess_stack.clear();
        self.num_unsolved = self.order.cell_count();
        self.no_solutions_remain = false;

        for (cell, given) in grid.iter().enumerate() {
            if let Some(sym) = given {
                let info = self.register_given(cell as u16, sym);
                debug_assert!(!info.did_unwind());
            }
        }
    }

    /// The engine's grid order.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of cells whose mask still has several candidates.
    #[inline]
    pub fn num_unsolved(&self) -> u16 {
        self.num_unsolved
    }

    /// Whether the search space is exhausted.
    #[inline]
    pub fn no_solutions_remain(&self) -> bool {
        self.no_solutions_remain
    }

    /// Number of guesses currently on the stack.
    #[inline]
    pub fn guess_stack_depth(&self) -> usize {
        self.guess_stack.len()
    }

    /// The current candidate mask of a cell.
    #[inline]
    pub fn cell_candidates(&self, cell: u16) -> SymSet {
        *index(&self.cells_cands, usize::from(cell))
    }

    /// Whether any found deduction is still waiting to be applied.
    #[inline]
    pub fn has_queued_deductions(&self) -> bool {
        !self.queues.is_empty()
    }

    /// Reads the solved grid out of the candidate masks.
    ///
    /// # Precondition
    /// The engine must be non-terminal with zero unsolved cells
    /// (`debug_assert!`ed).
    pub fn build_solution(&self) -> Grid {
        debug_assert!(!self.no_solutions_remain);
        debug_assert_eq!(self.num_unsolved, 0);
        let mut grid = Grid::empty(self.order);
        for cell in self.order.cells() {
            grid.set(cell, Some(self.cell_candidates(cell).first()));
        }
        grid
    }

    /// Snapshots the state and commits `guess`.
    ///
    /// The commitment is queued like any forced single; run
    /// [`apply_all_queued`] afterwards.
    ///
    /// # Preconditions
    /// No deductions may be queued and the guessed cell must be unsolved
    /// with `guess.sym` among its candidates (all `debug_assert!`ed).
    ///
    /// [`apply_all_queued`]: Engine::apply_all_queued
    pub fn push_guess(&mut self, guess: Guess) {
        debug_assert!(!self.no_solutions_remain);
        debug_assert!(self.queues.is_empty());
        let cands = self.cell_candidates(guess.cell);
        debug_assert!(cands.len() > 1);
        debug_assert!(cands.contains(guess.sym));

        self.guess_stack.push(GuessFrame {
            frame: Frame {
                cells_cands: self.cells_cands.clone(),
                subsets: self.subsets.clone(),
                num_unsolved: self.num_unsolved,
            },
            guess,
        });
        // cannot contradict, the mask keeps guess.sym
        let _ = self.retain_set(guess.cell, SymSet::from_index(guess.sym));
    }

    /// Rolls back the most recent guess and eliminates the guessed symbol
    /// from the restored state. With an empty guess stack the engine
    /// becomes terminal instead.
    ///
    /// This is the only way candidate state is ever discarded; every
    /// contradiction funnels through here.
    pub fn unwind_one_frame(&mut self) -> UnwindInfo {
        debug_assert!(!self.no_solutions_remain);
        self.queues.clear();
        let GuessFrame { frame, guess } = match self.guess_stack.pop() {
            Some(top) => top,
            None => {
                self.no_solutions_remain = true;
                return UnwindInfo::UnwoundPastRoot;
            }
        };
        self.cells_cands = frame.cells_cands;
        self.subsets = frame.subsets;
        self.num_unsolved = frame.num_unsolved;
        self.rebuild_house_solved_syms();
        // the guessed branch is exhausted, its symbol goes away for good
        match self.eliminate(guess.cell, guess.sym) {
            UnwindInfo::UnwoundPastRoot => UnwindInfo::UnwoundPastRoot,
            _ => UnwindInfo::UnwoundOne,
        }
    }

    /// Restricts a cell's mask to the given's symbol and queues the
    /// commitment.
    ///
    /// # Preconditions
    /// `sym` must currently be a candidate of a still unsolved `cell`
    /// (`debug_assert!`ed).
    fn register_given(&mut self, cell: u16, sym: u8) -> UnwindInfo {
        debug_assert!(sym < self.order.symbol_count());
        debug_assert!(self.cell_candidates(cell).contains(sym));
        debug_assert!(self.cell_candidates(cell).len() > 1);
        self.retain_set(cell, SymSet::from_index(sym))
    }

    /// Removes one candidate from a cell's mask.
    pub(crate) fn eliminate(&mut self, cell: u16, sym: u8) -> UnwindInfo {
        self.eliminate_set(cell, SymSet::from_index(sym))
    }

    /// Removes `syms` from a cell's mask.
    pub(crate) fn eliminate_set(&mut self, cell: u16, syms: SymSet) -> UnwindInfo {
        self.change_mask(cell, |cands| cands.without(syms))
    }

    /// Intersects a cell's mask with `syms`.
    pub(crate) fn retain_set(&mut self, cell: u16, syms: SymSet) -> UnwindInfo {
        self.change_mask(cell, |cands| cands & syms)
    }

    /// All mask shrinking funnels through here. Reaching a single candidate
    /// queues a forced single, reaching zero unwinds.
    fn change_mask(&mut self, cell: u16, change: impl FnOnce(SymSet) -> SymSet) -> UnwindInfo {
        let cands = index_mut(&mut self.cells_cands, usize::from(cell));
        let old = *cands;
        let new = change(old);
        debug_assert!(new.without(old).is_empty(), "masks only ever shrink");
        if new == old {
            return UnwindInfo::NoUnwind;
        }
        *cands = new;
        match new.len() {
            0 => self.unwind_one_frame(),
            1 => {
                // old had more than one candidate, the cell is newly solved
                self.cell_solved(cell, new.first());
                self.queues.push_forced_single(cell, new.first());
                UnwindInfo::NoUnwind
            }
            _ => UnwindInfo::NoUnwind,
        }
    }

    /// Solved-cell bookkeeping shared by mask shrinking and the hidden
    /// single applier.
    pub(crate) fn cell_solved(&mut self, cell: u16, sym: u8) {
        self.num_unsolved -= 1;
        let order = self.order;
        let [rows, rest] = split_houses(&mut self.house_solved_syms, order);
        let [cols, blocks] = split_houses(rest, order);
        SymSet::set3(
            [
                index_mut(rows, usize::from(order.row_of(cell))),
                index_mut(cols, usize::from(order.col_of(cell))),
                index_mut(blocks, usize::from(order.block_of(cell))),
            ],
            sym,
        );
    }

    /// Symbols already committed in the given house.
    #[inline]
    pub(crate) fn house_solved_syms(&self, kind: HouseKind, house: u8) -> SymSet {
        let idx = HouseSubsets::flat_index(self.order, kind, house);
        *index(&self.house_solved_syms, idx)
    }

    fn rebuild_house_solved_syms(&mut self) {
        for solved in &mut self.house_solved_syms {
            *solved = SymSet::NONE;
        }
        for cell in self.order.cells() {
            if let Some(sym) = self.cell_candidates(cell).unique() {
                let order = self.order;
                let [rows, rest] = split_houses(&mut self.house_solved_syms, order);
                let [cols, blocks] = split_houses(rest, order);
                SymSet::set3(
                    [
                        index_mut(rows, usize::from(order.row_of(cell))),
                        index_mut(cols, usize::from(order.col_of(cell))),
                        index_mut(blocks, usize::from(order.block_of(cell))),
                    ],
                    sym,
                );
            }
        }
    }
}

/// Splits the flat house array after the first kind's N² entries.
#[inline]
fn split_houses(houses: &mut [SymSet], order: Order) -> [&mut [SymSet]; 2] {
    let (head, tail) = houses.split_at_mut(usize::from(order.symbol_count()));
    [head, tail]
}

// ----------------------------------------------------------------
// compile bounds checks in slice accesses
// the value space for indexes is limited enough that any error
// is likely to immediately show up in tests
// ----------------------------------------------------------------

#[inline(always)]
pub(crate) fn index<T>(slice: &[T], idx: usize) -> &T {
    if cfg!(feature = "unchecked_indexing") {
        debug_assert!(idx < slice.len());
        unsafe { slice.get_unchecked(idx) }
    } else {
        &slice[idx]
    }
}

#[inline(always)]
pub(crate) fn index_mut<T>(slice: &mut [T], idx: usize) -> &mut T {
    if cfg!(feature = "unchecked_indexing") {
        debug_assert!(idx < slice.len());
        unsafe { slice.get_unchecked_mut(idx) }
    } else {
        &mut slice[idx]
    }
}
