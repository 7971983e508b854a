//! Application of queued deduction records.
//!
//! Records are applied strictly in priority order: forced singles first,
//! then subset markers, then locked candidates. Records can be stale by the
//! time they are popped. Appliers tolerate anything an intervening
//! elimination can cause, up to and including the record's own premise
//! having become a contradiction.

use crate::bitset::SymSet;
use crate::board::HouseKind;

use super::queues::{ForcedSingle, Found, LockedCands, LockedTarget};
use super::{Engine, UnwindInfo};

impl Engine {
    /// Pops and applies the highest priority queued record.
    ///
    /// # Precondition
    /// At least one record must be queued (`debug_assert!`ed).
    pub fn apply_first_queued(&mut self) -> UnwindInfo {
        debug_assert!(self.has_queued_deductions());
        match self.queues.pop_first() {
            Some(Found::ForcedSingle(single)) => self.apply_forced_single(single),
            // eliminations already ran when the subset was found
            Some(Found::SubsetMarker) => UnwindInfo::NoUnwind,
            Some(Found::LockedCands(locked)) => self.apply_locked_cands(locked),
            None => UnwindInfo::NoUnwind,
        }
    }

    /// Drains the queues completely.
    ///
    /// Unwinding mid-drain clears the queues but the roll-back elimination
    /// can queue fresh records, so this keeps going until the queues stay
    /// empty or the engine is terminal.
    pub fn apply_all_queued(&mut self) -> UnwindInfo {
        let mut overall = UnwindInfo::NoUnwind;
        while self.has_queued_deductions() {
            overall = overall.and(self.apply_first_queued());
            if overall.did_unwind_root() {
                break;
            }
        }
        overall
    }

    /// Commits a single and eliminates its symbol from all peers.
    ///
    /// Covers both record flavors. A mask already down to the symbol was
    /// committed when it shrank; a wider mask is a hidden single and gets
    /// committed here. A mask that lost the symbol since the find means the
    /// symbol's house has no cell left for it.
    fn apply_forced_single(&mut self, single: ForcedSingle) -> UnwindInfo {
        let ForcedSingle { cell, sym } = single;
        let cands = self.cell_candidates(cell);
        if !cands.contains(sym) {
            return self.unwind_one_frame();
        }
        if cands.len() > 1 {
            *super::index_mut(&mut self.cells_cands, usize::from(cell)) = SymSet::from_index(sym);
            self.cell_solved(cell, sym);
        }
        self.eliminate_from_peers(cell, SymSet::from_index(sym))
    }

    /// Removes `syms` from every cell sharing a house with `cell`.
    pub(crate) fn eliminate_from_peers(&mut self, cell: u16, syms: SymSet) -> UnwindInfo {
        for peer in self.order.peers(cell) {
            let info = self.eliminate_set(peer, syms);
            if info.did_unwind() {
                return info;
            }
        }
        UnwindInfo::NoUnwind
    }

    /// Removes the locked symbols from the target house outside the
    /// line/block intersection.
    fn apply_locked_cands(&mut self, locked: LockedCands) -> UnwindInfo {
        let LockedCands {
            syms,
            line_kind,
            line,
            block,
            target,
        } = locked;
        let order = self.order;
        let (kind, house, skip_kind, skip_house) = match target {
            LockedTarget::RestOfBlock => (HouseKind::Block, block, line_kind.as_house_kind(), line),
            LockedTarget::RestOfLine => (line_kind.as_house_kind(), line, HouseKind::Block, block),
        };
        for idx in 0..order.symbol_count() {
            let peer = order.house_cell(kind, house, idx);
            if order.house_of(skip_kind, peer) == skip_house {
                continue;
            }
            let info = self.eliminate_set(peer, syms);
            if info.did_unwind() {
                return info;
            }
        }
        UnwindInfo::NoUnwind
    }
}

#[cfg(test)]
mod tests {
    use crate::bitset::SymSet;
    use crate::board::{Grid, LineKind, Order};
    use crate::engine::queues::{LockedCands, LockedTarget};
    use crate::engine::{Engine, UnwindInfo};

    fn order2_engine_with(givens: &[(u16, u8)]) -> Engine {
        let order = Order::new(2).unwrap();
        let mut grid = Grid::empty(order);
        for &(cell, sym) in givens {
            grid.set(cell, Some(sym));
        }
        let mut engine = Engine::new(order);
        engine.reinit(&grid);
        engine
    }

    #[test]
    fn forced_single_eliminates_from_peers() {
        let mut engine = order2_engine_with(&[(0, 2)]);
        let info = engine.apply_all_queued();
        assert_eq!(info, UnwindInfo::NoUnwind);
        // row 0, col 0 and block 0 peers lost symbol 2
        for &peer in &[1u16, 2, 3, 4, 8, 12, 5] {
            assert!(!engine.cell_candidates(peer).contains(2), "peer {}", peer);
        }
        // cell outside all three houses kept it
        assert!(engine.cell_candidates(6).contains(2));
    }

    #[test]
    fn conflicting_givens_unwind_past_root() {
        // same symbol twice in row 0
        let mut engine = order2_engine_with(&[(0, 1), (3, 1)]);
        let info = engine.apply_all_queued();
        assert_eq!(info, UnwindInfo::UnwoundPastRoot);
        assert!(engine.no_solutions_remain());
    }

    #[test]
    fn apply_all_is_idempotent() {
        let mut engine = order2_engine_with(&[(0, 0), (5, 1), (10, 2)]);
        let info = engine.apply_all_queued();
        assert_eq!(info, UnwindInfo::NoUnwind);
        let masks: Vec<SymSet> = (0..16).map(|cell| engine.cell_candidates(cell)).collect();
        let info = engine.apply_all_queued();
        assert_eq!(info, UnwindInfo::NoUnwind);
        let masks_after: Vec<SymSet> = (0..16).map(|cell| engine.cell_candidates(cell)).collect();
        assert_eq!(masks, masks_after);
    }

    #[test]
    fn locked_cands_clear_rest_of_block() {
        let mut engine = order2_engine_with(&[]);
        // pretend symbol 0 in row 0 is confined to block 0
        engine.queues.push_locked_cands(LockedCands {
            syms: SymSet::from_index(0),
            line_kind: LineKind::Row,
            line: 0,
            block: 0,
            target: LockedTarget::RestOfBlock,
        });
        let info = engine.apply_all_queued();
        assert_eq!(info, UnwindInfo::NoUnwind);
        // block 0 is cells 0,1,4,5; row 0 part (0,1) keeps the symbol
        assert!(engine.cell_candidates(0).contains(0));
        assert!(engine.cell_candidates(1).contains(0));
        assert!(!engine.cell_candidates(4).contains(0));
        assert!(!engine.cell_candidates(5).contains(0));
    }
}
