//! Hidden singles: symbols with a single remaining cell in some house.

use crate::bitset::SymSet;
use crate::board::HouseKind;
use crate::engine::{Engine, UnwindInfo};

impl Engine {
    /// Scans every house for symbols that have exactly one candidate cell
    /// left and queues them as forced singles.
    ///
    /// A symbol without any candidate cell in some house is a contradiction
    /// and unwinds immediately.
    pub fn find_hidden_singles(&mut self) -> UnwindInfo {
        let order = self.order();
        let full = SymSet::all(order.symbol_count());
        for &kind in &HouseKind::ALL {
            for house in 0..order.symbol_count() {
                // solved symbols start out in both masks so they can
                // neither look contradictory nor single
                let solved = self.house_solved_syms(kind, house);
                let mut seen = solved;
                let mut multi = solved;
                for idx in 0..order.symbol_count() {
                    let cands = self.cell_candidates(order.house_cell(kind, house, idx));
                    multi |= seen & cands;
                    seen |= cands;
                }
                if seen != full {
                    return self.unwind_one_frame();
                }
                let singles = seen.without(multi);
                if singles.is_empty() {
                    continue;
                }
                for idx in 0..order.symbol_count() {
                    let cell = order.house_cell(kind, house, idx);
                    let cands = self.cell_candidates(cell);
                    if cands.len() == 1 {
                        continue;
                    }
                    for sym in cands & singles {
                        self.queues.push_forced_single(cell, sym);
                    }
                }
            }
        }
        UnwindInfo::NoUnwind
    }
}

#[cfg(test)]
mod tests {
    use crate::bitset::SymSet;
    use crate::board::{Grid, Order};
    use crate::engine::{Engine, UnwindInfo};

    #[test]
    fn finds_symbol_with_single_home() {
        let order = Order::new(2).unwrap();
        // row 0: symbol 0 excluded from cells 0..=2 by the columns below
        let mut grid = Grid::empty(order);
        grid.set(4, Some(0)); // col 0
        grid.set(9, Some(0)); // col 1
        grid.set(14, Some(0)); // col 2
        let mut engine = Engine::new(order);
        engine.reinit(&grid);
        assert!(!engine.apply_all_queued().did_unwind());

        assert!(!engine.has_queued_deductions());
        let info = engine.find_hidden_singles();
        assert_eq!(info, UnwindInfo::NoUnwind);
        assert!(engine.has_queued_deductions());
        assert!(!engine.apply_all_queued().did_unwind());
        assert_eq!(engine.cell_candidates(3), SymSet::from_index(0));
    }

    #[test]
    fn symbol_without_home_unwinds() {
        let order = Order::new(2).unwrap();
        let mut engine = Engine::new(order);
        engine.reinit(&Grid::empty(order));
        // strip symbol 3 from all of row 0 by hand
        for cell in 0..4 {
            assert!(!engine.eliminate(cell, 3).did_unwind());
        }
        let info = engine.find_hidden_singles();
        assert_eq!(info, UnwindInfo::UnwoundPastRoot);
        assert!(engine.no_solutions_remain());
    }
}
