//! Guess selection when deduction is stuck.

use std::cmp::Reverse;

use crate::board::HouseKind;
use crate::engine::{Engine, Guess};

/// Box order below which the cheaper tie-breaking pays off.
const BIG_ORDER: u8 = 4;

/// Candidate count, solved counts of the cell's houses, guess proximity.
/// Lower compares as a better cell to guess on.
type GuessRank = (u8, [u8; 3], Reverse<u16>);

impl Engine {
    /// Picks the cell and symbol to speculate on next.
    ///
    /// Cell choice prefers few remaining candidates, then less solved
    /// houses, then (for big orders, where grids are sparse enough for it
    /// to matter) cells sharing houses with guesses already on the stack,
    /// so a wrong branch contradicts early instead of deep. Symbol choice
    /// prefers the candidate most contested among the cell's unsolved
    /// peers.
    ///
    /// # Precondition
    /// The engine must be non-terminal with at least one unsolved cell
    /// (`debug_assert!`ed).
    pub fn choose_guess(&self) -> Guess {
        debug_assert!(!self.no_solutions_remain());
        debug_assert!(self.num_unsolved() > 0);
        let order = self.order();
        let big = order.get() >= BIG_ORDER;

        let mut best: Option<(GuessRank, u16)> = None;
        for cell in order.cells() {
            let cands = self.cell_candidates(cell);
            if cands.len() < 2 {
                continue;
            }
            let mut solved_counts = [
                self.house_solved_syms(HouseKind::Row, order.row_of(cell)).len(),
                self.house_solved_syms(HouseKind::Col, order.col_of(cell)).len(),
                self.house_solved_syms(HouseKind::Block, order.block_of(cell)).len(),
            ];
            if big {
                solved_counts.sort_unstable_by_key(|&count| Reverse(count));
            } else {
                solved_counts = [
                    solved_counts[0] + solved_counts[1] + solved_counts[2],
                    0,
                    0,
                ];
            }
            let proximity = if big { self.guess_proximity(cell) } else { 0 };
            let rank = (cands.len(), solved_counts, Reverse(proximity));
            if best.map_or(true, |(best_rank, _)| rank < best_rank) {
                best = Some((rank, cell));
            }
        }
        let cell = match best {
            Some((_, cell)) => cell,
            // precondition violated
            None => unreachable!("choose_guess on a fully solved engine"),
        };
        Guess {
            cell,
            sym: self.most_contested_sym(cell),
        }
    }

    /// The candidate of `cell` wanted by the most unsolved peers.
    fn most_contested_sym(&self, cell: u16) -> u8 {
        let cands = self.cell_candidates(cell);
        let mut best_sym = cands.first();
        let mut best_demand = 0;
        let mut demand_of = [0u16; 128];
        for peer in self.order().peers(cell) {
            let peer_cands = self.cell_candidates(peer);
            if peer_cands.len() < 2 {
                continue;
            }
            for sym in peer_cands & cands {
                demand_of[usize::from(sym)] += 1;
            }
        }
        for sym in cands {
            if demand_of[usize::from(sym)] > best_demand {
                best_demand = demand_of[usize::from(sym)];
                best_sym = sym;
            }
        }
        best_sym
    }

    /// Number of stacked guesses sharing a house with `cell`.
    fn guess_proximity(&self, cell: u16) -> u16 {
        let order = self.order();
        self.guess_stack
            .iter()
            .map(|stacked| stacked.guess.cell)
            .filter(|&other| {
                other != cell
                    && (order.row_of(other) == order.row_of(cell)
                        || order.col_of(other) == order.col_of(cell)
                        || order.block_of(other) == order.block_of(cell))
            })
            .count() as u16
    }
}

#[cfg(test)]
mod tests {
    use crate::bitset::SymSet;
    use crate::board::{Grid, Order};
    use crate::engine::Engine;

    #[test]
    fn prefers_fewest_candidates() {
        let order = Order::new(3).unwrap();
        let mut engine = Engine::new(order);
        engine.reinit(&Grid::empty(order));
        let pair = SymSet::from_index(4) | SymSet::from_index(5);
        assert!(!engine.retain_set(53, pair).did_unwind());

        let guess = engine.choose_guess();
        assert_eq!(guess.cell, 53);
        assert!(pair.contains(guess.sym));
    }

    #[test]
    fn guessed_symbol_is_a_candidate() {
        let order = Order::new(2).unwrap();
        let mut grid = Grid::empty(order);
        grid.set(0, Some(0));
        let mut engine = Engine::new(order);
        engine.reinit(&grid);
        assert!(!engine.apply_all_queued().did_unwind());

        let guess = engine.choose_guess();
        let cands = engine.cell_candidates(guess.cell);
        assert!(cands.len() > 1);
        assert!(cands.contains(guess.sym));
    }
}
