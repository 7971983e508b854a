//! The deduction loop driving the engine from givens to solutions.

use crate::board::Grid;
use crate::engine::Engine;

/// Default cap on subset sizes worth searching before guessing.
fn default_max_subset_size(symbol_count: u8) -> u8 {
    (symbol_count / 2).max(2)
}

/// Exhaustive solution enumerator for one puzzle.
///
/// Repeated [`next_solution`] calls yield every solution of the puzzle
/// exactly once, in the deterministic order the search visits them.
///
/// [`next_solution`]: Solver::next_solution
#[derive(Clone, Debug)]
pub struct Solver {
    engine: Engine,
    max_subset_size: u8,
}

impl Solver {
    /// Creates a solver for the given puzzle.
    pub fn new(puzzle: &Grid) -> Solver {
        Solver::with_max_subset_size(
            puzzle,
            default_max_subset_size(puzzle.order().symbol_count()),
        )
    }

    /// Creates a solver that caps the subset search at `max_subset_size`
    /// candidates. Larger subsets are left to guessing. A cap below 2
    /// disables the subset search.
    pub fn with_max_subset_size(puzzle: &Grid, max_subset_size: u8) -> Solver {
        let mut engine = Engine::new(puzzle.order());
        engine.reinit(puzzle);
        Solver {
            engine,
            max_subset_size,
        }
    }

    /// Searches up to the next solution. `None` once the search space is
    /// exhausted; every later call returns `None` as well.
    pub fn next_solution(&mut self) -> Option<Grid> {
        loop {
            if self.engine.no_solutions_remain() {
                return None;
            }
            if self.engine.has_queued_deductions() {
                let _ = self.engine.apply_all_queued();
                continue;
            }
            if self.engine.num_unsolved() == 0 {
                let solution = self.engine.build_solution();
                // drop back into the search so the next call continues
                // behind this solution instead of rebuilding it
                let _ = self.engine.unwind_one_frame();
                return Some(solution);
            }
            if self.engine.find_hidden_singles().did_unwind() {
                continue;
            }
            if self.engine.has_queued_deductions() {
                continue;
            }
            if self.max_subset_size >= 2 {
                if self.engine.find_subsets(self.max_subset_size).did_unwind() {
                    continue;
                }
                if self.engine.has_queued_deductions() {
                    continue;
                }
            }
            self.engine.find_locked_candidates();
            if self.engine.has_queued_deductions() {
                continue;
            }
            let guess = self.engine.choose_guess();
            self.engine.push_guess(guess);
        }
    }

    /// Counts solutions, stopping at `limit`.
    pub fn count_at_most(&mut self, limit: usize) -> usize {
        let mut count = 0;
        while count < limit && self.next_solution().is_some() {
            count += 1;
        }
        count
    }
}

impl Grid {
    /// Solves the grid, returning an arbitrary solution if one exists.
    pub fn solve_one(&self) -> Option<Grid> {
        Solver::new(self).next_solution()
    }

    /// Solves the grid iff it has a unique solution.
    pub fn solve_unique(&self) -> Option<Grid> {
        let mut solver = Solver::new(self);
        let solution = solver.next_solution()?;
        match solver.next_solution() {
            Some(_) => None,
            None => Some(solution),
        }
    }

    /// Collects up to `limit` solutions.
    pub fn solve_at_most(&self, limit: usize) -> Vec<Grid> {
        let mut solver = Solver::new(self);
        let mut solutions = vec![];
        while solutions.len() < limit {
            match solver.next_solution() {
                Some(solution) => solutions.push(solution),
                None => break,
            }
        }
        solutions
    }

    /// Counts the grid's solutions, stopping at `limit`.
    pub fn count_at_most(&self, limit: usize) -> usize {
        Solver::new(self).count_at_most(limit)
    }
}
