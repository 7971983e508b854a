//! Random generation of solved grids and minimal puzzles.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Grid, Order};
use crate::engine::{Engine, Guess};

/// Generates a uniformly scrambled solved grid.
///
/// Fills the empty grid with singles propagation and random guesses; bad
/// guesses unwind inside the engine, so this always terminates with a
/// valid solved grid.
pub fn generate_filled<R: Rng>(order: Order, rng: &mut R) -> Grid {
    let mut engine = Engine::new(order);
    engine.reinit(&Grid::empty(order));
    loop {
        debug_assert!(!engine.no_solutions_remain());
        if engine.has_queued_deductions() {
            let _ = engine.apply_all_queued();
            continue;
        }
        if engine.num_unsolved() == 0 {
            return engine.build_solution();
        }
        if engine.find_hidden_singles().did_unwind() {
            continue;
        }
        if engine.has_queued_deductions() {
            continue;
        }
        engine.push_guess(random_guess(&engine, rng));
    }
}

/// A random candidate of a random unsolved cell.
fn random_guess<R: Rng>(engine: &Engine, rng: &mut R) -> Guess {
    let order = engine.order();
    let nth_unsolved = rng.gen_range(0..engine.num_unsolved());
    let mut remaining = nth_unsolved;
    for cell in order.cells() {
        let cands = engine.cell_candidates(cell);
        if cands.len() < 2 {
            continue;
        }
        if remaining == 0 {
            return Guess {
                cell,
                sym: cands.nth(rng.gen_range(0..cands.len())),
            };
        }
        remaining -= 1;
    }
    unreachable!("fewer unsolved cells than counted")
}

/// Removes givens in random order as long as the puzzle keeps a unique
/// solution.
///
/// The result is minimal with respect to the removal order tried: removing
/// any single further given would admit a second solution. The input must
/// itself be uniquely solvable for that to mean anything; a solved grid
/// always qualifies.
pub fn minimize<R: Rng>(puzzle: &Grid, rng: &mut R) -> Grid {
    let mut puzzle = puzzle.clone();
    let mut givens: Vec<u16> = puzzle
        .order()
        .cells()
        .filter(|&cell| puzzle.get(cell).is_some())
        .collect();
    givens.shuffle(rng);
    for cell in givens {
        let sym = puzzle.get(cell);
        puzzle.set(cell, None);
        if puzzle.count_at_most(2) != 1 {
            puzzle.set(cell, sym);
        }
    }
    puzzle
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn filled_grids_are_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        for &n in &[2u8, 3] {
            let order = Order::new(n).unwrap();
            let grid = generate_filled(order, &mut rng);
            assert!(grid.is_fully_solved_and_valid());
        }
    }

    #[test]
    fn minimized_puzzles_stay_unique() {
        let mut rng = SmallRng::seed_from_u64(7);
        let order = Order::new(2).unwrap();
        let solved = generate_filled(order, &mut rng);
        let puzzle = minimize(&solved, &mut rng);
        assert!(puzzle.n_givens() < solved.n_givens());
        let solution = puzzle.solve_unique().unwrap();
        assert_eq!(solution, solved);
    }
}
