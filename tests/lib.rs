use polydoku::bitset::SymSet;
use polydoku::board::HouseKind;
use polydoku::{generate_filled, minimize, scramble, Engine, Grid, Guess, Order, Solver, UnwindInfo};

use rand::rngs::SmallRng;
use rand::SeedableRng;

fn read_grids(grids_str: &str) -> Vec<Grid> {
    grids_str
        .lines()
        .map(|line| Grid::from_str_line(line).unwrap_or_else(|err| panic!("{:?}", err)))
        .collect()
}

const EASY: &str = "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const EASY_SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

// Inkala 2012, needs guessing under pure singles/subsets
const HARD: &str = "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..";

const INVALID: &str = "\
11...............................................................................
1........1.......................................................................
1.........1......................................................................";

#[test]
fn solve_1() {
    let puzzle =
        Grid::from_str_line("...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...")
            .unwrap();
    let solution = puzzle.solve_unique().unwrap();
    assert!(solution.is_fully_solved_and_valid());
    println!("{}", solution);
}

#[test]
fn solve_easy_and_compare() {
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let solution = puzzle.solve_unique().unwrap();
    assert_eq!(solution.to_str_line(), EASY_SOLVED);
}

#[test]
fn solve_hard() {
    let puzzle = Grid::from_str_line(HARD).unwrap();
    let solution = puzzle.solve_unique().unwrap();
    assert!(solution.is_fully_solved_and_valid());
}

#[test]
fn givens_survive_into_the_solution() {
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let solution = puzzle.solve_one().unwrap();
    for cell in puzzle.order().cells() {
        if let Some(sym) = puzzle.get(cell) {
            assert_eq!(solution.get(cell), Some(sym));
        }
    }
}

#[test]
fn solutionless_grids() {
    for puzzle in read_grids(INVALID) {
        assert!(puzzle.solve_one().is_none());
        assert_eq!(puzzle.count_at_most(10), 0);
    }
}

#[test]
fn solved_grid_needs_no_guess() {
    let solved = Grid::from_str_line(EASY_SOLVED).unwrap();
    let mut engine = Engine::new(Order::CLASSIC);
    engine.reinit(&solved);
    let info = engine.apply_all_queued();
    assert_eq!(info, UnwindInfo::NoUnwind);
    assert_eq!(engine.num_unsolved(), 0);
    assert_eq!(engine.guess_stack_depth(), 0);
    assert_eq!(engine.build_solution().to_str_line(), EASY_SOLVED);
}

#[test]
fn apply_all_is_idempotent_on_settled_state() {
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let mut engine = Engine::new(Order::CLASSIC);
    engine.reinit(&puzzle);
    assert!(!engine.apply_all_queued().did_unwind());
    let masks: Vec<_> = (0..81).map(|cell| engine.cell_candidates(cell)).collect();
    assert!(!engine.apply_all_queued().did_unwind());
    let masks_after: Vec<_> = (0..81).map(|cell| engine.cell_candidates(cell)).collect();
    assert_eq!(masks, masks_after);
}

#[test]
fn guess_and_unwind_are_symmetric() {
    let mut engine = Engine::new(Order::CLASSIC);
    engine.reinit(&Grid::empty(Order::CLASSIC));

    let cell = 40;
    let before = engine.cell_candidates(cell);
    let sym = before.first();
    engine.push_guess(Guess { cell, sym });
    assert!(!engine.apply_all_queued().did_unwind());
    assert_eq!(engine.guess_stack_depth(), 1);

    let info = engine.unwind_one_frame();
    assert_eq!(info, UnwindInfo::UnwoundOne);
    assert_eq!(engine.guess_stack_depth(), 0);
    // the state is pre-guess except for the exhausted symbol
    let mut expected = before;
    expected.unset(sym);
    assert_eq!(engine.cell_candidates(cell), expected);
}

/// No symbol may be committed to two cells of a shared house, and the
/// unsolved counter must match the masks. Holds in every reachable
/// non-contradictory state, not just in solutions.
fn assert_engine_consistent(engine: &Engine) {
    let order = engine.order();
    for &kind in &HouseKind::ALL {
        for house in 0..order.symbol_count() {
            let mut seen = SymSet::NONE;
            for idx in 0..order.symbol_count() {
                let cands = engine.cell_candidates(order.house_cell(kind, house, idx));
                if let Some(sym) = cands.unique() {
                    assert!(
                        !seen.contains(sym),
                        "symbol {} solved twice in {:?} {}",
                        sym,
                        kind,
                        house
                    );
                    seen.set(sym);
                }
            }
        }
    }
    let wide_masks = order
        .cells()
        .filter(|&cell| engine.cell_candidates(cell).len() > 1)
        .count() as u16;
    assert_eq!(engine.num_unsolved(), wide_masks);
}

#[test]
fn invariants_hold_throughout_guessy_solve() {
    // singles only, so the hard puzzle forces plenty of guesses and unwinds
    let mut engine = Engine::new(Order::CLASSIC);
    engine.reinit(&Grid::from_str_line(HARD).unwrap());
    let mut guesses = 0;
    let mut saw_unwind = false;
    loop {
        assert!(!engine.no_solutions_remain());
        if engine.has_queued_deductions() {
            saw_unwind |= engine.apply_all_queued().did_unwind();
            assert_engine_consistent(&engine);
            continue;
        }
        if engine.num_unsolved() == 0 {
            break;
        }
        if engine.find_hidden_singles().did_unwind() {
            saw_unwind = true;
            assert_engine_consistent(&engine);
            continue;
        }
        if engine.has_queued_deductions() {
            continue;
        }
        let guess = engine.choose_guess();
        engine.push_guess(guess);
        guesses += 1;
        assert_engine_consistent(&engine);
    }
    assert!(guesses > 0);
    assert!(saw_unwind);
    assert!(engine.build_solution().is_fully_solved_and_valid());
}

#[test]
fn stacked_guesses_unwind_in_order() {
    let order = Order::CLASSIC;
    let mut engine = Engine::new(order);
    engine.reinit(&Grid::empty(order));

    // three independent guesses, cells share no house
    let mut snapshots = vec![];
    for &cell in &[0u16, 40, 80] {
        let masks: Vec<SymSet> = order.cells().map(|c| engine.cell_candidates(c)).collect();
        let num_unsolved = engine.num_unsolved();
        let sym = engine.cell_candidates(cell).first();
        snapshots.push((masks, num_unsolved, cell, sym));
        engine.push_guess(Guess { cell, sym });
        assert!(!engine.apply_all_queued().did_unwind());
    }
    assert_eq!(engine.guess_stack_depth(), 3);

    // each unwind restores the state at its guess, minus the exhausted symbol
    for (masks, num_unsolved, cell, sym) in snapshots.into_iter().rev() {
        assert_eq!(engine.unwind_one_frame(), UnwindInfo::UnwoundOne);
        for c in order.cells() {
            let mut expected = masks[usize::from(c)];
            if c == cell {
                expected.unset(sym);
            }
            assert_eq!(engine.cell_candidates(c), expected, "cell {}", c);
        }
        assert_eq!(engine.num_unsolved(), num_unsolved);
    }
    assert_eq!(engine.guess_stack_depth(), 0);
    assert!(!engine.no_solutions_remain());
}

#[test]
fn scrambled_puzzles_keep_their_solution() {
    let mut rng = SmallRng::seed_from_u64(99);
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let (scrambled, transformation) = scramble(&puzzle, &mut rng);
    let solution = scrambled.solve_unique().unwrap();
    assert_eq!(
        transformation.inverted().apply(&solution).to_str_line(),
        EASY_SOLVED
    );
}

#[test]
fn enumerate_order_2() {
    // the empty 4x4 sudoku has exactly 288 solutions
    let empty = Grid::empty(Order::new(2).unwrap());
    assert_eq!(empty.count_at_most(1000), 288);
    let solutions = empty.solve_at_most(1000);
    assert_eq!(solutions.len(), 288);
    for solution in &solutions {
        assert!(solution.is_fully_solved_and_valid());
    }
}

#[test]
fn reuse_solver_after_exhaustion() {
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let mut solver = Solver::new(&puzzle);
    assert!(solver.next_solution().is_some());
    assert_eq!(solver.next_solution(), None);
    assert_eq!(solver.next_solution(), None);
}

#[test]
fn subsetless_solver_still_solves() {
    let puzzle = Grid::from_str_line(EASY).unwrap();
    let mut solver = Solver::with_max_subset_size(&puzzle, 0);
    let solution = solver.next_solution().unwrap();
    assert_eq!(solution.to_str_line(), EASY_SOLVED);
}

#[test]
fn generate_and_minimize_roundtrip() {
    let mut rng = SmallRng::seed_from_u64(0xd0d0);
    let order = Order::CLASSIC;
    let solved = generate_filled(order, &mut rng);
    assert!(solved.is_fully_solved_and_valid());

    let puzzle = minimize(&solved, &mut rng);
    assert!(puzzle.n_givens() < solved.n_givens());
    assert_eq!(puzzle.solve_unique(), Some(solved));
}

#[test]
fn non_classic_orders_solve() {
    for &n in &[2u8, 4] {
        let order = Order::new(n).unwrap();
        let mut rng = SmallRng::seed_from_u64(u64::from(n));
        let solved = generate_filled(order, &mut rng);
        assert!(solved.is_fully_solved_and_valid());

        // knock a couple of cells out and re-solve
        let mut puzzle = solved.clone();
        for cell in 0..u16::from(order.symbol_count()) {
            puzzle.set(cell, None);
        }
        let solutions = puzzle.solve_at_most(5);
        assert!(!solutions.is_empty());
        assert!(solutions.contains(&solved));
    }
}
