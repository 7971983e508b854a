#![warn(missing_docs)]
//! The Polydoku library
//!
//! ## Overview
//!
//! Polydoku solves, enumerates and generates sudokus of any box order, not
//! just the classic 9×9. Grids of order N have N²×N² cells over N² symbols
//! and are handled by one constraint propagation engine with candidate
//! masks, deduction queues and a snapshotting guess stack.
//!
//! ## Example
//!
//! ```
//! use polydoku::Grid;
//!
//! let line = "...2...633....54.1..1..398........9....538....3........263..5..5.37....847...1...";
//! let puzzle = Grid::from_str_line(line).unwrap();
//!
//! if let Some(solution) = puzzle.solve_unique() {
//!     println!("{}", solution);
//!     println!("{}", solution.to_str_line());
//! }
//!
//! // grids of other orders are built from givens directly
//! use polydoku::Order;
//! let order = Order::new(2).unwrap();
//! let empty = Grid::empty(order);
//! let some_solution = empty.solve_one().unwrap();
//! assert!(some_solution.is_fully_solved_and_valid());
//! ```

pub mod bitset;
pub mod board;
pub mod engine;
mod generator;
mod solver;

pub use crate::board::{scramble, Grid, Order, Transformation};
pub use crate::engine::{Engine, Guess, UnwindInfo};
pub use crate::generator::{generate_filled, minimize};
pub use crate::solver::Solver;

/// Contains errors for parsing and construction
pub mod errors {
    pub use crate::board::{FromGivensError, InvalidEntry, InvalidOrderError, LineParseError};
}
