//! The boundary representation of a (partially) filled grid.

use std::fmt;

use crate::board::{HouseKind, Order};
use crate::bitset::SymSet;

/// A (partially) filled grid of runtime order.
///
/// Cells hold symbols `0..N²` or nothing. The sentinel-free candidate
/// representation lives in the [`Engine`](crate::engine::Engine); `Grid` is
/// only the exchange format at the boundary.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    order: Order,
    cells: Vec<Option<u8>>,
}

/// Error for [`Grid::from_givens`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FromGivensError {
    /// The slice is not N⁴ long.
    #[error("givens slice should have length {expected}, found {found}")]
    WrongLength {
        /// N⁴ for the requested order.
        expected: u16,
        /// Actual slice length.
        found: usize,
    },
    /// A given is not a valid symbol for the order.
    #[error("cell {cell} contains symbol {symbol} but symbols end at {symbol_count}")]
    SymbolOutOfRange {
        /// Offending cell index.
        cell: u16,
        /// Offending symbol.
        symbol: u8,
        /// N² for the requested order.
        symbol_count: u8,
    },
}

/// An invalid entry encountered while parsing a line-format grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvalidEntry {
    /// Cell number from 0..=80, 0..=8 for the first row, 9..=17 for the 2nd and so on.
    pub cell: u8,
    /// The parsed invalid char.
    pub ch: char,
}

/// Error for [`Grid::from_str_line`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LineParseError {
    /// Accepted values are numbers 1..=9 and '0', '.' or '_' for empty cells.
    #[error("cell {} contains invalid character '{}'", .0.cell, .0.ch)]
    InvalidEntry(InvalidEntry),
    /// Returns the number of cells supplied.
    #[error("grid contains {0} cells instead of required 81")]
    NotEnoughCells(u8),
    /// Returned if more than 81 cell positions are supplied.
    #[error("grid contains more than 81 cells")]
    TooManyCells,
}

impl Grid {
    /// Constructs the empty grid of the given order.
    pub fn empty(order: Order) -> Grid {
        Grid {
            order,
            cells: vec![None; usize::from(order.cell_count())],
        }
    }

    /// Constructs a grid from a row-major slice of optional symbols.
    pub fn from_givens(order: Order, givens: &[Option<u8>]) -> Result<Grid, FromGivensError> {
        if givens.len() != usize::from(order.cell_count()) {
            return Err(FromGivensError::WrongLength {
                expected: order.cell_count(),
                found: givens.len(),
            });
        }
        for (cell, given) in givens.iter().enumerate() {
            if let Some(symbol) = *given {
                if symbol >= order.symbol_count() {
                    return Err(FromGivensError::SymbolOutOfRange {
                        cell: cell as u16,
                        symbol,
                        symbol_count: order.symbol_count(),
                    });
                }
            }
        }
        Ok(Grid {
            order,
            cells: givens.to_vec(),
        })
    }

    /// Creates a classic 9×9 grid from a line of 81 characters.
    ///
    /// `'1'..='9'` are givens (stored as symbols `0..=8`), `'.'`, `'_'` and
    /// `'0'` denote empty cells. Trailing content is ignored if separated
    /// from the 81st cell by whitespace.
    pub fn from_str_line(s: &str) -> Result<Grid, LineParseError> {
        let mut cells = Vec::with_capacity(81);
        for ch in s.chars() {
            if cells.len() == 81 {
                break;
            }
            match ch {
                '1'..='9' => cells.push(Some(ch.to_digit(10).unwrap() as u8 - 1)),
                '.' | '_' | '0' => cells.push(None),
                _ => {
                    return Err(LineParseError::InvalidEntry(InvalidEntry {
                        cell: cells.len() as u8,
                        ch,
                    }))
                }
            }
        }
        if cells.len() < 81 {
            return Err(LineParseError::NotEnoughCells(cells.len() as u8));
        }
        if s.chars().count() > 81 && s.chars().nth(81).map_or(false, |ch| !ch.is_whitespace()) {
            return Err(LineParseError::TooManyCells);
        }
        Ok(Grid {
            order: Order::CLASSIC,
            cells,
        })
    }

    /// Writes a classic 9×9 grid back into the 81 character line format.
    ///
    /// # Precondition
    /// The grid must have order 3 (`debug_assert!`ed). Symbols of larger
    /// orders have no single digit, so release builds panic on the digit
    /// conversion instead; non-classic grids print via `Display`.
    pub fn to_str_line(&self) -> String {
        debug_assert_eq!(self.order, Order::CLASSIC);
        self.cells
            .iter()
            .map(|cell| match cell {
                Some(symbol) => std::char::from_digit(u32::from(symbol + 1), 10).unwrap(),
                None => '.',
            })
            .collect()
    }

    /// Returns the order of this grid.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns the content of a cell.
    #[inline]
    pub fn get(&self, cell: u16) -> Option<u8> {
        self.cells[usize::from(cell)]
    }

    /// Sets or clears a cell.
    ///
    /// # Precondition
    /// `symbol` must be below N² (`debug_assert!`ed).
    #[inline]
    pub fn set(&mut self, cell: u16, symbol: Option<u8>) {
        if let Some(symbol) = symbol {
            debug_assert!(symbol < self.order.symbol_count());
        }
        self.cells[usize::from(cell)] = symbol;
    }

    /// Iterator over all cells, going from left to right, top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        self.cells.iter().copied()
    }

    /// Number of filled cells.
    pub fn n_givens(&self) -> u16 {
        self.cells.iter().filter(|cell| cell.is_some()).count() as u16
    }

    /// Checks that every cell is filled and every house contains every
    /// symbol exactly once.
    pub fn is_fully_solved_and_valid(&self) -> bool {
        if self.cells.iter().any(Option::is_none) {
            return false;
        }
        let order = self.order;
        let full = SymSet::all(order.symbol_count());
        for &kind in &HouseKind::ALL {
            for house in 0..order.symbol_count() {
                let mut seen = SymSet::NONE;
                for idx in 0..order.symbol_count() {
                    let cell = order.house_cell(kind, house, idx);
                    // cannot be None, checked above
                    if let Some(symbol) = self.get(cell) {
                        seen.set(symbol);
                    }
                }
                if seen != full {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Grid {
    /// Block layout for any order; symbols print 1-based, empty cells as `_`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.order.get();
        let width: usize = if self.order.symbol_count() >= 10 { 3 } else { 2 };
        for cell in self.order.cells() {
            let row = self.order.row_of(cell);
            let col = self.order.col_of(cell);
            if col == 0 && row != 0 {
                writeln!(f)?;
                if row % order == 0 {
                    writeln!(f)?;
                }
            } else if col != 0 && col % order == 0 {
                write!(f, " ")?;
            }
            match self.get(cell) {
                Some(symbol) => write!(f, "{:>w$}", symbol + 1, w = width)?,
                None => write!(f, "{:>w$}", "_", w = width)?,
            }
        }
        Ok(())
    }
}
