//! Grid representation and the index arithmetic of houses and chutes.

mod grid;
mod order;
mod transform;

pub use self::grid::{FromGivensError, Grid, InvalidEntry, LineParseError};
pub use self::order::{HouseKind, InvalidOrderError, LineKind, Order, MAX_ORDER};
pub use self::transform::{scramble, Transformation};
