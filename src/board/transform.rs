//! Symmetry transformations of grids.
//!
//! Relabeling symbols, permuting lines within their chute, permuting whole
//! chutes and transposing all map valid grids to valid grids and preserve
//! the solution count of puzzles. A [`Transformation`] bundles one choice
//! of each; a random one scrambles a grid beyond recognition without
//! touching what makes it solvable.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Grid, Order};

/// One symmetry of the grids of a fixed order.
///
/// Line permutations are chute preserving: lines move within their chute
/// and chutes move as a whole. That is exactly the group of line
/// permutations that keeps blocks intact, so every `Transformation` maps
/// valid grids to valid grids.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transformation {
    order: Order,
    /// Symbol relabeling, `label_map[old] = new`.
    label_map: Vec<u8>,
    /// Destination row per source row, chute preserving.
    row_map: Vec<u8>,
    /// Destination column per source column, chute preserving.
    col_map: Vec<u8>,
    /// Mirror along the main diagonal after the line maps.
    transpose: bool,
}

impl Transformation {
    /// The transformation mapping every grid to itself.
    pub fn identity(order: Order) -> Transformation {
        let identity: Vec<u8> = order.symbols().collect();
        Transformation {
            order,
            label_map: identity.clone(),
            row_map: identity.clone(),
            col_map: identity,
            transpose: false,
        }
    }

    /// Draws a random transformation.
    pub fn random<R: Rng>(order: Order, rng: &mut R) -> Transformation {
        let mut transformation = Transformation::identity(order);
        transformation.label_map.shuffle(rng);
        shuffle_lines(&mut transformation.row_map, order, rng);
        shuffle_lines(&mut transformation.col_map, order, rng);
        transformation.transpose = rng.gen();
        transformation
    }

    /// The order of the grids this transformation applies to.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns the transformed grid. Empty cells stay empty.
    ///
    /// # Precondition
    /// `grid` must have the transformation's order (`debug_assert!`ed).
    pub fn apply(&self, grid: &Grid) -> Grid {
        debug_assert_eq!(grid.order(), self.order);
        let mut dest = Grid::empty(self.order);
        for cell in self.order.cells() {
            let sym = match grid.get(cell) {
                Some(sym) => sym,
                None => continue,
            };
            let mut row = self.row_map[usize::from(self.order.row_of(cell))];
            let mut col = self.col_map[usize::from(self.order.col_of(cell))];
            if self.transpose {
                std::mem::swap(&mut row, &mut col);
            }
            dest.set(
                self.order.cell_at(row, col),
                Some(self.label_map[usize::from(sym)]),
            );
        }
        dest
    }

    /// The transformation undoing this one.
    pub fn inverted(&self) -> Transformation {
        let mut inverse = Transformation::identity(self.order);
        invert_into(&self.label_map, &mut inverse.label_map);
        // transposing swaps which axis each line map acts on, so the
        // inverted maps swap roles
        if self.transpose {
            invert_into(&self.row_map, &mut inverse.col_map);
            invert_into(&self.col_map, &mut inverse.row_map);
        } else {
            invert_into(&self.row_map, &mut inverse.row_map);
            invert_into(&self.col_map, &mut inverse.col_map);
        }
        inverse.transpose = self.transpose;
        inverse
    }
}

/// Scrambles a grid by a random symmetry, returning the scrambled grid and
/// the transformation that produced it.
pub fn scramble<R: Rng>(grid: &Grid, rng: &mut R) -> (Grid, Transformation) {
    let transformation = Transformation::random(grid.order(), rng);
    (transformation.apply(grid), transformation)
}

/// Shuffles a line map chute preserving: first the lines within each chute,
/// then the chutes as wholes.
fn shuffle_lines<R: Rng>(map: &mut Vec<u8>, order: Order, rng: &mut R) {
    let n = usize::from(order.get());
    for chute in map.chunks_mut(n) {
        chute.shuffle(rng);
    }
    let mut chutes: Vec<Vec<u8>> = map.chunks(n).map(<[u8]>::to_vec).collect();
    chutes.shuffle(rng);
    map.clear();
    map.extend(chutes.into_iter().flatten());
}

fn invert_into(map: &[u8], inverse: &mut [u8]) {
    for (src, &dest) in map.iter().enumerate() {
        inverse[usize::from(dest)] = src as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn solved_order_2() -> Grid {
        #[rustfmt::skip]
        let solved = [
            0, 1, 2, 3,
            2, 3, 0, 1,
            1, 0, 3, 2,
            3, 2, 1, 0,
        ];
        let givens: Vec<Option<u8>> = solved.iter().map(|&sym| Some(sym)).collect();
        Grid::from_givens(Order::new(2).unwrap(), &givens).unwrap()
    }

    #[test]
    fn identity_is_a_noop() {
        let grid = solved_order_2();
        let identity = Transformation::identity(grid.order());
        assert_eq!(identity.apply(&grid), grid);
        assert_eq!(identity.inverted(), identity);
    }

    #[test]
    fn scrambling_preserves_validity() {
        let mut rng = SmallRng::seed_from_u64(3);
        let grid = solved_order_2();
        for _ in 0..20 {
            let (scrambled, _) = scramble(&grid, &mut rng);
            assert!(scrambled.is_fully_solved_and_valid());
        }
    }

    #[test]
    fn inverse_undoes_the_transformation() {
        let grid = solved_order_2();
        // enough seeds to hit both transpose flavors
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let transformation = Transformation::random(grid.order(), &mut rng);
            let scrambled = transformation.apply(&grid);
            assert_eq!(transformation.inverted().apply(&scrambled), grid);
        }
    }

    #[test]
    fn empty_cells_stay_empty() {
        let mut grid = solved_order_2();
        grid.set(0, None);
        grid.set(7, None);
        let mut rng = SmallRng::seed_from_u64(11);
        let (scrambled, transformation) = scramble(&grid, &mut rng);
        assert_eq!(scrambled.n_givens(), grid.n_givens());
        assert_eq!(transformation.inverted().apply(&scrambled), grid);
    }
}
