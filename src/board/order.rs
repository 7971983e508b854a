//! Runtime grid sizing and the fixed row/column/block index arithmetic.

use std::fmt;

/// Largest supported box order. N² symbols must fit the 128-bit masks.
pub const MAX_ORDER: u8 = 11;

/// The box order N of a grid.
///
/// A grid of order N has N²×N² cells, N² symbols and 3·N² houses.
/// The classic sudoku is order 3. Supported orders are `2..=11`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order(u8);

/// Error for [`Order::new`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("box order must be in 2..={}, got {0}", MAX_ORDER)]
pub struct InvalidOrderError(pub u8);

impl Order {
    /// Constructs a new `Order`, checking the supported range.
    pub fn new(order: u8) -> Result<Self, InvalidOrderError> {
        if (2..=MAX_ORDER).contains(&order) {
            Ok(Order(order))
        } else {
            Err(InvalidOrderError(order))
        }
    }

    /// The classic 9×9 sudoku order.
    pub const CLASSIC: Order = Order(3);

    /// Returns the box order N.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of symbols, house cells, rows, columns and blocks: N².
    #[inline]
    pub fn symbol_count(self) -> u8 {
        self.0 * self.0
    }

    /// Number of cells in the grid: N⁴.
    #[inline]
    pub fn cell_count(self) -> u16 {
        u16::from(self.symbol_count()) * u16::from(self.symbol_count())
    }

    /// Number of houses of all three kinds: 3·N².
    #[inline]
    pub fn house_count(self) -> u16 {
        3 * u16::from(self.symbol_count())
    }

    /// Iterator over all symbols `0..N²`.
    pub fn symbols(self) -> impl Iterator<Item = u8> {
        0..self.symbol_count()
    }

    /// Iterator over all row-major cell indices `0..N⁴`.
    pub fn cells(self) -> impl Iterator<Item = u16> {
        0..self.cell_count()
    }

    /// Row of a cell.
    #[inline]
    pub fn row_of(self, cell: u16) -> u8 {
        debug_assert!(cell < self.cell_count());
        (cell / u16::from(self.symbol_count())) as u8
    }

    /// Column of a cell.
    #[inline]
    pub fn col_of(self, cell: u16) -> u8 {
        debug_assert!(cell < self.cell_count());
        (cell % u16::from(self.symbol_count())) as u8
    }

    /// Block of a cell. Blocks are numbered left to right, top to bottom.
    #[inline]
    pub fn block_of(self, cell: u16) -> u8 {
        (self.row_of(cell) / self.0) * self.0 + self.col_of(cell) / self.0
    }

    /// House of `kind` that `cell` belongs to.
    #[inline]
    pub fn house_of(self, kind: HouseKind, cell: u16) -> u8 {
        match kind {
            HouseKind::Row => self.row_of(cell),
            HouseKind::Col => self.col_of(cell),
            HouseKind::Block => self.block_of(cell),
        }
    }

    /// Cell index from row and column.
    #[inline]
    pub fn cell_at(self, row: u8, col: u8) -> u16 {
        debug_assert!(row < self.symbol_count() && col < self.symbol_count());
        u16::from(row) * u16::from(self.symbol_count()) + u16::from(col)
    }

    /// The `idx`th cell (0..N²) of the given house.
    ///
    /// Rows enumerate left to right, columns top to bottom, blocks row-major
    /// within the block.
    #[inline]
    pub fn house_cell(self, kind: HouseKind, house: u8, idx: u8) -> u16 {
        debug_assert!(house < self.symbol_count() && idx < self.symbol_count());
        match kind {
            HouseKind::Row => self.cell_at(house, idx),
            HouseKind::Col => self.cell_at(idx, house),
            HouseKind::Block => {
                let row = (house / self.0) * self.0 + idx / self.0;
                let col = (house % self.0) * self.0 + idx % self.0;
                self.cell_at(row, col)
            }
        }
    }

    /// The `idx`th cell (0..N³) of a chute.
    ///
    /// A chute is the band (stack) of the N rows (columns) crossing the same
    /// N blocks. Cells enumerate line by line; for `idx` the line within the
    /// chute is `idx / N²` and the position along the line `idx % N²`.
    #[inline]
    pub fn chute_cell(self, kind: LineKind, chute: u8, idx: u16) -> u16 {
        debug_assert!(chute < self.0);
        debug_assert!(idx < u16::from(self.symbol_count()) * u16::from(self.0));
        let line_in_chute = (idx / u16::from(self.symbol_count())) as u8;
        let pos = (idx % u16::from(self.symbol_count())) as u8;
        let line = chute * self.0 + line_in_chute;
        match kind {
            LineKind::Row => self.cell_at(line, pos),
            LineKind::Col => self.cell_at(pos, line),
        }
    }

    /// Iterator over the cells sharing a house with `cell`, each exactly
    /// once. The cell itself is not a peer.
    pub fn peers(self, cell: u16) -> impl Iterator<Item = u16> {
        let row = self.row_of(cell);
        let col = self.col_of(cell);
        let block = self.block_of(cell);
        let row_cells = self
            .symbols()
            .map(move |idx| self.house_cell(HouseKind::Row, row, idx));
        let col_cells = self
            .symbols()
            .map(move |idx| self.house_cell(HouseKind::Col, col, idx));
        // block cells off both lines; the ones on them already came up
        let block_cells = self
            .symbols()
            .map(move |idx| self.house_cell(HouseKind::Block, block, idx))
            .filter(move |&peer| self.row_of(peer) != row && self.col_of(peer) != col);
        row_cells
            .chain(col_cells)
            .filter(move |&peer| peer != cell)
            .chain(block_cells)
    }

    /// Block crossed by the `line_in_chute`th line of a chute at intersection
    /// `block_in_chute`.
    #[inline]
    pub fn chute_block(self, kind: LineKind, chute: u8, block_in_chute: u8) -> u8 {
        debug_assert!(chute < self.0 && block_in_chute < self.0);
        match kind {
            LineKind::Row => chute * self.0 + block_in_chute,
            LineKind::Col => block_in_chute * self.0 + chute,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three kinds of houses a cell belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum HouseKind {
    Row,
    Col,
    Block,
}

impl HouseKind {
    /// All house kinds, in the order used for house indexing.
    pub const ALL: [HouseKind; 3] = [HouseKind::Row, HouseKind::Col, HouseKind::Block];

    /// Index of this kind in [`HouseKind::ALL`].
    #[inline]
    pub fn as_index(self) -> usize {
        match self {
            HouseKind::Row => 0,
            HouseKind::Col => 1,
            HouseKind::Block => 2,
        }
    }
}

/// The two kinds of lines; blocks are not lines.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum LineKind {
    Row,
    Col,
}

impl LineKind {
    /// Both line kinds.
    pub const ALL: [LineKind; 2] = [LineKind::Row, LineKind::Col];

    /// The corresponding house kind.
    #[inline]
    pub fn as_house_kind(self) -> HouseKind {
        match self {
            LineKind::Row => HouseKind::Row,
            LineKind::Col => HouseKind::Col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_bounds() {
        assert!(Order::new(1).is_err());
        assert!(Order::new(12).is_err());
        assert_eq!(Order::new(3).unwrap(), Order::CLASSIC);
        assert_eq!(Order::new(11).unwrap().symbol_count(), 121);
        assert_eq!(Order::CLASSIC.cell_count(), 81);
    }

    #[test]
    fn classic_houses() {
        let order = Order::CLASSIC;
        // cell 40 is the center of a 9x9 grid
        assert_eq!(order.row_of(40), 4);
        assert_eq!(order.col_of(40), 4);
        assert_eq!(order.block_of(40), 4);
        // block 0 contains cells 0,1,2,9,10,11,18,19,20
        let block0: Vec<u16> = (0..9).map(|i| order.house_cell(HouseKind::Block, 0, i)).collect();
        assert_eq!(block0, vec![0, 1, 2, 9, 10, 11, 18, 19, 20]);
    }

    #[test]
    fn houses_roundtrip() {
        for &n in &[2u8, 3, 4] {
            let order = Order::new(n).unwrap();
            for &kind in &HouseKind::ALL {
                for house in 0..order.symbol_count() {
                    for idx in 0..order.symbol_count() {
                        let cell = order.house_cell(kind, house, idx);
                        assert_eq!(order.house_of(kind, cell), house);
                    }
                }
            }
        }
    }

    #[test]
    fn peers_are_unique_and_complete() {
        let order = Order::CLASSIC;
        let mut peers: Vec<u16> = order.peers(40).collect();
        peers.sort_unstable();
        let mut expected: Vec<u16> = order
            .cells()
            .filter(|&peer| {
                peer != 40
                    && (order.row_of(peer) == 4 || order.col_of(peer) == 4 || order.block_of(peer) == 4)
            })
            .collect();
        expected.sort_unstable();
        assert_eq!(peers, expected);
        assert_eq!(expected.len(), 20);
    }

    #[test]
    fn chute_cells_cover_their_blocks() {
        let order = Order::new(3).unwrap();
        for &kind in &LineKind::ALL {
            for chute in 0..3 {
                for idx in 0..27 {
                    let cell = order.chute_cell(kind, chute, idx);
                    let block_in_chute = ((idx % 9) / 3) as u8;
                    assert_eq!(
                        order.block_of(cell),
                        order.chute_block(kind, chute, block_in_chute)
                    );
                }
            }
        }
    }
}
