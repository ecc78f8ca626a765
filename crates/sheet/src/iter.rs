//! Directional traversal over anything that implements [`Matrix`].
//!
//! Every iterator captures the extents of its matrix when it is created and
//! is single pass: once exhausted it stays exhausted.

use crate::cell::CellValue;
use crate::matrix::Matrix;
use indexmap::IndexMap;

/// The eight cell traversal orders.
///
/// `H*` variants are row-major, `V*` variants column-major. The remaining
/// letters name the start and end corners (T/B = top/bottom, L/R = left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rows top to bottom, columns left to right
    Htlbr,
    /// Rows bottom to top, columns right to left
    Hbrtl,
    /// Columns left to right, rows top to bottom
    Vtlbr,
    /// Columns right to left, rows bottom to top
    Vbrtl,
    /// Rows top to bottom, columns right to left
    Htrbl,
    /// Columns right to left, rows top to bottom
    Vtrbl,
    /// Columns left to right, rows bottom to top
    Vbltr,
    /// Rows bottom to top, columns left to right
    Hbltr,
}

impl Direction {
    /// All traversal orders
    pub const ALL: [Direction; 8] = [
        Direction::Htlbr,
        Direction::Hbrtl,
        Direction::Vtlbr,
        Direction::Vbrtl,
        Direction::Htrbl,
        Direction::Vtrbl,
        Direction::Vbltr,
        Direction::Hbltr,
    ];

    fn descending(self) -> bool {
        matches!(self, Direction::Hbrtl | Direction::Vbrtl)
    }

    /// Map the k-th step of a walk over an `rows x cols` grid to a coordinate
    fn position(self, k: usize, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Direction::Htlbr | Direction::Hbrtl => (k / cols, k % cols),
            Direction::Vtlbr | Direction::Vbrtl => (k % rows, k / rows),
            Direction::Htrbl => (k / cols, cols - 1 - k % cols),
            Direction::Vtrbl => (k % rows, cols - 1 - k / rows),
            Direction::Vbltr => (rows - 1 - k % rows, k / rows),
            Direction::Hbltr => (rows - 1 - k / cols, k % cols),
        }
    }
}

/// Scalar iterator over every visible cell in one [`Direction`].
///
/// The cursor moves through `[0, total]`: ascending variants stop when it
/// reaches `total`, descending variants when it reaches 0.
pub struct Cells<'a, M: Matrix + ?Sized> {
    matrix: &'a M,
    direction: Direction,
    rows: usize,
    cols: usize,
    cursor: usize,
    remaining: usize,
}

impl<'a, M: Matrix + ?Sized> Cells<'a, M> {
    /// Start a traversal
    pub fn new(matrix: &'a M, direction: Direction) -> Self {
        let rows = matrix.number_of_rows();
        let cols = matrix.number_of_columns();
        let total = rows * cols;
        Cells {
            matrix,
            direction,
            rows,
            cols,
            cursor: if direction.descending() { total } else { 0 },
            remaining: total,
        }
    }
}

impl<M: Matrix + ?Sized> Iterator for Cells<'_, M> {
    type Item = CellValue;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = if self.direction.descending() {
            self.cursor -= 1;
            self.cursor
        } else {
            let k = self.cursor;
            self.cursor += 1;
            k
        };
        self.remaining -= 1;
        let (row, col) = self.direction.position(k, self.rows, self.cols);
        Some(self.matrix.cell_value(row, col).unwrap_or_default())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<M: Matrix + ?Sized> ExactSizeIterator for Cells<'_, M> {}

/// Row vector iterator; `.rev()` walks bottom to top.
pub struct Rows<'a, M: Matrix + ?Sized> {
    matrix: &'a M,
    front: usize,
    back: usize,
}

impl<'a, M: Matrix + ?Sized> Rows<'a, M> {
    pub fn new(matrix: &'a M) -> Self {
        Rows {
            matrix,
            front: 0,
            back: matrix.number_of_rows(),
        }
    }
}

impl<M: Matrix + ?Sized> Iterator for Rows<'_, M> {
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        self.matrix.row_at(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<M: Matrix + ?Sized> DoubleEndedIterator for Rows<'_, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.matrix.row_at(self.back)
    }
}

impl<M: Matrix + ?Sized> ExactSizeIterator for Rows<'_, M> {}

/// Column vector iterator; `.rev()` walks right to left.
pub struct Columns<'a, M: Matrix + ?Sized> {
    matrix: &'a M,
    front: usize,
    back: usize,
}

impl<'a, M: Matrix + ?Sized> Columns<'a, M> {
    pub fn new(matrix: &'a M) -> Self {
        Columns {
            matrix,
            front: 0,
            back: matrix.number_of_columns(),
        }
    }
}

impl<M: Matrix + ?Sized> Iterator for Columns<'_, M> {
    type Item = Vec<CellValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        self.matrix.column_at(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<M: Matrix + ?Sized> DoubleEndedIterator for Columns<'_, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.matrix.column_at(self.back)
    }
}

impl<M: Matrix + ?Sized> ExactSizeIterator for Columns<'_, M> {}

/// Yields `{name: column}` single-entry maps in header order.
pub struct NamedColumns<'a, M: Matrix + ?Sized> {
    names: std::vec::IntoIter<String>,
    columns: Columns<'a, M>,
}

impl<'a, M: Matrix + ?Sized> NamedColumns<'a, M> {
    /// Bind the header list once; later header changes are not observed
    pub fn new(matrix: &'a M) -> Self {
        NamedColumns {
            names: matrix.column_names().unwrap_or_default().into_iter(),
            columns: Columns::new(matrix),
        }
    }
}

impl<M: Matrix + ?Sized> Iterator for NamedColumns<'_, M> {
    type Item = IndexMap<String, Vec<CellValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        let column = self.columns.next()?;
        Some(IndexMap::from([(name, column)]))
    }
}

/// Yields `{name: row}` single-entry maps in row-name order.
pub struct NamedRows<'a, M: Matrix + ?Sized> {
    names: std::vec::IntoIter<String>,
    rows: Rows<'a, M>,
}

impl<'a, M: Matrix + ?Sized> NamedRows<'a, M> {
    pub fn new(matrix: &'a M) -> Self {
        NamedRows {
            names: matrix.row_names().unwrap_or_default().into_iter(),
            rows: Rows::new(matrix),
        }
    }
}

impl<M: Matrix + ?Sized> Iterator for NamedRows<'_, M> {
    type Item = IndexMap<String, Vec<CellValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        let row = self.rows.next()?;
        Some(IndexMap::from([(name, row)]))
    }
}
