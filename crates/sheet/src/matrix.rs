//! The two-dimensional access contract shared by grids, filtered views and sheets.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::iter::{Cells, Columns, Direction, Rows};
use std::ops::Range;

/// Random access to a rectangular table of cells.
///
/// Implementors provide the three required methods; everything else
/// (ranges, vectors, traversal) is derived from them.
pub trait Matrix {
    /// Number of visible rows
    fn number_of_rows(&self) -> usize;

    /// Number of visible columns
    fn number_of_columns(&self) -> usize;

    /// Cell at a visible coordinate, `None` outside the visible extents
    fn cell_value(&self, row: usize, column: usize) -> Option<CellValue>;

    /// Column names, when a row has been promoted to a header
    fn column_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Row names, when a column has been promoted to a header
    fn row_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Currently visible row indices
    fn row_range(&self) -> Range<usize> {
        0..self.number_of_rows()
    }

    /// Currently visible column indices
    fn column_range(&self) -> Range<usize> {
        0..self.number_of_columns()
    }

    /// A full row, `None` when the index is outside the visible rows
    fn row_at(&self, index: usize) -> Option<Vec<CellValue>> {
        if index >= self.number_of_rows() {
            return None;
        }
        Some(
            self.column_range()
                .map(|c| self.cell_value(index, c).unwrap_or_default())
                .collect(),
        )
    }

    /// A full column, `None` when the index is outside the visible columns
    fn column_at(&self, index: usize) -> Option<Vec<CellValue>> {
        if index >= self.number_of_columns() {
            return None;
        }
        Some(
            self.row_range()
                .map(|r| self.cell_value(r, index).unwrap_or_default())
                .collect(),
        )
    }

    /// Check whether any visible row satisfies the predicate
    fn contains(&self, predicate: &mut dyn FnMut(&[CellValue]) -> bool) -> bool {
        self.row_range()
            .filter_map(|r| self.row_at(r))
            .any(|row| predicate(&row))
    }

    /// Copy the visible cells into rows-of-rows
    fn to_array(&self) -> Vec<Vec<CellValue>> {
        self.row_range().filter_map(|r| self.row_at(r)).collect()
    }

    /// Walk every visible cell in the given direction
    fn cells(&self, direction: Direction) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        Cells::new(self, direction)
    }

    /// Row-major, top-left to bottom-right
    fn enumerate(&self) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        self.cells(Direction::Htlbr)
    }

    /// Row-major, bottom-right to top-left
    fn reverse(&self) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        self.cells(Direction::Hbrtl)
    }

    /// Column-major, top-left to bottom-right
    fn vertical(&self) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        self.cells(Direction::Vtlbr)
    }

    /// Column-major, bottom-right to top-left
    fn rvertical(&self) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        self.cells(Direction::Vbrtl)
    }

    /// Visible rows, top to bottom
    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows::new(self)
    }

    /// Visible rows, bottom to top
    fn rrows(&self) -> std::iter::Rev<Rows<'_, Self>>
    where
        Self: Sized,
    {
        Rows::new(self).rev()
    }

    /// Visible columns, left to right
    fn columns(&self) -> Columns<'_, Self>
    where
        Self: Sized,
    {
        Columns::new(self)
    }

    /// Visible columns, right to left
    fn rcolumns(&self) -> std::iter::Rev<Columns<'_, Self>>
    where
        Self: Sized,
    {
        Columns::new(self).rev()
    }

    /// Flatten the visible cells in the given traversal order
    fn to_flat_array(&self, direction: Direction) -> Vec<CellValue>
    where
        Self: Sized,
    {
        self.cells(direction).collect()
    }
}

/// Rectangular cell storage. Short rows are padded with nulls so every
/// row always has `width` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Create an empty grid
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from possibly ragged rows, padding short rows
    #[must_use]
    pub fn from_rows<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Grid { rows, width };
        grid.pad();
        grid
    }

    /// Build a grid, rejecting rows of unequal length
    pub fn from_rows_strict<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(SheetError::TypeMismatch(format!(
                    "row {index} has {} cells, expected {width}",
                    row.len()
                )));
            }
        }
        Ok(Self::from_rows(rows))
    }

    fn pad(&mut self) {
        let width = self.width;
        for row in &mut self.rows {
            row.resize(width, CellValue::Null);
        }
    }

    /// Number of stored rows
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Check if the grid has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    /// Borrow a cell
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Overwrite a cell
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> Result<()> {
        let (rows, cols) = (self.height(), self.width);
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = value;
        Ok(())
    }

    /// Borrow the stored rows
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Take the stored rows
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    // ===== Structural edits =====

    /// Insert a row; a longer row widens the grid, a shorter one is padded
    pub fn insert_row(&mut self, index: usize, row: Vec<CellValue>) -> Result<()> {
        if index > self.rows.len() {
            return Err(SheetError::RowIndexOutOfBounds {
                index,
                count: self.rows.len(),
            });
        }
        if row.len() > self.width {
            self.width = row.len();
        }
        self.rows.insert(index, row);
        self.pad();
        Ok(())
    }

    /// Remove a row
    pub fn remove_row(&mut self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.rows.len() {
            return Err(SheetError::RowIndexOutOfBounds {
                index,
                count: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Insert a column; a longer column adds rows, a shorter one is padded
    pub fn insert_column(&mut self, index: usize, column: Vec<CellValue>) -> Result<()> {
        if index > self.width {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.width,
            });
        }
        while self.rows.len() < column.len() {
            self.rows.push(vec![CellValue::Null; self.width]);
        }
        let mut values = column.into_iter();
        for row in &mut self.rows {
            row.insert(index, values.next().unwrap_or_default());
        }
        self.width += 1;
        Ok(())
    }

    /// Remove a column
    pub fn remove_column(&mut self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.width {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.width,
            });
        }
        let column = self.rows.iter_mut().map(|row| row.remove(index)).collect();
        self.width -= 1;
        Ok(column)
    }
}

impl Matrix for Grid {
    fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    fn number_of_columns(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.width
        }
    }

    fn cell_value(&self, row: usize, column: usize) -> Option<CellValue> {
        self.get(row, column).cloned()
    }
}
