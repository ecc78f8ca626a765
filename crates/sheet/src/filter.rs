//! Index filters: each one decides which visible rows and/or columns of a
//! view are excluded, then remaps coordinates around the excluded indices.

use crate::a1_notation::parse_a1_range;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::iter::{Columns, Rows};
use crate::matrix::{Grid, Matrix};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

type IndexPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;
type ValuePredicate = Arc<dyn Fn(&[CellValue]) -> bool + Send + Sync>;
type NamedPredicate = Arc<dyn Fn(&IndexMap<String, CellValue>) -> bool + Send + Sync>;

/// Which axis a filter constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
    /// Both axes at once
    Region,
}

#[derive(Clone)]
enum Rule {
    Indices(BTreeSet<usize>),
    Single(usize),
    Odd,
    Even,
    IndexPredicate(IndexPredicate),
    Values(ValuePredicate),
    NamedValues(NamedPredicate),
    RowsIn(Grid),
    Region {
        rows: Stepped,
        columns: Stepped,
    },
}

/// `start..end` taking every `step`-th index; membership is arithmetic so
/// bounds far past the sheet cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stepped {
    start: usize,
    end: usize,
    step: usize,
}

impl Stepped {
    fn new(range: Range<usize>, step: usize) -> Self {
        Stepped {
            start: range.start,
            end: range.end,
            step,
        }
    }

    fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end && (index - self.start) % self.step == 0
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Indices(set) => f.debug_tuple("Indices").field(set).finish(),
            Rule::Single(i) => f.debug_tuple("Single").field(i).finish(),
            Rule::Odd => f.write_str("Odd"),
            Rule::Even => f.write_str("Even"),
            Rule::IndexPredicate(_) => f.write_str("IndexPredicate"),
            Rule::Values(_) => f.write_str("Values"),
            Rule::NamedValues(_) => f.write_str("NamedValues"),
            Rule::RowsIn(grid) => f
                .debug_struct("RowsIn")
                .field("rows", &grid.height())
                .finish(),
            Rule::Region { rows, columns } => f
                .debug_struct("Region")
                .field("rows", rows)
                .field("columns", columns)
                .finish(),
        }
    }
}

/// Materialized exclusions, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Exclusion {
    rows: Vec<usize>,
    columns: Vec<usize>,
}

/// A row, column or region filter.
///
/// A filter is inert until [`IndexFilter::validate`] has run against the
/// view it will sit on top of; only then are its exclusion counts known.
#[derive(Debug, Clone)]
pub struct IndexFilter {
    axis: Axis,
    rule: Rule,
    inverted: bool,
    excluded: Option<Exclusion>,
}

impl IndexFilter {
    fn new(axis: Axis, rule: Rule) -> Self {
        IndexFilter {
            axis,
            rule,
            inverted: false,
            excluded: None,
        }
    }

    // ===== Index filters =====

    /// Exclude the given rows. Indices past the last row are ignored.
    pub fn row_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self::new(Axis::Row, Rule::Indices(indices.into_iter().collect()))
    }

    /// Exclude the given columns. Indices past the last column are ignored.
    pub fn column_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self::new(Axis::Column, Rule::Indices(indices.into_iter().collect()))
    }

    /// Build an index filter from cell values, which must all be
    /// non-negative integers
    pub fn from_cell_values(axis: Axis, indices: &[CellValue]) -> Result<Self> {
        if axis == Axis::Region {
            return Err(SheetError::TypeMismatch(
                "an index list cannot describe a region".to_string(),
            ));
        }
        let indices = indices
            .iter()
            .map(|value| match value {
                CellValue::Int(i) => usize::try_from(*i).map_err(|_| {
                    SheetError::TypeMismatch(format!("negative index {i} in filter"))
                }),
                other => Err(SheetError::TypeMismatch(format!(
                    "filter index must be an integer, got {other:?}"
                ))),
            })
            .collect::<Result<BTreeSet<usize>>>()?;
        Ok(Self::new(axis, Rule::Indices(indices)))
    }

    /// Exclude one row
    pub fn single_row(index: usize) -> Self {
        Self::new(Axis::Row, Rule::Single(index))
    }

    /// Exclude one column
    pub fn single_column(index: usize) -> Self {
        Self::new(Axis::Column, Rule::Single(index))
    }

    /// Exclude the odd rows counting from one: the 1st, 3rd, 5th...
    /// visible rows, i.e. 0-based indices 0, 2, 4...
    pub fn odd_rows() -> Self {
        Self::new(Axis::Row, Rule::Odd)
    }

    /// Exclude the even rows counting from one (0-based 1, 3, 5...)
    pub fn even_rows() -> Self {
        Self::new(Axis::Row, Rule::Even)
    }

    /// Exclude the odd columns counting from one (0-based 0, 2, 4...)
    pub fn odd_columns() -> Self {
        Self::new(Axis::Column, Rule::Odd)
    }

    /// Exclude the even columns counting from one (0-based 1, 3, 5...)
    pub fn even_columns() -> Self {
        Self::new(Axis::Column, Rule::Even)
    }

    /// Exclude rows whose index satisfies the predicate
    pub fn row_index_predicate<F>(predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Row, Rule::IndexPredicate(Arc::new(predicate)))
    }

    /// Exclude columns whose index satisfies the predicate
    pub fn column_index_predicate<F>(predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Column, Rule::IndexPredicate(Arc::new(predicate)))
    }

    // ===== Value filters =====

    /// Keep only rows whose values satisfy the predicate
    pub fn row_values<F>(predicate: F) -> Self
    where
        F: Fn(&[CellValue]) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Row, Rule::Values(Arc::new(predicate)))
    }

    /// Keep only columns whose values satisfy the predicate
    pub fn column_values<F>(predicate: F) -> Self
    where
        F: Fn(&[CellValue]) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Column, Rule::Values(Arc::new(predicate)))
    }

    /// Keep only rows whose `column name -> value` record satisfies the
    /// predicate. Requires named columns.
    pub fn named_row_values<F>(predicate: F) -> Self
    where
        F: Fn(&IndexMap<String, CellValue>) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Row, Rule::NamedValues(Arc::new(predicate)))
    }

    /// Keep only columns whose `row name -> value` record satisfies the
    /// predicate. Requires named rows.
    pub fn named_column_values<F>(predicate: F) -> Self
    where
        F: Fn(&IndexMap<String, CellValue>) -> bool + Send + Sync + 'static,
    {
        Self::new(Axis::Column, Rule::NamedValues(Arc::new(predicate)))
    }

    /// Keep only rows that also appear, element for element, in `other`.
    ///
    /// The visible cells of `other` are copied at construction. Matching
    /// scans `other` once per row.
    pub fn rows_in<M: Matrix + ?Sized>(other: &M) -> Self {
        Self::new(Axis::Row, Rule::RowsIn(Grid::from_rows(other.to_array())))
    }

    // ===== Region filters =====

    /// Keep only the cells inside a row range and a column range
    pub fn region(rows: Range<usize>, columns: Range<usize>) -> Self {
        Self::new(
            Axis::Region,
            Rule::Region {
                rows: Stepped::new(rows, 1),
                columns: Stepped::new(columns, 1),
            },
        )
    }

    /// Keep only every `row_step`-th row and `column_step`-th column of the
    /// given ranges
    pub fn region_with_step(
        rows: Range<usize>,
        row_step: usize,
        columns: Range<usize>,
        column_step: usize,
    ) -> Result<Self> {
        if row_step == 0 || column_step == 0 {
            return Err(SheetError::TypeMismatch(
                "region step must be positive".to_string(),
            ));
        }
        Ok(Self::new(
            Axis::Region,
            Rule::Region {
                rows: Stepped::new(rows, row_step),
                columns: Stepped::new(columns, column_step),
            },
        ))
    }

    /// Keep only the cells of an A1 range such as `"B2:C4"`
    pub fn region_a1(range: &str) -> Result<Self> {
        let ((top, left), (bottom, right)) = parse_a1_range(range)?;
        Ok(Self::region(
            top..bottom.saturating_add(1),
            left..right.saturating_add(1),
        ))
    }

    // ===== State =====

    /// The axis this filter constrains
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Whether the predicate is currently negated
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Whether the exclusions have been materialized
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.excluded.is_some()
    }

    /// Negate the predicate, switching between "filter out" and "keep only".
    /// The filter must be validated again afterwards.
    pub fn invert(&mut self) -> &mut Self {
        self.inverted = !self.inverted;
        self.excluded = None;
        self
    }

    /// Number of rows this filter excludes
    pub fn rows(&self) -> Result<usize> {
        self.excluded
            .as_ref()
            .map(|e| e.rows.len())
            .ok_or(SheetError::UnvalidatedFilter)
    }

    /// Number of columns this filter excludes
    pub fn columns(&self) -> Result<usize> {
        self.excluded
            .as_ref()
            .map(|e| e.columns.len())
            .ok_or(SheetError::UnvalidatedFilter)
    }

    /// Excluded row indices, in the index space of the validating view
    pub fn excluded_rows(&self) -> Result<&[usize]> {
        self.excluded
            .as_ref()
            .map(|e| e.rows.as_slice())
            .ok_or(SheetError::UnvalidatedFilter)
    }

    /// Excluded column indices, in the index space of the validating view
    pub fn excluded_columns(&self) -> Result<&[usize]> {
        self.excluded
            .as_ref()
            .map(|e| e.columns.as_slice())
            .ok_or(SheetError::UnvalidatedFilter)
    }

    /// The header index when this filter is a single-index filter
    pub(crate) fn single_index(&self) -> Option<usize> {
        match self.rule {
            Rule::Single(index) => Some(index),
            _ => None,
        }
    }

    // ===== Validation =====

    /// Materialize the excluded indices against the view this filter sits on
    pub fn validate(&mut self, view: &dyn Matrix) -> Result<()> {
        let exclusion = match self.axis {
            Axis::Row => Exclusion {
                rows: self.excluded_indices(view, view.row_range(), Axis::Row)?,
                columns: Vec::new(),
            },
            Axis::Column => Exclusion {
                rows: Vec::new(),
                columns: self.excluded_indices(view, view.column_range(), Axis::Column)?,
            },
            Axis::Region => self.region_exclusion(view),
        };
        debug!(
            axis = ?self.axis,
            inverted = self.inverted,
            rows = exclusion.rows.len(),
            columns = exclusion.columns.len(),
            "validated filter"
        );
        self.excluded = Some(exclusion);
        Ok(())
    }

    fn excluded_indices(
        &self,
        view: &dyn Matrix,
        range: Range<usize>,
        axis: Axis,
    ) -> Result<Vec<usize>> {
        let inverted = self.inverted;
        let excluded: Vec<usize> = match &self.rule {
            Rule::Values(predicate) => vectors(view, axis)
                .enumerate()
                .filter(|(_, values)| !predicate(values.as_slice()) != inverted)
                .map(|(i, _)| i)
                .collect(),
            Rule::NamedValues(predicate) => {
                let names = match axis {
                    Axis::Column => view.row_names().ok_or(SheetError::RowsNotNamed)?,
                    _ => view.column_names().ok_or_else(|| {
                        SheetError::ColumnsNotNamed(
                            "named row filters need a header row".to_string(),
                        )
                    })?,
                };
                vectors(view, axis)
                    .enumerate()
                    .filter(|(_, values)| {
                        let record: IndexMap<String, CellValue> =
                            names.iter().cloned().zip(values.iter().cloned()).collect();
                        !predicate(&record) != inverted
                    })
                    .map(|(i, _)| i)
                    .collect()
            }
            Rule::RowsIn(other) => vectors(view, axis)
                .enumerate()
                .filter(|(_, row)| {
                    let found = other.contains(&mut |candidate| candidate == row.as_slice());
                    !found != inverted
                })
                .map(|(i, _)| i)
                .collect(),
            rule => range
                .filter(|&i| index_matches(rule, i) != inverted)
                .collect(),
        };
        Ok(excluded)
    }

    fn region_exclusion(&self, view: &dyn Matrix) -> Exclusion {
        let Rule::Region { rows, columns } = &self.rule else {
            return Exclusion::default();
        };
        let inverted = self.inverted;
        Exclusion {
            rows: view
                .row_range()
                .filter(|&i| rows.contains(i) == inverted)
                .collect(),
            columns: view
                .column_range()
                .filter(|&i| columns.contains(i) == inverted)
                .collect(),
        }
    }

    // ===== Translation =====

    /// Map a coordinate of the view above this filter to the view below it
    #[must_use]
    pub fn translate(&self, row: usize, column: usize) -> (usize, usize) {
        match &self.excluded {
            Some(exclusion) => (
                skip_excluded(row, &exclusion.rows),
                skip_excluded(column, &exclusion.columns),
            ),
            None => (row, column),
        }
    }
}

fn index_matches(rule: &Rule, index: usize) -> bool {
    match rule {
        Rule::Indices(set) => set.contains(&index),
        Rule::Single(target) => index == *target,
        Rule::Odd => (index + 1) % 2 == 1,
        Rule::Even => (index + 1) % 2 == 0,
        Rule::IndexPredicate(predicate) => predicate(index),
        _ => false,
    }
}

fn vectors<'a>(
    view: &'a dyn Matrix,
    axis: Axis,
) -> Box<dyn Iterator<Item = Vec<CellValue>> + 'a> {
    match axis {
        Axis::Column => Box::new(Columns::new(view)),
        _ => Box::new(Rows::new(view)),
    }
}

/// Step an index past every excluded index at or below it.
fn skip_excluded(index: usize, excluded: &[usize]) -> usize {
    let mut index = index;
    for &e in excluded {
        if e <= index {
            index += 1;
        } else {
            break;
        }
    }
    index
}
