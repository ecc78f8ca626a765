//! Ordered composition of index filters over one base matrix.
//!
//! Each filter is validated against the view produced by every filter before
//! it, so coordinates are translated from the last filter back to the first.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::filter::IndexFilter;
use crate::matrix::Matrix;
use crate::series::{self, SeriesAxis};
use std::fmt;
use tracing::debug;

/// Handle for a filter attached to a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(u64);

impl FilterId {
    /// Raw numeric id
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position group of a filter within the chain.
///
/// Filters on the axis that carries the header come first, then the header
/// (signature) filter, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Leading,
    Signature,
    Trailing,
}

#[derive(Debug, Clone)]
pub(crate) struct ChainEntry {
    pub(crate) id: FilterId,
    pub(crate) stage: Stage,
    pub(crate) filter: IndexFilter,
}

/// An ordered list of validated filters.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    entries: Vec<ChainEntry>,
    next_id: u64,
}

impl FilterChain {
    /// Create an empty (identity) chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filters, the signature included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the chain is the identity
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a filter
    #[must_use]
    pub fn get(&self, id: FilterId) -> Option<&IndexFilter> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.filter)
    }

    /// Filters in chain order
    pub fn filters(&self) -> impl Iterator<Item = (FilterId, Stage, &IndexFilter)> {
        self.entries.iter().map(|e| (e.id, e.stage, &e.filter))
    }

    /// The header-promoting filter, if any
    #[must_use]
    pub fn signature(&self) -> Option<&IndexFilter> {
        self.entries
            .iter()
            .find(|e| e.stage == Stage::Signature)
            .map(|e| &e.filter)
    }

    fn allocate_id(&mut self) -> FilterId {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a filter at the end of its stage.
    ///
    /// Appending at the very end validates only the new filter; inserting
    /// ahead of existing filters re-validates the whole chain. On failure the
    /// chain is left as it was.
    pub fn add<M: Matrix + ?Sized>(
        &mut self,
        stage: Stage,
        mut filter: IndexFilter,
        base: &M,
    ) -> Result<FilterId> {
        let position = self
            .entries
            .iter()
            .rposition(|e| e.stage <= stage)
            .map_or(0, |p| p + 1);

        if position == self.entries.len() {
            filter.validate(&FilteredView::new(base, &self.entries))?;
            let id = self.allocate_id();
            self.entries.push(ChainEntry { id, stage, filter });
            return Ok(id);
        }

        let snapshot = self.entries.clone();
        let id = self.allocate_id();
        self.entries.insert(position, ChainEntry { id, stage, filter });
        if let Err(e) = self.revalidate(base) {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(id)
    }

    /// Remove a filter and re-validate every remaining filter from scratch.
    ///
    /// Costs O(n) validations for n remaining filters, so removing filters
    /// one by one is quadratic in the chain length.
    pub fn remove<M: Matrix + ?Sized>(&mut self, id: FilterId, base: &M) -> Result<IndexFilter> {
        let index = self.index_of(id)?;
        let snapshot = self.entries.clone();
        let entry = self.entries.remove(index);
        if let Err(e) = self.revalidate(base) {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(entry.filter)
    }

    /// Invert a filter in place and re-validate the chain
    pub fn invert<M: Matrix + ?Sized>(&mut self, id: FilterId, base: &M) -> Result<()> {
        let index = self.index_of(id)?;
        let snapshot = self.entries.clone();
        self.entries[index].filter.invert();
        if let Err(e) = self.revalidate(base) {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Drop every filter for which `keep` returns false
    pub fn retain<M, F>(&mut self, keep: F, base: &M) -> Result<()>
    where
        M: Matrix + ?Sized,
        F: Fn(FilterId, Stage) -> bool,
    {
        let snapshot = self.entries.clone();
        self.entries.retain(|e| keep(e.id, e.stage));
        if let Err(e) = self.revalidate(base) {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Reset to the identity chain
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the signature filter and regroup every other filter with
    /// `stage_of`, then re-validate
    pub(crate) fn reshape<M, F>(
        &mut self,
        signature: Option<IndexFilter>,
        stage_of: F,
        base: &M,
    ) -> Result<()>
    where
        M: Matrix + ?Sized,
        F: Fn(&IndexFilter) -> Stage,
    {
        let snapshot = self.entries.clone();
        self.entries.retain(|e| e.stage != Stage::Signature);
        for entry in &mut self.entries {
            entry.stage = stage_of(&entry.filter);
        }
        if let Some(filter) = signature {
            let id = self.allocate_id();
            self.entries.push(ChainEntry {
                id,
                stage: Stage::Signature,
                filter,
            });
        }
        // stable: relative order inside each stage is kept
        self.entries.sort_by_key(|e| e.stage);
        if let Err(e) = self.revalidate(base) {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Validate every filter again, each against the view of the filters
    /// before it
    pub fn revalidate<M: Matrix + ?Sized>(&mut self, base: &M) -> Result<()> {
        debug!(filters = self.entries.len(), "revalidating filter chain");
        for k in 0..self.entries.len() {
            let (before, rest) = self.entries.split_at_mut(k);
            let view = FilteredView::new(base, before);
            rest[0].filter.validate(&view)?;
        }
        Ok(())
    }

    fn index_of(&self, id: FilterId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(SheetError::FilterNotFound { id: id.0 })
    }

    /// The filtered view of `base`
    pub fn view<'a, M: Matrix + ?Sized>(&'a self, base: &'a M) -> FilteredView<'a, M> {
        FilteredView::new(base, &self.entries)
    }
}

/// Map a visible coordinate to a base coordinate, last filter first.
pub(crate) fn translate(entries: &[ChainEntry], row: usize, column: usize) -> (usize, usize) {
    entries
        .iter()
        .rev()
        .fold((row, column), |(r, c), entry| entry.filter.translate(r, c))
}

/// A base matrix seen through a prefix of a filter chain.
pub struct FilteredView<'a, M: Matrix + ?Sized> {
    base: &'a M,
    entries: &'a [ChainEntry],
}

impl<'a, M: Matrix + ?Sized> FilteredView<'a, M> {
    pub(crate) fn new(base: &'a M, entries: &'a [ChainEntry]) -> Self {
        FilteredView { base, entries }
    }

    /// Map a visible coordinate to the base matrix
    #[must_use]
    pub fn translate(&self, row: usize, column: usize) -> (usize, usize) {
        translate(self.entries, row, column)
    }

    /// Header cells on the promoted axis, unconverted
    pub(crate) fn header_cells(&self, wanted: SeriesAxis) -> Option<Vec<CellValue>> {
        series::header_cells(self.base, self.entries, wanted)
    }
}

impl<M: Matrix + ?Sized> Matrix for FilteredView<'_, M> {
    fn number_of_rows(&self) -> usize {
        let excluded: usize = self
            .entries
            .iter()
            .map(|e| e.filter.rows().unwrap_or(0))
            .sum();
        self.base.number_of_rows().saturating_sub(excluded)
    }

    fn number_of_columns(&self) -> usize {
        let excluded: usize = self
            .entries
            .iter()
            .map(|e| e.filter.columns().unwrap_or(0))
            .sum();
        self.base.number_of_columns().saturating_sub(excluded)
    }

    fn cell_value(&self, row: usize, column: usize) -> Option<CellValue> {
        if row >= self.number_of_rows() || column >= self.number_of_columns() {
            return None;
        }
        let (row, column) = self.translate(row, column);
        self.base.cell_value(row, column)
    }

    fn column_names(&self) -> Option<Vec<String>> {
        series::header_names(self.base, self.entries, SeriesAxis::Columns)
    }

    fn row_names(&self) -> Option<Vec<String>> {
        series::header_names(self.base, self.entries, SeriesAxis::Rows)
    }
}
