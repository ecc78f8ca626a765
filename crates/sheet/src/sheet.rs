use crate::a1_notation::parse_a1;
use crate::cell::CellValue;
use crate::chain::{FilterChain, FilterId, Stage};
use crate::codec::{save_format, CodecRegistry, Destination, LoadOptions, Rows, SaveOptions, Source};
use crate::error::{Result, SheetError};
use crate::filter::IndexFilter;
use crate::format::{FormatTarget, FormattedGrid, Formatter, FormatterId};
use crate::iter::{self, NamedColumns, NamedRows};
use crate::matrix::{Grid, Matrix};
use crate::series::{signature_filter, stage_for, SeriesAxis};
use crate::source::{dict_to_rows, records_to_rows, QueryResult};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// A named grid seen through a chain of filters and formatters.
///
/// Reads (`get`, iteration, conversions, saving) go through the filters and
/// formatters; structural edits are only allowed while no filter is active.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    grid: Grid,
    chain: FilterChain,
    header: Option<(SeriesAxis, usize)>,
    formatters: Vec<(FormatterId, Formatter)>,
    next_formatter_id: u64,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self::from_grid(name, Grid::new())
    }

    fn from_grid(name: &str, grid: Grid) -> Self {
        Sheet {
            name: name.to_string(),
            grid,
            chain: FilterChain::new(),
            header: None,
            formatters: Vec::new(),
            next_formatter_id: 0,
        }
    }

    /// Create a sheet from a 2D vector of values; short rows are padded
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        Self::from_grid("Sheet1", Grid::from_rows(data))
    }

    /// Create a sheet from rows that must all have the same length
    pub fn from_rows_strict<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Result<Self> {
        Ok(Self::from_grid("Sheet1", Grid::from_rows_strict(data)?))
    }

    /// Create a series sheet from named columns. Shorter columns are padded
    /// with nulls.
    pub fn from_dict(dict: &IndexMap<String, Vec<CellValue>>) -> Result<Self> {
        let mut sheet = Self::from_data(dict_to_rows(dict));
        sheet.become_series()?;
        Ok(sheet)
    }

    /// Create a series sheet from records; column order follows the first
    /// record
    pub fn from_records(records: &[IndexMap<String, CellValue>]) -> Result<Self> {
        let mut sheet = Self::from_data(records_to_rows(records));
        if sheet.grid.height() > 0 {
            sheet.become_series()?;
        }
        Ok(sheet)
    }

    /// Create a series sheet from a fetched query result, named after its
    /// table
    pub fn from_query(query: QueryResult) -> Result<Self> {
        let name = query.table.clone();
        let mut sheet = Self::from_grid(&name, Grid::from_rows(query.into_rows()?));
        sheet.become_series()?;
        Ok(sheet)
    }

    // ===== Loading =====

    /// Load a sheet from a file; the format comes from the extension
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        Self::load_with(&CodecRegistry::default(), Source::Path(path.as_ref()), options)
    }

    /// Load a sheet from an in-memory buffer of the given format
    pub fn load_from_memory(format: &str, bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        Self::load_with(
            &CodecRegistry::default(),
            Source::Memory { format, bytes },
            options,
        )
    }

    /// Load one sheet of a source through a codec registry.
    ///
    /// The sheet is chosen by `options.sheet_name`, else by
    /// `options.sheet_index`.
    pub fn load_with(
        registry: &CodecRegistry,
        source: Source<'_>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let mut sheets = registry.parse(source, options)?;

        let selected = match &options.sheet_name {
            Some(name) => sheets
                .shift_remove_entry(name)
                .ok_or_else(|| SheetError::SheetNotFound { name: name.clone() })?,
            None if sheets.is_empty() && options.sheet_index == 0 => {
                return Ok(Self::new());
            }
            None => sheets
                .shift_remove_index(options.sheet_index)
                .ok_or_else(|| SheetError::SheetNotFound {
                    name: format!("#{}", options.sheet_index),
                })?,
        };

        let (name, rows) = selected;
        Self::from_parsed(&name, rows, options)
    }

    /// Build a sheet from parsed rows and apply the naming options
    pub(crate) fn from_parsed(name: &str, rows: Rows, options: &LoadOptions) -> Result<Self> {
        let mut sheet = Self::from_grid(name, Grid::from_rows(rows));
        if sheet.grid.is_empty() {
            return Ok(sheet);
        }
        match (options.name_columns_by_row, options.name_rows_by_column) {
            (Some(_), Some(_)) => {
                return Err(SheetError::UnsupportedOperation(
                    "a sheet can name either its columns or its rows, not both".to_string(),
                ))
            }
            (Some(row), None) => sheet.become_series_at(row)?,
            (None, Some(column)) => sheet.become_row_series_at(column)?,
            (None, None) => {}
        }
        Ok(sheet)
    }

    // ===== Properties =====

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Visible row count
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.number_of_rows()
    }

    /// Visible column count
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.number_of_columns()
    }

    /// Check if no cell is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.col_count() == 0
    }

    /// The unfiltered, unformatted cells
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn base(&self) -> FormattedGrid<'_> {
        FormattedGrid::new(&self.grid, &self.formatters, self.header)
    }

    // ===== Cell Access =====

    /// Get a visible cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<CellValue> {
        self.cell_value(row, col)
            .ok_or_else(|| SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.number_of_rows(),
                cols: self.number_of_columns(),
            })
    }

    /// Overwrite the cell behind a visible coordinate
    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = (self.number_of_rows(), self.number_of_columns());
        if row >= rows || col >= cols {
            return Err(SheetError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        let (row, col) = self.chain.view(&self.grid).translate(row, col);
        self.grid.set(row, col, value.into())?;
        // value filters must see the new cell
        self.revalidate()
    }

    /// Get a cell by A1 notation ("B3")
    pub fn get_a1(&self, notation: &str) -> Result<CellValue> {
        let (row, col) = parse_a1(notation)?;
        self.get(row, col)
    }

    /// Set a cell by A1 notation ("B3")
    pub fn set_a1<T: Into<CellValue>>(&mut self, notation: &str, value: T) -> Result<()> {
        let (row, col) = parse_a1(notation)?;
        self.set(row, col, value)
    }

    /// Get an entire visible row
    pub fn row(&self, index: usize) -> Result<Vec<CellValue>> {
        self.row_at(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.number_of_rows(),
        })
    }

    /// Get an entire visible column
    pub fn column(&self, index: usize) -> Result<Vec<CellValue>> {
        self.column_at(index).ok_or(SheetError::ColumnIndexOutOfBounds {
            index,
            count: self.number_of_columns(),
        })
    }

    // ===== Row Operations =====

    fn ensure_unfiltered(&self, operation: &str) -> Result<()> {
        if self.chain.is_empty() {
            Ok(())
        } else {
            Err(SheetError::UnsupportedOperation(format!(
                "{operation} needs an unfiltered sheet; clear filters and headers first"
            )))
        }
    }

    /// Append a row; a longer row widens the sheet, a shorter one is padded
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        self.row_insert(self.grid.height(), data)
    }

    /// Append several rows
    pub fn rows_extend<T: Into<CellValue>>(&mut self, rows: Vec<Vec<T>>) -> Result<()> {
        self.ensure_unfiltered("rows_extend")?;
        for row in rows {
            let index = self.grid.height();
            self.grid
                .insert_row(index, row.into_iter().map(Into::into).collect())?;
        }
        Ok(())
    }

    /// Insert a row at a specific index
    pub fn row_insert<T: Into<CellValue>>(&mut self, index: usize, data: Vec<T>) -> Result<()> {
        self.ensure_unfiltered("row_insert")?;
        self.grid
            .insert_row(index, data.into_iter().map(Into::into).collect())
    }

    /// Delete a row, returning its raw cells
    pub fn row_delete(&mut self, index: usize) -> Result<Vec<CellValue>> {
        self.ensure_unfiltered("row_delete")?;
        self.grid.remove_row(index)
    }

    /// Delete several rows. Nothing is deleted if any index is out of range.
    pub fn rows_delete(&mut self, indices: &[usize]) -> Result<()> {
        self.ensure_unfiltered("rows_delete")?;
        let indices: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= self.grid.height()) {
            return Err(SheetError::RowIndexOutOfBounds {
                index,
                count: self.grid.height(),
            });
        }
        for index in indices.into_iter().rev() {
            self.grid.remove_row(index)?;
        }
        Ok(())
    }

    // ===== Column Operations =====

    /// Append a column; a longer column adds rows
    pub fn column_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        self.column_insert(self.grid.width(), data)
    }

    /// Insert a column at a specific index
    pub fn column_insert<T: Into<CellValue>>(&mut self, index: usize, data: Vec<T>) -> Result<()> {
        self.ensure_unfiltered("column_insert")?;
        self.grid
            .insert_column(index, data.into_iter().map(Into::into).collect())
    }

    /// Delete a column, returning its raw cells
    pub fn column_delete(&mut self, index: usize) -> Result<Vec<CellValue>> {
        self.ensure_unfiltered("column_delete")?;
        self.grid.remove_column(index)
    }

    /// Delete several columns. Nothing is deleted if any index is out of
    /// range.
    pub fn columns_delete(&mut self, indices: &[usize]) -> Result<()> {
        self.ensure_unfiltered("columns_delete")?;
        let indices: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(&index) = indices.iter().find(|&&i| i >= self.grid.width()) {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.grid.width(),
            });
        }
        for index in indices.into_iter().rev() {
            self.grid.remove_column(index)?;
        }
        Ok(())
    }

    // ===== Filters =====

    /// Attach a filter; it is validated against the current view
    pub fn add_filter(&mut self, filter: IndexFilter) -> Result<FilterId> {
        let stage = stage_for(self.series_axis(), filter.axis());
        let base = FormattedGrid::new(&self.grid, &self.formatters, self.header);
        let id = self.chain.add(stage, filter, &base)?;
        debug!(sheet = %self.name, filter = %id, ?stage, "added filter");
        Ok(id)
    }

    fn signature_id(&self) -> Option<FilterId> {
        self.chain
            .filters()
            .find(|(_, stage, _)| *stage == Stage::Signature)
            .map(|(id, _, _)| id)
    }

    fn ensure_user_filter(&self, id: FilterId) -> Result<()> {
        if self.signature_id() == Some(id) {
            return Err(SheetError::UnsupportedOperation(
                "the header filter is managed by become_series/become_sheet".to_string(),
            ));
        }
        Ok(())
    }

    /// Detach a filter and re-validate the rest
    pub fn remove_filter(&mut self, id: FilterId) -> Result<IndexFilter> {
        self.ensure_user_filter(id)?;
        let base = FormattedGrid::new(&self.grid, &self.formatters, self.header);
        let filter = self.chain.remove(id, &base)?;
        debug!(sheet = %self.name, filter = %id, "removed filter");
        Ok(filter)
    }

    /// Flip a filter between excluding and keeping its selection
    pub fn invert_filter(&mut self, id: FilterId) -> Result<()> {
        self.ensure_user_filter(id)?;
        let base = FormattedGrid::new(&self.grid, &self.formatters, self.header);
        self.chain.invert(id, &base)
    }

    /// Drop every user filter; an active header stays
    pub fn clear_filters(&mut self) -> Result<()> {
        let base = FormattedGrid::new(&self.grid, &self.formatters, self.header);
        self.chain
            .retain(|_, stage| stage == Stage::Signature, &base)
    }

    /// Number of user filters
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters().count()
    }

    /// Look up a user filter
    #[must_use]
    pub fn filter(&self, id: FilterId) -> Option<&IndexFilter> {
        if self.signature_id() == Some(id) {
            return None;
        }
        self.chain.get(id)
    }

    /// User filters in chain order
    pub fn filters(&self) -> impl Iterator<Item = (FilterId, &IndexFilter)> {
        self.chain
            .filters()
            .filter(|(_, stage, _)| *stage != Stage::Signature)
            .map(|(id, _, filter)| (id, filter))
    }

    // ===== Series =====

    /// Promote row 0 to column names
    pub fn become_series(&mut self) -> Result<()> {
        self.become_series_at(0)
    }

    /// Promote a row to column names; it disappears from the data view
    pub fn become_series_at(&mut self, row: usize) -> Result<()> {
        if row >= self.grid.height() {
            return Err(SheetError::RowIndexOutOfBounds {
                index: row,
                count: self.grid.height(),
            });
        }
        self.promote(Some((SeriesAxis::Columns, row)))
    }

    /// Promote a column to row names; it disappears from the data view
    pub fn become_row_series_at(&mut self, column: usize) -> Result<()> {
        if column >= self.grid.width() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index: column,
                count: self.grid.width(),
            });
        }
        self.promote(Some((SeriesAxis::Rows, column)))
    }

    /// Drop the header and return to positional access.
    ///
    /// Fails, leaving the sheet unchanged, if a remaining filter needs names.
    pub fn become_sheet(&mut self) -> Result<()> {
        self.promote(None)
    }

    fn promote(&mut self, header: Option<(SeriesAxis, usize)>) -> Result<()> {
        let series = header.map(|(axis, _)| axis);
        let signature = header.map(|(axis, index)| signature_filter(axis, index));
        let base = FormattedGrid::new(&self.grid, &self.formatters, header);
        self.chain
            .reshape(signature, |f| stage_for(series, f.axis()), &base)?;
        self.header = header;
        debug!(sheet = %self.name, ?header, "changed header");
        Ok(())
    }

    /// Check if a row or column is promoted to names
    #[must_use]
    pub fn is_series(&self) -> bool {
        self.header.is_some()
    }

    /// The promoted axis, if any
    #[must_use]
    pub fn series_axis(&self) -> Option<SeriesAxis> {
        self.header.map(|(axis, _)| axis)
    }

    /// Names on the promoted axis; empty for a plain sheet
    #[must_use]
    pub fn series(&self) -> Vec<String> {
        let names = match self.series_axis() {
            Some(SeriesAxis::Columns) => self.column_names(),
            Some(SeriesAxis::Rows) => self.row_names(),
            None => None,
        };
        names.unwrap_or_default()
    }

    /// The visible column under a header name, as `{name: column}`.
    /// The first exact match wins.
    pub fn named_column_at(&self, name: &str) -> Result<IndexMap<String, Vec<CellValue>>> {
        let names = self.column_names().ok_or_else(|| {
            SheetError::ColumnsNotNamed(format!("sheet '{}' has no column names", self.name))
        })?;
        let index = position_of(&names, name)?;
        let column = self.column(index)?;
        Ok(IndexMap::from([(name.to_string(), column)]))
    }

    /// The visible row under a row name, as `{name: row}`
    pub fn named_row_at(&self, name: &str) -> Result<IndexMap<String, Vec<CellValue>>> {
        let names = self.row_names().ok_or(SheetError::RowsNotNamed)?;
        let index = position_of(&names, name)?;
        let row = self.row(index)?;
        Ok(IndexMap::from([(name.to_string(), row)]))
    }

    // ===== Formatters =====

    /// Register a formatter. Named-column targets are resolved to physical
    /// columns now, so the sheet must have column names.
    pub fn add_formatter(&mut self, mut formatter: Formatter) -> Result<FormatterId> {
        let named = match formatter.target() {
            FormatTarget::NamedColumns(names) => Some(names.clone()),
            _ => None,
        };
        if let Some(names) = named {
            let columns = self.physical_columns(&names)?;
            formatter.set_target(FormatTarget::Columns(columns));
        }

        let id = FormatterId(self.next_formatter_id);
        self.next_formatter_id += 1;
        self.formatters.push((id, formatter));
        if let Err(e) = self.revalidate() {
            self.formatters.pop();
            self.revalidate()?;
            return Err(e);
        }
        Ok(id)
    }

    fn physical_columns(&self, names: &[String]) -> Result<BTreeSet<usize>> {
        let headers = self.column_names().ok_or_else(|| {
            SheetError::ColumnsNotNamed(format!("sheet '{}' has no column names", self.name))
        })?;
        let view = self.chain.view(&self.grid);
        names
            .iter()
            .map(|name| {
                let visible = position_of(&headers, name)?;
                Ok(view.translate(0, visible).1)
            })
            .collect()
    }

    /// Unregister a formatter
    pub fn remove_formatter(&mut self, id: FormatterId) -> Result<Formatter> {
        let index = self
            .formatters
            .iter()
            .position(|(f, _)| *f == id)
            .ok_or(SheetError::FormatterNotFound { id: id.0 })?;
        let (_, formatter) = self.formatters.remove(index);
        self.revalidate()?;
        Ok(formatter)
    }

    /// Unregister every formatter
    pub fn clear_formatters(&mut self) -> Result<()> {
        self.formatters.clear();
        self.revalidate()
    }

    /// Number of registered formatters
    #[must_use]
    pub fn formatter_count(&self) -> usize {
        self.formatters.len()
    }

    /// Value filters see formatted cells, so they follow formatter changes
    fn revalidate(&mut self) -> Result<()> {
        if self.chain.is_empty() {
            return Ok(());
        }
        let base = FormattedGrid::new(&self.grid, &self.formatters, self.header);
        self.chain.revalidate(&base)
    }

    // ===== Conversion =====

    /// Visible rows as written to a file: the header row first for a
    /// column series, each row prefixed by its name for a row series
    #[must_use]
    pub fn to_table(&self) -> Rows {
        let base = self.base();
        let view = self.chain.view(&base);
        match self.series_axis() {
            Some(SeriesAxis::Columns) => {
                let mut rows = Vec::with_capacity(view.number_of_rows() + 1);
                rows.push(view.header_cells(SeriesAxis::Columns).unwrap_or_default());
                rows.extend(view.rows());
                rows
            }
            Some(SeriesAxis::Rows) => view
                .header_cells(SeriesAxis::Rows)
                .unwrap_or_default()
                .into_iter()
                .zip(view.rows())
                .map(|(name, row)| {
                    let mut full = Vec::with_capacity(row.len() + 1);
                    full.push(name);
                    full.extend(row);
                    full
                })
                .collect(),
            None => view.to_array(),
        }
    }

    /// Columns keyed by name for a column series, rows keyed by name for a
    /// row series, rows keyed `Series_1`, `Series_2`, ... otherwise
    #[must_use]
    pub fn to_dict(&self) -> IndexMap<String, Vec<CellValue>> {
        match self.series_axis() {
            Some(SeriesAxis::Columns) => NamedColumns::new(self).flatten().collect(),
            Some(SeriesAxis::Rows) => NamedRows::new(self).flatten().collect(),
            None => self
                .rows()
                .enumerate()
                .map(|(i, row)| (format!("Series_{}", i + 1), row))
                .collect(),
        }
    }

    /// One record per row (column series) or per column (row series)
    pub fn to_records(&self) -> Result<Vec<IndexMap<String, CellValue>>> {
        let (names, vectors): (Vec<String>, Vec<Vec<CellValue>>) = match self.series_axis() {
            Some(SeriesAxis::Columns) => (self.series(), self.rows().collect()),
            Some(SeriesAxis::Rows) => (self.series(), self.columns().collect()),
            None => {
                return Err(SheetError::ColumnsNotNamed(format!(
                    "sheet '{}' needs a header to build records",
                    self.name
                )))
            }
        };
        Ok(vectors
            .into_iter()
            .map(|values| names.iter().cloned().zip(values).collect())
            .collect())
    }

    // ===== Iteration =====

    /// Default iteration: rows for a plain sheet, `{name: column}` for a
    /// column series, `{name: row}` for a row series
    #[must_use]
    pub fn iter(&self) -> SheetIter<'_> {
        match self.series_axis() {
            None => SheetIter::Rows(iter::Rows::new(self)),
            Some(SeriesAxis::Columns) => SheetIter::NamedColumns(NamedColumns::new(self)),
            Some(SeriesAxis::Rows) => SheetIter::NamedRows(NamedRows::new(self)),
        }
    }

    // ===== Persistence =====

    /// Save through the codec chosen by the file extension
    pub fn save_as<P: AsRef<Path>>(&self, path: P, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let format = save_format(path, options)?;
        self.save_with(&CodecRegistry::default(), &format, Destination::Path(path), options)?;
        Ok(())
    }

    /// Render into a buffer of the given format
    pub fn save_to_memory(&self, format: &str, options: &SaveOptions) -> Result<Vec<u8>> {
        self.save_with(&CodecRegistry::default(), format, Destination::Memory, options)?
            .ok_or_else(|| SheetError::Serialize(format!("{format} renderer returned no bytes")))
    }

    /// Render through a codec registry
    pub fn save_with(
        &self,
        registry: &CodecRegistry,
        format: &str,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        let sheets = IndexMap::from([(self.name.clone(), self.to_table())]);
        registry.render(format, &sheets, destination, options)
    }
}

fn position_of(names: &[String], name: &str) -> Result<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| SheetError::HeaderNotFound {
            name: name.to_string(),
        })
}

impl Matrix for Sheet {
    fn number_of_rows(&self) -> usize {
        let base = self.base();
        self.chain.view(&base).number_of_rows()
    }

    fn number_of_columns(&self) -> usize {
        let base = self.base();
        self.chain.view(&base).number_of_columns()
    }

    fn cell_value(&self, row: usize, column: usize) -> Option<CellValue> {
        let base = self.base();
        self.chain.view(&base).cell_value(row, column)
    }

    fn column_names(&self) -> Option<Vec<String>> {
        let base = self.base();
        self.chain.view(&base).column_names()
    }

    fn row_names(&self) -> Option<Vec<String>> {
        let base = self.base();
        self.chain.view(&base).row_names()
    }
}

/// One step of [`Sheet::iter`].
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEntry {
    Row(Vec<CellValue>),
    Named(IndexMap<String, Vec<CellValue>>),
}

/// Iterator returned by [`Sheet::iter`].
pub enum SheetIter<'a> {
    Rows(iter::Rows<'a, Sheet>),
    NamedColumns(NamedColumns<'a, Sheet>),
    NamedRows(NamedRows<'a, Sheet>),
}

impl Iterator for SheetIter<'_> {
    type Item = SheetEntry;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SheetIter::Rows(rows) => rows.next().map(SheetEntry::Row),
            SheetIter::NamedColumns(columns) => columns.next().map(SheetEntry::Named),
            SheetIter::NamedRows(rows) => rows.next().map(SheetEntry::Named),
        }
    }
}

impl<'a> IntoIterator for &'a Sheet {
    type Item = SheetEntry;
    type IntoIter = SheetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
