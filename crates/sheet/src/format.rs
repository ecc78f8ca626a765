//! Per-cell formatting hooks applied when cells are read.

use crate::cell::{cell_text, parse_datetime, CellType, CellValue};
use crate::matrix::{Grid, Matrix};
use crate::series::SeriesAxis;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Layouts tried when converting text to a date.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%b-%y"];

/// Value returned when text cannot be read as a number.
const NOT_AVAILABLE: &str = "N/A";

pub type FormatFn = Arc<dyn Fn(&CellValue, CellType) -> CellValue + Send + Sync>;

/// Handle for a formatter registered on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatterId(pub(crate) u64);

/// Which cells a formatter claims. Indices are physical (unfiltered)
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatTarget {
    Sheet,
    Rows(BTreeSet<usize>),
    Columns(BTreeSet<usize>),
    /// Resolved to `Columns` against the header row when registered
    NamedColumns(Vec<String>),
}

/// A conversion hook: the cells it claims are converted to `desired`,
/// either by the built-in table or by a custom function.
#[derive(Clone)]
pub struct Formatter {
    target: FormatTarget,
    desired: CellType,
    func: Option<FormatFn>,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("target", &self.target)
            .field("desired", &self.desired)
            .field("custom", &self.func.is_some())
            .finish()
    }
}

impl Formatter {
    /// Format every cell
    pub fn sheet(desired: CellType) -> Self {
        Self::new(FormatTarget::Sheet, desired)
    }

    /// Format one row
    pub fn row(index: usize, desired: CellType) -> Self {
        Self::rows([index], desired)
    }

    /// Format several rows
    pub fn rows<I: IntoIterator<Item = usize>>(indices: I, desired: CellType) -> Self {
        Self::new(FormatTarget::Rows(indices.into_iter().collect()), desired)
    }

    /// Format one column
    pub fn column(index: usize, desired: CellType) -> Self {
        Self::columns([index], desired)
    }

    /// Format several columns
    pub fn columns<I: IntoIterator<Item = usize>>(indices: I, desired: CellType) -> Self {
        Self::new(FormatTarget::Columns(indices.into_iter().collect()), desired)
    }

    /// Format columns by header name; the sheet must be a series
    pub fn named_columns<I, S>(names: I, desired: CellType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            FormatTarget::NamedColumns(names.into_iter().map(Into::into).collect()),
            desired,
        )
    }

    fn new(target: FormatTarget, desired: CellType) -> Self {
        Formatter {
            target,
            desired,
            func: None,
        }
    }

    /// Replace the built-in conversion with a custom function receiving the
    /// value and the type produced by the previous formatter
    #[must_use]
    pub fn with_func<F>(mut self, func: F) -> Self
    where
        F: Fn(&CellValue, CellType) -> CellValue + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    /// Target cells
    #[must_use]
    pub fn target(&self) -> &FormatTarget {
        &self.target
    }

    /// Type produced by this formatter
    #[must_use]
    pub fn desired(&self) -> CellType {
        self.desired
    }

    pub(crate) fn set_target(&mut self, target: FormatTarget) {
        self.target = target;
    }

    /// Whether this formatter applies to a physical cell
    #[must_use]
    pub fn claims(&self, row: usize, column: usize) -> bool {
        match &self.target {
            FormatTarget::Sheet => true,
            FormatTarget::Rows(rows) => rows.contains(&row),
            FormatTarget::Columns(columns) => columns.contains(&column),
            FormatTarget::NamedColumns(_) => false,
        }
    }

    /// Convert a value, returning it with its new type
    #[must_use]
    pub fn apply(&self, value: &CellValue, current: CellType) -> (CellValue, CellType) {
        let converted = match &self.func {
            Some(func) => func(value, current),
            None => convert(value, self.desired),
        };
        (converted, self.desired)
    }
}

/// Convert a scalar to the target type.
///
/// Text that cannot become a number yields `"N/A"`; values that have no
/// sensible date form are returned unchanged when a date is requested.
#[must_use]
pub fn convert(value: &CellValue, target: CellType) -> CellValue {
    if value.cell_type() == CellType::Empty {
        return match target {
            CellType::Int => CellValue::Int(0),
            CellType::Float => CellValue::Float(0.0),
            CellType::Bool => CellValue::Bool(false),
            CellType::String | CellType::Date => CellValue::String(String::new()),
            CellType::Empty => CellValue::Null,
        };
    }

    match target {
        CellType::Empty => CellValue::Null,
        CellType::String => CellValue::String(cell_text(value)),
        CellType::Int => match value {
            CellValue::String(s) => text_to_int(s),
            CellValue::DateTime(_) => value.clone(),
            other => other.as_int().map_or(CellValue::Null, CellValue::Int),
        },
        CellType::Float => match value {
            CellValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_or_else(|_| CellValue::from(NOT_AVAILABLE), CellValue::Float),
            CellValue::DateTime(_) => value.clone(),
            other => other.as_float().map_or(CellValue::Null, CellValue::Float),
        },
        CellType::Bool => match value {
            CellValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => CellValue::Bool(true),
                "false" | "no" | "0" => CellValue::Bool(false),
                _ => value.clone(),
            },
            CellValue::DateTime(_) => value.clone(),
            other => other.as_bool().map_or(CellValue::Null, CellValue::Bool),
        },
        CellType::Date => match value {
            CellValue::String(s) => text_to_date(s).unwrap_or_else(|| value.clone()),
            _ => value.clone(),
        },
    }
}

fn text_to_int(s: &str) -> CellValue {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => CellValue::Int(f.trunc() as i64),
        _ => CellValue::from(NOT_AVAILABLE),
    }
}

fn text_to_date(s: &str) -> Option<CellValue> {
    let trimmed = s.trim();
    if let Some(dt) = parse_datetime(trimmed) {
        return Some(CellValue::DateTime(dt));
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(CellValue::from)
}

/// The raw grid with formatters applied, in registration order. The
/// header row (or column) of a series is never formatted.
pub(crate) struct FormattedGrid<'a> {
    grid: &'a Grid,
    formatters: &'a [(FormatterId, Formatter)],
    header: Option<(SeriesAxis, usize)>,
}

impl<'a> FormattedGrid<'a> {
    pub(crate) fn new(
        grid: &'a Grid,
        formatters: &'a [(FormatterId, Formatter)],
        header: Option<(SeriesAxis, usize)>,
    ) -> Self {
        FormattedGrid {
            grid,
            formatters,
            header,
        }
    }

    fn is_header(&self, row: usize, column: usize) -> bool {
        match self.header {
            Some((SeriesAxis::Columns, index)) => row == index,
            Some((SeriesAxis::Rows, index)) => column == index,
            None => false,
        }
    }
}

impl Matrix for FormattedGrid<'_> {
    fn number_of_rows(&self) -> usize {
        self.grid.number_of_rows()
    }

    fn number_of_columns(&self) -> usize {
        self.grid.number_of_columns()
    }

    fn cell_value(&self, row: usize, column: usize) -> Option<CellValue> {
        let raw = self.grid.get(row, column)?;
        if self.formatters.is_empty() || self.is_header(row, column) {
            return Some(raw.clone());
        }
        let mut value = raw.clone();
        let mut current = value.cell_type();
        for (_, formatter) in self.formatters {
            if formatter.claims(row, column) {
                (value, current) = formatter.apply(&value, current);
            }
        }
        Some(value)
    }
}
