//! In-memory sources: dict-of-columns, records and query results.

use crate::cell::CellValue;
use crate::codec::Rows;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;

/// Rows fetched from a database table, already materialized by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Table (or query) name; becomes the sheet name
    pub table: String,
    /// Column names in select order
    pub columns: Vec<String>,
    /// Result rows, one value per column
    pub rows: Rows,
}

impl QueryResult {
    pub fn new<S: Into<String>>(table: S, columns: Vec<String>, rows: Rows) -> Self {
        QueryResult {
            table: table.into(),
            columns,
            rows,
        }
    }

    /// Header row followed by the result rows. Every row must have one value
    /// per column.
    pub fn into_rows(self) -> Result<Rows> {
        let width = self.columns.len();
        if let Some(row) = self.rows.iter().find(|row| row.len() != width) {
            return Err(SheetError::LengthMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(self.columns.into_iter().map(CellValue::String).collect());
        rows.extend(self.rows);
        Ok(rows)
    }
}

/// Header row of keys, then the columns laid side by side. Shorter columns
/// are padded with nulls.
#[must_use]
pub fn dict_to_rows(dict: &IndexMap<String, Vec<CellValue>>) -> Rows {
    let height = dict.values().map(Vec::len).max().unwrap_or(0);
    let mut rows = Vec::with_capacity(height + 1);
    rows.push(dict.keys().map(CellValue::from).collect());
    for row in 0..height {
        rows.push(
            dict.values()
                .map(|column| column.get(row).cloned().unwrap_or_default())
                .collect(),
        );
    }
    rows
}

/// Header row from the keys of the first record, then one row per record.
/// Keys missing from a record read as null.
#[must_use]
pub fn records_to_rows(records: &[IndexMap<String, CellValue>]) -> Rows {
    let Some(first) = records.first() else {
        return Rows::new();
    };
    let keys: Vec<&String> = first.keys().collect();

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(keys.iter().map(|k| CellValue::from(*k)).collect());
    for record in records {
        rows.push(
            keys.iter()
                .map(|k| record.get(*k).cloned().unwrap_or_default())
                .collect(),
        );
    }
    rows
}
