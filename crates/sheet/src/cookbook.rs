//! File-level recipes: update, merge, split and extract.
//!
//! Every recipe refuses to overwrite an existing output file.

use crate::book::Book;
use crate::cell::CellValue;
use crate::codec::{LoadOptions, Rows, SaveOptions};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn ensure_new(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(SheetError::OutputExists {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

/// `<prefix>_<output file name>`, next to `output`
fn prefixed_output(prefix: &str, output: &Path) -> PathBuf {
    output.with_file_name(format!("{prefix}_{}", file_name(output)))
}

/// Header row of keys, then rows up to the shortest column
fn columns_to_rows(columns: &IndexMap<String, Vec<CellValue>>) -> Rows {
    let height = columns.values().map(Vec::len).min().unwrap_or(0);
    let mut rows = Vec::with_capacity(height + 1);
    rows.push(columns.keys().map(CellValue::from).collect());
    for row in 0..height {
        rows.push(columns.values().map(|column| column[row].clone()).collect());
    }
    rows
}

fn write_columns(columns: &IndexMap<String, Vec<CellValue>>, output: &Path) -> Result<()> {
    let rows = columns_to_rows(columns);
    let height = rows.len() - 1;
    Sheet::from_data(rows).save_as(output, &SaveOptions::default())?;
    info!(output = %output.display(), columns = columns.len(), rows = height, "wrote merged columns");
    Ok(())
}

/// Replace named columns of the sheet in `input` and save it to `output`.
///
/// The first row of the input names the columns. Values are written below
/// the header; a longer replacement extends the sheet with empty rows.
pub fn update_columns<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    columns: &IndexMap<String, Vec<CellValue>>,
    output: Q,
) -> Result<()> {
    let output = output.as_ref();
    ensure_new(output)?;

    let mut sheet = Sheet::load(input, &LoadOptions::default())?;
    let header: Vec<String> = if sheet.is_empty() {
        Vec::new()
    } else {
        sheet.row(0)?.iter().map(ToString::to_string).collect()
    };

    for (name, values) in columns {
        let column = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SheetError::HeaderNotFound { name: name.clone() })?;

        let needed = values.len() + 1;
        if sheet.row_count() < needed {
            let missing = needed - sheet.row_count();
            sheet.rows_extend(vec![Vec::<CellValue>::new(); missing])?;
        }
        for (offset, value) in values.iter().enumerate() {
            sheet.set(offset + 1, column, value.clone())?;
        }
    }

    sheet.save_as(output, &SaveOptions::default())?;
    info!(output = %output.display(), updated = columns.len(), "updated columns");
    Ok(())
}

/// Union the named columns of several files into one sheet; a later file's
/// column replaces an earlier one of the same name.
pub fn merge_files<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    let output = output.as_ref();
    ensure_new(output)?;

    let mut merged = IndexMap::new();
    for input in inputs {
        let sheet = Sheet::load(input, &LoadOptions::with_headers())?;
        merged.extend(sheet.to_dict());
    }
    write_columns(&merged, output)
}

/// [`merge_files`] for exactly two files
pub fn merge_two_files<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    first: P,
    second: Q,
    output: R,
) -> Result<()> {
    merge_files(&[first.as_ref(), second.as_ref()], output)
}

/// Union the dictionaries of already loaded sheets into one sheet.
///
/// Column series contribute their named columns; plain sheets contribute
/// `Series_<n>` rows.
pub fn merge_sheets<P: AsRef<Path>>(sheets: &[&Sheet], output: P) -> Result<()> {
    let output = output.as_ref();
    ensure_new(output)?;

    let mut merged = IndexMap::new();
    for sheet in sheets {
        merged.extend(sheet.to_dict());
    }
    write_columns(&merged, output)
}

/// [`merge_sheets`] for exactly two sheets
pub fn merge_two_sheets<P: AsRef<Path>>(first: &Sheet, second: &Sheet, output: P) -> Result<()> {
    merge_sheets(&[first, second], output)
}

/// Gather csv files into one book, one sheet per file named by its file
/// name.
pub fn merge_csv_to_a_book<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    let output = output.as_ref();
    ensure_new(output)?;

    let mut book = Book::new();
    for input in inputs {
        let input = input.as_ref();
        let sheet = Sheet::load(input, &LoadOptions::default())?;
        book.add_sheet(&file_name(input), sheet)?;
    }
    book.save_as(output, &SaveOptions::default())?;
    info!(output = %output.display(), sheets = book.number_of_sheets(), "wrote book");
    Ok(())
}

/// Gather every sheet of every input into one book.
///
/// Empty sheets are skipped. An input with one non-empty sheet names it by
/// the file name; otherwise sheets are named `<file name>_<sheet name>`.
pub fn merge_all_to_a_book<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<()> {
    let output = output.as_ref();
    ensure_new(output)?;

    let mut merged = Book::new();
    for input in inputs {
        let input = input.as_ref();
        let book = Book::load(input, &LoadOptions::default())?;
        let single = book.sheets().filter(|(_, sheet)| !sheet.is_empty()).count() == 1;
        let file = file_name(input);

        for (sheet_name, sheet) in book {
            if sheet.is_empty() {
                warn!(input = %input.display(), sheet = %sheet_name, "skipping empty sheet");
                continue;
            }
            let name = if single {
                file.clone()
            } else {
                format!("{file}_{sheet_name}")
            };
            merged.add_sheet(&name, sheet)?;
        }
    }
    merged.save_as(output, &SaveOptions::default())?;
    info!(output = %output.display(), sheets = merged.number_of_sheets(), "wrote book");
    Ok(())
}

/// Write each sheet of a book to its own file, `<sheet name>_<output>`.
///
/// Nothing is written if any target already exists.
pub fn split_a_book<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Vec<PathBuf>> {
    let output = output.as_ref();
    let book = Book::load(input, &LoadOptions::default())?;

    let targets: Vec<PathBuf> = book
        .sheet_names()
        .into_iter()
        .map(|name| prefixed_output(name, output))
        .collect();
    for target in &targets {
        ensure_new(target)?;
    }

    for ((_, sheet), target) in book.sheets().zip(&targets) {
        sheet.save_as(target, &SaveOptions::default())?;
        info!(output = %target.display(), sheet = %sheet.name(), "wrote sheet");
    }
    Ok(targets)
}

/// Write one sheet of a book to `<sheet name>_<output>`
pub fn extract_a_sheet_from_a_book<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    sheet_name: &str,
    output: Q,
) -> Result<PathBuf> {
    let target = prefixed_output(sheet_name, output.as_ref());
    ensure_new(&target)?;

    let book = Book::load(input, &LoadOptions::default())?;
    let sheet = book.sheet(sheet_name)?;
    sheet.save_as(&target, &SaveOptions::default())?;
    info!(output = %target.display(), sheet = %sheet_name, "extracted sheet");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_to_rows_truncates_to_shortest() {
        let columns = IndexMap::from([
            ("a".to_string(), vec![CellValue::Int(1), CellValue::Int(2)]),
            ("b".to_string(), vec![CellValue::Int(3)]),
        ]);
        assert_eq!(
            columns_to_rows(&columns),
            vec![
                vec![CellValue::from("a"), CellValue::from("b")],
                vec![CellValue::Int(1), CellValue::Int(3)],
            ]
        );
        assert_eq!(columns_to_rows(&IndexMap::new()), vec![Vec::<CellValue>::new()]);
    }

    #[test]
    fn test_prefixed_output_stays_in_directory() {
        let target = prefixed_output("Sheet1", Path::new("/tmp/out/result.csv"));
        assert_eq!(target, PathBuf::from("/tmp/out/Sheet1_result.csv"));
    }
}
