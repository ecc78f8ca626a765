use super::{format_of, Destination, LoadOptions, Parser, Renderer, Rows, SaveOptions, SheetMap, Source};
use crate::cell::{parse_datetime, CellValue};
use crate::error::{Result, SheetError};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Number format used for datetime cells
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Spreadsheet reader for xlsx, xlsm, xls and ods
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineParser;

/// xlsx writer
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

fn read_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Parse(format!("Spreadsheet read error: {e}"))
}

fn write_error(e: XlsxError) -> SheetError {
    SheetError::Serialize(format!("xlsx write error: {e}"))
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        // Spreadsheets store every number as a float
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
            CellValue::Int(*f as i64)
        }
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| CellValue::Float(dt.as_f64()), CellValue::DateTime),
        Data::DateTimeIso(s) => {
            parse_datetime(s).map_or_else(|| CellValue::String(s.clone()), CellValue::DateTime)
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Rows of a worksheet range, padded so cells keep their sheet position
fn range_to_rows(range: &Range<Data>) -> Rows {
    let (row_offset, column_offset) = range
        .start()
        .map_or((0, 0), |(r, c)| (r as usize, c as usize));

    let mut rows: Rows = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Null; column_offset];
        cells.extend(row.iter().map(data_to_cell_value));
        rows.push(cells);
    }
    rows
}

fn read_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>) -> Result<SheetMap> {
    let names = workbook.sheet_names().to_vec();
    let mut sheets = SheetMap::new();
    for name in names {
        let range = workbook.worksheet_range(&name).map_err(read_error)?;
        sheets.insert(name, range_to_rows(&range));
    }
    Ok(sheets)
}

fn has_workbook_extension(path: &Path) -> bool {
    format_of(path).is_ok_and(|format| {
        matches!(format.as_str(), "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods")
    })
}

impl Parser for CalamineParser {
    fn parse(&self, source: Source<'_>, _options: &LoadOptions) -> Result<SheetMap> {
        let sheets = match source {
            Source::Path(path) if has_workbook_extension(path) => {
                read_workbook(open_workbook_auto(path).map_err(read_error)?)?
            }
            other => {
                let bytes = other.read_bytes()?;
                read_workbook(open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(read_error)?)?
            }
        };
        debug!(sheets = sheets.len(), "read spreadsheet");
        Ok(sheets)
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &Rows, datetime_format: &Format) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| SheetError::Serialize("Row index overflow".to_string()))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Serialize("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(write_error)?;
                }
                // Integers beyond 2^53 lose precision
                CellValue::Int(i) => {
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(write_error)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(write_error)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(write_error)?;
                }
                CellValue::DateTime(dt) => {
                    worksheet
                        .write_datetime_with_format(row_num, col_num, dt, datetime_format)
                        .map_err(write_error)?;
                }
            }
        }
    }
    Ok(())
}

impl Renderer for XlsxRenderer {
    fn render(
        &self,
        sheets: &SheetMap,
        destination: Destination<'_>,
        _options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        let mut workbook = Workbook::new();
        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name).map_err(write_error)?;
            write_rows(worksheet, rows, &datetime_format)?;
        }

        match destination {
            Destination::Memory => Ok(Some(workbook.save_to_buffer().map_err(write_error)?)),
            Destination::Path(path) => {
                workbook.save(path).map_err(write_error)?;
                Ok(None)
            }
        }
    }
}
