//! JSON codec.
//!
//! Reads either a top-level array (one sheet) or an object mapping sheet
//! names to arrays. Each array may hold rows (`[[1, 2], [3, 4]]`) or records
//! (`[{"a": 1}, {"a": 2}]`); record keys become the first row.
//! Writes an object mapping sheet names to arrays of rows.

use super::{Destination, LoadOptions, Parser, Renderer, Rows, SaveOptions, SheetMap, Source};
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::source::records_to_rows;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};

/// JSON reader/writer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Parser for JsonCodec {
    fn parse(&self, source: Source<'_>, _options: &LoadOptions) -> Result<SheetMap> {
        let name = source.default_sheet_name("json");
        let bytes = source.read_bytes()?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Parse(format!("Invalid JSON: {e}")))?;

        match value {
            Value::Array(items) => Ok(IndexMap::from([(name, array_to_rows(&items)?)])),
            Value::Object(sheets) => sheets
                .into_iter()
                .map(|(sheet, value)| match value {
                    Value::Array(items) => Ok((sheet, array_to_rows(&items)?)),
                    _ => Err(SheetError::Parse(format!(
                        "Sheet '{sheet}' must be an array"
                    ))),
                })
                .collect(),
            _ => Err(SheetError::Parse(
                "JSON must be an array or an object of arrays".to_string(),
            )),
        }
    }
}

impl Renderer for JsonCodec {
    fn render(
        &self,
        sheets: &SheetMap,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        let document: Map<String, Value> = sheets
            .iter()
            .map(|(name, rows)| (name.clone(), rows_to_json(rows)))
            .collect();

        match destination {
            Destination::Memory => {
                let mut buffer = Vec::new();
                write_json(&mut buffer, &document, options.pretty)?;
                Ok(Some(buffer))
            }
            Destination::Path(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                write_json(&mut writer, &document, options.pretty)?;
                writer.flush()?;
                Ok(None)
            }
        }
    }
}

fn write_json<W: Write>(writer: W, document: &Map<String, Value>, pretty: bool) -> Result<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, document)
    } else {
        serde_json::to_writer(writer, document)
    };
    result.map_err(|e| SheetError::Serialize(format!("JSON write error: {e}")))
}

fn array_to_rows(items: &[Value]) -> Result<Rows> {
    if items.iter().all(Value::is_object) && !items.is_empty() {
        let records: Vec<IndexMap<String, CellValue>> = items
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), json_value_to_cell(v)))
                    .collect()
            })
            .collect();
        return Ok(records_to_rows(&records));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Array(cells) => Ok(cells.iter().map(json_value_to_cell).collect()),
            _ => Err(SheetError::Parse(format!(
                "Element at index {idx} must be an array"
            ))),
        })
        .collect()
}

fn rows_to_json(rows: &Rows) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| Value::Array(row.iter().map(cell_to_json_value).collect()))
            .collect(),
    )
}

/// Convert a serde_json Value to a CellValue
fn json_value_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        Value::String(s) => CellValue::String(s.clone()),
        Value::Array(_) | Value::Object(_) => CellValue::String(value.to_string()),
    }
}

/// Convert a CellValue to a serde_json Value
fn cell_to_json_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => Value::Number((*i).into()),
        // NaN and infinities have no JSON number form
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map_or_else(|| Value::String(f.to_string()), Value::Number),
        CellValue::String(s) => Value::String(s.clone()),
        CellValue::DateTime(_) => Value::String(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> SheetMap {
        JsonCodec
            .parse(
                Source::Memory {
                    format: "json",
                    bytes: text.as_bytes(),
                },
                &LoadOptions::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_parse_records() {
        let sheets = parse_str(r#"[{"name": "Alice", "age": 30}, {"name": "Bob", "age": 25.5}]"#);
        let rows = &sheets["json"];
        assert_eq!(rows[0], vec![CellValue::from("name"), CellValue::from("age")]);
        assert_eq!(rows[1], vec![CellValue::from("Alice"), CellValue::Int(30)]);
        assert_eq!(rows[2][1], CellValue::Float(25.5));
    }

    #[test]
    fn test_parse_book_of_rows() {
        let sheets = parse_str(r#"{"b": [[1, null], [true, "x"]], "a": [[{"k": 1}]]}"#);
        assert_eq!(sheets.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(sheets["b"][0], vec![CellValue::Int(1), CellValue::Null]);
        assert_eq!(sheets["a"][0][0], CellValue::from(r#"{"k":1}"#));
    }

    #[test]
    fn test_parse_rejects_scalars() {
        let result = JsonCodec.parse(
            Source::Memory {
                format: "json",
                bytes: b"42",
            },
            &LoadOptions::default(),
        );
        assert!(matches!(result, Err(SheetError::Parse(_))));
        let result = JsonCodec.parse(
            Source::Memory {
                format: "json",
                bytes: b"[[1], 2]",
            },
            &LoadOptions::default(),
        );
        assert!(matches!(result, Err(SheetError::Parse(_))));
    }

    #[test]
    fn test_render_memory() {
        let sheets = IndexMap::from([(
            "s".to_string(),
            vec![vec![CellValue::Int(1), CellValue::Float(f64::NAN), CellValue::Null]],
        )]);
        let bytes = JsonCodec
            .render(&sheets, Destination::Memory, &SaveOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"s":[[1,"NaN",null]]}"#);
    }
}
