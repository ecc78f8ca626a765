use super::{format_of, Destination, LoadOptions, Parser, Renderer, Rows, SaveOptions, SheetMap, Source};
use crate::cell::{cell_text, CellValue};
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Delimited text codec (csv and tsv)
#[derive(Debug, Clone, Copy)]
pub struct CsvCodec {
    delimiter: u8,
    fallback_name: &'static str,
}

impl CsvCodec {
    /// Comma-separated values
    #[must_use]
    pub fn csv() -> Self {
        CsvCodec {
            delimiter: b',',
            fallback_name: "csv",
        }
    }

    /// Tab-separated values
    #[must_use]
    pub fn tsv() -> Self {
        CsvCodec {
            delimiter: b'\t',
            fallback_name: "tsv",
        }
    }

    fn extension(&self) -> &'static str {
        self.fallback_name
    }

    fn read_rows<R: Read>(&self, reader: R, options: &LoadOptions) -> Result<Rows> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(options.delimiter.unwrap_or(self.delimiter))
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(
                record
                    .iter()
                    .map(|field| field_to_cell(field, options.infer_types))
                    .collect(),
            );
        }
        Ok(rows)
    }

    fn write_rows<W: Write>(&self, writer: W, rows: &Rows, options: &SaveOptions) -> Result<()> {
        let mut csv_writer = ::csv::WriterBuilder::new()
            .delimiter(options.delimiter.unwrap_or(self.delimiter))
            .quote(options.quote)
            .flexible(true)
            .from_writer(writer);

        for row in rows {
            let record: Vec<String> = row.iter().map(cell_text).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn write_file(&self, path: &Path, rows: &Rows, options: &SaveOptions) -> Result<()> {
        let file = File::create(path)?;
        self.write_rows(BufWriter::new(file), rows, options)?;
        debug!(path = %path.display(), rows = rows.len(), "wrote delimited file");
        Ok(())
    }
}

fn field_to_cell(field: &str, infer_types: bool) -> CellValue {
    if infer_types {
        CellValue::parse(field)
    } else {
        CellValue::String(field.to_string())
    }
}

/// File name used for one sheet of a multi-sheet save: `<stem>__<sheet>__<index>.<ext>`
fn sheet_file_name(path: &Path, sheet: &str, index: usize, extension: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("book");
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(extension);
    let sheet: String = sheet
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    path.with_file_name(format!("{stem}__{sheet}__{index}.{extension}"))
}

impl Parser for CsvCodec {
    fn parse(&self, source: Source<'_>, options: &LoadOptions) -> Result<SheetMap> {
        let name = source.default_sheet_name(self.fallback_name);
        let rows = match source {
            Source::Path(path) => self.read_rows(BufReader::new(File::open(path)?), options)?,
            Source::Memory { bytes, .. } => self.read_rows(bytes, options)?,
            Source::Reader { reader, .. } => self.read_rows(reader, options)?,
        };
        Ok(IndexMap::from([(name, rows)]))
    }
}

impl Renderer for CsvCodec {
    fn render(
        &self,
        sheets: &SheetMap,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        match destination {
            Destination::Memory => {
                if sheets.len() > 1 {
                    return Err(SheetError::UnsupportedOperation(format!(
                        "{} holds one sheet per buffer, got {}",
                        self.extension(),
                        sheets.len()
                    )));
                }
                let mut buffer = Vec::new();
                if let Some(rows) = sheets.values().next() {
                    self.write_rows(&mut buffer, rows, options)?;
                }
                Ok(Some(buffer))
            }
            Destination::Path(path) => {
                if sheets.len() <= 1 {
                    let empty = Rows::new();
                    let rows = sheets.values().next().unwrap_or(&empty);
                    self.write_file(path, rows, options)?;
                } else {
                    for (index, (name, rows)) in sheets.iter().enumerate() {
                        let target = sheet_file_name(path, name, index, self.extension());
                        self.write_file(&target, rows, options)?;
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Row-at-a-time reader over a delimited file. The file stays open until
/// the stream is dropped.
pub struct CsvRowStream {
    reader: ::csv::Reader<BufReader<File>>,
    record: ::csv::StringRecord,
    infer_types: bool,
    path: PathBuf,
    rows_read: usize,
    finished: bool,
}

impl CsvRowStream {
    /// Open a csv or tsv file for streaming; the delimiter follows the
    /// extension unless the options override it
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let default_delimiter = match format_of(path).as_deref() {
            Ok("tsv") => b'\t',
            _ => b',',
        };
        let file = File::open(path)?;
        let reader = ::csv::ReaderBuilder::new()
            .delimiter(options.delimiter.unwrap_or(default_delimiter))
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        debug!(path = %path.display(), "opened csv stream");
        Ok(CsvRowStream {
            reader,
            record: ::csv::StringRecord::new(),
            infer_types: options.infer_types,
            path: path.to_path_buf(),
            rows_read: 0,
            finished: false,
        })
    }

    /// Rows yielded so far
    #[must_use]
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl Iterator for CsvRowStream {
    type Item = Result<Vec<CellValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                Some(Ok(self
                    .record
                    .iter()
                    .map(|field| field_to_cell(field, self.infer_types))
                    .collect()))
            }
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl Drop for CsvRowStream {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), rows = self.rows_read, "closed csv stream");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse_str(codec: CsvCodec, text: &str, options: &LoadOptions) -> Rows {
        let sheets = codec
            .parse(
                Source::Memory {
                    format: "csv",
                    bytes: text.as_bytes(),
                },
                options,
            )
            .unwrap();
        sheets.into_values().next().unwrap()
    }

    #[test]
    fn test_parse_with_inference() {
        let rows = parse_str(CsvCodec::csv(), "a,1,2.5\nb,,true\n", &LoadOptions::default());
        assert_eq!(
            rows,
            vec![
                vec!["a".into(), CellValue::Int(1), CellValue::Float(2.5)],
                vec!["b".into(), CellValue::Null, CellValue::Bool(true)],
            ]
        );
    }

    #[test]
    fn test_parse_ragged_and_untyped() {
        let options = LoadOptions::default().with_type_inference(false);
        let rows = parse_str(CsvCodec::csv(), "1,2,3\n4\n", &options);
        assert_eq!(rows[0][0], CellValue::from("1"));
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_tsv_and_delimiter_override() {
        let rows = parse_str(CsvCodec::tsv(), "a\tb\n", &LoadOptions::default());
        assert_eq!(rows[0].len(), 2);

        let options = LoadOptions::default().with_delimiter(b';');
        let rows = parse_str(CsvCodec::csv(), "a;b;c\n", &options);
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_render_memory_keeps_float_text() {
        let sheets = IndexMap::from([(
            "s".to_string(),
            vec![vec![CellValue::Float(1.0), CellValue::Int(2), CellValue::Null]],
        )]);
        let bytes = CsvCodec::csv()
            .render(&sheets, Destination::Memory, &SaveOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "1.0,2,\n");
    }

    #[test]
    fn test_render_many_sheets_to_memory_is_rejected() {
        let sheets = IndexMap::from([
            ("a".to_string(), vec![vec![CellValue::Int(1)]]),
            ("b".to_string(), vec![vec![CellValue::Int(2)]]),
        ]);
        let result = CsvCodec::csv().render(&sheets, Destination::Memory, &SaveOptions::default());
        assert!(matches!(result, Err(SheetError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_render_many_sheets_to_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.csv");
        let sheets = IndexMap::from([
            ("a".to_string(), vec![vec![CellValue::Int(1)]]),
            ("b".to_string(), vec![vec![CellValue::Int(2)]]),
        ]);
        CsvCodec::csv()
            .render(&sheets, Destination::Path(&path), &SaveOptions::default())
            .unwrap();
        assert!(dir.path().join("book__a__0.csv").exists());
        assert!(dir.path().join("book__b__1.csv").exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_sheet_names_cannot_leave_the_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let path = nested.join("book.csv");
        let sheets = IndexMap::from([
            ("../escape".to_string(), vec![vec![CellValue::Int(1)]]),
            ("a\\b".to_string(), vec![vec![CellValue::Int(2)]]),
        ]);
        CsvCodec::csv()
            .render(&sheets, Destination::Path(&path), &SaveOptions::default())
            .unwrap();

        assert!(nested.join("book__.._escape__0.csv").exists());
        assert!(nested.join("book__a_b__1.csv").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_row_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.tsv");
        std::fs::write(&path, "1\t2\n3\t4\n").unwrap();

        let mut stream = CsvRowStream::open(&path, &LoadOptions::default()).unwrap();
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first, vec![CellValue::Int(1), CellValue::Int(2)]);
        assert_eq!(stream.by_ref().count(), 1);
        assert_eq!(stream.rows_read(), 2);
        assert!(stream.next().is_none());
    }
}
