//! Sheet/Book module for gridbook
//!
//! One API over tabular data from csv, tsv, json, spreadsheet files and
//! in-memory records: read it, hide rows and columns with filters, name
//! columns or rows by a header, convert cell types, and write it back out.
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use gridbook_sheet::{CellValue, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["Name", "Age", "City"],
//!     vec!["Alice", "30", "NYC"],
//!     vec!["Bob", "25", "LA"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 3);
//! assert_eq!(sheet.col_count(), 3);
//! assert_eq!(sheet.get_a1("B3").unwrap(), CellValue::from("25"));
//! ```
//!
//! ## Filtering
//!
//! Filters hide rows or columns without touching the data. Coordinates
//! always refer to what is still visible.
//!
//! ```
//! use gridbook_sheet::{CellValue, IndexFilter, Matrix, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec![1, 2, 3],
//!     vec![4, 5, 6],
//!     vec![7, 8, 9],
//! ]);
//!
//! let id = sheet.add_filter(IndexFilter::single_row(1)).unwrap();
//! sheet.add_filter(IndexFilter::single_column(0)).unwrap();
//! assert_eq!(
//!     sheet.to_array(),
//!     vec![
//!         vec![CellValue::Int(2), CellValue::Int(3)],
//!         vec![CellValue::Int(8), CellValue::Int(9)],
//!     ]
//! );
//!
//! sheet.remove_filter(id).unwrap();
//! assert_eq!(sheet.row_count(), 3);
//! ```
//!
//! ## Named columns
//!
//! ```
//! use gridbook_sheet::{CellValue, IndexFilter, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec![CellValue::from("name"), CellValue::from("age")],
//!     vec![CellValue::from("Alice"), CellValue::Int(30)],
//!     vec![CellValue::from("Bob"), CellValue::Int(25)],
//! ]);
//! sheet.become_series().unwrap();
//! assert_eq!(sheet.series(), vec!["name", "age"]);
//!
//! sheet
//!     .add_filter(IndexFilter::named_row_values(|record| {
//!         record.get("age").and_then(CellValue::as_int) > Some(26)
//!     }))
//!     .unwrap();
//! let column = sheet.named_column_at("name").unwrap();
//! assert_eq!(column["name"], vec![CellValue::from("Alice")]);
//! ```
//!
//! ## Loading and saving
//!
//! ```no_run
//! use gridbook_sheet::{Book, LoadOptions, SaveOptions, Sheet};
//!
//! let sheet = Sheet::load("data.csv", &LoadOptions::with_headers()).unwrap();
//! sheet.save_as("data.xlsx", &SaveOptions::default()).unwrap();
//!
//! let book = Book::load("report.xlsx", &LoadOptions::default()).unwrap();
//! assert!(book.number_of_sheets() > 0);
//! ```
//!
//! ## Working with books
//!
//! ```
//! use gridbook_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Data", Sheet::new()).unwrap();
//! book.add_sheet("Summary", Sheet::new()).unwrap();
//!
//! assert_eq!(book.number_of_sheets(), 2);
//! ```

mod a1_notation;
mod book;
mod cell;
mod chain;
mod codec;
pub mod cookbook;
mod error;
mod filter;
mod format;
mod iter;
mod matrix;
mod series;
mod sheet;
mod source;

pub use a1_notation::{parse_a1, parse_a1_range};
pub use book::Book;
pub use cell::{CellType, CellValue};
pub use chain::{FilterChain, FilterId, FilteredView, Stage};
pub use codec::{
    format_of, save_format, CodecRegistry, CsvCodec, CsvRowStream, Destination, JsonCodec,
    LoadOptions, Parser, Renderer, Rows, SaveOptions, SheetMap, Source,
};
#[cfg(not(target_arch = "wasm32"))]
pub use codec::{CalamineParser, XlsxRenderer};
pub use error::{Result, SheetError};
pub use filter::{Axis, IndexFilter};
pub use format::{convert, FormatFn, FormatTarget, Formatter, FormatterId};
pub use iter::{Cells, Columns, Direction, NamedColumns, NamedRows, Rows as RowIter};
pub use matrix::{Grid, Matrix};
pub use series::SeriesAxis;
pub use sheet::{Sheet, SheetEntry, SheetIter};
pub use source::{dict_to_rows, records_to_rows, QueryResult};
