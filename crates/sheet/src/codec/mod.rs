//! Format codecs: parsers turn a source into named rows-of-rows, renderers
//! turn named rows-of-rows into a file or a byte buffer.

mod csv;
mod json;
mod options;
#[cfg(not(target_arch = "wasm32"))]
mod xlsx;

pub use self::csv::{CsvCodec, CsvRowStream};
pub use self::json::JsonCodec;
pub use self::options::{LoadOptions, SaveOptions};
#[cfg(not(target_arch = "wasm32"))]
pub use self::xlsx::{CalamineParser, XlsxRenderer};

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Rows of cells as exchanged with codecs.
pub type Rows = Vec<Vec<CellValue>>;

/// Sheet name to rows, in sheet order.
pub type SheetMap = IndexMap<String, Rows>;

/// Where parsed data comes from.
pub enum Source<'a> {
    /// A file; the format comes from its extension
    Path(&'a Path),
    /// An in-memory buffer tagged with a format
    Memory { format: &'a str, bytes: &'a [u8] },
    /// An already-open stream tagged with a format
    Reader {
        format: &'a str,
        reader: &'a mut dyn Read,
    },
}

impl Source<'_> {
    /// The normalized format tag of this source
    pub fn format(&self) -> Result<String> {
        match self {
            Source::Path(path) => format_of(path),
            Source::Memory { format, .. } | Source::Reader { format, .. } => {
                Ok(format.to_lowercase())
            }
        }
    }

    /// Default sheet name for single-sheet formats
    #[must_use]
    pub fn default_sheet_name(&self, fallback: &str) -> String {
        match self {
            Source::Path(path) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(fallback)
                .to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Read the whole source into memory
    pub fn read_bytes(self) -> Result<Vec<u8>> {
        match self {
            Source::Path(path) => Ok(std::fs::read(path)?),
            Source::Memory { bytes, .. } => Ok(bytes.to_vec()),
            Source::Reader { reader, .. } => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer)?;
                Ok(buffer)
            }
        }
    }
}

/// Where rendered data goes.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    Path(&'a Path),
    Memory,
}

/// Reads a source into named sheets.
pub trait Parser {
    fn parse(&self, source: Source<'_>, options: &LoadOptions) -> Result<SheetMap>;
}

/// Writes named sheets; returns the bytes for [`Destination::Memory`].
pub trait Renderer {
    fn render(
        &self,
        sheets: &SheetMap,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>>;
}

/// Format tag for saving to `path`: the explicit option, else the extension
pub fn save_format(path: &Path, options: &SaveOptions) -> Result<String> {
    match &options.format {
        Some(format) => Ok(format.to_lowercase()),
        None => format_of(path),
    }
}

/// Normalized (lowercase) format tag of a path, from its extension.
pub fn format_of(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| SheetError::UnsupportedFormat {
            format: path.display().to_string(),
        })
}

/// Codecs keyed by format tag.
pub struct CodecRegistry {
    parsers: HashMap<String, Box<dyn Parser>>,
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl CodecRegistry {
    /// A registry with no codecs
    #[must_use]
    pub fn empty() -> Self {
        CodecRegistry {
            parsers: HashMap::new(),
            renderers: HashMap::new(),
        }
    }

    /// Register (or replace) the parser for a format tag
    pub fn register_parser<P: Parser + 'static>(&mut self, format: &str, parser: P) {
        self.parsers.insert(format.to_lowercase(), Box::new(parser));
    }

    /// Register (or replace) the renderer for a format tag
    pub fn register_renderer<R: Renderer + 'static>(&mut self, format: &str, renderer: R) {
        self.renderers
            .insert(format.to_lowercase(), Box::new(renderer));
    }

    /// Format tags that can be read
    #[must_use]
    pub fn readable_formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }

    /// Format tags that can be written
    #[must_use]
    pub fn writable_formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }

    /// Parse a source with the codec registered for its format; an explicit
    /// [`LoadOptions::format`] wins over the source's own tag
    pub fn parse(&self, source: Source<'_>, options: &LoadOptions) -> Result<SheetMap> {
        let format = match &options.format {
            Some(format) => format.to_lowercase(),
            None => source.format()?,
        };
        let parser = self
            .parsers
            .get(&format)
            .ok_or_else(|| SheetError::UnsupportedFormat {
                format: format.clone(),
            })?;
        let sheets = parser.parse(source, options)?;
        debug!(format = %format, sheets = sheets.len(), "parsed source");
        Ok(sheets)
    }

    /// Render sheets with the codec registered for `format`
    pub fn render(
        &self,
        format: &str,
        sheets: &SheetMap,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        let format = format.to_lowercase();
        let renderer = self
            .renderers
            .get(&format)
            .ok_or_else(|| SheetError::UnsupportedFormat {
                format: format.clone(),
            })?;
        debug!(format = %format, sheets = sheets.len(), "rendering sheets");
        renderer.render(sheets, destination, options)
    }
}

impl Default for CodecRegistry {
    /// The built-in codecs: csv and tsv, json, and (outside wasm) xlsx,
    /// xlsm, xls and ods reading plus xlsx writing
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_parser("csv", CsvCodec::csv());
        registry.register_renderer("csv", CsvCodec::csv());
        registry.register_parser("tsv", CsvCodec::tsv());
        registry.register_renderer("tsv", CsvCodec::tsv());
        registry.register_parser("json", JsonCodec);
        registry.register_renderer("json", JsonCodec);
        #[cfg(not(target_arch = "wasm32"))]
        {
            for format in ["xlsx", "xlsm", "xls", "ods"] {
                registry.register_parser(format, CalamineParser);
            }
            registry.register_renderer("xlsx", XlsxRenderer);
        }
        registry
    }
}
