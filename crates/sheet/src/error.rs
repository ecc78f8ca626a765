use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Index out of bounds: row {row}, col {col} (sheet has {rows} rows, {cols} cols)")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Column index out of bounds: {index} (sheet has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Filter has not been validated against a sheet")]
    UnvalidatedFilter,

    #[error("Filter not found: #{id}")]
    FilterNotFound { id: u64 },

    #[error("Formatter not found: #{id}")]
    FormatterNotFound { id: u64 },

    #[error("Header not found: {name}")]
    HeaderNotFound { name: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unsupported format: '{format}'")]
    UnsupportedFormat { format: String },

    #[error("Invalid cell notation: {0}")]
    InvalidCellNotation(String),

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Columns not named: {0}")]
    ColumnsNotNamed(String),

    #[error("Rows not named. Call become_row_series_at() first")]
    RowsNotNamed,

    #[error("Refusing to overwrite existing output: {path}")]
    OutputExists { path: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
