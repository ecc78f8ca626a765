/// Options for loading sheets and books
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Format tag that overrides the file extension
    pub format: Option<String>,
    /// Sheet to load by name (single-sheet loads)
    pub sheet_name: Option<String>,
    /// Sheet to load by position when no name is given (default: 0)
    pub sheet_index: usize,
    /// Field delimiter override for delimited text
    pub delimiter: Option<u8>,
    /// Quote character for delimited text (default: '"')
    pub quote: u8,
    /// Infer numbers, booleans and dates from text (default: true)
    pub infer_types: bool,
    /// Promote this row to column names after loading
    pub name_columns_by_row: Option<usize>,
    /// Promote this column to row names after loading
    pub name_rows_by_column: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            format: None,
            sheet_name: None,
            sheet_index: 0,
            delimiter: None,
            quote: b'"',
            infer_types: true,
            name_columns_by_row: None,
            name_rows_by_column: None,
        }
    }
}

impl LoadOptions {
    /// Treat the first row as column names
    #[must_use]
    pub fn with_headers() -> Self {
        LoadOptions {
            name_columns_by_row: Some(0),
            ..Default::default()
        }
    }

    /// Read with the codec for `format` whatever the extension says
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_lowercase());
        self
    }

    /// Select a sheet by name
    #[must_use]
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = Some(name.to_string());
        self
    }

    /// Select a sheet by position
    #[must_use]
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = index;
        self
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    /// Promote a row to column names
    #[must_use]
    pub fn with_column_names_from_row(mut self, row: usize) -> Self {
        self.name_columns_by_row = Some(row);
        self
    }

    /// Promote a column to row names
    #[must_use]
    pub fn with_row_names_from_column(mut self, column: usize) -> Self {
        self.name_rows_by_column = Some(column);
        self
    }
}

/// Options for saving sheets and books
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Format tag that overrides the file extension
    pub format: Option<String>,
    /// Field delimiter override for delimited text
    pub delimiter: Option<u8>,
    /// Quote character for delimited text (default: '"')
    pub quote: u8,
    /// Pretty-print structured text formats
    pub pretty: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            format: None,
            delimiter: None,
            quote: b'"',
            pretty: false,
        }
    }
}

impl SaveOptions {
    /// Write with the codec for `format` whatever the extension says
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_lowercase());
        self
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Pretty-print output where the format allows it
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}
