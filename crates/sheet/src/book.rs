use crate::cell::CellValue;
use crate::codec::{save_format, CodecRegistry, Destination, LoadOptions, Rows, SaveOptions, Source};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// An ordered collection of uniquely named sheets.
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    // ===== Loading =====

    /// Load every sheet of a file; the book is named after the file stem
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut book = Self::load_with(&CodecRegistry::default(), Source::Path(path), options)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            book.set_name(stem);
        }
        Ok(book)
    }

    /// Load every sheet of an in-memory buffer of the given format
    pub fn load_from_memory(format: &str, bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        Self::load_with(
            &CodecRegistry::default(),
            Source::Memory { format, bytes },
            options,
        )
    }

    /// Load every sheet of a source through a codec registry.
    ///
    /// The naming options of `options` apply to each sheet.
    pub fn load_with(
        registry: &CodecRegistry,
        source: Source<'_>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let parsed = registry.parse(source, options)?;
        let mut book = Book::new();
        for (name, rows) in parsed {
            let sheet = Sheet::from_parsed(&name, rows, options)?;
            book.sheets.insert(name, sheet);
        }
        debug!(sheets = book.sheets.len(), "loaded book");
        Ok(book)
    }

    /// Create a book from a dictionary of sheet name -> 2D data.
    pub fn from_dict<T: Into<CellValue>>(sheets: IndexMap<String, Vec<Vec<T>>>) -> Result<Self> {
        let mut book = Book::new();
        for (name, data) in sheets {
            book.add_sheet(&name, Sheet::from_data(data))?;
        }
        Ok(book)
    }

    /// Create a book from sheets, keyed by their own names
    pub fn from_sheets<I: IntoIterator<Item = Sheet>>(sheets: I) -> Result<Self> {
        let mut book = Book::new();
        for sheet in sheets {
            let name = sheet.name().to_string();
            book.add_sheet(&name, sheet)?;
        }
        Ok(book)
    }

    // ===== Properties =====

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the book name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of sheets
    #[must_use]
    pub fn number_of_sheets(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book has no sheets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a sheet by position
    pub fn sheet_at(&self, index: usize) -> Result<&Sheet> {
        self.sheets
            .get_index(index)
            .map(|(_, sheet)| sheet)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: format!("#{index}"),
            })
    }

    // ===== Sheet Management =====

    /// Add a sheet under `name`; the sheet takes that name
    pub fn add_sheet(&mut self, name: &str, mut sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Remove a sheet by name
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .shift_remove(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Rename a sheet (preserves position in sheet order)
    pub fn rename_sheet(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if old_name == new_name {
            return self.sheet(old_name).map(|_| ());
        }
        if self.sheets.contains_key(new_name) {
            return Err(SheetError::SheetAlreadyExists {
                name: new_name.to_string(),
            });
        }
        let (index, _, mut sheet) =
            self.sheets
                .shift_remove_full(old_name)
                .ok_or_else(|| SheetError::SheetNotFound {
                    name: old_name.to_string(),
                })?;
        sheet.set_name(new_name);
        self.sheets.shift_insert(index, new_name.to_string(), sheet);
        Ok(())
    }

    // ===== Conversion =====

    /// Sheet name -> the visible table of each sheet (header included)
    #[must_use]
    pub fn to_dict(&self) -> IndexMap<String, Rows> {
        self.sheets
            .iter()
            .map(|(name, sheet)| (name.clone(), sheet.to_table()))
            .collect()
    }

    // ===== Persistence =====

    /// Save every sheet; the format follows the extension
    pub fn save_as<P: AsRef<Path>>(&self, path: P, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let format = save_format(path, options)?;
        self.save_with(&CodecRegistry::default(), &format, Destination::Path(path), options)?;
        Ok(())
    }

    /// Render every sheet into a buffer of the given format
    pub fn save_to_memory(&self, format: &str, options: &SaveOptions) -> Result<Vec<u8>> {
        self.save_with(&CodecRegistry::default(), format, Destination::Memory, options)?
            .ok_or_else(|| SheetError::Serialize(format!("{format} renderer returned no bytes")))
    }

    /// Render every sheet through a codec registry
    pub fn save_with(
        &self,
        registry: &CodecRegistry,
        format: &str,
        destination: Destination<'_>,
        options: &SaveOptions,
    ) -> Result<Option<Vec<u8>>> {
        registry.render(format, &self.to_dict(), destination, options)
    }

    // ===== Iteration =====

    /// Iterate over sheets
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over sheets mutably
    pub fn sheets_mut(&mut self) -> impl Iterator<Item = (&str, &mut Sheet)> {
        self.sheets.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    // ===== Merge =====

    /// Append `other`'s sheets. On a name collision the existing sheet
    /// becomes `<name>_left` and the incoming one `<name>_right`.
    fn absorb(&mut self, other: Book) {
        for (name, sheet) in other.sheets {
            self.absorb_sheet(name, sheet);
        }
    }

    fn absorb_sheet(&mut self, name: String, mut sheet: Sheet) {
        let final_name = if let Some(index) = self.sheets.get_index_of(&name) {
            let left = get_unique_name(self, &format!("{name}_left"));
            if let Some((_, mut existing)) = self.sheets.shift_remove_index(index) {
                existing.set_name(&left);
                self.sheets.shift_insert(index, left, existing);
            }
            get_unique_name(self, &format!("{name}_right"))
        } else {
            name
        };
        sheet.set_name(&final_name);
        self.sheets.insert(final_name, sheet);
    }
}

/// Generate a unique sheet name by appending _1, _2, etc.
fn get_unique_name(book: &Book, base_name: &str) -> String {
    if !book.has_sheet(base_name) {
        return base_name.to_string();
    }
    let mut suffix = 1;
    loop {
        let new_name = format!("{base_name}_{suffix}");
        if !book.has_sheet(&new_name) {
            return new_name;
        }
        suffix += 1;
    }
}

impl std::ops::Add for Book {
    type Output = Book;

    fn add(mut self, rhs: Book) -> Self::Output {
        self.absorb(rhs);
        self
    }
}

impl std::ops::Add<&Book> for &Book {
    type Output = Book;

    fn add(self, rhs: &Book) -> Self::Output {
        let mut out = self.clone();
        out.absorb(rhs.clone());
        out
    }
}

impl std::ops::Add<Sheet> for Book {
    type Output = Book;

    fn add(mut self, rhs: Sheet) -> Self::Output {
        let name = rhs.name().to_string();
        self.absorb_sheet(name, rhs);
        self
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Book {
    type Item = (String, Sheet);
    type IntoIter = indexmap::map::IntoIter<String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

impl<'a> IntoIterator for &'a Book {
    type Item = (&'a String, &'a Sheet);
    type IntoIter = indexmap::map::Iter<'a, String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::IndexFilter;

    fn two_sheet_book() -> Book {
        let mut input = IndexMap::new();
        input.insert("Sheet1".to_string(), vec![vec![1, 2], vec![3, 4]]);
        input.insert("Sheet2".to_string(), vec![vec![5, 6], vec![7, 8]]);
        Book::from_dict(input).unwrap()
    }

    #[test]
    fn test_new_book() {
        let book = Book::new();
        assert_eq!(book.name(), "Book1");
        assert!(book.is_empty());
        assert_eq!(book.number_of_sheets(), 0);
    }

    #[test]
    fn test_add_sheet() {
        let mut book = Book::new();
        book.add_sheet("Data", Sheet::from_data(vec![vec![1, 2], vec![3, 4]]))
            .unwrap();

        assert_eq!(book.number_of_sheets(), 1);
        assert_eq!(book.sheet("Data").unwrap().name(), "Data");
        assert!(matches!(
            book.add_sheet("Data", Sheet::new()),
            Err(SheetError::SheetAlreadyExists { .. })
        ));
    }

    #[test]
    fn test_sheet_lookup() {
        let book = two_sheet_book();
        assert_eq!(book.sheet_at(1).unwrap().name(), "Sheet2");
        assert!(matches!(
            book.sheet_at(2),
            Err(SheetError::SheetNotFound { name }) if name == "#2"
        ));
        assert!(matches!(
            book.sheet("Missing"),
            Err(SheetError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_sheet() {
        let mut book = two_sheet_book();
        let removed = book.remove_sheet("Sheet1").unwrap();

        assert_eq!(removed.get(1, 1).unwrap(), CellValue::Int(4));
        assert_eq!(book.sheet_names(), vec!["Sheet2"]);
        assert!(book.remove_sheet("Sheet1").is_err());
    }

    #[test]
    fn test_rename_sheet_keeps_position() {
        let mut book = two_sheet_book();
        book.rename_sheet("Sheet1", "First").unwrap();

        assert_eq!(book.sheet_names(), vec!["First", "Sheet2"]);
        assert_eq!(book.sheet("First").unwrap().name(), "First");
        assert!(matches!(
            book.rename_sheet("First", "Sheet2"),
            Err(SheetError::SheetAlreadyExists { .. })
        ));
        assert!(matches!(
            book.rename_sheet("Nope", "Other"),
            Err(SheetError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_from_sheets_rejects_duplicates() {
        let result = Book::from_sheets(vec![Sheet::with_name("a"), Sheet::with_name("a")]);
        assert!(matches!(result, Err(SheetError::SheetAlreadyExists { .. })));

        let book = Book::from_sheets(vec![Sheet::with_name("b"), Sheet::with_name("a")]).unwrap();
        assert_eq!(book.sheet_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_to_dict_uses_visible_table() {
        let mut book = two_sheet_book();
        book.sheet_mut("Sheet1")
            .unwrap()
            .add_filter(IndexFilter::single_row(0))
            .unwrap();

        let output = book.to_dict();
        assert_eq!(output["Sheet1"], vec![vec![CellValue::Int(3), CellValue::Int(4)]]);
        assert_eq!(output["Sheet2"].len(), 2);
    }

    #[test]
    fn test_add_renames_collisions() {
        let mut book2 = Book::new();
        book2.add_sheet("Sheet1", Sheet::new()).unwrap();
        book2.add_sheet("Other", Sheet::new()).unwrap();

        let merged = two_sheet_book() + book2;
        assert_eq!(
            merged.sheet_names(),
            vec!["Sheet1_left", "Sheet2", "Sheet1_right", "Other"]
        );
        assert_eq!(merged.sheet("Sheet1_left").unwrap().name(), "Sheet1_left");
        assert_eq!(
            merged.sheet("Sheet1_left").unwrap().get(0, 0).unwrap(),
            CellValue::Int(1)
        );
    }

    #[test]
    fn test_add_by_reference_and_sheet() {
        let left = two_sheet_book();
        let right = two_sheet_book();
        let merged = &left + &right;
        assert_eq!(merged.number_of_sheets(), 4);
        assert_eq!(left.number_of_sheets(), 2);

        let with_sheet = left + Sheet::with_name("Extra");
        assert_eq!(with_sheet.sheet_names(), vec!["Sheet1", "Sheet2", "Extra"]);
    }

    #[test]
    fn test_iteration_in_order() {
        let book = two_sheet_book();
        let names: Vec<&String> = (&book).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Sheet1", "Sheet2"]);
        let owned: Vec<String> = book.into_iter().map(|(name, _)| name).collect();
        assert_eq!(owned, vec!["Sheet1", "Sheet2"]);
    }

    #[test]
    fn test_json_memory_round_trip() {
        let book = two_sheet_book();
        let bytes = book.save_to_memory("json", &SaveOptions::default()).unwrap();
        let loaded = Book::load_from_memory("json", &bytes, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.to_dict(), book.to_dict());
    }

    #[test]
    fn test_load_applies_naming_to_every_sheet() {
        let bytes = br#"{"a": [["x"], [1]], "b": [["y"], [2]]}"#;
        let book = Book::load_from_memory("json", bytes, &LoadOptions::with_headers()).unwrap();
        assert_eq!(book.sheet("a").unwrap().series(), vec!["x"]);
        assert_eq!(book.sheet("b").unwrap().series(), vec!["y"]);
    }
}
