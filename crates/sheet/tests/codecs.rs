use gridbook_sheet::{
    Book, CellType, CellValue, CodecRegistry, CsvRowStream, Destination, Formatter, IndexFilter,
    LoadOptions, Matrix, Parser, Result, SaveOptions, Sheet, SheetError, SheetMap, Source,
};
use indexmap::IndexMap;
use std::io::Cursor;
use tempfile::tempdir;

fn people() -> Sheet {
    let mut sheet = Sheet::from_data(vec![
        vec![CellValue::from("name"), "age".into(), "score".into()],
        vec![CellValue::from("Alice"), CellValue::Int(30), CellValue::Float(9.5)],
        vec![CellValue::from("Bob"), CellValue::Int(25), CellValue::Float(7.5)],
        vec![CellValue::from("Carol"), CellValue::Int(41), CellValue::Float(8.25)],
    ]);
    sheet.set_name("people");
    sheet
}

// ===== CSV =====

#[test]
fn test_csv_file_round_trip_with_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.csv");
    people().save_as(&path, &SaveOptions::default()).unwrap();

    let loaded = Sheet::load(&path, &LoadOptions::with_headers()).unwrap();
    assert_eq!(loaded.name(), "people");
    assert_eq!(loaded.series(), vec!["name", "age", "score"]);
    assert_eq!(loaded.row_count(), 3);
    assert_eq!(loaded.get(1, 2).unwrap(), CellValue::Float(7.5));
}

#[test]
fn test_csv_saves_filtered_and_formatted_view() {
    let mut sheet = people();
    sheet.become_series().unwrap();
    sheet
        .add_filter(IndexFilter::named_row_values(|record| {
            record.get("age").and_then(CellValue::as_int) >= Some(30)
        }))
        .unwrap();
    sheet.add_filter(IndexFilter::single_column(2)).unwrap();
    sheet
        .add_formatter(Formatter::named_columns(["age"], CellType::String))
        .unwrap();

    let bytes = sheet.save_to_memory("csv", &SaveOptions::default()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "name,age\nAlice,30\nCarol,41\n"
    );
}

#[test]
fn test_tsv_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("people.tsv");
    people().save_as(&path, &SaveOptions::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("name\tage\tscore\n"));
    let loaded = Sheet::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.col_count(), 3);
}

#[test]
fn test_csv_without_inference_keeps_text() {
    let options = LoadOptions::default().with_type_inference(false);
    let sheet = Sheet::load_from_memory("csv", b"007,1.50\n", &options).unwrap();
    assert_eq!(sheet.get(0, 0).unwrap(), CellValue::from("007"));
    assert_eq!(sheet.get(0, 1).unwrap(), CellValue::from("1.50"));
}

#[test]
fn test_row_names_from_column() {
    let options = LoadOptions::default().with_row_names_from_column(0);
    let sheet = Sheet::load_from_memory("csv", b"a,1,2\nb,3,4\n", &options).unwrap();
    assert_eq!(sheet.series(), vec!["a", "b"]);
    assert_eq!(
        sheet.named_row_at("b").unwrap()["b"],
        vec![CellValue::Int(3), CellValue::Int(4)]
    );
}

#[test]
fn test_book_to_csv_writes_one_file_per_sheet() {
    let dir = tempdir().unwrap();
    let mut book = Book::new();
    book.add_sheet("first", Sheet::from_data(vec![vec![1]])).unwrap();
    book.add_sheet("second", Sheet::from_data(vec![vec![2]])).unwrap();

    book.save_as(dir.path().join("out.csv"), &SaveOptions::default())
        .unwrap();
    assert!(dir.path().join("out__first__0.csv").exists());
    assert!(dir.path().join("out__second__1.csv").exists());
}

#[test]
fn test_row_stream_closes_on_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream.csv");
    std::fs::write(&path, "a,b\n1,2\n3,4\n").unwrap();

    let rows: Vec<Vec<CellValue>> = CsvRowStream::open(&path, &LoadOptions::default())
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], vec![CellValue::Int(3), CellValue::Int(4)]);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        CsvRowStream::open(&path, &LoadOptions::default()),
        Err(SheetError::Io(_))
    ));
}

// ===== JSON =====

#[test]
fn test_json_records_load_as_series() {
    let bytes = br#"[{"city": "Oslo", "temp": -3}, {"city": "Rome", "temp": 14}]"#;
    let sheet = Sheet::load_from_memory("json", bytes, &LoadOptions::with_headers()).unwrap();

    let records = sheet.to_records().unwrap();
    assert_eq!(records[1]["city"], CellValue::from("Rome"));
    assert_eq!(records[0]["temp"], CellValue::Int(-3));
}

#[test]
fn test_json_book_pretty_round_trip() {
    let mut input = IndexMap::new();
    input.insert("b".to_string(), vec![vec![1, 2]]);
    input.insert("a".to_string(), vec![vec![3, 4]]);
    let book = Book::from_dict(input).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("book.json");
    book.save_as(&path, &SaveOptions::default().pretty()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let loaded = Book::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.name(), "book");
    assert_eq!(loaded.sheet_names(), vec!["b", "a"]);
    assert_eq!(loaded.to_dict(), book.to_dict());
}

// ===== Spreadsheets =====

#[test]
fn test_xlsx_book_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.xlsx");

    let mut book = Book::new();
    book.add_sheet("people", people()).unwrap();
    book.add_sheet("empty", Sheet::new()).unwrap();
    book.save_as(&path, &SaveOptions::default()).unwrap();

    let loaded = Book::load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.sheet_names(), vec!["people", "empty"]);
    assert_eq!(loaded.sheet("people").unwrap().to_array(), people().to_array());
    assert!(loaded.sheet("empty").unwrap().is_empty());
}

#[test]
fn test_xlsx_select_sheet() {
    let mut book = Book::new();
    book.add_sheet("one", Sheet::from_data(vec![vec![1]])).unwrap();
    book.add_sheet("two", Sheet::from_data(vec![vec![2]])).unwrap();
    let bytes = book.save_to_memory("xlsx", &SaveOptions::default()).unwrap();

    let by_name = Sheet::load_from_memory(
        "xlsx",
        &bytes,
        &LoadOptions::default().with_sheet_name("two"),
    )
    .unwrap();
    assert_eq!(by_name.name(), "two");

    let by_index = Sheet::load_from_memory(
        "xlsx",
        &bytes,
        &LoadOptions::default().with_sheet_index(1),
    )
    .unwrap();
    assert_eq!(by_index.get(0, 0).unwrap(), CellValue::Int(2));

    let missing = Sheet::load_from_memory(
        "xlsx",
        &bytes,
        &LoadOptions::default().with_sheet_name("three"),
    );
    assert!(matches!(missing, Err(SheetError::SheetNotFound { .. })));
}

// ===== Registry =====

#[test]
fn test_unknown_formats() {
    assert!(matches!(
        people().save_to_memory("bogus", &SaveOptions::default()),
        Err(SheetError::UnsupportedFormat { format }) if format == "bogus"
    ));
    assert!(matches!(
        Sheet::load("no_extension", &LoadOptions::default()),
        Err(SheetError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        Sheet::load_from_memory("xls", b"", &LoadOptions::default()),
        Err(SheetError::Parse(_))
    ));
}

#[test]
fn test_format_tag_is_case_insensitive() {
    let sheet = Sheet::load_from_memory("CSV", b"1,2\n", &LoadOptions::default()).unwrap();
    assert_eq!(sheet.col_count(), 2);
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("people.txt");
    people()
        .save_as(&text, &SaveOptions::default().with_format("csv"))
        .unwrap();
    assert!(std::fs::read_to_string(&text).unwrap().starts_with("name,age,score\n"));

    assert!(matches!(
        Sheet::load(&text, &LoadOptions::default()),
        Err(SheetError::UnsupportedFormat { format }) if format == "txt"
    ));
    let loaded = Sheet::load(&text, &LoadOptions::with_headers().with_format("CSV")).unwrap();
    assert_eq!(loaded.series(), vec!["name", "age", "score"]);

    let binary = dir.path().join("people.bin");
    people()
        .save_as(&binary, &SaveOptions::default().with_format("xlsx"))
        .unwrap();
    let loaded = Sheet::load(&binary, &LoadOptions::default().with_format("xlsx")).unwrap();
    assert_eq!(loaded.to_array(), people().to_array());
}

struct Constant;

impl Parser for Constant {
    fn parse(&self, _source: Source<'_>, _options: &LoadOptions) -> Result<SheetMap> {
        Ok(IndexMap::from([(
            "constant".to_string(),
            vec![vec![CellValue::from("k"), CellValue::Int(7)]],
        )]))
    }
}

#[test]
fn test_custom_parser_from_reader() {
    let mut registry = CodecRegistry::default();
    registry.register_parser("const", Constant);
    assert!(registry.readable_formats().contains(&"const"));

    let mut reader = Cursor::new(Vec::<u8>::new());
    let sheet = Sheet::load_with(
        &registry,
        Source::Reader {
            format: "const",
            reader: &mut reader,
        },
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(sheet.name(), "constant");
    assert_eq!(sheet.get(0, 1).unwrap(), CellValue::Int(7));
}

#[test]
fn test_csv_reader_source() {
    let mut reader = Cursor::new(b"x,y\n1,2\n".to_vec());
    let sheet = Sheet::load_with(
        &CodecRegistry::default(),
        Source::Reader {
            format: "csv",
            reader: &mut reader,
        },
        &LoadOptions::with_headers(),
    )
    .unwrap();
    assert_eq!(sheet.series(), vec!["x", "y"]);
    assert_eq!(sheet.name(), "csv");
}

#[test]
fn test_save_with_registry_to_memory() {
    let registry = CodecRegistry::default();
    let bytes = people()
        .save_with(&registry, "json", Destination::Memory, &SaveOptions::default())
        .unwrap()
        .unwrap();
    assert!(String::from_utf8(bytes).unwrap().starts_with(r#"{"people":[["name""#));
}
