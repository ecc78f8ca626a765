use gridbook_sheet::cookbook::{
    extract_a_sheet_from_a_book, merge_all_to_a_book, merge_csv_to_a_book, merge_files,
    merge_sheets, merge_two_files, merge_two_sheets, split_a_book, update_columns,
};
use gridbook_sheet::{Book, CellValue, LoadOptions, SaveOptions, Sheet, SheetError};
use indexmap::IndexMap;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

fn ints(values: &[i64]) -> Vec<CellValue> {
    values.iter().copied().map(CellValue::Int).collect()
}

fn two_sheet_book(path: &Path) {
    let mut book = Book::new();
    book.add_sheet("alpha", Sheet::from_data(vec![vec![1, 2], vec![3, 4]]))
        .unwrap();
    book.add_sheet("beta", Sheet::from_data(vec![vec![5, 6]]))
        .unwrap();
    book.save_as(path, &SaveOptions::default()).unwrap();
}

// ===== Update =====

#[test]
fn test_update_columns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    write(&input, "a,b\n1,2\n3,4\n");

    let columns = IndexMap::from([("b".to_string(), ints(&[20, 40, 60]))]);
    update_columns(&input, &columns, &output).unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "a,b\n1,20\n3,40\n,60\n"
    );
}

#[test]
fn test_update_unknown_column() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    write(&input, "a,b\n1,2\n");

    let columns = IndexMap::from([("c".to_string(), ints(&[1]))]);
    let result = update_columns(&input, &columns, dir.path().join("out.csv"));
    assert!(matches!(result, Err(SheetError::HeaderNotFound { name }) if name == "c"));
}

// ===== Merge =====

#[test]
fn test_merge_files_later_columns_win() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let output = dir.path().join("merged.csv");
    write(&first, "id,name\n1,a\n2,b\n3,c\n");
    write(&second, "name,score\nx,10\ny,20\n");

    merge_two_files(&first, &second, &output).unwrap();

    // rows stop at the shortest column
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "id,name,score\n1,x,10\n2,y,20\n"
    );
}

#[test]
fn test_merge_files_refuses_existing_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    write(&input, "a\n1\n");
    write(&output, "keep me");

    let result = merge_files(&[&input], &output);
    assert!(matches!(result, Err(SheetError::OutputExists { .. })));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_merge_sheets() {
    let dir = tempdir().unwrap();
    let mut left = Sheet::from_data(vec![
        vec![CellValue::from("a")],
        vec![CellValue::Int(1)],
    ]);
    left.become_series().unwrap();
    let mut right = Sheet::from_data(vec![
        vec![CellValue::from("b")],
        vec![CellValue::Int(2)],
    ]);
    right.become_series().unwrap();

    let output = dir.path().join("sheets.csv");
    merge_two_sheets(&left, &right, &output).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "a,b\n1,2\n");

    let again = merge_sheets(&[&left], &output);
    assert!(matches!(again, Err(SheetError::OutputExists { .. })));
}

#[test]
fn test_merge_csv_to_a_book() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("one.csv");
    let second = dir.path().join("two.csv");
    write(&first, "1,2\n");
    write(&second, "3\n");

    let output = dir.path().join("book.xlsx");
    merge_csv_to_a_book(&[&first, &second], &output).unwrap();

    let book = Book::load(&output, &LoadOptions::default()).unwrap();
    assert_eq!(book.sheet_names(), vec!["one.csv", "two.csv"]);
    assert_eq!(book.sheet("one.csv").unwrap().row(0).unwrap(), ints(&[1, 2]));
}

#[test]
fn test_merge_all_to_a_book() {
    let dir = tempdir().unwrap();
    let multi = dir.path().join("multi.xlsx");
    two_sheet_book(&multi);
    let single = dir.path().join("single.csv");
    write(&single, "9\n");
    let empty = dir.path().join("empty.csv");
    write(&empty, "");

    let output = dir.path().join("all.xlsx");
    merge_all_to_a_book(&[&multi, &single, &empty], &output).unwrap();

    let book = Book::load(&output, &LoadOptions::default()).unwrap();
    assert_eq!(
        book.sheet_names(),
        vec!["multi.xlsx_alpha", "multi.xlsx_beta", "single.csv"]
    );
}

// ===== Split / Extract =====

#[test]
fn test_split_a_book() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.xlsx");
    two_sheet_book(&input);

    let written = split_a_book(&input, dir.path().join("part.csv")).unwrap();
    assert_eq!(
        written,
        vec![dir.path().join("alpha_part.csv"), dir.path().join("beta_part.csv")]
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("beta_part.csv")).unwrap(),
        "5,6\n"
    );

    let again = split_a_book(&input, dir.path().join("part.csv"));
    assert!(matches!(again, Err(SheetError::OutputExists { .. })));
}

#[test]
fn test_extract_a_sheet_from_a_book() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("source.xlsx");
    two_sheet_book(&input);

    let target = extract_a_sheet_from_a_book(&input, "alpha", dir.path().join("only.csv")).unwrap();
    assert_eq!(target, dir.path().join("alpha_only.csv"));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "1,2\n3,4\n");

    let missing = extract_a_sheet_from_a_book(&input, "gamma", dir.path().join("only.csv"));
    assert!(matches!(missing, Err(SheetError::SheetNotFound { .. })));
}
