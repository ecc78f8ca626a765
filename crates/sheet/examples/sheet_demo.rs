//! Walk through filters, headers, formatting and file round trips.
//!
//! Run with: cargo run --example sheet_demo -p gridbook-sheet

use gridbook_sheet::{
    Book, CellType, CellValue, Direction, Formatter, IndexFilter, LoadOptions, Matrix,
    SaveOptions, Sheet,
};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sheet/Book Demo ===\n");

    let temp_dir = env::temp_dir();

    // =========================================================================
    // Filters
    // =========================================================================
    println!("--- Filters ---\n");

    let mut grid = Sheet::from_data(vec![
        vec![1, 2, 3, 4],
        vec![5, 6, 7, 8],
        vec![9, 10, 11, 12],
    ]);
    let columns = grid.add_filter(IndexFilter::column_indices([0, 2]))?;
    println!("Without columns 0 and 2: {:?}", grid.to_array());

    // "odd" counts from one: the first and third rows go
    grid.add_filter(IndexFilter::odd_rows())?;
    println!("...and without odd rows: {:?}", grid.to_array());

    grid.remove_filter(columns)?;
    println!("Column filter removed:   {:?}", grid.to_array());
    grid.clear_filters()?;

    for direction in [Direction::Htlbr, Direction::Vbrtl, Direction::Htrbl] {
        let flat: Vec<String> = grid
            .to_flat_array(direction)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{direction:?}: {}", flat.join(" "));
    }

    // =========================================================================
    // Headers and named access
    // =========================================================================
    println!("\n--- Headers ---\n");

    let mut people = Sheet::from_data(vec![
        vec![CellValue::from("Name"), "Age".into(), "City".into()],
        vec![CellValue::from("Alice"), CellValue::Int(30), "NYC".into()],
        vec![CellValue::from("Bob"), CellValue::Int(25), "LA".into()],
        vec![CellValue::from("Charlie"), CellValue::Int(35), "Chicago".into()],
    ]);
    people.set_name("people");
    people.become_series()?;
    println!("Columns: {:?}", people.series());
    println!("Ages: {:?}", people.named_column_at("Age")?);

    people.add_filter(IndexFilter::named_row_values(|record| {
        record.get("Age").and_then(CellValue::as_int) > Some(26)
    }))?;
    println!("Older than 26: {:?}", people.to_records()?);

    people.add_formatter(Formatter::named_columns(["Age"], CellType::Float))?;
    println!("Ages as floats: {:?}", people.column(1)?);

    // =========================================================================
    // Files
    // =========================================================================
    println!("\n--- Files ---\n");

    let csv_path = temp_dir.join("gridbook_demo_people.csv");
    people.save_as(&csv_path, &SaveOptions::default())?;
    println!("Saved to {}", csv_path.display());
    println!("{}", std::fs::read_to_string(&csv_path)?);

    let loaded = Sheet::load(&csv_path, &LoadOptions::with_headers())?;
    println!("Reloaded '{}' with columns {:?}", loaded.name(), loaded.series());

    let mut book = Book::new();
    book.add_sheet("grid", grid)?;
    book.add_sheet("people", loaded)?;

    let xlsx_path = temp_dir.join("gridbook_demo.xlsx");
    book.save_as(&xlsx_path, &SaveOptions::default())?;
    let reloaded = Book::load(&xlsx_path, &LoadOptions::default())?;
    println!("Workbook sheets: {:?}", reloaded.sheet_names());

    let json = reloaded.save_to_memory("json", &SaveOptions::default().pretty())?;
    println!("As JSON:\n{}", String::from_utf8(json)?);

    std::fs::remove_file(&csv_path)?;
    std::fs::remove_file(&xlsx_path)?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
