use gridbook_sheet::{CellValue, Direction, Grid, IndexFilter, Matrix, Sheet, SheetEntry};
use proptest::prelude::*;

/// A `rows x cols` sheet whose cell (r, c) holds `r * cols + c`
fn numbered(rows: usize, cols: usize) -> Sheet {
    let data: Vec<Vec<i64>> = (0..rows)
        .map(|r| (0..cols).map(|c| (r * cols + c) as i64).collect())
        .collect();
    Sheet::from_data(data)
}

fn sorted_ints(values: Vec<CellValue>) -> Vec<i64> {
    let mut ints: Vec<i64> = values.iter().filter_map(CellValue::as_int).collect();
    ints.sort_unstable();
    ints
}

proptest! {
    #[test]
    fn prop_every_direction_visits_each_cell_once(rows in 1usize..7, cols in 1usize..7) {
        let sheet = numbered(rows, cols);
        let expected: Vec<i64> = (0..(rows * cols) as i64).collect();
        for direction in Direction::ALL {
            let cells = sheet.to_flat_array(direction);
            prop_assert_eq!(cells.len(), rows * cols);
            prop_assert_eq!(sorted_ints(cells), expected.clone());
        }
    }

    #[test]
    fn prop_directions_agree_through_filters(
        rows in 1usize..7,
        cols in 1usize..7,
        hidden_rows in proptest::collection::vec(0usize..7, 0..4),
        hidden_cols in proptest::collection::vec(0usize..7, 0..4),
    ) {
        let mut sheet = numbered(rows, cols);
        sheet.add_filter(IndexFilter::row_indices(hidden_rows)).unwrap();
        sheet.add_filter(IndexFilter::column_indices(hidden_cols)).unwrap();

        let total = sheet.row_count() * sheet.col_count();
        let reference = sorted_ints(sheet.to_flat_array(Direction::Htlbr));
        prop_assert_eq!(reference.len(), total);
        for direction in Direction::ALL {
            prop_assert_eq!(sorted_ints(sheet.to_flat_array(direction)), reference.clone());
        }
    }

    #[test]
    fn prop_empty_chain_is_identity(
        data in proptest::collection::vec(proptest::collection::vec(-50i64..50, 1..6), 0..6)
    ) {
        let grid = Grid::from_rows(data.clone());
        let sheet = Sheet::from_data(data);
        prop_assert_eq!(sheet.row_count(), grid.height());
        prop_assert_eq!(sheet.col_count(), grid.width());
        for r in 0..grid.height() {
            for c in 0..grid.width() {
                prop_assert_eq!(Some(sheet.get(r, c).unwrap()), grid.get(r, c).cloned());
            }
        }
    }
}

#[test]
fn test_named_orders_on_small_grid() {
    let sheet = numbered(2, 3);
    let ints = |values: &[i64]| -> Vec<CellValue> {
        values.iter().copied().map(CellValue::Int).collect()
    };
    assert_eq!(sheet.enumerate().collect::<Vec<_>>(), ints(&[0, 1, 2, 3, 4, 5]));
    assert_eq!(sheet.reverse().collect::<Vec<_>>(), ints(&[5, 4, 3, 2, 1, 0]));
    assert_eq!(sheet.vertical().collect::<Vec<_>>(), ints(&[0, 3, 1, 4, 2, 5]));
    assert_eq!(sheet.rvertical().collect::<Vec<_>>(), ints(&[5, 2, 4, 1, 3, 0]));
    assert_eq!(sheet.to_flat_array(Direction::Htrbl), ints(&[2, 1, 0, 5, 4, 3]));
    assert_eq!(sheet.to_flat_array(Direction::Vtrbl), ints(&[2, 5, 1, 4, 0, 3]));
    assert_eq!(sheet.to_flat_array(Direction::Vbltr), ints(&[3, 0, 4, 1, 5, 2]));
    assert_eq!(sheet.to_flat_array(Direction::Hbltr), ints(&[3, 4, 5, 0, 1, 2]));
}

#[test]
fn test_vector_iterators_follow_filters() {
    let mut sheet = numbered(3, 3);
    sheet.add_filter(IndexFilter::single_column(1)).unwrap();

    let rows: Vec<Vec<CellValue>> = sheet.rrows().collect();
    assert_eq!(rows[0], vec![CellValue::Int(6), CellValue::Int(8)]);
    let columns: Vec<Vec<CellValue>> = sheet.rcolumns().collect();
    assert_eq!(
        columns[0],
        vec![CellValue::Int(2), CellValue::Int(5), CellValue::Int(8)]
    );
}

#[test]
fn test_iterators_are_single_pass() {
    let sheet = numbered(2, 2);
    let mut cells = sheet.cells(Direction::Vbrtl);
    assert_eq!(cells.by_ref().count(), 4);
    assert_eq!(cells.next(), None);

    let mut rows = sheet.rows();
    assert_eq!(rows.by_ref().count(), 2);
    assert!(rows.next().is_none());
}

#[test]
fn test_default_iteration_of_series_yields_named_columns() {
    let mut sheet = Sheet::from_data(vec![
        vec![CellValue::from("a"), CellValue::from("b")],
        vec![CellValue::Int(1), CellValue::Int(2)],
    ]);
    sheet.become_series().unwrap();

    let entries: Vec<SheetEntry> = sheet.iter().collect();
    assert_eq!(entries.len(), 2);
    match &entries[1] {
        SheetEntry::Named(column) => assert_eq!(column["b"], vec![CellValue::Int(2)]),
        SheetEntry::Row(_) => panic!("expected a named column"),
    }
}
