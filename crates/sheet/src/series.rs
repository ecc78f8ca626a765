//! Header promotion: one row (or column) becomes the names of the other axis.

use crate::cell::CellValue;
use crate::chain::{translate, ChainEntry, FilteredView, Stage};
use crate::filter::{Axis, IndexFilter};
use crate::matrix::Matrix;

/// Which axis receives names when a sheet becomes a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesAxis {
    /// A row holds the column names
    Columns,
    /// A column holds the row names
    Rows,
}

/// Chain group of a user filter under the given promotion.
///
/// Filters along the header row (or column) go first so the header index is
/// stable, the signature sits in between, everything else follows.
pub(crate) fn stage_for(series: Option<SeriesAxis>, axis: Axis) -> Stage {
    match (series, axis) {
        (Some(SeriesAxis::Rows), Axis::Row) => Stage::Leading,
        (Some(SeriesAxis::Rows), _) => Stage::Trailing,
        (_, Axis::Column) => Stage::Leading,
        _ => Stage::Trailing,
    }
}

/// The filter that hides the header row or column from the data view.
pub(crate) fn signature_filter(axis: SeriesAxis, index: usize) -> IndexFilter {
    match axis {
        SeriesAxis::Columns => IndexFilter::single_row(index),
        SeriesAxis::Rows => IndexFilter::single_column(index),
    }
}

/// Re-read the header cells through the chain.
///
/// Column names come from the header row translated through column
/// exclusions only; row exclusions never shift a column, so the header
/// ignores row selection entirely. Row names mirror this.
pub(crate) fn header_cells<M: Matrix + ?Sized>(
    base: &M,
    entries: &[ChainEntry],
    wanted: SeriesAxis,
) -> Option<Vec<CellValue>> {
    let signature = entries.iter().find(|e| e.stage == Stage::Signature)?;
    let axis = match signature.filter.axis() {
        Axis::Row => SeriesAxis::Columns,
        Axis::Column => SeriesAxis::Rows,
        Axis::Region => return None,
    };
    if axis != wanted {
        return None;
    }
    let index = signature.filter.single_index()?;

    let view = FilteredView::new(base, entries);
    let cells = match axis {
        SeriesAxis::Columns => view
            .column_range()
            .map(|c| {
                let (_, column) = translate(entries, 0, c);
                base.cell_value(index, column).unwrap_or_default()
            })
            .collect(),
        SeriesAxis::Rows => view
            .row_range()
            .map(|r| {
                let (row, _) = translate(entries, r, 0);
                base.cell_value(row, index).unwrap_or_default()
            })
            .collect(),
    };
    Some(cells)
}

/// Header cells as names
pub(crate) fn header_names<M: Matrix + ?Sized>(
    base: &M,
    entries: &[ChainEntry],
    wanted: SeriesAxis,
) -> Option<Vec<String>> {
    header_cells(base, entries, wanted).map(|cells| cells.iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::FilterChain;
    use crate::matrix::Grid;

    fn table() -> Grid {
        let header: Vec<CellValue> = vec!["X".into(), "Y".into(), "Z".into()];
        let mut rows = vec![header];
        rows.push(vec![1.into(), 2.into(), 3.into()]);
        rows.push(vec![4.into(), 5.into(), 6.into()]);
        Grid::from_rows(rows)
    }

    #[test]
    fn test_stage_assignment() {
        assert_eq!(stage_for(None, Axis::Column), Stage::Leading);
        assert_eq!(stage_for(None, Axis::Row), Stage::Trailing);
        assert_eq!(stage_for(Some(SeriesAxis::Columns), Axis::Region), Stage::Trailing);
        assert_eq!(stage_for(Some(SeriesAxis::Rows), Axis::Row), Stage::Leading);
        assert_eq!(stage_for(Some(SeriesAxis::Rows), Axis::Column), Stage::Trailing);
    }

    #[test]
    fn test_header_follows_column_filters_only() {
        let g: Grid = table();
        let mut chain = FilterChain::new();
        chain
            .add(Stage::Leading, IndexFilter::column_indices([1]), &g)
            .unwrap();
        chain
            .add(Stage::Signature, signature_filter(SeriesAxis::Columns, 0), &g)
            .unwrap();
        chain
            .add(Stage::Trailing, IndexFilter::row_indices([0]), &g)
            .unwrap();

        let view = chain.view(&g);
        assert_eq!(view.column_names(), Some(vec!["X".to_string(), "Z".to_string()]));
        assert_eq!(view.row_names(), None);
        assert_eq!(view.number_of_rows(), 1);
    }
}
