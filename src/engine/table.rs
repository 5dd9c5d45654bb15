//! Tabular view adapter: column descriptors in, render-ready grid out.
//!
//! The view model carries no ratatui types; the TUI widget maps it to
//! framework widgets, a different frontend could map it elsewhere.

use super::paginate::PageView;
use super::sort::{SortDescriptor, SortValue};

/// Horizontal edge a column is pinned to while wide tables scroll.
/// Purely presentational; the data pipeline ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sticky {
    Left,
    Right,
}

/// Row-level style classification, mapped to colors by the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowStyleClass {
    #[default]
    Normal,
    /// Warning level (TUI: yellow).
    Warning,
    /// Critical level (TUI: red).
    Critical,
    /// Positive/active (TUI: green).
    Active,
    /// Dimmed (TUI: dark gray).
    Dimmed,
    /// Accent (TUI: cyan).
    Accent,
}

/// Static column configuration for one entity table.
///
/// `value` extracts the comparable key; without a custom `render` the
/// cell displays that key directly (`Null` renders as "-").
pub struct Column<T> {
    pub header: &'static str,
    pub width: u16,
    pub sortable: bool,
    pub sticky: Option<Sticky>,
    pub value: fn(&T) -> SortValue,
    pub render: Option<fn(&T, usize) -> String>,
}

/// One rendered row; `id` survives re-sorting for selection tracking.
#[derive(Debug, Clone)]
pub struct ViewRow {
    pub id: String,
    pub cells: Vec<String>,
    pub style: RowStyleClass,
}

/// Complete table ready to be rendered by any frontend.
#[derive(Debug, Clone)]
pub struct TableViewModel {
    pub title: String,
    pub headers: Vec<String>,
    pub widths: Vec<u16>,
    pub sticky: Vec<Option<Sticky>>,
    pub rows: Vec<ViewRow>,
    pub sort: Option<SortDescriptor>,
    pub page: usize,
    pub total_pages: usize,
    /// Rows after filtering, across all pages.
    pub filtered_len: usize,
    /// Shown instead of a silently blank body when the slice is empty.
    pub empty_hint: String,
}

/// Builds the view model for one page window.
///
/// `ordered` is the filtered+sorted index list; only `[view.start,
/// view.end)` of it is rendered. Headers get a direction indicator on
/// the active sort column.
pub fn build_view<T>(
    title: &str,
    columns: &[Column<T>],
    rows: &[T],
    ordered: &[usize],
    view: PageView,
    sort: Option<SortDescriptor>,
    row_id: impl Fn(&T) -> String,
    row_style: impl Fn(&T) -> RowStyleClass,
    empty_hint: &str,
) -> TableViewModel {
    let headers = columns
        .iter()
        .enumerate()
        .map(|(i, col)| match sort {
            Some(desc) if desc.column == i => {
                format!("{}{}", col.header, desc.direction.indicator())
            }
            _ => col.header.to_string(),
        })
        .collect();

    let slice = ordered.get(view.start..view.end).unwrap_or(&[]);
    let view_rows = slice
        .iter()
        .enumerate()
        .filter_map(|(offset, &idx)| rows.get(idx).map(|row| (offset, row)))
        .map(|(offset, row)| ViewRow {
            id: row_id(row),
            cells: columns
                .iter()
                .map(|col| match col.render {
                    Some(render) => render(row, view.start + offset),
                    None => (col.value)(row).display(),
                })
                .collect(),
            style: row_style(row),
        })
        .collect();

    TableViewModel {
        title: title.to_string(),
        headers,
        widths: columns.iter().map(|c| c.width).collect(),
        sticky: columns.iter().map(|c| c.sticky).collect(),
        rows: view_rows,
        sort,
        page: view.page,
        total_pages: view.total_pages,
        filtered_len: ordered.len(),
        empty_hint: empty_hint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::paginate::Paginator;
    use crate::engine::sort::SortDirection;

    #[derive(Clone)]
    struct Item {
        id: &'static str,
        name: Option<String>,
        count: i64,
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column {
                header: "NAME",
                width: 12,
                sortable: true,
                sticky: Some(Sticky::Left),
                value: |i| SortValue::from_opt_text(&i.name),
                render: None,
            },
            Column {
                header: "COUNT",
                width: 6,
                sortable: true,
                sticky: None,
                value: |i| SortValue::Int(i.count),
                render: Some(|i, _| format!("{}x", i.count)),
            },
        ]
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: "a",
                name: Some("Alpha One".into()),
                count: 3,
            },
            Item {
                id: "b",
                name: None,
                count: 7,
            },
        ]
    }

    #[test]
    fn test_default_cell_reads_value_and_null_renders_dash() {
        let rows = items();
        let cols = columns();
        let view = Paginator::new(25).view(rows.len());
        let vm = build_view(
            "Items",
            &cols,
            &rows,
            &[0, 1],
            view,
            None,
            |i| i.id.to_string(),
            |_| RowStyleClass::Normal,
            "no items",
        );
        assert_eq!(vm.rows.len(), 2);
        // The default cell shows the field as-is, case included.
        assert_eq!(vm.rows[0].cells, vec!["Alpha One", "3x"]);
        assert_eq!(vm.rows[1].cells[0], "-");
        // Custom renderer wins over the raw value.
        assert_eq!(vm.rows[1].cells[1], "7x");
    }

    #[test]
    fn test_sort_indicator_on_active_column_only() {
        let rows = items();
        let cols = columns();
        let view = Paginator::new(25).view(rows.len());
        let sort = Some(SortDescriptor {
            column: 1,
            direction: SortDirection::Ascending,
        });
        let vm = build_view(
            "Items",
            &cols,
            &rows,
            &[0, 1],
            view,
            sort,
            |i| i.id.to_string(),
            |_| RowStyleClass::Normal,
            "no items",
        );
        assert_eq!(vm.headers, vec!["NAME", "COUNT▲"]);
    }

    #[test]
    fn test_empty_slice_keeps_hint() {
        let rows: Vec<Item> = Vec::new();
        let cols = columns();
        let view = Paginator::new(25).view(0);
        let vm = build_view(
            "Items",
            &cols,
            &rows,
            &[],
            view,
            None,
            |i| i.id.to_string(),
            |_| RowStyleClass::Normal,
            "no items",
        );
        assert!(vm.rows.is_empty());
        assert_eq!(vm.empty_hint, "no items");
        assert_eq!(vm.total_pages, 0);
    }
}
