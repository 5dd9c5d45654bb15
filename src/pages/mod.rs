//! Per-entity page controllers.
//!
//! A controller owns one tab's row list and presentation state and
//! re-runs the filter -> sort -> paginate -> adapt pipeline
//! synchronously whenever any of them changes. Fetching happens
//! elsewhere; the app feeds results in via [`PageController::set_rows`] /
//! [`PageController::fail`].

pub mod customers;
pub mod logs;
pub mod servers;
pub mod sessions;

pub use customers::CustomersPage;
pub use logs::LogsPage;
pub use servers::ServersPage;
pub use sessions::SessionsPage;

use crate::engine::{
    Column, FilterMemo, Paginator, RowStyleClass, SortDescriptor, SortDirection, TableViewModel,
    build_view, sort_indices,
};

/// Fetch lifecycle of one tab: idle -> loading -> (ready | failed).
/// `Failed` is terminal until the user retries; there is no automatic
/// retry. A background refresh failure does not demote `Ready` data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Static description of one entity tab: row type, filter state,
/// predicate, and columns.
pub trait PageSpec {
    /// `'static` because the column list borrows the row type for the
    /// lifetime of the program.
    type Row: Clone + 'static;
    type Filter: Clone + PartialEq + Default;

    /// Table title, e.g. " Customers (CUS) ".
    const TITLE: &'static str;
    /// Lowercase entity word for file names and empty hints.
    const ENTITY: &'static str;

    fn columns() -> &'static [Column<Self::Row>];

    /// Page-supplied predicate. Default/inactive filter values mean
    /// "no constraint".
    fn matches(row: &Self::Row, filter: &Self::Filter) -> bool;

    fn row_id(row: &Self::Row) -> String;

    fn row_style(_row: &Self::Row) -> RowStyleClass {
        RowStyleClass::Normal
    }

    /// Footer summary of the active filters, empty when none.
    fn filter_summary(filter: &Self::Filter) -> String;
}

/// State and pipeline for one tab.
#[derive(Debug)]
pub struct PageController<S: PageSpec> {
    load: LoadState,
    rows: Vec<S::Row>,
    rows_gen: u64,
    pub filter: S::Filter,
    memo: FilterMemo<S::Filter>,
    pub sort: Option<SortDescriptor>,
    pub paginator: Paginator,
    /// Selected row offset within the visible page slice; clamped by
    /// `view_model`.
    pub selected: usize,
}

impl<S: PageSpec> PageController<S> {
    pub fn new(page_size: usize) -> Self {
        Self {
            load: LoadState::Idle,
            rows: Vec::new(),
            rows_gen: 0,
            filter: S::Filter::default(),
            memo: FilterMemo::new(),
            sort: None,
            paginator: Paginator::new(page_size),
            selected: 0,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn rows(&self) -> &[S::Row] {
        &self.rows
    }

    /// Marks the initial fetch as started. Already-fetched data stays
    /// visible during background refreshes.
    pub fn begin_loading(&mut self) {
        if self.load != LoadState::Ready {
            self.load = LoadState::Loading;
        }
    }

    /// Replaces the row list with a fresh fetch result.
    pub fn set_rows(&mut self, rows: Vec<S::Row>) {
        self.rows = rows;
        self.rows_gen += 1;
        self.load = LoadState::Ready;
    }

    /// Patches the row list in place (local optimistic updates) and
    /// invalidates the filter memo.
    pub fn with_rows_mut(&mut self, f: impl FnOnce(&mut Vec<S::Row>)) {
        f(&mut self.rows);
        self.rows_gen += 1;
    }

    /// Records a fetch failure. With data already on screen the rows
    /// are kept and only the status line reports the failure.
    pub fn fail(&mut self, message: String) {
        if self.load != LoadState::Ready {
            self.load = LoadState::Failed(message);
        }
    }

    /// Filtered and sorted row indices, memoized on (rows, filter).
    fn ordered(&mut self) -> Vec<usize> {
        let filtered = self
            .memo
            .get(&self.rows, self.rows_gen, &self.filter, S::matches)
            .to_vec();
        sort_indices(&self.rows, filtered, self.sort, |row, col| {
            (S::columns()[col].value)(row)
        })
    }

    /// Runs the full pipeline and returns the render-ready grid.
    pub fn view_model(&mut self) -> TableViewModel {
        let ordered = self.ordered();
        let view = self.paginator.view(ordered.len());
        let visible = view.end - view.start;
        self.selected = self.selected.min(visible.saturating_sub(1));

        let empty_hint = if self.rows.is_empty() {
            format!("No {} yet", S::ENTITY)
        } else {
            "No rows match the active filters".to_string()
        };

        build_view(
            S::TITLE,
            S::columns(),
            &self.rows,
            &ordered,
            view,
            self.sort,
            S::row_id,
            S::row_style,
            &empty_hint,
        )
    }

    /// Moves the active sort to the next sortable column, keeping the
    /// direction; starts descending when no sort is active.
    pub fn cycle_sort_column(&mut self) {
        let columns = S::columns();
        let sortable: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.sortable)
            .map(|(i, _)| i)
            .collect();
        if sortable.is_empty() {
            return;
        }
        let next = match self.sort {
            Some(desc) => {
                let pos = sortable.iter().position(|&i| i == desc.column);
                let next_pos = pos.map(|p| (p + 1) % sortable.len()).unwrap_or(0);
                SortDescriptor {
                    column: sortable[next_pos],
                    direction: desc.direction,
                }
            }
            None => SortDescriptor {
                column: sortable[0],
                direction: SortDirection::Descending,
            },
        };
        self.sort = Some(next);
    }

    /// Flips the active sort direction; no-op without an active sort.
    pub fn toggle_sort_direction(&mut self) {
        if let Some(desc) = self.sort {
            self.sort = Some(SortDescriptor {
                column: desc.column,
                direction: desc.direction.flip(),
            });
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Increments the selection; clamped to the page slice on the next
    /// `view_model`.
    pub fn select_down(&mut self) {
        self.selected = self.selected.saturating_add(1);
    }

    pub fn next_page(&mut self) {
        let len = self.ordered().len();
        self.paginator.next_page(len);
        self.selected = 0;
    }

    pub fn prev_page(&mut self) {
        self.paginator.prev_page();
        self.selected = 0;
    }

    pub fn first_page(&mut self) {
        self.paginator.first();
        self.selected = 0;
    }

    pub fn last_page(&mut self) {
        let len = self.ordered().len();
        self.paginator.last(len);
        self.selected = 0;
    }

    /// Clears all filters back to their defaults.
    pub fn clear_filters(&mut self) {
        self.filter = S::Filter::default();
        self.paginator.first();
    }

    /// The row currently under the cursor, if any.
    pub fn selected_row(&mut self) -> Option<S::Row> {
        let ordered = self.ordered();
        let view = self.paginator.view(ordered.len());
        let visible = view.end - view.start;
        if visible == 0 {
            return None;
        }
        let offset = self.selected.min(visible - 1);
        ordered
            .get(view.start + offset)
            .and_then(|&idx| self.rows.get(idx))
            .cloned()
    }

    /// Headers plus every filtered/sorted row rendered to strings,
    /// across all pages, for CSV export.
    pub fn export_data(&mut self) -> (Vec<String>, Vec<Vec<String>>) {
        let columns = S::columns();
        let headers = columns.iter().map(|c| c.header.to_string()).collect();
        let rows = self
            .ordered()
            .iter()
            .enumerate()
            .filter_map(|(pos, &idx)| self.rows.get(idx).map(|row| (pos, row)))
            .map(|(pos, row)| {
                columns
                    .iter()
                    .map(|col| match col.render {
                        Some(render) => render(row, pos),
                        None => (col.value)(row).display(),
                    })
                    .collect()
            })
            .collect();
        (headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SortValue;

    #[derive(Clone)]
    struct Row {
        id: u32,
        name: String,
    }

    #[derive(Clone, PartialEq, Default)]
    struct NameFilter {
        needle: String,
    }

    struct TestPage;

    fn id_value(row: &Row) -> SortValue {
        SortValue::Int(row.id as i64)
    }

    fn name_value(row: &Row) -> SortValue {
        SortValue::Text(row.name.clone())
    }

    static TEST_COLUMNS: &[Column<Row>] = &[
        Column {
            header: "ID",
            width: 6,
            sortable: true,
            sticky: None,
            value: id_value,
            render: None,
        },
        Column {
            header: "NAME",
            width: 12,
            sortable: true,
            sticky: None,
            value: name_value,
            render: None,
        },
    ];

    impl PageSpec for TestPage {
        type Row = Row;
        type Filter = NameFilter;
        const TITLE: &'static str = " Test ";
        const ENTITY: &'static str = "rows";

        fn columns() -> &'static [Column<Row>] {
            TEST_COLUMNS
        }

        fn matches(row: &Row, filter: &NameFilter) -> bool {
            filter.needle.is_empty() || row.name.contains(&filter.needle)
        }

        fn row_id(row: &Row) -> String {
            row.id.to_string()
        }

        fn filter_summary(filter: &NameFilter) -> String {
            filter.needle.clone()
        }
    }

    fn controller_with(n: u32) -> PageController<TestPage> {
        let mut c = PageController::new(25);
        c.set_rows(
            (0..n)
                .map(|i| Row {
                    id: i,
                    name: format!("row-{:03}", i),
                })
                .collect(),
        );
        c
    }

    #[test]
    fn test_pipeline_pages_57_rows() {
        let mut c = controller_with(57);
        let vm = c.view_model();
        assert_eq!(vm.total_pages, 3);
        assert_eq!(vm.rows.len(), 25);
        assert_eq!(vm.filtered_len, 57);

        c.last_page();
        let vm = c.view_model();
        assert_eq!(vm.page, 3);
        assert_eq!(vm.rows.len(), 7);
    }

    #[test]
    fn test_filter_resets_out_of_range_page() {
        let mut c = controller_with(120);
        c.last_page();
        assert_eq!(c.view_model().page, 5);

        // Narrow filter: 10 matches, page corrects to 1.
        c.filter.needle = "row-00".to_string();
        let vm = c.view_model();
        assert_eq!(vm.filtered_len, 10);
        assert_eq!(vm.total_pages, 1);
        assert_eq!(vm.page, 1);
    }

    #[test]
    fn test_loading_states() {
        let mut c: PageController<TestPage> = PageController::new(25);
        assert_eq!(*c.load_state(), LoadState::Idle);

        c.begin_loading();
        assert_eq!(*c.load_state(), LoadState::Loading);

        c.fail("boom".to_string());
        assert_eq!(*c.load_state(), LoadState::Failed("boom".to_string()));

        // Retry path: loading again, then data arrives.
        c.begin_loading();
        c.set_rows(vec![Row {
            id: 1,
            name: "one".into(),
        }]);
        assert_eq!(*c.load_state(), LoadState::Ready);

        // A failed background refresh does not demote ready data.
        c.fail("transient".to_string());
        assert_eq!(*c.load_state(), LoadState::Ready);
    }

    #[test]
    fn test_cycle_sort_and_flip() {
        let mut c = controller_with(3);
        assert!(c.sort.is_none());

        c.cycle_sort_column();
        let desc = c.sort.unwrap();
        assert_eq!(desc.column, 0);
        assert_eq!(desc.direction, SortDirection::Descending);

        c.toggle_sort_direction();
        assert_eq!(c.sort.unwrap().direction, SortDirection::Ascending);

        c.cycle_sort_column();
        let desc = c.sort.unwrap();
        assert_eq!(desc.column, 1);
        // Direction survives the column change.
        assert_eq!(desc.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_selected_row_follows_sort() {
        let mut c = controller_with(5);
        c.sort = Some(SortDescriptor {
            column: 0,
            direction: SortDirection::Descending,
        });
        let row = c.selected_row().unwrap();
        assert_eq!(row.id, 4);
    }

    #[test]
    fn test_export_covers_all_pages() {
        let mut c = controller_with(57);
        let (headers, rows) = c.export_data();
        assert_eq!(headers, vec!["ID", "NAME"]);
        assert_eq!(rows.len(), 57);
        assert_eq!(rows[0], vec!["0", "row-000"]);
    }

    #[test]
    fn test_selection_clamped_to_page_slice() {
        let mut c = controller_with(5);
        for _ in 0..20 {
            c.select_down();
        }
        c.view_model();
        assert_eq!(c.selected, 4);
    }
}
