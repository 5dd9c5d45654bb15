//! Generic client-side list-processing engines.
//!
//! Every tab runs the same synchronous pipeline over its in-memory row
//! list: filter -> sort -> paginate -> table view model. The engines are
//! entity-agnostic; page controllers supply the predicate, the column
//! definitions, and the key extractors.

pub mod filter;
pub mod paginate;
pub mod sort;
pub mod table;

pub use filter::{FilterMemo, filter_indices};
pub use paginate::{PAGE_SIZES, PageView, Paginator};
pub use sort::{SortDescriptor, SortDirection, SortValue, sort_indices, toggle_sort};
pub use table::{Column, RowStyleClass, Sticky, TableViewModel, ViewRow, build_view};
