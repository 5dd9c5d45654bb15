//! Filter engine: order-preserving predicate reduction with memoization.

/// Returns the indices of rows matching the predicate, in input order.
///
/// The predicate is page-supplied; an inactive filter value (empty
/// search string, "all" status, unset bound) must already mean "no
/// constraint" inside the predicate.
pub fn filter_indices<T, F>(
    rows: &[T],
    state: &F,
    predicate: impl Fn(&T, &F) -> bool,
) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| predicate(row, state))
        .map(|(i, _)| i)
        .collect()
}

/// Memoized filter result, keyed on row-list generation and
/// filter-state equality.
///
/// The row list itself is never mutated in place; controllers bump a
/// generation counter when a fresh fetch replaces it. Re-running with
/// the same generation and an equal filter state returns the cached
/// index list without re-evaluating the predicate.
#[derive(Debug, Default)]
pub struct FilterMemo<F> {
    rows_gen: u64,
    state: Option<F>,
    cached: Vec<usize>,
}

impl<F: Clone + PartialEq> FilterMemo<F> {
    pub fn new() -> Self {
        Self {
            rows_gen: 0,
            state: None,
            cached: Vec::new(),
        }
    }

    pub fn get<T>(
        &mut self,
        rows: &[T],
        rows_gen: u64,
        state: &F,
        predicate: impl Fn(&T, &F) -> bool,
    ) -> &[usize] {
        let fresh = self.state.as_ref() == Some(state) && self.rows_gen == rows_gen;
        if !fresh {
            self.cached = filter_indices(rows, state, predicate);
            self.rows_gen = rows_gen;
            self.state = Some(state.clone());
        }
        &self.cached
    }
}
