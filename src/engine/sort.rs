//! Sort engine: stable ordering of row indices by a column-extracted key.

use std::cmp::Ordering;

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator for the active sort column.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort: column index plus direction. `None` means no active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDescriptor {
    pub column: usize,
    pub direction: SortDirection,
}

/// Comparable key a column extracts from a row.
///
/// `Null` stands in for a missing field and compares as the empty
/// string: before any non-empty text under ascending order, and before
/// any numeric or time value. One consistent end, never a panic.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Null,
    Int(i64),
    Float(f64),
    Time(i64),
    Text(String),
}

impl SortValue {
    /// Keeps the original text: a default cell displays this value
    /// verbatim, and [`Self::compare`] folds case when ordering.
    pub fn from_opt_text(value: &Option<String>) -> Self {
        match value {
            Some(s) => SortValue::Text(s.clone()),
            None => SortValue::Null,
        }
    }

    pub fn from_opt_time(ts: &Option<chrono::DateTime<chrono::Utc>>) -> Self {
        match ts {
            Some(t) => SortValue::Time(t.timestamp()),
            None => SortValue::Null,
        }
    }

    /// Total order across keys. Text compares case-insensitively;
    /// columns are homogeneous in practice and a mismatched pair
    /// (other than `Null` vs anything) compares equal rather than
    /// panicking.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Null, SortValue::Null) => Ordering::Equal,
            (SortValue::Null, SortValue::Text(b)) => "".cmp(b.to_lowercase().as_str()),
            (SortValue::Text(a), SortValue::Null) => a.to_lowercase().as_str().cmp(""),
            (SortValue::Null, _) => Ordering::Less,
            (_, SortValue::Null) => Ordering::Greater,
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => Ordering::Equal,
        }
    }

    /// Default cell rendering when a column has no custom renderer.
    pub fn display(&self) -> String {
        match self {
            SortValue::Null => "-".to_string(),
            SortValue::Int(v) => v.to_string(),
            SortValue::Float(v) => format!("{:.1}", v),
            SortValue::Time(ts) => crate::util::fmt_ts_secs(*ts),
            SortValue::Text(s) => s.clone(),
        }
    }
}

/// Orders `candidates` (indices into `rows`) by the descriptor.
///
/// With no descriptor the input order is returned unchanged. The sort
/// is stable: equal keys keep their relative input order, so repeated
/// sorts with the same descriptor are idempotent.
pub fn sort_indices<T>(
    rows: &[T],
    mut candidates: Vec<usize>,
    descriptor: Option<SortDescriptor>,
    key: impl Fn(&T, usize) -> SortValue,
) -> Vec<usize> {
    let Some(desc) = descriptor else {
        return candidates;
    };
    candidates.sort_by(|&a, &b| {
        let ord = key(&rows[a], desc.column).compare(&key(&rows[b], desc.column));
        match desc.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    candidates
}

/// Sort-toggle: the same column flips direction, a new column starts
/// descending (largest/latest first).
pub fn toggle_sort(current: Option<SortDescriptor>, column: usize) -> SortDescriptor {
    match current {
        Some(desc) if desc.column == column => SortDescriptor {
            column,
            direction: desc.direction.flip(),
        },
        _ => SortDescriptor {
            column,
            direction: SortDirection::Descending,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<Option<String>> {
        vec![
            Some("Charlie".to_string()),
            Some("Alice".to_string()),
            None,
            Some("Bob".to_string()),
        ]
    }

    fn name_key(row: &Option<String>, _col: usize) -> SortValue {
        SortValue::from_opt_text(row)
    }

    #[test]
    fn test_no_descriptor_is_identity() {
        let rows = names();
        let out = sort_indices(&rows, vec![0, 1, 2, 3], None, name_key);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_null_sorts_as_empty_string_first_ascending() {
        let rows = names();
        let desc = SortDescriptor {
            column: 0,
            direction: SortDirection::Ascending,
        };
        let out = sort_indices(&rows, vec![0, 1, 2, 3], Some(desc), name_key);
        // null/"" first, then Alice, Bob, Charlie
        assert_eq!(out, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_descending_reverses() {
        let rows = names();
        let desc = SortDescriptor {
            column: 0,
            direction: SortDirection::Descending,
        };
        let out = sort_indices(&rows, vec![0, 1, 2, 3], Some(desc), name_key);
        assert_eq!(out, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let rows = names();
        let desc = Some(SortDescriptor {
            column: 0,
            direction: SortDirection::Ascending,
        });
        let once = sort_indices(&rows, vec![0, 1, 2, 3], desc, name_key);
        let twice = sort_indices(&rows, once.clone(), desc, name_key);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        let rows = vec![
            Some("banana".to_string()),
            Some("Apple".to_string()),
            Some("CHERRY".to_string()),
        ];
        let desc = Some(SortDescriptor {
            column: 0,
            direction: SortDirection::Ascending,
        });
        let out = sort_indices(&rows, vec![0, 1, 2], desc, name_key);
        assert_eq!(out, vec![1, 0, 2]);
    }

    #[test]
    fn test_from_opt_text_keeps_original_case() {
        assert_eq!(
            SortValue::from_opt_text(&Some("Acme Logistics".to_string())).display(),
            "Acme Logistics"
        );
    }

    #[test]
    fn test_stable_on_equal_keys() {
        let rows = vec![
            Some("same".to_string()),
            Some("same".to_string()),
            Some("same".to_string()),
        ];
        let desc = Some(SortDescriptor {
            column: 0,
            direction: SortDirection::Descending,
        });
        let out = sort_indices(&rows, vec![0, 1, 2], desc, name_key);
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Option<String>> = Vec::new();
        let desc = Some(SortDescriptor {
            column: 0,
            direction: SortDirection::Ascending,
        });
        let out = sort_indices(&rows, Vec::new(), desc, name_key);
        assert!(out.is_empty());
    }

    #[test]
    fn test_toggle_cycle() {
        // New column starts descending.
        let first = toggle_sort(None, 2);
        assert_eq!(first.column, 2);
        assert_eq!(first.direction, SortDirection::Descending);

        // Same column flips; twice returns to the original direction.
        let second = toggle_sort(Some(first), 2);
        assert_eq!(second.direction, SortDirection::Ascending);
        let third = toggle_sort(Some(second), 2);
        assert_eq!(third.direction, SortDirection::Descending);

        // Switching columns resets to descending.
        let other = toggle_sort(Some(second), 0);
        assert_eq!(other.column, 0);
        assert_eq!(other.direction, SortDirection::Descending);
    }

    #[test]
    fn test_numeric_and_time_keys() {
        let rows = vec![3i64, 1, 2];
        let key = |row: &i64, _col: usize| SortValue::Int(*row);
        let asc = SortDescriptor {
            column: 0,
            direction: SortDirection::Ascending,
        };
        assert_eq!(sort_indices(&rows, vec![0, 1, 2], Some(asc), key), vec![
            1, 2, 0
        ]);
    }
}
