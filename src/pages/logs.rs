//! Logs tab: system log tail, read-only.

use chrono::{DateTime, Utc};

use crate::engine::{Column, RowStyleClass, SortValue, Sticky};
use crate::model::{LogEntry, LogLevel};
use crate::util::fmt_opt_ts;

use super::PageSpec;

/// Filter state for the logs tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogFilter {
    /// Case-insensitive substring over source and message.
    pub search: String,
    pub level: Option<LogLevel>,
    /// Inclusive time bounds; unset means unbounded. An entry without
    /// a timestamp only passes when both bounds are unset.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn cycle_level(&mut self) {
        self.level = match self.level {
            None => Some(LogLevel::Debug),
            Some(current) => {
                let all = LogLevel::all();
                let pos = all.iter().position(|&l| l == current).unwrap_or(0);
                all.get(pos + 1).copied()
            }
        };
    }
}

fn timestamp_value(e: &LogEntry) -> SortValue {
    SortValue::from_opt_time(&e.timestamp)
}

fn level_value(e: &LogEntry) -> SortValue {
    SortValue::Int(e.level as i64)
}

fn source_value(e: &LogEntry) -> SortValue {
    SortValue::from_opt_text(&e.source)
}

fn message_value(e: &LogEntry) -> SortValue {
    SortValue::from_opt_text(&e.message)
}

fn render_timestamp(e: &LogEntry, _idx: usize) -> String {
    fmt_opt_ts(&e.timestamp)
}

fn render_level(e: &LogEntry, _idx: usize) -> String {
    e.level.label().to_uppercase()
}

static COLUMNS: &[Column<LogEntry>] = &[
    Column {
        header: "TIME",
        width: 19,
        sortable: true,
        sticky: Some(Sticky::Left),
        value: timestamp_value,
        render: Some(render_timestamp),
    },
    Column {
        header: "LEVEL",
        width: 8,
        sortable: true,
        sticky: None,
        value: level_value,
        render: Some(render_level),
    },
    Column {
        header: "SOURCE",
        width: 12,
        sortable: true,
        sticky: None,
        value: source_value,
        render: None,
    },
    Column {
        header: "MESSAGE",
        width: 60,
        sortable: false,
        sticky: None,
        value: message_value,
        render: None,
    },
];

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(needle))
}

pub struct LogsPage;

impl PageSpec for LogsPage {
    type Row = LogEntry;
    type Filter = LogFilter;

    const TITLE: &'static str = " Logs (LOG) ";
    const ENTITY: &'static str = "logs";

    fn columns() -> &'static [Column<LogEntry>] {
        COLUMNS
    }

    fn matches(row: &LogEntry, filter: &LogFilter) -> bool {
        let needle = filter.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || contains_ci(&row.source, &needle)
            || contains_ci(&row.message, &needle);
        let level_ok = filter.level.is_none_or(|l| row.level == l);
        let range_ok = match row.timestamp {
            Some(ts) => {
                filter.from.is_none_or(|from| ts >= from) && filter.to.is_none_or(|to| ts <= to)
            }
            None => filter.from.is_none() && filter.to.is_none(),
        };
        search_ok && level_ok && range_ok
    }

    fn row_id(row: &LogEntry) -> String {
        row.id.clone()
    }

    fn row_style(row: &LogEntry) -> RowStyleClass {
        match row.level {
            LogLevel::Debug => RowStyleClass::Dimmed,
            LogLevel::Info => RowStyleClass::Normal,
            LogLevel::Warning => RowStyleClass::Warning,
            LogLevel::Error => RowStyleClass::Critical,
        }
    }

    fn filter_summary(filter: &LogFilter) -> String {
        let mut parts = Vec::new();
        if !filter.search.trim().is_empty() {
            parts.push(format!("search:{}", filter.search.trim()));
        }
        if let Some(l) = filter.level {
            parts.push(format!("level:{}", l.label()));
        }
        match (filter.from, filter.to) {
            (Some(from), Some(to)) => parts.push(format!(
                "time:{}..{}",
                from.format("%m-%d %H:%M"),
                to.format("%m-%d %H:%M")
            )),
            (Some(from), None) => parts.push(format!("time:{}..", from.format("%m-%d %H:%M"))),
            (None, Some(to)) => parts.push(format!("time:..{}", to.format("%m-%d %H:%M"))),
            (None, None) => {}
        }
        parts.join(" ")
    }
}
