//! Servers tab: backend machines hosting device sessions.

use crate::engine::{Column, RowStyleClass, SortValue, Sticky};
use crate::model::{Server, ServerStatus};
use crate::util::display_opt;

use super::PageSpec;

/// Filter state for the servers tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerFilter {
    /// Case-insensitive substring over name, address, and region.
    pub search: String,
    pub status: Option<ServerStatus>,
}

impl ServerFilter {
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(ServerStatus::Online),
            Some(current) => {
                let all = ServerStatus::all();
                let pos = all.iter().position(|&s| s == current).unwrap_or(0);
                all.get(pos + 1).copied()
            }
        };
    }
}

fn name_value(s: &Server) -> SortValue {
    SortValue::from_opt_text(&s.name)
}

fn address_value(s: &Server) -> SortValue {
    SortValue::from_opt_text(&s.address)
}

fn region_value(s: &Server) -> SortValue {
    SortValue::from_opt_text(&s.region)
}

fn status_value(s: &Server) -> SortValue {
    SortValue::Text(s.status.label().to_string())
}

fn sessions_value(s: &Server) -> SortValue {
    SortValue::Int(s.session_count as i64)
}

fn cpu_value(s: &Server) -> SortValue {
    match s.cpu_pct {
        Some(v) => SortValue::Float(v),
        None => SortValue::Null,
    }
}

fn mem_value(s: &Server) -> SortValue {
    match s.mem_pct {
        Some(v) => SortValue::Float(v),
        None => SortValue::Null,
    }
}

fn render_name(s: &Server, _idx: usize) -> String {
    display_opt(&s.name)
}

fn render_sessions(s: &Server, _idx: usize) -> String {
    format!("{}/{}", s.session_count, s.capacity)
}

fn render_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "-".to_string(),
    }
}

fn render_cpu(s: &Server, _idx: usize) -> String {
    render_pct(s.cpu_pct)
}

fn render_mem(s: &Server, _idx: usize) -> String {
    render_pct(s.mem_pct)
}

static COLUMNS: &[Column<Server>] = &[
    Column {
        header: "NAME",
        width: 16,
        sortable: true,
        sticky: Some(Sticky::Left),
        value: name_value,
        render: Some(render_name),
    },
    Column {
        header: "ADDRESS",
        width: 20,
        sortable: false,
        sticky: None,
        value: address_value,
        render: None,
    },
    Column {
        header: "REGION",
        width: 14,
        sortable: true,
        sticky: None,
        value: region_value,
        render: None,
    },
    Column {
        header: "STATUS",
        width: 11,
        sortable: true,
        sticky: None,
        value: status_value,
        render: None,
    },
    Column {
        header: "SESSIONS",
        width: 9,
        sortable: true,
        sticky: None,
        value: sessions_value,
        render: Some(render_sessions),
    },
    Column {
        header: "CPU%",
        width: 7,
        sortable: true,
        sticky: None,
        value: cpu_value,
        render: Some(render_cpu),
    },
    Column {
        header: "MEM%",
        width: 7,
        sortable: true,
        sticky: None,
        value: mem_value,
        render: Some(render_mem),
    },
];

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(needle))
}

pub struct ServersPage;

impl PageSpec for ServersPage {
    type Row = Server;
    type Filter = ServerFilter;

    const TITLE: &'static str = " Servers (SRV) ";
    const ENTITY: &'static str = "servers";

    fn columns() -> &'static [Column<Server>] {
        COLUMNS
    }

    fn matches(row: &Server, filter: &ServerFilter) -> bool {
        let needle = filter.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || contains_ci(&row.name, &needle)
            || contains_ci(&row.address, &needle)
            || contains_ci(&row.region, &needle);
        let status_ok = filter.status.is_none_or(|s| row.status == s);
        search_ok && status_ok
    }

    fn row_id(row: &Server) -> String {
        row.id.clone()
    }

    fn row_style(row: &Server) -> RowStyleClass {
        match row.status {
            ServerStatus::Online => RowStyleClass::Active,
            ServerStatus::Degraded => RowStyleClass::Warning,
            ServerStatus::Restarting => RowStyleClass::Accent,
            ServerStatus::Offline => RowStyleClass::Critical,
        }
    }

    fn filter_summary(filter: &ServerFilter) -> String {
        let mut parts = Vec::new();
        if !filter.search.trim().is_empty() {
            parts.push(format!("search:{}", filter.search.trim()));
        }
        if let Some(s) = filter.status {
            parts.push(format!("status:{}", s.label()));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(id: &str, name: &str, region: &str, status: ServerStatus) -> Server {
        Server {
            id: id.to_string(),
            name: Some(name.to_string()),
            address: Some("10.0.0.1:3000".to_string()),
            region: Some(region.to_string()),
            status,
            session_count: 4,
            capacity: 64,
            cpu_pct: Some(12.0),
            mem_pct: None,
        }
    }

    #[test]
    fn test_region_search() {
        let row = server("srv-1", "wa-core-01", "ap-southeast", ServerStatus::Online);
        let filter = ServerFilter {
            search: "southeast".to_string(),
            status: None,
        };
        assert!(ServersPage::matches(&row, &filter));
    }

    #[test]
    fn test_status_constraint() {
        let row = server("srv-1", "wa-core-01", "eu", ServerStatus::Degraded);
        let filter = ServerFilter {
            search: String::new(),
            status: Some(ServerStatus::Online),
        };
        assert!(!ServersPage::matches(&row, &filter));
    }

    #[test]
    fn test_missing_mem_renders_dash_and_sorts_null() {
        let row = server("srv-1", "wa-core-01", "eu", ServerStatus::Online);
        assert_eq!(render_mem(&row, 0), "-");
        assert_eq!(mem_value(&row), SortValue::Null);
    }
}
