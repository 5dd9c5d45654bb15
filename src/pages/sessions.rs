//! Sessions tab: WhatsApp device sessions across the fleet.

use crate::engine::{Column, RowStyleClass, SortValue, Sticky};
use crate::model::{SessionStatus, WaSession};
use crate::util::{display_opt, fmt_opt_ts};

use super::PageSpec;

/// Filter state for the sessions tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionFilter {
    /// Case-insensitive substring over device, customer, and phone.
    pub search: String,
    pub status: Option<SessionStatus>,
    /// Exact server id.
    pub server: Option<String>,
}

impl SessionFilter {
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(SessionStatus::Connected),
            Some(current) => {
                let all = SessionStatus::all();
                let pos = all.iter().position(|&s| s == current).unwrap_or(0);
                all.get(pos + 1).copied()
            }
        };
    }

    /// Steps the exact-server constraint through `ids` (the servers
    /// present in the current rows) and back to "all". A remembered id
    /// that is no longer listed also resets to "all".
    pub fn cycle_server(&mut self, ids: &[String]) {
        self.server = match &self.server {
            None => ids.first().cloned(),
            Some(current) => match ids.iter().position(|id| id == current) {
                Some(pos) => ids.get(pos + 1).cloned(),
                None => None,
            },
        };
    }
}

fn device_value(s: &WaSession) -> SortValue {
    SortValue::from_opt_text(&s.device_name)
}

fn customer_value(s: &WaSession) -> SortValue {
    SortValue::from_opt_text(&s.customer_name)
}

fn phone_value(s: &WaSession) -> SortValue {
    SortValue::from_opt_text(&s.phone)
}

fn status_value(s: &WaSession) -> SortValue {
    SortValue::Text(s.status.label().to_string())
}

fn server_value(s: &WaSession) -> SortValue {
    SortValue::from_opt_text(&s.server_id)
}

fn last_seen_value(s: &WaSession) -> SortValue {
    SortValue::from_opt_time(&s.last_seen)
}

fn render_device(s: &WaSession, _idx: usize) -> String {
    display_opt(&s.device_name)
}

fn render_last_seen(s: &WaSession, _idx: usize) -> String {
    fmt_opt_ts(&s.last_seen)
}

static COLUMNS: &[Column<WaSession>] = &[
    Column {
        header: "DEVICE",
        width: 18,
        sortable: true,
        sticky: Some(Sticky::Left),
        value: device_value,
        render: Some(render_device),
    },
    Column {
        header: "CUSTOMER",
        width: 22,
        sortable: true,
        sticky: None,
        value: customer_value,
        render: None,
    },
    Column {
        header: "PHONE",
        width: 15,
        sortable: false,
        sticky: None,
        value: phone_value,
        render: None,
    },
    Column {
        header: "STATUS",
        width: 13,
        sortable: true,
        sticky: None,
        value: status_value,
        render: None,
    },
    Column {
        header: "SERVER",
        width: 10,
        sortable: true,
        sticky: None,
        value: server_value,
        render: None,
    },
    Column {
        header: "LAST SEEN",
        width: 19,
        sortable: true,
        sticky: None,
        value: last_seen_value,
        render: Some(render_last_seen),
    },
];

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(needle))
}

pub struct SessionsPage;

impl PageSpec for SessionsPage {
    type Row = WaSession;
    type Filter = SessionFilter;

    const TITLE: &'static str = " Sessions (SES) ";
    const ENTITY: &'static str = "sessions";

    fn columns() -> &'static [Column<WaSession>] {
        COLUMNS
    }

    fn matches(row: &WaSession, filter: &SessionFilter) -> bool {
        let needle = filter.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || contains_ci(&row.device_name, &needle)
            || contains_ci(&row.customer_name, &needle)
            || contains_ci(&row.phone, &needle);
        let status_ok = filter.status.is_none_or(|s| row.status == s);
        let server_ok = filter
            .server
            .as_deref()
            .is_none_or(|srv| row.server_id.as_deref() == Some(srv));
        search_ok && status_ok && server_ok
    }

    fn row_id(row: &WaSession) -> String {
        row.id.clone()
    }

    fn row_style(row: &WaSession) -> RowStyleClass {
        match row.status {
            SessionStatus::Connected => RowStyleClass::Active,
            SessionStatus::Pairing => RowStyleClass::Accent,
            SessionStatus::Disconnected => RowStyleClass::Dimmed,
            SessionStatus::Banned => RowStyleClass::Critical,
        }
    }

    fn filter_summary(filter: &SessionFilter) -> String {
        let mut parts = Vec::new();
        if !filter.search.trim().is_empty() {
            parts.push(format!("search:{}", filter.search.trim()));
        }
        if let Some(s) = filter.status {
            parts.push(format!("status:{}", s.label()));
        }
        if let Some(srv) = &filter.server {
            parts.push(format!("server:{}", srv));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, device: Option<&str>, status: SessionStatus, server: Option<&str>) -> WaSession {
        WaSession {
            id: id.to_string(),
            customer_id: "cus-1".to_string(),
            customer_name: Some("Acme".to_string()),
            device_name: device.map(|s| s.to_string()),
            phone: Some("+62811".to_string()),
            status,
            server_id: server.map(|s| s.to_string()),
            last_seen: None,
        }
    }

    #[test]
    fn test_server_filter_is_exact() {
        let row = session("s1", Some("dev"), SessionStatus::Connected, Some("srv-1"));
        let mut filter = SessionFilter {
            server: Some("srv-1".to_string()),
            ..Default::default()
        };
        assert!(SessionsPage::matches(&row, &filter));

        filter.server = Some("srv".to_string());
        assert!(!SessionsPage::matches(&row, &filter));

        // A session with no server never matches a server constraint.
        let unassigned = session("s2", Some("dev"), SessionStatus::Pairing, None);
        assert!(!SessionsPage::matches(&unassigned, &filter));
    }

    #[test]
    fn test_cycle_server_walks_ids_and_wraps_to_all() {
        let ids = vec!["srv-1".to_string(), "srv-2".to_string()];
        let mut filter = SessionFilter::default();

        filter.cycle_server(&ids);
        assert_eq!(filter.server.as_deref(), Some("srv-1"));
        filter.cycle_server(&ids);
        assert_eq!(filter.server.as_deref(), Some("srv-2"));
        filter.cycle_server(&ids);
        assert_eq!(filter.server, None);

        // An id that left the fleet resets to "all".
        filter.server = Some("srv-gone".to_string());
        filter.cycle_server(&ids);
        assert_eq!(filter.server, None);
    }

    #[test]
    fn test_status_and_search_combined() {
        let row = session("s1", Some("warehouse-01"), SessionStatus::Connected, None);
        let filter = SessionFilter {
            search: "warehouse".to_string(),
            status: Some(SessionStatus::Connected),
            server: None,
        };
        assert!(SessionsPage::matches(&row, &filter));

        let filter = SessionFilter {
            status: Some(SessionStatus::Banned),
            ..filter
        };
        assert!(!SessionsPage::matches(&row, &filter));
    }

    #[test]
    fn test_banned_rows_are_critical() {
        let row = session("s1", None, SessionStatus::Banned, None);
        assert_eq!(SessionsPage::row_style(&row), RowStyleClass::Critical);
    }
}
