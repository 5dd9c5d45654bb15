//! Customers tab: organizations subscribed to the automation service.

use crate::engine::{Column, RowStyleClass, SortValue, Sticky};
use crate::model::{Customer, CustomerStatus, Plan};
use crate::util::{display_opt, fmt_opt_ts};

use super::PageSpec;

/// Filter state for the customers tab. Defaults mean no constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring over name, email, and phone.
    pub search: String,
    pub status: Option<CustomerStatus>,
    pub plan: Option<Plan>,
}

impl CustomerFilter {
    /// Cycles the status constraint: all -> active -> suspended ->
    /// expired -> all.
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(CustomerStatus::Active),
            Some(current) => {
                let all = CustomerStatus::all();
                let pos = all.iter().position(|&s| s == current).unwrap_or(0);
                all.get(pos + 1).copied()
            }
        };
    }

    /// Cycles the plan constraint the same way.
    pub fn cycle_plan(&mut self) {
        self.plan = match self.plan {
            None => Some(Plan::Trial),
            Some(current) => {
                let all = Plan::all();
                let pos = all.iter().position(|&p| p == current).unwrap_or(0);
                all.get(pos + 1).copied()
            }
        };
    }
}

fn name_value(c: &Customer) -> SortValue {
    SortValue::from_opt_text(&c.name)
}

fn email_value(c: &Customer) -> SortValue {
    SortValue::from_opt_text(&c.email)
}

fn phone_value(c: &Customer) -> SortValue {
    SortValue::from_opt_text(&c.phone)
}

fn plan_value(c: &Customer) -> SortValue {
    SortValue::Text(c.plan.label().to_string())
}

fn status_value(c: &Customer) -> SortValue {
    SortValue::Text(c.status.label().to_string())
}

fn sessions_value(c: &Customer) -> SortValue {
    SortValue::Int(c.session_count as i64)
}

fn created_value(c: &Customer) -> SortValue {
    SortValue::from_opt_time(&c.created_at)
}

fn render_name(c: &Customer, _idx: usize) -> String {
    display_opt(&c.name)
}

fn render_sessions(c: &Customer, _idx: usize) -> String {
    format!("{}/{}", c.session_count, c.session_limit)
}

fn render_created(c: &Customer, _idx: usize) -> String {
    fmt_opt_ts(&c.created_at)
}

static COLUMNS: &[Column<Customer>] = &[
    Column {
        header: "NAME",
        width: 22,
        sortable: true,
        sticky: Some(Sticky::Left),
        value: name_value,
        render: Some(render_name),
    },
    Column {
        header: "EMAIL",
        width: 26,
        sortable: true,
        sticky: None,
        value: email_value,
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
        header: "PLAN",
        width: 10,
        sortable: true,
        sticky: None,
        value: plan_value,
        render: None,
    },
    Column {
        header: "STATUS",
        width: 10,
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
        header: "CREATED",
        width: 19,
        sortable: true,
        sticky: None,
        value: created_value,
        render: Some(render_created),
    },
];

fn contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(needle))
}

pub struct CustomersPage;

impl PageSpec for CustomersPage {
    type Row = Customer;
    type Filter = CustomerFilter;

    const TITLE: &'static str = " Customers (CUS) ";
    const ENTITY: &'static str = "customers";

    fn columns() -> &'static [Column<Customer>] {
        COLUMNS
    }

    fn matches(row: &Customer, filter: &CustomerFilter) -> bool {
        let needle = filter.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || contains_ci(&row.name, &needle)
            || contains_ci(&row.email, &needle)
            || contains_ci(&row.phone, &needle);
        let status_ok = filter.status.is_none_or(|s| row.status == s);
        let plan_ok = filter.plan.is_none_or(|p| row.plan == p);
        search_ok && status_ok && plan_ok
    }

    fn row_id(row: &Customer) -> String {
        row.id.clone()
    }

    fn row_style(row: &Customer) -> RowStyleClass {
        match row.status {
            CustomerStatus::Active => RowStyleClass::Normal,
            CustomerStatus::Suspended => RowStyleClass::Warning,
            CustomerStatus::Expired => RowStyleClass::Dimmed,
        }
    }

    fn filter_summary(filter: &CustomerFilter) -> String {
        let mut parts = Vec::new();
        if !filter.search.trim().is_empty() {
            parts.push(format!("search:{}", filter.search.trim()));
        }
        if let Some(s) = filter.status {
            parts.push(format!("status:{}", s.label()));
        }
        if let Some(p) = filter.plan {
            parts.push(format!("plan:{}", p.label()));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, name: Option<&str>, status: CustomerStatus, plan: Plan) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.map(|s| s.to_string()),
            email: Some(format!("{}@example.com", id)),
            phone: None,
            plan,
            status,
            session_limit: 10,
            session_count: 1,
            created_at: None,
        }
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = CustomerFilter::default();
        let row = customer("c1", None, CustomerStatus::Expired, Plan::Trial);
        assert!(CustomersPage::matches(&row, &filter));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let row = customer("c1", Some("Acme Logistics"), CustomerStatus::Active, Plan::Pro);
        let filter = CustomerFilter {
            search: "ACME".to_string(),
            ..Default::default()
        };
        assert!(CustomersPage::matches(&row, &filter));

        // Email matches too.
        let filter = CustomerFilter {
            search: "c1@example".to_string(),
            ..Default::default()
        };
        assert!(CustomersPage::matches(&row, &filter));

        let filter = CustomerFilter {
            search: "zzz".to_string(),
            ..Default::default()
        };
        assert!(!CustomersPage::matches(&row, &filter));
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let row = customer("c1", Some("Acme"), CustomerStatus::Active, Plan::Pro);
        let filter = CustomerFilter {
            search: "acme".to_string(),
            status: Some(CustomerStatus::Active),
            plan: Some(Plan::Basic),
        };
        // Search and status pass, plan fails: AND fails.
        assert!(!CustomersPage::matches(&row, &filter));
    }

    #[test]
    fn test_cycle_status_wraps_to_all() {
        let mut filter = CustomerFilter::default();
        filter.cycle_status();
        assert_eq!(filter.status, Some(CustomerStatus::Active));
        filter.cycle_status();
        filter.cycle_status();
        assert_eq!(filter.status, Some(CustomerStatus::Expired));
        filter.cycle_status();
        assert_eq!(filter.status, None);
    }

    #[test]
    fn test_null_name_searches_false_but_renders_dash() {
        let row = customer("c1", None, CustomerStatus::Active, Plan::Pro);
        let filter = CustomerFilter {
            search: "anything".to_string(),
            ..Default::default()
        };
        assert!(!CustomersPage::matches(&row, &filter));
        assert_eq!(render_name(&row, 0), "-");
    }
}
