//! Typed records for the four managed entities.
//!
//! The API returns loosely-shaped JSON; everything the service may omit
//! is modeled as an `Option` and displayed as "-" rather than failing
//! deserialization or panicking at render time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription plan of a customer organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Trial,
    Basic,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn all() -> &'static [Plan] {
        &[Plan::Trial, Plan::Basic, Plan::Pro, Plan::Enterprise]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Plan::Trial => "trial",
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Plan> {
        Plan::all().iter().copied().find(|p| p.label() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Suspended,
    Expired,
}

impl CustomerStatus {
    pub fn all() -> &'static [CustomerStatus] {
        &[
            CustomerStatus::Active,
            CustomerStatus::Suspended,
            CustomerStatus::Expired,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Suspended => "suspended",
            CustomerStatus::Expired => "expired",
        }
    }
}

/// Customer organization owning WhatsApp device sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub session_limit: u32,
    #[serde(default)]
    pub session_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Mutation body for creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub plan: Plan,
    pub session_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Connected,
    Pairing,
    #[default]
    Disconnected,
    Banned,
}

impl SessionStatus {
    pub fn all() -> &'static [SessionStatus] {
        &[
            SessionStatus::Connected,
            SessionStatus::Pairing,
            SessionStatus::Disconnected,
            SessionStatus::Banned,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Connected => "connected",
            SessionStatus::Pairing => "pairing",
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Banned => "banned",
        }
    }
}

/// One WhatsApp device session bound to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaSession {
    pub id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub device_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    pub server_id: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Mutation body for registering a new device session (starts pairing).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionDraft {
    pub customer_id: String,
    pub device_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Degraded,
    Restarting,
    #[default]
    Offline,
}

impl ServerStatus {
    pub fn all() -> &'static [ServerStatus] {
        &[
            ServerStatus::Online,
            ServerStatus::Degraded,
            ServerStatus::Restarting,
            ServerStatus::Offline,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Degraded => "degraded",
            ServerStatus::Restarting => "restarting",
            ServerStatus::Offline => "offline",
        }
    }
}

/// Backend server hosting device sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub session_count: u32,
    #[serde(default)]
    pub capacity: u32,
    pub cpu_pct: Option<f64>,
    pub mem_pct: Option<f64>,
}

/// Mutation body for creating or updating a server record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ServerDraft {
    pub name: String,
    pub address: String,
    pub region: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// One system log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: LogLevel,
    pub source: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_tolerates_missing_fields() {
        let json = r#"{"id": "c1"}"#;
        let c: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, "c1");
        assert!(c.name.is_none());
        assert_eq!(c.status, CustomerStatus::Active);
        assert_eq!(c.session_limit, 0);
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        let s: SessionStatus = serde_json::from_str("\"pairing\"").unwrap();
        assert_eq!(s, SessionStatus::Pairing);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"pairing\"");
    }

    #[test]
    fn test_plan_parse() {
        assert_eq!(Plan::parse("pro"), Some(Plan::Pro));
        assert_eq!(Plan::parse("gold"), None);
    }

    #[test]
    fn test_log_entry_timestamp_optional() {
        let json = r#"{"id": "l1", "level": "error", "message": "boom"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.timestamp.is_none());
    }
}
