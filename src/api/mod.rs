//! REST API boundary.
//!
//! The TUI never talks HTTP directly; it holds an `Arc<dyn Api>` (live
//! [`HttpApi`] or the in-memory [`MockApi`] behind `--demo`) and the
//! fetch layer calls it from worker threads.

mod auth;
mod client;
pub mod mock;

pub use auth::{MemoryTokenStore, TokenStore};
pub use client::HttpApi;
pub use mock::MockApi;

use crate::model::{
    Customer, CustomerDraft, LogEntry, Server, ServerDraft, SessionDraft, WaSession,
};

/// Error types for API calls.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, timeout.
    Network(String),
    /// Non-2xx HTTP response.
    Http { status: u16, detail: String },
    /// Response body did not decode as the expected JSON shape.
    Decode(String),
    /// Missing or rejected bearer token (401/403).
    Auth(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Http { status, detail } => write!(f, "HTTP {}: {}", status, detail),
            ApiError::Decode(msg) => write!(f, "decode error: {}", msg),
            ApiError::Auth(msg) => write!(f, "auth error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Remote service operations the dashboard consumes.
///
/// List calls return the full row list for one entity; mutations
/// return an explicit success/failure result and never merge into
/// local state. The caller decides to refetch after a success.
///
/// Object-safe and `Send + Sync`: one `Arc<dyn Api>` is shared with
/// the fetch worker threads.
pub trait Api: Send + Sync {
    fn list_customers(&self) -> Result<Vec<Customer>, ApiError>;
    fn list_sessions(&self) -> Result<Vec<WaSession>, ApiError>;
    fn list_servers(&self) -> Result<Vec<Server>, ApiError>;
    fn list_logs(&self) -> Result<Vec<LogEntry>, ApiError>;

    fn create_customer(&self, draft: &CustomerDraft) -> Result<(), ApiError>;
    fn update_customer(&self, id: &str, draft: &CustomerDraft) -> Result<(), ApiError>;
    fn delete_customer(&self, id: &str) -> Result<(), ApiError>;

    fn create_session(&self, draft: &SessionDraft) -> Result<(), ApiError>;
    fn delete_session(&self, id: &str) -> Result<(), ApiError>;

    fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError>;
    fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError>;
    fn delete_server(&self, id: &str) -> Result<(), ApiError>;
    fn restart_server(&self, id: &str) -> Result<(), ApiError>;
}
