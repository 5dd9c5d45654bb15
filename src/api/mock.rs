//! In-memory API with a fixture fleet.
//!
//! Backs `--demo` mode and the tests; mutations operate on the local
//! dataset so the mutate-then-refetch flow is observable offline.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};

use super::{Api, ApiError};
use crate::model::{
    Customer, CustomerDraft, CustomerStatus, LogEntry, LogLevel, Plan, Server, ServerDraft,
    ServerStatus, SessionDraft, SessionStatus, WaSession,
};

#[derive(Default)]
struct MockData {
    customers: Vec<Customer>,
    sessions: Vec<WaSession>,
    servers: Vec<Server>,
    logs: Vec<LogEntry>,
}

/// Mock API over a mutable in-memory dataset.
pub struct MockApi {
    data: Mutex<MockData>,
    next_id: AtomicU64,
    /// Injected error for the next call; used by tests.
    fail_next: Mutex<Option<ApiError>>,
}

impl MockApi {
    /// Empty dataset.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(MockData::default()),
            next_id: AtomicU64::new(1),
            fail_next: Mutex::new(None),
        }
    }

    /// A small but representative fleet: customers on every plan,
    /// sessions in every state, a degraded server, and a log tail with
    /// missing fields sprinkled in.
    pub fn typical_fleet() -> Self {
        let now = Utc::now();
        let mock = Self::new();
        {
            let mut data = mock.data.lock().expect("mock data lock");
            data.customers = vec![
                Customer {
                    id: "cus-1".into(),
                    name: Some("Acme Logistics".into()),
                    email: Some("ops@acme.example".into()),
                    phone: Some("+62811000001".into()),
                    plan: Plan::Enterprise,
                    status: CustomerStatus::Active,
                    session_limit: 50,
                    session_count: 3,
                    created_at: Some(now - Duration::days(220)),
                },
                Customer {
                    id: "cus-2".into(),
                    name: Some("Borneo Retail".into()),
                    email: Some("admin@borneo.example".into()),
                    phone: None,
                    plan: Plan::Pro,
                    status: CustomerStatus::Active,
                    session_limit: 10,
                    session_count: 2,
                    created_at: Some(now - Duration::days(90)),
                },
                Customer {
                    id: "cus-3".into(),
                    name: None,
                    email: Some("trial@unknown.example".into()),
                    phone: Some("+62811000003".into()),
                    plan: Plan::Trial,
                    status: CustomerStatus::Expired,
                    session_limit: 1,
                    session_count: 0,
                    created_at: None,
                },
                Customer {
                    id: "cus-4".into(),
                    name: Some("Celebes Media".into()),
                    email: None,
                    phone: None,
                    plan: Plan::Basic,
                    status: CustomerStatus::Suspended,
                    session_limit: 3,
                    session_count: 1,
                    created_at: Some(now - Duration::days(30)),
                },
            ];
            data.sessions = vec![
                WaSession {
                    id: "ses-1".into(),
                    customer_id: "cus-1".into(),
                    customer_name: Some("Acme Logistics".into()),
                    device_name: Some("warehouse-01".into()),
                    phone: Some("+62811000001".into()),
                    status: SessionStatus::Connected,
                    server_id: Some("srv-1".into()),
                    last_seen: Some(now - Duration::seconds(12)),
                },
                WaSession {
                    id: "ses-2".into(),
                    customer_id: "cus-1".into(),
                    customer_name: Some("Acme Logistics".into()),
                    device_name: Some("warehouse-02".into()),
                    phone: None,
                    status: SessionStatus::Pairing,
                    server_id: Some("srv-1".into()),
                    last_seen: None,
                },
                WaSession {
                    id: "ses-3".into(),
                    customer_id: "cus-2".into(),
                    customer_name: Some("Borneo Retail".into()),
                    device_name: None,
                    phone: Some("+62812000002".into()),
                    status: SessionStatus::Disconnected,
                    server_id: Some("srv-2".into()),
                    last_seen: Some(now - Duration::hours(6)),
                },
                WaSession {
                    id: "ses-4".into(),
                    customer_id: "cus-4".into(),
                    customer_name: Some("Celebes Media".into()),
                    device_name: Some("storefront".into()),
                    phone: Some("+62813000004".into()),
                    status: SessionStatus::Banned,
                    server_id: None,
                    last_seen: Some(now - Duration::days(3)),
                },
            ];
            data.servers = vec![
                Server {
                    id: "srv-1".into(),
                    name: Some("wa-core-01".into()),
                    address: Some("10.0.1.11:3000".into()),
                    region: Some("ap-southeast".into()),
                    status: ServerStatus::Online,
                    session_count: 2,
                    capacity: 64,
                    cpu_pct: Some(31.5),
                    mem_pct: Some(58.2),
                },
                Server {
                    id: "srv-2".into(),
                    name: Some("wa-core-02".into()),
                    address: Some("10.0.1.12:3000".into()),
                    region: Some("ap-southeast".into()),
                    status: ServerStatus::Degraded,
                    session_count: 1,
                    capacity: 64,
                    cpu_pct: Some(88.0),
                    mem_pct: Some(91.4),
                },
                Server {
                    id: "srv-3".into(),
                    name: Some("wa-edge-01".into()),
                    address: None,
                    region: Some("eu-central".into()),
                    status: ServerStatus::Offline,
                    session_count: 0,
                    capacity: 32,
                    cpu_pct: None,
                    mem_pct: None,
                },
            ];
            data.logs = vec![
                LogEntry {
                    id: "log-1".into(),
                    timestamp: Some(now - Duration::minutes(1)),
                    level: LogLevel::Info,
                    source: Some("srv-1".into()),
                    message: Some("session ses-1 delivered 42 messages".into()),
                },
                LogEntry {
                    id: "log-2".into(),
                    timestamp: Some(now - Duration::minutes(8)),
                    level: LogLevel::Warning,
                    source: Some("srv-2".into()),
                    message: Some("high memory pressure, throttling sends".into()),
                },
                LogEntry {
                    id: "log-3".into(),
                    timestamp: Some(now - Duration::hours(2)),
                    level: LogLevel::Error,
                    source: Some("srv-3".into()),
                    message: Some("health check failed: connection refused".into()),
                },
                LogEntry {
                    id: "log-4".into(),
                    timestamp: None,
                    level: LogLevel::Debug,
                    source: None,
                    message: None,
                },
            ];
        }
        mock.next_id.store(100, Ordering::Relaxed);
        mock
    }

    /// Makes the next API call fail with the given error.
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.lock().expect("fail_next lock") = Some(err);
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.fail_next.lock().expect("fail_next lock").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn make_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl Api for MockApi {
    fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.take_failure()?;
        Ok(self.data.lock().expect("mock data lock").customers.clone())
    }

    fn list_sessions(&self) -> Result<Vec<WaSession>, ApiError> {
        self.take_failure()?;
        Ok(self.data.lock().expect("mock data lock").sessions.clone())
    }

    fn list_servers(&self) -> Result<Vec<Server>, ApiError> {
        self.take_failure()?;
        Ok(self.data.lock().expect("mock data lock").servers.clone())
    }

    fn list_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        self.take_failure()?;
        Ok(self.data.lock().expect("mock data lock").logs.clone())
    }

    fn create_customer(&self, draft: &CustomerDraft) -> Result<(), ApiError> {
        self.take_failure()?;
        let id = self.make_id("cus");
        let mut data = self.data.lock().expect("mock data lock");
        data.customers.push(Customer {
            id,
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
            phone: Some(draft.phone.clone()),
            plan: draft.plan,
            status: CustomerStatus::Active,
            session_limit: draft.session_limit,
            session_count: 0,
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    fn update_customer(&self, id: &str, draft: &CustomerDraft) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        let customer = data
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::Http {
                status: 404,
                detail: format!("customer {} not found", id),
            })?;
        customer.name = Some(draft.name.clone());
        customer.email = Some(draft.email.clone());
        customer.phone = Some(draft.phone.clone());
        customer.plan = draft.plan;
        customer.session_limit = draft.session_limit;
        Ok(())
    }

    fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        data.customers.retain(|c| c.id != id);
        data.sessions.retain(|s| s.customer_id != id);
        Ok(())
    }

    fn create_session(&self, draft: &SessionDraft) -> Result<(), ApiError> {
        self.take_failure()?;
        let id = self.make_id("ses");
        let mut data = self.data.lock().expect("mock data lock");
        let customer_name = data
            .customers
            .iter()
            .find(|c| c.id == draft.customer_id)
            .and_then(|c| c.name.clone());
        data.sessions.push(WaSession {
            id,
            customer_id: draft.customer_id.clone(),
            customer_name,
            device_name: Some(draft.device_name.clone()),
            phone: Some(draft.phone.clone()),
            status: SessionStatus::Pairing,
            server_id: None,
            last_seen: None,
        });
        Ok(())
    }

    fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        data.sessions.retain(|s| s.id != id);
        Ok(())
    }

    fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError> {
        self.take_failure()?;
        let id = self.make_id("srv");
        let mut data = self.data.lock().expect("mock data lock");
        data.servers.push(Server {
            id,
            name: Some(draft.name.clone()),
            address: Some(draft.address.clone()),
            region: Some(draft.region.clone()),
            status: ServerStatus::Offline,
            session_count: 0,
            capacity: draft.capacity,
            cpu_pct: None,
            mem_pct: None,
        });
        Ok(())
    }

    fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        let server = data
            .servers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::Http {
                status: 404,
                detail: format!("server {} not found", id),
            })?;
        server.name = Some(draft.name.clone());
        server.address = Some(draft.address.clone());
        server.region = Some(draft.region.clone());
        server.capacity = draft.capacity;
        Ok(())
    }

    fn delete_server(&self, id: &str) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        data.servers.retain(|s| s.id != id);
        Ok(())
    }

    fn restart_server(&self, id: &str) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut data = self.data.lock().expect("mock data lock");
        let server = data
            .servers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::Http {
                status: 404,
                detail: format!("server {} not found", id),
            })?;
        server.status = ServerStatus::Restarting;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typical_fleet_shape() {
        let api = MockApi::typical_fleet();
        assert_eq!(api.list_customers().unwrap().len(), 4);
        assert_eq!(api.list_sessions().unwrap().len(), 4);
        assert_eq!(api.list_servers().unwrap().len(), 3);
        assert_eq!(api.list_logs().unwrap().len(), 4);
    }

    #[test]
    fn test_create_then_list_customer() {
        let api = MockApi::new();
        api.create_customer(&CustomerDraft {
            name: "New Co".into(),
            email: "a@b.example".into(),
            phone: "+1".into(),
            plan: Plan::Basic,
            session_limit: 5,
        })
        .unwrap();
        let customers = api.list_customers().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name.as_deref(), Some("New Co"));
    }

    #[test]
    fn test_delete_customer_cascades_sessions() {
        let api = MockApi::typical_fleet();
        api.delete_customer("cus-1").unwrap();
        assert!(
            api.list_sessions()
                .unwrap()
                .iter()
                .all(|s| s.customer_id != "cus-1")
        );
    }

    #[test]
    fn test_injected_failure_fires_once() {
        let api = MockApi::typical_fleet();
        api.fail_next(ApiError::Network("down".into()));
        assert!(api.list_customers().is_err());
        assert!(api.list_customers().is_ok());
    }

    #[test]
    fn test_restart_marks_server() {
        let api = MockApi::typical_fleet();
        api.restart_server("srv-1").unwrap();
        let servers = api.list_servers().unwrap();
        let srv = servers.iter().find(|s| s.id == "srv-1").unwrap();
        assert_eq!(srv.status, ServerStatus::Restarting);
    }

    #[test]
    fn test_update_missing_server_is_404() {
        let api = MockApi::new();
        let err = api
            .update_server("srv-x", &ServerDraft::default())
            .unwrap_err();
        match err {
            ApiError::Http { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {}", other),
        }
    }
}
