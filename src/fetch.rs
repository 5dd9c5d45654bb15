//! Background fetch and mutation dispatch.
//!
//! Each list resource has at most one in-flight fetch. Worker threads
//! call the blocking [`Api`] and post completions back onto the app
//! event channel; the UI keeps filtering/sorting/paging the stale list
//! in the meantime.
//!
//! Every request carries a sequence number. A completion is applied
//! only if it is newer than the last applied one for its resource, so
//! a superseded fetch that resolves late is discarded instead of
//! clobbering fresher data: last-fetch-wins as a hard guarantee.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use crate::api::{Api, ApiError};
use crate::model::{
    Customer, CustomerDraft, LogEntry, Server, ServerDraft, SessionDraft, WaSession,
};
use crate::tui::Event;

/// The four independently fetched lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    Sessions,
    Servers,
    Logs,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[
            Resource::Customers,
            Resource::Sessions,
            Resource::Servers,
            Resource::Logs,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Sessions => "sessions",
            Resource::Servers => "servers",
            Resource::Logs => "logs",
        }
    }
}

/// Fetched row list, one variant per resource.
#[derive(Debug)]
pub enum Payload {
    Customers(Vec<Customer>),
    Sessions(Vec<WaSession>),
    Servers(Vec<Server>),
    Logs(Vec<LogEntry>),
}

/// Completion of one list fetch.
#[derive(Debug)]
pub struct FetchDone {
    pub resource: Resource,
    pub seq: u64,
    pub outcome: Result<Payload, ApiError>,
}

/// One mutation request, dispatched to a worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    CreateCustomer(CustomerDraft),
    UpdateCustomer { id: String, draft: CustomerDraft },
    DeleteCustomer { id: String },
    CreateSession(SessionDraft),
    DeleteSession { id: String },
    CreateServer(ServerDraft),
    UpdateServer { id: String, draft: ServerDraft },
    DeleteServer { id: String },
    RestartServer { id: String },
}

impl MutationRequest {
    /// The list this mutation invalidates on success.
    pub fn resource(&self) -> Resource {
        match self {
            MutationRequest::CreateCustomer(_)
            | MutationRequest::UpdateCustomer { .. }
            | MutationRequest::DeleteCustomer { .. } => Resource::Customers,
            MutationRequest::CreateSession(_) | MutationRequest::DeleteSession { .. } => {
                Resource::Sessions
            }
            MutationRequest::CreateServer(_)
            | MutationRequest::UpdateServer { .. }
            | MutationRequest::DeleteServer { .. }
            | MutationRequest::RestartServer { .. } => Resource::Servers,
        }
    }

    /// Short human description for the status line.
    pub fn describe(&self) -> &'static str {
        match self {
            MutationRequest::CreateCustomer(_) => "create customer",
            MutationRequest::UpdateCustomer { .. } => "update customer",
            MutationRequest::DeleteCustomer { .. } => "delete customer",
            MutationRequest::CreateSession(_) => "create session",
            MutationRequest::DeleteSession { .. } => "delete session",
            MutationRequest::CreateServer(_) => "create server",
            MutationRequest::UpdateServer { .. } => "update server",
            MutationRequest::DeleteServer { .. } => "delete server",
            MutationRequest::RestartServer { .. } => "restart server",
        }
    }

    fn execute(&self, api: &dyn Api) -> Result<(), ApiError> {
        match self {
            MutationRequest::CreateCustomer(draft) => api.create_customer(draft),
            MutationRequest::UpdateCustomer { id, draft } => api.update_customer(id, draft),
            MutationRequest::DeleteCustomer { id } => api.delete_customer(id),
            MutationRequest::CreateSession(draft) => api.create_session(draft),
            MutationRequest::DeleteSession { id } => api.delete_session(id),
            MutationRequest::CreateServer(draft) => api.create_server(draft),
            MutationRequest::UpdateServer { id, draft } => api.update_server(id, draft),
            MutationRequest::DeleteServer { id } => api.delete_server(id),
            MutationRequest::RestartServer { id } => api.restart_server(id),
        }
    }
}

/// Completion of one mutation.
#[derive(Debug)]
pub struct MutationDone {
    pub request: MutationRequest,
    pub outcome: Result<(), ApiError>,
}

/// Sequence bookkeeping: one in-flight fetch per resource, stale
/// completions rejected.
#[derive(Debug, Default)]
pub struct FetchGate {
    next_seq: u64,
    in_flight: HashMap<Resource, u64>,
    last_applied: HashMap<Resource, u64>,
}

impl FetchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a sequence number for a new fetch, or `None` while one
    /// is already outstanding for this resource.
    pub fn begin(&mut self, resource: Resource) -> Option<u64> {
        if self.in_flight.contains_key(&resource) {
            return None;
        }
        self.next_seq += 1;
        self.in_flight.insert(resource, self.next_seq);
        Some(self.next_seq)
    }

    /// Marks the in-flight fetch finished (whatever its outcome).
    pub fn finish(&mut self, resource: Resource, seq: u64) {
        if self.in_flight.get(&resource) == Some(&seq) {
            self.in_flight.remove(&resource);
        }
    }

    /// Whether a completed fetch should be applied. Records the seq on
    /// acceptance; anything at or below the last applied seq is stale.
    pub fn should_apply(&mut self, resource: Resource, seq: u64) -> bool {
        let last = self.last_applied.get(&resource).copied().unwrap_or(0);
        if seq <= last {
            return false;
        }
        self.last_applied.insert(resource, seq);
        true
    }

    pub fn is_in_flight(&self, resource: Resource) -> bool {
        self.in_flight.contains_key(&resource)
    }
}

/// Spawns blocking API calls on worker threads and posts completions
/// onto the app event channel.
pub struct Fetcher {
    api: Arc<dyn Api>,
    tx: Sender<Event>,
}

impl Fetcher {
    pub fn new(api: Arc<dyn Api>, tx: Sender<Event>) -> Self {
        Self { api, tx }
    }

    /// Starts a list fetch with the given reserved sequence number.
    pub fn spawn_fetch(&self, resource: Resource, seq: u64) {
        debug!(resource = resource.name(), seq, "fetch start");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = match resource {
                Resource::Customers => api.list_customers().map(Payload::Customers),
                Resource::Sessions => api.list_sessions().map(Payload::Sessions),
                Resource::Servers => api.list_servers().map(Payload::Servers),
                Resource::Logs => api.list_logs().map(Payload::Logs),
            };
            if let Err(ref e) = outcome {
                warn!(resource = resource.name(), seq, error = %e, "fetch failed");
            }
            // Send failure means the UI is gone; nothing to do.
            let _ = tx.send(Event::Fetch(FetchDone {
                resource,
                seq,
                outcome,
            }));
        });
    }

    /// Starts a mutation. Fire-and-forget from the engine's view; the
    /// completion event carries the explicit result back to the caller.
    pub fn spawn_mutation(&self, request: MutationRequest) {
        debug!(action = request.describe(), "mutation start");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = request.execute(api.as_ref());
            if let Err(ref e) = outcome {
                warn!(action = request.describe(), error = %e, "mutation failed");
            }
            let _ = tx.send(Event::Mutation(MutationDone { request, outcome }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_in_flight_per_resource() {
        let mut gate = FetchGate::new();
        let seq = gate.begin(Resource::Customers).unwrap();
        assert!(gate.is_in_flight(Resource::Customers));
        // Second begin for the same resource is refused.
        assert!(gate.begin(Resource::Customers).is_none());
        // Other resources are independent.
        assert!(gate.begin(Resource::Logs).is_some());

        gate.finish(Resource::Customers, seq);
        assert!(!gate.is_in_flight(Resource::Customers));
        assert!(gate.begin(Resource::Customers).is_some());
    }

    #[test]
    fn test_last_fetch_wins_discards_stale_seq() {
        let mut gate = FetchGate::new();
        let old = gate.begin(Resource::Servers).unwrap();
        gate.finish(Resource::Servers, old);
        let new = gate.begin(Resource::Servers).unwrap();
        gate.finish(Resource::Servers, new);
        assert!(new > old);

        // Newer result lands first, older resolves late: discarded.
        assert!(gate.should_apply(Resource::Servers, new));
        assert!(!gate.should_apply(Resource::Servers, old));
        // Replays of the applied seq are also rejected.
        assert!(!gate.should_apply(Resource::Servers, new));
    }

    #[test]
    fn test_mutation_request_targets_its_list() {
        let req = MutationRequest::RestartServer { id: "srv-1".into() };
        assert_eq!(req.resource(), Resource::Servers);
        let req = MutationRequest::DeleteSession { id: "ses-1".into() };
        assert_eq!(req.resource(), Resource::Sessions);
    }
}
