//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::export::{default_export_path, export_csv};
use crate::fetch::{FetchDone, FetchGate, Fetcher, MutationDone, MutationRequest, Payload, Resource};
use crate::model::ServerStatus;
use crate::pages::PageSpec;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, StatusLevel, Tab};

/// Main TUI application.
pub struct App {
    state: AppState,
    fetcher: Fetcher,
    gate: FetchGate,
    /// Background refresh period for all four lists.
    refresh: Duration,
    last_refresh: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(fetcher: Fetcher, refresh: Duration, page_size: usize, demo: bool) -> Self {
        Self {
            state: AppState::new(page_size, demo),
            fetcher,
            gate: FetchGate::new(),
            refresh,
            last_refresh: Instant::now(),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, events: EventHandler) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        if let Ok(size) = terminal.size() {
            self.state.terminal_width = size.width;
        }

        // Initial fetch of all four lists
        self.refresh_all();

        loop {
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next() {
                Ok(Event::Tick) => {
                    if self.last_refresh.elapsed() >= self.refresh {
                        self.refresh_all();
                    }
                }
                Ok(Event::Key(key)) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Refresh => self.refresh_resource(self.state.current_tab.resource()),
                    KeyAction::Export => self.export_current(),
                    KeyAction::Mutate(request) => self.dispatch(request),
                    KeyAction::None => {}
                },
                Ok(Event::Resize(width)) => {
                    self.state.terminal_width = width;
                }
                Ok(Event::Fetch(done)) => self.on_fetch(done),
                Ok(Event::Mutation(done)) => self.on_mutation(done),
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn refresh_all(&mut self) {
        for &resource in Resource::all() {
            self.refresh_resource(resource);
        }
        self.last_refresh = Instant::now();
    }

    /// Starts a fetch unless one is already outstanding for this list.
    fn refresh_resource(&mut self, resource: Resource) {
        let Some(seq) = self.gate.begin(resource) else {
            return;
        };
        match resource {
            Resource::Customers => self.state.customers.begin_loading(),
            Resource::Sessions => self.state.sessions.begin_loading(),
            Resource::Servers => self.state.servers.begin_loading(),
            Resource::Logs => self.state.logs.begin_loading(),
        }
        self.fetcher.spawn_fetch(resource, seq);
    }

    fn on_fetch(&mut self, done: FetchDone) {
        self.gate.finish(done.resource, done.seq);
        match done.outcome {
            Ok(payload) => {
                if !self.gate.should_apply(done.resource, done.seq) {
                    debug!(resource = done.resource.name(), seq = done.seq, "stale fetch dropped");
                    return;
                }
                match payload {
                    Payload::Customers(rows) => self.state.customers.set_rows(rows),
                    Payload::Sessions(rows) => self.state.sessions.set_rows(rows),
                    Payload::Servers(rows) => {
                        // Fresh server data supersedes the optimistic
                        // restart patch.
                        self.state.pending_restart = None;
                        self.state.servers.set_rows(rows);
                    }
                    Payload::Logs(rows) => self.state.logs.set_rows(rows),
                }
            }
            Err(e) => {
                let message = e.to_string();
                match done.resource {
                    Resource::Customers => self.state.customers.fail(message.clone()),
                    Resource::Sessions => self.state.sessions.fail(message.clone()),
                    Resource::Servers => self.state.servers.fail(message.clone()),
                    Resource::Logs => self.state.logs.fail(message.clone()),
                }
                self.state.set_status(
                    format!("{} fetch failed: {message}", done.resource.name()),
                    StatusLevel::Error,
                );
            }
        }
    }

    fn on_mutation(&mut self, done: MutationDone) {
        match done.outcome {
            Ok(()) => {
                self.state
                    .set_status(format!("{} ok", done.request.describe()), StatusLevel::Info);
                self.refresh_resource(done.request.resource());
                // Deleting a customer cascades to its sessions.
                if matches!(done.request, MutationRequest::DeleteCustomer { .. }) {
                    self.refresh_resource(Resource::Sessions);
                }
            }
            Err(e) => {
                if let MutationRequest::RestartServer { id } = &done.request
                    && let Some((patched, prev)) = self.state.pending_restart.take()
                    && patched == *id
                {
                    self.state.servers.with_rows_mut(|rows| {
                        if let Some(server) = rows.iter_mut().find(|s| s.id == patched) {
                            server.status = prev;
                        }
                    });
                }
                self.state.set_status(
                    format!("{} failed: {e}", done.request.describe()),
                    StatusLevel::Error,
                );
            }
        }
    }

    /// Sends a mutation to a worker thread. A restart flips the server
    /// to Restarting locally right away; the rollback happens in
    /// [`Self::on_mutation`] if the call fails.
    fn dispatch(&mut self, request: MutationRequest) {
        if let MutationRequest::RestartServer { id } = &request {
            let prev = self
                .state
                .servers
                .rows()
                .iter()
                .find(|s| s.id == *id)
                .map(|s| s.status);
            if let Some(prev) = prev {
                self.state.pending_restart = Some((id.clone(), prev));
                let id = id.clone();
                self.state.servers.with_rows_mut(|rows| {
                    if let Some(server) = rows.iter_mut().find(|s| s.id == id) {
                        server.status = ServerStatus::Restarting;
                    }
                });
            }
        }
        self.state
            .set_status(format!("{}...", request.describe()), StatusLevel::Info);
        self.fetcher.spawn_mutation(request);
    }

    /// Exports the current tab's filtered rows (all pages) to CSV.
    fn export_current(&mut self) {
        let (headers, rows, entity) = match self.state.current_tab {
            Tab::Customers => {
                let (h, r) = self.state.customers.export_data();
                (h, r, crate::pages::CustomersPage::ENTITY)
            }
            Tab::Sessions => {
                let (h, r) = self.state.sessions.export_data();
                (h, r, crate::pages::SessionsPage::ENTITY)
            }
            Tab::Servers => {
                let (h, r) = self.state.servers.export_data();
                (h, r, crate::pages::ServersPage::ENTITY)
            }
            Tab::Logs => {
                let (h, r) = self.state.logs.export_data();
                (h, r, crate::pages::LogsPage::ENTITY)
            }
        };
        let path = default_export_path(entity);
        match export_csv(&path, &headers, &rows) {
            Ok(()) => self.state.set_status(
                format!("Exported {} rows to {}", rows.len(), path.display()),
                StatusLevel::Info,
            ),
            Err(e) => self
                .state
                .set_status(format!("Export failed: {e}"), StatusLevel::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use crate::model::Server;
    use crate::pages::LoadState;
    use std::sync::Arc;
    use std::sync::mpsc;

    fn test_app() -> (App, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let fetcher = Fetcher::new(Arc::new(MockApi::typical_fleet()), tx);
        (App::new(fetcher, Duration::from_secs(30), 25, true), rx)
    }

    fn server(id: &str, status: ServerStatus) -> Server {
        Server {
            id: id.to_string(),
            name: Some(id.to_string()),
            address: None,
            region: None,
            status,
            session_count: 0,
            capacity: 10,
            cpu_pct: None,
            mem_pct: None,
        }
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let (mut app, _rx) = test_app();
        let old = app.gate.begin(Resource::Servers).unwrap();
        app.gate.finish(Resource::Servers, old);
        let new = app.gate.begin(Resource::Servers).unwrap();

        // Newer completion arrives first.
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq: new,
            outcome: Ok(Payload::Servers(vec![server("srv-new", ServerStatus::Online)])),
        });
        // The superseded one resolves late and must not clobber it.
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq: old,
            outcome: Ok(Payload::Servers(vec![server("srv-old", ServerStatus::Offline)])),
        });

        assert_eq!(app.state.servers.rows().len(), 1);
        assert_eq!(app.state.servers.rows()[0].id, "srv-new");
    }

    #[test]
    fn test_fetch_failure_keeps_ready_rows() {
        let (mut app, _rx) = test_app();
        let seq = app.gate.begin(Resource::Servers).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq,
            outcome: Ok(Payload::Servers(vec![server("srv-1", ServerStatus::Online)])),
        });

        let seq = app.gate.begin(Resource::Servers).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq,
            outcome: Err(crate::api::ApiError::Network("timeout".into())),
        });

        assert_eq!(*app.state.servers.load_state(), LoadState::Ready);
        assert_eq!(app.state.servers.rows().len(), 1);
        assert!(app.state.status.is_some());
    }

    #[test]
    fn test_restart_patches_locally_and_rolls_back_on_failure() {
        let (mut app, _rx) = test_app();
        let seq = app.gate.begin(Resource::Servers).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq,
            outcome: Ok(Payload::Servers(vec![server("srv-1", ServerStatus::Online)])),
        });

        let request = MutationRequest::RestartServer {
            id: "srv-1".to_string(),
        };
        app.dispatch(request.clone());
        assert_eq!(app.state.servers.rows()[0].status, ServerStatus::Restarting);

        app.on_mutation(MutationDone {
            request,
            outcome: Err(crate::api::ApiError::Network("down".into())),
        });
        assert_eq!(app.state.servers.rows()[0].status, ServerStatus::Online);
        assert!(app.state.pending_restart.is_none());
    }

    #[test]
    fn test_fresh_server_rows_clear_pending_restart() {
        let (mut app, _rx) = test_app();
        let seq = app.gate.begin(Resource::Servers).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq,
            outcome: Ok(Payload::Servers(vec![server("srv-1", ServerStatus::Online)])),
        });
        app.dispatch(MutationRequest::RestartServer {
            id: "srv-1".to_string(),
        });
        assert!(app.state.pending_restart.is_some());

        let seq = app.gate.begin(Resource::Servers).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Servers,
            seq,
            outcome: Ok(Payload::Servers(vec![server("srv-1", ServerStatus::Restarting)])),
        });
        assert!(app.state.pending_restart.is_none());
    }

    #[test]
    fn test_retry_after_failure_goes_loading() {
        let (mut app, _rx) = test_app();
        let seq = app.gate.begin(Resource::Logs).unwrap();
        app.on_fetch(FetchDone {
            resource: Resource::Logs,
            seq,
            outcome: Err(crate::api::ApiError::Network("down".into())),
        });
        assert!(matches!(app.state.logs.load_state(), LoadState::Failed(_)));

        app.refresh_resource(Resource::Logs);
        assert_eq!(*app.state.logs.load_state(), LoadState::Loading);
    }
}
