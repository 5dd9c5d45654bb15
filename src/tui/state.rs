//! Application state management.

use std::time::{Duration, Instant};

use ratatui::widgets::TableState as RatatuiTableState;

use crate::fetch::{MutationRequest, Resource};
use crate::model::ServerStatus;
use crate::pages::{CustomersPage, LogsPage, PageController, ServersPage, SessionsPage};

/// Available tabs in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Customers,
    Sessions,
    Servers,
    Logs,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Customers, Tab::Sessions, Tab::Servers, Tab::Logs]
    }

    /// Returns the display name of the tab.
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Customers => "CUS",
            Tab::Sessions => "SES",
            Tab::Servers => "SRV",
            Tab::Logs => "LOG",
        }
    }

    /// The list backing this tab.
    pub fn resource(&self) -> Resource {
        match self {
            Tab::Customers => Resource::Customers,
            Tab::Sessions => Resource::Sessions,
            Tab::Servers => Resource::Servers,
            Tab::Logs => Resource::Logs,
        }
    }

    /// Returns the next tab.
    pub fn next(&self) -> Tab {
        match self {
            Tab::Customers => Tab::Sessions,
            Tab::Sessions => Tab::Servers,
            Tab::Servers => Tab::Logs,
            Tab::Logs => Tab::Customers,
        }
    }

    /// Returns the previous tab.
    pub fn prev(&self) -> Tab {
        match self {
            Tab::Customers => Tab::Logs,
            Tab::Sessions => Tab::Customers,
            Tab::Servers => Tab::Sessions,
            Tab::Logs => Tab::Servers,
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Live-editing the text search of the current tab.
    Filter,
    /// Editing the log time-range bounds (LOG tab, `t`).
    TimeRange,
}

/// One field of an add/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }

    pub fn with_value(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// What submitting a form produces.
#[derive(Debug, Clone, PartialEq)]
pub enum FormIntent {
    CreateCustomer,
    EditCustomer { id: String },
    CreateSession,
    CreateServer,
    EditServer { id: String },
}

/// State of the add/edit form popup.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub title: String,
    pub intent: FormIntent,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(title: &str, intent: FormIntent, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            intent,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
            self.error = None;
        }
    }

    /// Trimmed value of a field by label.
    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim())
            .unwrap_or("")
    }
}

/// Active popup state. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PopupState {
    /// No popup is open.
    #[default]
    None,
    /// Help popup with scroll offset.
    Help { scroll: usize },
    /// Quit confirmation dialog.
    QuitConfirm,
    /// Delete (or logout) confirmation for one row.
    ConfirmDelete {
        label: String,
        request: MutationRequest,
    },
    /// Add/edit form.
    Form(FormState),
}

impl PopupState {
    /// Returns true if any popup is open (excluding None).
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Status-line severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Transient status-line notification.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    expires_at: Instant,
}

const STATUS_TTL: Duration = Duration::from_secs(6);

/// Top-level application state: one controller per tab plus the input
/// and popup machinery around them.
pub struct AppState {
    pub current_tab: Tab,
    pub input_mode: InputMode,
    pub popup: PopupState,

    pub customers: PageController<CustomersPage>,
    pub sessions: PageController<SessionsPage>,
    pub servers: PageController<ServersPage>,
    pub logs: PageController<LogsPage>,

    /// Search text being edited in filter mode.
    pub filter_input: String,
    /// Search text to restore when filter mode is cancelled.
    pub saved_search: String,
    /// Time-range expression being edited (LOG tab).
    pub time_input: String,
    pub time_error: Option<String>,

    pub status: Option<StatusMessage>,
    /// Server restart dispatched but unconfirmed: (id, status to
    /// restore on failure).
    pub pending_restart: Option<(String, ServerStatus)>,

    /// Horizontal column scroll for wide tables; sticky columns stay.
    pub h_scroll: usize,
    pub table_state: RatatuiTableState,
    pub terminal_width: u16,
    /// Demo mode (mock API) indicator for the header.
    pub demo: bool,
}

impl AppState {
    pub fn new(page_size: usize, demo: bool) -> Self {
        Self {
            current_tab: Tab::default(),
            input_mode: InputMode::default(),
            popup: PopupState::default(),
            customers: PageController::new(page_size),
            sessions: PageController::new(page_size),
            servers: PageController::new(page_size),
            logs: PageController::new(page_size),
            filter_input: String::new(),
            saved_search: String::new(),
            time_input: String::new(),
            time_error: None,
            status: None,
            pending_restart: None,
            h_scroll: 0,
            table_state: RatatuiTableState::default(),
            terminal_width: 0,
            demo,
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            self.current_tab = tab;
            self.h_scroll = 0;
            self.table_state = RatatuiTableState::default();
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            expires_at: Instant::now() + STATUS_TTL,
        });
    }

    /// Drops the status message once its TTL has passed.
    pub fn prune_status(&mut self) {
        if let Some(msg) = &self.status
            && Instant::now() >= msg.expires_at
        {
            self.status = None;
        }
    }
}
