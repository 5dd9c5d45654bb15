//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::forms;
use super::state::{AppState, InputMode, PopupState, StatusLevel, Tab};
use crate::fetch::MutationRequest;
use crate::util::parse_time_range;

/// Result of handling a key event.
#[derive(Debug, PartialEq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Refetch the current tab (manual refresh or failed-fetch retry).
    Refresh,
    /// Export the current tab's filtered rows to CSV.
    Export,
    /// Dispatch a mutation to the API.
    Mutate(MutationRequest),
}

/// Runs an operation against the current tab's controller.
macro_rules! with_page {
    ($state:expr, $page:ident => $body:expr) => {
        match $state.current_tab {
            Tab::Customers => {
                let $page = &mut $state.customers;
                $body
            }
            Tab::Sessions => {
                let $page = &mut $state.sessions;
                $body
            }
            Tab::Servers => {
                let $page = &mut $state.servers;
                $body
            }
            Tab::Logs => {
                let $page = &mut $state.logs;
                $body
            }
        }
    };
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.popup.is_open() {
        return handle_popup(state, key);
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
        InputMode::TimeRange => handle_time_range_mode(state, key),
    }
}

fn handle_popup(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match &mut state.popup {
        PopupState::None => KeyAction::None,
        PopupState::Help { scroll } => {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
                KeyCode::PageUp => *scroll = scroll.saturating_sub(10),
                KeyCode::PageDown => *scroll = scroll.saturating_add(10),
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    state.popup = PopupState::None;
                }
                _ => {}
            }
            KeyAction::None
        }
        PopupState::QuitConfirm => match key.code {
            KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('y') => {
                state.popup = PopupState::None;
                KeyAction::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.popup = PopupState::None;
                KeyAction::Quit
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                state.popup = PopupState::None;
                KeyAction::None
            }
            _ => KeyAction::None,
        },
        PopupState::ConfirmDelete { request, .. } => match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let request = request.clone();
                state.popup = PopupState::None;
                KeyAction::Mutate(request)
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                state.popup = PopupState::None;
                KeyAction::None
            }
            _ => KeyAction::None,
        },
        PopupState::Form(form) => match key.code {
            KeyCode::Esc => {
                state.popup = PopupState::None;
                KeyAction::None
            }
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                KeyAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.prev_field();
                KeyAction::None
            }
            KeyCode::Backspace => {
                form.backspace();
                KeyAction::None
            }
            KeyCode::Enter => match forms::submit(form) {
                Ok(request) => {
                    state.popup = PopupState::None;
                    KeyAction::Mutate(request)
                }
                Err(message) => {
                    form.error = Some(message);
                    KeyAction::None
                }
            },
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT)
                {
                    return KeyAction::None;
                }
                form.push_char(c);
                KeyAction::None
            }
            _ => KeyAction::None,
        },
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::QuitConfirm;
            KeyAction::None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Tab navigation
        KeyCode::Tab => {
            state.switch_tab(state.current_tab.next());
            KeyAction::None
        }
        KeyCode::BackTab => {
            state.switch_tab(state.current_tab.prev());
            KeyAction::None
        }
        KeyCode::Char('1') => {
            state.switch_tab(Tab::Customers);
            KeyAction::None
        }
        KeyCode::Char('2') => {
            state.switch_tab(Tab::Sessions);
            KeyAction::None
        }
        KeyCode::Char('3') => {
            state.switch_tab(Tab::Servers);
            KeyAction::None
        }
        KeyCode::Char('4') => {
            state.switch_tab(Tab::Logs);
            KeyAction::None
        }

        // Row navigation
        KeyCode::Up | KeyCode::Char('k') => {
            with_page!(state, page => page.select_up());
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            with_page!(state, page => page.select_down());
            KeyAction::None
        }

        // Paging
        KeyCode::Char('n') | KeyCode::PageDown => {
            with_page!(state, page => page.next_page());
            KeyAction::None
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            with_page!(state, page => page.prev_page());
            KeyAction::None
        }
        KeyCode::Home => {
            with_page!(state, page => page.first_page());
            KeyAction::None
        }
        KeyCode::End => {
            with_page!(state, page => page.last_page());
            KeyAction::None
        }
        KeyCode::Char('[') => {
            with_page!(state, page => page.paginator.shrink_page_size());
            KeyAction::None
        }
        KeyCode::Char(']') => {
            with_page!(state, page => page.paginator.grow_page_size());
            KeyAction::None
        }

        // Sorting
        KeyCode::Char('s') => {
            with_page!(state, page => page.cycle_sort_column());
            KeyAction::None
        }
        KeyCode::Char('S') => {
            with_page!(state, page => page.toggle_sort_direction());
            KeyAction::None
        }

        // Filter mode; the live search applies as typed and Esc
        // restores what was there before.
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Filter;
            state.saved_search = with_page!(state, page => page.filter.search.clone());
            state.filter_input = state.saved_search.clone();
            KeyAction::None
        }

        // Enum filter cycles
        KeyCode::Char('f') => {
            match state.current_tab {
                Tab::Customers => state.customers.filter.cycle_status(),
                Tab::Sessions => state.sessions.filter.cycle_status(),
                Tab::Servers => state.servers.filter.cycle_status(),
                Tab::Logs => state.logs.filter.cycle_level(),
            }
            with_page!(state, page => page.paginator.first());
            KeyAction::None
        }
        KeyCode::Char('g') => {
            match state.current_tab {
                Tab::Customers => {
                    state.customers.filter.cycle_plan();
                    state.customers.paginator.first();
                }
                Tab::Sessions => {
                    let mut ids: Vec<String> = state
                        .sessions
                        .rows()
                        .iter()
                        .filter_map(|s| s.server_id.clone())
                        .collect();
                    ids.sort();
                    ids.dedup();
                    state.sessions.filter.cycle_server(&ids);
                    state.sessions.paginator.first();
                }
                Tab::Servers | Tab::Logs => {}
            }
            KeyAction::None
        }
        KeyCode::Char('F') => {
            with_page!(state, page => page.clear_filters());
            KeyAction::None
        }

        // Log time range
        KeyCode::Char('t') => {
            if state.current_tab == Tab::Logs {
                state.input_mode = InputMode::TimeRange;
                state.time_error = None;
            }
            KeyAction::None
        }

        // CRUD
        KeyCode::Char('a') => {
            match state.current_tab {
                Tab::Customers => state.popup = PopupState::Form(forms::customer_create_form()),
                Tab::Sessions => state.popup = PopupState::Form(forms::session_create_form()),
                Tab::Servers => state.popup = PopupState::Form(forms::server_create_form()),
                Tab::Logs => {}
            }
            KeyAction::None
        }
        KeyCode::Enter => {
            match state.current_tab {
                Tab::Customers => {
                    if let Some(customer) = state.customers.selected_row() {
                        state.popup = PopupState::Form(forms::customer_edit_form(&customer));
                    }
                }
                Tab::Servers => {
                    if let Some(server) = state.servers.selected_row() {
                        state.popup = PopupState::Form(forms::server_edit_form(&server));
                    }
                }
                Tab::Sessions | Tab::Logs => {}
            }
            KeyAction::None
        }
        KeyCode::Char('d') => {
            open_delete_confirm(state);
            KeyAction::None
        }
        KeyCode::Char('R') => {
            if state.current_tab == Tab::Servers {
                if let Some(server) = state.servers.selected_row() {
                    return KeyAction::Mutate(MutationRequest::RestartServer { id: server.id });
                }
            }
            KeyAction::None
        }

        // Refresh / retry and export
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('e') => KeyAction::Export,

        // Horizontal scroll for wide tables
        KeyCode::Char('h') | KeyCode::Left => {
            state.h_scroll = state.h_scroll.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.h_scroll = state.h_scroll.saturating_add(1);
            KeyAction::None
        }

        // Help popup
        KeyCode::Char('?') => {
            state.popup = PopupState::Help { scroll: 0 };
            KeyAction::None
        }

        KeyCode::Esc => {
            state.status = None;
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

fn open_delete_confirm(state: &mut AppState) {
    match state.current_tab {
        Tab::Customers => {
            if let Some(customer) = state.customers.selected_row() {
                let name = customer.name.clone().unwrap_or_else(|| customer.id.clone());
                state.popup = PopupState::ConfirmDelete {
                    label: format!("Delete customer \"{name}\" and its sessions?"),
                    request: MutationRequest::DeleteCustomer { id: customer.id },
                };
            }
        }
        Tab::Sessions => {
            if let Some(session) = state.sessions.selected_row() {
                let device = session
                    .device_name
                    .clone()
                    .unwrap_or_else(|| session.id.clone());
                state.popup = PopupState::ConfirmDelete {
                    label: format!("Log out and remove session \"{device}\"?"),
                    request: MutationRequest::DeleteSession { id: session.id },
                };
            }
        }
        Tab::Servers => {
            if let Some(server) = state.servers.selected_row() {
                let name = server.name.clone().unwrap_or_else(|| server.id.clone());
                state.popup = PopupState::ConfirmDelete {
                    label: format!("Delete server \"{name}\"?"),
                    request: MutationRequest::DeleteServer { id: server.id },
                };
            }
        }
        Tab::Logs => {
            state.set_status("Logs are read-only", StatusLevel::Info);
        }
    }
}

/// Handles keys in filter mode. The search applies live on every edit.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.filter_input = state.saved_search.clone();
            apply_search(state);
            KeyAction::None
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            KeyAction::None
        }
        KeyCode::Backspace => {
            state.filter_input.pop();
            apply_search(state);
            KeyAction::None
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return KeyAction::None;
            }
            state.filter_input.push(c);
            apply_search(state);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn apply_search(state: &mut AppState) {
    let text = state.filter_input.clone();
    with_page!(state, page => {
        page.filter.search = text;
        page.paginator.first();
    });
}

fn handle_time_range_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.time_error = None;
            KeyAction::None
        }
        KeyCode::Enter => {
            match parse_time_range(&state.time_input) {
                Ok((from, to)) => {
                    state.logs.filter.from = from;
                    state.logs.filter.to = to;
                    state.logs.paginator.first();
                    state.input_mode = InputMode::Normal;
                    state.time_error = None;
                }
                Err(err) => state.time_error = Some(err.to_string()),
            }
            KeyAction::None
        }
        KeyCode::Backspace => {
            state.time_input.pop();
            state.time_error = None;
            KeyAction::None
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return KeyAction::None;
            }
            state.time_input.push(c);
            state.time_error = None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}
