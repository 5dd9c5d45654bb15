//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::pages::PageSpec;

use super::state::{AppState, InputMode, PopupState, Tab};
use super::widgets::{
    render_delete_confirm, render_entity_table, render_footer, render_form, render_help,
    render_quit_confirm, render_tabs, render_time_range,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.terminal_width = area.width;
    state.prune_status();

    // Main layout: tab bar, table, footer
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(area);

    render_tabs(frame, chunks[0], state);

    // Current tab's pipeline output plus footer facts.
    let (vm, load, selected, page_size, summary) = match state.current_tab {
        Tab::Customers => {
            let vm = state.customers.view_model();
            (
                vm,
                state.customers.load_state().clone(),
                state.customers.selected,
                state.customers.paginator.page_size(),
                crate::pages::CustomersPage::filter_summary(&state.customers.filter),
            )
        }
        Tab::Sessions => {
            let vm = state.sessions.view_model();
            (
                vm,
                state.sessions.load_state().clone(),
                state.sessions.selected,
                state.sessions.paginator.page_size(),
                crate::pages::SessionsPage::filter_summary(&state.sessions.filter),
            )
        }
        Tab::Servers => {
            let vm = state.servers.view_model();
            (
                vm,
                state.servers.load_state().clone(),
                state.servers.selected,
                state.servers.paginator.page_size(),
                crate::pages::ServersPage::filter_summary(&state.servers.filter),
            )
        }
        Tab::Logs => {
            let vm = state.logs.view_model();
            (
                vm,
                state.logs.load_state().clone(),
                state.logs.selected,
                state.logs.paginator.page_size(),
                crate::pages::LogsPage::filter_summary(&state.logs.filter),
            )
        }
    };

    let h_scroll = state.h_scroll;
    render_entity_table(
        frame,
        chunks[1],
        &vm,
        &load,
        selected,
        h_scroll,
        &mut state.table_state,
    );

    render_footer(frame, chunks[2], state, &vm, page_size, &summary);

    // Popups overlay everything; only one can be open.
    match &mut state.popup {
        PopupState::None => {}
        PopupState::Help { scroll } => {
            let tab = state.current_tab;
            let mut s = *scroll;
            render_help(frame, area, tab, &mut s);
            *scroll = s;
        }
        PopupState::QuitConfirm => render_quit_confirm(frame, area),
        PopupState::ConfirmDelete { label, .. } => {
            let label = label.clone();
            render_delete_confirm(frame, area, &label);
        }
        PopupState::Form(form) => {
            let form = form.clone();
            render_form(frame, area, &form);
        }
    }

    if state.input_mode == InputMode::TimeRange && !state.popup.is_open() {
        render_time_range(frame, area, &state.time_input, state.time_error.as_deref());
    }
}
