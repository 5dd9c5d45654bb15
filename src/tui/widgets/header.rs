//! Tab bar and footer line.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::engine::TableViewModel;
use crate::tui::state::{AppState, InputMode, StatusLevel, Tab};
use crate::tui::style::Styles;

/// Renders the top tab bar: program name, tabs, demo indicator.
pub fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(" watop ", Styles::header())];
    for tab in Tab::all() {
        let style = if *tab == state.current_tab {
            Styles::tab_active()
        } else {
            Styles::tab_inactive()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tab.name(), style));
    }
    if state.demo {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("[demo]", Styles::warning()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the bottom line: input prompt when editing, otherwise the
/// status message or the paging/filter summary with key hints.
pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    vm: &TableViewModel,
    page_size: usize,
    filter_summary: &str,
) {
    let line = match state.input_mode {
        InputMode::Filter => Line::from(vec![
            Span::styled("search: ", Styles::help_key()),
            Span::styled(state.filter_input.clone(), Styles::filter_input()),
            Span::styled("  (Enter commit, Esc revert)", Styles::dim()),
        ]),
        InputMode::TimeRange => Line::from(vec![
            Span::styled("range: ", Styles::help_key()),
            Span::styled(state.time_input.clone(), Styles::filter_input()),
            match &state.time_error {
                Some(err) => Span::styled(format!("  {err}"), Styles::error()),
                None => Span::styled("  (FROM..TO, Enter apply, Esc cancel)", Styles::dim()),
            },
        ]),
        InputMode::Normal => {
            if let Some(status) = &state.status {
                let style = match status.level {
                    StatusLevel::Info => Styles::ok(),
                    StatusLevel::Error => Styles::error(),
                };
                Line::from(Span::styled(status.text.clone(), style))
            } else {
                let mut spans = vec![Span::styled(
                    format!(
                        " page {}/{} ({} rows, size {})",
                        vm.page,
                        vm.total_pages.max(1),
                        vm.filtered_len,
                        page_size
                    ),
                    Styles::dim(),
                )];
                if !filter_summary.is_empty() {
                    let summary = crate::util::truncate(filter_summary, 48);
                    spans.push(Span::styled(format!("  filter: {summary}"), Styles::warning()));
                }
                spans.push(Span::styled("  ?", Styles::help_key()));
                spans.push(Span::styled(" help", Styles::help()));
                Line::from(spans)
            }
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}
