//! Confirmation dialogs for quit and destructive mutations.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::style::Styles;

fn render_confirm(frame: &mut Frame, area: Rect, title: &str, message: &str, border: Color) {
    let width = (message.len() as u16 + 6).clamp(32, area.width.saturating_sub(4).max(32));
    let popup_area = centered_rect(area, width, 5);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter/y", Styles::help_key()),
            Span::styled(" confirm   ", Styles::help()),
            Span::styled("Esc/n", Styles::help_key()),
            Span::styled(" cancel", Styles::help()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

/// Renders the quit confirmation dialog.
pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    render_confirm(frame, area, "Quit", "Quit watop?", Color::Yellow);
}

/// Renders a delete/logout confirmation dialog.
pub fn render_delete_confirm(frame: &mut Frame, area: Rect, label: &str) {
    render_confirm(frame, area, "Confirm", label, Color::Red);
}
