//! Add/edit form popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::tui::state::FormState;
use crate::tui::style::Styles;

/// Renders the form popup: one line per field, the focused one
/// highlighted, validation error at the bottom.
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState) {
    let height = (form.fields.len() as u16 + 5).min(area.height);
    let popup_area = centered_rect(area, 48.min(area.width), height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", form.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let label_style = if focused {
                Styles::help_key()
            } else {
                Styles::dim()
            };
            let value_style = if focused {
                Styles::filter_input()
            } else {
                Styles::default()
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:<14}", field.label), label_style),
                Span::styled(format!("{}{}", field.value, cursor), value_style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(error.clone(), Styles::error()))),
        None => lines.push(Line::from(vec![
            Span::styled("Tab", Styles::help_key()),
            Span::styled(" next field  ", Styles::help()),
            Span::styled("Enter", Styles::help_key()),
            Span::styled(" save  ", Styles::help()),
            Span::styled("Esc", Styles::help_key()),
            Span::styled(" cancel", Styles::help()),
        ])),
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
