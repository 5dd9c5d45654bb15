//! Time-range input popup for the logs tab.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::tui::style::Styles;

/// Renders the time-range editor with format examples and the current
/// parse error, if any.
pub fn render_time_range(frame: &mut Frame, area: Rect, input: &str, error: Option<&str>) {
    let popup_area = centered_rect(area, 52.min(area.width), 8);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Log time range ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("range: ", Styles::help_key()),
            Span::styled(format!("{input}_"), Styles::filter_input()),
        ]),
        Line::from(""),
        Line::from(Span::styled("FROM..TO, either side empty", Styles::dim())),
        Line::from(Span::styled(
            "e.g. 2026-08-01..2026-08-28, -1h.., ..1756400000",
            Styles::dim(),
        )),
    ];
    match error {
        Some(err) => lines.push(Line::from(Span::styled(err.to_string(), Styles::error()))),
        None => lines.push(Line::from(vec![
            Span::styled("Enter", Styles::help_key()),
            Span::styled(" apply  ", Styles::help()),
            Span::styled("Esc", Styles::help_key()),
            Span::styled(" cancel", Styles::help()),
        ])),
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
