//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::state::Tab;

/// Renders the help popup centered on screen with scroll support.
pub fn render_help(frame: &mut Frame, area: Rect, tab: Tab, scroll: &mut usize) {
    let popup_width = (area.width * 60 / 100).clamp(40, 80);
    let popup_height = (area.height * 80 / 100).clamp(10, 30);
    let popup_area = centered_rect(area, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let content = help_content(tab);
    let content_lines = content.len();

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    let visible_height = chunks[0].height as usize;
    let max_scroll = content_lines.saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((*scroll as u16, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let scroll_info = if max_scroll > 0 {
        format!(" [{}/{}]", *scroll + 1, max_scroll + 1)
    } else {
        String::new()
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" to close, ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" to scroll", Style::default().fg(Color::DarkGray)),
        Span::styled(scroll_info, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(footer, chunks[1]);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Style::default().fg(Color::Cyan)))
}

fn entry(keys: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<12}"), Style::default().fg(Color::Yellow)),
        Span::raw(text),
    ])
}

fn help_content(tab: Tab) -> Vec<Line<'static>> {
    let mut lines = vec![
        section("Navigation"),
        entry("Tab / S-Tab", "next / previous tab"),
        entry("1-4", "jump to tab (CUS, SES, SRV, LOG)"),
        entry("j / k", "move selection down / up"),
        entry("h / l", "scroll columns left / right"),
        Line::from(""),
        section("Paging"),
        entry("n / p", "next / previous page"),
        entry("Home / End", "first / last page"),
        entry("[ / ]", "shrink / grow page size (10, 25, 50, 100)"),
        Line::from(""),
        section("Sort and filter"),
        entry("s", "cycle sort column"),
        entry("S", "flip sort direction"),
        entry("/", "text search (live; Esc reverts, Enter commits)"),
        entry("F", "clear all filters"),
        Line::from(""),
    ];

    match tab {
        Tab::Customers => {
            lines.push(section("Customers"));
            lines.push(entry("f", "cycle status filter"));
            lines.push(entry("g", "cycle plan filter"));
            lines.push(entry("a", "add customer"));
            lines.push(entry("Enter", "edit selected customer"));
            lines.push(entry("d", "delete selected customer (cascades sessions)"));
        }
        Tab::Sessions => {
            lines.push(section("Sessions"));
            lines.push(entry("f", "cycle status filter"));
            lines.push(entry("g", "cycle server filter (servers in view)"));
            lines.push(entry("a", "register new device session (starts pairing)"));
            lines.push(entry("d", "log out and remove selected session"));
        }
        Tab::Servers => {
            lines.push(section("Servers"));
            lines.push(entry("f", "cycle status filter"));
            lines.push(entry("a", "add server"));
            lines.push(entry("Enter", "edit selected server"));
            lines.push(entry("d", "delete selected server"));
            lines.push(entry("R", "restart selected server"));
        }
        Tab::Logs => {
            lines.push(section("Logs"));
            lines.push(entry("f", "cycle level filter"));
            lines.push(entry("t", "time range (FROM..TO; ISO, unix, or -1h style)"));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(entry("r", "refresh current tab / retry failed fetch"));
    lines.push(entry("e", "export filtered rows to CSV"));
    lines.push(entry("q", "quit (with confirmation)"));
    lines
}
