//! Entity table widget: renders one tab's view model with sticky
//! columns, horizontal scroll, and loading/error/empty states.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState};

use crate::engine::{Sticky, TableViewModel};
use crate::pages::LoadState;
use crate::tui::style::Styles;

/// Column indices visible at the current horizontal scroll: left-pinned
/// columns first, then the scrolled window of unpinned ones, then
/// right-pinned. Returns the clamped scroll alongside.
fn visible_columns(sticky: &[Option<Sticky>], scroll: usize) -> (Vec<usize>, usize) {
    let left: Vec<usize> = (0..sticky.len())
        .filter(|&i| sticky[i] == Some(Sticky::Left))
        .collect();
    let right: Vec<usize> = (0..sticky.len())
        .filter(|&i| sticky[i] == Some(Sticky::Right))
        .collect();
    let unpinned: Vec<usize> = (0..sticky.len()).filter(|&i| sticky[i].is_none()).collect();

    let scroll = scroll.min(unpinned.len().saturating_sub(1));
    let mut visible = left;
    visible.extend(unpinned.iter().skip(scroll).copied());
    visible.extend(right);
    (visible, scroll)
}

/// Renders one entity tab.
#[allow(clippy::too_many_arguments)]
pub fn render_entity_table(
    frame: &mut Frame,
    area: Rect,
    vm: &TableViewModel,
    load: &LoadState,
    selected: usize,
    h_scroll: usize,
    table_state: &mut TableState,
) {
    frame.render_widget(Clear, area);

    match load {
        LoadState::Idle | LoadState::Loading => {
            let block = Block::default().borders(Borders::ALL).title(vm.title.clone());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("Loading...", Styles::dim()))),
                inner,
            );
            return;
        }
        LoadState::Failed(message) => {
            let block = Block::default().borders(Borders::ALL).title(vm.title.clone());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(format!("Fetch failed: {message}"), Styles::error())),
                    Line::from(Span::styled("Press r to retry", Styles::dim())),
                ]),
                inner,
            );
            return;
        }
        LoadState::Ready => {}
    }

    let (visible, scroll) = visible_columns(&vm.sticky, h_scroll);

    let title = if scroll > 0 {
        format!("{}← scroll: {} ", vm.title, scroll)
    } else {
        vm.title.clone()
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if vm.rows.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(vm.empty_hint.clone(), Styles::dim()))),
            inner,
        );
        return;
    }

    let header = Row::new(
        visible
            .iter()
            .map(|&i| Span::styled(vm.headers[i].clone(), Styles::table_header())),
    )
    .style(Styles::table_header())
    .height(1);

    let rows: Vec<Row> = vm
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if idx == selected {
                Styles::selected()
            } else {
                Styles::from_class(row.style)
            };
            Row::new(visible.iter().map(|&i| row.cells[i].clone()))
                .style(style)
                .height(1)
        })
        .collect();

    // The last visible column soaks up the slack so the grid fills the
    // frame at any terminal width.
    let last = visible.len().saturating_sub(1);
    let widths: Vec<Constraint> = visible
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            if pos == last {
                Constraint::Fill(1)
            } else {
                Constraint::Length(vm.widths[i])
            }
        })
        .collect();

    table_state.select(Some(selected));
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Styles::selected());
    frame.render_stateful_widget(table, area, table_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_left_stays_during_scroll() {
        let sticky = vec![Some(Sticky::Left), None, None, None];
        let (visible, scroll) = visible_columns(&sticky, 2);
        assert_eq!(scroll, 2);
        assert_eq!(visible, vec![0, 3]);
    }

    #[test]
    fn test_scroll_clamped_to_last_unpinned() {
        let sticky = vec![Some(Sticky::Left), None, None];
        let (visible, scroll) = visible_columns(&sticky, 99);
        assert_eq!(scroll, 1);
        assert_eq!(visible, vec![0, 2]);
    }

    #[test]
    fn test_right_pinned_column_follows_window() {
        let sticky = vec![Some(Sticky::Left), None, None, Some(Sticky::Right)];
        let (visible, _) = visible_columns(&sticky, 1);
        assert_eq!(visible, vec![0, 2, 3]);
    }

    #[test]
    fn test_no_scroll_shows_all_columns() {
        let sticky = vec![Some(Sticky::Left), None, None];
        let (visible, scroll) = visible_columns(&sticky, 0);
        assert_eq!(scroll, 0);
        assert_eq!(visible, vec![0, 1, 2]);
    }
}
