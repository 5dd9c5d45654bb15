//! TUI widgets for watop.

mod confirm;
mod form;
mod header;
mod help;
mod table;
mod time_range;

pub use confirm::{render_delete_confirm, render_quit_confirm};
pub use form::render_form;
pub use header::{render_footer, render_tabs};
pub use help::render_help;
pub use table::render_entity_table;
pub use time_range::render_time_range;

use ratatui::layout::Rect;

/// Centers a popup of the given size within `area`, clamped to fit.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
