//! watop - terminal dashboard for a WhatsApp-automation fleet.
//!
//! Client-side list processing (filter, sort, paginate, tabular view)
//! over four REST-backed entity lists: customers, device sessions,
//! servers, and logs. The `watop` binary wires the pieces into an
//! interactive TUI.

pub mod api;
pub mod engine;
pub mod export;
pub mod fetch;
pub mod model;
pub mod pages;
pub mod tui;
pub mod util;
