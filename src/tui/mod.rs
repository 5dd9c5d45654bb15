//! Terminal user interface for the watop dashboard.
//!
//! An interactive atop-style console: one table per entity tab,
//! refreshed in the background, with sorting, filtering, paging, and
//! CRUD popups on top.

mod app;
mod event;
mod forms;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use event::{Event, EventHandler};
pub use state::{AppState, Tab};
