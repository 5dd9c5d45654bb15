//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::engine::RowStyleClass;

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    // Background colors
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const SELECTED_BG: Color = Color::DarkGray;

    // Foreground colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    // Highlight colors
    pub const HIGHLIGHT_OK: Color = Color::Green;
    pub const HIGHLIGHT_WARN: Color = Color::Yellow;
    pub const HIGHLIGHT_CRITICAL: Color = Color::Red;

    // Tab colors
    pub const TAB_ACTIVE: Color = Color::Cyan;
    pub const TAB_INACTIVE: Color = Color::DarkGray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected row style.
    pub fn selected() -> Style {
        Style::default()
            .bg(Theme::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Healthy/positive value style (green).
    pub fn ok() -> Style {
        Style::default().fg(Theme::HIGHLIGHT_OK)
    }

    /// Warning value style (yellow).
    pub fn warning() -> Style {
        Style::default().fg(Theme::HIGHLIGHT_WARN)
    }

    /// Critical value style (red).
    pub fn critical() -> Style {
        Style::default()
            .fg(Theme::HIGHLIGHT_CRITICAL)
            .add_modifier(Modifier::BOLD)
    }

    /// Active tab style.
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::TAB_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab style.
    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::TAB_INACTIVE)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Filter input style.
    pub fn filter_input() -> Style {
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Error text style (status line, failed fetches).
    pub fn error() -> Style {
        Style::default().fg(Theme::HIGHLIGHT_CRITICAL)
    }

    /// Help text style.
    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Maps a UI-agnostic [`RowStyleClass`] to a ratatui [`Style`].
    pub fn from_class(class: RowStyleClass) -> Style {
        match class {
            RowStyleClass::Normal => Self::default(),
            RowStyleClass::Warning => Self::warning(),
            RowStyleClass::Critical => Self::critical(),
            RowStyleClass::Active => Self::ok(),
            RowStyleClass::Dimmed => Self::dim(),
            RowStyleClass::Accent => Style::default().fg(Color::Cyan),
        }
    }
}
