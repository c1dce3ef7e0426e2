//! Color constants and shared styles for the club TUI.

use ratatui::prelude::*;

pub const TITLE_COLOR: Color = Color::Cyan;
pub const MUTED: Color = Color::Gray;
pub const INDEX_COLOR: Color = Color::DarkGray;
pub const ROW_ALT_BG: Color = Color::Indexed(235);
pub const STATUS_BAR_BG: Color = Color::Indexed(236);
pub const STATUS_KEY_COLOR: Color = Color::Cyan;
pub const FLASH_SUCCESS: Color = Color::Green;
pub const FLASH_ERROR: Color = Color::Red;
pub const WIN_COLOR: Color = Color::Green;
pub const LOSS_COLOR: Color = Color::Red;
pub const FORM_LABEL: Color = Color::Cyan;
pub const FORM_ERROR: Color = Color::Red;

pub fn header_style() -> Style {
    Style::new().add_modifier(Modifier::BOLD)
}

pub fn row_selected() -> Style {
    Style::new().add_modifier(Modifier::REVERSED)
}

pub fn focused_field() -> Style {
    Style::new().fg(Color::Black).bg(Color::Cyan)
}

/// Traffic-light color for a win rate percentage.
pub fn win_rate_color(percent: f64) -> Color {
    if percent >= 60.0 {
        Color::Green
    } else if percent >= 40.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
