// Theme system for the TUI
//
// Two built-in palettes selected by name from config.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Colors for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,
    pub title: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub status_bar: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::Reset,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_type: BorderType::Rounded,
            title: Color::Yellow,
            highlight: Color::Cyan,
            selection_bg: Color::Rgb(40, 44, 52),
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            status_bar: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::Rgb(250, 250, 245),
            foreground: Color::Rgb(40, 40, 40),
            muted: Color::Rgb(130, 130, 130),
            border: Color::Rgb(180, 180, 170),
            border_type: BorderType::Plain,
            title: Color::Rgb(150, 90, 0),
            highlight: Color::Rgb(0, 110, 150),
            selection_bg: Color::Rgb(225, 235, 240),
            success: Color::Rgb(30, 130, 50),
            warning: Color::Rgb(180, 120, 0),
            error: Color::Rgb(190, 30, 30),
            info: Color::Rgb(30, 80, 170),
            status_bar: Color::Rgb(110, 110, 110),
        }
    }

    /// Look up a theme by config name; unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "Unknown theme, using dark");
                Self::dark()
            }
        }
    }
}
