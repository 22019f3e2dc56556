//! Color theme for the Dial TUI.
//!
//! Kanagawa-ish dark palette with a handful of semantic roles; nothing here
//! is configurable beyond what the widgets need.

use ratatui::style::{Color, Modifier, Style};

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_popup: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_panel: Color::Rgb(31, 31, 40),
            bg_highlight: Color::Rgb(42, 42, 55),
            bg_popup: Color::Rgb(54, 54, 70),
            text_primary: Color::Rgb(220, 215, 186),
            text_secondary: Color::Rgb(200, 192, 147),
            text_muted: Color::Rgb(114, 113, 105),
            text_disabled: Color::Rgb(113, 124, 124),
            primary: Color::Rgb(149, 127, 184),
            accent: Color::Rgb(127, 180, 202),
            success: Color::Rgb(152, 187, 108),
            warning: Color::Rgb(230, 195, 132),
            error: Color::Rgb(255, 93, 98),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

/// Style helpers shared across widgets.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn error(palette: &Palette) -> Style {
        Style::default().fg(palette.error)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }
}
