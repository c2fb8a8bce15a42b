use ratatui::style::Color;

use crate::model::{ThemeName, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub bar_filled: Color,
    pub bar_empty: Color,
}

impl Theme {
    pub fn night() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            bar_filled: Color::Rgb(0x44, 0xFF, 0x88),
            bar_empty: Color::Rgb(0x3A, 0x35, 0x5C),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xF8, 0xF5),
            text: Color::Rgb(0x3B, 0x37, 0x4A),
            text_bright: Color::Rgb(0x10, 0x0E, 0x18),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8E, 0x8A, 0x9C),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            selection_bg: Color::Rgb(0xEC, 0xE4, 0xF2),
            selection_border: Color::Rgb(0xC2, 0x18, 0x5B),
            bar_filled: Color::Rgb(0x2E, 0x7D, 0x32),
            bar_empty: Color::Rgb(0xD8, 0xD4, 0xE0),
        }
    }

    /// Built-in palette for a theme name
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Night => Theme::night(),
            ThemeName::Light => Theme::light(),
        }
    }

    /// Built-in palette with `[ui.colors]` overrides applied on top
    pub fn from_config(name: ThemeName, ui: &UiConfig) -> Self {
        let mut theme = Theme::named(name);

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "green" => theme.green = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "bar_filled" => theme.bar_filled = color,
                    "bar_empty" => theme.bar_empty = color,
                    _ => {}
                }
            }
        }

        theme
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
