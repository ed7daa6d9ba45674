use ratatui::style::Color;

use crate::model::task::Priority;
use crate::model::view::TimeOfDay;
use crate::model::UiConfig;

/// Colour palette for one light/dark mode
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub red: Color,
    pub yellow: Color,
    pub cyan: Color,
    pub green: Color,
    /// Greeting and gauge colour, shifts with the time of day
    pub accent: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x12, 0x12, 0x1C),
            text: Color::Rgb(0xD8, 0xD6, 0xF0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6E, 0x6B, 0x8F),
            highlight: Color::Rgb(0xA2, 0x9B, 0xFE),
            selection_bg: Color::Rgb(0x2A, 0x27, 0x45),
            red: Color::Rgb(0xFF, 0x6B, 0x6B),
            yellow: Color::Rgb(0xFE, 0xCA, 0x57),
            cyan: Color::Rgb(0x48, 0xDB, 0xFB),
            green: Color::Rgb(0x1D, 0xD1, 0xA1),
            accent: Color::Rgb(0xA2, 0x9B, 0xFE),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xF7, 0xF6, 0xFB),
            text: Color::Rgb(0x2D, 0x34, 0x36),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            dim: Color::Rgb(0x9A, 0x98, 0xAE),
            highlight: Color::Rgb(0x6C, 0x5C, 0xE7),
            selection_bg: Color::Rgb(0xE4, 0xE1, 0xF7),
            red: Color::Rgb(0xE0, 0x4F, 0x4F),
            yellow: Color::Rgb(0xD9, 0x9A, 0x00),
            cyan: Color::Rgb(0x0A, 0x9F, 0xC4),
            green: Color::Rgb(0x00, 0x9E, 0x78),
            accent: Color::Rgb(0x6C, 0x5C, 0xE7),
        }
    }

    /// Palette for the mode and time of day, with `[ui.colors]` overrides
    pub fn resolve(dark: bool, time_of_day: TimeOfDay, ui: &UiConfig) -> Self {
        let mut theme = if dark { Theme::dark() } else { Theme::light() };
        theme.accent = match time_of_day {
            TimeOfDay::Morning => theme.yellow,
            TimeOfDay::Afternoon => theme.cyan,
            TimeOfDay::Evening => theme.red,
            TimeOfDay::Night => theme.highlight,
        };

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "dim" => theme.dim = color,
                "highlight" => theme.highlight = color,
                "selection_bg" => theme.selection_bg = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "cyan" => theme.cyan = color,
                "green" => theme.green = color,
                "accent" => theme.accent = color,
                _ => {}
            }
        }
        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.cyan,
        }
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
