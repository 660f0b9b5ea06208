//! Theme and styling configuration.

use ratatui::style::Color;

/// Colour tokens handed out to category values when no palette is configured.
pub const DEFAULT_PALETTE: &[&str] = &[
    "blue",
    "green",
    "magenta",
    "yellow",
    "cyan",
    "red",
    "lightblue",
    "lightgreen",
    "lightmagenta",
    "lightyellow",
];

/// Color theme for the application.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent for focused borders and active values.
    pub accent: Color,
    /// Dimmed text such as placeholders and hints.
    pub muted: Color,
    /// Highlight color for selected items.
    pub highlight: Color,
    /// Text drawn on top of coloured chips.
    pub chip_fg: Color,
    /// Chip background when a value's colour token cannot be parsed.
    pub chip_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Indexed(99),
            muted: Color::DarkGray,
            highlight: Color::Cyan,
            chip_fg: Color::Black,
            chip_bg: Color::Gray,
        }
    }
}

/// Format a count with thousands separators, e.g. `1234567` as `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(100000), "100,000");
    }

    #[test]
    fn test_default_palette_tokens_parse() {
        use std::str::FromStr;
        for token in DEFAULT_PALETTE {
            assert!(Color::from_str(token).is_ok(), "{token} should parse");
        }
    }
}
