//! Light and dark palettes for the board.

use clap::ValueEnum;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors used by the renderer. Each theme is a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Color,
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub badge: Color,
    pub danger: Color,
    pub speaking: Color,
}

pub const THEME_LIGHT: ThemeColors = ThemeColors {
    background: Color::Rgb(248, 249, 252),
    border: Color::Rgb(74, 144, 226),
    title: Color::Rgb(44, 110, 196),
    text: Color::Rgb(40, 44, 52),
    muted: Color::Rgb(120, 126, 140),
    accent: Color::Rgb(53, 122, 189),
    selected_fg: Color::Rgb(255, 255, 255),
    selected_bg: Color::Rgb(74, 144, 226),
    badge: Color::Rgb(230, 126, 34),
    danger: Color::Rgb(214, 48, 49),
    speaking: Color::Rgb(39, 174, 96),
};

pub const THEME_DARK: ThemeColors = ThemeColors {
    background: Color::Rgb(24, 26, 32),
    border: Color::Rgb(100, 160, 240),
    title: Color::Rgb(130, 180, 250),
    text: Color::Rgb(220, 222, 228),
    muted: Color::Rgb(140, 146, 160),
    accent: Color::Rgb(100, 160, 240),
    selected_fg: Color::Rgb(24, 26, 32),
    selected_bg: Color::Rgb(130, 180, 250),
    badge: Color::Rgb(243, 156, 18),
    danger: Color::Rgb(255, 99, 99),
    speaking: Color::Rgb(80, 220, 140),
};

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Light => THEME_LIGHT,
            Theme::Dark => THEME_DARK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the toggle hint: the theme a press would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_themes() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn palettes_differ() {
        assert_ne!(Theme::Light.colors(), Theme::Dark.colors());
        assert_eq!(Theme::default(), Theme::Light);
    }
}
