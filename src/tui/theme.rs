//! TUI theming support.
//!
//! The `Theme` struct defines the color palette for the browser and review
//! screens. Dark and light palettes are available, plus automatic detection
//! from the terminal environment.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub danger: Color,
    pub dim: Color,
    pub normal: Color,
}

impl Theme {
    /// High-contrast dark theme (default).
    ///
    /// Palette:
    /// - Primary: Green (list text, headers, borders)
    /// - Accent: Cyan (the part of a path below the scanned directory)
    /// - Danger: Red (errors, delete prompts)
    /// - Dim: DarkGray (deleted entries, footer)
    /// - Normal: White (popup text)
    pub fn dark() -> Self {
        Self {
            primary: Color::Green,
            accent: Color::Cyan,
            danger: Color::Red,
            dim: Color::DarkGray,
            normal: Color::White,
        }
    }

    /// High-contrast light theme.
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Magenta,
            danger: Color::Red,
            dim: Color::Gray,
            normal: Color::Black,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Theme for a configured mode.
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::auto(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Check if this is a light theme.
    pub fn is_light(&self) -> bool {
        self.normal == Color::Black
    }

    /// Style for ordinary list lines.
    pub fn text(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Style for the highlighted tail of a member path.
    pub fn highlight(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for deleted entries.
    pub fn tombstone(&self) -> Style {
        Style::default()
            .fg(self.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    }
}

/// Simple heuristic to detect if the terminal is light-themed.
fn is_light_terminal() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .is_some_and(colorfgbg_is_light)
}

/// `COLORFGBG` is "fg;bg" (rxvt, xterm, konsole); 0=black, 7=gray, 8=dark gray, 15=white.
fn colorfgbg_is_light(value: &str) -> bool {
    value
        .split(';')
        .last()
        .and_then(|bg| bg.parse::<u32>().ok())
        .is_some_and(|bg| bg >= 7 && bg != 8)
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg() {
        assert!(colorfgbg_is_light("0;15"));
        assert!(colorfgbg_is_light("0;7"));
        assert!(!colorfgbg_is_light("15;0"));
        assert!(!colorfgbg_is_light("15;8"));
        assert!(!colorfgbg_is_light("garbage"));
    }

    #[test]
    fn test_from_mode() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark), Theme::dark());
        assert!(Theme::from_mode(ThemeMode::Light).is_light());
        assert!(!Theme::dark().is_light());
    }

    #[test]
    fn test_dark_is_green() {
        assert_eq!(Theme::dark().text().fg, Some(Color::Green));
    }
}
