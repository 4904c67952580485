use std::io::IsTerminal;

use crossterm::style::{style, Color, Stylize};

/// When to emit colour escape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Parse a `--color` value; anything unrecognised is treated as `auto`.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "always" => ColorMode::Always,
            "never" => ColorMode::Never,
            _ => ColorMode::Auto,
        }
    }
}

/// Whether the current process should colour its stdout.
///
/// `NO_COLOR` (any non-empty value) disables colour; otherwise colour is used
/// only when stdout is a terminal.
pub fn detect_color_support() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Semantic colour of a report element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Browser with a minimum supported version.
    Supported,
    /// Browser that is never supported.
    NotSupported,
    /// Browser without a policy entry.
    Unknown,
}

/// Colour palette for the report.
#[derive(Debug, Clone)]
pub struct Theme {
    pub enabled: bool,
    pub supported: Color,
    pub not_supported: Color,
    pub unknown: Color,
}

impl Theme {
    /// Coloured theme using the standard green / red / yellow palette.
    pub fn colored() -> Self {
        Self {
            enabled: true,
            supported: Color::Green,
            not_supported: Color::Red,
            unknown: Color::Yellow,
        }
    }

    /// Theme that leaves text untouched.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::colored()
        }
    }

    /// Resolve a theme for the given mode.
    pub fn for_mode(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => detect_color_support(),
        };
        if enabled {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Supported => self.supported,
            Tone::NotSupported => self.not_supported,
            Tone::Unknown => self.unknown,
        }
    }

    /// Wrap `text` in the tone's colour codes, or return it unchanged when
    /// colour is disabled.
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if self.enabled {
            style(text).with(self.color(tone)).to_string()
        } else {
            text.to_string()
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
