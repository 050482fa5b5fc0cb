//! Terminal capability detection and utilities

use evac_planner::domain::Level;
use owo_colors::{colors::css, OwoColorize};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as danger (red)
    fn danger(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn danger(&self) -> String {
        if supports_color() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn danger(&self) -> String {
        self.as_str().danger()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Renders a level label in its display color.
pub fn level_label(level: Level) -> String {
    if !supports_color() {
        return level.label().to_string();
    }
    match level {
        Level::Low => level.label().fg::<css::Green>().to_string(),
        Level::Medium => level.label().fg::<css::Yellow>().to_string(),
        Level::High => level.label().fg::<css::Orange>().to_string(),
        Level::Critical => level.label().fg::<css::Red>().to_string(),
    }
}
