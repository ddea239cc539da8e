//! Color theme and styling definitions using ratatui colors
//!
//! This module provides color themes for terminal rendering using ratatui's
//! color system directly to avoid unnecessary abstractions.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    /// Region borders and titles
    pub border: Style,

    /// Region content
    pub text: Style,

    /// Regions still showing their empty initial state
    pub placeholder: Style,

    /// Regions in the "unavailable" state
    pub unavailable: Style,

    /// Alert banner
    pub alert: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Cyan),
            text: Style::default(),
            placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            unavailable: Style::default().fg(Color::Red),
            alert: Style::default().fg(Color::Black).bg(Color::Yellow),
            status_bg: Color::Blue,
            status_fg: Color::White,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            border: Style::default(),
            text: Style::default(),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            unavailable: Style::default().add_modifier(Modifier::BOLD),
            alert: Style::default().add_modifier(Modifier::REVERSED),
            status_bg: Color::Black,
            status_fg: Color::White,
        }
    }
}
