//! Terminal rendering components.
//!
//! This module hosts the concrete terminal UI implementation along with the renderer
//! trait and styling utilities.

pub mod renderer;
pub mod terminal;
pub mod theme;

pub use renderer::UIRenderer;
pub use terminal::{draw_page, TerminalUI};
pub use theme::ColorTheme;

#[cfg(test)]
pub use renderer::tests::MockUIRenderer;
