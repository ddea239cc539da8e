//! UI renderer trait
//!
//! This module defines the `UIRenderer` trait for drawing the dashboard page and
//! managing lifecycle hooks such as initialization and cleanup.

use crate::error::Result;
use crate::page::PageState;

/// Core trait for drawing the dashboard
pub trait UIRenderer {
    /// Draw the current page state
    ///
    /// Called after every change the renderer applies, so it should redraw the
    /// whole page rather than patch it.
    fn render(&mut self, page: &PageState) -> Result<()>;

    /// Initialize the terminal UI
    ///
    /// This method should:
    /// - Set up raw mode
    /// - Enter the alternate screen
    fn initialize(&mut self) -> Result<()>;

    /// Clean up and restore terminal state
    fn cleanup(&mut self) -> Result<()>;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Mock UI renderer for testing
    ///
    /// Keeps the last page it was asked to draw.
    #[derive(Default)]
    pub struct MockUIRenderer {
        pub render_count: usize,
        pub is_initialized: bool,
        pub last_page: Option<PageState>,
    }

    impl MockUIRenderer {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl UIRenderer for MockUIRenderer {
        fn render(&mut self, page: &PageState) -> Result<()> {
            self.render_count += 1;
            self.last_page = Some(page.clone());
            Ok(())
        }

        fn initialize(&mut self) -> Result<()> {
            self.is_initialized = true;
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            self.is_initialized = false;
            Ok(())
        }
    }

    #[test]
    fn test_mock_renderer_basic() {
        let mut renderer = MockUIRenderer::new();
        let page = PageState::new();

        assert!(!renderer.is_initialized);
        renderer.initialize().unwrap();
        assert!(renderer.is_initialized);

        assert_eq!(renderer.render_count, 0);
        renderer.render(&page).unwrap();
        assert_eq!(renderer.render_count, 1);
        assert_eq!(renderer.last_page.as_ref(), Some(&page));

        renderer.cleanup().unwrap();
        assert!(!renderer.is_initialized);
    }
}
