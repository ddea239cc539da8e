//! The page the dashboard draws into.
//!
//! A [`Page`] is a write-only surface made of a few named regions plus the two
//! browser-level effects the dashboard needs: showing an alert and navigating away.

pub mod state;

use crate::error::Result;
use std::fmt;

pub use state::{Element, ElementContent, PageState};

/// Text shown in a region whose data could not be loaded.
pub const UNAVAILABLE_TEXT: &str = "unavailable";

/// Whether a region holds a single line of text or a list of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    List,
}

/// Named regions of the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    UserName,
    CartItems,
    LatestOrder,
    PastOrders,
}

impl ElementId {
    pub const ALL: [ElementId; 4] = [
        ElementId::UserName,
        ElementId::CartItems,
        ElementId::LatestOrder,
        ElementId::PastOrders,
    ];

    /// Stable identifier used by the host page.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementId::UserName => "userName",
            ElementId::CartItems => "cartItems",
            ElementId::LatestOrder => "latestOrder",
            ElementId::PastOrders => "pastOrders",
        }
    }

    pub fn kind(self) -> ElementKind {
        match self {
            ElementId::UserName | ElementId::LatestOrder => ElementKind::Text,
            ElementId::CartItems | ElementId::PastOrders => ElementKind::List,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-only view of the host page.
pub trait Page {
    /// Replace the text of a text region.
    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()>;

    /// Remove every entry from a list region.
    fn clear_list(&mut self, id: ElementId) -> Result<()>;

    fn append_list_item(&mut self, id: ElementId, text: &str) -> Result<()>;

    /// Put a region into the explicit "could not load" state.
    fn mark_unavailable(&mut self, id: ElementId, reason: &str) -> Result<()>;

    /// Show a blocking, user-visible warning.
    fn alert(&mut self, message: &str) -> Result<()>;

    /// Send the browsing context to `path`.
    fn navigate(&mut self, path: &str) -> Result<()>;
}
