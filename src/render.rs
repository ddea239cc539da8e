//! Rendering subsystem.
//!
//! `protocol` holds the messages exchanged with fetch tasks, `fetch` runs the
//! reads, `format` produces display strings, `service` owns the render state
//! machine and `ui` draws a [`PageState`](crate::page::PageState) in the terminal.

pub mod fetch;
pub mod format;
pub mod protocol;
pub mod service;
pub mod ui;

pub use protocol::{FetchKind, FetchOutcome, FetchResponse, RegionData, RenderGeneration};
pub use service::{DashboardRenderer, RenderState, LOGIN_WARNING};
