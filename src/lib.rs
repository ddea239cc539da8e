//! # orderdash - Order Dashboard Client
//!
//! Signs a user in through Firebase Authentication and renders their profile name,
//! latest order and order history from a Firebase Realtime Database.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Injected service configuration
//! - [`auth`] - Sessions and the session-change subscription capability
//! - [`store`] - Point reads over the hierarchical database
//! - [`model`] - Stored entities
//! - [`page`] - The write-only page the dashboard draws into
//! - [`render`] - Render passes, fetch tasks and the terminal front end
//! - [`app`] - Application core and component coordination

pub mod config;
pub mod error;

pub mod auth;
pub mod model;
pub mod page;
pub mod store;

pub mod app;
pub mod render;

pub use error::{DashError, Result};

pub use app::Application;
pub use auth::{AuthProvider, FirebaseAuth, Session, SessionHub};
pub use config::{DashboardConfig, FirebaseConfig};
pub use page::{ElementId, Page, PageState};
pub use render::DashboardRenderer;
pub use store::{DataStore, DbPath, MemoryStore, RestDataStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
