//! Authentication subsystem.
//!
//! The dashboard never talks to an identity provider directly. It subscribes to an
//! [`AuthProvider`] and reacts to session-present / session-absent notifications.

pub mod firebase;
pub mod provider;
pub mod session;

pub use firebase::FirebaseAuth;
pub use provider::{subscribe_channel, AuthProvider, SessionHandler, SessionHub, SubscriptionId};
pub use session::Session;
