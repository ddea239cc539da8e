//! Error types and handling infrastructure for orderdash.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! library error types, while the binary layers `anyhow` context on top.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: Errors should name the key or endpoint involved
//! - **Context preservation**: Keep the underlying transport or decode error as a source
//! - **Consistency**: Standardized Result type across all modules

use thiserror::Error;

/// The main error type for orderdash operations.
#[derive(Error, Debug)]
pub enum DashError {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Identity provider rejected the sign-in or returned an unusable response
    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    /// Transport level failure talking to a remote service
    #[error("Network request failed: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The data store answered with a non-success status
    #[error("Data store read of '{path}' failed with status {status}: {message}")]
    StoreError {
        path: String,
        status: u16,
        message: String,
    },

    /// A stored value did not have the expected shape
    #[error("Unexpected data at '{path}': {source}")]
    DecodeError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A database key that the store would reject
    #[error("Invalid database path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A page write the element does not accept
    #[error("Page element '{element}' rejected the write: {message}")]
    PageError { element: String, message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// File system errors while loading configuration or driving the terminal
    #[error("IO operation failed: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Standard Result type for orderdash operations.
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an AuthError with a descriptive message
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    /// Wrap a reqwest error with the operation that was attempted
    pub fn network(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::NetworkError {
            message: message.into(),
            source,
        }
    }

    pub fn store(path: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::StoreError {
            path: path.into(),
            status,
            message: message.into(),
        }
    }

    pub fn decode(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::DecodeError {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn page(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PageError {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::IoError {
            message: message.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let store_err = DashError::store("orders/u1/latest", 401, "Permission denied");
        assert_eq!(
            store_err.to_string(),
            "Data store read of 'orders/u1/latest' failed with status 401: Permission denied"
        );

        let path_err = DashError::invalid_path("users/a.b", "segment contains '.'");
        assert_eq!(
            path_err.to_string(),
            "Invalid database path 'users/a.b': segment contains '.'"
        );

        let page_err = DashError::page("cartItems", "Text element, not List");
        assert_eq!(
            page_err.to_string(),
            "Page element 'cartItems' rejected the write: Text element, not List"
        );

        let auth_err = DashError::auth("INVALID_PASSWORD");
        assert_eq!(auth_err.to_string(), "Authentication failed: INVALID_PASSWORD");
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = serde_json::from_str::<u32>("\"text\"").unwrap_err();
        let err = DashError::decode("users/u1", source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Unexpected data at 'users/u1'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let dash_err: DashError = io_err.into();

        match dash_err {
            DashError::IoError { message, .. } => assert_eq!(message, "File not found"),
            other => panic!("Expected IoError variant, got {other:?}"),
        }
    }
}
