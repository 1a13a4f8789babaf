//! Error types for the viewer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the viewer core and its adapters.
///
/// Host adapters (windowing, webview, notifications) convert their own
/// failures into the `Host`, `Storage` or `Notification` variants so the
/// lifecycle code can log them uniformly.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ViewerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// A URL could not be parsed
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A load was refused by the session policy
    #[error("Blocked scheme '{scheme}' for {url}")]
    BlockedScheme { scheme: String, url: String },

    /// An operation needed the main window but none exists
    #[error("Main window is not open")]
    NoMainWindow,

    /// The native window/webview layer reported a failure
    #[error("Host error: {0}")]
    Host(String),

    /// Cache or storage eviction failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Native notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ViewerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidUrl error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a Host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the session policy refused this load
    pub fn is_blocked_scheme(&self) -> bool {
        matches!(self, Self::BlockedScheme { .. })
    }

    /// Check if the error came from the missing main window
    pub fn is_no_main_window(&self) -> bool {
        matches!(self, Self::NoMainWindow)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ViewerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ViewerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ViewerError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: String::new(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ViewerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_kind() {
        let err: ViewerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_toml_error_is_tagged() {
        let err: ViewerError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        match err {
            ViewerError::Serialization { format, .. } => assert_eq!(format, "TOML"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
