//! Error types for the catalog synchronization layer.
//!
//! Remote failures carry the runtime's own message so the coordinator can
//! translate it into a user-facing notification.

use thiserror::Error;

/// Main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The runtime answered with a non-success status.
    #[error("Runtime returned {status}: {message}")]
    Remote { status: u16, message: String },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Transport failures without a known deadline. Clients that know their
/// timeout use [`CatalogError::from_reqwest`] instead.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network {
            message: err.to_string(),
            cause: err.url().map(|u| u.to_string()),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Config {
            message: format!("Invalid runtime URL: {}", err),
        }
    }
}

impl CatalogError {
    /// Map a reqwest failure, reporting timeouts against `timeout`.
    pub fn from_reqwest(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(timeout)
        } else {
            CatalogError::from(err)
        }
    }

    /// The raw message reported by the backend.
    ///
    /// For runtime responses this is the body's `message` field; for
    /// everything else it is the error's display text.
    pub fn backend_message(&self) -> String {
        match self {
            CatalogError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Check if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network { .. } | CatalogError::Timeout(_) => true,
            CatalogError::Remote { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_prefers_remote_body() {
        let err = CatalogError::Remote {
            status: 400,
            message: "rename /a: directory not empty".to_string(),
        };
        assert_eq!(err.backend_message(), "rename /a: directory not empty");
    }

    #[test]
    fn test_backend_message_falls_back_to_display() {
        let err = CatalogError::Other("connection reset".to_string());
        assert_eq!(err.backend_message(), "connection reset");

        let err = CatalogError::Network {
            message: "refused".to_string(),
            cause: None,
        };
        assert_eq!(err.backend_message(), "Network error: refused");
    }

    #[test]
    fn test_retryable() {
        assert!(CatalogError::Timeout(std::time::Duration::from_secs(1)).is_retryable());
        assert!(CatalogError::Remote {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!CatalogError::Remote {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!CatalogError::InvalidPath("x".into()).is_retryable());
    }
}
