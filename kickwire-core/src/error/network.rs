//! Network-related error types.
//!
//! Errors for the socket side of a session: dialing, reading, writing, and
//! the server closing the connection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Network error type covering socket connect failures, timeouts, and
/// WebSocket read/write errors.
///
/// # Examples
///
/// ```
/// use kickwire_core::error::NetworkError;
///
/// let error = NetworkError::ConnectionFailed {
///     reason: "Connection refused".to_string(),
/// };
/// assert!(error.to_string().contains("Connection refused"));
/// assert!(error.is_recoverable());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkError {
    /// Connection to remote host failed.
    #[error("[Network] Connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for the connection failure.
        reason: String,
    },

    /// Connection timed out.
    #[error("[Network] Connection timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// WebSocket error occurred.
    #[error("[Network] WebSocket error: {reason}")]
    WebSocket {
        /// Reason for the WebSocket error.
        reason: String,
    },

    /// Connection was closed.
    #[error("[Network] Connection closed: {reason}")]
    ConnectionClosed {
        /// Reason for the connection closure.
        reason: String,
    },
}

impl NetworkError {
    /// Returns true if this error is recoverable (can be retried).
    ///
    /// Every socket failure is retried by the reconnect loop.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Recoverable
    }

    /// Creates a connection closed error.
    #[must_use]
    pub fn closed(reason: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
        }
    }

    /// Creates a WebSocket error.
    #[must_use]
    pub fn websocket(reason: impl Into<String>) -> Self {
        Self::WebSocket {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout() {
        let error = NetworkError::Timeout { timeout_ms: 5000 };
        assert!(error.to_string().contains("5000ms"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_closed_helper() {
        let error = NetworkError::closed("server sent close frame");
        assert_eq!(
            error.to_string(),
            "[Network] Connection closed: server sent close frame"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let error = NetworkError::websocket("reset by peer");
        let json = serde_json::to_string(&error).unwrap();
        let parsed: NetworkError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, parsed);
    }
}
