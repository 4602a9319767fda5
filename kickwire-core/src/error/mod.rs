//! Error types and handling framework.
//!
//! # Error Hierarchy
//!
//! - KickwireError - Top-level error type
//!   - ResolutionError - Channel name to chatroom ID lookup failures
//!   - NetworkError - Socket connect, read, and write failures
//!   - ProtocolError - Errors pushed by the Pusher server
//!   - ConfigError - Configuration errors
//!
//! Only a `ResolutionError` from the very first lookup is ever returned to the
//! caller of `connect`. Everything else is reported through the listener while
//! the client keeps reconnecting.
//!
//! ```
//! use kickwire_core::error::{KickwireError, ResolutionError};
//!
//! let error = KickwireError::from(ResolutionError::Status { status_code: 403 });
//! assert!(error.is_resolution_error());
//! assert!(error.to_string().contains("403"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error severity levels for categorizing errors.
///
/// - `Fatal`: the operation cannot continue
/// - `Recoverable`: the client retries on its own
/// - `Warning`: non-critical, worth logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Unrecoverable error.
    Fatal,

    /// Error that the reconnect loop recovers from.
    #[default]
    Recoverable,

    /// Non-critical issue that should be logged.
    Warning,
}

impl ErrorSeverity {
    /// Returns true if this error is recoverable (not fatal).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }

    /// Returns true if this error is fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Returns the severity as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Recoverable => "RECOVERABLE",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

mod config;
mod network;
mod protocol;
mod resolution;

pub use config::ConfigError;
pub use network::NetworkError;
pub use protocol::ProtocolError;
pub use resolution::ResolutionError;

/// Top-level error type for the Kickwire client.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KickwireError {
    /// Channel resolution error.
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    /// Network-related error.
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Server-side protocol error.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl KickwireError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Resolution(e) => e.severity(),
            Self::Network(e) => e.severity(),
            Self::Protocol(e) => e.severity(),
            Self::Config(e) => e.severity(),
        }
    }

    /// Returns true if this error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }

    /// Returns true if this is a resolution error.
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Returns true if this is a network error.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns true if this is a protocol error.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns true if this is a config error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the error category as a string.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Resolution(_) => "resolution",
            Self::Network(_) => "network",
            Self::Protocol(_) => "protocol",
            Self::Config(_) => "config",
        }
    }

    /// Returns the inner resolution error, if this is a resolution error.
    #[must_use]
    pub fn as_resolution_error(&self) -> Option<&ResolutionError> {
        match self {
            Self::Resolution(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner network error, if this is a network error.
    #[must_use]
    pub fn as_network_error(&self) -> Option<&NetworkError> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner protocol error, if this is a protocol error.
    #[must_use]
    pub fn as_protocol_error(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for Kickwire operations.
pub type Result<T> = std::result::Result<T, KickwireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Fatal.to_string(), "FATAL");
        assert_eq!(ErrorSeverity::Recoverable.to_string(), "RECOVERABLE");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_error_severity_is_recoverable() {
        assert!(!ErrorSeverity::Fatal.is_recoverable());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(ErrorSeverity::Warning.is_recoverable());
    }

    #[test]
    fn test_resolution_error_conversion() {
        let resolution_err = ResolutionError::Status { status_code: 429 };
        let err: KickwireError = resolution_err.clone().into();
        assert!(err.is_resolution_error());
        assert_eq!(err.category(), "resolution");
        assert_eq!(err.as_resolution_error(), Some(&resolution_err));
    }

    #[test]
    fn test_network_error_conversion() {
        let network_err = NetworkError::Timeout { timeout_ms: 5000 };
        let err: KickwireError = network_err.clone().into();
        assert!(err.is_network_error());
        assert_eq!(err.category(), "network");
        assert_eq!(err.as_network_error(), Some(&network_err));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_protocol_error_conversion() {
        let protocol_err = ProtocolError::Server {
            payload: "bad key".to_string(),
        };
        let err: KickwireError = protocol_err.clone().into();
        assert!(err.is_protocol_error());
        assert_eq!(err.category(), "protocol");
        assert_eq!(err.as_protocol_error(), Some(&protocol_err));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: KickwireError = ConfigError::missing_field("channel").into();
        assert!(err.is_config_error());
        assert_eq!(err.category(), "config");
        assert!(err.as_network_error().is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let err = KickwireError::Network(NetworkError::Timeout { timeout_ms: 3000 });
        let json = serde_json::to_string(&err).unwrap();
        let parsed: KickwireError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, parsed);
    }
}
