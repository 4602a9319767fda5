//! Channel resolution error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to translate a channel name into a chatroom ID.
///
/// The status code is preserved so callers can tell bot-mitigation blocks
/// (403, 429) apart from channels that do not exist (404).
///
/// # Examples
///
/// ```
/// use kickwire_core::error::ResolutionError;
///
/// let error = ResolutionError::Status { status_code: 403 };
/// assert!(error.is_blocked());
/// assert_eq!(error.status_code(), Some(403));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionError {
    /// The HTTP request itself failed.
    #[error("[Resolution] Request failed: {reason}")]
    Request {
        /// Reason for the request failure.
        reason: String,
    },

    /// The channel API answered with a non-success status.
    #[error("[Resolution] Channel API returned status {status_code}")]
    Status {
        /// HTTP status code.
        status_code: u16,
    },

    /// The response body was not the expected JSON document.
    #[error("[Resolution] Failed to decode channel response: {reason}")]
    Decode {
        /// Decoder error message.
        reason: String,
    },

    /// The response carried no chatroom ID (absent or zero).
    #[error("[Resolution] Chatroom ID not found for channel '{channel}'")]
    NotFound {
        /// Channel that was looked up.
        channel: String,
    },
}

impl ResolutionError {
    /// Returns the HTTP status code, if the failure carried one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status_code } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns true if the status suggests bot-mitigation or rate limiting.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Status { status_code: 403 | 429 })
    }

    /// Returns the severity level of this error.
    ///
    /// Resolution is only fatal before the first session; later lookups are
    /// best-effort and reuse the cached ID.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        use super::ErrorSeverity;
        match self {
            Self::Request { .. } => ErrorSeverity::Recoverable,
            Self::Status { status_code } if *status_code >= 500 || *status_code == 429 => {
                ErrorSeverity::Recoverable
            }
            Self::Status { .. } | Self::Decode { .. } | Self::NotFound { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }
}
