//! Pusher protocol error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the Pusher server over an open socket.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolError {
    /// The server pushed a `pusher:error` frame.
    #[error("[Protocol] Server error (invalid app key?): {payload}")]
    Server {
        /// Error payload as sent by the server.
        payload: String,
    },
}

impl ProtocolError {
    /// Returns the severity level of this error.
    ///
    /// Server errors close the socket and go through the normal reconnect path.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Recoverable
    }

    /// Returns the server payload.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Server { payload } => payload,
        }
    }
}
