//! Socket message types and JSON codec.

use kickwire_core::error::NetworkError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Transport-level socket message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebSocketMessage {
    /// Text message; every Pusher frame is one.
    Text(String),
    /// Binary message.
    Binary(Vec<u8>),
    /// Ping control frame.
    Ping(Vec<u8>),
    /// Pong control frame.
    Pong(Vec<u8>),
    /// Close frame.
    Close(Option<CloseReason>),
}

/// Close frame reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseReason {
    /// Close code.
    pub code: u16,
    /// Close reason text.
    pub reason: String,
}

impl WebSocketMessage {
    /// Creates a text message.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }
}

/// JSON codec for Pusher frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCodec;

impl MessageCodec {
    /// Encodes a value to a JSON text message.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if serialization fails.
    pub fn encode<T: Serialize>(value: &T) -> Result<WebSocketMessage, NetworkError> {
        serde_json::to_string(value)
            .map(WebSocketMessage::Text)
            .map_err(|e| NetworkError::WebSocket {
                reason: format!("Failed to serialize frame: {e}"),
            })
    }

    /// Decodes a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if deserialization fails.
    pub fn decode_str<T: DeserializeOwned>(json: &str) -> Result<T, NetworkError> {
        serde_json::from_str(json).map_err(|e| NetworkError::WebSocket {
            reason: format!("Failed to deserialize frame: {e}"),
        })
    }
}
