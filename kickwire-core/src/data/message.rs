//! Chat message data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender identity attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Numeric user identifier
    pub id: u64,
    /// Display username
    pub username: String,
    /// URL-safe slug
    pub slug: String,
}

/// A chat message delivered on a channel.
///
/// The wire payload carries everything except `channel`, which the client
/// stamps with the channel name it was configured for.
///
/// # Examples
///
/// ```
/// use kickwire_core::data::ChatMessage;
///
/// let payload = r#"{
///     "id": "1",
///     "content": "hi",
///     "sender": {"id": 7, "username": "bob", "slug": "bob"},
///     "created_at": "2024-01-01T00:00:00Z"
/// }"#;
///
/// let message = ChatMessage::from_payload(payload, "demo").unwrap();
/// assert_eq!(message.content, "hi");
/// assert_eq!(message.channel, "demo");
/// assert_eq!(message.sender.username, "bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier
    pub id: String,
    /// Text content
    pub content: String,
    /// Channel name the message was received on
    #[serde(default)]
    pub channel: String,
    /// Message author
    pub sender: User,
    /// Creation time reported by the server
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Decodes a chat payload and stamps it with `channel`.
    ///
    /// Any `channel` value present in the payload is overwritten.
    pub fn from_payload(payload: &str, channel: &str) -> serde_json::Result<Self> {
        let mut message: Self = serde_json::from_str(payload)?;
        message.channel = channel.to_string();
        Ok(message)
    }

    /// Decodes a chat payload that arrived as an inline JSON value.
    pub fn from_value(value: serde_json::Value, channel: &str) -> serde_json::Result<Self> {
        let mut message: Self = serde_json::from_value(value)?;
        message.channel = channel.to_string();
        Ok(message)
    }
}
