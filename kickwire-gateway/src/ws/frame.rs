//! Pusher frame shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event sent by the server once the socket is accepted.
pub const CONNECTION_ESTABLISHED: &str = "pusher:connection_established";
/// Event carrying a server-side error.
pub const ERROR: &str = "pusher:error";
/// Reply to a client ping.
pub const PONG: &str = "pusher:pong";
/// Subscription acknowledgement.
pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";
/// Chat message event.
pub const CHAT_MESSAGE: &str = r"App\Events\ChatMessageEvent";

/// Frames written by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundFrame {
    /// Subscribe to a public channel.
    #[serde(rename = "pusher:subscribe")]
    Subscribe {
        /// Always empty for public channels.
        auth: String,
        /// Channel to subscribe to.
        channel: String,
    },
    /// Keep-alive ping.
    #[serde(rename = "pusher:ping")]
    Ping {},
}

impl OutboundFrame {
    /// Subscribe frame for a public channel.
    #[must_use]
    pub fn subscribe(channel: impl Into<String>) -> Self {
        Self::Subscribe {
            auth: String::new(),
            channel: channel.into(),
        }
    }
}

/// Envelope of every inbound frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundEnvelope {
    /// Event name.
    pub event: String,
    /// Payload, usually a JSON document encoded as a string.
    #[serde(default)]
    pub data: Option<Value>,
    /// Channel the event was published on, if any.
    #[serde(default)]
    pub channel: Option<String>,
}
