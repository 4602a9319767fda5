//! Inbound frame classification and dispatch.

use kickwire_core::data::ChatMessage;
use kickwire_core::error::ProtocolError;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::frame::{self, InboundEnvelope};
use super::listener::ChatListener;
use super::message::MessageCodec;
use super::session::SessionHandle;

/// What an inbound frame turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The server accepted the socket.
    ConnectionEstablished,
    /// The subscription was acknowledged.
    SubscriptionSucceeded,
    /// Reply to a heartbeat.
    Pong,
    /// The server reported an error; the session must be dropped.
    ServerError(ProtocolError),
    /// A decoded chat message.
    Chat(ChatMessage),
    /// Unknown event or a frame that failed to decode.
    Ignored,
}

/// Routes inbound frames for one channel.
#[derive(Debug, Clone)]
pub struct FrameDispatcher {
    channel: String,
}

impl FrameDispatcher {
    /// Creates a dispatcher that stamps decoded messages with `channel`.
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// Classifies a raw text frame without side effects.
    #[must_use]
    pub fn classify(&self, raw: &str) -> Dispatch {
        let envelope: InboundEnvelope = match MessageCodec::decode_str(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                trace!(error = %e, "Dropping malformed frame");
                return Dispatch::Ignored;
            }
        };

        match envelope.event.as_str() {
            frame::CONNECTION_ESTABLISHED => Dispatch::ConnectionEstablished,
            frame::SUBSCRIPTION_SUCCEEDED => Dispatch::SubscriptionSucceeded,
            frame::PONG => Dispatch::Pong,
            frame::ERROR => Dispatch::ServerError(ProtocolError::Server {
                payload: error_payload(envelope.data),
            }),
            frame::CHAT_MESSAGE => self.decode_chat(envelope.data),
            other => {
                trace!(event = %other, "Ignoring event");
                Dispatch::Ignored
            }
        }
    }

    /// Classifies `raw` and acts on it.
    ///
    /// A decoded message moves straight into the listener. A server error is
    /// reported to the listener and then closes `handle`, which ends the
    /// session's read loop.
    pub async fn dispatch(&self, raw: &str, handle: &SessionHandle, listener: &dyn ChatListener) {
        match self.classify(raw) {
            Dispatch::ConnectionEstablished => debug!("Connection established"),
            Dispatch::SubscriptionSucceeded => {
                debug!(channel = %self.channel, "Subscription succeeded");
            }
            Dispatch::Pong => trace!("Pong received"),
            Dispatch::ServerError(error) => {
                warn!(channel = %self.channel, payload = %error.payload(), "Server error");
                listener.on_error(error.into()).await;
                handle.close().await;
            }
            Dispatch::Chat(message) => listener.on_message(message).await,
            Dispatch::Ignored => {}
        }
    }

    fn decode_chat(&self, data: Option<Value>) -> Dispatch {
        let decoded = match data {
            Some(Value::String(payload)) => ChatMessage::from_payload(&payload, &self.channel),
            Some(value @ Value::Object(_)) => ChatMessage::from_value(value, &self.channel),
            _ => {
                trace!("Chat event without payload");
                return Dispatch::Ignored;
            }
        };

        match decoded {
            Ok(message) => Dispatch::Chat(message),
            Err(e) => {
                trace!(error = %e, "Dropping undecodable chat payload");
                Dispatch::Ignored
            }
        }
    }
}

/// Renders the payload of an error frame for display.
fn error_payload(data: Option<Value>) -> String {
    let value = match data {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(nested @ Value::Object(_)) => nested,
            _ => return text,
        },
        Some(other) => other,
    };

    match value.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => value.to_string(),
    }
}
