//! Caller-facing event hooks.

use async_trait::async_trait;
use kickwire_core::data::ChatMessage;
use kickwire_core::error::KickwireError;
use tokio::sync::mpsc;
use tracing::debug;

/// Receives chat messages and errors from a running client.
///
/// Hooks run on the session's read loop, so a slow hook delays the next
/// frame.
#[async_trait]
pub trait ChatListener: Send + Sync {
    /// Called for every decoded chat message.
    async fn on_message(&self, message: ChatMessage);

    /// Called for every failure the client recovers from on its own.
    async fn on_error(&self, error: KickwireError);
}

/// Listener that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

#[async_trait]
impl ChatListener for NoopListener {
    async fn on_message(&self, _message: ChatMessage) {}

    async fn on_error(&self, _error: KickwireError) {}
}

/// Event forwarded by [`ChannelListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A chat message arrived.
    Message(ChatMessage),
    /// The client hit a recoverable error.
    Error(KickwireError),
}

/// Listener that forwards events into a bounded mpsc channel.
///
/// When the receiver is dropped, events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::Sender<ChatEvent>,
}

impl ChannelListener {
    /// Creates a listener and the receiver that drains it.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    async fn forward(&self, event: ChatEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("Chat event receiver dropped, discarding event");
        }
    }
}

#[async_trait]
impl ChatListener for ChannelListener {
    async fn on_message(&self, message: ChatMessage) {
        self.forward(ChatEvent::Message(message)).await;
    }

    async fn on_error(&self, error: KickwireError) {
        self.forward(ChatEvent::Error(error)).await;
    }
}
