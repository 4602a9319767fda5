//! Pusher socket client infrastructure.
//!
//! Provides the chat client and the pieces it is built from:
//! - Fixed-delay reconnection around one socket session at a time
//! - Subscribe handshake and periodic `pusher:ping` heartbeat
//! - Inbound frame classification and dispatch to a [`ChatListener`]
//! - Explicit connection state machine, observable through a watch channel
//! - Injectable socket transport, `tokio-tungstenite` by default
//!
//! # Example
//!
//! ```ignore
//! use kickwire_gateway::ws::{ChannelListener, ChatClient, ClientConfig};
//!
//! let config = ClientConfig::builder().channel("xqc").build();
//! let (listener, mut events) = ChannelListener::new(64);
//! let client = ChatClient::new(config)?.with_listener(listener);
//! ```

mod client;
mod config;
mod dispatcher;
mod frame;
mod heartbeat;
mod listener;
mod message;
mod session;
mod state;
mod transport;

pub use client::ChatClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use dispatcher::{Dispatch, FrameDispatcher};
pub use frame::{InboundEnvelope, OutboundFrame};
pub use heartbeat::{HeartbeatOutcome, run_heartbeat};
pub use listener::{ChannelListener, ChatEvent, ChatListener, NoopListener};
pub use message::{CloseReason, MessageCodec, WebSocketMessage};
pub use session::SessionHandle;
pub use state::{ConnectionState, ConnectionStats};
pub use transport::{ConnectRequest, SocketConnector, SocketSink, SocketSource, TungsteniteConnector};

/// Pusher event names.
pub mod events {
    pub use super::frame::{
        CHAT_MESSAGE, CONNECTION_ESTABLISHED, ERROR, PONG, SUBSCRIPTION_SUCCEEDED,
    };
}
