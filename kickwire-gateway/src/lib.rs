//! # Kickwire Gateway
//!
//! Network side of the Kickwire chat client.
//!
//! This crate provides:
//! - Channel resolution over HTTP (`rest`)
//! - A supervised Pusher socket session with heartbeat and fixed-delay
//!   reconnection (`ws`)
//!
//! # Example
//!
//! ```ignore
//! use kickwire_gateway::ws::{ChannelListener, ChatClient, ClientConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ClientConfig::builder().channel("xqc").build();
//! let (listener, mut events) = ChannelListener::new(64);
//! let client = ChatClient::new(config)?.with_listener(listener);
//!
//! let cancel = CancellationToken::new();
//! tokio::spawn(async move { client.connect(cancel).await });
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Channel name resolution over HTTP
pub mod rest;

/// Pusher socket client infrastructure
pub mod ws;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::rest::{ChannelResolver, HttpTransport, ReqwestTransport, ResolverConfig};
    pub use crate::ws::{
        ChannelListener, ChatClient, ChatEvent, ChatListener, ClientConfig, ClientConfigBuilder,
        ConnectionState, SocketConnector, TungsteniteConnector,
    };
}
