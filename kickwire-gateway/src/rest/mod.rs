//! Channel resolution infrastructure.
//!
//! Translates a channel name into the numeric chatroom ID the socket
//! subscribes to. The HTTP side sits behind [`HttpTransport`] so callers can
//! inject their own client; [`ReqwestTransport`] is the default.
//!
//! # Example
//!
//! ```ignore
//! use kickwire_gateway::rest::{ChannelResolver, ResolverConfig};
//!
//! let resolver = ChannelResolver::with_reqwest(ResolverConfig::default())?;
//! let room_id = resolver.resolve("xqc").await?;
//! ```

mod config;
mod resolver;
mod transport;

pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use resolver::ChannelResolver;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
