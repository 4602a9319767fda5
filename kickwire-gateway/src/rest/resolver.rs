//! Channel name to chatroom ID resolution.

use kickwire_core::error::ResolutionError;
use kickwire_core::types::ChatroomId;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::config::ResolverConfig;
use super::transport::{HttpTransport, ReqwestTransport};

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    #[serde(default)]
    chatroom: Option<ChatroomInfo>,
}

#[derive(Debug, Deserialize)]
struct ChatroomInfo {
    #[serde(default)]
    id: Option<u64>,
}

/// Resolves channel names to chatroom IDs with one GET per call.
///
/// Resolution has no side effects, so it is safe to retry.
#[derive(Clone)]
pub struct ChannelResolver {
    config: ResolverConfig,
    transport: Arc<dyn HttpTransport>,
}

impl ChannelResolver {
    /// Creates a resolver over an injected transport.
    #[must_use]
    pub fn new(config: ResolverConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Creates a resolver over the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::Request` if the HTTP client cannot be created.
    pub fn with_reqwest(config: ResolverConfig) -> Result<Self, ResolutionError> {
        let transport =
            ReqwestTransport::new(config.timeout()).map_err(|e| ResolutionError::Request {
                reason: e.to_string(),
            })?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Looks up the chatroom ID for `channel`.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError` if the request fails, the status is not 200,
    /// the body does not decode, or the chatroom ID is absent or zero.
    pub async fn resolve(&self, channel: &str) -> Result<ChatroomId, ResolutionError> {
        let url = self.config.channel_url(channel);
        debug!(channel = %channel, url = %url, "Resolving chatroom ID");

        let response = self
            .transport
            .get(&url, &self.config.request_headers())
            .await
            .map_err(|e| ResolutionError::Request {
                reason: e.to_string(),
            })?;

        if response.status != 200 {
            return Err(ResolutionError::Status {
                status_code: response.status,
            });
        }

        let info: ChannelInfo =
            serde_json::from_slice(&response.body).map_err(|e| ResolutionError::Decode {
                reason: e.to_string(),
            })?;

        info.chatroom
            .and_then(|chatroom| chatroom.id)
            .and_then(|id| ChatroomId::new(id).ok())
            .ok_or_else(|| ResolutionError::NotFound {
                channel: channel.to_string(),
            })
    }
}

impl std::fmt::Debug for ChannelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelResolver")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
