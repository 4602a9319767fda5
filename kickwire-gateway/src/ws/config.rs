//! Chat client configuration.

use kickwire_core::config::{Configurable, Validatable};
use kickwire_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::rest::ResolverConfig;

/// Configuration for a chat client.
///
/// Contains the channel to follow, Pusher application settings, the channel
/// API settings, and reconnection and heartbeat timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Channel name (slug) to follow.
    #[serde(default)]
    pub channel: String,

    /// Pusher application key.
    #[serde(default = "default_app_key")]
    pub app_key: String,

    /// Pusher cluster, e.g. `us2`.
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Channel API settings.
    #[serde(default)]
    pub api: ResolverConfig,

    /// Fixed delay between reconnection attempts in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Heartbeat interval in milliseconds.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Socket connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_app_key() -> String {
    "32cbd69e4b950bf97679".to_string()
}

fn default_cluster() -> String {
    "us2".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            app_key: default_app_key(),
            cluster: default_cluster(),
            api: ResolverConfig::default(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Creates a new builder for `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Returns the socket endpoint for the configured cluster and key.
    #[must_use]
    pub fn socket_url(&self) -> String {
        format!(
            "wss://ws-{}.pusher.com/app/{}?protocol=7&client=js&version=8.4.0&flash=false",
            self.cluster, self.app_key
        )
    }

    /// Returns the reconnect delay as a Duration.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Returns the heartbeat interval as a Duration.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Validatable for ClientConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.is_empty() {
            return Err(ConfigError::missing_field("channel"));
        }
        if self.channel.contains('/') || self.channel.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_value(
                "channel",
                "must not contain '/' or whitespace",
            ));
        }
        if self.app_key.is_empty() {
            return Err(ConfigError::missing_field("app_key"));
        }
        if self.cluster.is_empty() {
            return Err(ConfigError::missing_field("cluster"));
        }
        if self.api.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "base_url".to_string(),
                section: Some("api".to_string()),
            });
        }
        for (field, value) in [
            ("reconnect_delay_ms", self.reconnect_delay_ms),
            ("heartbeat_interval_ms", self.heartbeat_interval_ms),
            ("connect_timeout_ms", self.connect_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(field, "must be greater than 0"));
            }
        }
        Ok(())
    }
}

fn parse_millis(name: String, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
        name,
        reason: format!("expected milliseconds, got '{raw}'"),
    })
}

impl Configurable for ClientConfig {
    fn apply_overrides(
        &mut self,
        prefix: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(channel) = lookup(&format!("{prefix}_CHANNEL")) {
            self.channel = channel;
        }
        if let Some(app_key) = lookup(&format!("{prefix}_APP_KEY")) {
            self.app_key = app_key;
        }
        if let Some(cluster) = lookup(&format!("{prefix}_CLUSTER")) {
            self.cluster = cluster;
        }
        if let Some(base_url) = lookup(&format!("{prefix}_API_BASE_URL")) {
            self.api.base_url = base_url;
        }

        let name = format!("{prefix}_RECONNECT_DELAY_MS");
        if let Some(raw) = lookup(&name) {
            self.reconnect_delay_ms = parse_millis(name, &raw)?;
        }
        let name = format!("{prefix}_HEARTBEAT_INTERVAL_MS");
        if let Some(raw) = lookup(&name) {
            self.heartbeat_interval_ms = parse_millis(name, &raw)?;
        }
        Ok(())
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        [
            "CHANNEL",
            "APP_KEY",
            "CLUSTER",
            "API_BASE_URL",
            "RECONNECT_DELAY_MS",
            "HEARTBEAT_INTERVAL_MS",
        ]
        .iter()
        .map(|suffix| format!("{prefix}_{suffix}"))
        .collect()
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the channel name.
    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.config.channel = channel.into();
        self
    }

    /// Sets the Pusher application key.
    #[must_use]
    pub fn app_key(mut self, key: impl Into<String>) -> Self {
        self.config.app_key = key.into();
        self
    }

    /// Sets the Pusher cluster.
    #[must_use]
    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.config.cluster = cluster.into();
        self
    }

    /// Replaces the channel API settings.
    #[must_use]
    pub fn api(mut self, api: ResolverConfig) -> Self {
        self.config.api = api;
        self
    }

    /// Sets the channel API base URL.
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    /// Sets the user agent for both the lookup and the socket upgrade.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.api.user_agent = user_agent.into();
        self
    }

    /// Sets the fixed reconnect delay.
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.config.reconnect_delay_ms = duration_ms(delay);
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval_ms = duration_ms(interval);
        self
    }

    /// Sets the socket connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = duration_ms(timeout);
        self
    }

    /// Builds the `ClientConfig`.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
