//! Channel API configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the channel lookup endpoint.
///
/// The browser-like headers only reduce the odds of bot-mitigation blocks;
/// their values carry no protocol meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Base URL of the channel-info endpoint; the channel name is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent sent on the lookup and on the socket upgrade.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Additional headers sent with the lookup.
    #[serde(default = "default_headers")]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    "https://kick.com/api/v1/channels".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string()
}

fn default_headers() -> HashMap<String, String> {
    [
        ("Accept", "application/json, text/plain, */*"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Referer", "https://kick.com/"),
        ("Origin", "https://kick.com"),
        (
            "Sec-Ch-Ua",
            r#""Chromium";v="122", "Not(A:Brand";v="24", "Google Chrome";v="122""#,
        ),
        ("Sec-Ch-Ua-Mobile", "?0"),
        ("Sec-Ch-Ua-Platform", r#""Windows""#),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            headers: default_headers(),
        }
    }
}

impl ResolverConfig {
    /// Creates a new builder for `ResolverConfig`.
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds the lookup URL for a channel.
    #[must_use]
    pub fn channel_url(&self, channel: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), channel)
    }

    /// Returns every header sent with a lookup, user agent first, the rest
    /// sorted by name.
    #[must_use]
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut extra: Vec<_> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("user-agent"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        extra.sort();

        let mut headers = Vec::with_capacity(extra.len() + 1);
        headers.push(("User-Agent".to_string(), self.user_agent.clone()));
        headers.extend(extra);
        headers
    }
}

/// Builder for `ResolverConfig`.
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
}

impl ResolverConfigBuilder {
    /// Sets the channel-info base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Adds or replaces a header on top of the browser defaults.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builds the `ResolverConfig`.
    #[must_use]
    pub fn build(self) -> ResolverConfig {
        let mut headers = default_headers();
        headers.extend(self.headers);
        ResolverConfig {
            base_url: self.base_url.unwrap_or_else(default_base_url),
            timeout_ms: self.timeout_ms.unwrap_or_else(default_timeout_ms),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            headers,
        }
    }
}
