//! Injectable HTTP transport for channel lookups.

use async_trait::async_trait;
use kickwire_core::error::NetworkError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// HTTP transport used to perform channel lookups.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET request with the given headers.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn get(&self, url: &str, headers: &[(String, String)])
    -> Result<HttpResponse, NetworkError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    fn map_error(&self, e: &reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            NetworkError::ConnectionFailed {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, NetworkError> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| self.map_error(&e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(&e))?;

        debug!(url = %url, status, bytes = body.len(), "Channel lookup response");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
