//! Injectable socket transport.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{Sink, SinkExt, StreamExt, future};
use kickwire_core::error::NetworkError;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as TungsteniteError;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::USER_AGENT;
use tokio_tungstenite::tungstenite::protocol::Message as TungsteniteMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::debug;

use super::message::{CloseReason, WebSocketMessage};

/// Write half of a socket.
pub type SocketSink = Pin<Box<dyn Sink<WebSocketMessage, Error = NetworkError> + Send>>;

/// Read half of a socket.
pub type SocketSource = BoxStream<'static, Result<WebSocketMessage, NetworkError>>;

/// Parameters for one socket dial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Socket endpoint.
    pub url: String,
    /// User agent sent on the upgrade request.
    pub user_agent: String,
    /// Upper bound on the dial and handshake.
    pub timeout: Duration,
}

/// Opens sockets for sessions.
#[async_trait]
pub trait SocketConnector: Send + Sync {
    /// Dials the endpoint and returns its write and read halves.
    async fn connect(&self, request: &ConnectRequest)
    -> Result<(SocketSink, SocketSource), NetworkError>;
}

/// Default connector over `tokio-tungstenite` with rustls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl SocketConnector for TungsteniteConnector {
    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<(SocketSink, SocketSource), NetworkError> {
        let mut upgrade = request.url.as_str().into_client_request().map_err(|e| {
            NetworkError::ConnectionFailed {
                reason: format!("Invalid socket URL: {e}"),
            }
        })?;
        let user_agent = HeaderValue::from_str(&request.user_agent).map_err(|e| {
            NetworkError::ConnectionFailed {
                reason: format!("Invalid user agent: {e}"),
            }
        })?;
        upgrade.headers_mut().insert(USER_AGENT, user_agent);

        let (ws_stream, _) = timeout(request.timeout, connect_async(upgrade))
            .await
            .map_err(|_| NetworkError::Timeout {
                timeout_ms: u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        debug!(url = %request.url, "Socket connected");

        let (sink, stream) = ws_stream.split();

        let sink: SocketSink = Box::pin(
            sink.with(|msg: WebSocketMessage| {
                future::ready(Ok::<_, TungsteniteError>(to_tungstenite_message(msg)))
            })
            .sink_map_err(|e| NetworkError::WebSocket {
                reason: e.to_string(),
            }),
        );

        let source: SocketSource = stream
            .filter_map(|result| {
                future::ready(match result {
                    Ok(msg) => from_tungstenite_message(msg).map(Ok),
                    Err(e) => Some(Err(NetworkError::WebSocket {
                        reason: e.to_string(),
                    })),
                })
            })
            .boxed();

        Ok((sink, source))
    }
}

fn to_tungstenite_message(msg: WebSocketMessage) -> TungsteniteMessage {
    match msg {
        WebSocketMessage::Text(s) => TungsteniteMessage::Text(s),
        WebSocketMessage::Binary(b) => TungsteniteMessage::Binary(b),
        WebSocketMessage::Ping(b) => TungsteniteMessage::Ping(b),
        WebSocketMessage::Pong(b) => TungsteniteMessage::Pong(b),
        WebSocketMessage::Close(reason) => TungsteniteMessage::Close(reason.map(|r| CloseFrame {
            code: CloseCode::from(r.code),
            reason: r.reason.into(),
        })),
    }
}

fn from_tungstenite_message(msg: TungsteniteMessage) -> Option<WebSocketMessage> {
    match msg {
        TungsteniteMessage::Text(s) => Some(WebSocketMessage::Text(s)),
        TungsteniteMessage::Binary(b) => Some(WebSocketMessage::Binary(b)),
        TungsteniteMessage::Ping(b) => Some(WebSocketMessage::Ping(b)),
        TungsteniteMessage::Pong(b) => Some(WebSocketMessage::Pong(b)),
        TungsteniteMessage::Close(frame) => {
            Some(WebSocketMessage::Close(frame.map(|f| CloseReason {
                code: f.code.into(),
                reason: f.reason.to_string(),
            })))
        }
        TungsteniteMessage::Frame(_) => None,
    }
}
