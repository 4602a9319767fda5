//! Shared fixtures: a scripted socket connector and a stub HTTP transport.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream::BoxStream;
use futures::{SinkExt, StreamExt};
use kickwire_core::error::NetworkError;
use kickwire_gateway::rest::{HttpResponse, HttpTransport};
use kickwire_gateway::ws::{
    ChannelListener, ChatClient, ClientConfig, CloseReason, ConnectRequest, SocketConnector, SocketSink,
    SocketSource, WebSocketMessage,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc as tokio_mpsc;

pub const CONNECTION_ESTABLISHED: &str =
    r#"{"event":"pusher:connection_established","data":"{\"socket_id\":\"123.456\",\"activity_timeout\":120}"}"#;

pub fn subscribe_frame(room_id: u64) -> String {
    format!(
        r#"{{"event":"pusher:subscribe","data":{{"auth":"","channel":"chatrooms.{room_id}.v2"}}}}"#
    )
}

pub fn chat_frame(room_id: u64, content: &str, username: &str) -> String {
    let payload = serde_json::json!({
        "id": "9f2c1d7e",
        "chatroom_id": room_id,
        "content": content,
        "type": "message",
        "created_at": "2024-03-01T12:00:00+00:00",
        "sender": { "id": 7, "username": username, "slug": username.to_lowercase() },
    });
    serde_json::json!({
        "event": r"App\Events\ChatMessageEvent",
        "data": payload.to_string(),
        "channel": format!("chatrooms.{room_id}.v2"),
    })
    .to_string()
}

pub fn error_frame(message: &str) -> String {
    serde_json::json!({ "event": "pusher:error", "data": message }).to_string()
}

/// Server end of one scripted socket.
pub struct ServerSocket {
    /// Frames the client wrote.
    pub outbound: BoxStream<'static, WebSocketMessage>,
    inbound: mpsc::UnboundedSender<Result<WebSocketMessage, NetworkError>>,
}

impl ServerSocket {
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self
            .inbound
            .unbounded_send(Ok(WebSocketMessage::text(text)));
    }

    pub fn push(&self, message: WebSocketMessage) {
        let _ = self.inbound.unbounded_send(Ok(message));
    }

    pub fn push_close(&self, code: u16, reason: &str) {
        self.push(WebSocketMessage::Close(Some(CloseReason {
            code,
            reason: reason.to_string(),
        })));
    }

    pub fn fail(&self, reason: &str) {
        let _ = self
            .inbound
            .unbounded_send(Err(NetworkError::websocket(reason)));
    }

    /// Next frame the client wrote, or `None` once the client closed it.
    pub async fn next_text(&mut self) -> Option<String> {
        loop {
            match self.outbound.next().await? {
                WebSocketMessage::Text(text) => return Some(text),
                WebSocketMessage::Close(_) => return None,
                _ => {}
            }
        }
    }
}

/// Connector that hands out pre-queued in-memory sockets, then refuses.
#[derive(Clone)]
pub struct ScriptedConnector {
    sockets: Arc<Mutex<VecDeque<(SocketSink, SocketSource)>>>,
    attempts: Arc<AtomicUsize>,
    requests: tokio_mpsc::UnboundedSender<ConnectRequest>,
}

impl ScriptedConnector {
    pub fn new() -> (Self, tokio_mpsc::UnboundedReceiver<ConnectRequest>) {
        let (requests, rx) = tokio_mpsc::unbounded_channel();
        let connector = Self {
            sockets: Arc::new(Mutex::new(VecDeque::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            requests,
        };
        (connector, rx)
    }

    /// Queues a socket for the next connect and returns its server end.
    pub fn push_session(&self) -> ServerSocket {
        let (out_tx, out_rx) = mpsc::unbounded();
        let (in_tx, in_rx) = mpsc::unbounded();
        let sink: SocketSink =
            Box::pin(out_tx.sink_map_err(|e| NetworkError::websocket(e.to_string())));
        self.sockets.lock().push_back((sink, in_rx.boxed()));
        ServerSocket {
            outbound: out_rx.boxed(),
            inbound: in_tx,
        }
    }

    /// Queues a socket whose writes only complete once the server end reads
    /// them, like a peer that stopped draining its receive window.
    pub fn push_stalled_session(&self) -> ServerSocket {
        let (out_tx, out_rx) = mpsc::channel(0);
        let (in_tx, in_rx) = mpsc::unbounded();
        let sink: SocketSink =
            Box::pin(out_tx.sink_map_err(|e| NetworkError::websocket(e.to_string())));
        self.sockets.lock().push_back((sink, in_rx.boxed()));
        ServerSocket {
            outbound: out_rx.boxed(),
            inbound: in_tx,
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SocketConnector for ScriptedConnector {
    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<(SocketSink, SocketSource), NetworkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let _ = self.requests.send(request.clone());
        self.sockets
            .lock()
            .pop_front()
            .ok_or_else(|| NetworkError::ConnectionFailed {
                reason: "connection refused".to_string(),
            })
    }
}

/// HTTP transport that replays canned responses; the last one repeats.
pub struct StubTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new(responses: impl IntoIterator<Item = (u16, String)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| HttpResponse {
                        status,
                        body: body.into_bytes(),
                    })
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn chatroom(room_id: u64) -> Arc<Self> {
        Self::new([(200, chatroom_body(room_id))])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn chatroom_body(room_id: u64) -> String {
    format!(r#"{{"id":1000,"slug":"demo","chatroom":{{"id":{room_id},"channel_id":1000}}}}"#)
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(String, String)],
    ) -> Result<HttpResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.ok_or_else(|| NetworkError::ConnectionFailed {
            reason: "no scripted response".to_string(),
        })
    }
}

pub fn client(
    transport: &Arc<StubTransport>,
    connector: &ScriptedConnector,
    listener: ChannelListener,
) -> ChatClient {
    let config = ClientConfig::builder().channel("demo").build();
    ChatClient::new(config)
        .expect("valid config")
        .with_http_transport(Arc::clone(transport) as Arc<dyn HttpTransport>)
        .with_connector(connector.clone())
        .with_listener(listener)
}
