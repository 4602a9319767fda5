//! One socket session: dial, subscribe, heartbeat, read until it breaks.

use futures::{SinkExt, StreamExt};
use kickwire_core::error::{KickwireError, NetworkError};
use kickwire_core::types::ChatroomId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::config::ClientConfig;
use super::dispatcher::FrameDispatcher;
use super::frame::OutboundFrame;
use super::heartbeat::run_heartbeat;
use super::listener::ChatListener;
use super::message::{MessageCodec, WebSocketMessage};
use super::state::{ConnectionState, StateTracker};
use super::transport::{ConnectRequest, SocketConnector, SocketSink, SocketSource};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Write half of a live socket plus the session's closed signal.
///
/// Every write goes through one lock, so frames never interleave. Once
/// closed, the handle rejects writes and stays closed.
pub struct SessionHandle {
    sink: Mutex<Option<SocketSink>>,
    closed: CancellationToken,
}

impl SessionHandle {
    /// Wraps the write half of a freshly connected socket.
    #[must_use]
    pub fn new(sink: SocketSink) -> Self {
        Self {
            sink: Mutex::new(Some(sink)),
            closed: CancellationToken::new(),
        }
    }

    /// Writes one message.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::ConnectionClosed` after `close`, or the
    /// transport's error if the write fails. A write still pending when the
    /// handle closes is abandoned and fails the same way.
    pub async fn send(&self, message: WebSocketMessage) -> Result<(), NetworkError> {
        tokio::select! {
            biased;
            () = self.closed.cancelled() => Err(NetworkError::closed("session closed")),
            result = self.write(message) => result,
        }
    }

    async fn write(&self, message: WebSocketMessage) -> Result<(), NetworkError> {
        let mut guard = self.sink.lock().await;
        let sink = guard
            .as_mut()
            .ok_or_else(|| NetworkError::closed("session closed"))?;
        sink.send(message).await
    }

    /// Encodes and writes one outbound frame.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if encoding or the write fails.
    pub async fn send_frame(&self, frame: &OutboundFrame) -> Result<(), NetworkError> {
        self.send(MessageCodec::encode(frame)?).await
    }

    /// Closes the socket. Later calls are no-ops.
    pub async fn close(&self) {
        self.closed.cancel();
        let sink = match timeout(CLOSE_TIMEOUT, self.sink.lock()).await {
            Ok(mut guard) => guard.take(),
            Err(_) => {
                debug!("Socket lock still held, leaving the sink to be dropped");
                return;
            }
        };
        if let Some(mut sink) = sink {
            match timeout(CLOSE_TIMEOUT, sink.close()).await {
                Ok(Ok(())) => debug!("Socket closed"),
                Ok(Err(e)) => debug!(error = %e, "Socket close failed"),
                Err(_) => debug!("Socket close timed out"),
            }
        }
    }

    /// Returns true once `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Completes when the handle is closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// How a session ended.
#[derive(Debug)]
pub(crate) enum SessionEnd {
    /// The outer cancellation fired.
    Cancelled,
    /// The socket failed or was dropped by the server.
    Failed(KickwireError),
}

pub(crate) struct SocketSession<'a> {
    pub config: &'a ClientConfig,
    pub connector: &'a dyn SocketConnector,
    pub listener: &'a dyn ChatListener,
    pub state: &'a StateTracker,
}

impl SocketSession<'_> {
    /// Runs one session to completion.
    ///
    /// The heartbeat and cancellation watcher are joined before this returns.
    pub async fn run(&self, room_id: ChatroomId, cancel: &CancellationToken) -> SessionEnd {
        self.state.transition(ConnectionState::Connecting);

        let request = ConnectRequest {
            url: self.config.socket_url(),
            user_agent: self.config.api.user_agent.clone(),
            timeout: self.config.connect_timeout(),
        };

        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => return SessionEnd::Cancelled,
            result = self.connector.connect(&request) => result,
        };

        let (sink, mut source) = match connected {
            Ok(halves) => halves,
            Err(e) => {
                self.state.transition(ConnectionState::Idle);
                return SessionEnd::Failed(e.into());
            }
        };

        let handle = Arc::new(SessionHandle::new(sink));
        let _closed_on_drop = handle.closed.clone().drop_guard();
        let watcher = tokio::spawn(watch_cancellation(Arc::clone(&handle), cancel.clone()));

        let reason = self
            .subscribe_and_read(room_id, &handle, &mut source, cancel)
            .await;

        self.state.transition(ConnectionState::Closing);
        handle.close().await;
        if let Err(e) = watcher.await {
            warn!(error = %e, "Cancellation watcher failed");
        }
        drop(source);

        if cancel.is_cancelled() {
            debug!(channel = %self.config.channel, "Session cancelled");
            return SessionEnd::Cancelled;
        }

        self.state.transition(ConnectionState::Idle);
        SessionEnd::Failed(reason.into())
    }

    /// Subscribes, starts the heartbeat, and reads until the session breaks.
    /// Returns why it broke.
    async fn subscribe_and_read(
        &self,
        room_id: ChatroomId,
        handle: &Arc<SessionHandle>,
        source: &mut SocketSource,
        cancel: &CancellationToken,
    ) -> NetworkError {
        let subscribe = OutboundFrame::subscribe(room_id.subscription_channel());
        if let Err(e) = handle.send_frame(&subscribe).await {
            return e;
        }

        self.state.transition(ConnectionState::Subscribed);
        info!(
            channel = %self.config.channel,
            room_id = room_id.get(),
            "Subscribed to chatroom"
        );

        let heartbeat_token = cancel.child_token();
        let heartbeat = tokio::spawn(run_heartbeat(
            Arc::clone(handle),
            self.config.heartbeat_interval(),
            heartbeat_token.clone(),
        ));

        let reason = {
            let _stop_heartbeat = heartbeat_token.drop_guard();
            self.read_loop(handle, source).await
        };

        match heartbeat.await {
            Ok(outcome) => debug!(?outcome, "Heartbeat stopped"),
            Err(e) => warn!(error = %e, "Heartbeat task failed"),
        }

        reason
    }

    async fn read_loop(&self, handle: &SessionHandle, source: &mut SocketSource) -> NetworkError {
        let dispatcher = FrameDispatcher::new(self.config.channel.as_str());

        loop {
            let next = tokio::select! {
                biased;
                () = handle.closed() => return NetworkError::closed("session closed"),
                next = source.next() => next,
            };

            match next {
                Some(Ok(WebSocketMessage::Text(raw))) => {
                    self.state.record_message();
                    dispatcher.dispatch(&raw, handle, self.listener).await;
                }
                Some(Ok(WebSocketMessage::Close(reason))) => {
                    return NetworkError::closed(reason.map_or_else(
                        || "server sent close frame".to_string(),
                        |r| format!("server sent close frame {}: {}", r.code, r.reason),
                    ));
                }
                Some(Ok(other)) => trace!(?other, "Ignoring non-text frame"),
                Some(Err(e)) => return e,
                None => return NetworkError::closed("stream ended"),
            }
        }
    }
}

async fn watch_cancellation(handle: Arc<SessionHandle>, cancel: CancellationToken) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("Cancellation requested, closing session");
            handle.close().await;
        }
        () = handle.closed() => {}
    }
}
