//! Chat client with channel resolution and fixed-delay reconnection.

use kickwire_core::config::Validatable;
use kickwire_core::error::{ConfigError, KickwireError, ResolutionError};
use kickwire_core::types::ChatroomId;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::ClientConfig;
use super::listener::{ChatListener, NoopListener};
use super::session::{SessionEnd, SocketSession};
use super::state::{ConnectionState, ConnectionStats, StateTracker};
use super::transport::{SocketConnector, TungsteniteConnector};
use crate::rest::{ChannelResolver, HttpTransport, ReqwestTransport};

/// Resilient chat client for one channel.
///
/// # Features
///
/// - Chatroom ID lookup before the first session and after every failure
/// - Subscribe handshake and periodic heartbeat per session
/// - Unlimited reconnection with a fixed delay
/// - Observable connection state and statistics
///
/// # Example
///
/// ```ignore
/// use kickwire_gateway::ws::{ChatClient, ClientConfig};
/// use tokio_util::sync::CancellationToken;
///
/// let config = ClientConfig::builder().channel("xqc").build();
/// let client = ChatClient::new(config)?.with_listener(MyListener);
/// client.connect(CancellationToken::new()).await?;
/// ```
pub struct ChatClient {
    config: ClientConfig,
    resolver: ChannelResolver,
    connector: Arc<dyn SocketConnector>,
    listener: Arc<dyn ChatListener>,
    state: StateTracker,
    room_id: RwLock<Option<ChatroomId>>,
    running: AtomicBool,
}

impl ChatClient {
    /// Creates a client with the default HTTP and socket transports.
    ///
    /// # Errors
    ///
    /// Returns `KickwireError::Config` if the configuration is invalid, or
    /// `KickwireError::Network` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, KickwireError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.api.timeout())?;
        Ok(Self::with_transports(config, Arc::new(transport)))
    }

    fn with_transports(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            resolver: ChannelResolver::new(config.api.clone(), transport),
            config,
            connector: Arc::new(TungsteniteConnector),
            listener: Arc::new(NoopListener),
            state: StateTracker::new(),
            room_id: RwLock::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Replaces the HTTP transport used for chatroom lookups.
    #[must_use]
    pub fn with_http_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.resolver = ChannelResolver::new(self.config.api.clone(), transport);
        self
    }

    /// Replaces the socket connector.
    #[must_use]
    pub fn with_connector(mut self, connector: impl SocketConnector + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Sets the listener.
    #[must_use]
    pub fn with_listener(mut self, listener: impl ChatListener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    /// Sets the listener. Requires exclusive access, so it cannot happen
    /// while `connect` is running.
    pub fn set_listener(&mut self, listener: impl ChatListener + 'static) {
        self.listener = Arc::new(listener);
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.state()
    }

    /// Returns a receiver that observes every state transition.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the connection statistics.
    #[must_use]
    pub fn stats(&self) -> ConnectionStats {
        self.state.stats()
    }

    /// Returns the last resolved chatroom ID.
    #[must_use]
    pub fn room_id(&self) -> Option<ChatroomId> {
        *self.room_id.read()
    }

    /// Returns true while `connect` is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Looks up the chatroom ID and caches it on success.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError` if the lookup fails; the cache is untouched.
    pub async fn resolve(&self) -> Result<ChatroomId, ResolutionError> {
        let room_id = self.resolver.resolve(&self.config.channel).await?;
        *self.room_id.write() = Some(room_id);
        self.state.record_resolution();
        Ok(room_id)
    }

    /// Connects and keeps the subscription alive until `cancel` fires.
    ///
    /// Returns `Ok(())` once cancelled. Every failure after the first
    /// successful lookup is reported to the listener and retried after the
    /// configured delay.
    ///
    /// # Errors
    ///
    /// Returns `KickwireError::Resolution` if the first lookup fails, or
    /// `KickwireError::Config` if this client is already connected.
    pub async fn connect(&self, cancel: CancellationToken) -> Result<(), KickwireError> {
        let _running = RunningGuard::acquire(&self.running).ok_or_else(|| {
            ConfigError::AlreadyRunning {
                channel: self.config.channel.clone(),
            }
        })?;

        self.state.transition(ConnectionState::Resolving);
        let mut room_id = match self.resolve().await {
            Ok(room_id) => room_id,
            Err(e) => {
                self.state.transition(ConnectionState::Terminated);
                return Err(e.into());
            }
        };
        info!(
            channel = %self.config.channel,
            room_id = room_id.get(),
            "Chatroom resolved"
        );

        let session = SocketSession {
            config: &self.config,
            connector: self.connector.as_ref(),
            listener: self.listener.as_ref(),
            state: &self.state,
        };

        while !cancel.is_cancelled() {
            let error = match session.run(room_id, &cancel).await {
                SessionEnd::Cancelled => break,
                SessionEnd::Failed(error) => error,
            };

            let attempt = self.state.record_reconnect();
            let delay = self.config.reconnect_delay();
            warn!(
                channel = %self.config.channel,
                attempt,
                delay_ms = self.config.reconnect_delay_ms,
                error = %error,
                "Session ended, reconnecting"
            );
            self.listener.on_error(error).await;

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }

            self.state.transition(ConnectionState::Resolving);
            let resolved = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                resolved = self.resolve() => resolved,
            };
            match resolved {
                Ok(resolved) => room_id = resolved,
                Err(e) => warn!(
                    channel = %self.config.channel,
                    room_id = room_id.get(),
                    error = %e,
                    "Re-resolution failed, reusing cached chatroom ID"
                ),
            }
        }

        self.state.transition(ConnectionState::Terminated);
        info!(channel = %self.config.channel, "Chat client stopped");
        Ok(())
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("channel", &self.config.channel)
            .field("state", &self.state())
            .field("room_id", &self.room_id())
            .finish_non_exhaustive()
    }
}

/// Clears the running flag when `connect` returns or unwinds.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::HttpResponse;
    use crate::ws::listener::ChannelListener;
    use crate::ws::transport::{ConnectRequest, SocketSink, SocketSource};
    use async_trait::async_trait;
    use kickwire_core::error::NetworkError;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct FixedTransport(u16, &'static str);

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn get(
            &self,
            _url: &str,
            _headers: &[(String, String)],
        ) -> Result<HttpResponse, NetworkError> {
            Ok(HttpResponse {
                status: self.0,
                body: self.1.as_bytes().to_vec(),
            })
        }
    }

    /// Answers the first lookup, then never answers again.
    #[derive(Default)]
    struct StallingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpTransport for StallingTransport {
        async fn get(
            &self,
            _url: &str,
            _headers: &[(String, String)],
        ) -> Result<HttpResponse, NetworkError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                futures::future::pending::<()>().await;
            }
            Ok(HttpResponse {
                status: 200,
                body: br#"{"chatroom":{"id":42}}"#.to_vec(),
            })
        }
    }

    /// Dial that never completes.
    #[derive(Clone, Default)]
    struct HangingConnector {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SocketConnector for HangingConnector {
        async fn connect(
            &self,
            _request: &ConnectRequest,
        ) -> Result<(SocketSink, SocketSource), NetworkError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            futures::future::pending().await
        }
    }

    #[derive(Clone, Default)]
    struct RefusingConnector {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SocketConnector for RefusingConnector {
        async fn connect(
            &self,
            _request: &ConnectRequest,
        ) -> Result<(SocketSink, SocketSource), NetworkError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NetworkError::ConnectionFailed {
                reason: "refused".to_string(),
            })
        }
    }

    fn client(status: u16, body: &'static str) -> ChatClient {
        let config = ClientConfig::builder().channel("demo").build();
        ChatClient::new(config)
            .unwrap()
            .with_http_transport(Arc::new(FixedTransport(status, body)))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ChatClient::new(ClientConfig::default()).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_initial_state() {
        let client = client(200, r#"{"chatroom":{"id":42}}"#);
        assert_eq!(client.state(), ConnectionState::Idle);
        assert_eq!(client.room_id(), None);
        assert!(!client.is_running());
        assert_eq!(client.stats(), ConnectionStats::default());
    }

    #[tokio::test]
    async fn test_resolve_caches_room_id() {
        let client = client(200, r#"{"chatroom":{"id":42}}"#);
        let room_id = client.resolve().await.unwrap();
        assert_eq!(room_id.get(), 42);
        assert_eq!(client.room_id(), Some(room_id));
        assert_eq!(client.stats().successful_resolutions, 1);
    }

    #[tokio::test]
    async fn test_initial_resolution_failure_is_returned() {
        let connector = RefusingConnector::default();
        let client = client(404, "").with_connector(connector.clone());

        let err = client.connect(CancellationToken::new()).await.unwrap_err();
        assert_eq!(
            err.as_resolution_error().and_then(ResolutionError::status_code),
            Some(404)
        );
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
        assert_eq!(client.state(), ConnectionState::Terminated);
        assert!(!client.is_running());
    }

    #[tokio::test]
    async fn test_cancelled_before_first_session() {
        let connector = RefusingConnector::default();
        let client = client(200, r#"{"chatroom":{"id":42}}"#).with_connector(connector.clone());

        let cancel = CancellationToken::new();
        cancel.cancel();
        client.connect(cancel).await.unwrap();

        assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
        assert_eq!(client.state(), ConnectionState::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_handshake() {
        let connector = HangingConnector::default();
        let (listener, mut events) = ChannelListener::new(16);
        let client = Arc::new(
            client(200, r#"{"chatroom":{"id":42}}"#)
                .with_connector(connector.clone())
                .with_listener(listener),
        );
        let mut states = client.subscribe_state();
        let cancel = CancellationToken::new();

        let task = {
            let client = Arc::clone(&client);
            let cancel = cancel.clone();
            tokio::spawn(async move { client.connect(cancel).await })
        };

        states
            .wait_for(|state| *state == ConnectionState::Connecting)
            .await
            .unwrap();
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);

        cancel.cancel();
        task.await.unwrap().unwrap();

        assert_eq!(client.state(), ConnectionState::Terminated);
        assert_eq!(client.stats().reconnect_attempts, 0);
        assert!(client.stats().last_connected.is_none());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_re_resolution() {
        let transport = Arc::new(StallingTransport::default());
        let connector = RefusingConnector::default();
        let client = Arc::new(
            ChatClient::new(ClientConfig::builder().channel("demo").build())
                .unwrap()
                .with_http_transport(Arc::clone(&transport) as Arc<dyn HttpTransport>)
                .with_connector(connector.clone()),
        );
        let cancel = CancellationToken::new();

        let task = {
            let client = Arc::clone(&client);
            let cancel = cancel.clone();
            tokio::spawn(async move { client.connect(cancel).await })
        };

        // First session is refused; the lookup after the delay hangs.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.state(), ConnectionState::Resolving);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("connect returned")
            .unwrap()
            .unwrap();
        assert_eq!(client.state(), ConnectionState::Terminated);
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_connect_is_rejected_while_running() {
        let connector = RefusingConnector::default();
        let client = Arc::new(
            client(200, r#"{"chatroom":{"id":42}}"#).with_connector(connector.clone()),
        );
        let cancel = CancellationToken::new();

        let task = {
            let client = Arc::clone(&client);
            let cancel = cancel.clone();
            tokio::spawn(async move { client.connect(cancel).await })
        };

        while connector.attempts.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(client.is_running());

        let err = client.connect(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            KickwireError::Config(ConfigError::AlreadyRunning { ref channel }) if channel == "demo"
        ));

        cancel.cancel();
        task.await.unwrap().unwrap();
        assert!(!client.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failures_retry_with_fixed_delay() {
        let connector = RefusingConnector::default();
        let client = Arc::new(
            client(200, r#"{"chatroom":{"id":42}}"#).with_connector(connector.clone()),
        );
        let cancel = CancellationToken::new();

        let task = {
            let client = Arc::clone(&client);
            let cancel = cancel.clone();
            tokio::spawn(async move { client.connect(cancel).await })
        };

        // Attempts at t=0, 5s, 10s, 15s.
        tokio::time::sleep(Duration::from_millis(15_500)).await;
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 4);
        assert_eq!(client.stats().reconnect_attempts, 4);
        assert_eq!(client.stats().successful_resolutions, 4);

        cancel.cancel();
        task.await.unwrap().unwrap();
        assert_eq!(client.state(), ConnectionState::Terminated);
    }
}
