//! Connection state management.

#![allow(clippy::redundant_pub_crate)]

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Lifecycle state of a chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Not connected; between sessions or before the first one.
    #[default]
    Idle,
    /// Looking up the chatroom ID.
    Resolving,
    /// Dialing the socket and sending the subscribe frame.
    Connecting,
    /// Subscribed and reading frames.
    Subscribed,
    /// Tearing the current session down.
    Closing,
    /// `connect` has returned.
    Terminated,
}

impl ConnectionState {
    /// Returns true if `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use ConnectionState::{Closing, Connecting, Idle, Resolving, Subscribed, Terminated};
        matches!(
            (self, next),
            (Idle, Resolving | Connecting | Terminated)
                | (Resolving, Connecting | Idle | Terminated)
                | (Connecting, Subscribed | Closing | Idle | Terminated)
                | (Subscribed, Closing)
                | (Closing, Idle | Terminated)
                | (Terminated, Resolving | Idle)
        )
    }

    /// Returns true if a subscription is live.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed)
    }

    /// Returns true if the client is between stable states.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Resolving | Self::Connecting | Self::Closing)
    }

    /// Returns true if no session is running.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Idle | Self::Terminated)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Resolving => write!(f, "Resolving"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Subscribed => write!(f, "Subscribed"),
            Self::Closing => write!(f, "Closing"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Snapshot of connection statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStats {
    /// Sessions that ended in failure and were retried.
    pub reconnect_attempts: u32,
    /// Successful chatroom ID lookups.
    pub successful_resolutions: u32,
    /// When the last subscription went live.
    pub last_connected: Option<Instant>,
    /// When the last inbound frame arrived.
    pub last_message: Option<Instant>,
}

#[derive(Debug, Default)]
pub(crate) struct InternalState {
    pub state: ConnectionState,
    pub stats: ConnectionStats,
}

/// Shared state of one client, observable through a watch channel.
#[derive(Debug)]
pub(crate) struct StateTracker {
    inner: RwLock<InternalState>,
    tx: watch::Sender<ConnectionState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::Idle);
        Self {
            inner: RwLock::new(InternalState::default()),
            tx,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.read().state
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }

    pub fn stats(&self) -> ConnectionStats {
        self.inner.read().stats
    }

    /// Moves to `next`. Unexpected transitions are logged and applied anyway.
    pub fn transition(&self, next: ConnectionState) {
        let mut inner = self.inner.write();
        let current = inner.state;
        if current == next {
            return;
        }
        if current.can_transition_to(next) {
            debug!(from = %current, to = %next, "Connection state changed");
        } else {
            warn!(from = %current, to = %next, "Unexpected connection state transition");
        }
        inner.state = next;
        if next.is_subscribed() {
            inner.stats.last_connected = Some(Instant::now());
        }
        drop(inner);
        self.tx.send_replace(next);
    }

    pub fn record_resolution(&self) {
        self.inner.write().stats.successful_resolutions += 1;
    }

    pub fn record_reconnect(&self) -> u32 {
        let mut inner = self.inner.write();
        inner.stats.reconnect_attempts += 1;
        inner.stats.reconnect_attempts
    }

    pub fn record_message(&self) {
        self.inner.write().stats.last_message = Some(Instant::now());
    }
}
