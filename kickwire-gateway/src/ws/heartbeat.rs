//! Periodic keep-alive pings.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::frame::OutboundFrame;
use super::session::SessionHandle;

/// Outcome of the heartbeat loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    /// The session token was cancelled.
    Cancelled,
    /// A ping could not be written.
    WriteFailed,
}

/// Sends `pusher:ping` through `handle` every `interval`.
///
/// The first ping goes out one interval after start. Runs until `cancel`
/// fires or a write fails; a ping stuck on a stalled socket does not delay
/// cancellation.
pub async fn run_heartbeat(
    handle: Arc<SessionHandle>,
    interval: Duration,
    cancel: CancellationToken,
) -> HeartbeatOutcome {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return HeartbeatOutcome::Cancelled,
            _ = ticker.tick() => {
                let sent = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return HeartbeatOutcome::Cancelled,
                    sent = handle.send_frame(&OutboundFrame::Ping {}) => sent,
                };
                if let Err(e) = sent {
                    debug!(error = %e, "Heartbeat write failed");
                    return HeartbeatOutcome::WriteFailed;
                }
                trace!("Ping sent");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::message::WebSocketMessage;
    use crate::ws::transport::SocketSink;
    use futures::channel::mpsc;
    use futures::{SinkExt, StreamExt};
    use kickwire_core::error::NetworkError;

    const PING: &str = r#"{"event":"pusher:ping","data":{}}"#;

    fn handle() -> (Arc<SessionHandle>, mpsc::UnboundedReceiver<WebSocketMessage>) {
        let (tx, rx) = mpsc::unbounded();
        let sink: SocketSink =
            Box::pin(tx.sink_map_err(|e| NetworkError::websocket(e.to_string())));
        (Arc::new(SessionHandle::new(sink)), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn first_ping_after_one_interval() {
        let (handle, mut rx) = handle();
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let task = tokio::spawn(run_heartbeat(
            handle,
            Duration::from_secs(30),
            cancel.clone(),
        ));

        assert_eq!(rx.next().await, Some(WebSocketMessage::text(PING)));
        let first = start.elapsed();
        assert!(first >= Duration::from_secs(30) && first < Duration::from_secs(31));

        assert_eq!(rx.next().await, Some(WebSocketMessage::text(PING)));
        let second = start.elapsed();
        assert!(second >= Duration::from_secs(60) && second < Duration::from_secs(61));

        cancel.cancel();
        assert_eq!(task.await.unwrap(), HeartbeatOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_tick_sends_nothing() {
        let (handle, mut rx) = handle();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_heartbeat(
            Arc::clone(&handle),
            Duration::from_secs(30),
            cancel.clone(),
        ));

        time::sleep(Duration::from_secs(29)).await;
        cancel.cancel();
        assert_eq!(task.await.unwrap(), HeartbeatOutcome::Cancelled);

        handle.close().await;
        assert_eq!(rx.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn write_failure_ends_heartbeat() {
        let (handle, rx) = handle();
        drop(rx);

        let outcome =
            run_heartbeat(handle, Duration::from_secs(30), CancellationToken::new()).await;
        assert_eq!(outcome, HeartbeatOutcome::WriteFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_stalled_ping() {
        // Nothing reads the zero-buffer channel, so the first flush never completes.
        let (tx, mut rx) = mpsc::channel(0);
        let sink: SocketSink =
            Box::pin(tx.sink_map_err(|e| NetworkError::websocket(e.to_string())));
        let handle = Arc::new(SessionHandle::new(sink));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_heartbeat(
            Arc::clone(&handle),
            Duration::from_secs(30),
            cancel.clone(),
        ));

        time::sleep(Duration::from_secs(61)).await;
        assert!(!task.is_finished());

        cancel.cancel();
        let outcome = time::timeout(Duration::from_secs(1), task)
            .await
            .expect("heartbeat stopped")
            .unwrap();
        assert_eq!(outcome, HeartbeatOutcome::Cancelled);
        assert_eq!(rx.next().await, Some(WebSocketMessage::text(PING)));

        handle.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn closed_handle_ends_heartbeat() {
        let (handle, _rx) = handle();
        handle.close().await;

        let outcome =
            run_heartbeat(handle, Duration::from_secs(1), CancellationToken::new()).await;
        assert_eq!(outcome, HeartbeatOutcome::WriteFailed);
    }
}
