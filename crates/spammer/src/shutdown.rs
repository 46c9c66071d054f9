//! Bounded, best-effort stop requests.
//!
//! The stop signal is a capacity-1 channel carrying at most one message
//! for the whole run. A request is a single `send_timeout` bounded by
//! the generator's `max_interval`; if the timer elapses the attempt is
//! abandoned, never retried. A timed-out request therefore does NOT
//! guarantee eventual shutdown — stopping is best-effort by contract.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tracing::{debug, info, warn};

/// Handle for requesting that a running generator stop.
#[derive(Clone)]
pub struct StopHandle {
    tx: mpsc::Sender<()>,
    patience: Duration,
}

impl StopHandle {
    pub(crate) fn new(tx: mpsc::Sender<()>, patience: Duration) -> Self {
        Self { tx, patience }
    }

    /// Request that the generator stop.
    ///
    /// Returns `true` if the signal was delivered. Returns `false` —
    /// without blocking past the patience window — if the generator has
    /// already exited or the attempt timed out.
    pub async fn stop(&self) -> bool {
        match self.tx.send_timeout((), self.patience).await {
            Ok(()) => {
                info!("stop signal delivered");
                true
            }
            Err(SendTimeoutError::Closed(())) => {
                debug!("generator already stopped");
                false
            }
            Err(SendTimeoutError::Timeout(())) => {
                warn!(
                    patience_secs = self.patience.as_secs(),
                    "stop request timed out; abandoned"
                );
                false
            }
        }
    }

    /// Completes once the generator's receiving side has gone away.
    ///
    /// Used by the timeout watcher to notice the loop exiting without
    /// consuming the stop message meant for it.
    pub(crate) async fn closed(&self) {
        self.tx.closed().await
    }
}
