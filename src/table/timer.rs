//! Deferred round start.
//!
//! After a resolution the next round opens after a display delay. The delay
//! runs as a spawned tokio task holding only a `Weak` handle to the engine,
//! and is aborted when re-armed, cancelled, closed or dropped.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::engine::GameEngine;

/// A single cancellable "start the next round" task.
#[derive(Debug, Default)]
pub struct RoundTimer {
    handle: Option<JoinHandle<()>>,
    closed: bool,
}

impl RoundTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `start_next_round` on `engine` after `delay`.
    ///
    /// Replaces any pending task. Does nothing once closed. Must be called
    /// from within a tokio runtime.
    pub fn arm(&mut self, engine: Weak<Mutex<GameEngine>>, delay: Duration) -> bool {
        if self.closed {
            return false;
        }
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(engine) = engine.upgrade() else {
                tracing::warn!(target: "perudo.table", "table dropped before the next round");
                return;
            };
            let mut engine = engine.lock().await;
            match engine.start_next_round() {
                Ok(round) => {
                    tracing::debug!(target: "perudo.table", round, "deferred round started")
                }
                Err(error) => {
                    tracing::warn!(target: "perudo.table", %error, "deferred round start discarded")
                }
            }
        }));
        true
    }

    /// Abort the pending task. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Cancel and refuse any further arming.
    pub fn close(&mut self) {
        self.cancel();
        self.closed = true;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
