//! One-shot readiness barrier
//!
//! Classification must not start before the document has finished loading.
//! The embedder holds a `ReadySignal` and fires it once; any number of
//! waiters observe it through cloned `ReadinessGate`s.

use tokio::sync::watch;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};

/// Waiting side of the barrier
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    rx: watch::Receiver<bool>,
}

/// Firing side of the barrier
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadinessGate {
    /// Create a gate together with its signal
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (ReadinessGate, ReadySignal) {
        let (tx, rx) = watch::channel(false);
        (ReadinessGate { rx }, ReadySignal { tx })
    }

    /// Gate that is already open
    pub fn ready() -> ReadinessGate {
        let (gate, signal) = Self::new();
        signal.mark_ready();
        gate
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the document is ready; immediately if it already is.
    /// Fails when the signal is dropped without firing.
    pub async fn wait(&self) -> AppResult<()> {
        let mut rx = self.rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| AppError::document_unavailable())
    }
}

impl ReadySignal {
    /// Mark the document ready. Later calls are no-ops.
    pub fn mark_ready(&self) {
        let fired = self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
        if fired {
            debug!("📄 Document ready");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_after_ready() {
        let (gate, signal) = ReadinessGate::new();
        signal.mark_ready();
        assert!(gate.is_ready());
        gate.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_before_ready() {
        let (gate, signal) = ReadinessGate::new();
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());
        signal.mark_ready();
        waiter.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_mark_ready_is_idempotent() {
        let (gate, signal) = ReadinessGate::new();
        signal.mark_ready();
        signal.mark_ready();
        gate.wait().await.unwrap();
        gate.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_signal() {
        let (gate, signal) = ReadinessGate::new();
        drop(signal);
        let err = gate.wait().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentUnavailable);
    }

    #[tokio::test]
    async fn test_ready_survives_signal_drop() {
        let (gate, signal) = ReadinessGate::new();
        signal.mark_ready();
        drop(signal);
        gate.wait().await.unwrap();
    }
}
