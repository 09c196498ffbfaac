//! One-shot handoff of content produced on another thread
//!
//! The content loader runs in the background and hands its result over
//! exactly once. Whoever holds the `Pending` either polls for it or blocks
//! until it arrives. If the producer goes away without sending, the value is
//! reported as abandoned rather than as an error.

use std::io;
use std::thread;

use tokio::sync::oneshot::{self, error::TryRecvError};

/// Producer half of a pending value
#[derive(Debug)]
pub struct PendingSender<T> {
    tx: oneshot::Sender<T>,
}

impl<T> PendingSender<T> {
    /// Deliver the value. Returns it back if the `Pending` was dropped.
    pub fn send(self, value: T) -> Result<(), T> {
        self.tx.send(value)
    }
}

/// Result of polling a pending value
#[derive(Debug, PartialEq)]
pub enum PendingState<T> {
    Ready(T),
    Waiting,
    Abandoned,
}

/// A value that will be produced exactly once, possibly on another thread
#[derive(Debug)]
pub struct Pending<T> {
    label: String,
    rx: oneshot::Receiver<T>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn channel(label: impl Into<String>) -> (PendingSender<T>, Pending<T>) {
        let (tx, rx) = oneshot::channel();
        (
            PendingSender { tx },
            Pending {
                label: label.into(),
                rx,
            },
        )
    }

    /// A pending value that is already complete
    pub fn ready(label: impl Into<String>, value: T) -> Self {
        let (tx, pending) = Self::channel(label);
        // The receiver is alive in `pending`, so this cannot fail
        let _ = tx.send(value);
        pending
    }

    /// Run `produce` on a named background thread
    pub fn spawn<F>(label: impl Into<String>, produce: F) -> io::Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let label = label.into();
        let (tx, pending) = Self::channel(label.clone());
        thread::Builder::new().name(label).spawn(move || {
            if tx.send(produce()).is_err() {
                tracing::debug!("Pending result dropped before delivery");
            }
        })?;
        Ok(pending)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Non-blocking check; a `Ready` value is handed out only once
    pub fn try_take(&mut self) -> PendingState<T> {
        match self.rx.try_recv() {
            Ok(value) => PendingState::Ready(value),
            Err(TryRecvError::Empty) => PendingState::Waiting,
            Err(TryRecvError::Closed) => PendingState::Abandoned,
        }
    }

    /// Block until the value arrives; `None` if the producer gave up.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> Option<T> {
        match self.rx.blocking_recv() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Pending {} was abandoned before completing", self.label);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_ready_value() {
        let pending = Pending::ready("answer", 42);
        assert_eq!(pending.wait(), Some(42));
    }

    #[test]
    fn test_try_take_waiting_then_ready() {
        let (tx, mut pending) = Pending::<u32>::channel("later");
        assert_eq!(pending.try_take(), PendingState::Waiting);

        tx.send(7).unwrap();
        assert_eq!(pending.try_take(), PendingState::Ready(7));
        // Consumed: the sender is gone now
        assert_eq!(pending.try_take(), PendingState::Abandoned);
    }

    #[test]
    fn test_abandoned_sender() {
        let (tx, pending) = Pending::<String>::channel("dropped");
        drop(tx);
        assert_eq!(pending.wait(), None);
    }

    #[test]
    fn test_spawn_blocks_until_done() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let pending = Pending::spawn("worker", move || {
            gate_rx.recv_timeout(Duration::from_secs(5)).ok();
            "done".to_string()
        })
        .unwrap();

        gate_tx.send(()).unwrap();
        assert_eq!(pending.wait().as_deref(), Some("done"));
    }
}
