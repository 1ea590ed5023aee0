//! Shutdown progress tracking.
//!
//! The poller publishes its lifecycle on a watch channel so dependents can
//! await a clean stop without polling. The poller is never killed; a caller
//! that runs out of patience gets a timeout error while the poller finishes
//! on its own shortly after.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::ShutdownError;

/// Shutdown progress of the engine's poller task.
///
/// States advance strictly `Running → ShuttingDown → Stopped`; `Stopped` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The poller is ticking normally.
    Running,
    /// Cancellation has been observed at a tick boundary; the poller is on
    /// its way out.
    ShuttingDown,
    /// The poller has exited.
    Stopped,
}

/// Creates the lifecycle channel: the poller keeps the send side, the
/// engine the read side.
pub(crate) fn channel() -> (watch::Sender<LifecycleState>, LifecycleHandle) {
    let (tx, rx) = watch::channel(LifecycleState::Running);
    (tx, LifecycleHandle { rx })
}

/// Read side of the lifecycle channel.
#[derive(Debug, Clone)]
pub(crate) struct LifecycleHandle {
    rx: watch::Receiver<LifecycleState>,
}

impl LifecycleHandle {
    /// Returns the current state.
    pub(crate) fn state(&self) -> LifecycleState {
        *self.rx.borrow()
    }

    /// Waits until the poller reports [`LifecycleState::Stopped`], bounded
    /// by `deadline`.
    pub(crate) async fn wait_stopped(&self, deadline: Duration) -> Result<(), ShutdownError> {
        let mut rx = self.rx.clone();
        let stopped = rx.wait_for(|state| *state == LifecycleState::Stopped);
        match tokio::time::timeout(deadline, stopped).await {
            // A closed channel means the poller task is gone entirely;
            // either way it is no longer running.
            Ok(_) => Ok(()),
            Err(_) => Err(ShutdownError::Timeout { deadline }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_with_zero_deadline_times_out_while_running() {
        let (_tx, handle) = channel();

        assert_eq!(handle.state(), LifecycleState::Running);
        let err = handle.wait_stopped(Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, ShutdownError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_wait_returns_once_stopped() {
        let (tx, handle) = channel();

        tx.send_replace(LifecycleState::ShuttingDown);
        tx.send_replace(LifecycleState::Stopped);

        handle.wait_stopped(Duration::ZERO).await.unwrap();
        assert_eq!(handle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn test_wait_unblocks_on_late_stop() {
        let (tx, handle) = channel();

        let waiter = tokio::spawn(async move { handle.wait_stopped(Duration::from_secs(5)).await });
        tokio::task::yield_now().await;
        tx.send_replace(LifecycleState::Stopped);

        waiter.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_stopped() {
        let (tx, handle) = channel();
        drop(tx);

        handle.wait_stopped(Duration::from_millis(10)).await.unwrap();
    }
}
