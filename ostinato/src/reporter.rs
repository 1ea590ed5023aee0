//! Producer-facing write handle.
//!
//! A [`Reporter`] wraps the send side of the engine's bounded ingestion
//! queue. It is cheap to clone — hand one to every collaborator that needs
//! to record values. The handle is write-only: producers cannot observe
//! aggregation state and so cannot couple to it.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::sync::mpsc;

/// The operation an [`Update`] performs against its label's series.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    /// Overwrite-style observation: the value replaces the anchor on squash.
    Set(Value),
    /// Accumulate-style observation: the delta folds into a running total.
    Add(f64),
}

/// One labeled observation flowing from a producer to the poller.
///
/// Updates are timestamped when enqueued, not when applied; a batch applied
/// late still squashes against the timestamps producers saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Series label. Opaque, exact-match; empty labels are a distinct series.
    pub label: String,
    /// The operation to apply.
    pub kind: UpdateKind,
    /// Milliseconds since the Unix epoch at enqueue time.
    pub time: u64,
}

impl Update {
    /// Creates an overwrite-style update.
    pub fn set(label: impl Into<String>, value: impl Into<Value>, time_ms: u64) -> Self {
        Self {
            label: label.into(),
            kind: UpdateKind::Set(value.into()),
            time: time_ms,
        }
    }

    /// Creates an accumulate-style update.
    pub fn add(label: impl Into<String>, delta: f64, time_ms: u64) -> Self {
        Self {
            label: label.into(),
            kind: UpdateKind::Add(delta),
            time: time_ms,
        }
    }
}

/// Write handle given to concurrent collaborators.
#[derive(Debug, Clone)]
pub struct Reporter {
    push: mpsc::Sender<Update>,
}

impl Reporter {
    pub(crate) fn new(push: mpsc::Sender<Update>) -> Self {
        Self { push }
    }

    /// Records `value` for `label`, timestamped now.
    ///
    /// Fire-and-forget: the call suspends only while the ingestion queue is
    /// at capacity (backpressure) and never reports a failure. Callers on
    /// latency-sensitive paths must account for the backpressure stall.
    pub async fn set(&self, label: impl Into<String>, value: impl Into<Value>) {
        self.enqueue(Update::set(label, value, now_ms())).await;
    }

    /// Adds `delta` to the running total for `label`, timestamped now.
    ///
    /// Same blocking and failure semantics as [`Reporter::set`].
    pub async fn add(&self, label: impl Into<String>, delta: f64) {
        self.enqueue(Update::add(label, delta, now_ms())).await;
    }

    async fn enqueue(&self, update: Update) {
        // The send only fails once the poller has stopped and dropped the
        // receive side; ingestion still never surfaces an error.
        if self.push.send(update).await.is_err() {
            tracing::debug!("telemetry engine stopped, discarding update");
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_enqueues_timestamped_update() {
        let (tx, mut rx) = mpsc::channel(8);
        let reporter = Reporter::new(tx);

        let before = now_ms();
        reporter.set("Total merchants", 42).await;
        let after = now_ms();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.label, "Total merchants");
        assert_eq!(update.kind, UpdateKind::Set(json!(42)));
        assert!(update.time >= before && update.time <= after);
    }

    #[tokio::test]
    async fn test_add_enqueues_delta() {
        let (tx, mut rx) = mpsc::channel(8);
        let reporter = Reporter::new(tx);

        reporter.add("Total generation time", 12.5).await;

        let update = rx.recv().await.unwrap();
        assert_eq!(update.kind, UpdateKind::Add(12.5));
    }

    #[tokio::test]
    async fn test_empty_label_is_permitted() {
        let (tx, mut rx) = mpsc::channel(8);
        let reporter = Reporter::new(tx);

        reporter.set("", json!(null)).await;

        assert_eq!(rx.recv().await.unwrap().label, "");
    }

    #[tokio::test]
    async fn test_set_after_shutdown_is_discarded_without_error() {
        let (tx, rx) = mpsc::channel(8);
        let reporter = Reporter::new(tx);
        drop(rx);

        // Must complete, not panic or block.
        reporter.set("orphaned", 1).await;
    }
}
