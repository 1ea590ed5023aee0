//! The engine's single background consumer.
//!
//! One poller task exists per engine. It is the only consumer of the
//! ingestion queue and the only writer of the point store. On a fixed tick
//! it drains every queued update without blocking (up to the configured
//! drain limit), applies the batch under the store lock in arrival order,
//! and records batch size and remaining queue depth for the engine's own
//! observability.
//!
//! Cancellation is cooperative: the token is checked at tick boundaries (or
//! while idle between ticks), never mid-batch, so a tick never spans the
//! cancellation boundary and shutdown latency stays bounded by one tick
//! plus lock-hold time.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::lifecycle::LifecycleState;
use crate::reporter::Update;
use crate::store::MetricsStore;

pub(crate) struct Poller {
    queue: mpsc::Receiver<Update>,
    store: Arc<Mutex<MetricsStore>>,
    config: EngineConfig,
    cancel: CancellationToken,
    lifecycle: watch::Sender<LifecycleState>,
}

impl Poller {
    pub(crate) fn new(
        queue: mpsc::Receiver<Update>,
        store: Arc<Mutex<MetricsStore>>,
        config: EngineConfig,
        cancel: CancellationToken,
        lifecycle: watch::Sender<LifecycleState>,
    ) -> Self {
        Self {
            queue,
            store,
            config,
            cancel,
            lifecycle,
        }
    }

    /// Ticks until cancelled, then reports `Stopped` and exits.
    pub(crate) async fn run(mut self) {
        let window_ms =
            u64::try_from(self.config.squash_window.as_millis()).unwrap_or(u64::MAX);

        // First tick one full interval from now, like a wall-clock ticker.
        let mut ticker = tokio::time::interval_at(
            Instant::now() + self.config.tick_interval,
            self.config.tick_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let cancel = self.cancel.clone();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    self.lifecycle.send_replace(LifecycleState::ShuttingDown);
                    break;
                }
                _ = ticker.tick() => self.tick(window_ms),
            }
        }

        self.lifecycle.send_replace(LifecycleState::Stopped);
        tracing::debug!("telemetry poller stopped");
    }

    /// Drains and applies one batch. Synchronous: holds the store lock only
    /// for in-memory mutation, never across an await.
    fn tick(&mut self, window_ms: u64) {
        let mut batch = Vec::new();
        while batch.len() < self.config.drain_limit {
            match self.queue.try_recv() {
                Ok(update) => batch.push(update),
                Err(_) => break,
            }
        }

        if batch.is_empty() {
            return;
        }

        let processed = batch.len();
        let remaining = self.queue.len();
        {
            // Only this task mutates the store; a poisoned lock means a
            // snapshot reader panicked, and the data is still consistent.
            let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            store.apply_batch(batch, window_ms);
        }

        tracing::debug!(processed, remaining, "processed batch of telemetry updates");
    }
}
