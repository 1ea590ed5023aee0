//! Engine construction, the snapshot read path, and graceful shutdown.
//!
//! [`Engine::new`] wires the whole pipeline: it creates the bounded
//! ingestion queue, spawns the poller task, and hands back a cheap-to-clone
//! [`Engine`] handle (read side: snapshot, lifecycle) together with the
//! [`Reporter`] (write side) for collaborators.
//!
//! Snapshots and the poller share one mutex over the point store, so a
//! snapshot taken concurrently with batch application never observes a
//! half-applied batch. Reads never mutate and may run concurrently with each
//! other, serialized only against the poller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::error::{Result, SnapshotError};
use crate::lifecycle::{self, LifecycleHandle, LifecycleState};
use crate::poller::Poller;
use crate::reporter::Reporter;
use crate::store::MetricsStore;

/// Handle to a running telemetry engine.
///
/// Clones share the same underlying store and lifecycle; the handle is what
/// the surrounding service keeps for serving snapshots and shutting down.
#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

#[derive(Debug)]
struct EngineInner {
    store: Arc<Mutex<MetricsStore>>,
    lifecycle: LifecycleHandle,
}

impl Engine {
    /// Starts an engine with the default configuration and returns it
    /// together with the producer-facing [`Reporter`].
    ///
    /// The poller task runs until `cancel` is triggered, so this must be
    /// called from within a tokio runtime.
    pub fn new(cancel: CancellationToken) -> (Self, Reporter) {
        Self::spawn(cancel, EngineConfig::default())
    }

    /// Starts an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError`] if the configuration is
    /// invalid.
    pub fn with_config(
        cancel: CancellationToken,
        config: EngineConfig,
    ) -> Result<(Self, Reporter)> {
        config.validate()?;
        Ok(Self::spawn(cancel, config))
    }

    fn spawn(cancel: CancellationToken, config: EngineConfig) -> (Self, Reporter) {
        let (push, queue) = mpsc::channel(config.queue_capacity);
        let store = Arc::new(Mutex::new(MetricsStore::new()));
        let (lifecycle_tx, lifecycle) = lifecycle::channel();

        let poller = Poller::new(queue, Arc::clone(&store), config, cancel, lifecycle_tx);
        tokio::spawn(poller.run());

        let engine = Self {
            inner: Arc::new(EngineInner { store, lifecycle }),
        };
        (engine, Reporter::new(push))
    }

    /// Serializes the full store as one JSON object keyed by label.
    ///
    /// Holds the same lock as the poller for the duration of the
    /// serialization.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if serialization fails or the store lock
    /// is poisoned. The store itself is never corrupted by a failed
    /// snapshot.
    pub fn snapshot_json(&self) -> Result<String> {
        let store = self
            .inner
            .store
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned)?;
        Ok(store.to_json().map_err(SnapshotError::from)?)
    }

    /// Returns the current lifecycle state of the poller.
    pub fn state(&self) -> LifecycleState {
        self.inner.lifecycle.state()
    }

    /// Blocks until the poller has stopped or `deadline` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ShutdownError::Timeout`] if the deadline
    /// elapses first. The poller is not forcibly terminated and may still
    /// finish shortly after.
    pub async fn close(&self, deadline: Duration) -> Result<()> {
        self.inner.lifecycle.wait_stopped(deadline).await?;
        Ok(())
    }

    /// Builds a router exposing the snapshot handler at `path`, ready to be
    /// merged into the surrounding service's router.
    pub fn router(&self, path: &str) -> Router {
        Router::new()
            .route(path, get(serve_snapshot))
            .with_state(self.clone())
    }
}

/// axum handler serving the JSON snapshot.
///
/// Responds 200 with `Content-Type: application/json`, or 500 if the store
/// cannot be serialized.
pub async fn serve_snapshot(State(engine): State<Engine>) -> Response {
    match engine.snapshot_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize telemetry snapshot");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
