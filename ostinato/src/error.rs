//! Error types for the ostinato telemetry engine.

use std::time::Duration;

use thiserror::Error;

/// The main error type for all ostinato operations.
///
/// This enum covers every fallible surface of the engine: configuration
/// validation at construction, snapshot serialization on the read path, and
/// the bounded shutdown wait. Ingestion is deliberately absent — recording a
/// value cannot fail (see [`crate::reporter::Reporter`]).
#[derive(Error, Debug)]
pub enum OstinatoError {
    /// Error validating an engine configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error producing a snapshot of the point store.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Error waiting for the engine to shut down.
    #[error("shutdown error: {0}")]
    Shutdown(#[from] ShutdownError),
}

/// Errors that can occur when validating an [`crate::config::EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The poller tick interval is zero.
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    /// The ingestion queue capacity is zero.
    #[error("queue capacity must be non-zero")]
    ZeroQueueCapacity,

    /// The per-tick drain limit is zero.
    #[error("drain limit must be non-zero")]
    ZeroDrainLimit,
}

/// Errors that can occur while producing a snapshot (read path).
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Failed to serialize the point store to JSON.
    #[error("failed to serialize metrics: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store lock was poisoned by a panicking holder.
    #[error("metrics store lock poisoned")]
    LockPoisoned,
}

/// Errors that can occur while waiting for the engine to stop.
#[derive(Error, Debug)]
pub enum ShutdownError {
    /// The poller did not stop within the caller's deadline.
    ///
    /// The poller is not forcibly terminated; it is expected to finish
    /// shortly after, once it observes cancellation at a tick boundary.
    #[error("telemetry engine did not stop within {deadline:?}")]
    Timeout {
        /// The deadline the caller supplied.
        deadline: Duration,
    },
}

/// Type alias for `Result<T, OstinatoError>`.
pub type Result<T> = std::result::Result<T, OstinatoError>;
