//! # ostinato
//!
//! Embedded in-process telemetry aggregation engine.
//!
//! ostinato is a Rust library for collecting labeled value updates from any
//! number of concurrent producers and compacting them into a bounded
//! per-label time series, served as a single JSON snapshot. It is designed
//! to be embedded directly in backend services that want lightweight
//! self-diagnostics without an external metrics pipeline.
//!
//! **Status**: This crate is in early development. The API is not yet stable.
//!
//! ## Key Properties
//!
//! - Producers never fail and never observe aggregation state — they only
//!   suspend under backpressure when the bounded ingestion queue is full
//! - One background poller task owns all mutation; batch application is
//!   atomic with respect to snapshot readers
//! - Anchor-pinned squashing bounds series growth under bursty producers to
//!   one point per contiguous sub-window burst
//! - Cooperative shutdown with a caller-supplied deadline; the poller is
//!   never killed mid-tick
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use ostinato::Engine;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cancel = CancellationToken::new();
//!     let (engine, reporter) = Engine::new(cancel.clone());
//!
//!     // Hand clones of `reporter` to collaborators.
//!     reporter.set("Total merchants", 42).await;
//!     reporter.add("Requests served", 1.0).await;
//!
//!     // Mount the snapshot endpoint into your axum service.
//!     let app = engine.router("/telemetry");
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     tokio::spawn(async move {
//!         let _ = axum::serve(listener, app).await;
//!     });
//!
//!     // Shut down: signal cancellation, then wait bounded.
//!     cancel.cancel();
//!     engine.close(Duration::from_secs(2)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`Engine`] — Handle owning the point store; snapshot + lifecycle
//! - [`Reporter`] — Clonable, write-only producer handle
//! - [`EngineConfig`] — Tick, squash window, and queue sizing
//! - A single poller task consumes the queue and writes the store
//!
//! ## Modules
//!
//! For lower-level access, the individual modules are also public:
//!
//! - [`engine`] — Engine construction, snapshot handler, shutdown
//! - [`reporter`] — Producer handle and update messages
//! - [`store`] — Label → series mapping
//! - [`series`] — Point history and the squash rule
//! - [`config`] — Engine configuration
//! - [`lifecycle`] — Shutdown progress states
//! - [`error`] — Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
mod poller;
pub mod reporter;
pub mod series;
pub mod store;

// Re-export primary API types at crate root for convenience.
pub use config::EngineConfig;
pub use engine::{Engine, serve_snapshot};
pub use error::{OstinatoError, Result};
pub use lifecycle::LifecycleState;
pub use reporter::Reporter;
pub use series::{Point, Series};
pub use store::MetricsStore;
