//! Demo storefront backend with embedded ostinato telemetry.
//!
//! A small axum service standing in for the kind of backend the engine is
//! meant to live inside:
//!
//! - `POST /generate`  — synthesize a batch of shop data, report totals
//! - `GET  /telemetry` — JSON snapshot served by the engine
//! - `GET  /healthz`   — liveness check
//!
//! A background task also generates a batch on a fixed interval so the
//! telemetry endpoint has something to show without manual traffic.
//! Ctrl-C triggers cancellation: the HTTP server drains, then the engine is
//! given a bounded window to stop.

mod generator;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use ostinato::Engine;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use crate::generator::{Generated, ShopGenerator};

/// ostinato-demo-shop — demo storefront backend with embedded telemetry.
#[derive(Parser)]
#[command(name = "ostinato-demo-shop", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Seconds between automatic generator batches (0 disables them).
    #[arg(long, default_value = "5")]
    generate_every: u64,

    /// Seconds the telemetry engine is given to stop on shutdown.
    #[arg(long, default_value = "2")]
    close_deadline: u64,
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let (engine, reporter) = Engine::new(cancel.clone());

    let shop = Arc::new(ShopGenerator::new(reporter));
    shop.report_totals().await;

    if cli.generate_every > 0 {
        tokio::spawn(generator::run_periodic(
            Arc::clone(&shop),
            Duration::from_secs(cli.generate_every),
            cancel.clone(),
        ));
    }

    let app = Router::new()
        .route("/generate", post(generate_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(Arc::clone(&shop))
        .merge(engine.router("/telemetry"));

    let listener = match tokio::net::TcpListener::bind(cli.listen).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(listen = %cli.listen, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("⚡️ listening on http://{} ⚡️", cli.listen);

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let server_cancel = cancel.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_cancel.cancelled().await });
    if let Err(err) = server.await {
        tracing::error!(error = %err, "server error");
    }

    if let Err(err) = engine.close(Duration::from_secs(cli.close_deadline)).await {
        tracing::error!(error = %err, "failed to gracefully shut down telemetry engine");
    }
}

/// `POST /generate` — synthesizes one batch and returns its counts.
async fn generate_handler(State(shop): State<Arc<ShopGenerator>>) -> Json<Generated> {
    Json(shop.create(1).await)
}

/// `GET /healthz` — liveness check.
async fn healthz_handler() -> &'static str {
    "ok"
}
