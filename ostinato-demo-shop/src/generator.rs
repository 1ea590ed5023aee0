//! Synthetic shop-data generator exercising the telemetry write path.
//!
//! Stands in for the real collaborators of a storefront backend: each batch
//! synthesizes merchants with a pseudo-random number of products and
//! transactions, then reports the running totals through the [`Reporter`].
//! Nothing is persisted; the point is to feed the engine realistic traffic.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use ostinato::Reporter;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Telemetry label for the overall merchant count.
pub const TOTAL_MERCHANTS: &str = "Total merchants";
/// Telemetry label for the overall product count.
pub const TOTAL_PRODUCTS: &str = "Total products";
/// Telemetry label for the overall transaction count.
pub const TOTAL_TRANSACTIONS: &str = "Total transactions";
/// Telemetry label for the overall transaction line count.
pub const TOTAL_TRANSACTION_LINES: &str = "Total transaction lines";
/// Telemetry label for cumulative time spent generating, in milliseconds.
pub const GENERATION_TIME_MS: &str = "Total generation time (ms)";

/// Counts of entities created, either per batch or overall.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Generated {
    /// Merchants created.
    pub merchants: u64,
    /// Products created.
    pub products: u64,
    /// Transactions created.
    pub transactions: u64,
    /// Transaction lines created.
    pub lines: u64,
}

/// Generator of synthetic shop data.
pub struct ShopGenerator {
    reporter: Reporter,
    state: Mutex<GenState>,
}

#[derive(Debug)]
struct GenState {
    overall: Generated,
    rng: u64,
}

impl ShopGenerator {
    /// Creates a generator reporting through `reporter`.
    pub fn new(reporter: Reporter) -> Self {
        #[allow(clippy::cast_possible_truncation)] // the seed only needs the low bits
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self {
            reporter,
            state: Mutex::new(GenState {
                overall: Generated::default(),
                rng: seed | 1,
            }),
        }
    }

    /// Reports the current overall totals without generating anything.
    pub async fn report_totals(&self) {
        let overall = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.overall
        };
        self.set_totals(overall).await;
    }

    /// Synthesizes `merchants` merchants with pseudo-random products and
    /// transactions, updates the overall totals, and reports them.
    ///
    /// Returns the counts created by this batch.
    pub async fn create(&self, merchants: u64) -> Generated {
        let started = Instant::now();

        // Synthesize under the lock, report after releasing it.
        let (batch, overall) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let mut batch = Generated {
                merchants,
                ..Generated::default()
            };
            for _ in 0..merchants {
                let products = splitmix64(&mut state.rng) % 100;
                let transactions = splitmix64(&mut state.rng) % 10_000;
                batch.products += products;
                batch.transactions += transactions;
                batch.lines += transactions * 7;
            }

            state.overall.merchants += batch.merchants;
            state.overall.products += batch.products;
            state.overall.transactions += batch.transactions;
            state.overall.lines += batch.lines;
            (batch, state.overall)
        };

        self.set_totals(overall).await;
        self.reporter
            .add(GENERATION_TIME_MS, started.elapsed().as_secs_f64() * 1_000.0)
            .await;

        tracing::info!(
            merchants = batch.merchants,
            products = batch.products,
            transactions = batch.transactions,
            lines = batch.lines,
            "generated shop data batch"
        );
        batch
    }

    async fn set_totals(&self, overall: Generated) {
        self.reporter.set(TOTAL_MERCHANTS, overall.merchants).await;
        self.reporter.set(TOTAL_PRODUCTS, overall.products).await;
        self.reporter
            .set(TOTAL_TRANSACTIONS, overall.transactions)
            .await;
        self.reporter
            .set(TOTAL_TRANSACTION_LINES, overall.lines)
            .await;
    }
}

/// Runs `generator` on a fixed interval until cancelled.
pub async fn run_periodic(
    generator: std::sync::Arc<ShopGenerator>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                generator.create(1).await;
            }
        }
    }
    tracing::debug!("generator stopped");
}

/// splitmix64 step; good enough for synthetic batch sizing.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
