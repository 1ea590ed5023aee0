//! Engine configuration.
//!
//! Configuration happens once at engine construction and determines the
//! poller cadence, the compaction window, and the sizing of the ingestion
//! queue. The defaults reproduce the engine's production tuning: a one
//! second tick, a one second squash window, and a queue deep enough that
//! producers effectively never block.

use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Configuration for a telemetry [`crate::engine::Engine`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ostinato::EngineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = EngineConfig::new(
///     Duration::from_millis(500), // tick twice a second
///     Duration::from_secs(1),     // squash updates within 1s of the anchor
///     100_000,                    // queue capacity
///     100_000,                    // max updates applied per tick
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How often the poller drains the ingestion queue.
    ///
    /// Shutdown latency is bounded by one tick plus the time to apply the
    /// final batch, so very long ticks delay graceful stops.
    pub tick_interval: Duration,

    /// Compaction window for anchor-pinned squashing.
    ///
    /// An update whose timestamp is within this window of a series' last
    /// point is folded into that point instead of appended. A zero window
    /// disables squashing entirely.
    pub squash_window: Duration,

    /// Capacity of the bounded ingestion queue.
    ///
    /// Producers suspend while the queue is at capacity (backpressure);
    /// nothing is ever dropped.
    pub queue_capacity: usize,

    /// Maximum number of updates drained and applied in a single tick.
    pub drain_limit: usize,
}

impl EngineConfig {
    /// Creates a validated engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the tick interval, queue capacity, or
    /// drain limit is zero.
    pub fn new(
        tick_interval: Duration,
        squash_window: Duration,
        queue_capacity: usize,
        drain_limit: usize,
    ) -> Result<Self> {
        let config = Self {
            tick_interval,
            squash_window,
            queue_capacity,
            drain_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval.into());
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity.into());
        }
        if self.drain_limit == 0 {
            return Err(ConfigError::ZeroDrainLimit.into());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            squash_window: Duration::from_secs(1),
            queue_capacity: 10_000_000,
            drain_limit: 10_000_000,
        }
    }
}
