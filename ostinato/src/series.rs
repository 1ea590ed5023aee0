//! Point history for a single label, with anchor-pinned squashing.
//!
//! A [`Series`] is an append-ordered list of [`Point`]s. Growth is bounded
//! under bursty producers by the squash rule: an update landing within the
//! compaction window of the series' last point (the *anchor*) is folded into
//! that point instead of appended, and the anchor's timestamp is left
//! unchanged. A label under continuous sub-window load therefore holds
//! exactly one point whose timestamp never advances — timestamp precision is
//! traded for bounded memory.

use serde::Serialize;
use serde_json::Value;

/// A single timestamped observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Milliseconds since the Unix epoch, captured when the update was
    /// enqueued (not when it was applied).
    pub time: u64,
    /// The recorded value. Opaque to the engine; surfaced verbatim in
    /// snapshots.
    pub value: Value,
}

/// Ordered, unbounded history of points for one label.
///
/// Points reflect update arrival order and are non-decreasing by timestamp
/// as long as enqueue timestamps are (the ingestion queue preserves FIFO).
/// A series is never pruned; entries persist for the process lifetime.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Returns the recorded points, oldest first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Records an overwrite-style observation.
    ///
    /// Within the window the anchor keeps its timestamp and takes the new
    /// value; outside it a new point is appended and becomes the anchor.
    pub(crate) fn record_set(&mut self, time_ms: u64, value: Value, window_ms: u64) {
        if let Some(anchor) = self.points.last_mut()
            && anchor.time.abs_diff(time_ms) < window_ms
        {
            anchor.value = value;
            return;
        }
        self.points.push(Point {
            time: time_ms,
            value,
        });
    }

    /// Records an accumulate-style observation.
    ///
    /// The running total is the anchor's numeric value plus `delta`;
    /// non-numeric anchors count as zero. Within the window the total
    /// replaces the anchor's value; outside it a new point carrying the
    /// total is appended (cumulative counter).
    pub(crate) fn record_add(&mut self, time_ms: u64, delta: f64, window_ms: u64) {
        let total = self
            .points
            .last()
            .and_then(|anchor| anchor.value.as_f64())
            .unwrap_or(0.0)
            + delta;

        if let Some(anchor) = self.points.last_mut()
            && anchor.time.abs_diff(time_ms) < window_ms
        {
            anchor.value = Value::from(total);
            return;
        }
        self.points.push(Point {
            time: time_ms,
            value: Value::from(total),
        });
    }
}
