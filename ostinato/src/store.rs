//! The point store: every series the engine knows about.
//!
//! This is the engine's sole mutable state. At runtime it is owned behind
//! one mutex: the poller is the only writer, the snapshot handler the only
//! reader, and batch application is atomic with respect to readers. The
//! store itself is synchronization-free so it can also be driven directly
//! in tests and benchmarks.
//!
//! Series are keyed by label in a `BTreeMap` so snapshots serialize in a
//! deterministic order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::reporter::{Update, UpdateKind};
use crate::series::Series;

/// Mapping from label to its point history.
///
/// Entries are created lazily on first update and never pruned or evicted.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct MetricsStore {
    series: BTreeMap<String, Series>,
}

impl MetricsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single update under the given squash window.
    pub fn apply(&mut self, update: Update, window_ms: u64) {
        let series = self.series.entry(update.label).or_default();
        match update.kind {
            UpdateKind::Set(value) => series.record_set(update.time, value, window_ms),
            UpdateKind::Add(delta) => series.record_add(update.time, delta, window_ms),
        }
    }

    /// Applies a drained batch in arrival order.
    pub fn apply_batch(&mut self, batch: Vec<Update>, window_ms: u64) {
        for update in batch {
            self.apply(update, window_ms);
        }
    }

    /// Serializes the full store as one JSON object keyed by label, each
    /// value a chronologically ordered array of `{"time", "value"}` points.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error on serialization failure.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Returns the series for `label`, if any update has created it.
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.get(label)
    }

    /// Returns the number of distinct labels.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` if no label has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WINDOW_MS: u64 = 1_000;

    #[test]
    fn test_series_created_lazily_on_first_update() {
        let mut store = MetricsStore::new();
        assert!(store.is_empty());

        store.apply(Update::set("Total products", 7, 10_000), WINDOW_MS);

        assert_eq!(store.len(), 1);
        let series = store.series("Total products").unwrap();
        assert_eq!(series.points()[0].value, json!(7));
    }

    #[test]
    fn test_batch_applies_in_arrival_order() {
        let mut store = MetricsStore::new();
        store.apply_batch(
            vec![
                Update::set("x", 1, 10_000),
                Update::set("x", 2, 10_400),
                Update::set("x", 3, 10_800),
            ],
            WINDOW_MS,
        );

        // All three land inside the anchor's window; the last value wins.
        let series = store.series("x").unwrap();
        assert_eq!(series.points(), &[crate::series::Point {
            time: 10_000,
            value: json!(3),
        }]);
    }

    #[test]
    fn test_interleaved_labels_stay_isolated() {
        let mut store = MetricsStore::new();
        store.apply_batch(
            vec![
                Update::set("a", 1, 10_000),
                Update::set("b", 10, 10_100),
                Update::set("a", 2, 12_000),
                Update::set("b", 20, 12_100),
            ],
            WINDOW_MS,
        );

        let a: Vec<_> = store.series("a").unwrap().points().to_vec();
        let b: Vec<_> = store.series("b").unwrap().points().to_vec();
        assert_eq!(
            a.iter().map(|p| p.value.clone()).collect::<Vec<_>>(),
            vec![json!(1), json!(2)]
        );
        assert_eq!(
            b.iter().map(|p| p.value.clone()).collect::<Vec<_>>(),
            vec![json!(10), json!(20)]
        );
    }

    #[test]
    fn test_empty_label_is_a_distinct_series() {
        let mut store = MetricsStore::new();
        store.apply(Update::set("", 1, 10_000), WINDOW_MS);
        store.apply(Update::set("x", 2, 10_000), WINDOW_MS);

        assert_eq!(store.len(), 2);
        assert!(store.series("").is_some());
    }

    #[test]
    fn test_to_json_shape() {
        let mut store = MetricsStore::new();
        store.apply(Update::set("x", 1, 10_000), WINDOW_MS);
        store.apply(Update::set("x", 2, 12_000), WINDOW_MS);

        let json: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "x": [
                    {"time": 10_000, "value": 1},
                    {"time": 12_000, "value": 2},
                ]
            })
        );
    }

    #[test]
    fn test_to_json_orders_labels_deterministically() {
        let mut store = MetricsStore::new();
        store.apply(Update::set("zebra", 1, 10_000), WINDOW_MS);
        store.apply(Update::set("alpha", 1, 10_000), WINDOW_MS);

        let body = store.to_json().unwrap();
        assert!(body.find("alpha").unwrap() < body.find("zebra").unwrap());
    }

    #[test]
    fn test_malformed_values_surface_verbatim() {
        // There is no validation layer: whatever producers record is stored
        // and served as-is.
        let mut store = MetricsStore::new();
        store.apply(
            Update::set("weird", json!({"nested": [1, null, "x"]}), 10_000),
            WINDOW_MS,
        );

        let json: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(json["weird"][0]["value"], json!({"nested": [1, null, "x"]}));
    }
}
