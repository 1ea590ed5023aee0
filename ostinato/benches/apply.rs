//! Microbenchmarks for the batch-apply hot path.
//!
//! Measures the poller-side cost of applying a drained batch: the
//! squash-heavy case (a burst on one label collapsing into the anchor),
//! the append-heavy case (spaced updates growing the series), and fan-out
//! across many labels.
//!
//! Run with: `cargo bench -p ostinato -- apply`

#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use ostinato::reporter::Update;
use ostinato::store::MetricsStore;

const WINDOW_MS: u64 = 1_000;

/// A burst of updates on one label, all inside the squash window.
fn squash_batch(size: u64) -> Vec<Update> {
    (0..size)
        .map(|i| Update::set("hot", i, 10_000 + i % WINDOW_MS))
        .collect()
}

/// Spaced updates on one label, each beyond the previous window.
fn append_batch(size: u64) -> Vec<Update> {
    (0..size)
        .map(|i| Update::set("steady", i, 10_000 + i * 2 * WINDOW_MS))
        .collect()
}

/// One update per label across `size` labels.
fn fanout_batch(size: u64) -> Vec<Update> {
    (0..size)
        .map(|i| Update::set(format!("label_{i}"), i, 10_000))
        .collect()
}

fn bench_apply_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_batch");

    for size in [100u64, 10_000] {
        group.bench_with_input(BenchmarkId::new("squash", size), &size, |b, &size| {
            b.iter_batched(
                || (MetricsStore::new(), squash_batch(size)),
                |(mut store, batch)| store.apply_batch(batch, WINDOW_MS),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("append", size), &size, |b, &size| {
            b.iter_batched(
                || (MetricsStore::new(), append_batch(size)),
                |(mut store, batch)| store.apply_batch(batch, WINDOW_MS),
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("fanout", size), &size, |b, &size| {
            b.iter_batched(
                || (MetricsStore::new(), fanout_batch(size)),
                |(mut store, batch)| store.apply_batch(batch, WINDOW_MS),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_batch);
criterion_main!(benches);
