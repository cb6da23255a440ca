// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `hedgerow_virtual_range`.
//!
//! The interesting axis is the offset-to-index conversion: O(1) arithmetic
//! for uniform collections versus binary search over cumulative offsets for
//! partially measured dynamic ones.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use hedgerow_virtual_range::{RangeTracker, TrackerParam};

fn fixed_tracker(total: usize, keeps: usize) -> RangeTracker<usize> {
    let mut param = TrackerParam::new(keeps, 40.0);
    param.unique_ids = (0..total).collect();
    let mut tracker = RangeTracker::new(param, Box::new(|_| {}));
    for id in 0..keeps {
        tracker.save_size(id, 40.0);
    }
    tracker
}

fn dynamic_tracker(total: usize, keeps: usize, measured: usize) -> RangeTracker<usize> {
    let mut param = TrackerParam::new(keeps, 40.0);
    param.unique_ids = (0..total).collect();
    let mut tracker = RangeTracker::new(param, Box::new(|_| {}));
    for id in 0..measured {
        tracker.save_size(id, if id % 2 == 0 { 32.0 } else { 48.0 });
    }
    tracker
}

fn bench_handle_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_scroll/handle_scroll");

    for total in [1_000_usize, 100_000, 1_000_000] {
        group.bench_function(BenchmarkId::new("fixed", total), |b| {
            let mut tracker = fixed_tracker(total, 30);
            let span = total as f64 * 40.0;
            let mut offset = 0.0;
            b.iter(|| {
                offset = (offset + 173.0) % span;
                tracker.handle_scroll(black_box(offset));
                black_box(tracker.range())
            })
        });
    }

    for total in [1_000_usize, 100_000] {
        group.bench_function(BenchmarkId::new("dynamic", total), |b| {
            let mut tracker = dynamic_tracker(total, 30, total / 10);
            let span = total as f64 * 40.0;
            let mut offset = 0.0;
            b.iter(|| {
                offset = (offset + 173.0) % span;
                tracker.handle_scroll(black_box(offset));
                black_box(tracker.range())
            })
        });
    }

    group.finish();
}

fn bench_offset_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_scroll/offset_at");

    group.bench_function("fixed_100k", |b| {
        let tracker = fixed_tracker(100_000, 30);
        b.iter(|| black_box(tracker.offset_at(black_box(50_000))))
    });

    group.bench_function("dynamic_100k", |b| {
        let tracker = dynamic_tracker(100_000, 30, 10_000);
        b.iter(|| black_box(tracker.offset_at(black_box(50_000))))
    });

    group.finish();
}

criterion_group!(benches, bench_handle_scroll, bench_offset_at);
criterion_main!(benches);
