//! Benchmarks for version diffs and updates.
//!
//! Benchmark targets:
//! - Line diff of a 200-line command: <1ms
//! - Update appending a version to a 50-version history: <5ms

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use skillshare::models::{Command, CommandUpdate, CommandUpload};
use skillshare::services::{CatalogService, DiffMode, diff_text};
use skillshare::storage::{KvStore, MemoryKvStore};

// ============================================================================
// Test Data
// ============================================================================

fn document(lines: usize, edit_every: usize) -> String {
    (0..lines)
        .map(|i| {
            if edit_every > 0 && i % edit_every == 0 {
                format!("line {i} (edited)")
            } else {
                format!("line {i}: run the checks and report back")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Diff Benchmarks
// ============================================================================

fn bench_diff_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_modes");
    group.measurement_time(Duration::from_secs(5));

    for lines in [20_usize, 200, 2_000] {
        let old = document(lines, 0);
        let new = document(lines, 7);
        group.throughput(Throughput::Elements(lines as u64));

        group.bench_with_input(BenchmarkId::new("lcs", lines), &lines, |b, _| {
            b.iter(|| diff_text(black_box(&old), black_box(&new), DiffMode::Lcs));
        });
        group.bench_with_input(BenchmarkId::new("set", lines), &lines, |b, _| {
            b.iter(|| diff_text(black_box(&old), black_box(&new), DiffMode::SetDifference));
        });
    }

    group.finish();
}

fn bench_diff_identical(c: &mut Criterion) {
    let text = document(200, 0);
    c.bench_function("diff_identical_200", |b| {
        b.iter(|| diff_text(black_box(&text), black_box(&text), DiffMode::Lcs));
    });
}

// ============================================================================
// Versioned Update Benchmarks
// ============================================================================

fn bench_versioned_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("versioned_update");

    for history in [1_usize, 50] {
        group.bench_with_input(
            BenchmarkId::new("append", history),
            &history,
            |b, &history| {
                let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
                let service = CatalogService::new(store);
                service
                    .create::<Command>(CommandUpload::new("demo", "Demo", "Utility", "v0", "alice"))
                    .unwrap();
                for i in 1..history {
                    let update = CommandUpdate::new("demo", "bob").with_content(format!("v{i}"));
                    service.update::<Command>(&update).unwrap();
                }

                let mut counter = 0_u64;
                b.iter(|| {
                    counter += 1;
                    let update =
                        CommandUpdate::new("demo", "bob").with_content(format!("bench {counter}"));
                    service.update::<Command>(&update).unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_diff_modes,
    bench_diff_identical,
    bench_versioned_update,
);

criterion_main!(benches);
