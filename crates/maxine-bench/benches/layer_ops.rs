//! Criterion benchmarks for layer transforms and diagnostics.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use maxine_bench::{mixed_values, session_with};
use maxine_editor::transform;
use maxine_editor::{Distribution, EditorConfig, HealthReport, LayerStats};
use maxine_tensor::Shape;

const LAYER: usize = 512 * 512;

fn bench_transforms(c: &mut Criterion) {
    let values = mixed_values(LAYER);
    let mut group = c.benchmark_group("transform_512x512");
    group.bench_function("clip", |b| {
        b.iter_batched(
            || values.clone(),
            |mut v| transform::clip(&mut v, -1.0, 1.0),
            BatchSize::LargeInput,
        );
    });
    group.bench_function("normalize", |b| {
        b.iter_batched(
            || values.clone(),
            |mut v| black_box(transform::normalize(&mut v)),
            BatchSize::LargeInput,
        );
    });
    group.bench_function("sigmoid", |b| {
        b.iter_batched(
            || values.clone(),
            |mut v| transform::sigmoid(&mut v),
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_diagnostics(c: &mut Criterion) {
    let values = mixed_values(LAYER);
    let config = EditorConfig::default();
    let mut group = c.benchmark_group("diagnostics_512x512");
    group.bench_function("stats", |b| {
        b.iter(|| black_box(LayerStats::compute(&values)));
    });
    group.bench_function("health", |b| {
        b.iter(|| black_box(HealthReport::scan(&values, config.health_thresholds())));
    });
    group.bench_function("hist", |b| {
        b.iter(|| {
            black_box(Distribution::compute(
                &values,
                config.histogram_bins,
                config.histogram_bar_width,
            ))
        });
    });
    group.finish();
}

/// Benchmark: parse and dispatch a command line against a live session.
fn bench_execute_line(c: &mut Criterion) {
    let mut session = session_with(Shape::new(1, 128, 128).unwrap());
    c.bench_function("execute_line_health_128x128", |b| {
        b.iter(|| black_box(session.execute_line("health").unwrap()));
    });
}

criterion_group!(benches, bench_transforms, bench_diagnostics, bench_execute_line);
criterion_main!(benches);
