//! # Detect Benchmarks
//!
//! Measures the cost of one `detect` call across the signature table:
//! first-row hits, last-row hits, and full fallthrough to the fallback chain.
//!
//! Run: `cargo bench --bench detect_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sentinel_threat::signatures::first_match;
use sentinel_threat::{ManualClock, SensorSnapshot, ThreatClassifier, ThresholdConfig};

fn reading(iaq: f32, voc: f32, pm25: f32, humidity: f32, temperature: f32, ohms: f32) -> SensorSnapshot {
    SensorSnapshot::new(iaq, voc, 420.0, temperature, humidity, ohms, false, 1.0, pm25, 6.0)
}

fn workload() -> Vec<(&'static str, SensorSnapshot)> {
    vec![
        ("lethal_opioid", reading(75.0, 0.65, 25.0, 45.0, 22.0, 50000.0)),
        ("scopolamine", reading(52.0, 0.505, 5.0, 80.0, 30.0, 50000.0)),
        ("lpg_carrier", reading(45.0, 0.507, 3.0, 45.0, 22.0, 5600.0)),
        ("clean_air", reading(30.0, 0.2, 3.0, 45.0, 22.0, 50000.0)),
        ("masked_attack", reading(30.0, 0.2, 3.0, 45.0, 22.0, 20000.0)),
    ]
}

/// Benchmark a single classification per workload row
fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for (label, snapshot) in workload() {
        group.bench_with_input(BenchmarkId::from_parameter(label), &snapshot, |b, s| {
            let mut classifier =
                ThreatClassifier::with_clock(ThresholdConfig::default(), ManualClock::new(0));
            b.iter(|| black_box(classifier.detect(black_box(s))))
        });
    }

    group.finish();
}

/// Benchmark the table scan alone, without baseline or report rendering
fn bench_first_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_match");

    for (label, snapshot) in workload() {
        group.bench_with_input(BenchmarkId::from_parameter(label), &snapshot, |b, s| {
            b.iter(|| black_box(first_match(black_box(s), 0.5)))
        });
    }

    group.finish();
}

/// Benchmark a replay-like stream where the baseline clock advances
fn bench_stream(c: &mut Criterion) {
    let stream: Vec<SensorSnapshot> = (0..1_000u64)
        .map(|i| reading(30.0, 0.2 + (i % 10) as f32 * 0.01, 3.0, 45.0, 22.0, 50000.0))
        .collect();

    c.bench_function("detect_stream_1000", |b| {
        b.iter(|| {
            let mut classifier = ThreatClassifier::new(ThresholdConfig::default());
            for (i, s) in stream.iter().enumerate() {
                black_box(classifier.detect_at(s, i as u64 * 60_000));
            }
        })
    });
}

criterion_group!(benches, bench_detect, bench_first_match, bench_stream);
criterion_main!(benches);
