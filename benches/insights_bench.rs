//! Benchmarks for the Nimbus insights pipeline
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nimbus::insights::{analyze, build_report, detect_trend, FixedClock, InsightEngine};
use nimbus::storage::{InMemoryStore, WeatherObservation};
use std::sync::Arc;

const CONDITIONS: [&str; 4] = ["Clear", "Clouds", "Rain", "Drizzle"];

fn create_window(count: usize) -> Vec<WeatherObservation> {
    let newest = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let condition = CONDITIONS[i % CONDITIONS.len()];
            WeatherObservation::new("Recife", "BR", 24.0 + (i % 9) as f64, newest - Duration::minutes(i as i64 * 10))
                .humidity(55.0 + (i % 30) as f64)
                .wind_speed((i % 12) as f64)
                .condition(condition, condition.to_lowercase())
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for size in [100, 1000, 10000] {
        let window = create_window(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("analyze_{}", size), |b| {
            b.iter(|| analyze(black_box(&window)).unwrap())
        });

        group.bench_function(format!("trend_{}", size), |b| {
            b.iter(|| detect_trend(black_box(&window)))
        });

        group.bench_function(format!("report_{}", size), |b| {
            b.iter(|| build_report(black_box(&window)).unwrap())
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

    let mut group = c.benchmark_group("engine");

    for size in [1000, 10000] {
        let store = Arc::new(InMemoryStore::with_observations(create_window(size)));
        let engine = InsightEngine::new(store).with_clock(Arc::new(FixedClock(now)));

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("generate_insights_{}", size), |b| {
            b.iter(|| rt.block_on(engine.generate_insights(black_box(Some("Recife")))).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_engine);
criterion_main!(benches);
