use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crozier_core::config::AppConfig;
use crozier_core::distance;
use crozier_core::population::Population;
use crozier_core::recorder::NullRecorder;
use crozier_core::rng::RandomSource;

fn bench_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.run.horizon = 200.0;
    config.run.progress_interval = u64::MAX;
    config.demography.removal_interval = 50.0;
    config
}

fn bench_event_loop(c: &mut Criterion) {
    let config = bench_config();

    c.bench_function("event_loop_20_nests_200_time", |b| {
        b.iter(|| {
            let mut population =
                Population::new(config.clone(), RandomSource::from_seed(42)).unwrap();
            let summary = population.simulate(&mut NullRecorder).unwrap();
            black_box(summary.events)
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut population = Population::new(bench_config(), RandomSource::from_seed(7)).unwrap();

    c.bench_function("snapshot_20_nests", |b| {
        b.iter(|| black_box(population.snapshot().unwrap()))
    });
}

fn bench_distances(c: &mut Criterion) {
    let a: Vec<f64> = (0..50).map(|i| (i % 7) as f64).collect();
    let b: Vec<f64> = (0..50).map(|i| (i % 5) as f64).collect();

    c.bench_function("gestalt_distance_50_cues", |bench| {
        bench.iter(|| black_box(distance::gestalt(black_box(&a), black_box(&b)).unwrap()))
    });
}

criterion_group!(benches, bench_event_loop, bench_snapshot, bench_distances);
criterion_main!(benches);
