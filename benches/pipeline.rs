//! Performance benchmarks for the cleaning pipeline.
//!
//! Run with: `cargo bench --features synthetic`
//!
//! Tracks come from the synthetic generator so runs are reproducible.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use trackclean::synthetic::SyntheticTrackScenario;
use trackclean::{CleaningPipeline, FilterStage, PipelineConfig, PositionRecord, clean_tracks};

#[cfg(feature = "parallel")]
use trackclean::clean_tracks_parallel;

fn long_haul(points: usize) -> Vec<PositionRecord> {
    SyntheticTrackScenario::long_haul(points).generate().records
}

/// Whole pipeline at increasing track lengths.
fn bench_pipeline_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_scaling");
    let pipeline = CleaningPipeline::new(PipelineConfig::clean()).unwrap();

    for points in [1_000, 10_000, 100_000].iter() {
        let records = long_haul(*points);
        group.bench_with_input(BenchmarkId::new("clean", points), &records, |b, r| {
            b.iter(|| pipeline.run(black_box(r)))
        });
    }

    group.finish();
}

/// Each stage on its own, fed the raw track.
fn bench_individual_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let pipeline = CleaningPipeline::new(PipelineConfig::clean()).unwrap();
    let records = long_haul(20_000);

    for stage in FilterStage::ALL {
        group.bench_with_input(BenchmarkId::new(stage.as_str(), 20_000), &records, |b, r| {
            b.iter(|| pipeline.run_stage(stage, black_box(r)))
        });
    }

    group.finish();
}

/// A fleet of device tracks cleaned in one call.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    let tracks: Vec<(String, Vec<PositionRecord>)> = (0..50u64)
        .map(|i| {
            let scenario = SyntheticTrackScenario {
                seed: i,
                ..SyntheticTrackScenario::long_haul(5_000)
            };
            (format!("device-{}", i), scenario.generate().records)
        })
        .collect();
    let config = PipelineConfig::clean();

    group.bench_function("sequential_50x5000", |b| {
        b.iter(|| clean_tracks(black_box(&tracks), &config))
    });

    #[cfg(feature = "parallel")]
    group.bench_function("parallel_50x5000", |b| {
        b.iter(|| clean_tracks_parallel(black_box(&tracks), &config))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_scaling,
    bench_individual_stages,
    bench_batch
);
criterion_main!(benches);
