//! Criterion benchmarks for the bootstrap hot loop.
//!
//! Run with: `cargo bench -p fitlab-runner`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fitlab_core::{Dataset, DatasetId, RngSource, SampleRow};
use fitlab_runner::{bootstrap_values, max_hamming_distance, summarize_by_hamming};
use fitlab_runner::{AggregateOptions, BootstrapConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate_values(count: usize) -> Vec<f64> {
    (0..count).map(|i| (i % 17) as f64 * 0.05).collect()
}

fn bench_bootstrap_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_values");
    let config = BootstrapConfig::default();

    for size in [10, 100, 1000].iter() {
        let values = generate_values(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                let _ = bootstrap_values(black_box(&values), &config, &mut rng);
            });
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_by_hamming");
    group.sample_size(10);

    for genes in [4u32, 5].iter() {
        let max = max_hamming_distance(*genes);
        let rows = (1..=max)
            .flat_map(|h| {
                (0..20).map(move |i| {
                    SampleRow::new(h, i as f64, 20.0, i as f64 / 20.0, false, i as f64, 0.1)
                })
            })
            .collect();
        let dataset = Dataset::new(DatasetId::new(*genes, "ff4"), rows);
        let rngs = RngSource::from_seed(Some(1));
        let options = AggregateOptions::default();

        group.bench_with_input(BenchmarkId::from_parameter(genes), genes, |b, _| {
            b.iter(|| {
                let _ = summarize_by_hamming(black_box(&dataset), &options, &rngs);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bootstrap_values, bench_summarize);
criterion_main!(benches);
