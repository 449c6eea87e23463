use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand::rngs::StdRng;

use trendshelf_ai::{DemandScorer, ForecastGenerator, LexiconModelLoader, ModelHandles};
use trendshelf_core::BookRecord;

const CATEGORIES: [&str; 5] = ["Fiction", "Mystery", "Fantasy", "Biography", "Self-Help"];

fn catalogue(n: usize) -> Vec<BookRecord> {
    (0..n)
        .map(|i| {
            BookRecord::new(
                format!("The Wonderful Adventure of Volume {i}"),
                format!("Author {}", i % 37),
                CATEGORIES[i % CATEGORIES.len()],
            )
            .with_demand((i * 7 % 100) as f64)
        })
        .collect()
}

fn bench_score_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_batch");

    let lexicon = DemandScorer::new(Arc::new(ModelHandles::new(LexiconModelLoader)));
    let disabled = DemandScorer::new(Arc::new(ModelHandles::disabled("bench")));

    for n in [10usize, 100, 1_000] {
        let records = catalogue(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("lexicon", n), &records, |b, records| {
            b.iter(|| black_box(lexicon.score_batch(black_box(records))))
        });
        group.bench_with_input(BenchmarkId::new("disabled", n), &records, |b, records| {
            b.iter(|| black_box(disabled.score_batch(black_box(records))))
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let records = catalogue(1_000);
    let generator = ForecastGenerator::default();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("forecast_1000", |b| {
        b.iter(|| black_box(generator.forecast_with_rng(black_box(&records), None, &mut rng)))
    });
}

criterion_group!(benches, bench_score_batch, bench_forecast);
criterion_main!(benches);
