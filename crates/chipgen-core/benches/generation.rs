use criterion::{criterion_group, criterion_main, Criterion};

use chipgen_core::prelude::*;

fn bench_full_pipeline(c: &mut Criterion) {
    let engine = LayoutEngine::new(GenerationConfig {
        seed: Some(42),
        ..Default::default()
    })
    .expect("valid config");

    c.bench_function("generate_default", |b| {
        b.iter(|| engine.generate().expect("generation succeeds"))
    });
}

fn bench_deep_partition(c: &mut Criterion) {
    let engine = LayoutEngine::new(GenerationConfig {
        seed: Some(42),
        max_search_depth: 7,
        target_range: (60, 120),
        ..Default::default()
    })
    .expect("valid config");

    c.bench_function("generate_deep", |b| {
        b.iter(|| engine.generate().expect("generation succeeds"))
    });
}

criterion_group!(benches, bench_full_pipeline, bench_deep_partition);
criterion_main!(benches);
