//! Benchmarks for artifact naming and tag filtering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use storefront_core::{artifacts, tags};

fn benchmark_artifact_naming(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifact_naming");

    for len in [8usize, 64, 512].iter() {
        let name = "Add 'iPhone' to cart & checkout! ".repeat(len / 8 + 1);
        group.bench_with_input(BenchmarkId::new("screenshot_file_name", len), &name, |b, name| {
            b.iter(|| artifacts::screenshot_file_name(black_box(name), "failed"));
        });
    }

    group.finish();
}

fn benchmark_tag_filter(c: &mut Criterion) {
    let scenario_tags = ["smoke", "@cart", "device:mobile", "checkout", "regression"];
    let include = ["search", "checkout"];

    c.bench_function("tag_filter_admits", |b| {
        b.iter(|| tags::admits(black_box(&scenario_tags), black_box(&include)));
    });
}

criterion_group!(benches, benchmark_artifact_naming, benchmark_tag_filter);
criterion_main!(benches);
