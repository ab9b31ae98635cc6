use criterion::{Criterion, criterion_group, criterion_main};
use rdv::chart::{Record, Scatterplot, bin_counts};
use rdv::core::{Dimensionality, Margin, Viewport, compute_density};
use rdv::render::Scene;
use std::hint::black_box;

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            Record::new((t * 0.618).fract() * 100.0, (t * 0.377).fract() * 50.0, "")
        })
        .collect()
}

fn bench_compute_density(c: &mut Criterion) {
    let viewport = Viewport::new(1920.0, 1080.0);
    let margin = Margin::new(15.0, 30.0, 30.0, 15.0);

    c.bench_function("compute_density", |b| {
        b.iter(|| {
            compute_density(
                black_box(10_000),
                black_box(viewport),
                black_box(margin),
                Dimensionality::Area,
            )
        })
    });
}

fn bench_bin_counts_100k(c: &mut Criterion) {
    let data = records(100_000);

    c.bench_function("bin_counts_100k", |b| {
        b.iter(|| bin_counts(black_box(&data), (0.0, 100.0), (0.0, 50.0), 64))
    });
}

fn bench_scatterplot_render_pass(c: &mut Criterion) {
    let mut sparse = Scatterplot::new().expect("chart init");
    sparse.bind(Scene::new(Viewport::new(1600.0, 900.0)));
    sparse.resize().expect("resize");
    sparse.set_data(records(2_000));

    let mut dense = Scatterplot::new().expect("chart init");
    dense.bind(Scene::new(Viewport::new(1600.0, 900.0)));
    dense.resize().expect("resize");
    dense.set_data(records(50_000));

    c.bench_function("scatterplot_render_points_2k", |b| {
        b.iter(|| sparse.render().expect("render"))
    });
    c.bench_function("scatterplot_render_bins_50k", |b| {
        b.iter(|| dense.render().expect("render"))
    });
}

criterion_group!(
    benches,
    bench_compute_density,
    bench_bin_counts_100k,
    bench_scatterplot_render_pass
);
criterion_main!(benches);
