//! Run these benches with `cargo bench --bench skewt -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use skew_t_analysis::ChartConfig;

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(skewt_benches);

criterion_group!(
    name = skewt_benches;
    config = build_tester();
    targets = build_chart_bench, to_svg_bench
);

fn build_chart_bench(c: &mut Criterion) {
    let anal = utils::load_test_analysis();
    let config = ChartConfig::default();

    c.bench_function("build_chart", |b| {
        b.iter(|| {
            let _x = anal.chart(&config);
        });
    });
}

fn to_svg_bench(c: &mut Criterion) {
    let chart = utils::load_test_analysis()
        .chart(&ChartConfig::default())
        .expect("bad chart");

    c.bench_function("to_svg", |b| {
        b.iter(|| {
            let _x = chart.to_svg();
        });
    });
}
