use criterion::{Criterion, criterion_group, criterion_main};
use movie_charts::api::{Dashboard, DashboardConfig};
use movie_charts::core::{
    LinearScale, Metric, RawRow, RawValue, ScalePadding, parse_dataset, ranked_by_title,
};
use movie_charts::error::ChartResult;
use movie_charts::join::{ChartState, MarkAttributes, reconcile};
use movie_charts::render::Color;
use std::hint::black_box;

fn generated_rows(count: usize) -> Vec<RawRow> {
    (0..count)
        .map(|i| {
            RawRow::new()
                .with("id", RawValue::text(i.to_string()))
                .with("title", RawValue::text(format!("Film {}", i % 700)))
                .with("budget", RawValue::text(((i * 7_919) % 90_000_000).to_string()))
                .with("revenue", RawValue::text(((i * 104_729) % 900_000_000).to_string()))
                .with("popularity", RawValue::text(format!("{:.6}", (i % 97) as f64 * 0.37)))
                .with("release_date", RawValue::text(format!("{}-06-15", 1950 + i % 70)))
                .with(
                    "genres",
                    RawValue::text("[{'id': 18, 'name': 'Drama'}, {'id': 35, 'name': 'Comedy'}]"),
                )
        })
        .collect()
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::from_values([0.0, 10_000.0], (0.0, 1_920.0), ScalePadding::new(0.95, 1.05))
        .expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.map(black_box(4_321.123));
            let _ = scale.invert(px).expect("from pixel");
        })
    });
}

fn bench_parse_dataset_5k(c: &mut Criterion) {
    let rows = generated_rows(5_000);
    c.bench_function("parse_dataset_5k", |b| {
        b.iter(|| {
            let _ = parse_dataset(black_box(&rows));
        })
    });
}

fn bench_rank_by_title_10k(c: &mut Criterion) {
    let (dataset, _) = parse_dataset(&generated_rows(10_000));
    c.bench_function("rank_by_title_10k", |b| {
        b.iter(|| {
            let _ = ranked_by_title(black_box(dataset.records()), Metric::Revenue, 15);
        })
    });
}

fn bench_reconcile_2k_shifted(c: &mut Criterion) {
    let first: Vec<(usize, f64)> = (0..2_000).map(|i| (i, i as f64)).collect();
    let second: Vec<(usize, f64)> = (500..2_500).map(|i| (i, (i * 3 % 1_000) as f64)).collect();
    let encode = |datum: &(usize, f64), index: usize| -> ChartResult<MarkAttributes> {
        Ok(MarkAttributes::rect(0.0, index as f64, datum.1, 1.0, Color::DODGER_BLUE))
    };
    let key_of = |datum: &(usize, f64)| datum.0.to_string();

    c.bench_function("reconcile_2k_shifted", |b| {
        b.iter(|| {
            let mut state = ChartState::default();
            reconcile(&mut state, black_box(&first), key_of, &encode, 0.0);
            reconcile(&mut state, black_box(&second), key_of, &encode, 300.0);
            let _ = state.settle();
        })
    });
}

fn bench_dashboard_snapshot_json(c: &mut Criterion) {
    let rows = generated_rows(100);
    let mut dashboard = Dashboard::new(DashboardConfig::default()).expect("dashboard init");
    dashboard.on_data_loaded(&rows, 0.0).expect("load");
    let _ = dashboard.settle();

    c.bench_function("dashboard_snapshot_json", |b| {
        b.iter(|| {
            let _ = dashboard
                .snapshot()
                .to_json_contract_v1_pretty()
                .expect("snapshot json");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_parse_dataset_5k,
    bench_rank_by_title_10k,
    bench_reconcile_2k_shifted,
    bench_dashboard_snapshot_json
);
criterion_main!(benches);
