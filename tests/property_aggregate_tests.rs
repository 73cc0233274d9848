use std::collections::HashSet;

use movie_charts::core::{
    AggregatedPoint, DEFAULT_TOP_N, LinearScale, Metric, RawRow, RawValue, ScalePadding,
    aggregate, parse_dataset, parse_record, rank_top_n, ranked_by_title,
};
use proptest::prelude::*;

fn rows_strategy() -> impl Strategy<Value = Vec<(u8, i64)>> {
    proptest::collection::vec((0u8..24, -1_000i64..1_000_000_000), 0..80)
}

fn to_rows(values: &[(u8, i64)]) -> Vec<RawRow> {
    values
        .iter()
        .map(|(title, budget)| {
            RawRow::new()
                .with("title", RawValue::text(format!("title-{title}")))
                .with("budget", RawValue::text(budget.to_string()))
        })
        .collect()
}

proptest! {
    #[test]
    fn aggregate_keys_are_distinct(values in rows_strategy()) {
        let (dataset, _) = parse_dataset(&to_rows(&values));
        let points = aggregate(dataset.records(), |record| record.title.clone(), |record| record.budget);
        let unique: HashSet<&str> = points.iter().map(|point| point.key.as_str()).collect();
        prop_assert_eq!(unique.len(), points.len());
    }

    #[test]
    fn ranked_view_is_descending_and_bounded(values in rows_strategy()) {
        let (dataset, _) = parse_dataset(&to_rows(&values));
        for metric in Metric::ALL {
            let points = ranked_by_title(dataset.records(), metric, DEFAULT_TOP_N);
            prop_assert!(points.len() <= 15);
            prop_assert!(points.windows(2).all(|pair| pair[0].value >= pair[1].value));
        }
    }

    #[test]
    fn ranking_is_stable_for_ties(values in proptest::collection::vec(0u8..4, 0..40)) {
        let points: Vec<AggregatedPoint> = values
            .iter()
            .enumerate()
            .map(|(index, value)| AggregatedPoint::new(format!("k{index}"), f64::from(*value)))
            .collect();
        let ranked = rank_top_n(points.clone(), points.len());
        for pair in ranked.windows(2) {
            if pair[0].value == pair[1].value {
                let first = points.iter().position(|point| point.key == pair[0].key);
                let second = points.iter().position(|point| point.key == pair[1].key);
                prop_assert!(first < second);
            }
        }
    }

    #[test]
    fn group_sums_match_totals(values in rows_strategy()) {
        let (dataset, _) = parse_dataset(&to_rows(&values));
        let points = aggregate(dataset.records(), |record| record.title.clone(), |record| record.budget);
        let grouped: f64 = points.iter().map(|point| point.value).sum();
        let direct: f64 = values.iter().map(|(_, budget)| *budget as f64).sum();
        prop_assert!((grouped - direct).abs() <= 1e-6 * direct.abs().max(1.0));
    }

    #[test]
    fn parser_is_total_for_arbitrary_text(cells in proptest::collection::vec(".*", 0..8)) {
        let columns = ["budget", "revenue", "release_date", "adult", "genres", "title", "popularity", "spoken_languages"];
        let row: RawRow = columns
            .iter()
            .zip(cells.iter())
            .map(|(column, cell)| (*column, RawValue::text(cell.as_str())))
            .collect();
        let record = parse_record(&row);
        prop_assert!(record.budget.is_finite());
        prop_assert!(record.revenue.is_finite());
        prop_assert!(record.popularity.is_finite());
    }

    #[test]
    fn padded_scale_keeps_points_inside_the_range(
        values in proptest::collection::vec(1.0f64..1e9, 1..50)
    ) {
        let scale = LinearScale::from_values(values.iter().copied(), (0.0, 620.0), ScalePadding::new(0.95, 1.05))
            .expect("scale");
        for value in values {
            let pixel = scale.map(value);
            prop_assert!(pixel.is_finite());
            prop_assert!((0.0..=620.0).contains(&pixel));
        }
    }
}
