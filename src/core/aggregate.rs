use std::cmp::{Ordering, Reverse};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::Record;

/// Default size cap of ranked (bar chart) views.
pub const DEFAULT_TOP_N: usize = 15;

/// Numeric field selected for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Budget,
    Revenue,
    Popularity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Budget, Metric::Revenue, Metric::Popularity];

    #[must_use]
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Self::Budget => record.budget,
            Self::Revenue => record.revenue,
            Self::Popularity => record.popularity,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Revenue => "revenue",
            Self::Popularity => "popularity",
        }
    }

    /// Bar chart header shown for this metric.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Budget => "Budget by Title in $US",
            Self::Revenue => "Revenue by Title in $US",
            Self::Popularity => "Popularity by Title in $US",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = crate::error::ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                crate::error::ChartError::InvalidData(format!("unknown metric `{value}`"))
            })
    }
}

/// One group of records reduced to a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    pub key: String,
    pub value: f64,
}

impl AggregatedPoint {
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Groups records by `key_fn` and sums `metric_fn` per group.
///
/// Output follows first-encountered key order. Non-finite metric
/// contributions count as `0`.
pub fn aggregate<T, K, M>(records: &[T], key_fn: K, metric_fn: M) -> Vec<AggregatedPoint>
where
    K: Fn(&T) -> String,
    M: Fn(&T) -> f64,
{
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let contribution = metric_fn(record);
        let contribution = if contribution.is_finite() {
            contribution
        } else {
            0.0
        };
        *groups.entry(key_fn(record)).or_insert(0.0) += contribution;
    }

    groups
        .into_iter()
        .map(|(key, value)| AggregatedPoint { key, value })
        .collect()
}

/// Stable descending sort by value, truncated to `n` entries.
#[must_use]
pub fn rank_top_n(mut points: Vec<AggregatedPoint>, n: usize) -> Vec<AggregatedPoint> {
    points.sort_by_key(|point| Reverse(OrderedFloat(point.value)));
    points.truncate(n);
    points
}

/// Ascending key order for time series. Numeric keys compare numerically.
#[must_use]
pub fn sort_by_key_ascending(mut points: Vec<AggregatedPoint>) -> Vec<AggregatedPoint> {
    points.sort_by(|left, right| compare_keys(&left.key, &right.key));
    points
}

fn compare_keys(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.total_cmp(&right),
        _ => left.cmp(right),
    }
}

/// Bar view pipeline: sum `metric` per title, keep the top `n`.
#[must_use]
pub fn ranked_by_title(records: &[Record], metric: Metric, n: usize) -> Vec<AggregatedPoint> {
    let grouped = aggregate(records, |record| record.title.clone(), |record| metric.value(record));
    let distinct = grouped.len();
    let ranked = rank_top_n(grouped, n);
    debug!(
        metric = metric.name(),
        distinct,
        kept = ranked.len(),
        "ranked records by title"
    );
    ranked
}

/// Line view pipeline: sum `metric` per release year, ascending by year.
///
/// Records without a release date carry no year and are skipped.
#[must_use]
pub fn yearly_totals(records: &[Record], metric: Metric) -> Vec<AggregatedPoint> {
    let dated: Vec<&Record> = records
        .iter()
        .filter(|record| record.release_date.is_some())
        .collect();
    let grouped = aggregate(
        &dated,
        |record| {
            record
                .release_year()
                .map(|year| year.to_string())
                .unwrap_or_default()
        },
        |record| metric.value(record),
    );
    sort_by_key_ascending(grouped)
}
