use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Ordinal scale splitting a pixel range into equal, rounded bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    keys: IndexSet<String>,
    range: (f64, f64),
    padding_inner: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// Builds a rounded band scale. Duplicate keys keep their first position.
    pub fn new<I, S>(keys: I, range: (f64, f64), padding_inner: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }
        if !padding_inner.is_finite() || !(0.0..=1.0).contains(&padding_inner) {
            return Err(ChartError::InvalidData(
                "band inner padding must be finite and in [0, 1]".to_owned(),
            ));
        }

        let keys: IndexSet<String> = keys.into_iter().map(Into::into).collect();
        let count = keys.len() as f64;
        let (low, high) = (range.0.min(range.1), range.0.max(range.1));

        let step = ((high - low) / (count - padding_inner).max(1.0)).floor();
        let offset = (high - low - step * (count - padding_inner)) * 0.5;
        let start = (low + offset).round();
        let bandwidth = (step * (1.0 - padding_inner)).round();

        Ok(Self {
            keys,
            range,
            padding_inner,
            step,
            bandwidth,
            start,
        })
    }

    /// Band start for `key`, or `None` when the key is not in the domain.
    #[must_use]
    pub fn map(&self, key: &str) -> Option<f64> {
        let index = self.keys.get_index_of(key)?;
        let index = if self.range.1 < self.range.0 {
            self.keys.len() - 1 - index
        } else {
            index
        };
        Some(self.start + self.step * index as f64)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
