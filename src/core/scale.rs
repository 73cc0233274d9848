use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Multiplicative widening applied to a fitted `[min, max]` domain.
///
/// `lower` scales the minimum and `upper` scales the maximum, so extreme
/// points do not sit flush against the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePadding {
    pub lower: f64,
    pub upper: f64,
}

impl ScalePadding {
    pub const NONE: ScalePadding = ScalePadding {
        lower: 1.0,
        upper: 1.0,
    };

    #[must_use]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

impl Default for ScalePadding {
    fn default() -> Self {
        Self::NONE
    }
}

/// Affine mapping from a numeric domain onto a pixel range.
///
/// The range may be reversed (`[height, 0]`) for y axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        let (domain_start, domain_end) = normalize_domain(domain.0, domain.1)?;

        Ok(Self {
            domain_start,
            domain_end,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Fits `[min, max]` over finite `values`, then applies `padding`.
    ///
    /// Empty input yields the `[0, 1]` domain so callers always get a usable scale.
    pub fn from_values<I>(values: I, range: (f64, f64), padding: ScalePadding) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let Some((min, max)) = extent(values) else {
            return Self::new((0.0, 1.0), range);
        };
        Self::new((min * padding.lower, max * padding.upper), range)
    }

    /// `[0, max]` domain used by bar and line value axes.
    pub fn from_zero_to_max<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let max = extent(values).map_or(0.0, |(_, max)| max);
        Self::new((0.0, max), range)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to the range. Non-finite input maps to the range start.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a zero-width range".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / range_span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Finite `[min, max]` of `values`, or `None` when no finite value exists.
#[must_use]
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Orders the bounds and widens a single-value domain around the value.
///
/// The widening grows with the magnitude so `v ± half` never rounds back to `v`.
pub(crate) fn normalize_domain(start: f64, end: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale domain must be finite".to_owned(),
        ));
    }

    if start == end {
        if start == 0.0 {
            return Ok((0.0, 1.0));
        }
        let half = SINGLE_VALUE_HALF_SPAN.max(start.abs() * SINGLE_VALUE_RELATIVE_SPAN);
        let (lower, upper) = (start - half, start + half);
        if upper > lower && (upper - lower).is_finite() {
            return Ok((lower, upper));
        }
        return Ok((start.min(0.0), start.max(0.0)));
    }

    Ok((start.min(end), start.max(end)))
}

const SINGLE_VALUE_HALF_SPAN: f64 = 0.5;
const SINGLE_VALUE_RELATIVE_SPAN: f64 = 1e-9;
