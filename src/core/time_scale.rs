use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Half-width in days of the domain fitted around a single date.
const SINGLE_DATE_HALF_SPAN_DAYS: f64 = 183.0;

/// Continuous date axis. Dates map through their day number since the common era.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate, range: (f64, f64)) -> ChartResult<Self> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let (domain_start, domain_end) = if start == end {
            let center = date_to_days(start);
            (
                center - SINGLE_DATE_HALF_SPAN_DAYS,
                center + SINGLE_DATE_HALF_SPAN_DAYS,
            )
        } else {
            (date_to_days(start), date_to_days(end))
        };

        Ok(Self {
            start,
            end,
            linear: LinearScale::new((domain_start, domain_end), range)?,
        })
    }

    /// Fits the domain to the earliest and latest of `dates`.
    ///
    /// Empty input falls back to calendar year 1970.
    pub fn from_dates<I>(dates: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let bounds = dates.into_iter().fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| {
            Some(acc.map_or((date, date), |(min, max)| (min.min(date), max.max(date))))
        });
        match bounds {
            Some((start, end)) => Self::new(start, end, range),
            None => Self::new(epoch_year_start(0)?, epoch_year_start(1)?, range),
        }
    }

    /// Data extent the scale was fitted on.
    #[must_use]
    pub fn date_extent(self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn map(self, date: NaiveDate) -> f64 {
        self.linear.map(date_to_days(date))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<NaiveDate> {
        let days = self.linear.invert(pixel)?.round();
        days_to_date(days)
    }

    /// January-first ticks spaced by a whole number of years, at most `max_ticks`.
    #[must_use]
    pub fn year_ticks(self, max_ticks: usize) -> Vec<NaiveDate> {
        let (start_days, end_days) = self.linear.domain();
        let (Ok(first), Ok(last)) = (days_to_date(start_days.ceil()), days_to_date(end_days.floor()))
        else {
            return Vec::new();
        };

        let first_year = if first.ordinal() == 1 {
            first.year()
        } else {
            first.year() + 1
        };
        let last_year = last.year();
        if last_year < first_year || max_ticks == 0 {
            return Vec::new();
        }

        let span = (last_year - first_year) as usize + 1;
        let step = nice_year_step(span.div_ceil(max_ticks).max(1));
        let aligned = first_year + (step - first_year.rem_euclid(step)) % step;
        (aligned..=last_year)
            .step_by(step as usize)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .collect()
    }
}

fn nice_year_step(raw: usize) -> i32 {
    [1, 2, 5, 10, 20, 25, 50, 100, 200, 500, 1000]
        .into_iter()
        .find(|step| *step as usize >= raw)
        .unwrap_or(1000)
}

#[must_use]
pub fn date_to_days(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn days_to_date(days: f64) -> ChartResult<NaiveDate> {
    if !days.is_finite() || days.abs() > f64::from(i32::MAX) {
        return Err(ChartError::InvalidData(
            "day number out of range".to_owned(),
        ));
    }
    NaiveDate::from_num_days_from_ce_opt(days as i32)
        .ok_or_else(|| ChartError::InvalidData("day number out of range".to_owned()))
}

fn epoch_year_start(offset: i32) -> ChartResult<NaiveDate> {
    NaiveDate::from_ymd_opt(1970 + offset, 1, 1)
        .ok_or_else(|| ChartError::InvalidData("invalid fallback date".to_owned()))
}
