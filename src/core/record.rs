use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::literal::decode_literal;

/// Loosely typed cell value as delivered by the input feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Object(IndexMap<String, RawValue>),
}

impl RawValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Numeric coercion with JavaScript unary-plus semantics.
    ///
    /// Returns `None` where unary plus would produce `NaN` or an infinity.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Self::Null => 0.0,
            Self::Bool(flag) => f64::from(u8::from(*flag)),
            Self::Number(number) => *number,
            Self::Text(text) => parse_numeric_text(text)?,
            Self::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number()?,
                _ => return None,
            },
            Self::Object(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Text(text) => !text.is_empty(),
            Self::List(_) | Self::Object(_) => true,
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(flag) => flag.to_string(),
            Self::Number(number) => format_number(*number),
            Self::Text(text) => text.clone(),
            Self::List(_) | Self::Object(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Looks up a key when the value is an object.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&RawValue> {
        match self {
            Self::Object(entries) => entries.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::List(_) | Self::Object(_))
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => {
                number.as_f64().map_or(Self::Null, Self::Number)
            }
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok().map(|value| value as f64);
    }
    // Rust accepts "inf"/"nan" spellings that unary plus rejects.
    if trimmed
        .bytes()
        .any(|byte| byte.is_ascii_alphabetic() && byte != b'e' && byte != b'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// One raw input row: column name to loosely typed cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, RawValue>,
}

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: RawValue) -> Self {
        self.cells.insert(column.into(), value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: RawValue) {
        self.cells.insert(column.into(), value);
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }
}

/// Strictly typed movie record produced by `parse_record`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Record {
    pub id: String,
    pub imdb_id: String,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub tagline: String,
    pub status: String,
    pub homepage: String,
    pub poster_path: String,
    pub budget: f64,
    pub revenue: f64,
    pub popularity: f64,
    pub runtime: f64,
    pub vote_average: f64,
    pub vote_count: f64,
    pub release_date: Option<NaiveDate>,
    pub adult: bool,
    pub video: bool,
    pub belongs_to_collection: RawValue,
    pub genres: RawValue,
    pub production_companies: RawValue,
    pub production_countries: RawValue,
    pub spoken_languages: RawValue,
}

impl Record {
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// Stable identity for per-record marks: `id`, then `imdb_id`, then `title`.
    #[must_use]
    pub fn identity(&self) -> &str {
        [&self.id, &self.imdb_id, &self.title]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .map_or("", String::as_str)
    }

    /// Names found in a nested list field such as `genres`.
    #[must_use]
    pub fn nested_names(field: &RawValue) -> Vec<String> {
        match field {
            RawValue::List(items) => items
                .iter()
                .filter_map(|item| item.field("name").map(RawValue::to_text))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Counts of typed defaults substituted while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseReport {
    pub rows: usize,
    pub defaulted_numbers: usize,
    pub defaulted_dates: usize,
    pub undecoded_nested: usize,
}

impl ParseReport {
    pub fn merge(&mut self, other: ParseReport) {
        self.rows += other.rows;
        self.defaulted_numbers += other.defaulted_numbers;
        self.defaulted_dates += other.defaulted_dates;
        self.undecoded_nested += other.undecoded_nested;
    }

    #[must_use]
    pub fn defaults_total(self) -> usize {
        self.defaulted_numbers + self.defaulted_dates + self.undecoded_nested
    }
}

/// Normalizes one raw row. Never fails.
#[must_use]
pub fn parse_record(raw: &RawRow) -> Record {
    parse_record_with_report(raw).0
}

pub fn parse_record_with_report(raw: &RawRow) -> (Record, ParseReport) {
    let mut report = ParseReport {
        rows: 1,
        ..ParseReport::default()
    };

    let mut number = |column: &str| -> f64 {
        match raw.get(column) {
            None => 0.0,
            Some(value) => value.to_number().unwrap_or_else(|| {
                trace!(column, value = %value.to_text(), "numeric field defaulted to 0");
                report.defaulted_numbers += 1;
                0.0
            }),
        }
    };
    let budget = number("budget");
    let revenue = number("revenue");
    let popularity = number("popularity");
    let runtime = number("runtime");
    let vote_average = number("vote_average");
    let vote_count = number("vote_count");

    let text = |column: &str| raw.get(column).map(RawValue::to_text).unwrap_or_default();
    let flag = |column: &str| raw.get(column).is_some_and(RawValue::is_truthy);

    let release_date = match raw.get("release_date") {
        None | Some(RawValue::Null) => None,
        Some(value) => {
            let parsed = parse_release_date(value);
            let blank = matches!(value, RawValue::Text(text) if text.trim().is_empty());
            if parsed.is_none() && !blank {
                trace!(value = %value.to_text(), "release date defaulted to none");
                report.defaulted_dates += 1;
            }
            parsed
        }
    };

    let mut nested = |column: &str| -> RawValue {
        let (value, decoded) = parse_nested(raw.get(column));
        if !decoded {
            trace!(column, "nested field kept as text");
            report.undecoded_nested += 1;
        }
        value
    };
    let belongs_to_collection = nested("belongs_to_collection");
    let genres = nested("genres");
    let production_companies = nested("production_companies");
    let production_countries = nested("production_countries");
    let spoken_languages = nested("spoken_languages");

    let record = Record {
        id: text("id"),
        imdb_id: text("imdb_id"),
        title: text("title"),
        original_title: text("original_title"),
        original_language: text("original_language"),
        overview: text("overview"),
        tagline: text("tagline"),
        status: text("status"),
        homepage: text("homepage"),
        poster_path: text("poster_path"),
        budget,
        revenue,
        popularity,
        runtime,
        vote_average,
        vote_count,
        release_date,
        adult: flag("adult"),
        video: flag("video"),
        belongs_to_collection,
        genres,
        production_companies,
        production_countries,
        spoken_languages,
    };
    (record, report)
}

/// Returns the normalized value and whether it decoded to a nested shape.
fn parse_nested(value: Option<&RawValue>) -> (RawValue, bool) {
    match value {
        None | Some(RawValue::Null) => (RawValue::empty_list(), true),
        Some(RawValue::Text(text)) if text.trim().is_empty() => (RawValue::empty_list(), true),
        Some(RawValue::Text(text)) => match decode_literal(text.trim()) {
            Some(decoded) if decoded.is_nested() => (decoded, true),
            _ => (RawValue::Text(text.clone()), false),
        },
        Some(nested @ (RawValue::List(_) | RawValue::Object(_))) => (nested.clone(), true),
        Some(scalar) => (scalar.clone(), false),
    }
}

fn parse_release_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Text(text) => {
            let trimmed = text.trim();
            for pattern in ["%Y-%m-%d", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
                    return Some(date);
                }
            }
            if trimmed.len() == 4 {
                return trimmed
                    .parse::<i32>()
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
            }
            None
        }
        RawValue::Number(number) if number.fract() == 0.0 && (1000.0..=9999.0).contains(number) => {
            NaiveDate::from_ymd_opt(*number as i32, 1, 1)
        }
        _ => None,
    }
}

/// Immutable, cheaply cloneable sequence of parsed records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parses every row into a `Dataset`, collecting a merged report.
pub fn parse_dataset(rows: &[RawRow]) -> (Dataset, ParseReport) {
    #[cfg(feature = "parallel-parse")]
    let parsed: Vec<(Record, ParseReport)> = {
        use rayon::prelude::*;
        rows.par_iter().map(parse_record_with_report).collect()
    };
    #[cfg(not(feature = "parallel-parse"))]
    let parsed: Vec<(Record, ParseReport)> = rows.iter().map(parse_record_with_report).collect();

    let mut report = ParseReport::default();
    let mut records = Vec::with_capacity(parsed.len());
    for (record, row_report) in parsed {
        report.merge(row_report);
        records.push(record);
    }
    debug!(
        rows = report.rows,
        defaults = report.defaults_total(),
        "parsed dataset"
    );
    (Dataset::new(records), report)
}

#[cfg(test)]
mod tests {
    use super::{RawRow, RawValue, parse_record, parse_record_with_report};
    use chrono::NaiveDate;

    #[test]
    fn unary_plus_coercion_matches_javascript() {
        assert_eq!(RawValue::text(" 42 ").to_number(), Some(42.0));
        assert_eq!(RawValue::text("").to_number(), Some(0.0));
        assert_eq!(RawValue::text("1e3").to_number(), Some(1000.0));
        assert_eq!(RawValue::text("0x10").to_number(), Some(16.0));
        assert_eq!(RawValue::text("abc").to_number(), None);
        assert_eq!(RawValue::text("Infinity").to_number(), None);
        assert_eq!(RawValue::text("nan").to_number(), None);
        assert_eq!(RawValue::Bool(true).to_number(), Some(1.0));
        assert_eq!(RawValue::List(vec![RawValue::text("7")]).to_number(), Some(7.0));
    }

    #[test]
    fn truthiness_follows_double_negation() {
        assert!(RawValue::text("True").is_truthy());
        assert!(RawValue::text("False").is_truthy());
        assert!(!RawValue::text("").is_truthy());
        assert!(!RawValue::Number(0.0).is_truthy());
        assert!(RawValue::empty_list().is_truthy());
    }

    #[test]
    fn release_date_accepts_iso_and_bare_year() {
        let row = RawRow::new().with("release_date", RawValue::text("1995-10-30"));
        assert_eq!(
            parse_record(&row).release_date,
            NaiveDate::from_ymd_opt(1995, 10, 30)
        );

        let row = RawRow::new().with("release_date", RawValue::text("2001"));
        assert_eq!(parse_record(&row).release_year(), Some(2001));

        let row = RawRow::new().with("release_date", RawValue::text("soon"));
        let (record, report) = parse_record_with_report(&row);
        assert_eq!(record.release_date, None);
        assert_eq!(report.defaulted_dates, 1);
    }

    #[test]
    fn identity_falls_back_to_title() {
        let row = RawRow::new().with("title", RawValue::text("Heat"));
        assert_eq!(parse_record(&row).identity(), "Heat");

        let row = row.with("id", RawValue::text("949"));
        assert_eq!(parse_record(&row).identity(), "949");
    }
}
