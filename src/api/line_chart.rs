use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChartLayout, Dataset, LinearScale, Metric, TimeScale, yearly_totals};
use crate::error::ChartResult;
use crate::join::{
    AxisPosition, AxisTick, ChartState, MarkAttributes, MarkEncoder, MarkInstruction,
    ReconcileReport, TransitionTiming, reconcile,
};
use crate::render::{Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::chart_frame::{
    TICK_FONT_PX, money_ticks, push_axis, push_circle_mark, push_header,
};

const VERTEX_RADIUS_PX: f64 = 2.5;
const LINE_STROKE_PX: f64 = 1.5;
const SERIES_LABEL_OFFSET_PX: f64 = 5.0;
const Y_TICK_COUNT: usize = 5;
const X_MAX_TICKS: usize = 10;

/// One named line: a metric summed per release year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesSpec {
    pub name: String,
    pub metric: Metric,
    pub color: Color,
}

impl LineSeriesSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, metric: Metric, color: Color) -> Self {
        Self {
            name: name.into(),
            metric,
            color,
        }
    }

    /// Revenue and budget over time.
    #[must_use]
    pub fn money_defaults() -> Vec<Self> {
        vec![
            Self::new("Revenue", Metric::Revenue, Color::DODGER_BLUE),
            Self::new("Budget", Metric::Budget, Color::DARK_ORANGE),
        ]
    }
}

/// Yearly vertex of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub series: usize,
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    /// Mark key `"{series index}:{series name}:{date}"`.
    #[must_use]
    pub fn key(&self, specs: &[LineSeriesSpec]) -> String {
        let name = specs.get(self.series).map_or("series", |spec| spec.name.as_str());
        format!("{}:{name}:{}", self.series, self.date)
    }
}

fn series_key_prefix(series: usize) -> String {
    format!("{series}:")
}

/// Multi-series time chart. Each yearly vertex is a reconciled mark so the
/// polyline animates with its points.
#[derive(Debug, Clone)]
pub struct LineChart {
    layout: ChartLayout,
    series: Vec<LineSeriesSpec>,
    points: Vec<SeriesPoint>,
    x_scale: TimeScale,
    y_scale: LinearScale,
    state: ChartState,
}

struct VertexEncoder<'a> {
    series: &'a [LineSeriesSpec],
    x_scale: TimeScale,
    y_scale: LinearScale,
}

impl MarkEncoder<SeriesPoint> for VertexEncoder<'_> {
    fn target(&self, point: &SeriesPoint, _index: usize) -> ChartResult<MarkAttributes> {
        let color = self
            .series
            .get(point.series)
            .map_or(Color::LABEL_GREY, |spec| spec.color);
        Ok(MarkAttributes::circle(
            self.x_scale.map(point.date),
            self.y_scale.map(point.value),
            VERTEX_RADIUS_PX,
            color,
        ))
    }

    fn initial(&self, _point: &SeriesPoint, _index: usize, target: &MarkAttributes) -> MarkAttributes {
        // Rise from the zero baseline.
        MarkAttributes {
            y: self.y_scale.map(0.0),
            ..*target
        }
    }
}

impl LineChart {
    pub fn new(layout: ChartLayout, timing: TransitionTiming) -> ChartResult<Self> {
        Self::with_series(layout, timing, LineSeriesSpec::money_defaults())
    }

    pub fn with_series(
        layout: ChartLayout,
        timing: TransitionTiming,
        series: Vec<LineSeriesSpec>,
    ) -> ChartResult<Self> {
        let layout = layout.validate()?;
        Ok(Self {
            layout,
            series,
            points: Vec::new(),
            x_scale: TimeScale::from_dates(std::iter::empty(), (0.0, layout.inner_width()))?,
            y_scale: LinearScale::new((0.0, 1.0), (layout.inner_height(), 0.0))?,
            state: ChartState::with_timing(timing)?,
        })
    }

    pub fn update(&mut self, dataset: &Dataset, now_ms: f64) -> ChartResult<ReconcileReport> {
        let mut points = Vec::new();
        for (series, spec) in self.series.iter().enumerate() {
            for total in yearly_totals(dataset.records(), spec.metric) {
                let Some(date) = total
                    .key
                    .parse::<i32>()
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                else {
                    continue;
                };
                points.push(SeriesPoint {
                    series,
                    date,
                    value: total.value,
                });
            }
        }

        let x_scale = TimeScale::from_dates(
            points.iter().map(|point| point.date),
            (0.0, self.layout.inner_width()),
        )?;
        let y_scale = LinearScale::from_zero_to_max(
            points.iter().map(|point| point.value),
            (self.layout.inner_height(), 0.0),
        )?;

        let encoder = VertexEncoder {
            series: &self.series,
            x_scale,
            y_scale,
        };
        let series = &self.series;
        let report = reconcile(
            &mut self.state,
            &points,
            |point| point.key(series),
            &encoder,
            now_ms,
        );

        let year_ticks: Vec<AxisTick> = x_scale
            .year_ticks(X_MAX_TICKS)
            .into_iter()
            .map(|date| AxisTick::new(date.format("%Y").to_string(), x_scale.map(date)))
            .collect();
        self.state.retarget_axis(AxisPosition::Bottom, &year_ticks);
        self.state
            .retarget_axis(AxisPosition::Left, &money_ticks(y_scale, Y_TICK_COUNT));

        debug!(
            series = self.series.len(),
            vertices = points.len(),
            "line chart updated"
        );
        self.points = points;
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        Ok(report)
    }

    pub fn advance(&mut self, now_ms: f64) -> Vec<MarkInstruction> {
        self.state.advance(now_ms)
    }

    pub fn settle(&mut self) -> Vec<MarkInstruction> {
        self.state.settle()
    }

    #[must_use]
    pub fn header(&self) -> &'static str {
        "Budget and Revenue over Time in $US"
    }

    #[must_use]
    pub fn series(&self) -> &[LineSeriesSpec] {
        &self.series
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn x_scale(&self) -> TimeScale {
        self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> LinearScale {
        self.y_scale
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[must_use]
    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    /// Current vertex positions of one series, ordered by x.
    #[must_use]
    pub fn series_path(&self, series: usize) -> Vec<(f64, f64)> {
        if series >= self.series.len() {
            return Vec::new();
        }
        let prefix = series_key_prefix(series);
        let mut path: Vec<(f64, f64)> = self
            .state
            .marks()
            .filter(|mark| mark.key().starts_with(&prefix))
            .map(|mark| (mark.attributes().x, mark.attributes().y))
            .collect();
        path.sort_by(|left, right| left.0.total_cmp(&right.0));
        path
    }

    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.layout.viewport);
        let left = self.layout.margins.left;
        let top = self.layout.margins.top;

        for (index, spec) in self.series.iter().enumerate() {
            let path = self.series_path(index);
            for pair in path.windows(2) {
                frame.lines.push(LinePrimitive::new(
                    left + pair[0].0,
                    top + pair[0].1,
                    left + pair[1].0,
                    top + pair[1].1,
                    LINE_STROKE_PX,
                    spec.color,
                ));
            }
            if let Some(&(x, y)) = path.last() {
                frame.texts.push(TextPrimitive::new(
                    spec.name.as_str(),
                    left + x + SERIES_LABEL_OFFSET_PX,
                    top + y,
                    TICK_FONT_PX,
                    spec.color,
                    TextHAlign::Left,
                ));
            }
        }
        for mark in self.state.marks() {
            push_circle_mark(&mut frame, self.layout, mark.key(), mark.attributes());
        }
        if let Some(axis) = self.state.axis(AxisPosition::Bottom) {
            push_axis(&mut frame, self.layout, axis, None);
        }
        if let Some(axis) = self.state.axis(AxisPosition::Left) {
            push_axis(&mut frame, self.layout, axis, Some(self.layout.inner_width()));
        }
        push_header(
            &mut frame,
            self.layout,
            0.6,
            self.header(),
            Some("Films w/ budget and revenue figures"),
        );
        frame
    }
}
