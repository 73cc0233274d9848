use tracing::debug;

use crate::core::{
    AggregatedPoint, BandScale, ChartLayout, Dataset, LinearScale, Metric, cut_text,
    ranked_by_title,
};
use crate::error::{ChartError, ChartResult};
use crate::join::{
    AxisPosition, AxisTick, ChartState, MarkAttributes, MarkEncoder, MarkInstruction,
    ReconcileReport, TransitionTiming, reconcile,
};
use crate::render::{Color, RenderFrame};

use super::chart_frame::{money_ticks, push_axis, push_header, push_rect_mark};

/// Inner padding between bands, as a fraction of the band step.
pub const BAR_PADDING_INNER: f64 = 0.25;
const X_TICK_COUNT: usize = 10;

/// Horizontal ranked bar chart: one bar per title, top-N by the selected metric.
#[derive(Debug, Clone)]
pub struct BarChart {
    layout: ChartLayout,
    top_n: usize,
    metric: Metric,
    points: Vec<AggregatedPoint>,
    x_scale: LinearScale,
    y_scale: BandScale,
    state: ChartState,
}

struct BarEncoder<'a> {
    x_scale: LinearScale,
    y_scale: &'a BandScale,
}

impl MarkEncoder<AggregatedPoint> for BarEncoder<'_> {
    fn target(&self, point: &AggregatedPoint, _index: usize) -> ChartResult<MarkAttributes> {
        let label = cut_text(&point.key);
        let y = self.y_scale.map(&label).ok_or_else(|| ChartError::Attribute {
            key: point.key.clone(),
            reason: "title missing from band scale".to_owned(),
        })?;
        let width = self.x_scale.map(point.value).max(0.0);
        Ok(MarkAttributes::rect(
            0.0,
            y,
            width,
            self.y_scale.bandwidth(),
            Color::DODGER_BLUE,
        ))
    }

    fn initial(&self, _point: &AggregatedPoint, _index: usize, target: &MarkAttributes) -> MarkAttributes {
        target.with_width(0.0).with_fill(Color::LIGHT_CYAN)
    }
}

impl BarChart {
    pub fn new(layout: ChartLayout, timing: TransitionTiming, top_n: usize) -> ChartResult<Self> {
        let layout = layout.validate()?;
        Ok(Self {
            layout,
            top_n,
            metric: Metric::Budget,
            points: Vec::new(),
            x_scale: LinearScale::new((0.0, 1.0), (0.0, layout.inner_width()))?,
            y_scale: BandScale::new(Vec::<String>::new(), (0.0, layout.inner_height()), BAR_PADDING_INNER)?,
            state: ChartState::with_timing(timing)?,
        })
    }

    /// Re-aggregates `dataset` by `metric` and reconciles the bars.
    pub fn update(&mut self, dataset: &Dataset, metric: Metric, now_ms: f64) -> ChartResult<ReconcileReport> {
        let points = ranked_by_title(dataset.records(), metric, self.top_n);
        let x_scale = LinearScale::from_zero_to_max(
            points.iter().map(|point| point.value),
            (0.0, self.layout.inner_width()),
        )?;
        let y_scale = BandScale::new(
            points.iter().map(|point| cut_text(&point.key)),
            (0.0, self.layout.inner_height()),
            BAR_PADDING_INNER,
        )?;

        let encoder = BarEncoder {
            x_scale,
            y_scale: &y_scale,
        };
        let report = reconcile(
            &mut self.state,
            &points,
            |point| point.key.clone(),
            &encoder,
            now_ms,
        );

        let band_ticks: Vec<AxisTick> = y_scale
            .keys()
            .filter_map(|label| {
                y_scale
                    .map(label)
                    .map(|start| AxisTick::new(label, start + y_scale.bandwidth() / 2.0))
            })
            .collect();
        self.state
            .retarget_axis(AxisPosition::Top, &money_ticks(x_scale, X_TICK_COUNT));
        self.state.retarget_axis(AxisPosition::Left, &band_ticks);

        debug!(metric = metric.name(), bars = points.len(), "bar chart updated");
        self.metric = metric;
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
        self.metric.header()
    }

    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    #[must_use]
    pub fn points(&self) -> &[AggregatedPoint] {
        &self.points
    }

    #[must_use]
    pub fn x_scale(&self) -> LinearScale {
        self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> &BandScale {
        &self.y_scale
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[must_use]
    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn set_timing(&mut self, timing: TransitionTiming) -> ChartResult<()> {
        self.state.set_timing(timing)
    }

    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.layout.viewport);
        for mark in self.state.marks() {
            push_rect_mark(&mut frame, self.layout, mark.key(), mark.attributes());
        }
        if let Some(axis) = self.state.axis(AxisPosition::Top) {
            push_axis(&mut frame, self.layout, axis, Some(self.layout.inner_height()));
        }
        if let Some(axis) = self.state.axis(AxisPosition::Left) {
            push_axis(&mut frame, self.layout, axis, None);
        }
        push_header(&mut frame, self.layout, 0.5, self.header(), None);
        frame
    }
}
