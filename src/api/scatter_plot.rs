use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::{ChartLayout, Dataset, LinearScale, Record, ScalePadding};
use crate::error::ChartResult;
use crate::join::{
    AxisPosition, ChartState, MarkAttributes, MarkEncoder, MarkInstruction, ReconcileReport,
    TransitionTiming, reconcile,
};
use crate::render::{Color, RenderFrame, TextHAlign, TextPrimitive};

use super::chart_frame::{
    TICK_FONT_PX, money_ticks, push_axis, push_circle_mark, push_header,
};

pub const SCATTER_RADIUS_PX: f64 = 3.0;
pub const SCATTER_OPACITY: f64 = 0.7;
pub const BUDGET_PADDING: ScalePadding = ScalePadding::new(0.95, 1.05);
pub const REVENUE_PADDING: ScalePadding = ScalePadding::new(0.1, 1.1);
const AXIS_TICK_COUNT: usize = 5;
const AXIS_TITLE_GAP_PX: f64 = 30.0;

/// Budget against revenue, one dot per film.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    layout: ChartLayout,
    records: Vec<Record>,
    x_scale: LinearScale,
    y_scale: LinearScale,
    state: ChartState,
}

struct DotEncoder {
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl MarkEncoder<Record> for DotEncoder {
    fn target(&self, record: &Record, _index: usize) -> ChartResult<MarkAttributes> {
        Ok(MarkAttributes::circle(
            self.x_scale.map(record.budget),
            self.y_scale.map(record.revenue),
            SCATTER_RADIUS_PX,
            Color::DODGER_BLUE,
        )
        .with_opacity(SCATTER_OPACITY))
    }
}

impl ScatterPlot {
    pub fn new(layout: ChartLayout, timing: TransitionTiming) -> ChartResult<Self> {
        let layout = layout.validate()?;
        Ok(Self {
            layout,
            records: Vec::new(),
            x_scale: LinearScale::new((0.0, 1.0), (0.0, layout.inner_width()))?,
            y_scale: LinearScale::new((0.0, 1.0), (layout.inner_height(), 0.0))?,
            state: ChartState::with_timing(timing)?,
        })
    }

    /// Re-plots every record, largest budget first so small dots draw on top.
    pub fn update(&mut self, dataset: &Dataset, now_ms: f64) -> ChartResult<ReconcileReport> {
        let mut records = dataset.records().to_vec();
        records.sort_by_key(|record| Reverse(OrderedFloat(record.budget)));

        let x_scale = LinearScale::from_values(
            records.iter().map(|record| record.budget),
            (0.0, self.layout.inner_width()),
            BUDGET_PADDING,
        )?;
        let y_scale = LinearScale::from_values(
            records.iter().map(|record| record.revenue),
            (self.layout.inner_height(), 0.0),
            REVENUE_PADDING,
        )?;

        let encoder = DotEncoder { x_scale, y_scale };
        let report = reconcile(
            &mut self.state,
            &records,
            |record| record.identity().to_owned(),
            &encoder,
            now_ms,
        );
        self.state
            .retarget_axis(AxisPosition::Bottom, &money_ticks(x_scale, AXIS_TICK_COUNT));
        self.state
            .retarget_axis(AxisPosition::Left, &money_ticks(y_scale, AXIS_TICK_COUNT));

        debug!(dots = records.len(), duplicates = report.duplicates.len(), "scatter plot updated");
        self.records = records;
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
        "Budget vs. Revenue in $US"
    }

    /// Plotted records in draw order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn x_scale(&self) -> LinearScale {
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

    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.layout.viewport);
        for mark in self.state.marks() {
            push_circle_mark(&mut frame, self.layout, mark.key(), mark.attributes());
        }
        if let Some(axis) = self.state.axis(AxisPosition::Bottom) {
            push_axis(&mut frame, self.layout, axis, None);
        }
        if let Some(axis) = self.state.axis(AxisPosition::Left) {
            push_axis(&mut frame, self.layout, axis, None);
        }

        let left = self.layout.margins.left;
        let top = self.layout.margins.top;
        frame.texts.push(TextPrimitive::new(
            "Budget",
            left + self.layout.inner_width(),
            top + self.layout.inner_height() + AXIS_TITLE_GAP_PX,
            TICK_FONT_PX,
            Color::LABEL_GREY,
            TextHAlign::Right,
        ));
        frame.texts.push(TextPrimitive::new(
            "Revenue",
            left + 5.0,
            top,
            TICK_FONT_PX,
            Color::LABEL_GREY,
            TextHAlign::Left,
        ));
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
