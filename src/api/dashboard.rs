use tracing::{debug, info};

use crate::core::{Dataset, Metric, ParseReport, RawRow, parse_dataset};
use crate::error::ChartResult;
use crate::join::{MarkInstruction, ReconcileReport};
use crate::render::Renderer;

use super::{
    BarChart, ChartSnapshot, DashboardConfig, DashboardSnapshot, LineChart, ScatterPlot,
};

/// Result of pushing a freshly loaded dataset through all three charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardUpdate {
    pub parse: ParseReport,
    pub bar: ReconcileReport,
    pub line: ReconcileReport,
    pub scatter: ReconcileReport,
}

/// Mark mutations emitted by one `Dashboard::advance` tick, per chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardTick {
    pub bar: Vec<MarkInstruction>,
    pub line: Vec<MarkInstruction>,
    pub scatter: Vec<MarkInstruction>,
}

impl DashboardTick {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bar.is_empty() && self.line.is_empty() && self.scatter.is_empty()
    }
}

/// Three coordinated charts over one shared dataset.
///
/// The dataset is replaced wholesale on load; metric selection only
/// re-aggregates the bar chart.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    dataset: Dataset,
    parse_report: ParseReport,
    metric: Metric,
    bar: BarChart,
    line: LineChart,
    scatter: ScatterPlot,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            bar: BarChart::new(config.bar_layout, config.timing, config.top_n)?,
            line: LineChart::new(config.line_layout, config.timing)?,
            scatter: ScatterPlot::new(config.scatter_layout, config.timing)?,
            dataset: Dataset::default(),
            parse_report: ParseReport::default(),
            metric: config.initial_metric,
            config,
        })
    }

    /// Parses `rows`, keeps at most `max_records` of them and refreshes every chart.
    pub fn on_data_loaded(&mut self, rows: &[RawRow], now_ms: f64) -> ChartResult<DashboardUpdate> {
        let kept = self
            .config
            .max_records
            .map_or(rows.len(), |limit| limit.min(rows.len()));
        let (dataset, parse) = parse_dataset(&rows[..kept]);
        info!(
            rows = rows.len(),
            kept,
            defaults = parse.defaults_total(),
            "dataset loaded"
        );
        self.dataset = dataset;
        self.parse_report = parse;

        let bar = self.bar.update(&self.dataset, self.metric, now_ms)?;
        let line = self.line.update(&self.dataset, now_ms)?;
        let scatter = self.scatter.update(&self.dataset, now_ms)?;
        Ok(DashboardUpdate {
            parse,
            bar,
            line,
            scatter,
        })
    }

    /// Switches the bar chart to `metric`, reconciling against its live bars.
    pub fn select_metric(&mut self, metric: Metric, now_ms: f64) -> ChartResult<ReconcileReport> {
        debug!(from = self.metric.name(), to = metric.name(), "metric selected");
        self.metric = metric;
        self.bar.update(&self.dataset, metric, now_ms)
    }

    pub fn advance(&mut self, now_ms: f64) -> DashboardTick {
        DashboardTick {
            bar: self.bar.advance(now_ms),
            line: self.line.advance(now_ms),
            scatter: self.scatter.advance(now_ms),
        }
    }

    /// Jumps every running transition to its end.
    pub fn settle(&mut self) -> DashboardTick {
        DashboardTick {
            bar: self.bar.settle(),
            line: self.line.settle(),
            scatter: self.scatter.settle(),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.bar.state().is_idle() && self.line.state().is_idle() && self.scatter.state().is_idle()
    }

    /// Builds and hands each chart's frame to `renderer`, bar first.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.bar.frame())?;
        renderer.render(&self.line.frame())?;
        renderer.render(&self.scatter.frame())
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            metric: self.metric,
            record_count: self.dataset.len(),
            parse: self.parse_report,
            bar: ChartSnapshot::capture(self.bar.header(), self.bar.state()),
            line: ChartSnapshot::capture(self.line.header(), self.line.state()),
            scatter: ChartSnapshot::capture(self.scatter.header(), self.scatter.state()),
        }
    }

    #[must_use]
    pub fn config(&self) -> DashboardConfig {
        self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn parse_report(&self) -> ParseReport {
        self.parse_report
    }

    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    #[must_use]
    pub fn bar_chart(&self) -> &BarChart {
        &self.bar
    }

    #[must_use]
    pub fn line_chart(&self) -> &LineChart {
        &self.line
    }

    #[must_use]
    pub fn scatter_plot(&self) -> &ScatterPlot {
        &self.scatter
    }
}
