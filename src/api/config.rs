use serde::{Deserialize, Serialize};

use crate::core::{ChartLayout, DEFAULT_TOP_N, Margins, Metric, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::join::TransitionTiming;

/// Public dashboard bootstrap configuration.
///
/// Serializable so hosts can persist chart setup next to their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_bar_layout")]
    pub bar_layout: ChartLayout,
    #[serde(default = "default_square_layout")]
    pub line_layout: ChartLayout,
    #[serde(default = "default_square_layout")]
    pub scatter_layout: ChartLayout,
    #[serde(default)]
    pub timing: TransitionTiming,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Rows kept from the loaded feed; `None` keeps all of them.
    #[serde(default = "default_max_records")]
    pub max_records: Option<usize>,
    #[serde(default = "default_metric")]
    pub initial_metric: Metric,
}

fn default_bar_layout() -> ChartLayout {
    ChartLayout::new(Viewport::new(800, 700), Margins::new(90.0, 40.0, 40.0, 40.0))
}

fn default_square_layout() -> ChartLayout {
    ChartLayout::new(Viewport::new(700, 700), Margins::uniform(40.0))
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_max_records() -> Option<usize> {
    Some(100)
}

fn default_metric() -> Metric {
    Metric::Budget
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bar_layout: default_bar_layout(),
            line_layout: default_square_layout(),
            scatter_layout: default_square_layout(),
            timing: TransitionTiming::default(),
            top_n: default_top_n(),
            max_records: default_max_records(),
            initial_metric: default_metric(),
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    #[must_use]
    pub fn with_initial_metric(mut self, metric: Metric) -> Self {
        self.initial_metric = metric;
        self
    }

    #[must_use]
    pub fn with_bar_layout(mut self, layout: ChartLayout) -> Self {
        self.bar_layout = layout;
        self
    }

    #[must_use]
    pub fn with_line_layout(mut self, layout: ChartLayout) -> Self {
        self.line_layout = layout;
        self
    }

    #[must_use]
    pub fn with_scatter_layout(mut self, layout: ChartLayout) -> Self {
        self.scatter_layout = layout;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.bar_layout.validate()?;
        self.line_layout.validate()?;
        self.scatter_layout.validate()?;
        self.timing.validate()?;
        if self.top_n == 0 {
            return Err(ChartError::InvalidData(
                "top_n must be greater than zero".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()
    }
}
