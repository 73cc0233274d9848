//! Chart front-ends: the ranked bar chart, the yearly line chart, the
//! budget/revenue scatter plot and the dashboard that drives them together.

mod bar_chart;
mod chart_frame;
mod config;
mod dashboard;
mod line_chart;
mod scatter_plot;
mod snapshot;

pub use bar_chart::{BAR_PADDING_INNER, BarChart};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardTick, DashboardUpdate};
pub use line_chart::{LineChart, LineSeriesSpec, SeriesPoint};
pub use scatter_plot::{
    BUDGET_PADDING, REVENUE_PADDING, SCATTER_OPACITY, SCATTER_RADIUS_PX, ScatterPlot,
};
pub use snapshot::{
    AxisSnapshot, ChartSnapshot, DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1, DashboardSnapshot,
    DashboardSnapshotJsonContractV1, MarkSnapshot,
};
