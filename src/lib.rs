//! movie-charts: data-join chart core for a movie metadata dashboard.
//!
//! Raw rows are parsed into typed records, aggregated per metric, mapped
//! through scales and reconciled against persistent visual marks with
//! interruptible enter/update/exit transitions.

pub mod api;
pub mod core;
pub mod error;
pub mod feed;
pub mod join;
pub mod render;
pub mod telemetry;

pub use api::{BarChart, Dashboard, DashboardConfig, LineChart, ScatterPlot};
pub use error::{ChartError, ChartResult};
pub use join::{ChartState, MarkInstruction, TransitionTiming, reconcile};
