//! Keyed data join between a data sequence and persistent visual marks.

mod axis;
mod engine;
mod mark;
mod timing;
mod transition;

pub use axis::{AxisPosition, AxisState, AxisTick, RenderedTick};
pub use engine::{ChartState, MarkEncoder, ReconcileReport, reconcile};
pub use mark::{
    AttributeChange, MarkAttributes, MarkId, MarkInstruction, MarkPhase, VisualMark,
};
pub use timing::{Easing, TransitionTiming};
pub use transition::Transition;
