use serde::{Deserialize, Serialize};

use crate::core::{Metric, ParseReport};
use crate::error::{ChartError, ChartResult};
use crate::join::{AxisPosition, ChartState, MarkAttributes, MarkPhase, RenderedTick};

pub const DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkSnapshot {
    pub key: String,
    pub id: u64,
    pub phase: MarkPhase,
    pub attributes: MarkAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSnapshot {
    pub position: AxisPosition,
    pub ticks: Vec<RenderedTick>,
}

/// Point-in-time view of one chart's marks and axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub header: String,
    pub generation: u64,
    pub now_ms: f64,
    pub marks: Vec<MarkSnapshot>,
    #[serde(default)]
    pub axes: Vec<AxisSnapshot>,
}

impl ChartSnapshot {
    #[must_use]
    pub fn capture(header: &str, state: &ChartState) -> Self {
        let marks = state
            .marks()
            .map(|mark| MarkSnapshot {
                key: mark.key().to_owned(),
                id: mark.id().get(),
                phase: mark.phase(),
                attributes: *mark.attributes(),
            })
            .collect();
        let axes = [
            AxisPosition::Top,
            AxisPosition::Right,
            AxisPosition::Bottom,
            AxisPosition::Left,
        ]
        .into_iter()
        .filter_map(|position| {
            state.axis(position).map(|axis| AxisSnapshot {
                position,
                ticks: axis.ticks().collect(),
            })
        })
        .collect();
        Self {
            header: header.to_owned(),
            generation: state.generation(),
            now_ms: state.now_ms(),
            marks,
            axes,
        }
    }

    #[must_use]
    pub fn mark(&self, key: &str) -> Option<&MarkSnapshot> {
        self.marks.iter().find(|mark| mark.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub metric: Metric,
    pub record_count: usize,
    #[serde(default)]
    pub parse: ParseReport,
    pub bar: ChartSnapshot,
    pub line: ChartSnapshot,
    pub scatter: ChartSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: DashboardSnapshot,
}

impl DashboardSnapshot {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot json: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = DashboardSnapshotJsonContractV1 {
            schema_version: DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<DashboardSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: DashboardSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != DASHBOARD_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
