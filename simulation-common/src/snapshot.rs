use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// The per-frame view handed to a renderer: where every agent is and whether it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The simulation time at which the snapshot was taken.
    pub time: f32,
    /// Number of completed steps.
    pub step: u64,
    pub total_agents: u32,
    pub moving_agents: u32,
    /// Positions in agent index order.
    pub positions: Vec<(f32, f32)>,
    /// `moving[i]` is true while agent `i` is moving.
    pub moving: Vec<bool>,
}

/// Read-only report of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub energy: f32,
    pub is_moving: bool,
    pub movement_time: f32,
}

/// Min / max / mean of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl RangeSummary {
    /// Summarizes `values`, or returns `None` when there are none.
    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v as f64;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }
        Some(RangeSummary { min, max, mean: (sum / count as f64) as f32 })
    }
}

/// Aggregate statistics over all agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub time: f32,
    pub total_agents: u32,
    pub moving: u32,
    pub stopped: u32,
    /// `None` when there are no agents.
    pub energy: Option<RangeSummary>,
    pub movement_time: Option<RangeSummary>,
}
