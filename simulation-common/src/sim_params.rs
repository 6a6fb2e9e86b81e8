use crate::config::EnergyPolicy;
use serde::{Deserialize, Serialize};

/// Per-agent behaviour constants, copied into every agent at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    /// Nominal footprint; widens the wall-proximity test.
    pub radius: f32,
    /// Exponential decay rate of energy while moving (1/time).
    pub energy_decay: f32,
    /// Fraction of max energy regained per resting step.
    pub energy_gain: f32,
    /// Speed below which a moving agent comes to rest.
    pub stop_speed_threshold: f32,
    /// Chance per step that a fully recharged agent starts moving again.
    pub resume_probability: f32,
    /// Extra distance beyond `radius` at which walls start redirecting.
    pub boundary_buffer: f32,
    /// Distance an agent is pushed along the inward normal on a wall hit.
    pub wall_push: f32,
    pub energy_policy: EnergyPolicy,
}

impl Default for AgentParams {
    fn default() -> Self {
        AgentParams {
            radius: 5.0,
            energy_decay: 0.1,
            energy_gain: 0.01,
            stop_speed_threshold: 1.0,
            resume_probability: 0.3,
            boundary_buffer: 15.0,
            wall_push: 2.0,
            energy_policy: EnergyPolicy::Regenerating,
        }
    }
}

/// Simulation parameters derived from the configuration, used frequently during simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // World
    pub world_width: f32,
    pub world_height: f32,

    // Time
    pub dt: f32,

    // Interaction
    pub interaction_radius: f32,
    pub velocity_noise_std: f32,

    // Agent behaviour
    /// Whether resting agents run their energy update during a step.
    pub resting_agents_recharge: bool,
    pub agent: AgentParams,
}
