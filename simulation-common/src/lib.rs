pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    AgentParamsConfig, ConfigError, EnergyPolicy, InitialConditions, InteractionConfig,
    SimulationConfig, TimingConfig, UniverseConfig,
};
pub use sim_params::{AgentParams, SimParams};
pub use snapshot::{AgentState, RangeSummary, SimulationStats, Snapshot};
pub use vecmath::{angle_to_vec, clamp, vec_to_angle, Vec2};
