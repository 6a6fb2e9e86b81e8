use crate::sim_params::{AgentParams, SimParams};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world dimensions must be positive and finite (got {width} x {height})")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("time_step must be positive and finite (got {0})")]
    InvalidTimeStep(f32),
    #[error("{name} must be a non-negative, ordered range (got [{min}, {max}])")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be non-negative and finite (got {value})")]
    NegativeParameter { name: &'static str, value: f32 },
    #[error("resume_probability must lie in [0, 1] (got {0})")]
    InvalidProbability(f32),
    #[error("placement margin {margin} leaves no room in a {width} x {height} world")]
    MarginTooLarge { margin: f32, width: f32, height: f32 },
}

/// Checks that `(min, max)` is a finite, non-negative, ordered range.
pub fn check_range(name: &'static str, range: (f32, f32)) -> Result<(), ConfigError> {
    let (min, max) = range;
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}

/// Checks that a scalar parameter is finite and `>= 0`.
pub fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NegativeParameter { name, value });
    }
    Ok(())
}

/// Checks world dimensions for a rectangular boundary.
pub fn check_world_size(width: f32, height: f32) -> Result<(), ConfigError> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(ConfigError::InvalidWorldSize { width, height });
    }
    Ok(())
}

// Configuration for universe properties
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UniverseConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        UniverseConfig { width: 800.0, height: 600.0 }
    }
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub time_step: f32,
    pub total_time: f32,
    /// Simulated time between recorded snapshots; 0 disables recording.
    pub record_interval: f32,
    /// Number of progress lines logged over a run.
    pub progress_reports: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            time_step: 0.1,
            total_time: 25.0,
            record_interval: 1.0,
            progress_reports: 10,
        }
    }
}

// Initial conditions for the simulation, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InitialConditions {
    pub num_agents: u32,
    pub energy_range: (f32, f32),
    pub speed_range: (f32, f32),
    /// Distance from every wall kept free when placing agents.
    pub placement_margin: f32,
    pub seed: u64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            num_agents: 20,
            energy_range: (0.5, 1.0),
            speed_range: (10.0, 30.0),
            placement_margin: 20.0,
            seed: 42,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    pub interaction_radius: f32,
    /// Standard deviation of the per-axis noise added to velocity while integrating.
    pub velocity_noise_std: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig { interaction_radius: 50.0, velocity_noise_std: 0.5 }
    }
}

/// How an agent's energy evolves and when it stops or resumes.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPolicy {
    /// Energy decays while moving and scales velocity; resting agents recharge
    /// and may resume once full.
    #[default]
    Regenerating,
    /// Energy is a movement-time budget; agents stop for good once spent.
    FixedBudget,
}

// Parameters for agent behavior, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AgentParamsConfig {
    pub radius: f32,
    pub energy_decay: f32,
    pub energy_gain: f32,
    pub stop_speed_threshold: f32,
    pub resume_probability: f32,
    pub boundary_buffer: f32,
    pub wall_push: f32,
    pub energy_policy: EnergyPolicy,
    /// When set, resting agents also run their energy update each step and
    /// can recharge back into motion. Off by default: resting agents stay parked.
    pub resting_agents_recharge: bool,
}

impl Default for AgentParamsConfig {
    fn default() -> Self {
        let defaults = AgentParams::default();
        AgentParamsConfig {
            radius: defaults.radius,
            energy_decay: defaults.energy_decay,
            energy_gain: defaults.energy_gain,
            stop_speed_threshold: defaults.stop_speed_threshold,
            resume_probability: defaults.resume_probability,
            boundary_buffer: defaults.boundary_buffer,
            wall_push: defaults.wall_push,
            energy_policy: defaults.energy_policy,
            resting_agents_recharge: false,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub universe: UniverseConfig,
    pub timing: TimingConfig,
    pub initial_conditions: InitialConditions,
    pub interaction: InteractionConfig,
    pub agent_params: AgentParamsConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid configuration in '{}'", path_ref.display()))?;

        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let universe = &self.universe;
        check_world_size(universe.width, universe.height)?;

        let dt = self.timing.time_step;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(dt));
        }
        check_non_negative("total_time", self.timing.total_time)?;
        check_non_negative("record_interval", self.timing.record_interval)?;

        let initial = &self.initial_conditions;
        check_range("energy_range", initial.energy_range)?;
        check_range("speed_range", initial.speed_range)?;
        check_non_negative("placement_margin", initial.placement_margin)?;
        if 2.0 * initial.placement_margin > universe.width.min(universe.height) {
            return Err(ConfigError::MarginTooLarge {
                margin: initial.placement_margin,
                width: universe.width,
                height: universe.height,
            });
        }

        check_non_negative("interaction_radius", self.interaction.interaction_radius)?;
        check_non_negative("velocity_noise_std", self.interaction.velocity_noise_std)?;

        let agent = &self.agent_params;
        check_non_negative("radius", agent.radius)?;
        check_non_negative("energy_decay", agent.energy_decay)?;
        check_non_negative("energy_gain", agent.energy_gain)?;
        check_non_negative("stop_speed_threshold", agent.stop_speed_threshold)?;
        check_non_negative("boundary_buffer", agent.boundary_buffer)?;
        check_non_negative("wall_push", agent.wall_push)?;
        let p = agent.resume_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability(p));
        }

        Ok(())
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        let agent = &self.agent_params;
        SimParams {
            world_width: self.universe.width,
            world_height: self.universe.height,
            dt: self.timing.time_step,
            interaction_radius: self.interaction.interaction_radius,
            velocity_noise_std: self.interaction.velocity_noise_std,
            resting_agents_recharge: agent.resting_agents_recharge,
            agent: AgentParams {
                radius: agent.radius,
                energy_decay: agent.energy_decay,
                energy_gain: agent.energy_gain,
                stop_speed_threshold: agent.stop_speed_threshold,
                resume_probability: agent.resume_probability,
                boundary_buffer: agent.boundary_buffer,
                wall_push: agent.wall_push,
                energy_policy: agent.energy_policy,
            },
        }
    }
}
