use crate::agent::Agent;
use crate::boundary::Boundary;
use log::{debug, info, trace, warn};
use rand::prelude::*;
use simulation_common::config::{check_non_negative, check_range};
use simulation_common::{
    angle_to_vec, AgentState, ConfigError, RangeSummary, SimParams, SimulationConfig,
    SimulationStats, Snapshot, Vec2,
};
use std::f32::consts::TAU;
use std::fmt;

/// Owns the boundary, the agents and the random source, and advances them in lockstep.
pub struct Simulation {
    /// The simulation configuration, including initial conditions and parameters.
    config: SimulationConfig,
    params: SimParams,
    boundary: Boundary,
    /// Agents in creation order; the index is the agent's identity for the run.
    agents: Vec<Agent>,
    /// Every random draw of the run comes from here, seeded by `initial_conditions.seed`.
    rng: StdRng,
    current_time: f32,
    current_step: u64,
    /// Stores collected snapshots at record intervals.
    recorded_snapshots: Vec<Snapshot>,
}

impl Simulation {
    /// Validates `config`, builds the boundary and places the initial agents.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = config.get_sim_params();
        let boundary = Boundary::new(params.world_width, params.world_height)?;
        let rng = StdRng::seed_from_u64(config.initial_conditions.seed);

        let mut sim = Self {
            config,
            params,
            boundary,
            agents: Vec::new(),
            rng,
            current_time: 0.0,
            current_step: 0,
            recorded_snapshots: Vec::new(),
        };

        let initial = sim.config.initial_conditions.clone();
        sim.initialize_agents(
            initial.num_agents as usize,
            initial.energy_range,
            initial.speed_range,
            initial.placement_margin,
        )?;

        Ok(sim)
    }

    /// Replaces the agent list with `count` freshly drawn agents.
    ///
    /// Positions are uniform in `[margin, dimension - margin]` per axis,
    /// headings uniform in `[0, 2π)`, speed and energy uniform in their ranges.
    pub fn initialize_agents(
        &mut self,
        count: usize,
        energy_range: (f32, f32),
        speed_range: (f32, f32),
        margin: f32,
    ) -> Result<(), ConfigError> {
        check_range("energy_range", energy_range)?;
        check_range("speed_range", speed_range)?;
        check_non_negative("placement_margin", margin)?;
        let (width, height) = (self.boundary.width(), self.boundary.height());
        if 2.0 * margin > width.min(height) {
            return Err(ConfigError::MarginTooLarge { margin, width, height });
        }

        let agent_params = self.params.agent;
        let rng = &mut self.rng;
        self.agents = (0..count)
            .map(|_| {
                let position = Vec2::new(
                    rng.random_range(margin..=width - margin),
                    rng.random_range(margin..=height - margin),
                );
                let heading = rng.random_range(0.0..TAU);
                let speed = rng.random_range(speed_range.0..=speed_range.1);
                let energy = rng.random_range(energy_range.0..=energy_range.1);
                Agent::new(position, angle_to_vec(heading) * speed, energy, agent_params)
            })
            .collect();

        info!("Initialized {} agents", self.agents.len());
        Ok(())
    }

    /// Appends a hand-built agent and returns its index.
    pub fn add_agent(&mut self, agent: Agent) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Advances the simulation by one time step.
    ///
    /// 1. Every agent that can move integrates position and updates energy.
    ///    Resting agents are left untouched unless `resting_agents_recharge`
    ///    is set, in which case they run their energy update too.
    /// 2. Each pair `i < j` with at least one mover is tested against the
    ///    interaction radius; in range, `i` reacts first and `j` second.
    /// 3. Movers near a wall slide along it.
    /// 4. Time advances by `time_step`.
    pub fn step(&mut self) {
        let dt = self.params.dt;
        let noise = self.params.velocity_noise_std;
        let recharge = self.params.resting_agents_recharge;

        for agent in self.agents.iter_mut().filter(|a| recharge || a.can_move()) {
            agent.update(dt, noise, &mut self.rng);
        }

        self.resolve_agent_interactions();

        for agent in self.agents.iter_mut().filter(|a| a.can_move()) {
            agent.interact_with_boundary(&self.boundary);
        }

        self.current_time += dt;
        self.current_step += 1;
        trace!(
            "Step {} done (t = {:.2}, moving {}/{})",
            self.current_step,
            self.current_time,
            self.moving_count(),
            self.agents.len()
        );
    }

    /// Sequential scan over unordered pairs. A reaction only changes the
    /// reacting agent's heading, never its position or speed, so later pairs
    /// see the same geometry whether or not earlier pairs reacted.
    fn resolve_agent_interactions(&mut self) {
        let radius = self.params.interaction_radius;
        let n = self.agents.len();
        for i in 0..n {
            let (head, tail) = self.agents.split_at_mut(i + 1);
            let first = &mut head[i];
            for second in tail.iter_mut() {
                if !first.can_move() && !second.can_move() {
                    continue;
                }
                if !first.detect_collision(second, radius) {
                    continue;
                }
                if first.can_move() {
                    first.interact_with_agent(second);
                }
                if second.can_move() {
                    second.interact_with_agent(first);
                }
            }
        }
    }

    /// Runs `floor(duration / time_step)` steps, logging progress and final statistics.
    ///
    /// A non-finite `duration` runs nothing and returns the current statistics.
    pub fn run(&mut self, duration: f32) -> SimulationStats {
        let dt = self.params.dt;
        if !duration.is_finite() {
            warn!("Duration {} is not finite; nothing to run.", duration);
            return self.stats();
        }
        let num_steps = (duration / dt).floor().max(0.0) as u64;
        if num_steps == 0 {
            warn!("Duration {:.3} is shorter than one time step ({:.3}); nothing to run.", duration, dt);
        }

        let timing = &self.config.timing;
        let report_every = (num_steps / u64::from(timing.progress_reports.max(1))).max(1);
        let record_every = if timing.record_interval > 0.0 {
            Some(((timing.record_interval / dt).round() as u64).max(1))
        } else {
            None
        };

        info!("Running simulation for {:.2} time units ({} steps)", duration, num_steps);
        info!(
            "Time step: {}, Interaction radius: {}, Noise std dev: {}",
            dt, self.params.interaction_radius, self.params.velocity_noise_std
        );
        debug!("Simulation parameters: {:#?}", self.params);

        // Skipped when a previous run already recorded this step.
        let last_step = self.recorded_snapshots.last().map(|s| s.step);
        if record_every.is_some() && last_step != Some(self.current_step) {
            self.record_snapshot();
        }

        for step in 1..=num_steps {
            self.step();

            if step % report_every == 0 {
                info!(
                    "Step {}/{} - Time: {:.2} - Moving agents: {}/{}",
                    step,
                    num_steps,
                    self.current_time,
                    self.moving_count(),
                    self.agents.len()
                );
            }

            if let Some(every) = record_every {
                if step % every == 0 || step == num_steps {
                    self.record_snapshot();
                }
            }
        }

        let stats = self.stats();
        log_stats(&stats);
        stats
    }

    /// Number of agents currently moving.
    pub fn moving_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_moving()).count()
    }

    /// Aggregate counts and energy / movement-time ranges over all agents.
    pub fn stats(&self) -> SimulationStats {
        let moving = self.moving_count() as u32;
        let total = self.agents.len() as u32;
        SimulationStats {
            time: self.current_time,
            total_agents: total,
            moving,
            stopped: total - moving,
            energy: RangeSummary::from_values(self.agents.iter().map(Agent::energy)),
            movement_time: RangeSummary::from_values(self.agents.iter().map(Agent::movement_time)),
        }
    }

    /// Current positions in agent index order.
    pub fn positions(&self) -> Vec<(f32, f32)> {
        self.agents.iter().map(|a| (a.position().x, a.position().y)).collect()
    }

    /// `is_moving` flag per agent, in agent index order.
    pub fn moving_flags(&self) -> Vec<bool> {
        self.agents.iter().map(Agent::is_moving).collect()
    }

    pub fn agent_states(&self) -> Vec<AgentState> {
        self.agents.iter().enumerate().map(|(id, a)| a.state(id)).collect()
    }

    /// The per-frame renderer feed for the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.current_time,
            step: self.current_step,
            total_agents: self.agents.len() as u32,
            moving_agents: self.moving_count() as u32,
            positions: self.positions(),
            moving: self.moving_flags(),
        }
    }

    /// Captures the current state into the recorded snapshot list.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        debug!(
            "Recording snapshot at t = {:.2} ({} of {} moving)",
            snapshot.time, snapshot.moving_agents, snapshot.total_agents
        );
        self.recorded_snapshots.push(snapshot);
    }

    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulation(agents={}, boundary={}x{}, time={:.2})",
            self.agents.len(),
            self.boundary.width(),
            self.boundary.height(),
            self.current_time
        )
    }
}

fn log_stats(stats: &SimulationStats) {
    info!("Final statistics at t = {:.2}:", stats.time);
    info!("Total agents: {}", stats.total_agents);
    info!("Still moving: {}", stats.moving);
    info!("Stopped: {}", stats.stopped);
    if let Some(energy) = stats.energy {
        info!("Energy - Min: {:.2}, Max: {:.2}, Avg: {:.2}", energy.min, energy.max, energy.mean);
    }
    if let Some(movement) = stats.movement_time {
        info!(
            "Movement time - Min: {:.2}, Max: {:.2}, Avg: {:.2}",
            movement.min, movement.max, movement.mean
        );
    }
}
