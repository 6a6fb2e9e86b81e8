use crate::boundary::Boundary;
use rand::Rng;
use simulation_common::{angle_to_vec, AgentParams, AgentState, EnergyPolicy, Vec2};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

/// Movement state of an agent. Resting agents carry no velocity at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Moving { velocity: Vec2 },
    Resting,
}

/// A point mass that moves while it has energy and recharges while resting.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    position: Vec2,
    motion: Motion,
    energy: f32,
    /// Initial energy; resting never recharges past it.
    max_energy: f32,
    /// Speed of the initial velocity, restored whenever the agent resumes.
    base_speed: f32,
    movement_time: f32,
    params: AgentParams,
}

impl Agent {
    /// Creates a moving agent. `energy` also becomes its maximum energy.
    pub fn new(position: Vec2, velocity: Vec2, energy: f32, params: AgentParams) -> Self {
        Agent {
            position,
            motion: Motion::Moving { velocity },
            energy,
            max_energy: energy,
            base_speed: velocity.length(),
            movement_time: 0.0,
            params,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Current velocity; zero while resting.
    pub fn velocity(&self) -> Vec2 {
        match self.motion {
            Motion::Moving { velocity } => velocity,
            Motion::Resting => Vec2::zero(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn max_energy(&self) -> f32 {
        self.max_energy
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn movement_time(&self) -> f32 {
        self.movement_time
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, Motion::Moving { .. })
    }

    /// Whether the agent takes part in motion and interactions this step.
    pub fn can_move(&self) -> bool {
        self.is_moving()
    }

    /// Integrates position over `delta_time`, then updates energy.
    ///
    /// With `std_dev > 0` the position advances along a noisy copy of the
    /// velocity; the stored velocity itself is not perturbed. The energy
    /// update runs whether or not the agent moved.
    pub fn update<R: Rng + ?Sized>(&mut self, delta_time: f32, std_dev: f32, rng: &mut R) {
        if let Motion::Moving { velocity } = self.motion {
            let mut effective = velocity;
            if std_dev > 0.0 {
                effective.add_randomness(std_dev, rng);
            }
            self.position += effective * delta_time;
            self.movement_time += delta_time;
        }
        self.energy_update(delta_time, rng);
    }

    /// Applies the agent's energy policy for one step.
    pub fn energy_update<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) {
        match self.params.energy_policy {
            EnergyPolicy::Regenerating => self.regenerating_update(delta_time, rng),
            EnergyPolicy::FixedBudget => {
                if self.is_moving() && self.movement_time >= self.energy {
                    self.motion = Motion::Resting;
                }
            }
        }
    }

    fn regenerating_update<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) {
        match self.motion {
            Motion::Moving { velocity } => {
                self.energy *= (-self.params.energy_decay * delta_time).exp();
                // Scaled by raw energy, not by energy / max_energy.
                let velocity = velocity * self.energy;
                self.motion = if velocity.length() < self.params.stop_speed_threshold {
                    Motion::Resting
                } else {
                    Motion::Moving { velocity }
                };
            }
            Motion::Resting => {
                self.energy = (self.energy + self.params.energy_gain * self.max_energy)
                    .min(self.max_energy);
                if self.energy == self.max_energy
                    && rng.random::<f32>() < self.params.resume_probability
                {
                    let heading = rng.random_range(0.0..TAU);
                    self.motion = Motion::Moving {
                        velocity: angle_to_vec(heading) * self.base_speed,
                    };
                }
            }
        }
    }

    /// True iff `other` is within `interaction_radius` (inclusive).
    pub fn detect_collision(&self, other: &Agent, interaction_radius: f32) -> bool {
        self.position.distance(other.position) <= interaction_radius
    }

    /// Turns perpendicular to the line joining `other` to `self`, keeping speed.
    /// No-op while resting or when both agents occupy the same point.
    pub fn interact_with_agent(&mut self, other: &Agent) {
        let Motion::Moving { velocity } = self.motion else {
            return;
        };

        let direction = self.position - other.position;
        if direction.length() == 0.0 {
            return;
        }

        let tangent = direction.rotate(FRAC_PI_2).normalize();
        let speed = velocity.length();
        if speed > 0.0 {
            self.motion = Motion::Moving { velocity: tangent * speed };
        }
    }

    /// Slides along a nearby wall and steps away from it.
    ///
    /// Within `radius + boundary_buffer` of a wall the velocity is replaced by
    /// the wall tangent at the same speed, oriented to agree with the current
    /// heading, and the position is pushed `wall_push` along the inward normal.
    /// The push is not re-clamped, so an agent may end slightly outside.
    pub fn interact_with_boundary(&mut self, boundary: &Boundary) {
        let Motion::Moving { velocity } = self.motion else {
            return;
        };

        let threshold = self.params.radius + self.params.boundary_buffer;
        if !boundary.is_near(self.position, threshold) {
            return;
        }

        let mut tangent = boundary.tangent_at(self.position);
        if velocity.dot(tangent) < 0.0 {
            tangent = -tangent;
        }
        self.motion = Motion::Moving { velocity: tangent * velocity.length() };

        let normal = boundary.normal_at(self.position);
        self.position += normal * self.params.wall_push;
    }

    /// Report view of this agent under index `id`.
    pub fn state(&self, id: usize) -> AgentState {
        AgentState {
            id,
            position: self.position,
            velocity: self.velocity(),
            energy: self.energy,
            is_moving: self.is_moving(),
            movement_time: self.movement_time,
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Agent(pos={}, vel={}, energy={:.2}, moving={})",
            self.position,
            self.velocity(),
            self.energy,
            self.is_moving()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::prelude::*;

    fn agent_at(x: f32, y: f32, vx: f32, vy: f32, energy: f32) -> Agent {
        Agent::new(Vec2::new(x, y), Vec2::new(vx, vy), energy, AgentParams::default())
    }

    /// An agent that has already come to rest with energy below its maximum.
    fn resting_agent(rng: &mut StdRng) -> Agent {
        let mut agent = agent_at(50.0, 50.0, 0.5, 0.0, 1.0);
        agent.update(0.1, 0.0, rng);
        assert!(!agent.is_moving());
        agent
    }

    #[test]
    fn new_agent_records_base_speed_and_max_energy() {
        let agent = agent_at(1.0, 2.0, 3.0, 4.0, 0.8);
        assert!(agent.can_move());
        assert_eq!(agent.base_speed(), 5.0);
        assert_eq!(agent.max_energy(), 0.8);
        assert_eq!(agent.movement_time(), 0.0);
    }

    #[test]
    fn update_integrates_then_scales_velocity_by_energy() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = agent_at(10.0, 10.0, 20.0, 0.0, 0.9);
        agent.update(0.1, 0.0, &mut rng);

        assert_relative_eq!(agent.position().x, 12.0);
        assert_relative_eq!(agent.position().y, 10.0);
        assert_relative_eq!(agent.movement_time(), 0.1);

        let expected_energy = 0.9 * (-0.1f32 * 0.1).exp();
        assert_relative_eq!(agent.energy(), expected_energy, max_relative = 1e-6);
        assert_relative_eq!(agent.velocity().x, 20.0 * expected_energy, max_relative = 1e-5);
        assert!(agent.is_moving());
    }

    #[test]
    fn noise_moves_position_but_not_stored_velocity_direction() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut agent = agent_at(10.0, 10.0, 20.0, 0.0, 1.0);
        agent.update(0.1, 5.0, &mut rng);
        assert_ne!(agent.position().y, 10.0);
        assert_eq!(agent.velocity().y, 0.0);
    }

    #[test]
    fn decaying_agent_eventually_rests() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut agent = agent_at(100.0, 100.0, 30.0, 0.0, 0.95);
        let mut previous_speed = agent.speed();
        for _ in 0..1000 {
            agent.update(0.1, 0.0, &mut rng);
            if !agent.is_moving() {
                break;
            }
            assert!(agent.speed() <= previous_speed);
            previous_speed = agent.speed();
        }
        assert!(!agent.is_moving());
        assert_eq!(agent.velocity(), Vec2::zero());
    }

    #[test]
    fn stop_threshold_is_configurable() {
        let mut rng = StdRng::seed_from_u64(4);
        let params = AgentParams { stop_speed_threshold: 0.0, ..AgentParams::default() };
        let mut agent = Agent::new(Vec2::zero(), Vec2::new(0.5, 0.0), 0.9, params);
        agent.update(0.1, 0.0, &mut rng);
        assert!(agent.is_moving());
    }

    #[test]
    fn resting_energy_is_non_decreasing_and_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut agent = resting_agent(&mut rng);
        let mut previous = agent.energy();
        for _ in 0..500 {
            if agent.is_moving() {
                break;
            }
            agent.update(0.1, 0.0, &mut rng);
            assert!(agent.energy() >= previous);
            assert!(agent.energy() <= agent.max_energy());
            previous = agent.energy();
        }
    }

    #[test]
    fn resting_agent_resumes_at_base_speed_once_recharged() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut agent = resting_agent(&mut rng);
        for _ in 0..1000 {
            agent.update(0.1, 0.0, &mut rng);
            if agent.is_moving() {
                break;
            }
        }
        assert!(agent.is_moving());
        assert_eq!(agent.energy(), agent.max_energy());
        assert_relative_eq!(agent.speed(), 0.5, max_relative = 1e-5);
    }

    #[test]
    fn never_resumes_with_zero_probability() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = AgentParams { resume_probability: 0.0, ..AgentParams::default() };
        let mut agent = Agent::new(Vec2::zero(), Vec2::new(0.5, 0.0), 2.0, params);
        for _ in 0..300 {
            agent.update(0.1, 0.0, &mut rng);
        }
        assert!(!agent.is_moving());
        assert_eq!(agent.energy(), 2.0);
    }

    #[test]
    fn fixed_budget_stops_when_movement_time_spent() {
        let mut rng = StdRng::seed_from_u64(8);
        let params = AgentParams { energy_policy: EnergyPolicy::FixedBudget, ..AgentParams::default() };
        let mut agent = Agent::new(Vec2::zero(), Vec2::new(10.0, 0.0), 0.35, params);

        for _ in 0..3 {
            agent.update(0.1, 0.0, &mut rng);
            assert!(agent.is_moving());
        }
        assert_eq!(agent.velocity(), Vec2::new(10.0, 0.0));
        agent.update(0.1, 0.0, &mut rng);
        assert!(!agent.is_moving());

        let parked = agent.position();
        for _ in 0..100 {
            agent.update(0.1, 0.0, &mut rng);
        }
        assert!(!agent.is_moving());
        assert_eq!(agent.position(), parked);
        assert_eq!(agent.energy(), 0.35);
    }

    #[test]
    fn detect_collision_is_inclusive() {
        let a = agent_at(0.0, 0.0, 1.0, 0.0, 1.0);
        let b = agent_at(3.0, 4.0, 1.0, 0.0, 1.0);
        assert!(a.detect_collision(&b, 5.0));
        assert!(!a.detect_collision(&b, 4.9));
    }

    #[test]
    fn interaction_turns_tangentially_at_same_speed() {
        let mut a = agent_at(10.0, 0.0, 3.0, 4.0, 1.0);
        let b = agent_at(0.0, 0.0, 1.0, 0.0, 1.0);
        a.interact_with_agent(&b);
        assert_abs_diff_eq!(a.velocity().x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(a.velocity().y, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn coincident_agents_do_not_interact() {
        let mut a = agent_at(0.0, 0.0, 3.0, 4.0, 1.0);
        let mut b = agent_at(0.0, 0.0, -1.0, 2.0, 1.0);
        assert!(a.detect_collision(&b, 10.0));

        let snapshot_a = a.clone();
        a.interact_with_agent(&b);
        b.interact_with_agent(&snapshot_a);
        assert_eq!(a.velocity(), Vec2::new(3.0, 4.0));
        assert_eq!(b.velocity(), Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn resting_agents_ignore_interactions() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut resting = resting_agent(&mut rng);
        let before = resting.clone();
        let other = agent_at(55.0, 50.0, 1.0, 0.0, 1.0);
        resting.interact_with_agent(&other);
        resting.interact_with_boundary(&Boundary::new(60.0, 60.0).expect("valid boundary"));
        assert_eq!(resting, before);
    }

    #[test]
    fn wall_contact_redirects_along_tangent_and_pushes_inward() {
        let boundary = Boundary::new(100.0, 100.0).expect("valid boundary");
        let mut agent = agent_at(5.0, 50.0, -10.0, 0.0, 1.0);
        agent.interact_with_boundary(&boundary);

        assert_eq!(agent.velocity(), Vec2::new(0.0, 10.0));
        assert_eq!(agent.position(), Vec2::new(7.0, 50.0));
    }

    #[test]
    fn wall_tangent_follows_current_heading() {
        let boundary = Boundary::new(100.0, 100.0).expect("valid boundary");
        let mut agent = agent_at(50.0, 96.0, -6.0, 8.0, 1.0);
        agent.interact_with_boundary(&boundary);

        assert_eq!(agent.velocity(), Vec2::new(-10.0, 0.0));
        assert_eq!(agent.position(), Vec2::new(50.0, 94.0));
    }

    #[test]
    fn far_from_walls_nothing_changes() {
        let boundary = Boundary::new(100.0, 100.0).expect("valid boundary");
        let mut agent = agent_at(50.0, 50.0, -6.0, 8.0, 1.0);
        let before = agent.clone();
        agent.interact_with_boundary(&boundary);
        assert_eq!(agent, before);
    }

    #[test]
    fn state_and_display() {
        let agent = agent_at(1.0, 2.0, 3.0, 4.0, 0.5);
        let state = agent.state(7);
        assert_eq!(state.id, 7);
        assert_eq!(state.velocity, Vec2::new(3.0, 4.0));
        assert!(state.is_moving);
        assert_eq!(
            agent.to_string(),
            "Agent(pos=(1.00, 2.00), vel=(3.00, 4.00), energy=0.50, moving=true)"
        );
    }
}
