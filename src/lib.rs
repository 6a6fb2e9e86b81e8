//! Agent-based motion simulation: agents drift through a rectangular world,
//! burn energy while moving, recharge while resting, and turn aside when they
//! come close to each other or to a wall.

pub mod agent;
pub mod boundary;
pub mod simulation;

pub use agent::{Agent, Motion};
pub use boundary::{Boundary, Wall};
pub use simulation::Simulation;
