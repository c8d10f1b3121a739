//! Reference host: a point-mass vessel the autopilot can fly.

pub mod integrator;
pub mod host;
pub mod runner;
pub mod scenario;

pub use integrator::{point_mass_gravity, rk4_step, OrbitalState};
pub use host::{Body, KinematicHost, PlannedNode, SimTarget};
pub use runner::{fly, fly_with, FlightConfig, FlightLog, TickRecord};
pub use scenario::Scenario;
