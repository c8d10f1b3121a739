use nalgebra::Vector3;

use super::smooth::smooth_damp;
use crate::config::ManeuverConfig;

// ---------------------------------------------------------------------------
// Throttle shaping during a maneuver burn
// ---------------------------------------------------------------------------

/// Off-axis penalty: squared, biased dot product between the thrust axis and
/// the burn direction. `None` when already on axis.
pub fn heading_constraint(dot: f64, bias: f64) -> Option<f64> {
    let dot = (dot + bias).clamp(0.0, 1.0);
    (dot < 1.0).then_some(dot * dot)
}

/// Linear ramp-down over the last `cutoff_fraction` of the burn.
pub fn delta_v_constraint(remaining_fraction: f64, cutoff_fraction: f64) -> Option<f64> {
    (remaining_fraction < cutoff_fraction).then(|| (remaining_fraction / cutoff_fraction).max(0.0))
}

/// Throttle the burn should settle at, in [0, 1].
pub fn goal_throttle(
    forward: &Vector3<f64>,
    burn_vector: &Vector3<f64>,
    start_delta_v: f64,
    config: &ManeuverConfig,
) -> f64 {
    let mut goal: f64 = 1.0;

    let dot = burn_vector
        .try_normalize(1e-12)
        .map_or(0.0, |dir| forward.dot(&dir));
    if let Some(limit) = heading_constraint(dot, config.heading_bias) {
        goal = goal.min(limit);
    }

    let remaining_fraction = burn_vector.norm() / start_delta_v.max(config.delta_v_floor);
    if let Some(limit) = delta_v_constraint(remaining_fraction, config.cutoff_fraction) {
        goal = goal.min(limit);
    }

    goal.clamp(0.0, 1.0)
}

/// Smooths the commanded throttle toward the goal with the same critically
/// damped law the attitude hold uses.
#[derive(Debug, Clone)]
pub struct ThrottleShaper {
    config: ManeuverConfig,
    velocity: f64,
}

impl ThrottleShaper {
    pub fn new(config: ManeuverConfig) -> Self {
        Self { config, velocity: 0.0 }
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn step(&mut self, current: f64, goal: f64, dt: f64) -> f64 {
        smooth_damp(current, goal, &mut self.velocity, self.config.throttle_smooth_time, dt).clamp(0.0, 1.0)
    }
}
