use nalgebra::UnitQuaternion;

use super::smooth::smooth_damp_angle;
use crate::config::AttitudeConfig;

// ---------------------------------------------------------------------------
// Convergence controller: damped approach to a desired orientation
// ---------------------------------------------------------------------------

/// Produces an intermediate orientation between the currently held one and
/// the desired one, so the hold rotates smoothly instead of snapping.
///
/// Far from the target the smoothing time constant is short (fast);
/// close to it the constant grows back to `smooth_time_max` so the final
/// approach does not overshoot.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    config: AttitudeConfig,
    velocity: f64, // deg/s, rate of the remaining separation
}

impl ConvergenceController {
    pub fn new(config: AttitudeConfig) -> Self {
        Self { config, velocity: 0.0 }
    }

    /// Forget the angular velocity estimate.
    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Smoothing time constant for a separation in degrees.
    pub fn smooth_time(&self, separation_deg: f64) -> f64 {
        let c = &self.config;
        let ramp = ((separation_deg - c.ramp_start_deg) / (c.ramp_end_deg - c.ramp_start_deg)).clamp(0.0, 1.0);
        c.smooth_time_max - ramp * (c.smooth_time_max - c.smooth_time_min)
    }

    /// One damped step from `current` toward `desired`.
    ///
    /// Returns `desired` unchanged once within the convergence threshold.
    pub fn step(
        &mut self,
        desired: &UnitQuaternion<f64>,
        current: &UnitQuaternion<f64>,
        dt: f64,
    ) -> UnitQuaternion<f64> {
        let separation = desired.angle_to(current).to_degrees();
        if separation <= self.config.converged_deg {
            return *desired;
        }

        let smooth_time = self.smooth_time(separation);
        let remaining = smooth_damp_angle(separation, 0.0, &mut self.velocity, smooth_time, dt);

        desired
            .try_slerp(current, remaining / separation, 1e-9)
            .unwrap_or(*desired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn yaw(deg: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), deg.to_radians())
    }

    #[test]
    fn converged_returns_desired_exactly() {
        let mut c = ConvergenceController::new(AttitudeConfig::default());
        let desired = yaw(10.0);
        let current = yaw(10.2);
        let out = c.step(&desired, &current, 0.02);
        assert_eq!(out, desired);
        assert_eq!(c.velocity(), 0.0, "converged step must not disturb state");
    }

    #[test]
    fn step_lands_between_current_and_desired() {
        let mut c = ConvergenceController::new(AttitudeConfig::default());
        let desired = yaw(0.0);
        let current = yaw(30.0);
        let out = c.step(&desired, &current, 0.02);
        let to_desired = out.angle_to(&desired).to_degrees();
        let to_current = out.angle_to(&current).to_degrees();
        assert!(to_desired < 30.0 && to_desired > 0.0, "got {}", to_desired);
        assert!((to_desired + to_current - 30.0).abs() < 1e-6, "should lie on the arc");
        assert!(c.velocity() < 0.0);
    }

    #[test]
    fn repeated_steps_converge() {
        let mut c = ConvergenceController::new(AttitudeConfig::default());
        let desired = yaw(0.0);
        let mut held = yaw(120.0);
        for _ in 0..200 {
            held = c.step(&desired, &held, 0.02);
        }
        assert_eq!(held, desired);
    }

    #[test]
    fn smooth_time_monotone_in_separation() {
        let c = ConvergenceController::new(AttitudeConfig::default());
        assert!((c.smooth_time(10.0) - 0.20).abs() < 1e-12);
        assert!((c.smooth_time(60.0) - 0.20).abs() < 1e-12);
        assert!((c.smooth_time(120.0) - 0.15).abs() < 1e-12);
        assert!((c.smooth_time(180.0) - 0.10).abs() < 1e-12);
        assert!((c.smooth_time(250.0) - 0.10).abs() < 1e-12);

        let mut prev = c.smooth_time(60.0);
        let mut sep = 60.0;
        while sep <= 200.0 {
            let t = c.smooth_time(sep);
            assert!(t <= prev + 1e-15, "time constant increased at {}", sep);
            prev = t;
            sep += 0.5;
        }
    }

    #[test]
    fn reset_clears_velocity() {
        let mut c = ConvergenceController::new(AttitudeConfig::default());
        c.step(&yaw(0.0), &yaw(45.0), 0.02);
        assert!(c.velocity() != 0.0);
        c.reset();
        assert_eq!(c.velocity(), 0.0);
    }
}
