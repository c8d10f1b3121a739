use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Point-mass orbital state
// ---------------------------------------------------------------------------

/// Translational state in the body-centered inertial frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalState {
    pub time: f64,
    pub pos: Vector3<f64>, // m
    pub vel: Vector3<f64>, // m/s
}

impl OrbitalState {
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Specific orbital energy, J/kg.
    pub fn energy(&self, mu: f64) -> f64 {
        0.5 * self.vel.norm_squared() - mu / self.radius().max(1.0)
    }
}

/// Inverse-square gravity of a point mass at the origin.
pub fn point_mass_gravity(mu: f64, pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    if r < 1.0 {
        return Vector3::zeros();
    }
    -mu / (r * r * r) * pos
}

/// Single RK4 step under `gravity` plus a thrust acceleration held constant
/// over the step.
pub fn rk4_step(
    state: &OrbitalState,
    dt: f64,
    thrust_accel: &Vector3<f64>,
    gravity: &dyn Fn(&Vector3<f64>) -> Vector3<f64>,
) -> OrbitalState {
    let deriv = |pos: &Vector3<f64>, vel: &Vector3<f64>| (*vel, gravity(pos) + thrust_accel);

    let (k1_dr, k1_dv) = deriv(&state.pos, &state.vel);
    let (k2_dr, k2_dv) = deriv(&(state.pos + k1_dr * dt * 0.5), &(state.vel + k1_dv * dt * 0.5));
    let (k3_dr, k3_dv) = deriv(&(state.pos + k2_dr * dt * 0.5), &(state.vel + k2_dv * dt * 0.5));
    let (k4_dr, k4_dv) = deriv(&(state.pos + k3_dr * dt), &(state.vel + k3_dv * dt));

    OrbitalState {
        time: state.time + dt,
        pos: state.pos + (k1_dr + 2.0 * k2_dr + 2.0 * k3_dr + k4_dr) * (dt / 6.0),
        vel: state.vel + (k1_dv + 2.0 * k2_dv + 2.0 * k3_dv + k4_dv) * (dt / 6.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MU: f64 = 3.5316e12;

    fn circular(r: f64) -> OrbitalState {
        OrbitalState {
            time: 0.0,
            pos: Vector3::new(r, 0.0, 0.0),
            vel: Vector3::new(0.0, (MU / r).sqrt(), 0.0),
        }
    }

    #[test]
    fn circular_orbit_keeps_radius() {
        let r0 = 700_000.0;
        let mut s = circular(r0);
        let gravity = |p: &Vector3<f64>| point_mass_gravity(MU, p);
        for _ in 0..10_000 {
            s = rk4_step(&s, 0.1, &Vector3::zeros(), &gravity);
        }
        assert!((s.radius() - r0).abs() < 1.0, "radius drifted to {}", s.radius());
    }

    #[test]
    fn coasting_conserves_energy() {
        let mut s = circular(700_000.0);
        s.vel *= 1.1;
        let e0 = s.energy(MU);
        let gravity = |p: &Vector3<f64>| point_mass_gravity(MU, p);
        for _ in 0..5_000 {
            s = rk4_step(&s, 0.1, &Vector3::zeros(), &gravity);
        }
        assert!(((s.energy(MU) - e0) / e0).abs() < 1e-8);
    }

    #[test]
    fn thrust_adds_velocity() {
        let s = OrbitalState {
            time: 0.0,
            pos: Vector3::zeros(),
            vel: Vector3::zeros(),
        };
        let none = |_: &Vector3<f64>| Vector3::zeros();
        let next = rk4_step(&s, 2.0, &Vector3::new(0.0, 0.0, 3.0), &none);
        assert!((next.vel.z - 6.0).abs() < 1e-12);
        assert!((next.pos.z - 6.0).abs() < 1e-12);
        assert_eq!(next.time, 2.0);
    }

    #[test]
    fn gravity_guarded_at_center() {
        assert_eq!(point_mass_gravity(MU, &Vector3::zeros()), Vector3::zeros());
    }
}
