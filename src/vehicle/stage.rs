use crate::config::G0;
use crate::telemetry::StageAggregate;

// ---------------------------------------------------------------------------
// Propulsion stage of the reference vessel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    pub dry_mass: f64,        // kg, everything but propellant
    pub propellant_mass: f64, // kg
    pub thrust: f64,          // N, full throttle
    pub isp: f64,             // s
}

impl Stage {
    pub fn mass_flow(&self) -> f64 {
        if self.isp > 0.0 {
            self.thrust / (self.isp * G0)
        } else {
            0.0
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// Full-throttle burn time from propellant and mass flow.
    pub fn burn_time(&self) -> f64 {
        let flow = self.mass_flow();
        if flow > 0.0 {
            self.propellant_mass / flow
        } else {
            0.0
        }
    }

    /// Ideal delta-v of the full stage.
    pub fn delta_v(&self) -> f64 {
        if self.dry_mass <= 0.0 {
            return 0.0;
        }
        self.isp * G0 * (self.total_mass() / self.dry_mass).ln()
    }

    /// Thrust and Isp as the vessel reports them to the autopilot.
    pub fn aggregate(&self) -> StageAggregate {
        StageAggregate {
            thrust: self.thrust,
            isp: self.isp,
        }
    }
}

// ---------------------------------------------------------------------------
// Stage builder
// ---------------------------------------------------------------------------

pub struct StageBuilder {
    name: String,
    dry_mass: f64,
    propellant_mass: f64,
    thrust: f64,
    isp: f64,
}

impl StageBuilder {
    /// Defaults describe a small orbital tug.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dry_mass: 2000.0,
            propellant_mass: 1500.0,
            thrust: 60_000.0,
            isp: 320.0,
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.dry_mass = v; self }
    pub fn propellant_mass(mut self, v: f64) -> Self { self.propellant_mass = v; self }
    pub fn thrust(mut self, v: f64) -> Self { self.thrust = v; self }
    pub fn isp(mut self, v: f64) -> Self { self.isp = v; self }

    pub fn build(self) -> Stage {
        Stage {
            name: self.name,
            dry_mass: self.dry_mass,
            propellant_mass: self.propellant_mass,
            thrust: self.thrust,
            isp: self.isp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_time_consumes_all_propellant() {
        let s = StageBuilder::new("Tug").build();
        let t = s.burn_time();
        assert!((t * s.mass_flow() - s.propellant_mass).abs() < 1e-9);
    }

    #[test]
    fn delta_v_from_rocket_equation() {
        let s = StageBuilder::new("Tug").dry_mass(1000.0).propellant_mass(1718.28).isp(300.0).build();
        // mass ratio ~ e -> dv ~ Isp * g0
        assert!((s.delta_v() - 300.0 * G0).abs() < 1.0, "got {}", s.delta_v());
    }

    #[test]
    fn zero_thrust_stage_never_burns() {
        let s = StageBuilder::new("Dead").thrust(0.0).build();
        assert_eq!(s.burn_time(), 0.0);
        assert_eq!(s.mass_flow(), 0.0);
    }
}
