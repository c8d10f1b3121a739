use super::host::{Body, KinematicHost};
use crate::config::AutopilotConfig;
use crate::frame::{Hpr, ReferenceSelector};
use crate::pilot::Autopilot;
use crate::vehicle::StageBuilder;

// ---------------------------------------------------------------------------
// Preset flights
// ---------------------------------------------------------------------------

/// An autopilot and the vessel it flies, ready for [`super::fly`].
///
/// Presets set up the vessel only; engaging the autopilot is left to the
/// caller, see [`Scenario::engage`].
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub autopilot: Autopilot,
    pub host: KinematicHost,
    pub plan: Plan,
}

/// What a preset intends the autopilot to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Plan {
    ExecuteManeuver,
    Hold(ReferenceSelector, Option<Hpr>),
}

impl Scenario {
    pub fn with_config(mut self, config: AutopilotConfig) -> Self {
        self.autopilot = Autopilot::new(config);
        self
    }

    /// Refresh bindings and engage according to the preset's plan.
    pub fn engage(&mut self) -> Result<(), crate::error::EngageError> {
        self.autopilot.refresh_bindings(&self.host);
        match self.plan {
            Plan::ExecuteManeuver => self.autopilot.engage_maneuver(),
            Plan::Hold(selector, Some(offset)) => self.autopilot.engage_attitude(selector, offset),
            Plan::Hold(selector, None) => self.autopilot.engage_attitude_free(selector),
        }
    }
}

pub const NAMES: [&str; 4] = ["prograde-burn", "target-hold", "surface-north", "radial-offset"];

pub fn by_name(name: &str) -> Option<Scenario> {
    match name {
        "prograde-burn" => Some(prograde_burn()),
        "target-hold" => Some(target_hold()),
        "surface-north" => Some(surface_north()),
        "radial-offset" => Some(radial_offset()),
        _ => None,
    }
}

fn tug() -> KinematicHost {
    let stage = StageBuilder::new("Tug")
        .dry_mass(2000.0)
        .propellant_mass(1500.0)
        .thrust(60_000.0)
        .isp(320.0)
        .build();
    KinematicHost::circular(Body::kerbin(), 100_000.0, stage)
}

/// 100 m/s prograde burn scheduled one minute out.
pub fn prograde_burn() -> Scenario {
    let mut host = tug();
    host.plan_prograde(60.0, 100.0);
    Scenario {
        name: "prograde-burn",
        autopilot: Autopilot::default(),
        host,
        plan: Plan::ExecuteManeuver,
    }
}

/// Point at a vessel two kilometres ahead.
pub fn target_hold() -> Scenario {
    let mut host = tug();
    host.spawn_target_ahead(2_000.0);
    Scenario {
        name: "target-hold",
        autopilot: Autopilot::default(),
        host,
        plan: Plan::Hold(ReferenceSelector::Target, None),
    }
}

/// Nose to compass north, roll free.
pub fn surface_north() -> Scenario {
    Scenario {
        name: "surface-north",
        autopilot: Autopilot::default(),
        host: tug(),
        plan: Plan::Hold(ReferenceSelector::SurfaceNorth, None),
    }
}

/// Orbit-prograde reference pitched 90 degrees up with a 45 degree roll.
pub fn radial_offset() -> Scenario {
    Scenario {
        name: "radial-offset",
        autopilot: Autopilot::default(),
        host: tug(),
        plan: Plan::Hold(ReferenceSelector::OrbitPrograde, Some(Hpr::new(0.0, 90.0, 45.0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            let s = by_name(name).unwrap();
            assert_eq!(s.name, name);
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn presets_engage() {
        for name in NAMES {
            let mut s = by_name(name).unwrap();
            assert!(s.engage().is_ok(), "{} failed to engage", name);
            assert!(s.autopilot.is_active());
        }
    }
}
