use nalgebra::{UnitQuaternion, Vector3};

use vessel_autopilot::frame::resolve;
use vessel_autopilot::prelude::*;
use vessel_autopilot::telemetry::OrbitPatch;

/// A vessel frozen on a circular orbit whose reaction wheels are infinitely
/// strong: whatever rotation the autopilot locks is taken on the next tick.
struct SnapHost {
    time: f64,
    attitude: UnitQuaternion<f64>,
    locked: UnitQuaternion<f64>,
    hold_enabled: bool,
    mode: HoldMode,
}

impl TelemetryProvider for SnapHost {
    fn telemetry(&self) -> Telemetry {
        Telemetry {
            time: self.time,
            dt: 0.1,
            warp_rate: 1.0,
            position: Vector3::new(0.0, 700_000.0, 0.0),
            orbital_velocity: Vector3::new(2246.0, 0.0, 0.0),
            surface_velocity: Vector3::new(2071.0, 0.0, 0.0),
            up: Vector3::y(),
            north: Vector3::z(),
            attitude: self.attitude,
            mass: 3500.0,
            stage: None,
            orbit: OrbitPatch::new("Kerbin", -Vector3::z(), false),
            ancestors: vec![OrbitPatch::new("Kerbol", Vector3::y(), true)],
            star_position: Vector3::new(1.36e10, 0.0, 0.0),
        }
    }
}

impl Actuator for SnapHost {
    fn autopilot_enabled(&self) -> bool {
        self.hold_enabled
    }

    fn enable_hold(&mut self) {
        self.hold_enabled = true;
        self.locked = self.attitude;
    }

    fn hold_mode(&self) -> HoldMode {
        self.mode
    }

    // No target and no plan, so only stability assist.
    fn can_set_mode(&self, mode: HoldMode) -> bool {
        mode == HoldMode::StabilityAssist
    }

    fn set_hold_mode(&mut self, mode: HoldMode) {
        self.mode = mode;
    }

    fn locked_rotation(&self) -> UnitQuaternion<f64> {
        self.locked
    }

    fn lock_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.locked = rotation;
    }

    fn throttle(&self) -> f64 {
        0.0
    }

    fn set_throttle(&mut self, _level: f64) {}
}

impl ManeuverPlanProvider for SnapHost {
    fn active_node(&self) -> Option<ManeuverNode> {
        None
    }

    fn remove_active_node(&mut self) {}
}

impl TargetProvider for SnapHost {
    fn active_target(&self) -> Option<Target> {
        None
    }
}

fn main() {
    let mut host = SnapHost {
        time: 0.0,
        attitude: UnitQuaternion::identity(),
        locked: UnitQuaternion::identity(),
        hold_enabled: false,
        mode: HoldMode::StabilityAssist,
    };

    let mut autopilot = Autopilot::new(AutopilotConfig::default());
    autopilot.refresh_bindings(&host);
    if let Err(err) = autopilot.engage_attitude(ReferenceSelector::OrbitPrograde, Hpr::new(90.0, 0.0, 0.0)) {
        eprintln!("engage failed: {}", err);
        return;
    }
    println!("Intent: {:?}", autopilot.intent());

    println!("{:>6}  {:>10}  {:>10}", "t (s)", "to left", "to fwd");
    for tick in 0..40 {
        autopilot.tick(&mut host);
        if host.hold_enabled {
            host.attitude = host.locked;
        }
        host.time += 0.1;

        let t = host.telemetry();
        let Ok(frame) = resolve(ReferenceSelector::OrbitPrograde, &t, None, None) else {
            continue;
        };
        if tick % 5 == 0 {
            let nose = t.forward();
            println!(
                "{:>6.1}  {:>10.2}  {:>10.2}",
                t.time,
                nose.angle(&frame.left()).to_degrees(),
                nose.angle(&frame.forward).to_degrees(),
            );
        }
    }

    for event in autopilot.drain_events() {
        println!("{:>6.1}  {:?}", event.time, event.kind);
    }
}
