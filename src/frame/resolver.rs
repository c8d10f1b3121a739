use nalgebra::Vector3;

use super::orientation::ReferenceFrame;
use super::selector::ReferenceSelector;
use crate::error::FrameError;
use crate::telemetry::{ManeuverNode, Target, Telemetry};

// ---------------------------------------------------------------------------
// Reference frame resolution
// ---------------------------------------------------------------------------

/// Resolve a reference selector against this tick's telemetry.
///
/// Both returned axes are unit length and mutually perpendicular; the up
/// axis is always re-orthogonalized against forward. Selectors that need a
/// target or maneuver node fail when it is absent, and any selector fails
/// when its forward direction vanishes (e.g. zero velocity).
pub fn resolve(
    selector: ReferenceSelector,
    telemetry: &Telemetry,
    target: Option<&Target>,
    maneuver: Option<&ManeuverNode>,
) -> Result<ReferenceFrame, FrameError> {
    let t = telemetry;
    let orbit_normal = t.orbit.normal;

    let (forward, up) = match selector {
        ReferenceSelector::Inertial => return Ok(ReferenceFrame::identity()),

        ReferenceSelector::OrbitPrograde => (t.orbital_velocity, t.up),
        ReferenceSelector::OrbitHorizontal => (project_on_plane(&t.orbital_velocity, &t.up), t.up),

        ReferenceSelector::SurfacePrograde => (t.surface_velocity, t.up),
        ReferenceSelector::SurfaceHorizontal => (project_on_plane(&t.surface_velocity, &t.up), t.up),
        ReferenceSelector::SurfaceNorth => (t.north, t.up),

        ReferenceSelector::Target => {
            let target = target.ok_or(FrameError::MissingTarget(selector))?;
            (target.position - t.position, orbit_normal)
        }
        ReferenceSelector::TargetRelativeVelocity => {
            let target = target.ok_or(FrameError::MissingTarget(selector))?;
            (t.orbital_velocity - target.velocity, orbit_normal)
        }
        ReferenceSelector::TargetOrientation => {
            let target = target.ok_or(FrameError::MissingTarget(selector))?;
            if target.is_vessel_like() {
                (target.forward, target.up)
            } else {
                (target.up, target.right)
            }
        }

        ReferenceSelector::ManeuverNode => {
            let node = maneuver.ok_or(FrameError::MissingManeuver(selector))?;
            (node.burn_vector, orbit_normal)
        }

        ReferenceSelector::Sun => (t.star_position - t.position, t.solar_orbit().normal),
    };

    ReferenceFrame::new(&forward, &up).ok_or(FrameError::Degenerate(selector))
}

fn project_on_plane(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    match normal.try_normalize(1e-12) {
        Some(n) => v - n * n.dot(v),
        None => *v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{OrbitPatch, TargetKind};
    use nalgebra::UnitQuaternion;

    fn telemetry() -> Telemetry {
        Telemetry {
            time: 100.0,
            dt: 0.02,
            warp_rate: 1.0,
            position: Vector3::new(0.0, 700_000.0, 0.0),
            orbital_velocity: Vector3::new(2200.0, 50.0, 0.0),
            surface_velocity: Vector3::new(2000.0, 50.0, 10.0),
            up: Vector3::y(),
            north: Vector3::x(),
            attitude: UnitQuaternion::identity(),
            mass: 5000.0,
            stage: None,
            orbit: OrbitPatch::new("Planet", Vector3::z(), false),
            ancestors: vec![OrbitPatch::new("Sun", Vector3::new(0.0, 0.6, 0.8), true)],
            star_position: Vector3::new(0.0, 700_000.0, -1.0e10),
        }
    }

    fn target(kind: TargetKind) -> Target {
        Target {
            kind,
            position: Vector3::new(0.0, 700_000.0, 500.0),
            velocity: Vector3::new(2190.0, 50.0, 0.0),
            forward: Vector3::x(),
            up: Vector3::z(),
            right: Vector3::y(),
        }
    }

    fn node() -> ManeuverNode {
        ManeuverNode {
            scheduled_time: 160.0,
            planned_delta_v: Vector3::new(0.0, 0.0, 80.0),
            burn_vector: Vector3::new(80.0, 0.0, 0.0),
        }
    }

    fn assert_orthonormal(frame: &ReferenceFrame) {
        assert!((frame.forward.norm() - 1.0).abs() < 1e-12, "forward not unit");
        assert!((frame.up.norm() - 1.0).abs() < 1e-12, "up not unit");
        assert!(frame.forward.dot(&frame.up).abs() < 1e-12, "axes not perpendicular");
    }

    #[test]
    fn every_selector_orthonormal_and_repeatable() {
        let t = telemetry();
        let tgt = target(TargetKind::Vessel);
        let n = node();
        for selector in ReferenceSelector::ALL {
            let a = resolve(selector, &t, Some(&tgt), Some(&n)).unwrap();
            let b = resolve(selector, &t, Some(&tgt), Some(&n)).unwrap();
            assert_eq!(a, b, "{:?} not repeatable", selector);
            assert_orthonormal(&a);
        }
    }

    #[test]
    fn missing_bindings_rejected() {
        let t = telemetry();
        for selector in ReferenceSelector::ALL {
            let result = resolve(selector, &t, None, None);
            assert_eq!(result.is_err(), selector.requires().is_some(), "{:?}", selector);
        }
        assert_eq!(
            resolve(ReferenceSelector::ManeuverNode, &t, None, None),
            Err(FrameError::MissingManeuver(ReferenceSelector::ManeuverNode))
        );
    }

    #[test]
    fn surface_north_scenario() {
        let mut t = telemetry();
        t.up = Vector3::new(0.0, 1.0, 0.0);
        t.north = Vector3::new(1.0, 0.0, 0.0);
        let frame = resolve(ReferenceSelector::SurfaceNorth, &t, None, None).unwrap();
        assert!((frame.forward - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((frame.up - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn orbit_horizontal_drops_vertical_speed() {
        let frame = resolve(ReferenceSelector::OrbitHorizontal, &telemetry(), None, None).unwrap();
        assert!(frame.forward.y.abs() < 1e-12);
        assert!((frame.forward - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn prograde_up_reorthogonalized() {
        let frame = resolve(ReferenceSelector::OrbitPrograde, &telemetry(), None, None).unwrap();
        assert!(frame.forward.y > 0.0, "forward keeps the climb component");
        assert!(frame.up.dot(&Vector3::y()) > 0.99);
    }

    #[test]
    fn target_points_at_target() {
        let t = telemetry();
        let tgt = target(TargetKind::Vessel);
        let frame = resolve(ReferenceSelector::Target, &t, Some(&tgt), None).unwrap();
        assert!((frame.forward - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn target_relative_velocity_direction() {
        let t = telemetry();
        let tgt = target(TargetKind::Vessel);
        let frame = resolve(ReferenceSelector::TargetRelativeVelocity, &t, Some(&tgt), None).unwrap();
        assert!((frame.forward - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn target_orientation_depends_on_kind() {
        let t = telemetry();
        let vessel = resolve(ReferenceSelector::TargetOrientation, &t, Some(&target(TargetKind::DockingPort)), None).unwrap();
        assert!((vessel.forward - Vector3::x()).norm() < 1e-12);
        assert!((vessel.up - Vector3::z()).norm() < 1e-12);

        let other = resolve(ReferenceSelector::TargetOrientation, &t, Some(&target(TargetKind::Trackable)), None).unwrap();
        assert!((other.forward - Vector3::z()).norm() < 1e-12);
        assert!((other.up - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn maneuver_follows_burn_vector() {
        let frame = resolve(ReferenceSelector::ManeuverNode, &telemetry(), None, Some(&node())).unwrap();
        assert!((frame.forward - Vector3::x()).norm() < 1e-12);
        assert!((frame.up - Vector3::z()).norm() < 1e-12, "up is the orbit normal");
    }

    #[test]
    fn sun_uses_solar_orbit_normal() {
        let frame = resolve(ReferenceSelector::Sun, &telemetry(), None, None).unwrap();
        assert!((frame.forward + Vector3::z()).norm() < 1e-12);
        // Solar orbit normal (0, 0.6, 0.8) minus its forward component.
        assert!((frame.up - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn zero_velocity_is_degenerate() {
        let mut t = telemetry();
        t.orbital_velocity = Vector3::zeros();
        assert_eq!(
            resolve(ReferenceSelector::OrbitPrograde, &t, None, None),
            Err(FrameError::Degenerate(ReferenceSelector::OrbitPrograde))
        );
    }
}
