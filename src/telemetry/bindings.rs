use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Maneuver node
// ---------------------------------------------------------------------------

/// Snapshot of the active maneuver node, taken from the plan provider each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ManeuverNode {
    pub scheduled_time: f64,          // universal time of the impulse, s
    pub planned_delta_v: Vector3<f64>, // m/s, full planned change
    pub burn_vector: Vector3<f64>,     // m/s, world frame, still to apply on the current orbit
}

impl ManeuverNode {
    /// Total planned delta-v magnitude.
    pub fn delta_v(&self) -> f64 {
        self.planned_delta_v.norm()
    }

    /// Burn vector magnitude left to apply.
    pub fn remaining(&self) -> f64 {
        self.burn_vector.norm()
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Vessel,
    DockingPort,
    /// Anything else that can be targeted: bodies, waypoints, debris markers.
    Trackable,
}

/// Snapshot of the active target, taken from the target provider each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>, // orbital velocity
    pub forward: Vector3<f64>,
    pub up: Vector3<f64>,
    pub right: Vector3<f64>,
}

impl Target {
    /// Vessels and docking ports carry a meaningful forward/up pair.
    pub fn is_vessel_like(&self) -> bool {
        matches!(self.kind, TargetKind::Vessel | TargetKind::DockingPort)
    }
}

// ---------------------------------------------------------------------------
// Per-tick binding set
// ---------------------------------------------------------------------------

/// External objects the autopilot may reference. Both are refreshed from the
/// host every tick and never outlive it: `None` the instant the host drops
/// the object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub maneuver: Option<ManeuverNode>,
    pub target: Option<Target>,
}

impl Bindings {
    pub fn maneuver(&self) -> Option<&ManeuverNode> {
        self.maneuver.as_ref()
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }
}
