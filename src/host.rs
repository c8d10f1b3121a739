use nalgebra::UnitQuaternion;

use crate::telemetry::{ManeuverNode, Target, Telemetry};

/// Native attitude-hold modes offered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldMode {
    /// Hold whatever rotation is locked via [`Actuator::lock_rotation`].
    #[default]
    StabilityAssist,
    /// Track the active target.
    Target,
    /// Track the active maneuver node's burn vector.
    Maneuver,
}

/// Source of the per-tick vessel state.
pub trait TelemetryProvider {
    fn telemetry(&self) -> Telemetry;
}

/// Commits rotation and throttle requests to the simulation.
///
/// Hosts that mirror the hold mode in their UI do so inside
/// [`Actuator::set_hold_mode`].
pub trait Actuator {
    /// Whether the host's own attitude-hold subsystem is switched on.
    fn autopilot_enabled(&self) -> bool;

    /// Switch the attitude-hold subsystem on.
    fn enable_hold(&mut self);

    fn hold_mode(&self) -> HoldMode;

    /// Whether the host can enter `mode` right now.
    fn can_set_mode(&self, _mode: HoldMode) -> bool {
        true
    }

    fn set_hold_mode(&mut self, mode: HoldMode);

    /// Rotation currently held by stability assist.
    fn locked_rotation(&self) -> UnitQuaternion<f64>;

    fn lock_rotation(&mut self, rotation: UnitQuaternion<f64>);

    /// Main throttle, 0..=1.
    fn throttle(&self) -> f64;

    fn set_throttle(&mut self, level: f64);
}

/// Zero-or-one active maneuver plan.
pub trait ManeuverPlanProvider {
    fn active_node(&self) -> Option<ManeuverNode>;

    fn remove_active_node(&mut self);
}

/// Zero-or-one active target.
pub trait TargetProvider {
    fn active_target(&self) -> Option<Target>;
}

/// Everything the autopilot needs from its host in one tick.
pub trait FlightHost: TelemetryProvider + Actuator + ManeuverPlanProvider + TargetProvider {}

impl<T> FlightHost for T where T: TelemetryProvider + Actuator + ManeuverPlanProvider + TargetProvider {}
