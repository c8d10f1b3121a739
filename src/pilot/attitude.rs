use tracing::debug;

use super::event::{PilotEventKind, ReleaseReason};
use super::intent::{EngagementIntent, HostRequest, IntentUpdate, Step, TickContext};
use crate::config::AttitudeConfig;
use crate::frame::{resolve, ReferenceSelector};
use crate::gnc::ConvergenceController;
use crate::host::HoldMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttitudeState {
    #[default]
    Idle,
    Holding,
}

impl AttitudeState {
    pub fn name(self) -> &'static str {
        match self {
            AttitudeState::Idle => "idle",
            AttitudeState::Holding => "holding",
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Next attitude state from the intent and whether its reference can be
/// resolved this tick.
pub fn transition(
    state: AttitudeState,
    intent: &EngagementIntent,
    reference_valid: bool,
    autopilot_enabled: bool,
) -> Step<AttitudeState> {
    match state {
        AttitudeState::Idle if intent.attitude => {
            if reference_valid {
                Step::to(AttitudeState::Holding, PilotEventKind::AttitudeEngaged(intent.reference))
                    .with_request(HostRequest::EnableHold)
            } else {
                Step::to(AttitudeState::Idle, PilotEventKind::EngageRejected(intent.reference))
                    .with_update(IntentUpdate::DisengageAll)
            }
        }
        AttitudeState::Idle => Step::stay(AttitudeState::Idle),
        AttitudeState::Holding => {
            let reason = if !intent.attitude {
                Some(ReleaseReason::Disengaged)
            } else if !autopilot_enabled {
                Some(ReleaseReason::HostDisabled)
            } else if !reference_valid {
                Some(ReleaseReason::ReferenceLost)
            } else {
                None
            };
            match reason {
                Some(reason) => Step::to(AttitudeState::Idle, PilotEventKind::AttitudeReleased(reason))
                    .with_update(IntentUpdate::DisengageAll),
                None => Step::stay(AttitudeState::Holding),
            }
        }
    }
}

/// Native hold mode to hand the whole job to, if any.
///
/// Free-roll holds on the node or the target are exactly what the host's
/// own maneuver and target modes do.
pub fn native_mode(intent: &EngagementIntent) -> Option<HoldMode> {
    if intent.orientation.locks_orientation() {
        return None;
    }
    match intent.reference {
        ReferenceSelector::ManeuverNode => Some(HoldMode::Maneuver),
        ReferenceSelector::Target => Some(HoldMode::Target),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Attitude pilot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AttitudePilot {
    state: AttitudeState,
    convergence: ConvergenceController,
}

impl AttitudePilot {
    pub fn new(config: AttitudeConfig) -> Self {
        Self {
            state: AttitudeState::Idle,
            convergence: ConvergenceController::new(config),
        }
    }

    pub fn state(&self) -> AttitudeState {
        self.state
    }

    pub fn convergence(&self) -> &ConvergenceController {
        &self.convergence
    }

    /// Evaluate transitions, then run the hold for this tick if holding.
    pub fn tick(&mut self, intent: &EngagementIntent, ctx: &TickContext<'_>) -> Step<AttitudeState> {
        let valid = intent.reference.is_valid(ctx.bindings);
        let mut step = transition(self.state, intent, valid, ctx.autopilot_enabled);

        if step.state == AttitudeState::Holding && self.state != AttitudeState::Holding {
            self.convergence.reset();
        }
        self.state = step.state;

        if self.state == AttitudeState::Holding {
            let intent = step.narrowed(intent);
            step.requests.extend(self.hold(&intent, ctx));
        }
        step
    }

    fn hold(&mut self, intent: &EngagementIntent, ctx: &TickContext<'_>) -> Vec<HostRequest> {
        // Bindings may have changed since the transition check.
        if !intent.attitude || !intent.reference.is_valid(ctx.bindings) {
            return Vec::new();
        }

        if let Some(mode) = native_mode(intent) {
            return vec![HostRequest::HoldMode(mode)];
        }

        let mut requests = vec![HostRequest::HoldMode(HoldMode::StabilityAssist)];
        let t = ctx.telemetry;
        let frame = match resolve(intent.reference, t, ctx.bindings.target(), ctx.bindings.maneuver()) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(time = t.time, %err, "skipping attitude update");
                return requests;
            }
        };

        let desired = intent.orientation.desired(&frame, &t.top());
        let held = self.convergence.step(&desired, &ctx.locked_rotation, t.dt);
        requests.push(HostRequest::LockRotation(held));
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Hpr, OrientationRequest};
    use crate::telemetry::{Bindings, OrbitPatch, Telemetry};
    use nalgebra::{UnitQuaternion, Vector3};

    fn telemetry() -> Telemetry {
        Telemetry {
            time: 10.0,
            dt: 0.02,
            warp_rate: 1.0,
            position: Vector3::new(0.0, 700_000.0, 0.0),
            orbital_velocity: Vector3::new(2200.0, 0.0, 0.0),
            surface_velocity: Vector3::new(2000.0, 0.0, 0.0),
            up: Vector3::y(),
            north: Vector3::z(),
            attitude: UnitQuaternion::identity(),
            mass: 3500.0,
            stage: None,
            orbit: OrbitPatch::new("Planet", Vector3::z(), false),
            ancestors: vec![],
            star_position: Vector3::new(1e10, 0.0, 0.0),
        }
    }

    fn hold(reference: ReferenceSelector) -> EngagementIntent {
        EngagementIntent::hold(reference, OrientationRequest::Free)
    }

    #[test]
    fn idle_engages_when_valid() {
        let step = transition(AttitudeState::Idle, &hold(ReferenceSelector::Sun), true, false);
        assert_eq!(step.state, AttitudeState::Holding);
        assert_eq!(step.requests, vec![HostRequest::EnableHold]);
        assert_eq!(step.update, None);
    }

    #[test]
    fn idle_rejects_invalid_reference() {
        let step = transition(AttitudeState::Idle, &hold(ReferenceSelector::Target), false, true);
        assert_eq!(step.state, AttitudeState::Idle);
        assert_eq!(step.update, Some(IntentUpdate::DisengageAll));
        assert_eq!(step.events, vec![PilotEventKind::EngageRejected(ReferenceSelector::Target)]);
    }

    #[test]
    fn idle_stays_idle_without_intent() {
        let step = transition(AttitudeState::Idle, &EngagementIntent::idle(), true, true);
        assert_eq!(step, Step::stay(AttitudeState::Idle));
    }

    #[test]
    fn holding_releases_on_any_cancel_condition() {
        let intent = hold(ReferenceSelector::OrbitPrograde);
        assert_eq!(transition(AttitudeState::Holding, &intent, true, true).state, AttitudeState::Holding);

        let cases = [
            (EngagementIntent::idle(), true, true, ReleaseReason::Disengaged),
            (intent, true, false, ReleaseReason::HostDisabled),
            (intent, false, true, ReleaseReason::ReferenceLost),
        ];
        for (intent, valid, enabled, reason) in cases {
            let step = transition(AttitudeState::Holding, &intent, valid, enabled);
            assert_eq!(step.state, AttitudeState::Idle);
            assert_eq!(step.update, Some(IntentUpdate::DisengageAll));
            assert_eq!(step.events, vec![PilotEventKind::AttitudeReleased(reason)]);
        }
    }

    #[test]
    fn native_mode_only_for_free_node_and_target() {
        assert_eq!(native_mode(&EngagementIntent::execute_maneuver()), Some(HoldMode::Maneuver));
        assert_eq!(native_mode(&hold(ReferenceSelector::Target)), Some(HoldMode::Target));
        assert_eq!(native_mode(&hold(ReferenceSelector::TargetOrientation)), None);
        let locked = EngagementIntent::hold(
            ReferenceSelector::Target,
            OrientationRequest::Locked(Hpr::new(10.0, 0.0, 0.0)),
        );
        assert_eq!(native_mode(&locked), None);
    }

    #[test]
    fn reentering_hold_starts_from_rest() {
        let t = telemetry();
        let bindings = Bindings::default();
        // Nose along +Z, prograde along +X: a 90 degree slew.
        let ctx = TickContext {
            telemetry: &t,
            bindings: &bindings,
            autopilot_enabled: true,
            locked_rotation: UnitQuaternion::identity(),
            throttle: 0.0,
        };
        let prograde = hold(ReferenceSelector::OrbitPrograde);

        let mut fresh = AttitudePilot::new(AttitudeConfig::default());
        fresh.tick(&prograde, &ctx);
        let first_tick_velocity = fresh.convergence().velocity();
        assert!(first_tick_velocity != 0.0);

        let mut pilot = AttitudePilot::new(AttitudeConfig::default());
        for _ in 0..5 {
            pilot.tick(&prograde, &ctx);
        }
        assert_ne!(pilot.convergence().velocity(), first_tick_velocity);

        let step = pilot.tick(&EngagementIntent::idle(), &ctx);
        assert_eq!(step.state, AttitudeState::Idle);

        let step = pilot.tick(&prograde, &ctx);
        assert_eq!(step.state, AttitudeState::Holding);
        assert_eq!(pilot.convergence().velocity(), first_tick_velocity);
    }
}
