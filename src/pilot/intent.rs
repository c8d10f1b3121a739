use nalgebra::UnitQuaternion;

use super::event::PilotEventKind;
use crate::frame::{OrientationRequest, ReferenceSelector};
use crate::host::HoldMode;
use crate::telemetry::{Bindings, Telemetry};

// ---------------------------------------------------------------------------
// Engagement intent shared by both state machines
// ---------------------------------------------------------------------------

/// What the pilot has been asked to do.
///
/// Never mutated in place: engagement replaces it wholesale and the state
/// machines only ever narrow it through an [`IntentUpdate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementIntent {
    pub attitude: bool,
    pub maneuver: bool,
    pub reference: ReferenceSelector,
    pub orientation: OrientationRequest,
}

impl EngagementIntent {
    pub fn idle() -> Self {
        Self {
            attitude: false,
            maneuver: false,
            reference: ReferenceSelector::OrbitPrograde,
            orientation: OrientationRequest::Free,
        }
    }

    pub fn hold(reference: ReferenceSelector, orientation: OrientationRequest) -> Self {
        Self {
            attitude: true,
            maneuver: false,
            reference,
            orientation,
        }
    }

    /// Attitude hold on the node plus maneuver execution.
    pub fn execute_maneuver() -> Self {
        Self {
            attitude: true,
            maneuver: true,
            reference: ReferenceSelector::ManeuverNode,
            orientation: OrientationRequest::Free,
        }
    }

    pub fn is_active(&self) -> bool {
        self.attitude || self.maneuver
    }

    /// A maneuver is only ever executed under an attitude hold on its node.
    pub fn is_consistent(&self) -> bool {
        !self.maneuver || (self.attitude && self.reference == ReferenceSelector::ManeuverNode)
    }

    pub fn apply(self, update: IntentUpdate) -> Self {
        match update {
            IntentUpdate::DisengageAll => Self {
                attitude: false,
                maneuver: false,
                ..self
            },
            IntentUpdate::ReleaseManeuver => Self {
                maneuver: false,
                ..self
            },
        }
    }
}

impl Default for EngagementIntent {
    fn default() -> Self {
        Self::idle()
    }
}

/// Narrowing of the intent requested by a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentUpdate {
    DisengageAll,
    ReleaseManeuver,
}

// ---------------------------------------------------------------------------
// Side effects requested from the host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostRequest {
    EnableHold,
    HoldMode(HoldMode),
    LockRotation(UnitQuaternion<f64>),
    Throttle(f64),
    RemoveManeuver,
}

/// Outcome of one state machine evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    pub state: S,
    pub update: Option<IntentUpdate>,
    pub requests: Vec<HostRequest>,
    pub events: Vec<PilotEventKind>,
}

impl<S> Step<S> {
    pub fn stay(state: S) -> Self {
        Self {
            state,
            update: None,
            requests: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn to(state: S, event: PilotEventKind) -> Self {
        Self {
            events: vec![event],
            ..Self::stay(state)
        }
    }

    pub fn with_update(mut self, update: IntentUpdate) -> Self {
        self.update = Some(update);
        self
    }

    pub fn with_request(mut self, request: HostRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Intent as it stands after this step's update.
    pub fn narrowed(&self, intent: &EngagementIntent) -> EngagementIntent {
        self.update.map_or(*intent, |update| intent.apply(update))
    }
}

// ---------------------------------------------------------------------------
// Per-tick inputs
// ---------------------------------------------------------------------------

/// Everything a state machine reads during one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub telemetry: &'a Telemetry,
    pub bindings: &'a Bindings,
    pub autopilot_enabled: bool,
    pub locked_rotation: UnitQuaternion<f64>,
    pub throttle: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maneuver_intent_is_consistent() {
        assert!(EngagementIntent::execute_maneuver().is_consistent());
        assert!(EngagementIntent::idle().is_consistent());
        let broken = EngagementIntent {
            maneuver: true,
            ..EngagementIntent::hold(ReferenceSelector::Sun, OrientationRequest::Free)
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn disengage_clears_both_flags() {
        let intent = EngagementIntent::execute_maneuver().apply(IntentUpdate::DisengageAll);
        assert!(!intent.attitude && !intent.maneuver);
        assert_eq!(intent.reference, ReferenceSelector::ManeuverNode);
    }

    #[test]
    fn release_keeps_attitude() {
        let intent = EngagementIntent::execute_maneuver().apply(IntentUpdate::ReleaseManeuver);
        assert!(intent.attitude && !intent.maneuver);
        assert!(intent.is_consistent());
    }
}
