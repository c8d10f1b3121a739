use tracing::trace;

use super::attitude::{AttitudePilot, AttitudeState};
use super::event::PilotEvent;
use super::intent::{EngagementIntent, HostRequest, Step, TickContext};
use super::maneuver::{ManeuverPilot, ManeuverState};
use crate::config::AutopilotConfig;
use crate::error::EngageError;
use crate::frame::{Hpr, OrientationRequest, ReferenceSelector};
use crate::gnc::BurnEstimate;
use crate::host::FlightHost;
use crate::telemetry::{Bindings, Telemetry};

// ---------------------------------------------------------------------------
// Autopilot facade
// ---------------------------------------------------------------------------

/// Attitude hold plus maneuver execution for a single vessel.
///
/// Engagement calls only replace the [`EngagementIntent`]; all actuation
/// happens inside [`Autopilot::tick`], attitude first, maneuver second.
#[derive(Debug, Clone)]
pub struct Autopilot {
    config: AutopilotConfig,
    intent: EngagementIntent,
    last_attitude: Option<(ReferenceSelector, OrientationRequest)>,
    bindings: Bindings,
    attitude: AttitudePilot,
    maneuver: ManeuverPilot,
    events: Vec<PilotEvent>,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            intent: EngagementIntent::idle(),
            last_attitude: None,
            bindings: Bindings::default(),
            attitude: AttitudePilot::new(config.attitude),
            maneuver: ManeuverPilot::new(config.maneuver, config.planner),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    /// Pull the active maneuver node and target from the host.
    pub fn refresh_bindings<H: FlightHost>(&mut self, host: &H) {
        self.bindings = Bindings {
            maneuver: host.active_node(),
            target: host.active_target(),
        };
    }

    /// Bindings as of the last refresh.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    // -- Engagement ---------------------------------------------------------

    /// Hold a fixed heading/pitch/roll offset from `selector`.
    pub fn engage_attitude(&mut self, selector: ReferenceSelector, offset: Hpr) -> Result<(), EngageError> {
        self.engage(selector, OrientationRequest::Locked(offset))
    }

    /// Point along `selector`'s forward axis, leaving roll free.
    pub fn engage_attitude_free(&mut self, selector: ReferenceSelector) -> Result<(), EngageError> {
        self.engage(selector, OrientationRequest::Free)
    }

    /// Hold on the active node and execute its burn.
    pub fn engage_maneuver(&mut self) -> Result<(), EngageError> {
        ReferenceSelector::ManeuverNode.validate(&self.bindings)?;
        self.intent = EngagementIntent::execute_maneuver();
        self.last_attitude = Some((ReferenceSelector::ManeuverNode, OrientationRequest::Free));
        Ok(())
    }

    /// Re-engage the most recent attitude hold.
    pub fn resume_attitude(&mut self) -> Result<(), EngageError> {
        let (selector, orientation) = self.last_attitude.ok_or(EngageError::NothingToResume)?;
        self.engage(selector, orientation)
    }

    pub fn disengage_all(&mut self) {
        self.intent = EngagementIntent {
            attitude: false,
            maneuver: false,
            ..self.intent
        };
    }

    fn engage(&mut self, selector: ReferenceSelector, orientation: OrientationRequest) -> Result<(), EngageError> {
        selector.validate(&self.bindings)?;
        self.intent = EngagementIntent::hold(selector, orientation);
        self.last_attitude = Some((selector, orientation));
        Ok(())
    }

    // -- Queries ------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.intent.is_active()
    }

    pub fn attitude_engaged(&self) -> bool {
        self.intent.attitude
    }

    pub fn maneuver_engaged(&self) -> bool {
        self.intent.maneuver
    }

    pub fn active_reference(&self) -> ReferenceSelector {
        self.intent.reference
    }

    /// Offset held from the active reference; zero in free-roll holds.
    pub fn relative_hpr(&self) -> Hpr {
        self.intent.orientation.hpr()
    }

    pub fn intent(&self) -> &EngagementIntent {
        &self.intent
    }

    pub fn attitude_state(&self) -> AttitudeState {
        self.attitude.state()
    }

    pub fn maneuver_state(&self) -> ManeuverState {
        self.maneuver.state()
    }

    /// Planned burn start while a maneuver is in progress.
    pub fn burn_start_time(&self) -> Option<f64> {
        (self.maneuver.state() != ManeuverState::Idle).then(|| self.maneuver.planner().start_time())
    }

    pub fn burn_estimate(&self) -> Option<BurnEstimate> {
        self.maneuver.planner().last_estimate()
    }

    /// Delta-v the current burn started from.
    pub fn start_delta_v(&self) -> f64 {
        self.maneuver.start_delta_v()
    }

    /// Take every transition recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<PilotEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Tick ---------------------------------------------------------------

    /// Advance both state machines by one simulation step.
    pub fn tick<H: FlightHost>(&mut self, host: &mut H) {
        self.refresh_bindings(host);
        let telemetry = host.telemetry();

        let step = {
            let ctx = context(&telemetry, &self.bindings, host);
            self.attitude.tick(&self.intent, &ctx)
        };
        self.apply(step, &telemetry, host);

        // Attitude requests may have switched the hold on or re-locked it.
        let step = {
            let ctx = context(&telemetry, &self.bindings, host);
            self.maneuver.tick(&self.intent, &ctx)
        };
        self.apply(step, &telemetry, host);

        trace!(
            time = telemetry.time,
            attitude = self.attitude.state().name(),
            maneuver = self.maneuver.state().name(),
            "tick"
        );
    }

    fn apply<S, H: FlightHost>(&mut self, step: Step<S>, telemetry: &Telemetry, host: &mut H) {
        let Step {
            update,
            requests,
            events,
            ..
        } = step;

        if let Some(update) = update {
            self.intent = self.intent.apply(update);
        }
        for request in requests {
            if request == HostRequest::RemoveManeuver {
                self.bindings.maneuver = None;
            }
            execute(request, host);
        }
        for kind in events {
            let event = PilotEvent {
                time: telemetry.time,
                kind,
            };
            event.log();
            self.events.push(event);
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(AutopilotConfig::default())
    }
}

fn context<'a, H: FlightHost>(telemetry: &'a Telemetry, bindings: &'a Bindings, host: &H) -> TickContext<'a> {
    TickContext {
        telemetry,
        bindings,
        autopilot_enabled: host.autopilot_enabled(),
        locked_rotation: host.locked_rotation(),
        throttle: host.throttle(),
    }
}

fn execute<H: FlightHost>(request: HostRequest, host: &mut H) {
    match request {
        HostRequest::EnableHold => host.enable_hold(),
        HostRequest::HoldMode(mode) => {
            if host.hold_mode() != mode && host.can_set_mode(mode) {
                host.set_hold_mode(mode);
            }
        }
        HostRequest::LockRotation(rotation) => host.lock_rotation(rotation),
        HostRequest::Throttle(level) => host.set_throttle(level.clamp(0.0, 1.0)),
        HostRequest::RemoveManeuver => host.remove_active_node(),
    }
}

