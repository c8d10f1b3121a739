use super::event::PilotEventKind;
use super::intent::{EngagementIntent, HostRequest, IntentUpdate, Step, TickContext};
use crate::config::{ManeuverConfig, PlannerConfig};
use crate::gnc::{goal_throttle, BurnPlanner, ThrottleShaper};
use crate::telemetry::ManeuverNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManeuverState {
    #[default]
    Idle,
    Coasting,
    Burning,
}

impl ManeuverState {
    pub fn name(self) -> &'static str {
        match self {
            ManeuverState::Idle => "idle",
            ManeuverState::Coasting => "coasting",
            ManeuverState::Burning => "burning",
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Next maneuver state. `burn_start` is the planner's current estimate.
pub fn transition(
    state: ManeuverState,
    intent: &EngagementIntent,
    node: Option<&ManeuverNode>,
    autopilot_enabled: bool,
    now: f64,
    burn_start: f64,
) -> Step<ManeuverState> {
    if state == ManeuverState::Idle {
        return if intent.maneuver && node.is_some() {
            Step::to(ManeuverState::Coasting, PilotEventKind::ManeuverStarted)
        } else {
            Step::stay(ManeuverState::Idle)
        };
    }

    let cancel = !intent.attitude || !intent.maneuver || !autopilot_enabled || node.is_none();
    if cancel {
        return Step::to(ManeuverState::Idle, PilotEventKind::ManeuverStopped)
            .with_update(IntentUpdate::ReleaseManeuver)
            .with_request(HostRequest::Throttle(0.0));
    }

    match state {
        ManeuverState::Coasting if now > burn_start => Step::to(
            ManeuverState::Burning,
            PilotEventKind::BurnStarted { start_delta_v: 0.0 },
        ),
        _ => Step::stay(state),
    }
}

// ---------------------------------------------------------------------------
// Maneuver pilot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ManeuverPilot {
    config: ManeuverConfig,
    state: ManeuverState,
    planner: BurnPlanner,
    shaper: ThrottleShaper,
    start_delta_v: f64,
}

impl ManeuverPilot {
    pub fn new(config: ManeuverConfig, planner: PlannerConfig) -> Self {
        Self {
            config,
            state: ManeuverState::Idle,
            planner: BurnPlanner::new(planner),
            shaper: ThrottleShaper::new(config),
            start_delta_v: config.delta_v_floor,
        }
    }

    pub fn state(&self) -> ManeuverState {
        self.state
    }

    pub fn planner(&self) -> &BurnPlanner {
        &self.planner
    }

    /// Planned delta-v recorded when the burn started.
    pub fn start_delta_v(&self) -> f64 {
        self.start_delta_v
    }

    /// Evaluate transitions, then coast or burn for this tick.
    pub fn tick(&mut self, intent: &EngagementIntent, ctx: &TickContext<'_>) -> Step<ManeuverState> {
        let node = ctx.bindings.maneuver();
        let mut step = transition(
            self.state,
            intent,
            node,
            ctx.autopilot_enabled,
            ctx.telemetry.time,
            self.planner.start_time(),
        );

        if step.state != self.state {
            self.enter(step.state, node, &mut step);
        }
        self.state = step.state;

        let intent = step.narrowed(intent);
        match self.state {
            ManeuverState::Coasting => self.coast(&intent, ctx),
            ManeuverState::Burning => {
                if self.burn(&intent, ctx, &mut step) {
                    // Finished burns leave directly; the cancel arm is for interruptions.
                    step.state = ManeuverState::Idle;
                    self.state = ManeuverState::Idle;
                }
            }
            ManeuverState::Idle => {}
        }
        step
    }

    fn enter(&mut self, state: ManeuverState, node: Option<&ManeuverNode>, step: &mut Step<ManeuverState>) {
        match (state, node) {
            (ManeuverState::Coasting, Some(node)) => self.planner.reset(node.scheduled_time),
            (ManeuverState::Burning, Some(node)) => {
                self.start_delta_v = node.delta_v().max(self.config.delta_v_floor);
                self.shaper.reset();
                for event in &mut step.events {
                    if let PilotEventKind::BurnStarted { start_delta_v } = event {
                        *start_delta_v = self.start_delta_v;
                    }
                }
            }
            _ => {}
        }
    }

    fn coast(&mut self, intent: &EngagementIntent, ctx: &TickContext<'_>) {
        let Some(node) = ctx.bindings.maneuver() else {
            return;
        };
        if intent.maneuver {
            self.planner.update(node, ctx.telemetry);
        }
    }

    /// Shape the throttle for this tick. Returns true once the burn is done.
    fn burn(&mut self, intent: &EngagementIntent, ctx: &TickContext<'_>, step: &mut Step<ManeuverState>) -> bool {
        let Some(node) = ctx.bindings.maneuver() else {
            return false;
        };
        if !intent.maneuver {
            return false;
        }

        let remaining = node.remaining();
        if remaining < self.config.completion_epsilon {
            step.update = Some(IntentUpdate::ReleaseManeuver);
            step.requests.push(HostRequest::RemoveManeuver);
            step.requests.push(HostRequest::Throttle(0.0));
            step.events.push(PilotEventKind::BurnComplete { residual: remaining });
            return true;
        }

        let t = ctx.telemetry;
        let goal = goal_throttle(&t.forward(), &node.burn_vector, self.start_delta_v, &self.config);
        let throttle = self.shaper.step(ctx.throttle, goal, t.dt);
        step.requests.push(HostRequest::Throttle(throttle));
        false
    }
}
