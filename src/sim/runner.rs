use serde::Serialize;

use super::host::KinematicHost;
use crate::host::{Actuator, ManeuverPlanProvider};
use crate::pilot::{Autopilot, PilotEvent};

// ---------------------------------------------------------------------------
// Flight configuration and log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightConfig {
    pub dt: f64,       // s
    pub max_time: f64, // s of universal time
    /// End the flight on the first tick the autopilot is fully disengaged.
    pub stop_when_idle: bool,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,
            max_time: 600.0,
            stop_when_idle: true,
        }
    }
}

/// One row of the flight log, sampled after the autopilot's tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    pub time: f64,
    pub attitude_state: &'static str,
    pub maneuver_state: &'static str,
    pub attitude_engaged: bool,
    pub maneuver_engaged: bool,
    pub reference: &'static str,
    pub throttle: f64,
    pub attitude_error_deg: f64,
    pub remaining_dv: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    pub records: Vec<TickRecord>,
    pub events: Vec<PilotEvent>,
}

impl FlightLog {
    pub fn last(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    pub fn duration(&self) -> f64 {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Fly `host` under `autopilot` until `max_time`, or until the autopilot
/// lets go when `stop_when_idle` is set.
///
/// `inspect` runs after every autopilot tick, before the host integrates.
pub fn fly_with(
    autopilot: &mut Autopilot,
    host: &mut KinematicHost,
    config: &FlightConfig,
    mut inspect: impl FnMut(&Autopilot, &KinematicHost),
) -> FlightLog {
    let capacity = ((config.max_time - host.time()).max(0.0) / config.dt) as usize + 1;
    let mut log = FlightLog {
        records: Vec::with_capacity(capacity.min(200_000)),
        events: Vec::new(),
    };

    while host.time() < config.max_time {
        autopilot.tick(host);
        inspect(autopilot, host);
        log.records.push(record(autopilot, host));
        log.events.extend(autopilot.drain_events());

        if config.stop_when_idle && !autopilot.is_active() {
            break;
        }
        host.step(config.dt);
    }

    log
}

pub fn fly(autopilot: &mut Autopilot, host: &mut KinematicHost, config: &FlightConfig) -> FlightLog {
    fly_with(autopilot, host, config, |_, _| {})
}

fn record(autopilot: &Autopilot, host: &KinematicHost) -> TickRecord {
    TickRecord {
        time: host.time(),
        attitude_state: autopilot.attitude_state().name(),
        maneuver_state: autopilot.maneuver_state().name(),
        attitude_engaged: autopilot.attitude_engaged(),
        maneuver_engaged: autopilot.maneuver_engaged(),
        reference: autopilot.active_reference().name(),
        throttle: host.throttle(),
        attitude_error_deg: host.attitude_error_deg(),
        remaining_dv: host.active_node().map_or(0.0, |n| n.remaining()),
        mass: host.mass(),
    }
}
