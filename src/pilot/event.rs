use crate::frame::ReferenceSelector;

// ---------------------------------------------------------------------------
// Pilot events
// ---------------------------------------------------------------------------

/// Why an attitude hold ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    Disengaged,
    HostDisabled,
    ReferenceLost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PilotEventKind {
    AttitudeEngaged(ReferenceSelector),
    /// Engagement refused at the first tick: the reference had vanished.
    EngageRejected(ReferenceSelector),
    AttitudeReleased(ReleaseReason),
    ManeuverStarted,
    BurnStarted { start_delta_v: f64 },
    BurnComplete { residual: f64 },
    ManeuverStopped,
}

/// A state machine transition, stamped with the tick's universal time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotEvent {
    pub time: f64,
    pub kind: PilotEventKind,
}

impl PilotEvent {
    /// Write the event to the log at the level it deserves.
    pub fn log(&self) {
        let time = self.time;
        match self.kind {
            PilotEventKind::AttitudeEngaged(reference) => {
                tracing::info!(time, reference = reference.name(), "attitude hold engaged")
            }
            PilotEventKind::EngageRejected(reference) => tracing::warn!(
                time,
                reference = reference.name(),
                "not engaging pilot: reference is not currently valid"
            ),
            PilotEventKind::AttitudeReleased(reason) => {
                tracing::info!(time, ?reason, "attitude hold released")
            }
            PilotEventKind::ManeuverStarted => tracing::info!(time, "maneuver pilot starting"),
            PilotEventKind::BurnStarted { start_delta_v } => {
                tracing::info!(time, start_delta_v, "time to maneuver")
            }
            PilotEventKind::BurnComplete { residual } => {
                tracing::info!(time, residual, "maneuver complete")
            }
            PilotEventKind::ManeuverStopped => tracing::info!(time, "maneuver pilot stopping"),
        }
    }
}
