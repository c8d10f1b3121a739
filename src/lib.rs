//! Vessel autopilot: attitude hold against a selectable reference frame and
//! maneuver-node execution, driven one simulation tick at a time.

pub mod error;
pub mod config;
pub mod telemetry;
pub mod host;
pub mod frame;
pub mod gnc;
pub mod pilot;
pub mod vehicle;
pub mod sim;
pub mod io;

pub mod prelude {
    pub use crate::config::AutopilotConfig;
    pub use crate::error::{EngageError, FrameError};
    pub use crate::frame::{Hpr, OrientationRequest, ReferenceSelector};
    pub use crate::host::{Actuator, FlightHost, HoldMode, ManeuverPlanProvider, TargetProvider, TelemetryProvider};
    pub use crate::pilot::{Autopilot, AttitudeState, ManeuverState, PilotEvent, PilotEventKind};
    pub use crate::telemetry::{Bindings, ManeuverNode, Target, Telemetry};
}
