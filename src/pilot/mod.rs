//! Attitude hold and maneuver execution state machines behind one facade.

pub mod intent;
pub mod event;
pub mod attitude;
pub mod maneuver;
pub mod autopilot;

pub use intent::{EngagementIntent, HostRequest, IntentUpdate, Step, TickContext};
pub use event::{PilotEvent, PilotEventKind, ReleaseReason};
pub use attitude::{AttitudePilot, AttitudeState};
pub use maneuver::{ManeuverPilot, ManeuverState};
pub use autopilot::Autopilot;
