pub mod snapshot;
pub mod bindings;

pub use snapshot::{OrbitPatch, StageAggregate, Telemetry};
pub use bindings::{Bindings, ManeuverNode, Target, TargetKind};
