use crate::error::{Binding, EngageError};
use crate::telemetry::Bindings;

/// Reference attitude the hold orientation is expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSelector {
    Inertial,
    OrbitPrograde,
    OrbitHorizontal,
    SurfacePrograde,
    SurfaceHorizontal,
    SurfaceNorth,
    Target,
    TargetRelativeVelocity,
    TargetOrientation,
    ManeuverNode,
    Sun,
}

impl ReferenceSelector {
    pub const ALL: [ReferenceSelector; 11] = [
        ReferenceSelector::Inertial,
        ReferenceSelector::OrbitPrograde,
        ReferenceSelector::OrbitHorizontal,
        ReferenceSelector::SurfacePrograde,
        ReferenceSelector::SurfaceHorizontal,
        ReferenceSelector::SurfaceNorth,
        ReferenceSelector::Target,
        ReferenceSelector::TargetRelativeVelocity,
        ReferenceSelector::TargetOrientation,
        ReferenceSelector::ManeuverNode,
        ReferenceSelector::Sun,
    ];

    /// External object this selector cannot be resolved without.
    pub fn requires(self) -> Option<Binding> {
        match self {
            ReferenceSelector::Target
            | ReferenceSelector::TargetRelativeVelocity
            | ReferenceSelector::TargetOrientation => Some(Binding::Target),
            ReferenceSelector::ManeuverNode => Some(Binding::Maneuver),
            _ => None,
        }
    }

    /// Check the selector against this tick's bindings.
    pub fn validate(self, bindings: &Bindings) -> Result<(), EngageError> {
        let present = match self.requires() {
            None => true,
            Some(Binding::Target) => bindings.target.is_some(),
            Some(Binding::Maneuver) => bindings.maneuver.is_some(),
        };
        match self.requires() {
            Some(missing) if !present => Err(EngageError::InvalidReference {
                selector: self,
                missing,
            }),
            _ => Ok(()),
        }
    }

    pub fn is_valid(self, bindings: &Bindings) -> bool {
        self.validate(bindings).is_ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            ReferenceSelector::Inertial => "inertial",
            ReferenceSelector::OrbitPrograde => "orbit-prograde",
            ReferenceSelector::OrbitHorizontal => "orbit-horizontal",
            ReferenceSelector::SurfacePrograde => "surface-prograde",
            ReferenceSelector::SurfaceHorizontal => "surface-horizontal",
            ReferenceSelector::SurfaceNorth => "surface-north",
            ReferenceSelector::Target => "target",
            ReferenceSelector::TargetRelativeVelocity => "target-relative-velocity",
            ReferenceSelector::TargetOrientation => "target-orientation",
            ReferenceSelector::ManeuverNode => "maneuver-node",
            ReferenceSelector::Sun => "sun",
        }
    }
}
