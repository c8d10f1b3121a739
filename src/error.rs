use thiserror::Error;

use crate::frame::ReferenceSelector;

/// External object a reference selector depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Target,
    Maneuver,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Target => f.write_str("target"),
            Binding::Maneuver => f.write_str("maneuver node"),
        }
    }
}

/// Errors raised while resolving a reference frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("{0:?} requires an active target")]
    MissingTarget(ReferenceSelector),
    #[error("{0:?} requires an active maneuver node")]
    MissingManeuver(ReferenceSelector),
    #[error("{0:?} has no usable forward direction this tick")]
    Degenerate(ReferenceSelector),
}

/// Errors raised when the autopilot refuses an engagement request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngageError {
    #[error("{selector:?} is not a valid reference: no {missing}")]
    InvalidReference {
        selector: ReferenceSelector,
        missing: Binding,
    },
    #[error("no previous attitude engagement to resume")]
    NothingToResume,
}

/// Errors that can occur while loading autopilot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while writing flight logs.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}
