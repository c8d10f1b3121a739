//! Tuning constants for the attitude hold, maneuver execution and burn planner.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Standard gravity, m/s^2.
pub const G0: f64 = 9.80665;

// ---------------------------------------------------------------------------
// Attitude hold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttitudeConfig {
    pub converged_deg: f64,   // below this the desired orientation passes through
    pub smooth_time_max: f64, // s, time constant near convergence
    pub smooth_time_min: f64, // s, time constant when far off target
    pub ramp_start_deg: f64,
    pub ramp_end_deg: f64,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            converged_deg: 0.25,
            smooth_time_max: 0.20,
            smooth_time_min: 0.10,
            ramp_start_deg: 60.0,
            ramp_end_deg: 180.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Maneuver execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ManeuverConfig {
    pub throttle_smooth_time: f64, // s
    pub heading_bias: f64,
    pub cutoff_fraction: f64,
    pub completion_epsilon: f64, // m/s of burn vector left
    pub delta_v_floor: f64,      // m/s
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            throttle_smooth_time: 0.15,
            heading_bias: 0.01,
            cutoff_fraction: 0.1,
            completion_epsilon: 0.15,
            delta_v_floor: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Burn planner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub refresh_interval: f64, // s of simulated time at 1x warp
    pub standard_gravity: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 5.0,
            standard_gravity: G0,
        }
    }
}

/// Complete autopilot configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// [attitude]
/// smooth_time_max = 0.3
///
/// [planner]
/// refresh_interval = 2.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    pub attitude: AttitudeConfig,
    pub maneuver: ManeuverConfig,
    pub planner: PlannerConfig,
}

impl AutopilotConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AutopilotConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.attitude;
        if a.converged_deg < 0.0 {
            return Err(invalid("attitude.converged_deg must not be negative"));
        }
        if a.smooth_time_min <= 0.0 || a.smooth_time_max <= 0.0 {
            return Err(invalid("attitude smoothing times must be positive"));
        }
        if a.smooth_time_min > a.smooth_time_max {
            return Err(invalid(
                "attitude.smooth_time_min must not exceed attitude.smooth_time_max",
            ));
        }
        if a.ramp_end_deg <= a.ramp_start_deg {
            return Err(invalid("attitude.ramp_end_deg must exceed attitude.ramp_start_deg"));
        }

        let m = &self.maneuver;
        if m.throttle_smooth_time <= 0.0 {
            return Err(invalid("maneuver.throttle_smooth_time must be positive"));
        }
        if m.completion_epsilon <= 0.0 || m.delta_v_floor <= 0.0 {
            return Err(invalid("maneuver epsilons must be positive"));
        }
        if !(0.0..=1.0).contains(&m.cutoff_fraction) || m.cutoff_fraction == 0.0 {
            return Err(invalid("maneuver.cutoff_fraction must be in (0, 1]"));
        }

        let p = &self.planner;
        if p.refresh_interval <= 0.0 || p.standard_gravity <= 0.0 {
            return Err(invalid("planner interval and gravity must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AutopilotConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.attitude.converged_deg - 0.25).abs() < 1e-12);
        assert!((config.maneuver.completion_epsilon - 0.15).abs() < 1e-12);
        assert!((config.planner.refresh_interval - 5.0).abs() < 1e-12);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AutopilotConfig::from_toml_str(
            "[attitude]\nsmooth_time_max = 0.3\n\n[planner]\nrefresh_interval = 2.0\n",
        )
        .unwrap();
        assert!((config.attitude.smooth_time_max - 0.3).abs() < 1e-12);
        assert!((config.attitude.smooth_time_min - 0.10).abs() < 1e-12);
        assert!((config.planner.refresh_interval - 2.0).abs() < 1e-12);
        assert_eq!(config.maneuver, ManeuverConfig::default());
    }

    #[test]
    fn inverted_smoothing_times_rejected() {
        let err = AutopilotConfig::from_toml_str(
            "[attitude]\nsmooth_time_max = 0.1\nsmooth_time_min = 0.2\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AutopilotConfig::from_toml_str("[attitude\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
