use std::io::Write;

use tempfile::NamedTempFile;

use vessel_autopilot::config::AutopilotConfig;
use vessel_autopilot::error::ConfigError;
use vessel_autopilot::sim::{fly, scenario, FlightConfig};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[attitude]
smooth_time_max = 0.3

[planner]
refresh_interval = 2.0
"#,
    );
    let config = AutopilotConfig::load(file.path()).unwrap();
    let defaults = AutopilotConfig::default();

    assert_eq!(config.attitude.smooth_time_max, 0.3);
    assert_eq!(config.attitude.smooth_time_min, defaults.attitude.smooth_time_min);
    assert_eq!(config.planner.refresh_interval, 2.0);
    assert_eq!(config.maneuver, defaults.maneuver);
}

#[test]
fn invalid_values_are_rejected() {
    let file = write_config("[attitude]\nsmooth_time_min = 0.5\nsmooth_time_max = 0.2\n");
    let err = AutopilotConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[attitude\nsmooth_time_max = ");
    let err = AutopilotConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "got {:?}", err);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AutopilotConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "got {:?}", err);
}

#[test]
fn loaded_config_flies_the_burn() {
    let file = write_config("[maneuver]\ncompletion_epsilon = 0.5\nthrottle_smooth_time = 0.3\n");
    let config = AutopilotConfig::load(file.path()).unwrap();

    let mut s = scenario::prograde_burn().with_config(config);
    s.engage().unwrap();
    let log = fly(&mut s.autopilot, &mut s.host, &FlightConfig::default());

    let summary = vessel_autopilot::io::FlightSummary::from_log(s.name, &log);
    let residual = summary.residual_dv.unwrap();
    assert!(residual < 0.5, "residual {}", residual);
    assert!(summary.max_throttle > 0.9);
    assert!(!s.autopilot.is_active());
}
