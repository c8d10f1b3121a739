use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::csv::writer_for_path;
use crate::error::ExportError;
use crate::pilot::{PilotEvent, PilotEventKind};
use crate::sim::FlightLog;

/// Summary of one autopilot flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub scenario: String,
    pub duration_s: f64,
    pub ticks: usize,
    pub burn_start_s: Option<f64>,
    pub burn_end_s: Option<f64>,
    pub start_delta_v: Option<f64>,
    pub residual_dv: Option<f64>,
    pub propellant_used_kg: f64,
    pub max_throttle: f64,
    pub final_attitude_error_deg: f64,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub time: f64,
    pub event: String,
}

impl From<&PilotEvent> for EventRecord {
    fn from(e: &PilotEvent) -> Self {
        Self {
            time: e.time,
            event: format!("{:?}", e.kind),
        }
    }
}

impl FlightSummary {
    /// Compute summary from a flown log.
    pub fn from_log(scenario: impl Into<String>, log: &FlightLog) -> Self {
        let burn_start = log.events.iter().find_map(|e| match e.kind {
            PilotEventKind::BurnStarted { start_delta_v } => Some((e.time, start_delta_v)),
            _ => None,
        });
        let burn_end = log.events.iter().find_map(|e| match e.kind {
            PilotEventKind::BurnComplete { residual } => Some((e.time, residual)),
            _ => None,
        });

        let propellant_used_kg = match (log.records.first(), log.records.last()) {
            (Some(first), Some(last)) => (first.mass - last.mass).max(0.0),
            _ => 0.0,
        };
        let max_throttle = log.records.iter().map(|r| r.throttle).fold(0.0_f64, f64::max);

        FlightSummary {
            scenario: scenario.into(),
            duration_s: log.duration(),
            ticks: log.records.len(),
            burn_start_s: burn_start.map(|(t, _)| t),
            burn_end_s: burn_end.map(|(t, _)| t),
            start_delta_v: burn_start.map(|(_, dv)| dv),
            residual_dv: burn_end.map(|(_, r)| r),
            propellant_used_kg,
            max_throttle,
            final_attitude_error_deg: log.last().map_or(0.0, |r| r.attitude_error_deg),
            events: log.events.iter().map(EventRecord::from).collect(),
        }
    }
}

/// Write flight summary as pretty JSON.
pub fn write_summary<W: Write>(writer: W, summary: &FlightSummary) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

pub fn write_summary_file(path: &Path, summary: &FlightSummary) -> Result<(), ExportError> {
    let mut writer = writer_for_path(path)?;
    write_summary(&mut writer, summary)?;
    writer.flush()?;
    Ok(())
}
