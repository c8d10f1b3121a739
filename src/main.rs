use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use vessel_autopilot::config::AutopilotConfig;
use vessel_autopilot::io::{self, FlightSummary};
use vessel_autopilot::sim::{self, scenario, FlightConfig, FlightLog, Scenario};

#[derive(Parser, Debug)]
#[command(name = "vessel-autopilot", version, about = "Fly a preset scenario under the autopilot")]
struct Cli {
    /// Scenario preset to fly
    #[arg(default_value = "prograde-burn")]
    scenario: String,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,

    /// Autopilot tuning file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the per-tick log as CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary as JSON (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Simulation step, s
    #[arg(long, default_value_t = 0.02)]
    dt: f64,

    /// Stop after this much universal time, s
    #[arg(long, default_value_t = 600.0)]
    max_time: f64,

    /// Log filter, e.g. `info` or `vessel_autopilot=debug`
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if cli.list {
        for name in scenario::NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => AutopilotConfig::load(path)?,
        None => AutopilotConfig::default(),
    };

    let Some(preset) = scenario::by_name(&cli.scenario) else {
        return Err(format!(
            "unknown scenario `{}`, expected one of: {}",
            cli.scenario,
            scenario::NAMES.join(", ")
        )
        .into());
    };
    let mut scenario = preset.with_config(config);
    scenario.engage()?;

    let flight = FlightConfig {
        dt: cli.dt,
        max_time: cli.max_time,
        stop_when_idle: true,
    };
    let initial = scenario.host.clone();
    let log = sim::fly(&mut scenario.autopilot, &mut scenario.host, &flight);
    let summary = FlightSummary::from_log(scenario.name, &log);

    if let Some(path) = &cli.csv {
        io::write_log_file(path, &log.records)?;
    }
    if let Some(path) = &cli.json {
        io::write_summary_file(path, &summary)?;
    }

    print_report(&initial, &scenario, &log, &summary, &flight);
    Ok(())
}

fn print_report(
    initial: &sim::KinematicHost,
    scenario: &Scenario,
    log: &FlightLog,
    summary: &FlightSummary,
    flight: &FlightConfig,
) {
    let stage = &initial.stage;

    println!();
    println!("====================================================================");
    println!("  AUTOPILOT FLIGHT: {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Vessel");
    println!("  ------------------------------------------------------------------");
    println!(
        "  Dry mass:      {:>8.1} kg    Propellant:   {:>8.1} kg",
        stage.dry_mass, initial.propellant
    );
    println!(
        "  Thrust:        {:>8.0} N     Isp:          {:>8.0} s",
        stage.thrust, stage.isp
    );
    println!(
        "  Delta-v:       {:>8.0} m/s   Altitude:     {:>8.1} km",
        stage.delta_v(),
        (initial.state.radius() - initial.body.radius) / 1000.0
    );
    println!();

    println!("  Pilot Events");
    println!("  ------------------------------------------------------------------");
    if summary.events.is_empty() {
        println!("  (none)");
    }
    for event in &summary.events {
        println!("  t={:>8.2}s   {}", event.time, event.event);
    }
    println!();

    println!("  Performance Summary");
    println!("  ------------------------------------------------------------------");
    if let (Some(start), Some(dv)) = (summary.burn_start_s, summary.start_delta_v) {
        println!("  Burn start:    {:>8.2} s     Planned dv:   {:>8.2} m/s", start, dv);
    }
    if let (Some(end), Some(residual)) = (summary.burn_end_s, summary.residual_dv) {
        println!("  Burn end:      {:>8.2} s     Residual:     {:>8.3} m/s", end, residual);
    }
    println!(
        "  Propellant:    {:>8.2} kg    Max throttle: {:>8.3}",
        summary.propellant_used_kg, summary.max_throttle
    );
    println!(
        "  Final error:   {:>8.3} deg   Flight time:  {:>8.2} s",
        summary.final_attitude_error_deg, summary.duration_s
    );
    println!();

    println!("  Time History (sampled)");
    println!("  ------------------------------------------------------------------");
    println!(
        "  {:>8}  {:>9}  {:>9}  {:>8}  {:>9}  {:>9}",
        "t (s)", "attitude", "maneuver", "throttle", "err (deg)", "dv (m/s)"
    );
    let stride = (log.records.len() / 25).max(1);
    for (i, r) in log.records.iter().enumerate() {
        if i % stride != 0 && i != log.records.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.2}  {:>9}  {:>9}  {:>8.3}  {:>9.3}  {:>9.2}",
            r.time, r.attitude_state, r.maneuver_state, r.throttle, r.attitude_error_deg, r.remaining_dv
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={} s", log.records.len(), flight.dt);
    println!("====================================================================");
    println!();
}
