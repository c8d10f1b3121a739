use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use vessel_autopilot::io::FlightSummary;
use vessel_autopilot::sim::{self, scenario, FlightConfig, TickRecord};

fn main() -> eframe::Result {
    let name = std::env::args().nth(1).unwrap_or_else(|| "prograde-burn".into());
    let mut scenario = scenario::by_name(&name).unwrap_or_else(scenario::prograde_burn);
    if let Err(err) = scenario.engage() {
        eprintln!("{}: {}", scenario.name, err);
    }
    let log = sim::fly(&mut scenario.autopilot, &mut scenario.host, &FlightConfig::default());
    let summary = FlightSummary::from_log(scenario.name, &log);

    let app = FlightViz {
        records: log.records,
        summary,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Vessel Autopilot", options, Box::new(|_| Ok(Box::new(app))))
}

struct FlightViz {
    records: Vec<TickRecord>,
    summary: FlightSummary,
}

fn series(records: &[&TickRecord], value: impl Fn(&TickRecord) -> f64) -> Vec<[f64; 2]> {
    records.iter().map(|r| [r.time, value(r)]).collect()
}

impl eframe::App for FlightViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.records.len() / 2000).max(1);
        let sampled: Vec<&TickRecord> = self.records.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Scenario: {}", self.summary.scenario));
            ui.label(format!(
                "Burn start: {}  |  Residual: {}  |  Propellant: {:.1} kg  |  Flight: {:.0} s",
                self.summary.burn_start_s.map_or("-".into(), |t| format!("{:.1} s", t)),
                self.summary.residual_dv.map_or("-".into(), |r| format!("{:.3} m/s", r)),
                self.summary.propellant_used_kg,
                self.summary.duration_s,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Throttle");
                    let points: PlotPoints = series(&sampled, |r| r.throttle).into();
                    Plot::new("throttle")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Throttle", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Attitude Error (deg)");
                    let points: PlotPoints = series(&sampled, |r| r.attitude_error_deg).into();
                    Plot::new("attitude_error")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Error", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Remaining Delta-v (m/s)");
                    let points: PlotPoints = series(&sampled, |r| r.remaining_dv).into();
                    Plot::new("remaining_dv")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Remaining", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Mass (kg)");
                    let points: PlotPoints = series(&sampled, |r| r.mass).into();
                    Plot::new("mass")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Mass", points));
                        });
                });
            });
        });
    }
}
