use tracing::debug;

use crate::config::PlannerConfig;
use crate::telemetry::{ManeuverNode, Telemetry};

// ---------------------------------------------------------------------------
// Burn time from the rocket equation
// ---------------------------------------------------------------------------

/// Time to impart `delta_v` at constant thrust while mass drops.
///
/// burn_time = Isp * (1 - exp(-dv / (Isp * g0))) / (F / (m * g0))
///
/// Returns `None` when thrust, Isp or mass are not positive.
pub fn burn_time(delta_v: f64, thrust: f64, isp: f64, mass: f64, g0: f64) -> Option<f64> {
    if thrust <= 0.0 || isp <= 0.0 || mass <= 0.0 {
        return None;
    }
    let fraction_burned = 1.0 - (-delta_v.max(0.0) / (isp * g0)).exp();
    Some(isp * fraction_burned / (thrust / (mass * g0)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnEstimate {
    pub burn_time: f64,  // s
    pub start_time: f64, // universal time, s
}

// ---------------------------------------------------------------------------
// Burn planner: rate-limited start time estimate
// ---------------------------------------------------------------------------

/// Keeps the burn start time centered on the node, refreshing the estimate
/// at most once per `refresh_interval` (scaled by time acceleration) since
/// stage aggregates are expensive for the host to produce.
#[derive(Debug, Clone)]
pub struct BurnPlanner {
    config: PlannerConfig,
    start_time: f64,
    last_computed: Option<f64>,
    last_estimate: Option<BurnEstimate>,
}

impl BurnPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            start_time: 0.0,
            last_computed: None,
            last_estimate: None,
        }
    }

    /// Start over for a new coast: assume an impulsive burn at the node
    /// until a real estimate is available.
    pub fn reset(&mut self, node_time: f64) {
        self.start_time = node_time;
        self.last_computed = None;
        self.last_estimate = None;
    }

    /// Current best burn start time.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn last_computed(&self) -> Option<f64> {
        self.last_computed
    }

    pub fn last_estimate(&self) -> Option<BurnEstimate> {
        self.last_estimate
    }

    /// Estimate centered on the node from explicit stage figures.
    pub fn estimate(&self, node: &ManeuverNode, thrust: f64, isp: f64, mass: f64) -> Option<BurnEstimate> {
        let burn_time = burn_time(node.delta_v(), thrust, isp, mass, self.config.standard_gravity)?;
        Some(BurnEstimate {
            burn_time,
            start_time: node.scheduled_time - 0.5 * burn_time,
        })
    }

    pub fn is_due(&self, now: f64, warp_rate: f64) -> bool {
        match self.last_computed {
            None => true,
            Some(last) => now - last > self.config.refresh_interval * warp_rate,
        }
    }

    /// Refresh the estimate if due and the stage data is ready.
    ///
    /// Returns the new estimate when one was computed; otherwise the previous
    /// start time is kept.
    pub fn update(&mut self, node: &ManeuverNode, telemetry: &Telemetry) -> Option<BurnEstimate> {
        if !self.is_due(telemetry.time, telemetry.warp_rate) {
            return None;
        }
        let Some(stage) = telemetry.stage else {
            debug!(time = telemetry.time, "stage aggregate not ready, keeping burn start");
            return None;
        };
        let estimate = self.estimate(node, stage.thrust, stage.isp, telemetry.mass)?;

        self.start_time = estimate.start_time;
        self.last_computed = Some(telemetry.time);
        self.last_estimate = Some(estimate);
        debug!(
            burn_time = estimate.burn_time,
            start_time = estimate.start_time,
            "burn estimate refreshed"
        );
        Some(estimate)
    }
}
