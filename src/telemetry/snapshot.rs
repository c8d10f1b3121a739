use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Orbit chain
// ---------------------------------------------------------------------------

/// One conic patch of an orbit hierarchy: the vessel's orbit, the orbit of
/// the body it circles, and so on up to the star.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPatch {
    pub reference_body: String,
    pub normal: Vector3<f64>, // orbit normal, world frame
    pub orbits_star: bool,    // reference body is the star
}

impl OrbitPatch {
    pub fn new(reference_body: impl Into<String>, normal: Vector3<f64>, orbits_star: bool) -> Self {
        Self {
            reference_body: reference_body.into(),
            normal,
            orbits_star,
        }
    }
}

// ---------------------------------------------------------------------------
// Current stage propulsion aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageAggregate {
    pub thrust: f64, // N, currently available
    pub isp: f64,    // s
}

// ---------------------------------------------------------------------------
// Per-tick telemetry snapshot
// ---------------------------------------------------------------------------

/// Vessel kinematic state for one simulation tick.
///
/// Frame: world/inertial. The vessel attitude maps body axes to world axes
/// with body +Z along the thrust axis and body +Y toward the vessel's top.
#[derive(Debug, Clone)]
pub struct Telemetry {
    pub time: f64,      // universal time, s
    pub dt: f64,        // fixed step, s
    pub warp_rate: f64, // time acceleration factor, 1.0 = realtime
    pub position: Vector3<f64>,
    pub orbital_velocity: Vector3<f64>,
    pub surface_velocity: Vector3<f64>,
    pub up: Vector3<f64>,    // radial out from the reference body
    pub north: Vector3<f64>, // compass north on the local horizon
    pub attitude: UnitQuaternion<f64>,
    pub mass: f64, // kg
    /// `None` until the host has finished aggregating the current stage.
    pub stage: Option<StageAggregate>,
    pub orbit: OrbitPatch,
    /// Parent orbits, innermost first.
    pub ancestors: Vec<OrbitPatch>,
    pub star_position: Vector3<f64>,
}

impl Telemetry {
    /// Thrust axis in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        self.attitude * Vector3::z()
    }

    /// Vessel top axis in world frame.
    pub fn top(&self) -> Vector3<f64> {
        self.attitude * Vector3::y()
    }

    /// First orbit in the chain whose reference body is the star.
    ///
    /// Falls back to the outermost known orbit if the chain never reaches
    /// the star.
    pub fn solar_orbit(&self) -> &OrbitPatch {
        std::iter::once(&self.orbit)
            .chain(self.ancestors.iter())
            .find(|patch| patch.orbits_star)
            .or_else(|| self.ancestors.last())
            .unwrap_or(&self.orbit)
    }
}
