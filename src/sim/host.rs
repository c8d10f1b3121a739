use nalgebra::{UnitQuaternion, Vector3};

use super::integrator::{point_mass_gravity, rk4_step, OrbitalState};
use crate::frame::ReferenceFrame;
use crate::host::{Actuator, HoldMode, ManeuverPlanProvider, TargetProvider, TelemetryProvider};
use crate::telemetry::{ManeuverNode, OrbitPatch, Target, TargetKind, Telemetry};
use crate::vehicle::Stage;

// ---------------------------------------------------------------------------
// Central body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub mu: f64,            // m^3/s^2
    pub radius: f64,        // m
    pub rotation_rate: f64, // rad/s about world +Z
    /// Normal of the body's own orbit around the star.
    pub orbit_normal: Vector3<f64>,
}

impl Body {
    /// Small rocky planet, 600 km radius.
    pub fn kerbin() -> Self {
        Self {
            name: "Kerbin".into(),
            mu: 3.5316e12,
            radius: 600_000.0,
            rotation_rate: 2.0 * std::f64::consts::PI / 21_549.425,
            orbit_normal: Vector3::z(),
        }
    }

    pub fn circular_speed(&self, radius: f64) -> f64 {
        (self.mu / radius).sqrt()
    }

    fn spin(&self) -> Vector3<f64> {
        Vector3::z() * self.rotation_rate
    }
}

// ---------------------------------------------------------------------------
// Planned maneuver and target as the host tracks them
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub scheduled_time: f64,
    pub planned: Vector3<f64>, // world frame, m/s
    pub applied: Vector3<f64>, // delta-v delivered by the engine so far
}

impl PlannedNode {
    pub fn new(scheduled_time: f64, planned: Vector3<f64>) -> Self {
        Self {
            scheduled_time,
            planned,
            applied: Vector3::zeros(),
        }
    }

    pub fn burn_vector(&self) -> Vector3<f64> {
        self.planned - self.applied
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimTarget {
    pub kind: TargetKind,
    pub state: OrbitalState,
    pub attitude: UnitQuaternion<f64>,
}

// ---------------------------------------------------------------------------
// Kinematic host
// ---------------------------------------------------------------------------

/// A vessel in a point-mass gravity field with an idealized attitude-hold
/// subsystem: the hull slews at a bounded rate toward whatever the current
/// hold mode asks for, and the engine thrusts along body +Z.
#[derive(Debug, Clone)]
pub struct KinematicHost {
    pub body: Body,
    pub state: OrbitalState,
    pub attitude: UnitQuaternion<f64>,
    pub slew_rate: f64, // rad/s
    pub stage: Stage,
    pub propellant: f64, // kg left in the stage
    /// Stage aggregates are withheld until this universal time.
    pub stage_ready_at: f64,
    pub warp_rate: f64,
    pub star_position: Vector3<f64>,
    pub node: Option<PlannedNode>,
    pub target: Option<SimTarget>,
    hold_enabled: bool,
    hold_mode: HoldMode,
    locked: UnitQuaternion<f64>,
    throttle: f64,
    dt: f64,
}

impl KinematicHost {
    /// Vessel in a circular equatorial orbit of the given altitude, nose
    /// along +Z of the world frame.
    pub fn circular(body: Body, altitude: f64, stage: Stage) -> Self {
        let r = body.radius + altitude;
        let state = OrbitalState {
            time: 0.0,
            pos: Vector3::new(r, 0.0, 0.0),
            vel: Vector3::new(0.0, body.circular_speed(r), 0.0),
        };
        let propellant = stage.propellant_mass;
        Self {
            body,
            state,
            attitude: UnitQuaternion::identity(),
            slew_rate: 20f64.to_radians(),
            stage,
            propellant,
            stage_ready_at: 0.0,
            warp_rate: 1.0,
            star_position: Vector3::new(-1.36e10, 0.0, 0.0),
            node: None,
            target: None,
            hold_enabled: false,
            hold_mode: HoldMode::StabilityAssist,
            locked: UnitQuaternion::identity(),
            throttle: 0.0,
            dt: 0.02,
        }
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn mass(&self) -> f64 {
        self.stage.dry_mass + self.propellant
    }

    pub fn forward(&self) -> Vector3<f64> {
        self.attitude * Vector3::z()
    }

    pub fn up(&self) -> Vector3<f64> {
        self.state.pos.try_normalize(1e-9).unwrap_or_else(Vector3::x)
    }

    pub fn surface_velocity(&self) -> Vector3<f64> {
        self.state.vel - self.body.spin().cross(&self.state.pos)
    }

    /// Schedule a burn `lead` seconds from now along the orbit's prograde
    /// direction.
    pub fn plan_prograde(&mut self, lead: f64, delta_v: f64) {
        let dir = self.state.vel.try_normalize(1e-9).unwrap_or_else(Vector3::y);
        self.node = Some(PlannedNode::new(self.time() + lead, dir * delta_v));
    }

    /// Place a vessel target `distance` metres ahead along the orbit.
    pub fn spawn_target_ahead(&mut self, distance: f64) {
        let dir = self.state.vel.try_normalize(1e-9).unwrap_or_else(Vector3::y);
        self.target = Some(SimTarget {
            kind: TargetKind::Vessel,
            state: OrbitalState {
                time: self.state.time,
                pos: self.state.pos + dir * distance,
                vel: self.state.vel,
            },
            attitude: UnitQuaternion::face_towards(&-dir, &self.up()),
        });
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Switch the hold subsystem off from the host side.
    pub fn disable_hold(&mut self) {
        self.hold_enabled = false;
    }

    /// Rotation the hull is currently slewing toward.
    pub fn goal_attitude(&self) -> UnitQuaternion<f64> {
        if !self.hold_enabled {
            return self.attitude;
        }
        let top = self.attitude * Vector3::y();
        let aim = match self.hold_mode {
            HoldMode::StabilityAssist => return self.locked,
            HoldMode::Maneuver => self.node.as_ref().map(PlannedNode::burn_vector),
            HoldMode::Target => self.target.as_ref().map(|t| t.state.pos - self.state.pos),
        };
        aim.and_then(|dir| ReferenceFrame::new(&dir, &top))
            .map_or(self.attitude, |frame| frame.rotation())
    }

    /// Pointing error against the current hold goal, degrees.
    pub fn attitude_error_deg(&self) -> f64 {
        self.attitude.angle_to(&self.goal_attitude()).to_degrees()
    }

    /// Advance the vessel by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.dt = dt;
        self.slew(dt);

        let thrust_accel = self.burn(dt);
        let mu = self.body.mu;
        let gravity = move |p: &Vector3<f64>| point_mass_gravity(mu, p);
        self.state = rk4_step(&self.state, dt, &thrust_accel, &gravity);
        if let Some(target) = self.target.as_mut() {
            target.state = rk4_step(&target.state, dt, &Vector3::zeros(), &gravity);
        }
    }

    fn slew(&mut self, dt: f64) {
        let goal = self.goal_attitude();
        let angle = self.attitude.angle_to(&goal);
        let max_step = self.slew_rate * dt;
        self.attitude = if angle <= max_step {
            goal
        } else {
            self.attitude
                .try_slerp(&goal, max_step / angle, 1e-9)
                .unwrap_or(goal)
        };
    }

    /// Consume propellant for this step and return the thrust acceleration.
    fn burn(&mut self, dt: f64) -> Vector3<f64> {
        if self.throttle <= 0.0 || self.propellant <= 0.0 {
            return Vector3::zeros();
        }
        let wanted = self.stage.mass_flow() * self.throttle * dt;
        let fraction = if wanted > 0.0 {
            (self.propellant / wanted).min(1.0)
        } else {
            0.0
        };
        let accel = self.forward() * self.stage.thrust * self.throttle * fraction / self.mass();
        self.propellant = (self.propellant - wanted).max(0.0);

        if let Some(node) = self.node.as_mut() {
            node.applied += accel * dt;
        }
        accel
    }

    fn north(&self) -> Vector3<f64> {
        let up = self.up();
        let axis = Vector3::z();
        (axis - up * axis.dot(&up))
            .try_normalize(1e-9)
            .unwrap_or_else(|| up.cross(&Vector3::y()).normalize())
    }

    fn orbit_normal(&self) -> Vector3<f64> {
        self.state
            .pos
            .cross(&self.state.vel)
            .try_normalize(1e-9)
            .unwrap_or_else(Vector3::z)
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

impl TelemetryProvider for KinematicHost {
    fn telemetry(&self) -> Telemetry {
        let stage = (self.state.time >= self.stage_ready_at && self.propellant > 0.0)
            .then(|| self.stage.aggregate());
        Telemetry {
            time: self.state.time,
            dt: self.dt,
            warp_rate: self.warp_rate,
            position: self.state.pos,
            orbital_velocity: self.state.vel,
            surface_velocity: self.surface_velocity(),
            up: self.up(),
            north: self.north(),
            attitude: self.attitude,
            mass: self.mass(),
            stage,
            orbit: OrbitPatch::new(self.body.name.clone(), self.orbit_normal(), false),
            ancestors: vec![OrbitPatch::new("Sun", self.body.orbit_normal, true)],
            star_position: self.star_position,
        }
    }
}

impl Actuator for KinematicHost {
    fn autopilot_enabled(&self) -> bool {
        self.hold_enabled
    }

    fn enable_hold(&mut self) {
        if !self.hold_enabled {
            self.locked = self.attitude;
        }
        self.hold_enabled = true;
    }

    fn hold_mode(&self) -> HoldMode {
        self.hold_mode
    }

    fn can_set_mode(&self, mode: HoldMode) -> bool {
        match mode {
            HoldMode::StabilityAssist => true,
            HoldMode::Target => self.target.is_some(),
            HoldMode::Maneuver => self.node.is_some(),
        }
    }

    fn set_hold_mode(&mut self, mode: HoldMode) {
        if mode == HoldMode::StabilityAssist && self.hold_mode != mode {
            self.locked = self.attitude;
        }
        self.hold_mode = mode;
    }

    fn locked_rotation(&self) -> UnitQuaternion<f64> {
        self.locked
    }

    fn lock_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.locked = rotation;
    }

    fn throttle(&self) -> f64 {
        self.throttle
    }

    fn set_throttle(&mut self, level: f64) {
        self.throttle = level.clamp(0.0, 1.0);
    }
}

impl ManeuverPlanProvider for KinematicHost {
    fn active_node(&self) -> Option<ManeuverNode> {
        self.node.as_ref().map(|n| ManeuverNode {
            scheduled_time: n.scheduled_time,
            planned_delta_v: n.planned,
            burn_vector: n.burn_vector(),
        })
    }

    fn remove_active_node(&mut self) {
        self.node = None;
    }
}

impl TargetProvider for KinematicHost {
    fn active_target(&self) -> Option<Target> {
        self.target.as_ref().map(|t| Target {
            kind: t.kind,
            position: t.state.pos,
            velocity: t.state.vel,
            forward: t.attitude * Vector3::z(),
            up: t.attitude * Vector3::y(),
            right: t.attitude * Vector3::x(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::StageBuilder;

    fn host() -> KinematicHost {
        KinematicHost::circular(Body::kerbin(), 100_000.0, StageBuilder::new("Tug").build())
    }

    #[test]
    fn locked_hold_slews_at_bounded_rate() {
        let mut h = host();
        h.enable_hold();
        let goal = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 1.0);
        h.lock_rotation(goal);
        h.step(0.1);
        let moved = UnitQuaternion::identity().angle_to(&h.attitude);
        assert!((moved - h.slew_rate * 0.1).abs() < 1e-9, "moved {}", moved);
        for _ in 0..100 {
            h.step(0.1);
        }
        assert!(h.attitude.angle_to(&goal) < 1e-9);
    }

    #[test]
    fn disabled_hold_does_not_rotate() {
        let mut h = host();
        h.lock_rotation(UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 1.0));
        h.step(0.1);
        assert_eq!(h.attitude, UnitQuaternion::identity());
    }

    #[test]
    fn burn_shrinks_node_vector() {
        let mut h = host();
        h.node = Some(PlannedNode::new(0.0, Vector3::z() * 50.0));
        h.set_throttle(1.0);
        let mass0 = h.mass();
        h.step(0.5);
        let node = h.active_node().unwrap();
        assert!(node.remaining() < 50.0);
        assert!((node.delta_v() - 50.0).abs() < 1e-12);
        assert!(h.mass() < mass0);
    }

    #[test]
    fn empty_tank_no_thrust_no_aggregate() {
        let mut h = host();
        h.propellant = 0.0;
        h.set_throttle(1.0);
        h.node = Some(PlannedNode::new(0.0, Vector3::z() * 50.0));
        h.step(1.0);
        assert_eq!(h.active_node().unwrap().remaining(), 50.0);
        assert!(h.telemetry().stage.is_none());
    }

    #[test]
    fn stage_withheld_until_ready() {
        let mut h = host();
        h.stage_ready_at = 1.0;
        assert!(h.telemetry().stage.is_none());
        h.step(1.0);
        assert!(h.telemetry().stage.is_some());
    }

    #[test]
    fn telemetry_frame_is_consistent() {
        let h = host();
        let t = h.telemetry();
        assert!((t.up.norm() - 1.0).abs() < 1e-12);
        assert!((t.north.norm() - 1.0).abs() < 1e-12);
        assert!(t.up.dot(&t.north).abs() < 1e-12);
        assert!((t.orbit.normal - Vector3::z()).norm() < 1e-12);
        assert!(t.surface_velocity.norm() < t.orbital_velocity.norm());
    }

    #[test]
    fn native_modes_need_their_object() {
        let mut h = host();
        assert!(!h.can_set_mode(HoldMode::Target));
        assert!(!h.can_set_mode(HoldMode::Maneuver));
        h.spawn_target_ahead(2_000.0);
        h.plan_prograde(60.0, 100.0);
        assert!(h.can_set_mode(HoldMode::Target));
        assert!(h.can_set_mode(HoldMode::Maneuver));
    }
}
