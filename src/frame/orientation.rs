use nalgebra::{UnitQuaternion, Vector3};

const MIN_NORM: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Orthonormal forward/up pair
// ---------------------------------------------------------------------------

/// Normalize `forward`, then make `up` a unit vector perpendicular to it.
///
/// Returns `None` only when `forward` has no direction. An `up` hint that is
/// zero or parallel to `forward` is replaced by an arbitrary perpendicular.
pub fn orthonormalize(
    forward: &Vector3<f64>,
    up: &Vector3<f64>,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let forward = forward.try_normalize(MIN_NORM)?;
    let up = (up - forward * forward.dot(up))
        .try_normalize(MIN_NORM)
        .unwrap_or_else(|| any_perpendicular(&forward));
    Some((forward, up))
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let axis = if v.y.abs() < 0.9 { Vector3::y() } else { Vector3::x() };
    let w = axis - v * v.dot(&axis);
    w.normalize()
}

/// Orientation basis: body +Z maps to `forward`, body +Y maps to `up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    pub forward: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl ReferenceFrame {
    pub fn identity() -> Self {
        Self {
            forward: Vector3::z(),
            up: Vector3::y(),
        }
    }

    /// Build a frame from a forward direction and an up hint.
    pub fn new(forward: &Vector3<f64>, up: &Vector3<f64>) -> Option<Self> {
        orthonormalize(forward, up).map(|(forward, up)| Self { forward, up })
    }

    /// Body-to-world rotation of this frame.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::face_towards(&self.forward, &self.up)
    }

    /// Body +X in world frame. Points to the left of `forward` seen with `up` overhead.
    pub fn left(&self) -> Vector3<f64> {
        self.up.cross(&self.forward)
    }
}

// ---------------------------------------------------------------------------
// Fixed heading / pitch / roll offset
// ---------------------------------------------------------------------------

/// Offset from a reference frame, degrees.
///
/// Heading turns right about the frame's up axis, pitch raises the nose
/// toward up, roll rotates clockwise about the resulting forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hpr {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Hpr {
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self { heading, pitch, roll }
    }

    /// Rotation of the offset, expressed in the reference frame's body axes.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -self.heading.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -self.pitch.to_radians())
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.roll.to_radians())
    }
}

// ---------------------------------------------------------------------------
// Orientation request
// ---------------------------------------------------------------------------

/// What to hold relative to the resolved reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationRequest {
    /// Point along the frame's forward axis; roll is left where the vessel has it.
    Free,
    /// Hold a fixed heading/pitch/roll offset from the frame.
    Locked(Hpr),
}

impl OrientationRequest {
    pub fn locks_orientation(&self) -> bool {
        matches!(self, OrientationRequest::Locked(_))
    }

    /// Offset held relative to the frame; zero for [`OrientationRequest::Free`].
    pub fn hpr(&self) -> Hpr {
        match self {
            OrientationRequest::Free => Hpr::default(),
            OrientationRequest::Locked(hpr) => *hpr,
        }
    }

    /// Desired world orientation given the resolved frame and the vessel's
    /// current top axis.
    pub fn desired(&self, frame: &ReferenceFrame, vessel_top: &Vector3<f64>) -> UnitQuaternion<f64> {
        match self {
            OrientationRequest::Locked(hpr) => frame.rotation() * hpr.rotation(),
            OrientationRequest::Free => ReferenceFrame::new(&frame.forward, vessel_top)
                .unwrap_or(*frame)
                .rotation(),
        }
    }
}
