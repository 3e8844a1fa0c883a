//! Fundamental geometric and simulation types.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world space (engine units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active ticks simulated so far.
    pub tick: u64,
    /// Elapsed simulation time in seconds (sum of all deltas).
    pub elapsed_secs: f64,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` extending `half_extents` along each axis.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box pulled in by `margin` on every face. Axes thinner than twice the
    /// margin collapse onto the center.
    pub fn shrunk(&self, margin: f32) -> Self {
        let center = self.center();
        Self {
            min: (self.min + Vec3::splat(margin)).min(center),
            max: (self.max - Vec3::splat(margin)).max(center),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// True when every component is finite and `min <= max` on each axis.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Orientation facing along `heading`, with +Z as the model's forward axis.
/// A zero heading yields the identity rotation.
pub fn orientation_from_heading(heading: Vec3) -> Quat {
    match heading.try_normalize() {
        Some(dir) => Quat::from_rotation_arc(Vec3::Z, dir),
        None => Quat::IDENTITY,
    }
}

/// Ship rotation from mouse-look angles in degrees (yaw about Y, then pitch about X).
pub fn orientation_from_yaw_pitch(yaw_deg: f32, pitch_deg: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw_deg.to_radians(),
        pitch_deg.to_radians(),
        0.0,
    )
}
