//! ECS components for hecs entities (ships and missiles).
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in systems, not components. Boids are not entities:
//! they live in the flock's fixed pools.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Linear velocity (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec3);

/// Latest control state received for a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    /// Mouse-look yaw in degrees.
    pub yaw: f32,
    /// Mouse-look pitch in degrees (clamped when applied).
    pub pitch: f32,
}

/// A player-controlled ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub ship_id: u32,
    /// Remote client that has authority over this ship, `None` for the local player.
    pub client_id: Option<u32>,
    pub score: u32,
    pub health: i32,
    pub controls: Controls,
}

/// The single missile each ship owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub owner_ship: u32,
    pub active: bool,
    /// Frames spent active since launch.
    pub frames: u32,
    /// Position at the start of the current frame, for swept contact tests.
    pub previous_position: Vec3,
}
