//! Frame snapshot: the complete visible state handed to the host after each tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::SimTime;

/// Everything a renderer or replication layer needs after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Live boids only, ordered by (set, index).
    pub boids: Vec<BoidView>,
    pub ships: Vec<ShipView>,
    pub missiles: Vec<MissileView>,
    pub flock: FlockView,
    pub match_clock: i32,
    pub events: Vec<GameEvent>,
}

/// A live boid's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoidView {
    pub set: usize,
    pub index: usize,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub ship_id: u32,
    pub client_id: Option<u32>,
    pub position: Vec3,
    pub rotation: Quat,
    pub score: u32,
    pub health: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub owner_ship: u32,
    pub position: Vec3,
    pub active: bool,
    pub frames: u32,
}

/// Flock population and scheduler state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlockView {
    pub set_count: usize,
    pub total_slots: usize,
    pub live: usize,
    /// Half the scheduler will update on the next tick.
    pub next_half: UpdateHalf,
}
