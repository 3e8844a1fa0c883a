//! Events emitted by the simulation for presentation and networking.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::MatchEndReason;

/// Something the host should react to (particles, UI text, remote events).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    MatchStarted,
    MatchOver { reason: MatchEndReason },
    /// Tell a client which ship it controls.
    ObjectAuthority { client_id: u32, ship_id: u32 },
    MissileFired { ship_id: u32 },
    MissileExpired { ship_id: u32 },
    /// A missile destroyed a boid; `position` is where the burst plays.
    BoidDestroyed {
        ship_id: u32,
        set: usize,
        boid: usize,
        position: Vec3,
    },
    /// A boid struck a ship.
    ShipStruck { ship_id: u32, health: i32 },
    ClockTick { remaining: i32 },
}
