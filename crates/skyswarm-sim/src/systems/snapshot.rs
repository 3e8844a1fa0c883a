//! Snapshot system: reads the flock and the ECS world and builds a FrameSnapshot.
//!
//! This system is read-only. It never modifies the world or the flock.

use hecs::World;

use skyswarm_core::components::{Missile, Ship, Transform};
use skyswarm_core::enums::GamePhase;
use skyswarm_core::events::GameEvent;
use skyswarm_core::state::*;
use skyswarm_core::types::SimTime;
use skyswarm_flock::Flock;

/// Build a complete FrameSnapshot from the current state.
pub fn build_snapshot(
    world: &World,
    flock: &Flock,
    time: &SimTime,
    phase: GamePhase,
    match_clock: i32,
    events: Vec<GameEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time: *time,
        phase,
        boids: flock.boid_views(),
        ships: build_ships(world),
        missiles: build_missiles(world),
        flock: flock.view(),
        match_clock,
        events,
    }
}

/// Ships sorted by id, so snapshot order does not depend on archetype layout.
fn build_ships(world: &World) -> Vec<ShipView> {
    let mut ships: Vec<ShipView> = world
        .query::<(&Ship, &Transform)>()
        .iter()
        .map(|(_, (ship, transform))| ShipView {
            ship_id: ship.ship_id,
            client_id: ship.client_id,
            position: transform.position,
            rotation: transform.rotation,
            score: ship.score,
            health: ship.health,
        })
        .collect();
    ships.sort_by_key(|s| s.ship_id);
    ships
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&Missile, &Transform)>()
        .iter()
        .map(|(_, (missile, transform))| MissileView {
            owner_ship: missile.owner_ship,
            position: transform.position,
            active: missile.active,
            frames: missile.frames,
        })
        .collect();
    missiles.sort_by_key(|m| m.owner_ship);
    missiles
}
