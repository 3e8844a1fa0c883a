//! Entity spawn factories for ships and their missiles.
//!
//! Every ship is spawned together with the one missile it owns. The missile
//! starts parked at the ship's muzzle.

use hecs::{Entity, World};

use skyswarm_core::components::*;
use skyswarm_core::config::CombatConfig;
use skyswarm_core::constants::MISSILE_MUZZLE_OFFSET;

/// Where a parked or freshly launched missile sits relative to its ship.
pub fn muzzle_position(ship: &Transform) -> glam::Vec3 {
    ship.position + ship.forward() * MISSILE_MUZZLE_OFFSET
}

/// Spawn a ship at the configured spawn point, plus its missile.
/// Returns the ship entity.
pub fn spawn_ship(
    world: &mut World,
    ship_id: u32,
    client_id: Option<u32>,
    combat: &CombatConfig,
) -> Entity {
    let transform = Transform::at(combat.ship_spawn);
    let ship = world.spawn((
        Ship {
            ship_id,
            client_id,
            score: 0,
            health: combat.ship_start_health,
            controls: Controls::default(),
        },
        transform,
    ));
    spawn_missile(world, ship_id, &transform);
    ship
}

/// Spawn an inactive missile parked at `ship`'s muzzle.
pub fn spawn_missile(world: &mut World, owner_ship: u32, ship: &Transform) -> Entity {
    let position = muzzle_position(ship);
    world.spawn((
        Missile {
            owner_ship,
            active: false,
            frames: 0,
            previous_position: position,
        },
        Transform {
            position,
            rotation: ship.rotation,
        },
        Velocity::default(),
    ))
}

/// Remove a ship and its missile. Returns false if no ship has that id.
pub fn despawn_ship(world: &mut World, ship_id: u32) -> bool {
    let mut doomed: Vec<Entity> = world
        .query::<&Missile>()
        .iter()
        .filter(|(_, missile)| missile.owner_ship == ship_id)
        .map(|(entity, _)| entity)
        .collect();
    let ship = world
        .query::<&Ship>()
        .iter()
        .find(|(_, ship)| ship.ship_id == ship_id)
        .map(|(entity, _)| entity);

    let Some(ship) = ship else {
        return false;
    };
    doomed.push(ship);
    for entity in doomed {
        let _ = world.despawn(entity);
    }
    true
}

/// Ship id controlled by `client_id`, if it has one.
pub fn ship_for_client(world: &World, client_id: u32) -> Option<u32> {
    world
        .query::<&Ship>()
        .iter()
        .find(|(_, ship)| ship.client_id == Some(client_id))
        .map(|(_, ship)| ship.ship_id)
}

/// Put every ship back at the spawn point with full health and no score,
/// and park every missile.
pub fn reset_ships(world: &mut World, combat: &CombatConfig) {
    let spawn = Transform::at(combat.ship_spawn);
    for (_entity, (ship, transform)) in world.query_mut::<(&mut Ship, &mut Transform)>() {
        ship.score = 0;
        ship.health = combat.ship_start_health;
        ship.controls = Controls::default();
        *transform = spawn;
    }

    let parked = muzzle_position(&spawn);
    for (_entity, (missile, transform, velocity)) in
        world.query_mut::<(&mut Missile, &mut Transform, &mut Velocity)>()
    {
        missile.active = false;
        missile.frames = 0;
        missile.previous_position = parked;
        transform.position = parked;
        transform.rotation = spawn.rotation;
        velocity.0 = glam::Vec3::ZERO;
    }
}
