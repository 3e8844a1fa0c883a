//! Missile lifecycle system.
//!
//! Each ship owns one missile. An inactive missile rides at the ship's
//! muzzle until the ship shoots; an active one flies straight and parks
//! again after its lifetime runs out.

use std::collections::HashMap;

use glam::Vec3;
use hecs::World;

use skyswarm_core::components::{Missile, Ship, Transform, Velocity};
use skyswarm_core::config::CombatConfig;
use skyswarm_core::events::GameEvent;

use crate::world_setup::muzzle_position;

/// Launch, fly, expire or park every missile.
pub fn run(world: &mut World, combat: &CombatConfig, dt: f32, events: &mut Vec<GameEvent>) {
    let ships: HashMap<u32, (Transform, bool)> = world
        .query::<(&Ship, &Transform)>()
        .iter()
        .map(|(_, (ship, transform))| (ship.ship_id, (*transform, ship.controls.shoot)))
        .collect();

    for (_entity, (missile, transform, velocity)) in
        world.query_mut::<(&mut Missile, &mut Transform, &mut Velocity)>()
    {
        let Some(&(ship, shoot)) = ships.get(&missile.owner_ship) else {
            continue;
        };

        if missile.active {
            missile.previous_position = transform.position;
            transform.position += velocity.0 * dt;
            missile.frames += 1;
            if missile.frames >= combat.missile_lifetime_frames {
                park(missile, transform, velocity, &ship);
                events.push(GameEvent::MissileExpired {
                    ship_id: missile.owner_ship,
                });
            }
        } else if shoot {
            launch(missile, transform, velocity, &ship, combat.missile_speed);
            events.push(GameEvent::MissileFired {
                ship_id: missile.owner_ship,
            });
        } else {
            park(missile, transform, velocity, &ship);
        }
    }
}

/// Activate a missile at the muzzle, flying along the ship's heading.
pub fn launch(
    missile: &mut Missile,
    transform: &mut Transform,
    velocity: &mut Velocity,
    ship: &Transform,
    speed: f32,
) {
    let position = muzzle_position(ship);
    missile.active = true;
    missile.frames = 0;
    missile.previous_position = position;
    *transform = Transform {
        position,
        rotation: ship.rotation,
    };
    velocity.0 = ship.forward() * speed;
}

/// Deactivate a missile and bring it back to the ship's muzzle.
pub fn park(missile: &mut Missile, transform: &mut Transform, velocity: &mut Velocity, ship: &Transform) {
    let position = muzzle_position(ship);
    missile.active = false;
    missile.frames = 0;
    missile.previous_position = position;
    *transform = Transform {
        position,
        rotation: ship.rotation,
    };
    velocity.0 = Vec3::ZERO;
}
