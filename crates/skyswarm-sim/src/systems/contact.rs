//! Contact system: the bridge between ships, missiles and the flock.
//!
//! Runs after the flock has advanced for the tick, so boid positions are
//! stable while contacts are resolved.
//! - Missile vs boid: swept along the missile's path this frame (a missile
//!   covers several hit radii per frame), first boid in (set, index) order.
//! - Ship vs boid: damage on the first tick of each contact only.

use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use skyswarm_core::components::{Missile, Ship, Transform, Velocity};
use skyswarm_core::config::CombatConfig;
use skyswarm_core::error::FlockError;
use skyswarm_core::events::GameEvent;
use skyswarm_flock::Flock;

use crate::session::ContactState;
use crate::systems::missile;

/// Resolve active missiles against live boids.
pub fn missile_hits(
    world: &mut World,
    flock: &mut Flock,
    rng: &mut ChaCha8Rng,
    combat: &CombatConfig,
    events: &mut Vec<GameEvent>,
) {
    let flying: Vec<(Entity, u32, Vec3, Vec3)> = world
        .query::<(&Missile, &Transform)>()
        .iter()
        .filter(|(_, (missile, _))| missile.active)
        .map(|(entity, (missile, transform))| {
            (
                entity,
                missile.owner_ship,
                missile.previous_position,
                transform.position,
            )
        })
        .collect();

    // A boid respawned this frame keeps its indices; don't let a second
    // missile claim it again.
    let mut struck: HashSet<(usize, usize)> = HashSet::new();

    for (entity, owner, from, to) in flying {
        let Some((set, boid)) =
            first_boid_on_path(flock, from, to, combat.missile_hit_radius, &struck)
        else {
            continue;
        };
        struck.insert((set, boid));

        match apply_hit(world, flock, rng, owner, set, boid, events) {
            Ok(true) => park_missile(world, entity, owner),
            Ok(false) => {}
            Err(err) => warn!(%err, owner, set, boid, "missile hit rejected"),
        }
    }
}

/// Return `entity` to its owner's muzzle after a scoring hit.
fn park_missile(world: &mut World, entity: Entity, owner: u32) {
    let Some(ship) = ship_transform(world, owner) else {
        return;
    };
    if let Ok((m, transform, velocity)) =
        world.query_one_mut::<(&mut Missile, &mut Transform, &mut Velocity)>(entity)
    {
        missile::park(m, transform, velocity, &ship);
    }
}

/// Park the active missile owned by `ship_id`, if it has one in flight.
pub fn park_missile_of(world: &mut World, ship_id: u32) {
    let flying = world
        .query::<&Missile>()
        .iter()
        .find(|(_, missile)| missile.owner_ship == ship_id && missile.active)
        .map(|(entity, _)| entity);
    if let Some(entity) = flying {
        park_missile(world, entity, ship_id);
    }
}

/// Report a confirmed hit to the flock and credit `ship_id` if the boid was alive.
/// Returns whether the hit counted.
pub fn apply_hit(
    world: &mut World,
    flock: &mut Flock,
    rng: &mut ChaCha8Rng,
    ship_id: u32,
    set: usize,
    boid: usize,
    events: &mut Vec<GameEvent>,
) -> Result<bool, FlockError> {
    let outcome = flock.notify_hit(set, boid, rng)?;
    if !outcome.was_alive {
        return Ok(false);
    }

    for (_entity, ship) in world.query_mut::<&mut Ship>() {
        if ship.ship_id == ship_id {
            ship.score += 1;
        }
    }
    debug!(ship_id, set, boid, respawned = outcome.respawned_at.is_some(), "boid destroyed");
    events.push(GameEvent::BoidDestroyed {
        ship_id,
        set,
        boid,
        position: outcome.position,
    });
    Ok(true)
}

/// Damage the local ship for every boid contact that began this tick.
///
/// Client ships are positioned by their owners and take no contact damage.
pub fn ship_contacts(
    world: &mut World,
    flock: &Flock,
    combat: &CombatConfig,
    contacts: &mut ContactState,
    events: &mut Vec<GameEvent>,
) {
    let mut touching = HashSet::new();

    for (_entity, (ship, transform)) in world.query_mut::<(&mut Ship, &Transform)>() {
        if ship.client_id.is_some() {
            continue;
        }
        for set in flock.sets() {
            for (index, boid) in set.boids().iter().enumerate() {
                if !boid.alive || boid.position.distance(transform.position) > combat.ship_hit_radius {
                    continue;
                }
                let key = (ship.ship_id, set.index(), index);
                if !contacts.touching.contains(&key) {
                    ship.health -= combat.contact_damage;
                    debug!(ship_id = ship.ship_id, health = ship.health, "ship struck by boid");
                    events.push(GameEvent::ShipStruck {
                        ship_id: ship.ship_id,
                        health: ship.health,
                    });
                }
                touching.insert(key);
            }
        }
    }

    contacts.touching = touching;
}

/// First live boid within `radius` of the segment `from..to`, skipping `exclude`.
pub fn first_boid_on_path(
    flock: &Flock,
    from: Vec3,
    to: Vec3,
    radius: f32,
    exclude: &HashSet<(usize, usize)>,
) -> Option<(usize, usize)> {
    flock.sets().iter().find_map(|set| {
        set.boids()
            .iter()
            .enumerate()
            .find(|(index, boid)| {
                boid.alive
                    && !exclude.contains(&(set.index(), *index))
                    && distance_to_segment(boid.position, from, to) <= radius
            })
            .map(|(index, _)| (set.index(), index))
    })
}

/// Shortest distance from `point` to the segment `a..b`.
pub fn distance_to_segment(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

pub fn ship_transform(world: &World, ship_id: u32) -> Option<Transform> {
    world
        .query::<(&Ship, &Transform)>()
        .iter()
        .find(|(_, (ship, _))| ship.ship_id == ship_id)
        .map(|(_, (_, transform))| *transform)
}
