//! The simulation context: every boid set plus the scheduler that drives them.
//!
//! Hosts call [`Flock::advance`] once per frame and read positions back through
//! [`Flock::boid_views`]. Collision handling goes through [`Flock::notify_hit`]
//! between advances, never during one.

use std::ops::Range;

use glam::Vec3;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use skyswarm_core::config::{FlockConfig, SteeringParams};
use skyswarm_core::enums::HitPolicy;
use skyswarm_core::error::FlockError;
use skyswarm_core::state::{BoidView, FlockView};

use crate::boid::Bounds;
use crate::boid_set::BoidSet;
use crate::scheduler::FlockScheduler;

/// Result of reporting a hit on a boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// False if the boid was already inactive; callers must not score it.
    pub was_alive: bool,
    /// Where the boid was when it was hit.
    pub position: Vec3,
    /// New position when the hit policy respawned it.
    pub respawned_at: Option<Vec3>,
}

/// Ordered boid sets, their scheduler, and shared steering parameters.
#[derive(Debug, Clone)]
pub struct Flock {
    sets: Vec<BoidSet>,
    scheduler: FlockScheduler,
    params: SteeringParams,
    hit_policy: HitPolicy,
}

impl Flock {
    /// Validate `config` and populate every set from `rng`.
    pub fn new(config: &FlockConfig, rng: &mut ChaCha8Rng) -> Result<Self, FlockError> {
        config.validate()?;

        let bounds = Bounds::new(config.bounds, config.edge);
        let sets = (0..config.set_count)
            .map(|index| {
                BoidSet::new(
                    index,
                    config.boids_per_set,
                    config.spawn,
                    bounds,
                    &config.steering,
                    rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sets,
            scheduler: FlockScheduler::new(config.set_count, config.odd_split)?,
            params: config.steering,
            hit_policy: config.hit_policy,
        })
    }

    /// Assemble a flock from prepared sets (scenario setup and tests).
    pub fn from_sets(
        sets: Vec<BoidSet>,
        scheduler: FlockScheduler,
        params: SteeringParams,
        hit_policy: HitPolicy,
    ) -> Self {
        Self {
            sets,
            scheduler,
            params,
            hit_policy,
        }
    }

    /// One host frame: the scheduler updates its selected half.
    pub fn advance(&mut self, dt: f32) -> Range<usize> {
        self.scheduler.tick(&mut self.sets, dt, &self.params)
    }

    pub fn sets(&self) -> &[BoidSet] {
        &self.sets
    }

    pub fn set(&self, set: usize) -> Result<&BoidSet, FlockError> {
        let count = self.sets.len();
        self.sets
            .get(set)
            .ok_or(FlockError::SetIndexOutOfRange { set, count })
    }

    pub fn set_mut(&mut self, set: usize) -> Result<&mut BoidSet, FlockError> {
        let count = self.sets.len();
        self.sets
            .get_mut(set)
            .ok_or(FlockError::SetIndexOutOfRange { set, count })
    }

    pub fn scheduler(&self) -> &FlockScheduler {
        &self.scheduler
    }

    pub fn params(&self) -> &SteeringParams {
        &self.params
    }

    /// Slots across all sets. Constant for the flock's lifetime.
    pub fn total_slots(&self) -> usize {
        self.sets.iter().map(BoidSet::capacity).sum()
    }

    pub fn live_count(&self) -> usize {
        self.sets.iter().map(BoidSet::live_count).sum()
    }

    pub fn deactivate(&mut self, set: usize, boid: usize) -> Result<bool, FlockError> {
        self.set_mut(set)?.deactivate(boid)
    }

    pub fn respawn(
        &mut self,
        set: usize,
        boid: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec3, FlockError> {
        let params = self.params;
        self.set_mut(set)?.respawn(boid, &params, rng)
    }

    /// Bring every inactive slot back into its set's spawn region.
    /// Returns how many boids were revived.
    pub fn respawn_inactive(&mut self, rng: &mut ChaCha8Rng) -> usize {
        let params = self.params;
        let mut revived = 0;
        for set in &mut self.sets {
            for index in 0..set.capacity() {
                if set.boids()[index].alive {
                    continue;
                }
                if set.respawn(index, &params, rng).is_ok() {
                    revived += 1;
                }
            }
        }
        if revived > 0 {
            debug!(revived, "inactive boids respawned");
        }
        revived
    }

    /// Apply a confirmed hit according to the configured [`HitPolicy`].
    ///
    /// Hitting an inactive boid changes nothing and reports `was_alive = false`.
    pub fn notify_hit(
        &mut self,
        set: usize,
        boid: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<HitOutcome, FlockError> {
        let position = self.set(set)?.boids().get(boid).map(|b| b.position);
        let was_alive = self.deactivate(set, boid)?;
        // deactivate() validated the index, so the position is present.
        let position = position.unwrap_or_default();

        let respawned_at = match (was_alive, self.hit_policy) {
            (true, HitPolicy::Respawn) => Some(self.respawn(set, boid, rng)?),
            _ => None,
        };

        Ok(HitOutcome {
            was_alive,
            position,
            respawned_at,
        })
    }

    /// Move one live boid's state into the first free slot of another set.
    /// Returns the destination slot. Slot and live totals are unchanged.
    pub fn transfer(&mut self, from: usize, boid: usize, to: usize) -> Result<usize, FlockError> {
        if from == to {
            return Err(FlockError::SameSet { set: from });
        }
        let state = {
            let source = self.set(from)?;
            let capacity = source.capacity();
            *source
                .boid(boid)
                .ok_or(FlockError::BoidIndexOutOfRange {
                    set: from,
                    boid,
                    capacity,
                })?
        };
        if !state.alive {
            return Err(FlockError::InactiveBoid { set: from, boid });
        }

        let destination = self.set_mut(to)?;
        let slot = destination
            .first_free_slot()
            .ok_or(FlockError::NoFreeSlot { set: to })?;
        destination.activate_at(slot, state.position, state.velocity)?;
        self.set_mut(from)?.deactivate(boid)?;

        debug!(from, boid, to, slot, "boid transferred");
        Ok(slot)
    }

    /// Split stragglers off `from`: every live boid farther than `max_radius`
    /// from the set's centroid moves to `to`, in population order, until `to`
    /// runs out of free slots. Returns how many moved.
    pub fn rebalance(&mut self, from: usize, to: usize, max_radius: f32) -> Result<usize, FlockError> {
        if from == to {
            return Err(FlockError::SameSet { set: from });
        }
        self.set(to)?;
        let source = self.set(from)?;
        let Some(centroid) = source.centroid() else {
            return Ok(0);
        };

        let stragglers: Vec<usize> = source
            .boids()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive && b.position.distance(centroid) > max_radius)
            .map(|(i, _)| i)
            .collect();

        let mut moved = 0;
        for boid in stragglers {
            if self.set(to)?.first_free_slot().is_none() {
                break;
            }
            self.transfer(from, boid, to)?;
            moved += 1;
        }

        debug!(from, to, moved, "flock rebalanced");
        Ok(moved)
    }

    /// Transforms of every live boid, ordered by (set, index).
    pub fn boid_views(&self) -> Vec<BoidView> {
        self.sets
            .iter()
            .flat_map(|set| {
                set.boids()
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.alive)
                    .map(move |(index, b)| BoidView {
                        set: set.index(),
                        index,
                        position: b.position,
                        rotation: b.orientation(),
                    })
            })
            .collect()
    }

    pub fn view(&self) -> FlockView {
        FlockView {
            set_count: self.sets.len(),
            total_slots: self.total_slots(),
            live: self.live_count(),
            next_half: self.scheduler.next_half(),
        }
    }
}
