//! Fixed-capacity pool of boids updated as one unit.
//!
//! The population vector is allocated once in [`BoidSet::new`] and never
//! resized. Removing a boid only clears its `alive` flag; respawning sets it
//! again at a fresh random position.

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::config::SteeringParams;
use skyswarm_core::constants::OVERLAP_EPSILON;
use skyswarm_core::error::{ConfigError, FlockError};
use skyswarm_core::types::Aabb;

use crate::boid::{random_point, random_unit, Boid, Bounds, Neighbor};

/// One group of boids sharing a home region.
#[derive(Debug, Clone)]
pub struct BoidSet {
    index: usize,
    boids: Vec<Boid>,
    bounds: Bounds,
    spawn: Aabb,
    enabled: bool,
    update_count: u64,
    // Scratch space reused across updates.
    neighbor_buffer: Vec<Neighbor>,
    steering_buffer: Vec<Vec3>,
}

impl BoidSet {
    /// Allocate `population` boids at random points of `spawn`, heading
    /// randomly at half the max speed.
    pub fn new(
        index: usize,
        population: usize,
        spawn: Aabb,
        bounds: Bounds,
        params: &SteeringParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, FlockError> {
        if population == 0 {
            return Err(ConfigError::ZeroPopulation.into());
        }

        let speed = initial_speed(params);
        let boids = (0..population)
            .map(|_| Boid::spawn(rng, &spawn, speed))
            .collect();

        Ok(Self::from_boids(index, boids, spawn, bounds))
    }

    /// Build a set around an explicit population (scenario setup and tests).
    /// The population is still fixed from here on.
    pub fn from_boids(index: usize, boids: Vec<Boid>, spawn: Aabb, bounds: Bounds) -> Self {
        let capacity = boids.len();
        Self {
            index,
            boids,
            bounds,
            spawn,
            enabled: true,
            update_count: 0,
            neighbor_buffer: Vec::with_capacity(capacity),
            steering_buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.boids.len()
    }

    pub fn live_count(&self) -> usize {
        self.boids.iter().filter(|b| b.alive).count()
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn boid(&self, index: usize) -> Option<&Boid> {
        self.boids.get(index)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Number of `update` calls this set has run.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Collect live boids other than `index` closer than `radius`, in population order.
    ///
    /// Overlapping boids get a synthetic offset along X whose sign depends on
    /// index order, so the pair separates in opposite directions.
    pub fn gather_neighbors(&self, index: usize, radius: f32, out: &mut Vec<Neighbor>) {
        out.clear();
        let Some(me) = self.boids.get(index) else {
            return;
        };
        if !(radius > 0.0) {
            return;
        }

        for (other_index, other) in self.boids.iter().enumerate() {
            if other_index == index || !other.alive {
                continue;
            }
            let mut offset = other.position - me.position;
            let distance = offset.length();
            if distance >= radius {
                continue;
            }
            if distance < OVERLAP_EPSILON {
                let sign = if other_index > index { 1.0 } else { -1.0 };
                offset = Vec3::X * (sign * OVERLAP_EPSILON);
            }
            out.push(Neighbor {
                index: other_index,
                offset,
                distance,
                velocity: other.velocity,
            });
        }
    }

    /// Advance every live boid by `dt`.
    ///
    /// Steering for all boids is computed from the state at the start of the
    /// call, then every live boid integrates. The result depends only on the
    /// population order, never on update order.
    pub fn update(&mut self, dt: f32, params: &SteeringParams) {
        self.update_count += 1;

        let radius = params.query_radius();
        let mut neighbors = std::mem::take(&mut self.neighbor_buffer);
        let mut steering = std::mem::take(&mut self.steering_buffer);
        steering.clear();

        for (i, boid) in self.boids.iter().enumerate() {
            if !boid.alive {
                steering.push(Vec3::ZERO);
                continue;
            }
            self.gather_neighbors(i, radius, &mut neighbors);
            steering.push(boid.compute_steering(&neighbors, params, &self.bounds));
        }

        for (boid, force) in self.boids.iter_mut().zip(&steering) {
            if boid.alive {
                boid.integrate(*force, dt, params.max_speed, &self.bounds);
            }
        }

        self.neighbor_buffer = neighbors;
        self.steering_buffer = steering;
    }

    /// Take a boid out of the flock. Returns whether it was alive; a second call is a no-op.
    pub fn deactivate(&mut self, index: usize) -> Result<bool, FlockError> {
        let boid = self.slot_mut(index)?;
        let was_alive = boid.alive;
        boid.alive = false;
        Ok(was_alive)
    }

    /// Reintroduce a boid at a random spawn point with a random heading.
    /// Works whether or not the boid was alive. Returns the new position.
    pub fn respawn(
        &mut self,
        index: usize,
        params: &SteeringParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec3, FlockError> {
        let spawn = self.spawn;
        let boid = self.slot_mut(index)?;
        boid.position = random_point(rng, &spawn);
        boid.velocity = random_unit(rng) * initial_speed(params);
        boid.alive = true;
        Ok(boid.position)
    }

    /// Mean position of the live boids, `None` if none are alive.
    pub fn centroid(&self) -> Option<Vec3> {
        let (sum, count) = self
            .boids
            .iter()
            .filter(|b| b.alive)
            .fold((Vec3::ZERO, 0usize), |(sum, n), b| (sum + b.position, n + 1));
        (count > 0).then(|| sum / count as f32)
    }

    /// Lowest-index inactive slot.
    pub fn first_free_slot(&self) -> Option<usize> {
        self.boids.iter().position(|b| !b.alive)
    }

    /// Place boid state into an inactive slot and mark it alive.
    pub(crate) fn activate_at(
        &mut self,
        slot: usize,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<(), FlockError> {
        let set = self.index;
        let boid = self.slot_mut(slot)?;
        if boid.alive {
            return Err(FlockError::NoFreeSlot { set });
        }
        *boid = Boid::new(position, velocity);
        Ok(())
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Boid, FlockError> {
        let set = self.index;
        let capacity = self.boids.len();
        self.boids
            .get_mut(index)
            .ok_or(FlockError::BoidIndexOutOfRange {
                set,
                boid: index,
                capacity,
            })
    }
}

fn initial_speed(params: &SteeringParams) -> f32 {
    params.max_speed * 0.5
}
