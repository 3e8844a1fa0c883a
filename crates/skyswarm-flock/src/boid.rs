//! A single flocking agent and its local steering rules.
//!
//! Steering combines four Reynolds-style rules, each expressed as
//! "desired velocity minus current velocity":
//! 1. Separation: move away from neighbors that are too close
//! 2. Alignment: match the average velocity of nearby neighbors
//! 3. Cohesion: move toward the centroid of nearby neighbors
//! 4. Containment: head back toward the middle of the home region when
//!    closer than the margin to a face (or outside it)
//!
//! Pure functions over plain data. No ECS, no engine types.

use glam::{Quat, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::config::SteeringParams;
use skyswarm_core::constants::OVERLAP_EPSILON;
use skyswarm_core::enums::EdgeBehavior;
use skyswarm_core::types::{orientation_from_heading, Aabb};

/// One flocking agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vec3,
    /// Magnitude-bearing velocity (units/s), never longer than the max speed after integration.
    pub velocity: Vec3,
    /// Whether the boid flocks and is visible/collidable.
    pub alive: bool,
}

/// Another boid as seen from the boid being steered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Population index inside the owning set.
    pub index: usize,
    /// `other.position - self.position`. For overlapping boids this is a
    /// synthetic offset along X so separation still has a direction.
    pub offset: Vec3,
    pub distance: f32,
    pub velocity: Vec3,
}

/// Home region of a set and what happens at its faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub region: Aabb,
    pub edge: EdgeBehavior,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            alive: true,
        }
    }

    /// A live boid at a random point of `region`, heading in a random direction at `speed`.
    pub fn spawn(rng: &mut ChaCha8Rng, region: &Aabb, speed: f32) -> Self {
        Self::new(random_point(rng, region), random_unit(rng) * speed)
    }

    /// Direction of travel, +Z when stationary.
    pub fn heading(&self) -> Vec3 {
        self.velocity.try_normalize().unwrap_or(Vec3::Z)
    }

    /// Rotation that points the model's +Z axis along the heading.
    pub fn orientation(&self) -> Quat {
        orientation_from_heading(self.velocity)
    }

    /// Combined steering for one frame, clamped to `params.max_steering`.
    ///
    /// `neighbors` may contain boids outside either rule radius; each rule filters
    /// by its own distance. With no neighbors in range, alignment and cohesion
    /// contribute nothing.
    pub fn compute_steering(
        &self,
        neighbors: &[Neighbor],
        params: &SteeringParams,
        bounds: &Bounds,
    ) -> Vec3 {
        let mut repulsion = Vec3::ZERO;
        let mut crowding = 0usize;
        let mut velocity_sum = Vec3::ZERO;
        let mut offset_sum = Vec3::ZERO;
        let mut nearby = 0usize;

        for neighbor in neighbors {
            if neighbor.distance < params.separation_distance {
                if let Some(dir) = neighbor.offset.try_normalize() {
                    repulsion -= dir / neighbor.distance.max(OVERLAP_EPSILON);
                    crowding += 1;
                }
            }
            if neighbor.distance < params.perception_radius {
                velocity_sum += neighbor.velocity;
                offset_sum += neighbor.offset;
                nearby += 1;
            }
        }

        let mut steering = Vec3::ZERO;
        if crowding > 0 {
            steering += self.seek(repulsion / crowding as f32, params) * params.separation_weight;
        }
        if nearby > 0 {
            let count = nearby as f32;
            steering += self.seek(velocity_sum / count, params) * params.alignment_weight;
            steering += self.seek(offset_sum / count, params) * params.cohesion_weight;
        }
        let inner = bounds.region.shrunk(params.containment_margin.max(0.0));
        if !inner.contains(self.position) {
            let home = bounds.region.center() - self.position;
            steering += self.seek(home, params) * params.containment_weight;
        }

        steering.clamp_length_max(params.max_steering)
    }

    /// Apply `steering` as an acceleration for `dt`, clamp speed, move, then confine.
    pub fn integrate(&mut self, steering: Vec3, dt: f32, max_speed: f32, bounds: &Bounds) {
        self.velocity = (self.velocity + steering * dt).clamp_length_max(max_speed);
        self.position += self.velocity * dt;
        bounds.confine(&mut self.position, &mut self.velocity);
    }

    /// Reynolds steer: full speed along `desired`, minus the current velocity.
    fn seek(&self, desired: Vec3, params: &SteeringParams) -> Vec3 {
        match desired.try_normalize() {
            Some(dir) => dir * params.max_speed - self.velocity,
            None => Vec3::ZERO,
        }
    }
}

impl Bounds {
    pub fn new(region: Aabb, edge: EdgeBehavior) -> Self {
        Self { region, edge }
    }

    /// Bring a position back inside the region, adjusting velocity for reflection.
    pub fn confine(&self, position: &mut Vec3, velocity: &mut Vec3) {
        let min = self.region.min;
        let max = self.region.max;

        for axis in 0..3 {
            let (lo, hi) = (min[axis], max[axis]);
            let p = position[axis];
            if p >= lo && p <= hi {
                continue;
            }
            let size = hi - lo;
            if size <= 0.0 {
                position[axis] = lo;
                velocity[axis] = 0.0;
                continue;
            }

            match self.edge {
                EdgeBehavior::Wrap => {
                    position[axis] = lo + (p - lo).rem_euclid(size);
                }
                EdgeBehavior::Reflect => {
                    let mirrored = if p < lo { lo + (lo - p) } else { hi - (p - hi) };
                    position[axis] = mirrored.clamp(lo, hi);
                    velocity[axis] = if p < lo {
                        velocity[axis].abs()
                    } else {
                        -velocity[axis].abs()
                    };
                }
            }
        }
    }
}

/// Uniform point in `region`; degenerate axes collapse to `min`.
pub(crate) fn random_point(rng: &mut ChaCha8Rng, region: &Aabb) -> Vec3 {
    let mut point = region.min;
    for axis in 0..3 {
        let (lo, hi) = (region.min[axis], region.max[axis]);
        if hi > lo {
            point[axis] = rng.gen_range(lo..hi);
        }
    }
    point
}

/// Uniform direction by rejection sampling inside the unit ball.
pub(crate) fn random_unit(rng: &mut ChaCha8Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
