//! Runtime configuration for the flock and the combat bridge.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON document only
//! needs the fields it overrides. Call `validate()` before building anything.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{EdgeBehavior, HitPolicy, OddSplitPolicy};
use crate::error::ConfigError;
use crate::types::Aabb;

/// Per-boid steering tunables shared by every set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Alignment/cohesion neighbor radius. Values <= 0 mean "no neighbors".
    pub perception_radius: f32,
    /// Neighbors closer than this repel.
    pub separation_distance: f32,
    pub max_speed: f32,
    /// Clamp on the combined steering vector.
    pub max_steering: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub containment_weight: f32,
    /// Containment acts inside this distance from a face, and outside the region.
    pub containment_margin: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            perception_radius: DEFAULT_PERCEPTION_RADIUS,
            separation_distance: DEFAULT_SEPARATION_DISTANCE,
            max_speed: DEFAULT_MAX_SPEED,
            max_steering: DEFAULT_MAX_STEERING,
            separation_weight: DEFAULT_SEPARATION_WEIGHT,
            alignment_weight: DEFAULT_ALIGNMENT_WEIGHT,
            cohesion_weight: DEFAULT_COHESION_WEIGHT,
            containment_weight: DEFAULT_CONTAINMENT_WEIGHT,
            containment_margin: DEFAULT_CONTAINMENT_MARGIN,
        }
    }
}

impl SteeringParams {
    /// Radius a neighbor query must cover so every rule sees its candidates.
    pub fn query_radius(&self) -> f32 {
        self.perception_radius.max(self.separation_distance)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("perception_radius", self.perception_radius),
            ("separation_distance", self.separation_distance),
            ("max_speed", self.max_speed),
            ("max_steering", self.max_steering),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("containment_weight", self.containment_weight),
            ("containment_margin", self.containment_margin),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if self.max_speed <= 0.0 {
            return Err(ConfigError::NonPositive { field: "max_speed" });
        }
        if self.max_steering <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "max_steering",
            });
        }
        Ok(())
    }
}

/// Layout and behavior of the whole flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Number of boid sets.
    pub set_count: usize,
    /// Fixed pool size of every set.
    pub boids_per_set: usize,
    pub steering: SteeringParams,
    /// Home region every set keeps its boids inside.
    pub bounds: Aabb,
    /// Region new and respawned boids appear in.
    pub spawn: Aabb,
    pub edge: EdgeBehavior,
    pub odd_split: OddSplitPolicy,
    pub hit_policy: HitPolicy,
}

impl Default for FlockConfig {
    fn default() -> Self {
        let center = Vec3::from_array(ARENA_CENTER);
        Self {
            set_count: DEFAULT_SET_COUNT,
            boids_per_set: DEFAULT_BOIDS_PER_SET,
            steering: SteeringParams::default(),
            bounds: Aabb::from_center(center, Vec3::from_array(ARENA_HALF_EXTENTS)),
            spawn: Aabb::from_center(center, Vec3::from_array(SPAWN_HALF_EXTENTS)),
            edge: EdgeBehavior::default(),
            odd_split: OddSplitPolicy::default(),
            hit_policy: HitPolicy::default(),
        }
    }
}

impl FlockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boids_per_set == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.odd_split == OddSplitPolicy::Reject && self.set_count % 2 != 0 {
            return Err(ConfigError::OddSetCount {
                count: self.set_count,
            });
        }
        self.steering.validate()?;
        if !self.bounds.is_well_formed() {
            return Err(ConfigError::InvalidBounds { field: "bounds" });
        }
        if !self.spawn.is_well_formed() {
            return Err(ConfigError::InvalidBounds { field: "spawn" });
        }
        Ok(())
    }

    /// Total boid slots across all sets.
    pub fn total_population(&self) -> usize {
        self.set_count * self.boids_per_set
    }
}

/// Tunables for ships, missiles and the match clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub move_speed: f32,
    pub ship_spawn: Vec3,
    pub ship_start_health: i32,
    pub ship_hit_radius: f32,
    pub contact_damage: i32,
    pub missile_speed: f32,
    pub missile_lifetime_frames: u32,
    pub missile_hit_radius: f32,
    pub match_clock_start: i32,
    pub match_clock_frames_per_step: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            ship_spawn: Vec3::from_array(SHIP_SPAWN),
            ship_start_health: SHIP_START_HEALTH,
            ship_hit_radius: SHIP_HIT_RADIUS,
            contact_damage: CONTACT_DAMAGE,
            missile_speed: MISSILE_SPEED,
            missile_lifetime_frames: MISSILE_LIFETIME_FRAMES,
            missile_hit_radius: MISSILE_HIT_RADIUS,
            match_clock_start: MATCH_CLOCK_START,
            match_clock_frames_per_step: MATCH_CLOCK_FRAMES_PER_STEP,
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("move_speed", self.move_speed),
            ("ship_hit_radius", self.ship_hit_radius),
            ("missile_speed", self.missile_speed),
            ("missile_hit_radius", self.missile_hit_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if !self.ship_spawn.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "ship_spawn",
            });
        }
        if self.missile_lifetime_frames == 0 {
            return Err(ConfigError::NonPositive {
                field: "missile_lifetime_frames",
            });
        }
        if self.match_clock_frames_per_step == 0 {
            return Err(ConfigError::NonPositive {
                field: "match_clock_frames_per_step",
            });
        }
        Ok(())
    }
}
