//! Simulation constants and tuning parameters.
//!
//! Runtime-tunable values live in [`crate::config`]; the constants here are
//! their defaults plus fixed gameplay rules.

/// Nominal host frame rate (Hz) used by the headless game loop.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal frame rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Flock layout ---

/// Number of boid sets in the arena. Even so the two-phase scheduler splits cleanly.
pub const DEFAULT_SET_COUNT: usize = 10;

/// Boids per set (fixed pool size).
pub const DEFAULT_BOIDS_PER_SET: usize = 20;

// --- Steering ---

/// Radius within which neighbors contribute to alignment and cohesion.
pub const DEFAULT_PERCEPTION_RADIUS: f32 = 12.0;

/// Neighbors closer than this repel each other.
pub const DEFAULT_SEPARATION_DISTANCE: f32 = 4.0;

/// Maximum boid speed (units/s).
pub const DEFAULT_MAX_SPEED: f32 = 20.0;

/// Maximum magnitude of the combined steering vector (units/s²).
pub const DEFAULT_MAX_STEERING: f32 = 30.0;

pub const DEFAULT_SEPARATION_WEIGHT: f32 = 1.5;
pub const DEFAULT_ALIGNMENT_WEIGHT: f32 = 1.0;
pub const DEFAULT_COHESION_WEIGHT: f32 = 1.0;

/// Pull back toward the home region when a boid has left it.
pub const DEFAULT_CONTAINMENT_WEIGHT: f32 = 2.0;

/// Depth of the band inside each face of the home region where containment
/// starts steering a boid back toward the center.
pub const DEFAULT_CONTAINMENT_MARGIN: f32 = 5.0;

/// Distance below which two boids are treated as overlapping.
pub const OVERLAP_EPSILON: f32 = 1e-4;

// --- Arena ---

/// Half extents of the play volume centered on [`ARENA_CENTER`].
pub const ARENA_HALF_EXTENTS: [f32; 3] = [100.0, 40.0, 100.0];

/// Center of the play volume (above the terrain).
pub const ARENA_CENTER: [f32; 3] = [0.0, 30.0, 0.0];

/// Half extents of the region boids spawn in.
pub const SPAWN_HALF_EXTENTS: [f32; 3] = [60.0, 20.0, 60.0];

// --- Ships ---

/// Ship translation speed (units/s).
pub const MOVE_SPEED: f32 = 30.0;

/// Spawn point for ships.
pub const SHIP_SPAWN: [f32; 3] = [0.0, 25.0, -100.0];

/// Starting health for a ship.
pub const SHIP_START_HEALTH: i32 = 100;

/// Health removed when a boid strikes a ship.
pub const CONTACT_DAMAGE: i32 = 20;

/// Contact radius between a ship and a boid.
pub const SHIP_HIT_RADIUS: f32 = 2.5;

/// Pitch limit for mouse-look (degrees).
pub const PITCH_LIMIT_DEG: f32 = 90.0;

// --- Missiles ---

/// Missile launch speed (units/s).
pub const MISSILE_SPEED: f32 = 500.0;

/// Active frames before a missile expires and returns to its ship.
pub const MISSILE_LIFETIME_FRAMES: u32 = 100;

/// Distance ahead of the ship where a parked missile waits.
pub const MISSILE_MUZZLE_OFFSET: f32 = 3.0;

/// Contact radius between a missile and a boid.
pub const MISSILE_HIT_RADIUS: f32 = 1.5;

// --- Match ---

/// Starting value of the match clock.
pub const MATCH_CLOCK_START: i32 = 100;

/// Active updates per match clock decrement.
pub const MATCH_CLOCK_FRAMES_PER_STEP: u64 = 70;
