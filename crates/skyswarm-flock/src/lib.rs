//! Boid flocking core for SKYSWARM.
//!
//! Implements per-boid steering, fixed-capacity boid sets, the two-phase
//! update scheduler, and the [`Flock`] context that owns them all.
//! Neighbor search is a pairwise scan inside each set, which is fine at
//! ~20 boids per set; a uniform grid would replace it behind `BoidSet::update`
//! if populations grow.

pub mod boid;
pub mod boid_set;
pub mod flock;
pub mod scheduler;

pub use boid::{Boid, Bounds, Neighbor};
pub use boid_set::BoidSet;
pub use flock::{Flock, HitOutcome};
pub use scheduler::FlockScheduler;
pub use skyswarm_core as core;
