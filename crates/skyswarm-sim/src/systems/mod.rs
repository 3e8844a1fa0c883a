//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state. Ships and missiles live in components; boids live
//! in the flock, which the contact system reads after the flock has advanced.

pub mod contact;
pub mod controls;
pub mod missile;
pub mod snapshot;
