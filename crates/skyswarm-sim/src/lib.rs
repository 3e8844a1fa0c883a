//! Simulation engine for SKYSWARM.
//!
//! Owns the flock, the hecs ECS world holding ships and missiles, and the
//! match session. Runs systems at a fixed tick rate and produces
//! FrameSnapshots for the host.

pub mod engine;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use skyswarm_core as core;

#[cfg(test)]
mod tests;
