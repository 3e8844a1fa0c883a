//! SKYSWARM headless host.
//!
//! Wires the simulation engine to a fixed-rate game loop thread and exposes
//! shared state for feeding commands and polling snapshots.

pub mod game_loop;
pub mod state;

pub use skyswarm_core as core;
