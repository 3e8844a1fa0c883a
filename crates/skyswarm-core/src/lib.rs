//! Core types and definitions for the SKYSWARM arena.
//!
//! This crate defines the vocabulary shared across all other crates:
//! configuration, errors, components, commands, snapshots, events, and constants.
//! It has no dependency on any runtime framework or ECS.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
