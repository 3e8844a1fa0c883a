//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which half of the ordered boid sets the scheduler updates next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateHalf {
    /// Sets `[0, split)`.
    #[default]
    First,
    /// Sets `[split, count)`.
    Second,
}

impl UpdateHalf {
    pub fn flipped(self) -> Self {
        match self {
            UpdateHalf::First => UpdateHalf::Second,
            UpdateHalf::Second => UpdateHalf::First,
        }
    }
}

/// How the scheduler splits an odd number of sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OddSplitPolicy {
    /// Split at `count / 2` (floor); the second half holds the extra set.
    #[default]
    SecondHalfLarger,
    /// Split at `count - count / 2`; the first half holds the extra set.
    FirstHalfLarger,
    /// Odd set counts are a configuration error.
    Reject,
}

/// What happens at the arena boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeBehavior {
    /// Leave through one face, re-enter through the opposite face.
    #[default]
    Wrap,
    /// Mirror back inside and flip the velocity component.
    Reflect,
}

/// What a confirmed hit does to the boid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Boid is deactivated and stays out of the flock.
    Deactivate,
    /// Boid is deactivated and immediately reintroduced at a random spawn point.
    #[default]
    Respawn,
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu shown; the simulation is frozen.
    #[default]
    Menu,
    /// Match running.
    Active,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEndReason {
    /// Match clock reached zero.
    ClockExpired,
    /// The local ship's health dropped below zero.
    ShipDestroyed,
}
