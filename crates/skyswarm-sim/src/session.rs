//! Match session state kept by the engine outside the ECS world.

use std::collections::HashSet;

use skyswarm_core::config::CombatConfig;
use skyswarm_core::events::GameEvent;

/// Countdown shown to the players. Steps down once every
/// `frames_per_step` active frames.
#[derive(Debug, Clone)]
pub struct MatchClock {
    remaining: i32,
    frames: u64,
    start: i32,
    frames_per_step: u64,
}

impl MatchClock {
    pub fn new(combat: &CombatConfig) -> Self {
        Self {
            remaining: combat.match_clock_start,
            frames: 0,
            start: combat.match_clock_start,
            frames_per_step: combat.match_clock_frames_per_step.max(1),
        }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = self.start;
        self.frames = 0;
    }

    /// Count one active frame. Returns true once the clock has run out.
    pub fn tick(&mut self, events: &mut Vec<GameEvent>) -> bool {
        self.frames += 1;
        if self.frames % self.frames_per_step == 0 && self.remaining > 0 {
            self.remaining -= 1;
            events.push(GameEvent::ClockTick {
                remaining: self.remaining,
            });
        }
        self.remaining <= 0
    }
}

/// A ship touching a boid: (ship id, set, boid).
pub type ContactKey = (u32, usize, usize);

/// Ship/boid contacts seen on the previous tick.
#[derive(Debug, Clone, Default)]
pub struct ContactState {
    pub touching: HashSet<ContactKey>,
}

impl ContactState {
    pub fn clear(&mut self) {
        self.touching.clear();
    }

    /// Forget every contact involving `ship_id`.
    pub fn forget_ship(&mut self, ship_id: u32) {
        self.touching.retain(|(ship, _, _)| *ship != ship_id);
    }
}
