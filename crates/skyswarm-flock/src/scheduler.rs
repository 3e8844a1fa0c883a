//! Two-phase update scheduler.
//!
//! Each tick updates one contiguous half of the ordered boid sets and then
//! flips to the other half, so every set is refreshed once every two ticks
//! while per-tick cost stays at roughly half the flock.

use std::ops::Range;

use tracing::{trace, warn};

use skyswarm_core::config::SteeringParams;
use skyswarm_core::enums::{OddSplitPolicy, UpdateHalf};
use skyswarm_core::error::ConfigError;

use crate::boid_set::BoidSet;

/// Alternates between the first and second half of the sets.
#[derive(Debug, Clone)]
pub struct FlockScheduler {
    half: UpdateHalf,
    policy: OddSplitPolicy,
    set_count: usize,
    split: usize,
}

impl FlockScheduler {
    /// Scheduler for `set_count` sets, starting with the first half.
    pub fn new(set_count: usize, policy: OddSplitPolicy) -> Result<Self, ConfigError> {
        if policy == OddSplitPolicy::Reject && set_count % 2 != 0 {
            return Err(ConfigError::OddSetCount { count: set_count });
        }
        Ok(Self {
            half: UpdateHalf::First,
            policy,
            set_count,
            split: split_point(set_count, policy),
        })
    }

    /// Half that the next `tick` will update.
    pub fn next_half(&self) -> UpdateHalf {
        self.half
    }

    /// Index where the second half starts.
    pub fn split(&self) -> usize {
        self.split
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Set indices the next `tick` will update.
    pub fn selected_range(&self) -> Range<usize> {
        match self.half {
            UpdateHalf::First => 0..self.split,
            UpdateHalf::Second => self.split..self.set_count,
        }
    }

    /// Re-derive the split for a new set count. The current half is kept.
    ///
    /// A runtime odd count under [`OddSplitPolicy::Reject`] cannot be refused
    /// without starving a set, so it falls back to the floor split.
    pub fn resize(&mut self, set_count: usize) {
        let policy = if self.policy == OddSplitPolicy::Reject && set_count % 2 != 0 {
            warn!(set_count, "odd set count under Reject policy, using floor split");
            OddSplitPolicy::SecondHalfLarger
        } else {
            self.policy
        };
        self.set_count = set_count;
        self.split = split_point(set_count, policy);
    }

    /// Update the selected half of `sets` in index order, then flip.
    ///
    /// Disabled sets in the selected half are skipped. An empty slice is a
    /// no-op and leaves the toggle untouched. Returns the range that was selected.
    pub fn tick(&mut self, sets: &mut [BoidSet], dt: f32, params: &SteeringParams) -> Range<usize> {
        if sets.is_empty() {
            return 0..0;
        }
        if sets.len() != self.set_count {
            self.resize(sets.len());
        }

        let range = self.selected_range();
        trace!(half = ?self.half, start = range.start, end = range.end, "flock tick");
        for set in &mut sets[range.clone()] {
            if set.is_enabled() {
                set.update(dt, params);
            }
        }

        self.half = self.half.flipped();
        range
    }
}

/// First index of the second half for `count` sets under `policy`.
pub fn split_point(count: usize, policy: OddSplitPolicy) -> usize {
    match policy {
        OddSplitPolicy::FirstHalfLarger => count - count / 2,
        OddSplitPolicy::SecondHalfLarger | OddSplitPolicy::Reject => count / 2,
    }
}
