//! Time-driven entity spawning
//!
//! A `SpawnClock` counts down and rearms at an interval that tightens as a
//! progress metric grows, bottoming out at a floor so the field never becomes
//! unplayably dense. Kind selection goes through a `WeightedTable` draw from
//! the engine's seeded RNG; rarity tracks reward value, never penalty
//! severity (hazards get their own clock).

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Countdown timer with a difficulty-tightening rearm interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    countdown: f32,
    /// Interval at zero progress (ticks)
    base: f32,
    /// Interval never drops below this (ticks)
    floor: f32,
    /// Progress units per tick of interval reduction
    scale: f32,
}

impl SpawnClock {
    pub fn new(base: f32, floor: f32, scale: f32) -> Self {
        Self {
            countdown: base,
            base,
            floor,
            scale,
        }
    }

    /// Current rearm interval for a given progress value.
    pub fn interval(&self, progress: f32) -> f32 {
        (self.base - progress / self.scale).max(self.floor)
    }

    /// Advance the clock. Returns true when a spawn is due; the clock rearms
    /// itself from the current progress.
    pub fn tick(&mut self, dt: f32, progress: f32) -> bool {
        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.countdown = self.interval(progress);
            true
        } else {
            false
        }
    }

    /// Restore the initial countdown (on reset).
    pub fn rearm(&mut self) {
        self.countdown = self.base;
    }
}

/// Fixed weighted table for entity-kind draws.
#[derive(Debug, Clone)]
pub struct WeightedTable<T: Copy> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    /// Panics if the table is empty or all-zero; tables are static
    /// configuration, so this is a construction-time bug, not runtime input.
    pub fn new(entries: &[(T, u32)]) -> Self {
        let total = entries.iter().map(|(_, w)| w).sum();
        assert!(total > 0, "weighted table needs at least one positive weight");
        Self {
            entries: entries.to_vec(),
            total,
        }
    }

    /// Draw one entry. Weights are fixed for the table's lifetime.
    pub fn pick(&self, rng: &mut Pcg32) -> T {
        let mut roll = rng.random_range(0..self.total);
        for &(item, weight) in &self.entries {
            if roll < weight {
                return item;
            }
            roll -= weight;
        }
        // roll < total and the weights sum to total, so the loop always
        // returns; this arm only soothes the compiler
        self.entries[0].0
    }
}
