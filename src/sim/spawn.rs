//! Spawn rate curve and per-wave spawn scheduling
//!
//! The spawn interval decays exponentially over the life of a wave so the
//! pressure keeps ramping. One `Spawner` is active per wave; starting a new
//! wave replaces it wholesale and the old pending timer is simply discarded.

use serde::{Deserialize, Serialize};

/// Spawn rate curve parameters (percentage-based difficulty ramp)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Starting interval between spawns (seconds)
    pub base_interval: f32,
    /// Interval multiplier applied every `step_seconds` (0.85 = 15% harder)
    pub interval_multiplier: f32,
    /// How often the multiplier compounds (seconds)
    pub step_seconds: f32,
    /// Clamp so the interval doesn't go insane
    pub min_interval: f32,
    /// Distance from the player at which enemies appear
    pub spawn_distance: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval: 1.0,
            interval_multiplier: 0.85,
            step_seconds: 5.0,
            min_interval: 0.1,
            spawn_distance: 10.0,
        }
    }
}

/// Current spawn interval at `elapsed_in_wave` seconds into the wave.
///
/// `interval = max(min_interval, base * multiplier^(elapsed / step_seconds))`.
/// Pure function. A zero `step_seconds` is treated as an infinitely fast ramp:
/// the interval clamps straight to the floor once the wave is underway.
pub fn spawn_interval(elapsed_in_wave: f32, tuning: &SpawnTuning) -> f32 {
    if tuning.step_seconds <= 0.0 {
        return if elapsed_in_wave > 0.0 {
            tuning.min_interval
        } else {
            tuning.base_interval.max(tuning.min_interval)
        };
    }
    let scaled = tuning.base_interval
        * tuning
            .interval_multiplier
            .powf(elapsed_in_wave / tuning.step_seconds);
    scaled.max(tuning.min_interval)
}

/// Spawn scheduler for the active wave
///
/// Owned exclusively by the game state; replaced when a new wave starts.
#[derive(Debug, Clone)]
pub struct Spawner {
    pub tuning: SpawnTuning,
    /// Global clock time at which this wave's curve starts
    pub wave_start_time: f32,
    /// Global clock time of the next scheduled spawn
    next_spawn_time: f32,
}

impl Spawner {
    /// Create a spawner whose first spawn is due immediately at `wave_start_time`
    pub fn new(tuning: SpawnTuning, wave_start_time: f32) -> Self {
        Self {
            tuning,
            wave_start_time,
            next_spawn_time: wave_start_time,
        }
    }

    /// Seconds elapsed since this wave started (never negative)
    #[inline]
    pub fn elapsed_in_wave(&self, now: f32) -> f32 {
        (now - self.wave_start_time).max(0.0)
    }

    /// Returns true if a spawn is due at `now`, and schedules the next one.
    ///
    /// The interval is re-evaluated from the curve at every poll so the ramp
    /// applies even while no spawns fire.
    pub fn poll(&mut self, now: f32) -> bool {
        if now < self.next_spawn_time {
            return false;
        }
        let interval = spawn_interval(self.elapsed_in_wave(now), &self.tuning);
        self.next_spawn_time = now + interval;
        true
    }
}
