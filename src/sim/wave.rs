//! Wave configuration and weighted, time-gated enemy selection
//!
//! A wave is an ordered list of enemy entries, each with a relative weight and
//! an optional time window inside the wave. Selection filters the eligible
//! entries for the current moment and performs a weighted random pick. Wave
//! configs are authored as static data (see `tuning`) and read-only at runtime.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::SpawnTuning;

/// How an enemy archetype behaves once spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Runs straight at the player; damages on contact
    Chaser,
    /// Advances until within `stop_distance`, then holds and fires
    Shooter {
        stop_distance: f32,
        /// Shots per second
        fire_rate: f32,
        projectile_speed: f32,
        projectile_damage: f32,
        projectile_lifetime: f32,
    },
}

/// Static description of an enemy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub behavior: EnemyBehavior,
    /// Top chase speed (units/s)
    pub speed: f32,
    /// How quickly velocity converges on the chase direction (units/s²)
    pub acceleration: f32,
    pub max_health: f32,
    /// Damage dealt to the player on contact
    pub contact_damage: f32,
    /// Score credited when this enemy dies
    pub score_value: u64,
}

/// One weighted, time-gated entry in a wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyEntry {
    pub archetype: EnemyArchetype,
    /// Relative chance vs other entries; 0 = permanently ineligible
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Only spawn after this many seconds into the wave
    #[serde(default)]
    pub start_after: f32,
    /// Stop spawning after this many seconds into the wave (0 = never stop)
    #[serde(default)]
    pub end_after: f32,
}

fn default_weight() -> u32 {
    1
}

impl EnemyEntry {
    /// Whether this entry may spawn at `elapsed_in_wave` seconds into the wave
    pub fn eligible_at(&self, elapsed_in_wave: f32) -> bool {
        self.weight > 0
            && elapsed_in_wave >= self.start_after
            && (self.end_after <= 0.0 || elapsed_in_wave <= self.end_after)
    }
}

/// A full wave: its enemy roster plus optional spawner overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub entries: Vec<EnemyEntry>,
    /// Replaces the global spawn curve for this wave when present
    #[serde(default)]
    pub spawner_override: Option<SpawnTuning>,
}

/// Entries that may spawn right now
pub fn eligible_entries(entries: &[EnemyEntry], elapsed_in_wave: f32) -> Vec<&EnemyEntry> {
    entries
        .iter()
        .filter(|e| e.eligible_at(elapsed_in_wave))
        .collect()
}

/// Weighted random pick over the currently eligible entries.
///
/// Returns `None` when nothing is eligible (a silent no-spawn, not an error).
/// The total weight is recomputed from the eligible set on every call; a
/// cached total would go stale as time gates open and close. If the
/// accumulation walk somehow falls through, the last eligible entry is
/// returned deterministically rather than failing.
pub fn pick_weighted<'a>(
    entries: &'a [EnemyEntry],
    elapsed_in_wave: f32,
    rng: &mut Pcg32,
) -> Option<&'a EnemyEntry> {
    let eligible = eligible_entries(entries, elapsed_in_wave);
    let total: u64 = eligible.iter().map(|e| e.weight as u64).sum();
    if total == 0 {
        return None;
    }

    let roll = rng.random_range(0..total);
    let mut cumulative = 0u64;
    for &entry in &eligible {
        cumulative += entry.weight as u64;
        if roll < cumulative {
            return Some(entry);
        }
    }
    eligible.last().copied()
}
