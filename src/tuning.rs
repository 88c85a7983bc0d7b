//! Data-driven game balance
//!
//! All feel and difficulty numbers live here so designers can iterate without
//! touching sim code. A `Tuning` can be loaded from JSON (`from_json`) or used
//! with the built-in defaults, which mirror the shipped balance. Loaded
//! configs are read-only at runtime; the sim never mutates them.

use serde::{Deserialize, Serialize};

use crate::sim::locomotion::LocomotionTuning;
use crate::sim::spawn::SpawnTuning;
use crate::sim::wave::{EnemyArchetype, EnemyBehavior, EnemyEntry, WaveConfig};

/// Player stats and auto-attack parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    /// Top speed the locomotion output is scaled by (units/s)
    pub top_speed: f32,
    pub attack_damage: f32,
    /// Seconds between auto-attacks
    pub attack_cooldown: f32,
    /// Auto-attack acquires targets within this radius
    pub detection_radius: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            top_speed: 10.0,
            attack_damage: 10.0,
            attack_cooldown: 5.0,
            detection_radius: 12.0,
            projectile_speed: 8.0,
            projectile_lifetime: 3.0,
        }
    }
}

/// Cross-entity combat parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Invulnerability window granted to the player on enemy contact (seconds)
    pub contact_invuln_duration: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            contact_invuln_duration: 5.0,
        }
    }
}

/// Boost pickup drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostTuning {
    /// Seconds between drops
    pub spawn_interval: f32,
    /// Drop distance from the player
    pub spawn_distance: f32,
    pub heal_amount: f32,
    /// Seconds an uncollected boost stays on the ground
    pub lifetime: f32,
}

impl Default for BoostTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 20.0,
            spawn_distance: 6.0,
            heal_amount: 20.0,
            lifetime: 12.0,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub locomotion: LocomotionTuning,
    /// Global spawn curve; waves may override it
    pub spawner: SpawnTuning,
    pub boosts: BoostTuning,
    /// Wave list (wave 1 = index 0); the last entry repeats forever
    pub waves: Vec<WaveConfig>,
    /// Seconds each wave runs before the next one takes over
    pub wave_interval_seconds: f32,
    /// Countdown before a wave's spawner goes live
    pub pre_wave_countdown_seconds: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            locomotion: LocomotionTuning::default(),
            spawner: SpawnTuning::default(),
            boosts: BoostTuning::default(),
            waves: default_waves(),
            wave_interval_seconds: 30.0,
            pre_wave_countdown_seconds: 3.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning sheet from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for authoring round-trips
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn grub() -> EnemyArchetype {
    EnemyArchetype {
        name: "grub".into(),
        behavior: EnemyBehavior::Chaser,
        speed: 2.0,
        acceleration: 25.0,
        max_health: 50.0,
        contact_damage: 10.0,
        score_value: 100,
    }
}

fn spitter() -> EnemyArchetype {
    EnemyArchetype {
        name: "spitter".into(),
        behavior: EnemyBehavior::Shooter {
            stop_distance: 6.0,
            fire_rate: 1.0,
            projectile_speed: 10.0,
            projectile_damage: 10.0,
            projectile_lifetime: 5.0,
        },
        speed: 1.6,
        acceleration: 20.0,
        max_health: 40.0,
        contact_damage: 5.0,
        score_value: 150,
    }
}

fn default_waves() -> Vec<WaveConfig> {
    vec![
        // Wave 1: grubs only, ease-in
        WaveConfig {
            entries: vec![EnemyEntry {
                archetype: grub(),
                weight: 1,
                start_after: 0.0,
                end_after: 0.0,
            }],
            spawner_override: None,
        },
        // Wave 2: spitters join a few seconds in
        WaveConfig {
            entries: vec![
                EnemyEntry {
                    archetype: grub(),
                    weight: 3,
                    start_after: 0.0,
                    end_after: 0.0,
                },
                EnemyEntry {
                    archetype: spitter(),
                    weight: 1,
                    start_after: 5.0,
                    end_after: 0.0,
                },
            ],
            spawner_override: None,
        },
        // Wave 3: spitter-heavy with a steeper spawn ramp
        WaveConfig {
            entries: vec![
                EnemyEntry {
                    archetype: grub(),
                    weight: 2,
                    start_after: 0.0,
                    end_after: 0.0,
                },
                EnemyEntry {
                    archetype: spitter(),
                    weight: 3,
                    start_after: 0.0,
                    end_after: 0.0,
                },
            ],
            spawner_override: Some(SpawnTuning {
                base_interval: 0.8,
                interval_multiplier: 0.8,
                ..Default::default()
            }),
        },
    ]
}
