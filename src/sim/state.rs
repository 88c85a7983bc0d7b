//! Game state and entity types
//!
//! Everything the simulation mutates lives here. The state owns the seeded
//! RNG; entity vectors are kept in id order so iteration is stable and
//! replays are deterministic.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::GameClock;
use super::combat::Vitals;
use super::locomotion::Locomotion;
use super::spawn::Spawner;
use super::wave::{EnemyArchetype, WaveConfig};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player died; run ended
    GameOver,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub vitals: Vitals,
    pub locomotion: Locomotion,
    /// Damage carried by the player's projectiles
    pub attack_damage: f32,
    /// Clock time at which the next auto-attack may fire
    pub next_attack_at: f32,
}

/// A spawned enemy instance
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub pos: Vec2,
    pub vel: Vec2,
    pub vitals: Vitals,
    /// Clock time at which a shooter may fire again
    pub next_shot_at: f32,
}

/// Who fired a projectile (decides what it can hit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub owner: ProjectileOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    /// Clock time at which the projectile despawns
    pub expires_at: f32,
}

/// Pickup effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostKind {
    /// Restore this much health, clamped to max
    Health(f32),
}

/// A collectible boost on the ground
#[derive(Debug, Clone)]
pub struct Boost {
    pub id: u32,
    pub kind: BoostKind,
    pub pos: Vec2,
    pub expires_at: f32,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; every random draw in the sim flows through here
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub clock: GameClock,
    pub phase: GamePhase,
    /// 1-based index of the wave in progress; 0 before the first wave
    pub wave_index: u32,
    /// Clock time at which the next wave replaces the spawner
    pub next_wave_at: f32,
    /// Active spawner; `None` until the first wave countdown completes
    pub spawner: Option<Spawner>,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub boosts: Vec<Boost>,
    /// Clock time of the next boost drop
    pub next_boost_at: f32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run. The first wave starts after the pre-wave countdown.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            vitals: Vitals::new(tuning.player.max_health),
            locomotion: Locomotion::new(tuning.locomotion.clone()),
            attack_damage: tuning.player.attack_damage,
            next_attack_at: 0.0,
        };

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_wave_at: tuning.pre_wave_countdown_seconds,
            next_boost_at: tuning.boosts.spawn_interval,
            tuning,
            clock: GameClock::new(),
            phase: GamePhase::Playing,
            wave_index: 0,
            spawner: None,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            boosts: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Config for the wave in progress. Past the end of the authored list the
    /// last config keeps repeating; `None` only before the first wave.
    pub fn current_wave_config(&self) -> Option<&WaveConfig> {
        if self.wave_index == 0 || self.tuning.waves.is_empty() {
            return None;
        }
        let idx = (self.wave_index as usize - 1).min(self.tuning.waves.len() - 1);
        Some(&self.tuning.waves[idx])
    }

    /// Instantiate an enemy from its archetype at `pos`
    pub fn spawn_enemy(&mut self, archetype: EnemyArchetype, pos: Vec2) {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            vitals: Vitals::new(archetype.max_health),
            archetype,
            pos,
            vel: Vec2::ZERO,
            next_shot_at: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_awaits_first_wave() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave_index, 0);
        assert!(state.spawner.is_none());
        assert!(state.current_wave_config().is_none());
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_wave_config_repeats_last() {
        let mut state = GameState::new(1, Tuning::default());
        let wave_count = state.tuning.waves.len() as u32;
        assert!(wave_count >= 2);

        state.wave_index = wave_count;
        let last = state.current_wave_config().unwrap().clone();
        state.wave_index = wave_count + 5;
        assert_eq!(state.current_wave_config().unwrap(), &last);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(1, Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
