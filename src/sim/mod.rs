//! Deterministic simulation core
//!
//! All gameplay logic runs on a fixed timestep with a seeded RNG so the same
//! seed and input script always reproduce the same run. Nothing in here knows
//! about rendering or platform; the sim is a pure state machine driven by
//! `tick::tick`.

pub mod clock;
pub mod combat;
pub mod locomotion;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;

pub use clock::GameClock;
pub use combat::{DamageOutcome, Vitals};
pub use locomotion::{Locomotion, LocomotionState, LocomotionTuning};
pub use spawn::{SpawnTuning, Spawner, spawn_interval};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use wave::{EnemyArchetype, EnemyBehavior, EnemyEntry, WaveConfig, pick_weighted};
