//! Hop Survivors - a top-down survival shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (locomotion, waves, combat, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player collision radius (world units)
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Enemy collision radius
    pub const ENEMY_RADIUS: f32 = 0.5;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 0.15;
    /// Boost pickup collection radius
    pub const BOOST_RADIUS: f32 = 0.6;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Linear interpolation from `a` to `b` by `t ∈ [0, 1]`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

/// Smoothstep easing on [0, 1]
#[inline]
pub fn smooth01(x: f32) -> f32 {
    let x = clamp01(x);
    x * x * (3.0 - 2.0 * x)
}

/// Move `current` toward `target` by at most `max_delta`, without overshoot
#[inline]
pub fn move_toward(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist < 1e-6 {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Rotate unit vector `from` toward unit vector `to` by at most `max_angle` radians
///
/// Both inputs are assumed normalized; the result stays normalized. Used for
/// bounded direction drift (air-strafing) where snapping is not allowed.
pub fn rotate_toward(from: Vec2, to: Vec2, max_angle: f32) -> Vec2 {
    if to.length_squared() < 1e-6 || from.length_squared() < 1e-6 {
        return from;
    }
    let angle = from.angle_to(to);
    if angle.abs() <= max_angle {
        to
    } else {
        Vec2::from_angle(max_angle.copysign(angle)).rotate(from)
    }
}
