//! Health, invulnerability windows, and idempotent death
//!
//! Every combat-capable entity owns a `Vitals`. Damage application is gated by
//! a per-target invulnerability timestamp, and the health-crosses-zero
//! transition fires exactly once: the caller awards score only on the single
//! `Killed` outcome, so double collision events in one tick cannot
//! double-count.

/// Result of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerability window active or target already dead; nothing changed
    Blocked,
    /// Health reduced, target still alive
    Hit,
    /// Health crossed zero on this call; fires at most once per entity
    Killed,
}

/// Per-entity combat state: health plus the invulnerability gate
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Clock time before which further damage is blocked
    pub next_damage_allowed_at: f32,
    dead: bool,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            next_damage_allowed_at: 0.0,
            dead: false,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Apply `amount` damage at clock time `now`.
    ///
    /// A successful hit arms the invulnerability gate for `invuln_duration`
    /// seconds; pass 0.0 for interactions that don't grant one (projectile
    /// hits on enemies). Dead targets always report `Blocked` so death side
    /// effects cannot re-fire.
    pub fn apply_damage(&mut self, amount: f32, now: f32, invuln_duration: f32) -> DamageOutcome {
        if self.dead || now < self.next_damage_allowed_at {
            return DamageOutcome::Blocked;
        }

        self.health -= amount;
        if invuln_duration > 0.0 {
            self.next_damage_allowed_at = now + invuln_duration;
        }

        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hit
        }
    }

    /// Restore health, clamped to `max_health`. No effect on the dead.
    pub fn heal(&mut self, amount: f32) {
        if self.dead {
            return;
        }
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invuln_window_blocks_second_hit() {
        let mut vitals = Vitals::new(100.0);
        assert_eq!(vitals.apply_damage(10.0, 1.0, 5.0), DamageOutcome::Hit);
        assert_eq!(vitals.apply_damage(10.0, 3.0, 5.0), DamageOutcome::Blocked);
        assert_eq!(vitals.health, 90.0);
        // Window expires at 6.0
        assert_eq!(vitals.apply_damage(10.0, 6.0, 5.0), DamageOutcome::Hit);
        assert_eq!(vitals.health, 80.0);
    }

    #[test]
    fn test_zero_invuln_allows_rapid_hits() {
        let mut vitals = Vitals::new(100.0);
        assert_eq!(vitals.apply_damage(10.0, 1.0, 0.0), DamageOutcome::Hit);
        assert_eq!(vitals.apply_damage(10.0, 1.0, 0.0), DamageOutcome::Hit);
        assert_eq!(vitals.health, 80.0);
    }

    #[test]
    fn test_killed_fires_exactly_once() {
        let mut vitals = Vitals::new(20.0);
        assert_eq!(vitals.apply_damage(25.0, 1.0, 0.0), DamageOutcome::Killed);
        assert!(vitals.is_dead());
        assert_eq!(vitals.health, 0.0);
        // Erroneous second invocation on the corpse must not re-report
        assert_eq!(vitals.apply_damage(25.0, 2.0, 0.0), DamageOutcome::Blocked);
        assert_eq!(vitals.apply_damage(25.0, 99.0, 0.0), DamageOutcome::Blocked);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut vitals = Vitals::new(100.0);
        vitals.apply_damage(30.0, 1.0, 0.0);
        vitals.heal(50.0);
        assert_eq!(vitals.health, 100.0);

        vitals.heal(-10.0);
        assert_eq!(vitals.health, 100.0);
    }

    #[test]
    fn test_heal_does_not_resurrect() {
        let mut vitals = Vitals::new(10.0);
        vitals.apply_damage(10.0, 1.0, 0.0);
        vitals.heal(50.0);
        assert!(vitals.is_dead());
        assert_eq!(vitals.health, 0.0);
    }
}
