//! Fixed timestep simulation tick
//!
//! Advances one logical physics step in a fixed order: input snapshot ->
//! locomotion advance -> movement integration -> enemy steering -> projectile
//! flight -> collision resolution -> death/score processing -> wave rotation
//! and spawning -> boost drops. Collision resolution always reads the
//! positions produced by this tick's integration.

use glam::Vec2;
use rand::Rng;

use super::combat::DamageOutcome;
use super::spawn::Spawner;
use super::state::{Boost, BoostKind, GamePhase, GameState, Projectile, ProjectileOwner};
use super::wave::{EnemyBehavior, pick_weighted};
use crate::consts::*;

/// Polled input snapshot for a single tick (deterministic)
///
/// The raw directional vector is expected in [-1, 1]² with dead-zone handling
/// already applied upstream; the locomotion machine re-clamps defensively.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw movement direction from stick/keys
    pub move_dir: Vec2,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    state.clock.advance(dt as f64);
    let now = state.clock.elapsed_f32();

    // --- Wave rotation ---
    // The old spawner (and its pending timer) is discarded wholesale.
    if now >= state.next_wave_at {
        start_next_wave(state, now);
    }

    // --- Locomotion advance + player integration ---
    // The state machine's output is the sole movement input to integration.
    let movement = state
        .player
        .locomotion
        .update(input.move_dir, dt, &mut state.rng);
    state.player.vel = movement * state.tuning.player.top_speed;
    let delta = state.player.vel * dt;
    state.player.pos += delta;

    // --- Player auto-attack ---
    if now >= state.player.next_attack_at {
        let player_pos = state.player.pos;
        let radius = state.tuning.player.detection_radius;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.pos.distance_squared(player_pos) <= radius * radius)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player_pos)
                    .partial_cmp(&b.pos.distance_squared(player_pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos);

        if let Some(enemy_pos) = target {
            let dir = (enemy_pos - player_pos).normalize_or_zero();
            if dir != Vec2::ZERO {
                let id = state.next_entity_id();
                state.projectiles.push(Projectile {
                    id,
                    owner: ProjectileOwner::Player,
                    pos: player_pos,
                    vel: dir * state.tuning.player.projectile_speed,
                    damage: state.player.attack_damage,
                    expires_at: now + state.tuning.player.projectile_lifetime,
                });
                state.player.next_attack_at = now + state.tuning.player.attack_cooldown;
            }
        }
    }

    // --- Enemy steering and integration ---
    let mut enemy_shots: Vec<Projectile> = Vec::new();
    let player_pos = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        let to_player = player_pos - enemy.pos;
        let dist = to_player.length();
        if dist < 1e-4 {
            continue;
        }
        let dir = to_player / dist;

        let target_vel = match enemy.archetype.behavior {
            EnemyBehavior::Chaser => dir * enemy.archetype.speed,
            EnemyBehavior::Shooter {
                stop_distance,
                fire_rate,
                projectile_speed,
                projectile_damage,
                projectile_lifetime,
            } => {
                if dist <= stop_distance {
                    if fire_rate > 0.0 && now >= enemy.next_shot_at {
                        enemy.next_shot_at = now + 1.0 / fire_rate;
                        enemy_shots.push(Projectile {
                            id: 0, // assigned below; ids come from the state
                            owner: ProjectileOwner::Enemy,
                            pos: enemy.pos,
                            vel: dir * projectile_speed,
                            damage: projectile_damage,
                            expires_at: now + projectile_lifetime,
                        });
                    }
                    Vec2::ZERO
                } else {
                    dir * enemy.archetype.speed
                }
            }
        };

        enemy.vel = crate::move_toward(enemy.vel, target_vel, enemy.archetype.acceleration * dt);
        enemy.pos += enemy.vel * dt;
    }
    for mut shot in enemy_shots {
        shot.id = state.next_entity_id();
        state.projectiles.push(shot);
    }

    // --- Projectile flight ---
    for projectile in state.projectiles.iter_mut() {
        projectile.pos += projectile.vel * dt;
    }
    state.projectiles.retain(|p| now < p.expires_at);

    // --- Collision resolution ---
    resolve_collisions(state, now);

    // --- Death processing ---
    // Score was credited at the single Killed transition; the dead are only
    // swept out here.
    state.enemies.retain(|e| !e.vitals.is_dead());

    if state.player.vitals.is_dead() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "game over at {:.1}s, score {}",
            state.clock.elapsed(),
            state.clock.score()
        );
        return;
    }

    // --- Spawning ---
    let due = match state.spawner.as_mut() {
        Some(spawner) => spawner.poll(now),
        None => false,
    };
    if due {
        try_spawn_enemy(state, now);
    }

    // --- Boost drops ---
    if now >= state.next_boost_at {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let pos = state.player.pos + Vec2::from_angle(angle) * state.tuning.boosts.spawn_distance;
        let id = state.next_entity_id();
        state.boosts.push(Boost {
            id,
            kind: BoostKind::Health(state.tuning.boosts.heal_amount),
            pos,
            expires_at: now + state.tuning.boosts.lifetime,
        });
        state.next_boost_at = now + state.tuning.boosts.spawn_interval;
    }
    state.boosts.retain(|b| now < b.expires_at);
}

/// Begin the next wave: pick its config and replace the active spawner.
fn start_next_wave(state: &mut GameState, now: f32) {
    state.wave_index += 1;
    let spawn_tuning = state
        .current_wave_config()
        .and_then(|c| c.spawner_override.clone())
        .unwrap_or_else(|| state.tuning.spawner.clone());

    state.spawner = Some(Spawner::new(spawn_tuning, now));
    state.next_wave_at =
        now + state.tuning.wave_interval_seconds + state.tuning.pre_wave_countdown_seconds;
    log::info!("wave {} started at {:.1}s", state.wave_index, now);
}

/// Weighted pick over the current wave's eligible entries, then instantiate.
fn try_spawn_enemy(state: &mut GameState, now: f32) {
    let Some(spawner) = state.spawner.as_ref() else {
        return;
    };
    let elapsed_in_wave = spawner.elapsed_in_wave(now);
    let spawn_distance = spawner.tuning.spawn_distance;

    if state.wave_index == 0 || state.tuning.waves.is_empty() {
        return;
    }
    let idx = (state.wave_index as usize - 1).min(state.tuning.waves.len() - 1);
    let entries = &state.tuning.waves[idx].entries;

    // Empty eligible set is a silent no-spawn, not an error
    let Some(entry) = pick_weighted(entries, elapsed_in_wave, &mut state.rng) else {
        return;
    };
    let archetype = entry.archetype.clone();

    // Random direction on a circle around the player
    let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
    let pos = state.player.pos + Vec2::from_angle(angle) * spawn_distance;

    log::debug!("spawning {} at {:.1}s into wave", archetype.name, elapsed_in_wave);
    state.spawn_enemy(archetype, pos);
}

/// Resolve this tick's contacts: projectiles, enemy contact, boost pickup.
///
/// All damage flows through `Vitals::apply_damage`; kill score is awarded at
/// the single `Killed` outcome so concurrent contacts in the same tick can
/// never double-count.
fn resolve_collisions(state: &mut GameState, now: f32) {
    let contact_invuln = state.tuning.combat.contact_invuln_duration;

    // Projectiles against their targets
    let mut consumed: Vec<u32> = Vec::new();
    for i in 0..state.projectiles.len() {
        let (owner, pos, damage) = {
            let p = &state.projectiles[i];
            (p.owner, p.pos, p.damage)
        };
        match owner {
            ProjectileOwner::Player => {
                let hit_radius = PROJECTILE_RADIUS + ENEMY_RADIUS;
                let mut hit = None;
                for enemy in state.enemies.iter_mut() {
                    if enemy.vitals.is_dead() {
                        continue;
                    }
                    if enemy.pos.distance_squared(pos) <= hit_radius * hit_radius {
                        // No per-target invulnerability for projectile hits
                        let outcome = enemy.vitals.apply_damage(damage, now, 0.0);
                        if outcome == DamageOutcome::Killed {
                            state.clock.award(enemy.archetype.score_value);
                            log::debug!("{} destroyed (+{})", enemy.archetype.name, enemy.archetype.score_value);
                        }
                        hit = Some(enemy.id);
                        break;
                    }
                }
                if hit.is_some() {
                    consumed.push(state.projectiles[i].id);
                }
            }
            ProjectileOwner::Enemy => {
                let hit_radius = PROJECTILE_RADIUS + PLAYER_RADIUS;
                if state.player.pos.distance_squared(pos) <= hit_radius * hit_radius {
                    // Shares the contact invulnerability gate on the player
                    state
                        .player
                        .vitals
                        .apply_damage(damage, now, contact_invuln);
                    consumed.push(state.projectiles[i].id);
                }
            }
        }
    }
    state.projectiles.retain(|p| !consumed.contains(&p.id));

    // Enemy bodies against the player
    let contact_radius = PLAYER_RADIUS + ENEMY_RADIUS;
    let player_pos = state.player.pos;
    for enemy in state.enemies.iter() {
        if enemy.vitals.is_dead() {
            continue;
        }
        if enemy.pos.distance_squared(player_pos) <= contact_radius * contact_radius {
            state
                .player
                .vitals
                .apply_damage(enemy.archetype.contact_damage, now, contact_invuln);
        }
    }

    // Boost pickup
    let pickup_radius = PLAYER_RADIUS + BOOST_RADIUS;
    let mut collected: Vec<u32> = Vec::new();
    for boost in state.boosts.iter() {
        if boost.pos.distance_squared(player_pos) <= pickup_radius * pickup_radius {
            match boost.kind {
                BoostKind::Health(amount) => state.player.vitals.heal(amount),
            }
            collected.push(boost.id);
        }
    }
    state.boosts.retain(|b| !collected.contains(&b.id));
}
