//! Collision resolution: four ordered passes over the live entities
//!
//! Passes run in a fixed order each frame: player fire against enemies,
//! enemy fire against the player, body contact, then pickup collection.
//! Nothing is removed mid-pass; hits flip `alive` off and the caller's
//! cleanup compacts the containers afterwards.

use glam::Vec2;
use rand::Rng;

use crate::collide::{mask_collide, rects_collide};
use crate::entities::{Bullet, Enemy, LaserBeam, ParticleSystem, Pickup, PickupKind, Player};
use crate::events::{EventQueue, FrameEvent, SoundCue};
use crate::tuning::Tuning;

/// Contact damage is asymmetric: ramming hurts the player more than the enemy
const BODY_DAMAGE_TO_PLAYER: i32 = 10;
const BODY_DAMAGE_TO_ENEMY: i32 = 5;
/// Knockback impulse applied to the player on body contact (px per frame)
const BODY_REPULSION: f32 = 5.0;

/// Hits at or above this damage also rattle the camera
const HEAVY_HIT_DAMAGE: i32 = 30;

const PICKUP_DROP_CHANCE: f64 = 0.10;

/// Score and kill tally produced by one resolution frame
#[derive(Debug, Default, Clone, Copy)]
pub struct CollisionOutcome {
    pub score_gained: i64,
    pub kills: u32,
}

#[allow(clippy::too_many_arguments)]
pub fn resolve(
    player: &mut Player,
    enemies: &mut [Enemy],
    player_bullets: &mut [Bullet],
    enemy_bullets: &mut [Bullet],
    laser: &mut LaserBeam,
    pickups: &mut Vec<Pickup>,
    particles: &mut ParticleSystem,
    events: &mut EventQueue,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    player_fire_pass(
        player,
        enemies,
        player_bullets,
        laser,
        pickups,
        particles,
        events,
        tuning,
        rng,
        &mut outcome,
    );
    enemy_fire_pass(player, enemy_bullets, particles, events, rng);
    body_contact_pass(
        player, enemies, pickups, particles, events, tuning, rng, &mut outcome,
    );
    pickup_pass(player, pickups, events);

    outcome
}

#[allow(clippy::too_many_arguments)]
fn player_fire_pass(
    player: &mut Player,
    enemies: &mut [Enemy],
    player_bullets: &mut [Bullet],
    laser: &mut LaserBeam,
    pickups: &mut Vec<Pickup>,
    particles: &mut ParticleSystem,
    events: &mut EventQueue,
    tuning: &Tuning,
    rng: &mut impl Rng,
    outcome: &mut CollisionOutcome,
) {
    for bullet in player_bullets.iter_mut().filter(|b| b.alive) {
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if !mask_collide(&bullet.mask, bullet.pos, &enemy.mask, enemy.pos) {
                continue;
            }
            bullet.alive = false;
            particles.create_explosion(rng, bullet.pos, enemy.color, 2.0, 8);
            if bullet.damage >= HEAVY_HIT_DAMAGE {
                events.shake(3.0);
            }
            if damage_enemy(enemy, bullet.damage) {
                settle_kill(enemy, player, pickups, particles, events, tuning, rng, outcome);
            }
            break;
        }
    }

    // The laser damages everything it crosses, but only on its pulse ticks
    // so the DPS stays frame-rate independent.
    if laser.try_pulse() {
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if !mask_collide(&laser.mask, laser.pos, &enemy.mask, enemy.pos) {
                continue;
            }
            particles.create_sparkle(rng, enemy.pos, enemy.color);
            if damage_enemy(enemy, laser.damage) {
                settle_kill(enemy, player, pickups, particles, events, tuning, rng, outcome);
            }
        }
    }
}

fn enemy_fire_pass(
    player: &mut Player,
    enemy_bullets: &mut [Bullet],
    particles: &mut ParticleSystem,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) {
    for bullet in enemy_bullets.iter_mut().filter(|b| b.alive) {
        if !mask_collide(&bullet.mask, bullet.pos, &player.mask, player.pos) {
            continue;
        }
        // The bullet is spent on contact either way; `take_damage` is a
        // no-op while the invulnerability window is open.
        bullet.alive = false;
        player.take_damage(bullet.damage);
        particles.create_explosion(rng, bullet.pos, [255, 100, 100], 2.0, 10);
        events.shake(6.0);
        events.sound(SoundCue::PlayerHit);
    }
}

#[allow(clippy::too_many_arguments)]
fn body_contact_pass(
    player: &mut Player,
    enemies: &mut [Enemy],
    pickups: &mut Vec<Pickup>,
    particles: &mut ParticleSystem,
    events: &mut EventQueue,
    tuning: &Tuning,
    rng: &mut impl Rng,
    outcome: &mut CollisionOutcome,
) {
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        if !mask_collide(&player.mask, player.pos, &enemy.mask, enemy.pos) {
            continue;
        }
        // Only the player's damage intake is gated by i-frames, inside
        // `take_damage`; the shove and the enemy's share of the crash
        // always land, so overlap cannot re-trigger every frame.
        player.take_damage(BODY_DAMAGE_TO_PLAYER);
        let away = (player.pos - enemy.pos).normalize_or(Vec2::NEG_Y);
        player.vel += away * BODY_REPULSION;
        particles.create_explosion(rng, (player.pos + enemy.pos) / 2.0, enemy.color, 3.0, 15);
        events.shake(8.0);
        events.sound(SoundCue::PlayerHit);
        if damage_enemy(enemy, BODY_DAMAGE_TO_ENEMY) {
            settle_kill(enemy, player, pickups, particles, events, tuning, rng, outcome);
        }
    }
}

fn pickup_pass(player: &mut Player, pickups: &mut Vec<Pickup>, events: &mut EventQueue) {
    for pickup in pickups.iter_mut().filter(|p| p.alive) {
        if !rects_collide(pickup.pos, pickup.size, player.pos, player.size()) {
            continue;
        }
        pickup.alive = false;
        let levels = pickup.apply(player);
        events.sound(SoundCue::PickupCollected);
        if levels > 0 {
            events.push(FrameEvent::LevelUp {
                level: player.level,
            });
            events.sound(SoundCue::LevelUp);
        }
    }
}

/// Apply damage; true when this hit is the one that killed the enemy.
fn damage_enemy(enemy: &mut Enemy, amount: i32) -> bool {
    let was_alive = enemy.alive;
    enemy.take_damage(amount);
    was_alive && !enemy.alive
}

/// Score, experience, effects, and a possible pickup drop for one kill.
#[allow(clippy::too_many_arguments)]
fn settle_kill(
    enemy: &Enemy,
    player: &mut Player,
    pickups: &mut Vec<Pickup>,
    particles: &mut ParticleSystem,
    events: &mut EventQueue,
    tuning: &Tuning,
    rng: &mut impl Rng,
    outcome: &mut CollisionOutcome,
) {
    outcome.score_gained += enemy.score_value;
    outcome.kills += 1;

    let exp = (enemy.score_value as f32 * tuning.progression.exp_per_score) as i32;
    let levels = player.add_experience(exp);
    if levels > 0 {
        events.push(FrameEvent::LevelUp {
            level: player.level,
        });
        events.sound(SoundCue::LevelUp);
    }

    particles.create_explosion(rng, enemy.pos, enemy.color, 3.0, 30);
    events.push(FrameEvent::EnemyDestroyed {
        score_value: enemy.score_value,
        pos: enemy.pos,
    });
    events.sound(SoundCue::Explosion);
    events.shake(5.0);

    if rng.random_bool(PICKUP_DROP_CHANCE) {
        let kind = match rng.random_range(0.0..1.0f32) {
            r if r < 0.3 => PickupKind::Health,
            r if r < 0.6 => PickupKind::Shield,
            _ => PickupKind::Experience,
        };
        pickups.push(Pickup::new(kind, enemy.pos));
    }
}
