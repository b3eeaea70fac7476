//! Enemy ships: per-type stat blocks and per-frame behavior dispatch
//!
//! Each enemy is built from an immutable type config scaled by the wave's
//! `DifficultyProfile`. The behavior tag is fixed at construction and
//! matched in exactly one place per frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collide::Mask;
use crate::consts::{FRAME_SCALE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::timer::{Cooldown, Countdown};
use crate::tuning::DifficultyProfile;

/// Horizontal corridor within which enemies take shots at the player
const FIRING_CORRIDOR: f32 = 100.0;

/// Closed set of enemy classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    Scout,
    Fighter,
    Bomber,
    Elite,
}

/// Closed set of motion strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Constant downward drift
    Straight,
    /// Downward drift with sine-wave weave
    Sinusoidal,
    /// Descend to altitude, then orbit a screen-center point
    Circle,
    /// Drift toward the player, then burst at double speed
    Charge,
}

/// Immutable per-type stat block (before difficulty scaling)
#[derive(Debug, Clone, Copy)]
pub struct EnemyConfig {
    pub size: Vec2,
    pub color: [u8; 3],
    pub health: i32,
    /// px per reference frame
    pub speed: f32,
    pub damage: i32,
    /// Seconds between shots
    pub fire_rate: f32,
    pub score_value: i64,
    pub behavior: EnemyBehavior,
}

impl EnemyType {
    pub fn config(&self) -> EnemyConfig {
        match self {
            EnemyType::Scout => EnemyConfig {
                size: Vec2::new(30.0, 30.0),
                color: [255, 100, 100],
                health: 40,
                speed: 3.0,
                damage: 15,
                fire_rate: 2.0,
                score_value: 10,
                behavior: EnemyBehavior::Straight,
            },
            EnemyType::Fighter => EnemyConfig {
                size: Vec2::new(45.0, 45.0),
                color: [255, 50, 50],
                health: 80,
                speed: 2.5,
                damage: 25,
                fire_rate: 1.5,
                score_value: 25,
                behavior: EnemyBehavior::Sinusoidal,
            },
            EnemyType::Bomber => EnemyConfig {
                size: Vec2::new(60.0, 60.0),
                color: [200, 50, 50],
                health: 150,
                speed: 1.5,
                damage: 40,
                fire_rate: 3.0,
                score_value: 50,
                behavior: EnemyBehavior::Straight,
            },
            EnemyType::Elite => EnemyConfig {
                size: Vec2::new(50.0, 50.0),
                color: [255, 20, 147],
                health: 200,
                speed: 2.0,
                damage: 35,
                fire_rate: 1.0,
                score_value: 100,
                behavior: EnemyBehavior::Circle,
            },
        }
    }

    /// Sprite silhouette used for the collision mask
    fn silhouette(&self) -> Vec<Vec2> {
        let Vec2 { x: w, y: h } = self.config().size;
        match self {
            // Diamond
            EnemyType::Scout => vec![
                Vec2::new(w / 2.0, 0.0),
                Vec2::new(w, h / 2.0),
                Vec2::new(w / 2.0, h),
                Vec2::new(0.0, h / 2.0),
            ],
            // Arrowhead
            EnemyType::Fighter => vec![
                Vec2::new(w / 2.0, 0.0),
                Vec2::new(w, h / 3.0),
                Vec2::new(w * 2.0 / 3.0, h),
                Vec2::new(w / 3.0, h),
                Vec2::new(0.0, h / 3.0),
            ],
            // Wide hex hull
            EnemyType::Bomber => vec![
                Vec2::new(w / 4.0, 0.0),
                Vec2::new(w * 3.0 / 4.0, 0.0),
                Vec2::new(w, h / 2.0),
                Vec2::new(w * 3.0 / 4.0, h),
                Vec2::new(w / 4.0, h),
                Vec2::new(0.0, h / 2.0),
            ],
            // Five-point star
            EnemyType::Elite => {
                let c = Vec2::new(w / 2.0, h / 2.0);
                let mut points = Vec::with_capacity(10);
                for i in 0..5 {
                    let outer = std::f32::consts::FRAC_PI_2
                        + i as f32 * std::f32::consts::TAU / 5.0;
                    points.push(c + Vec2::new(outer.cos() * w / 2.0, outer.sin() * h / 2.0));
                    let inner = outer + std::f32::consts::PI / 5.0;
                    points.push(c + Vec2::new(inner.cos() * w / 4.0, inner.sin() * h / 4.0));
                }
                points
            }
        }
    }
}

/// A hostile ship
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub enemy_type: EnemyType,
    pub behavior: EnemyBehavior,
    pub pos: Vec2,
    /// px per reference frame
    pub vel: Vec2,
    pub size: Vec2,
    pub color: [u8; 3],

    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub score_value: i64,
    base_speed: f32,

    /// Behavior-local clock (sine phase, orbit angle, charge cycle)
    behavior_timer: f32,
    /// Multi-stage behaviors advance through phases (Circle: descend, orbit)
    phase: u8,
    shot_cooldown: Cooldown,
    pub hit_flash: Countdown,
    pub alive: bool,

    pub mask: Mask,
}

/// A shot requested by an enemy this frame
#[derive(Debug, Clone, Copy)]
pub struct EnemyShot {
    pub pos: Vec2,
    pub damage: i32,
}

impl Enemy {
    pub fn new(
        id: u32,
        enemy_type: EnemyType,
        pos: Vec2,
        profile: DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Self {
        Self::with_behavior(id, enemy_type, enemy_type.config().behavior, pos, profile, rng)
    }

    /// Construct with an overridden behavior (spawn patterns promote some
    /// ships to Charge at higher waves).
    pub fn with_behavior(
        id: u32,
        enemy_type: EnemyType,
        behavior: EnemyBehavior,
        pos: Vec2,
        profile: DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Self {
        let config = enemy_type.config();
        let health = profile.scale_health(config.health);
        let speed = profile.scale_speed(config.speed);
        // Jitter the first shot so formation salvos desynchronize
        let jitter = rng.random_range(0.0..config.fire_rate);
        Self {
            id,
            enemy_type,
            behavior,
            pos,
            vel: Vec2::new(0.0, speed),
            size: config.size,
            color: config.color,
            health,
            max_health: health,
            damage: profile.scale_damage(config.damage),
            score_value: config.score_value,
            base_speed: speed,
            behavior_timer: 0.0,
            phase: 0,
            shot_cooldown: Cooldown::with_remaining(config.fire_rate, jitter),
            hit_flash: Countdown::new(0.2),
            alive: true,
            mask: Mask::from_polygon(
                config.size.x as u32,
                config.size.y as u32,
                &enemy_type.silhouette(),
            ),
        }
    }

    /// Advance behavior, integrate position, and maybe request a shot.
    pub fn update(&mut self, dt: f32, player_pos: Vec2) -> Option<EnemyShot> {
        self.behavior_timer += dt;
        self.step_behavior(dt, player_pos);

        self.pos += self.vel * FRAME_SCALE * dt;
        self.hit_flash.tick(dt);
        self.shot_cooldown.tick(dt);

        self.try_shoot(player_pos)
    }

    fn step_behavior(&mut self, _dt: f32, player_pos: Vec2) {
        match self.behavior {
            EnemyBehavior::Straight => {
                self.vel = Vec2::new(0.0, self.base_speed);
            }
            EnemyBehavior::Sinusoidal => {
                self.vel.y = self.base_speed;
                self.vel.x = (self.behavior_timer * 2.0).sin() * 3.0;
            }
            EnemyBehavior::Circle => {
                let orbit_altitude = SCREEN_HEIGHT * 0.3;
                if self.phase == 0 {
                    if self.pos.y < orbit_altitude {
                        self.vel = Vec2::new(0.0, self.base_speed);
                    } else {
                        self.phase = 1;
                        self.behavior_timer = 0.0;
                    }
                } else {
                    // Orbit: position is driven directly, not integrated
                    let radius = 100.0;
                    let angle = self.behavior_timer * 1.0;
                    self.pos.x = SCREEN_WIDTH / 2.0 + angle.cos() * radius;
                    self.pos.y = orbit_altitude + angle.sin() * radius * 0.5;
                    self.vel = Vec2::ZERO;
                }
            }
            EnemyBehavior::Charge => {
                if self.behavior_timer < 2.0 {
                    self.vel.y = self.base_speed * 0.5;
                    let to_player = player_pos - self.pos;
                    if to_player.length_squared() > 0.0 {
                        self.vel.x = to_player.normalize().x * 1.5;
                    }
                } else {
                    let to_player = player_pos - self.pos;
                    if to_player.length_squared() > 0.0 {
                        self.vel = to_player.normalize() * self.base_speed * 2.0;
                    }
                    self.behavior_timer = 0.0;
                }
            }
        }
    }

    /// Fire only when the player sits in the corridor below this ship.
    fn try_shoot(&mut self, player_pos: Vec2) -> Option<EnemyShot> {
        let in_corridor = (player_pos.x - self.pos.x).abs() < FIRING_CORRIDOR;
        let below = player_pos.y > self.pos.y;
        if in_corridor && below && self.shot_cooldown.fire() {
            Some(EnemyShot {
                pos: Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0),
                damage: self.damage,
            })
        } else {
            None
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
        self.hit_flash.start();
        if self.health <= 0 {
            self.alive = false;
        }
    }

    /// Removal past the bottom edge is unconditional, whatever the health.
    pub fn past_bottom(&self) -> bool {
        self.pos.y - self.size.y / 2.0 > SCREEN_HEIGHT
    }
}
