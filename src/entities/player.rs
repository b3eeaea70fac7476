//! Player ship: momentum movement, shield-before-health damage, RPG
//! progression (experience, levels, skill-point upgrades)

use glam::Vec2;

use crate::collide::Mask;
use crate::consts::{FRAME_SCALE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::particle::ParticleSystem;
use crate::timer::{Cooldown, Countdown};
use crate::tuning::{Tuning, UpgradeKind};

/// Sprite dimensions of the player ship
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 60.0;

/// Directional input flags for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct DirInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirInput {
    /// Unit (or zero) movement vector; diagonals are normalized.
    pub fn vector(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v.normalize_or_zero()
    }
}

/// The player-controlled ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Velocity in px per reference frame
    pub vel: Vec2,
    pub speed: f32,
    drag: f32,

    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub max_shield: i32,
    pub damage: i32,

    pub level: u32,
    pub experience: i32,
    pub experience_to_level: i32,
    pub skill_points: u32,

    fire_cooldown: Cooldown,
    pub missile_cooldown: Cooldown,
    invulnerability: Countdown,
    pub hit_flash: Countdown,
    /// Runs after a hit; shield only regenerates once it expires
    regen_grace: Countdown,
    regen_accum: f32,
    trail_accum: f32,

    base_exp: i32,
    level_multiplier: f32,
    regen_amount: i32,

    pub mask: Mask,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let p = &tuning.player;
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 80.0),
            vel: Vec2::ZERO,
            speed: p.speed,
            drag: p.drag,
            health: p.max_health,
            max_health: p.max_health,
            shield: p.max_shield,
            max_shield: p.max_shield,
            damage: tuning.bullet.damage,
            level: 1,
            experience: 0,
            experience_to_level: tuning.progression.level_up_exp,
            skill_points: 0,
            fire_cooldown: Cooldown::new(p.fire_rate),
            missile_cooldown: Cooldown::new(p.missile_cooldown),
            invulnerability: Countdown::new(p.invulnerability),
            hit_flash: Countdown::new(0.3),
            regen_grace: Countdown::new(p.shield_regen_delay),
            regen_accum: 0.0,
            trail_accum: 0.0,
            base_exp: tuning.progression.level_up_exp,
            level_multiplier: tuning.progression.level_up_multiplier,
            regen_amount: p.shield_regen_amount,
            mask: ship_mask(),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Tip of the ship, where bullets spawn
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - PLAYER_HEIGHT / 2.0)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn invulnerable(&self) -> bool {
        self.invulnerability.active()
    }

    /// Accelerate toward the input direction with drag-based momentum.
    pub fn handle_input(&mut self, input: DirInput) {
        let dir = input.vector();
        self.vel += dir * self.speed * 0.5;
        self.vel *= self.drag;
        if self.vel.length() > self.speed {
            self.vel = self.vel.normalize() * self.speed;
        }
    }

    /// Integrate position, advance timers, regenerate shield, emit engine
    /// trail while moving.
    pub fn update(&mut self, dt: f32, particles: &mut ParticleSystem, rng: &mut impl rand::Rng) {
        self.pos += self.vel * FRAME_SCALE * dt;

        // Keep the ship fully on screen
        let half = self.size() / 2.0;
        self.pos.x = self.pos.x.clamp(half.x, SCREEN_WIDTH - half.x);
        self.pos.y = self.pos.y.clamp(half.y, SCREEN_HEIGHT - half.y);

        self.invulnerability.tick(dt);
        self.hit_flash.tick(dt);
        self.regen_grace.tick(dt);

        if !self.regen_grace.active() && self.shield < self.max_shield {
            self.regen_accum += dt;
            while self.regen_accum >= 1.0 {
                self.shield = (self.shield + self.regen_amount).min(self.max_shield);
                self.regen_accum -= 1.0;
            }
        }

        // Engine trail at the tail while moving
        if self.vel.length() > 0.1 {
            self.trail_accum += dt;
            if self.trail_accum >= 0.05 {
                let tail = Vec2::new(self.pos.x, self.pos.y + half.y);
                particles.create_trail(rng, tail, particle_palette::ENGINE, 3);
                self.trail_accum = 0.0;
            }
        }
    }

    /// Rate-limited; returns the muzzle position when a shot comes out.
    pub fn try_shoot(&mut self) -> Option<Vec2> {
        if self.fire_cooldown.fire() {
            Some(self.nose())
        } else {
            None
        }
    }

    pub fn tick_weapons(&mut self, dt: f32) {
        self.fire_cooldown.tick(dt);
        self.missile_cooldown.tick(dt);
    }

    /// Shield absorbs first; any remainder reduces health. A no-op while
    /// invulnerable. Taking damage restarts both the invulnerability window
    /// and the shield-regen grace period.
    pub fn take_damage(&mut self, amount: i32) {
        if self.invulnerability.active() {
            return;
        }
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        let remainder = amount - absorbed;
        if remainder > 0 {
            self.health = (self.health - remainder).max(0);
            self.hit_flash.start();
        }
        self.invulnerability.start();
        self.regen_grace.start();
        self.regen_accum = 0.0;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn restore_shield(&mut self, amount: i32) {
        self.shield = (self.shield + amount).min(self.max_shield);
    }

    /// Accumulate experience; returns how many levels were gained.
    pub fn add_experience(&mut self, amount: i32) -> u32 {
        self.experience += amount;
        let mut levels = 0;
        while self.experience >= self.experience_to_level {
            self.experience -= self.experience_to_level;
            self.level_up();
            levels += 1;
        }
        levels
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.skill_points += 1;
        self.experience_to_level = (self.base_exp as f32
            * self.level_multiplier.powi(self.level as i32 - 1))
            as i32;
        // Leveling fully restores the ship
        self.health = self.max_health;
        self.shield = self.max_shield;
        log::info!("level up -> {} (next at {} xp)", self.level, self.experience_to_level);
    }

    /// Spend one skill point on a stat upgrade. Fails without points.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if self.skill_points == 0 {
            return false;
        }
        let m = kind.multiplier();
        match kind {
            UpgradeKind::Damage => self.damage = (self.damage as f32 * m) as i32,
            UpgradeKind::FireRate => {
                let period = (self.fire_cooldown.period() * m).max(0.05);
                self.fire_cooldown.set_period(period);
            }
            UpgradeKind::Health => {
                self.max_health = (self.max_health as f32 * m) as i32;
                self.health = self.max_health;
            }
            UpgradeKind::Shield => {
                self.max_shield = (self.max_shield as f32 * m) as i32;
                self.shield = self.max_shield;
            }
            UpgradeKind::Speed => self.speed *= m,
        }
        self.skill_points -= 1;
        true
    }

    /// Current fire interval (exposed for the HUD)
    pub fn fire_rate(&self) -> f32 {
        self.fire_cooldown.period()
    }

    /// Shield charge as a [0,1] ratio; 0 when max_shield is 0.
    pub fn shield_ratio(&self) -> f32 {
        if self.max_shield <= 0 {
            0.0
        } else {
            self.shield as f32 / self.max_shield as f32
        }
    }
}

/// Triangular hull silhouette, nose up
fn ship_mask() -> Mask {
    let points = [
        Vec2::new(PLAYER_WIDTH / 2.0, 0.0),
        Vec2::new(0.0, PLAYER_HEIGHT),
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
    ];
    Mask::from_polygon(PLAYER_WIDTH as u32, PLAYER_HEIGHT as u32, &points)
}

/// Particle colors tied to player effects
pub mod particle_palette {
    pub const ENGINE: [u8; 3] = [100, 150, 255];
    pub const MUZZLE: [u8; 3] = [0, 255, 255];
}
