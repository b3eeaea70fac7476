//! Projectiles: straight bullets, homing missiles, and the continuous laser
//!
//! Straight bullets carry a fixed unit direction. Homing missiles hold a
//! non-owning target id and turn toward the target at a capped angular rate;
//! when the target dies they keep flying along the last heading. The laser
//! is not spawned per shot at all: it follows its owner and is merely
//! toggled active/inactive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collide::Mask;
use crate::consts::{FRAME_SCALE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::enemy::Enemy;
use crate::timer::Cooldown;
use crate::tuning::BulletTuning;

const BULLET_WIDTH: f32 = 6.0;
const BULLET_HEIGHT: f32 = 12.0;

/// Closed set of projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Player,
    Enemy,
    /// Carries the id of the enemy it tracks; the referent may die first
    Homing { target: u32 },
}

/// A discrete projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub kind: BulletKind,
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    /// px per reference frame
    pub speed: f32,
    pub damage: i32,
    pub color: [u8; 3],
    /// Seconds left before expiry
    pub lifetime: f32,
    pub alive: bool,
    turn_rate: f32,
    acceleration: f32,
    pub mask: Mask,
}

impl Bullet {
    pub fn player(pos: Vec2, damage: i32, tuning: &BulletTuning) -> Self {
        Self::new(
            BulletKind::Player,
            pos,
            Vec2::new(0.0, -1.0),
            tuning.speed,
            damage,
            [0, 191, 255],
            tuning,
        )
    }

    pub fn enemy(pos: Vec2, damage: i32, tuning: &BulletTuning) -> Self {
        Self::new(
            BulletKind::Enemy,
            pos,
            Vec2::new(0.0, 1.0),
            tuning.speed * tuning.enemy_speed_scale,
            damage,
            [255, 20, 147],
            tuning,
        )
    }

    pub fn homing(pos: Vec2, damage: i32, target: u32, tuning: &BulletTuning) -> Self {
        Self::new(
            BulletKind::Homing { target },
            pos,
            Vec2::new(0.0, -1.0),
            tuning.speed * tuning.missile_speed_scale,
            damage,
            [57, 255, 20],
            tuning,
        )
    }

    fn new(
        kind: BulletKind,
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        damage: i32,
        color: [u8; 3],
        tuning: &BulletTuning,
    ) -> Self {
        Self {
            kind,
            pos,
            dir,
            speed,
            damage,
            color,
            lifetime: tuning.lifetime,
            alive: true,
            turn_rate: tuning.missile_turn_rate,
            acceleration: tuning.missile_acceleration,
            mask: Mask::filled(BULLET_WIDTH as u32, BULLET_HEIGHT as u32),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)
    }

    /// Integrate motion; homing variants steer first. Expires on lifetime
    /// or when fully outside the screen rect (any edge).
    pub fn update(&mut self, dt: f32, enemies: &[Enemy]) {
        if let BulletKind::Homing { target } = self.kind {
            self.steer_toward(dt, target, enemies);
        }

        self.pos += self.dir * self.speed * FRAME_SCALE * dt;

        self.lifetime -= dt;
        if self.lifetime <= 0.0 || self.offscreen() {
            self.alive = false;
        }
    }

    /// Turn the heading toward the live target at a capped angular rate and
    /// accelerate. A dead or missing target leaves the heading untouched.
    fn steer_toward(&mut self, dt: f32, target: u32, enemies: &[Enemy]) {
        let Some(enemy) = enemies.iter().find(|e| e.id == target && e.alive) else {
            return;
        };
        let to_target = enemy.pos - self.pos;
        if to_target.length_squared() < 1e-6 {
            return;
        }

        let current = self.dir.y.atan2(self.dir.x);
        let wanted = to_target.y.atan2(to_target.x);
        let mut diff = wanted - current;
        while diff > std::f32::consts::PI {
            diff -= std::f32::consts::TAU;
        }
        while diff < -std::f32::consts::PI {
            diff += std::f32::consts::TAU;
        }

        let max_turn = self.turn_rate.to_radians() * FRAME_SCALE * dt;
        let turn = diff.clamp(-max_turn, max_turn);
        let angle = current + turn;
        self.dir = Vec2::new(angle.cos(), angle.sin());

        self.speed += self.acceleration * FRAME_SCALE * dt;
    }

    fn offscreen(&self) -> bool {
        let half = self.size() / 2.0;
        self.pos.x + half.x < 0.0
            || self.pos.x - half.x > SCREEN_WIDTH
            || self.pos.y + half.y < 0.0
            || self.pos.y - half.y > SCREEN_HEIGHT
    }
}

/// Continuous beam anchored to its owner's nose. Active/inactive rather
/// than spawned/destroyed; only contributes to collision while active.
#[derive(Debug, Clone)]
pub struct LaserBeam {
    pub active: bool,
    /// Damage applied per pulse to each enemy in the beam
    pub damage: i32,
    pub width: f32,
    pub range: f32,
    /// Beam center; recomputed from the owner every frame
    pub pos: Vec2,
    pulse: Cooldown,
    pub mask: Mask,
}

impl LaserBeam {
    pub fn new(damage: i32, tuning: &BulletTuning) -> Self {
        Self {
            active: false,
            damage,
            width: tuning.laser_width,
            range: tuning.laser_range,
            pos: Vec2::ZERO,
            pulse: Cooldown::new(tuning.laser_pulse),
            mask: Mask::filled(tuning.laser_width as u32, tuning.laser_range as u32),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.range)
    }

    /// Reposition over the owner and advance the pulse clock.
    pub fn update(&mut self, dt: f32, owner_nose: Vec2) {
        self.pos = Vec2::new(owner_nose.x, owner_nose.y - self.range / 2.0);
        self.pulse.tick(dt);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// True once per pulse interval while held active; gates damage so the
    /// beam is frame-rate independent.
    pub fn try_pulse(&mut self) -> bool {
        self.active && self.pulse.fire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::DifficultyProfile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tuning() -> BulletTuning {
        BulletTuning::default()
    }

    fn target_enemy(id: u32, pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(3);
        Enemy::new(
            id,
            crate::entities::enemy::EnemyType::Scout,
            pos,
            DifficultyProfile::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_player_bullet_flies_up_and_expires() {
        let t = tuning();
        let mut b = Bullet::player(Vec2::new(600.0, 400.0), 25, &t);
        b.update(0.1, &[]);
        assert!(b.pos.y < 400.0);
        assert!(b.alive);
        b.lifetime = 0.05;
        b.update(0.1, &[]);
        assert!(!b.alive);
    }

    #[test]
    fn test_bullet_dies_leaving_screen() {
        let t = tuning();
        let mut b = Bullet::player(Vec2::new(600.0, 10.0), 25, &t);
        for _ in 0..5 {
            b.update(0.1, &[]);
        }
        assert!(!b.alive);
    }

    #[test]
    fn test_homing_turns_toward_target() {
        let t = tuning();
        // Target up and to the right; missile starts heading straight up
        let enemy = target_enemy(9, Vec2::new(900.0, 100.0));
        let mut m = Bullet::homing(Vec2::new(600.0, 700.0), 25, 9, &t);
        let enemies = vec![enemy];
        let before = m.dir;
        m.update(0.05, &enemies);
        assert!(m.dir.x > before.x, "should bend toward the target");
        // Turn rate is capped: a single frame cannot snap all the way
        let wanted = (enemies[0].pos - m.pos).normalize();
        assert!(m.dir.angle_to(wanted).abs() > 0.01);
    }

    #[test]
    fn test_homing_accelerates() {
        let t = tuning();
        let enemy = target_enemy(9, Vec2::new(600.0, 100.0));
        let mut m = Bullet::homing(Vec2::new(600.0, 700.0), 25, 9, &t);
        let base = m.speed;
        m.update(0.05, &[enemy]);
        assert!(m.speed > base);
    }

    #[test]
    fn test_homing_degrades_when_target_dies() {
        let t = tuning();
        let mut enemy = target_enemy(9, Vec2::new(900.0, 100.0));
        let mut m = Bullet::homing(Vec2::new(600.0, 700.0), 25, 9, &t);
        m.update(0.05, std::slice::from_ref(&enemy));
        let heading = m.dir;
        // Kill the target mid-flight: heading freezes, flight continues
        enemy.alive = false;
        m.update(0.05, std::slice::from_ref(&enemy));
        assert_eq!(m.dir, heading);
        assert!(m.alive);
    }

    #[test]
    fn test_homing_tolerates_missing_target() {
        let t = tuning();
        let mut m = Bullet::homing(Vec2::new(600.0, 700.0), 25, 42, &t);
        m.update(0.05, &[]);
        assert_eq!(m.dir, Vec2::new(0.0, -1.0));
        assert!(m.alive);
    }

    #[test]
    fn test_laser_follows_owner_and_pulses() {
        let t = tuning();
        let mut laser = LaserBeam::new(10, &t);
        laser.update(0.016, Vec2::new(600.0, 370.0));
        assert_eq!(laser.pos, Vec2::new(600.0, 370.0 - t.laser_range / 2.0));

        // Inactive: never pulses
        assert!(!laser.try_pulse());
        laser.set_active(true);
        assert!(laser.try_pulse());
        assert!(!laser.try_pulse());
        laser.update(0.11, Vec2::new(600.0, 370.0));
        assert!(laser.try_pulse());
    }
}
