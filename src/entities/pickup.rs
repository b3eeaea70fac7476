//! Falling pickups dropped by destroyed enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SCREEN_HEIGHT;
use crate::entities::Player;

pub const PICKUP_SIZE: f32 = 20.0;
/// px per reference frame
const FALL_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Shield,
    Experience,
}

impl PickupKind {
    pub fn color(self) -> [u8; 3] {
        match self {
            PickupKind::Health => [50, 255, 50],
            PickupKind::Shield => [50, 150, 255],
            PickupKind::Experience => [255, 215, 0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: Vec2::splat(PICKUP_SIZE),
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += FALL_SPEED * crate::consts::FRAME_SCALE * dt;
        if self.pos.y - self.size.y / 2.0 > SCREEN_HEIGHT {
            self.alive = false;
        }
    }

    /// Grants the effect to the player. Experience may trigger level-ups;
    /// the number gained is returned so the caller can emit events.
    pub fn apply(&self, player: &mut Player) -> u32 {
        match self.kind {
            PickupKind::Health => {
                player.heal(25);
                0
            }
            PickupKind::Shield => {
                player.restore_shield(20);
                0
            }
            PickupKind::Experience => player.add_experience(25),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_pickup_falls_and_expires_offscreen() {
        let mut p = Pickup::new(PickupKind::Health, Vec2::new(100.0, SCREEN_HEIGHT - 5.0));
        p.update(0.1);
        assert!(p.pos.y > SCREEN_HEIGHT - 5.0);
        for _ in 0..10 {
            p.update(0.1);
        }
        assert!(!p.alive);
    }

    #[test]
    fn test_health_pickup_caps_at_max() {
        let mut player = Player::new(&Tuning::default());
        player.health = 90;
        let p = Pickup::new(PickupKind::Health, Vec2::ZERO);
        p.apply(&mut player);
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_shield_pickup_restores() {
        let mut player = Player::new(&Tuning::default());
        player.shield = 0;
        let p = Pickup::new(PickupKind::Shield, Vec2::ZERO);
        p.apply(&mut player);
        assert_eq!(player.shield, 20);
    }

    #[test]
    fn test_experience_pickup_grants_exp() {
        let mut player = Player::new(&Tuning::default());
        let p = Pickup::new(PickupKind::Experience, Vec2::ZERO);
        let levels = p.apply(&mut player);
        assert_eq!(levels, 0);
        assert_eq!(player.experience, 25);
    }
}
