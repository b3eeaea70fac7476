//! Data-driven game balance
//!
//! All numbers a designer might touch live here as serde defaults. Hosts can
//! override them by feeding `Tuning::from_json` a partial or complete JSON
//! document.

use serde::{Deserialize, Serialize};

/// Player balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Maximum speed in px/frame at the 60 fps reference scale
    pub speed: f32,
    pub max_health: i32,
    pub max_shield: i32,
    /// Velocity kept per frame (momentum drag, < 1)
    pub drag: f32,
    /// Minimum interval between shots (seconds)
    pub fire_rate: f32,
    /// Invulnerability window after taking a hit (seconds)
    pub invulnerability: f32,
    /// No-damage grace period before shield regen starts (seconds)
    pub shield_regen_delay: f32,
    /// Shield points restored per regen step
    pub shield_regen_amount: i32,
    /// Cooldown of the homing missile special (seconds)
    pub missile_cooldown: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 7.0,
            max_health: 100,
            max_shield: 50,
            drag: 0.9,
            fire_rate: 0.15,
            invulnerability: 1.0,
            shield_regen_delay: 3.0,
            shield_regen_amount: 5,
            missile_cooldown: 2.5,
        }
    }
}

/// Bullet balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    /// Base speed in px/frame at the 60 fps reference scale
    pub speed: f32,
    pub damage: i32,
    /// Lifetime budget (seconds)
    pub lifetime: f32,
    /// Enemy bullet speed as a fraction of base
    pub enemy_speed_scale: f32,
    /// Homing missile speed as a fraction of base
    pub missile_speed_scale: f32,
    /// Missile turn rate cap (degrees per reference frame)
    pub missile_turn_rate: f32,
    /// Missile acceleration (px/frame per reference frame)
    pub missile_acceleration: f32,
    pub laser_width: f32,
    pub laser_range: f32,
    /// Interval between laser damage pulses (seconds)
    pub laser_pulse: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: 12.0,
            damage: 25,
            lifetime: 2.0,
            enemy_speed_scale: 0.8,
            missile_speed_scale: 0.6,
            missile_turn_rate: 2.0,
            missile_acceleration: 0.1,
            laser_width: 8.0,
            laser_range: 500.0,
            laser_pulse: 0.1,
        }
    }
}

/// Experience / progression balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    /// Experience granted per point of enemy score value
    pub exp_per_score: f32,
    /// First level-up threshold
    pub level_up_exp: i32,
    /// Threshold growth per level
    pub level_up_multiplier: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            exp_per_score: 1.0,
            level_up_exp: 100,
            level_up_multiplier: 1.5,
        }
    }
}

/// Wave progression balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Wave timeout (seconds)
    pub duration: f32,
    /// Floor on wave length; completion is not possible earlier (seconds)
    pub min_duration: f32,
    /// Flat completion bonus multiplied by the wave number
    pub completion_bonus: i64,
    /// Score per second remaining at completion
    pub time_bonus_rate: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            duration: 45.0,
            min_duration: 10.0,
            completion_bonus: 100,
            time_bonus_rate: 10.0,
        }
    }
}

/// Spawn scheduling balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Base interval between spawn events (seconds)
    pub base_interval: f32,
    /// Linear interval reduction per wave number (seconds)
    pub interval_reduction_per_wave: f32,
    /// Interval floor (seconds)
    pub min_interval: f32,
    /// Pattern rotation period (seconds)
    pub pattern_duration: f32,
    /// Base spawn budget per wave cycle
    pub base_wave_spawns: u32,
    /// Additional budget per wave number
    pub spawns_per_wave: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval: 2.0,
            interval_reduction_per_wave: 0.1,
            min_interval: 0.5,
            pattern_duration: 10.0,
            base_wave_spawns: 10,
            spawns_per_wave: 2,
        }
    }
}

/// Stat upgrades purchasable with skill points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Damage,
    FireRate,
    Health,
    Shield,
    Speed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
        UpgradeKind::Health,
        UpgradeKind::Shield,
        UpgradeKind::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "damage",
            UpgradeKind::FireRate => "fire_rate",
            UpgradeKind::Health => "health",
            UpgradeKind::Shield => "shield",
            UpgradeKind::Speed => "speed",
        }
    }

    /// Stat multiplier applied per purchased point
    pub fn multiplier(&self) -> f32 {
        match self {
            UpgradeKind::Damage => 1.2,
            UpgradeKind::FireRate => 0.85,
            UpgradeKind::Health => 1.3,
            UpgradeKind::Shield => 1.25,
            UpgradeKind::Speed => 1.15,
        }
    }
}

/// Complete tuning document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub bullet: BulletTuning,
    pub progression: ProgressionTuning,
    pub wave: WaveTuning,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Parse a tuning override document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Per-wave difficulty, computed once at wave start and passed by value into
/// spawning and enemy construction. Nothing global is mutated, so two waves
/// can never race each other's scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub multiplier: f32,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl DifficultyProfile {
    pub fn new(multiplier: f32) -> Self {
        Self { multiplier }
    }

    pub fn scale_health(&self, base: i32) -> i32 {
        (base as f32 * self.multiplier) as i32
    }

    pub fn scale_damage(&self, base: i32) -> i32 {
        (base as f32 * self.multiplier) as i32
    }

    pub fn scale_speed(&self, base: f32) -> f32 {
        base * self.multiplier
    }

    /// Spawn intervals shrink as difficulty rises, floored by `min`.
    pub fn scale_spawn_interval(&self, base: f32, min: f32) -> f32 {
        (base / self.multiplier).max(min)
    }
}
