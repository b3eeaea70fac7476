//! Enemy spawning: pattern rotation, weighted type selection, formations

use glam::Vec2;
use rand::Rng;

use crate::consts::SCREEN_WIDTH;
use crate::entities::{Enemy, EnemyBehavior, EnemyType};
use crate::timer::Cooldown;
use crate::tuning::{DifficultyProfile, SpawnTuning};

/// Chance a Scout or Fighter spawns with the Charge behavior from wave 3 on
const CHARGE_PROMOTION_CHANCE: f64 = 0.2;
const CHARGE_PROMOTION_WAVE: u32 = 3;

/// Boss stat scaling relative to a stock Elite
const BOSS_HEALTH_SCALE: i32 = 3;
const BOSS_DAMAGE_SCALE: i32 = 2;
const BOSS_SCORE_SCALE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPattern {
    /// Single enemies at random x positions
    Random,
    /// A V, line, or circle group in one burst
    Formation,
    /// A staggered column sweeping down
    Wave,
    /// One boosted Elite
    Boss,
}

impl SpawnPattern {
    /// Patterns available at the given wave number
    fn unlocked(wave: u32) -> &'static [SpawnPattern] {
        match wave {
            0..2 => &[SpawnPattern::Random],
            2..4 => &[SpawnPattern::Random, SpawnPattern::Formation],
            4..6 => &[
                SpawnPattern::Random,
                SpawnPattern::Formation,
                SpawnPattern::Wave,
            ],
            _ => &[
                SpawnPattern::Random,
                SpawnPattern::Formation,
                SpawnPattern::Wave,
                SpawnPattern::Boss,
            ],
        }
    }

    /// Group patterns spawn more per event so their intervals stretch or
    /// shrink relative to the base.
    fn interval_scale(self) -> f32 {
        match self {
            SpawnPattern::Random | SpawnPattern::Boss => 1.0,
            SpawnPattern::Formation => 1.5,
            SpawnPattern::Wave => 0.7,
        }
    }
}

/// Relative weights for each enemy type at the given wave, normalized by the
/// caller. Scouts fade out as stronger types phase in.
fn type_weights(wave: u32) -> [(EnemyType, f32); 4] {
    let w = wave as f32;
    let scout = (1.0 - 0.1 * w).max(0.1);
    let fighter = if wave >= 2 {
        (0.2 * (w - 1.0)).min(0.6)
    } else {
        0.0
    };
    let bomber = if wave >= 4 {
        (0.15 * (w - 3.0)).min(0.4)
    } else {
        0.0
    };
    let elite = if wave >= 6 {
        (0.1 * (w - 5.0)).min(0.3)
    } else {
        0.0
    };
    [
        (EnemyType::Scout, scout),
        (EnemyType::Fighter, fighter),
        (EnemyType::Bomber, bomber),
        (EnemyType::Elite, elite),
    ]
}

fn pick_type(wave: u32, rng: &mut impl Rng) -> EnemyType {
    let weights = type_weights(wave);
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0.0..total);
    for (ty, w) in weights {
        if roll < w {
            return ty;
        }
        roll -= w;
    }
    EnemyType::Scout
}

#[derive(Debug)]
pub struct SpawnSystem {
    wave: u32,
    profile: DifficultyProfile,
    pattern: SpawnPattern,
    spawn_timer: Cooldown,
    pattern_elapsed: f32,
    /// Spawns left in the current cycle; replenished when the field clears
    budget: u32,
}

impl SpawnSystem {
    pub fn new() -> Self {
        Self {
            wave: 1,
            profile: DifficultyProfile::default(),
            pattern: SpawnPattern::Random,
            spawn_timer: Cooldown::new(2.0),
            pattern_elapsed: 0.0,
            budget: 0,
        }
    }

    /// Reset for a new wave: budget, interval, and starting pattern.
    pub fn configure(
        &mut self,
        wave: u32,
        profile: DifficultyProfile,
        tuning: &SpawnTuning,
        rng: &mut impl Rng,
    ) {
        self.wave = wave;
        self.profile = profile;
        self.budget = tuning.base_wave_spawns + tuning.spawns_per_wave * wave;
        self.pattern_elapsed = 0.0;
        self.pattern = Self::pick_pattern(wave, rng);
        self.spawn_timer = Cooldown::new(self.interval(tuning));
    }

    pub fn pattern(&self) -> SpawnPattern {
        self.pattern
    }

    fn pick_pattern(wave: u32, rng: &mut impl Rng) -> SpawnPattern {
        let unlocked = SpawnPattern::unlocked(wave);
        unlocked[rng.random_range(0..unlocked.len())]
    }

    fn interval(&self, tuning: &SpawnTuning) -> f32 {
        let base = (tuning.base_interval - tuning.interval_reduction_per_wave * self.wave as f32)
            .max(tuning.min_interval);
        self.profile.scale_spawn_interval(base, tuning.min_interval) * self.pattern.interval_scale()
    }

    /// Advance timers and push any newly spawned enemies into `out`.
    pub fn update(
        &mut self,
        dt: f32,
        live_enemies: usize,
        next_id: &mut u32,
        tuning: &SpawnTuning,
        rng: &mut impl Rng,
        out: &mut Vec<Enemy>,
    ) {
        self.pattern_elapsed += dt;
        if self.pattern_elapsed >= tuning.pattern_duration {
            self.pattern_elapsed = 0.0;
            self.pattern = Self::pick_pattern(self.wave, rng);
            self.spawn_timer = Cooldown::new(self.interval(tuning));
        }

        // A cleared field with an empty budget stalls the wave; refill so
        // the kill target stays reachable.
        if self.budget == 0 && live_enemies == 0 {
            self.budget = tuning.base_wave_spawns + tuning.spawns_per_wave * self.wave;
        }

        self.spawn_timer.tick(dt);
        if self.budget == 0 || !self.spawn_timer.fire() {
            return;
        }

        match self.pattern {
            SpawnPattern::Random => self.spawn_random(next_id, rng, out),
            SpawnPattern::Formation => self.spawn_formation(next_id, rng, out),
            SpawnPattern::Wave => self.spawn_wave_column(next_id, rng, out),
            SpawnPattern::Boss => self.spawn_boss(next_id, rng, out),
        }
    }

    fn make_enemy(
        &self,
        enemy_type: EnemyType,
        pos: Vec2,
        next_id: &mut u32,
        rng: &mut impl Rng,
    ) -> Enemy {
        let id = *next_id;
        *next_id += 1;
        let promote = self.wave >= CHARGE_PROMOTION_WAVE
            && matches!(enemy_type, EnemyType::Scout | EnemyType::Fighter)
            && rng.random_bool(CHARGE_PROMOTION_CHANCE);
        if promote {
            Enemy::with_behavior(id, enemy_type, EnemyBehavior::Charge, pos, self.profile, rng)
        } else {
            Enemy::new(id, enemy_type, pos, self.profile, rng)
        }
    }

    fn spend(&mut self) -> bool {
        if self.budget == 0 {
            false
        } else {
            self.budget -= 1;
            true
        }
    }

    fn spawn_random(&mut self, next_id: &mut u32, rng: &mut impl Rng, out: &mut Vec<Enemy>) {
        if !self.spend() {
            return;
        }
        let enemy_type = pick_type(self.wave, rng);
        let half = enemy_type.config().size.x / 2.0;
        let x = rng.random_range(half..SCREEN_WIDTH - half);
        let pos = Vec2::new(x, -enemy_type.config().size.y);
        let enemy = self.make_enemy(enemy_type, pos, next_id, rng);
        out.push(enemy);
    }

    fn spawn_formation(&mut self, next_id: &mut u32, rng: &mut impl Rng, out: &mut Vec<Enemy>) {
        let enemy_type = pick_type(self.wave, rng);
        let center = Vec2::new(SCREEN_WIDTH / 2.0, -60.0);
        let offsets: Vec<Vec2> = match rng.random_range(0..3u32) {
            // V: a leader with two trailing wings per side
            0 => (-2i32..=2)
                .map(|k| Vec2::new(k as f32 * 60.0, k.abs() as f32 * 30.0))
                .collect(),
            // Line abreast
            1 => (-3i32..=3).map(|k| Vec2::new(k as f32 * 70.0, 0.0)).collect(),
            // Ring
            _ => (0..8)
                .map(|k| {
                    let angle = k as f32 / 8.0 * std::f32::consts::TAU;
                    Vec2::new(angle.cos(), angle.sin()) * 100.0
                })
                .collect(),
        };
        for offset in offsets {
            if !self.spend() {
                break;
            }
            let enemy = self.make_enemy(enemy_type, center + offset, next_id, rng);
            out.push(enemy);
        }
    }

    fn spawn_wave_column(&mut self, next_id: &mut u32, rng: &mut impl Rng, out: &mut Vec<Enemy>) {
        let count = (3 + self.wave / 2).min(8);
        let enemy_type = pick_type(self.wave, rng);
        let x = rng.random_range(100.0..SCREEN_WIDTH - 100.0);
        for i in 0..count {
            if !self.spend() {
                break;
            }
            // Staggered vertically so the column files in one by one
            let pos = Vec2::new(x, -40.0 - i as f32 * 50.0);
            let enemy = self.make_enemy(enemy_type, pos, next_id, rng);
            out.push(enemy);
        }
    }

    fn spawn_boss(&mut self, next_id: &mut u32, rng: &mut impl Rng, out: &mut Vec<Enemy>) {
        if !self.spend() {
            return;
        }
        let id = *next_id;
        *next_id += 1;
        let pos = Vec2::new(SCREEN_WIDTH / 2.0, -60.0);
        let mut boss = Enemy::new(id, EnemyType::Elite, pos, self.profile, rng);
        boss.health *= BOSS_HEALTH_SCALE;
        boss.max_health = boss.health;
        boss.damage *= BOSS_DAMAGE_SCALE;
        boss.score_value *= BOSS_SCORE_SCALE;
        out.push(boss);
        // One boss per rotation; fall back to singles until the next switch
        self.pattern = SpawnPattern::Random;
    }
}

impl Default for SpawnSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_wave_one_spawns_only_scouts() {
        let mut r = rng();
        for _ in 0..100 {
            assert_eq!(pick_type(1, &mut r), EnemyType::Scout);
        }
    }

    #[test]
    fn test_stronger_types_phase_in() {
        let w = type_weights(6);
        assert!(w.iter().all(|(_, weight)| *weight > 0.0));
        // Scout share keeps shrinking but never hits zero
        assert!((type_weights(20)[0].1 - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_pattern_unlocks_by_wave() {
        assert_eq!(SpawnPattern::unlocked(1), &[SpawnPattern::Random]);
        assert!(SpawnPattern::unlocked(4).contains(&SpawnPattern::Wave));
        assert!(!SpawnPattern::unlocked(5).contains(&SpawnPattern::Boss));
        assert!(SpawnPattern::unlocked(6).contains(&SpawnPattern::Boss));
    }

    #[test]
    fn test_budget_limits_spawns_until_field_clears() {
        let t = Tuning::default();
        let mut r = rng();
        let mut sys = SpawnSystem::new();
        sys.configure(1, DifficultyProfile::default(), &t.spawn, &mut r);
        let budget = t.spawn.base_wave_spawns + t.spawn.spawns_per_wave;

        let mut next_id = 0;
        let mut out = Vec::new();
        for _ in 0..200 {
            sys.update(1.0, out.len(), &mut next_id, &t.spawn, &mut r, &mut out);
            if out.len() as u32 >= budget {
                break;
            }
        }
        assert_eq!(out.len() as u32, budget);

        // Budget exhausted and enemies still on the field: nothing spawns
        let before = out.len();
        for _ in 0..10 {
            sys.update(1.0, before, &mut next_id, &t.spawn, &mut r, &mut out);
        }
        assert_eq!(out.len(), before);

        // Field cleared: budget replenishes and spawning resumes
        out.clear();
        for _ in 0..10 {
            sys.update(1.0, out.len(), &mut next_id, &t.spawn, &mut r, &mut out);
        }
        assert!(!out.is_empty());
    }

    #[test]
    fn test_spawned_ids_are_unique() {
        let t = Tuning::default();
        let mut r = rng();
        let mut sys = SpawnSystem::new();
        sys.configure(5, DifficultyProfile::new(2.0), &t.spawn, &mut r);
        let mut next_id = 0;
        let mut out = Vec::new();
        for _ in 0..100 {
            sys.update(0.5, 0, &mut next_id, &t.spawn, &mut r, &mut out);
        }
        let mut ids: Vec<u32> = out.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), out.len());
    }

    #[test]
    fn test_boss_is_boosted_elite() {
        let t = Tuning::default();
        let mut r = rng();
        let mut sys = SpawnSystem::new();
        sys.configure(6, DifficultyProfile::new(1.0), &t.spawn, &mut r);
        sys.pattern = SpawnPattern::Boss;
        let mut next_id = 0;
        let mut out = Vec::new();
        sys.spawn_boss(&mut next_id, &mut r, &mut out);
        let boss = &out[0];
        let stock = EnemyType::Elite.config();
        assert_eq!(boss.health, stock.health * 3);
        assert_eq!(boss.damage, stock.damage * 2);
        assert_eq!(boss.score_value, stock.score_value * 5);
        assert_eq!(sys.pattern, SpawnPattern::Random);
    }
}
