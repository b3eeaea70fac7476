//! Top-level game: owns every entity container and drives one frame at a time
//!
//! `update` consumes an input snapshot plus a time delta and advances the
//! simulation only while the phase is `Playing`. Discrete side effects
//! (sounds, shakes, destroyed enemies) come out through `drain_events`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DT, MAX_PARTICLES};
use crate::entities::player::{DirInput, particle_palette};
use crate::entities::{Bullet, Enemy, LaserBeam, ParticleSystem, Pickup, Player};
use crate::events::{EventQueue, FrameEvent, SoundCue};
use crate::state::{GamePhase, PhaseData, StateManager};
use crate::systems::wave::WaveOutcome;
use crate::systems::{SpawnSystem, WaveSystem, collision};
use crate::tuning::{Tuning, UpgradeKind};

/// One frame's worth of player input
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub dirs: DirInput,
    /// Hold to fire the primary cannon
    pub fire: bool,
    /// Hold to keep the laser beam on
    pub laser: bool,
    /// Launch a homing missile (rate limited)
    pub special: bool,
}

/// Discrete UI actions, routed by the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Restart,
    Pause,
    Resume,
    MainMenu,
    /// Advance from the wave transition screen into the next wave
    Continue,
    OpenUpgrades,
    ConfirmUpgrade(UpgradeKind),
    Back,
    Quit,
}

/// Read-only HUD snapshot for the host to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub max_shield: i32,
    pub level: u32,
    pub experience: i32,
    pub experience_to_level: i32,
    pub skill_points: u32,
    pub score: i64,
    pub wave: u32,
    /// Kill-target fraction in [0, 1]
    pub wave_progress: f32,
    /// Elapsed fraction of the wave timer in [0, 1]
    pub wave_timer_ratio: f32,
    pub wave_time_remaining: f32,
}

pub struct Game {
    tuning: Tuning,
    rng: Pcg32,
    state: StateManager,
    events: EventQueue,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub laser: LaserBeam,
    pub pickups: Vec<Pickup>,
    pub particles: ParticleSystem,

    spawn: SpawnSystem,
    wave: WaveSystem,
    score: i64,
    next_id: u32,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let laser = LaserBeam::new(tuning.bullet.damage / 2, &tuning.bullet);
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            state: StateManager::new(),
            events: EventQueue::default(),
            player,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            laser,
            pickups: Vec::new(),
            particles: ParticleSystem::new(MAX_PARTICLES),
            spawn: SpawnSystem::new(),
            wave: WaveSystem::new(),
            score: 0,
            next_id: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.current()
    }

    pub fn phase_data(&self) -> &PhaseData {
        self.state.data()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn wave_number(&self) -> u32 {
        self.wave.wave()
    }

    /// Descriptive name of the wave in progress, for the HUD banner
    pub fn wave_label(&self) -> &str {
        self.wave.label()
    }

    /// Take every event queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        self.events.drain()
    }

    pub fn hud(&self) -> HudStats {
        HudStats {
            health: self.player.health,
            max_health: self.player.max_health,
            shield: self.player.shield,
            max_shield: self.player.max_shield,
            level: self.player.level,
            experience: self.player.experience,
            experience_to_level: self.player.experience_to_level,
            skill_points: self.player.skill_points,
            score: self.score,
            wave: self.wave.wave(),
            wave_progress: self.wave.progress(),
            wave_timer_ratio: self.wave.timer_ratio(),
            wave_time_remaining: self.wave.time_remaining(),
        }
    }

    /// Route a discrete UI action through the current phase.
    pub fn handle_action(&mut self, action: MenuAction) {
        match (self.state.current(), action) {
            (GamePhase::MainMenu, MenuAction::Start)
            | (GamePhase::GameOver, MenuAction::Restart)
            | (GamePhase::Paused, MenuAction::Restart) => self.start_run(),
            (GamePhase::Playing, MenuAction::Pause) => {
                self.state.change(GamePhase::Paused, PhaseData::default());
            }
            (GamePhase::Paused, MenuAction::Resume) | (GamePhase::Paused, MenuAction::Back) => {
                self.state.return_to_previous(PhaseData::default());
            }
            (GamePhase::Paused, MenuAction::MainMenu)
            | (GamePhase::GameOver, MenuAction::MainMenu) => {
                self.state.change(GamePhase::MainMenu, PhaseData::default());
            }
            // Upgrades are spent between waves, never mid-combat, and only
            // when there is a point to spend. The transition payload rides
            // along so the wave screen survives the detour.
            (GamePhase::WaveTransition, MenuAction::OpenUpgrades) => {
                if self.player.skill_points > 0 {
                    let data = self.state.data().clone();
                    self.state.change(GamePhase::UpgradeSelect, data);
                }
            }
            (GamePhase::UpgradeSelect, MenuAction::ConfirmUpgrade(kind)) => {
                if self.player.apply_upgrade(kind) {
                    let data = self.state.data().clone();
                    self.state.return_to_previous(data);
                }
            }
            (GamePhase::UpgradeSelect, MenuAction::Back) => {
                let data = self.state.data().clone();
                self.state.return_to_previous(data);
            }
            (GamePhase::WaveTransition, MenuAction::Continue) => {
                self.begin_wave(self.wave.wave() + 1);
                self.state.change(GamePhase::Playing, PhaseData::default());
            }
            // Quit is the host's concern; everything else is a no-op in the
            // phase it arrived in.
            _ => {}
        }
    }

    /// Advance one frame. Outside `Playing` this only clamps and returns.
    pub fn update(&mut self, input: FrameInput, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        if !self.state.is(GamePhase::Playing) {
            return;
        }

        self.apply_input(input);

        self.player.tick_weapons(dt);
        self.player.update(dt, &mut self.particles, &mut self.rng);
        // Beam damage tracks the cannon so Damage upgrades reach it too
        self.laser.damage = self.player.damage / 2;
        self.laser.update(dt, self.player.nose());

        for enemy in &mut self.enemies {
            if let Some(shot) = enemy.update(dt, self.player.pos) {
                self.enemy_bullets
                    .push(Bullet::enemy(shot.pos, shot.damage, &self.tuning.bullet));
                self.events.sound(SoundCue::EnemyShot);
            }
        }

        for bullet in &mut self.player_bullets {
            bullet.update(dt, &self.enemies);
        }
        for bullet in &mut self.enemy_bullets {
            bullet.update(dt, &[]);
        }
        for pickup in &mut self.pickups {
            pickup.update(dt);
        }

        self.spawn.update(
            dt,
            self.enemies.len(),
            &mut self.next_id,
            &self.tuning.spawn,
            &mut self.rng,
            &mut self.enemies,
        );

        let outcome = collision::resolve(
            &mut self.player,
            &mut self.enemies,
            &mut self.player_bullets,
            &mut self.enemy_bullets,
            &mut self.laser,
            &mut self.pickups,
            &mut self.particles,
            &mut self.events,
            &self.tuning,
            &mut self.rng,
        );
        self.score += outcome.score_gained;
        self.wave.record_kills(outcome.kills);

        self.particles.update(dt, &mut self.rng);
        self.cleanup();

        if !self.player.is_alive() {
            self.finish_run();
            return;
        }

        match self.wave.update(dt, self.enemies.len(), &self.tuning.wave) {
            WaveOutcome::InProgress => {}
            WaveOutcome::Completed { bonus } => {
                self.score += bonus;
                let wave = self.wave.wave();
                let label = self.wave.label().to_owned();
                self.events.push(FrameEvent::WaveCompleted { wave, bonus });
                self.events.sound(SoundCue::WaveComplete);
                self.state.change(
                    GamePhase::WaveTransition,
                    PhaseData::wave_cleared(wave, bonus, label),
                );
            }
            WaveOutcome::TimedOut => {
                self.events.push(FrameEvent::WaveFailed {
                    wave: self.wave.wave(),
                });
                self.finish_run();
            }
        }
    }

    fn apply_input(&mut self, input: FrameInput) {
        self.player.handle_input(input.dirs);
        self.laser.set_active(input.laser);

        if input.fire {
            if let Some(nose) = self.player.try_shoot() {
                self.player_bullets
                    .push(Bullet::player(nose, self.player.damage, &self.tuning.bullet));
                self.particles
                    .create_sparkle(&mut self.rng, nose, particle_palette::MUZZLE);
                self.events.sound(SoundCue::PlayerShot);
            }
        }

        if input.special {
            if let Some(target) = self.nearest_enemy() {
                if self.player.missile_cooldown.fire() {
                    self.player_bullets.push(Bullet::homing(
                        self.player.nose(),
                        self.player.damage * 2,
                        target,
                        &self.tuning.bullet,
                    ));
                    self.events.sound(SoundCue::MissileLaunch);
                }
            }
        }
    }

    fn nearest_enemy(&self) -> Option<u32> {
        self.enemies
            .iter()
            .filter(|e| e.alive)
            .min_by(|a, b| {
                let da = a.pos.distance_squared(self.player.pos);
                let db = b.pos.distance_squared(self.player.pos);
                da.total_cmp(&db)
            })
            .map(|e| e.id)
    }

    /// Compact the containers after the systems have marked their dead.
    fn cleanup(&mut self) {
        self.enemies.retain(|e| e.alive && !e.past_bottom());
        self.player_bullets.retain(|b| b.alive);
        self.enemy_bullets.retain(|b| b.alive);
        self.pickups.retain(|p| p.alive);
    }

    fn start_run(&mut self) {
        self.player = Player::new(&self.tuning);
        self.laser = LaserBeam::new(self.tuning.bullet.damage / 2, &self.tuning.bullet);
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.pickups.clear();
        self.particles.clear();
        self.events = EventQueue::default();
        self.score = 0;
        self.next_id = 0;
        self.begin_wave(1);
        self.state.change(GamePhase::Playing, PhaseData::default());
        log::info!("new run started");
    }

    fn begin_wave(&mut self, wave: u32) {
        let profile = self.wave.start_wave(wave, &self.tuning.wave);
        self.spawn
            .configure(wave, profile, &self.tuning.spawn, &mut self.rng);
        // Stale projectiles do not carry across waves
        self.player_bullets.clear();
        self.enemy_bullets.clear();
    }

    fn finish_run(&mut self) {
        self.events.push(FrameEvent::GameOver { score: self.score });
        self.events.sound(SoundCue::GameOver);
        self.state
            .change(GamePhase::GameOver, PhaseData::score(self.score));
        log::info!("run over: score {}, wave {}", self.score, self.wave.wave());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_HEIGHT;
    use crate::entities::EnemyType;
    use crate::tuning::DifficultyProfile;
    use glam::Vec2;

    fn started() -> Game {
        let mut g = Game::new(42);
        g.handle_action(MenuAction::Start);
        g
    }

    fn frame() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_starts_in_main_menu_and_start_begins_wave_one() {
        let mut g = Game::new(1);
        assert_eq!(g.phase(), GamePhase::MainMenu);
        g.update(frame(), 0.016);
        assert!(g.enemies.is_empty());

        g.handle_action(MenuAction::Start);
        assert_eq!(g.phase(), GamePhase::Playing);
        assert_eq!(g.wave_number(), 1);
    }

    #[test]
    fn test_simulation_runs_only_while_playing() {
        let mut g = started();
        for _ in 0..150 {
            g.update(frame(), 0.05);
        }
        assert!(!g.enemies.is_empty());

        g.handle_action(MenuAction::Pause);
        let positions: Vec<_> = g.enemies.iter().map(|e| e.pos).collect();
        g.update(frame(), 0.05);
        let after: Vec<_> = g.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(positions, after);

        g.handle_action(MenuAction::Resume);
        assert_eq!(g.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_dt_is_clamped_and_sanitized() {
        let mut g = started();
        let before = g.player.pos;
        g.update(
            FrameInput {
                dirs: DirInput {
                    left: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            10.0,
        );
        let travelled = (g.player.pos - before).length();
        let mut reference = started();
        let before_ref = reference.player.pos;
        reference.update(
            FrameInput {
                dirs: DirInput {
                    left: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            MAX_FRAME_DT,
        );
        let travelled_ref = (reference.player.pos - before_ref).length();
        assert!((travelled - travelled_ref).abs() < 1e-3);

        // Garbage deltas freeze the frame instead of corrupting positions
        g.update(frame(), f32::NAN);
        assert!(g.player.pos.x.is_finite());
    }

    #[test]
    fn test_firing_spawns_bullets_and_events() {
        let mut g = started();
        g.update(
            FrameInput {
                fire: true,
                ..Default::default()
            },
            0.016,
        );
        assert_eq!(g.player_bullets.len(), 1);
        assert!(g
            .drain_events()
            .iter()
            .any(|e| matches!(e, FrameEvent::Sound(SoundCue::PlayerShot))));
    }

    #[test]
    fn test_missile_needs_a_target() {
        let mut g = started();
        g.update(
            FrameInput {
                special: true,
                ..Default::default()
            },
            0.016,
        );
        assert!(g.player_bullets.is_empty());

        let enemy = Enemy::new(
            99,
            EnemyType::Scout,
            Vec2::new(600.0, 200.0),
            DifficultyProfile::default(),
            &mut rand_pcg::Pcg32::seed_from_u64(1),
        );
        g.enemies.push(enemy);
        g.update(
            FrameInput {
                special: true,
                ..Default::default()
            },
            0.016,
        );
        assert_eq!(g.player_bullets.len(), 1);
        assert!(matches!(
            g.player_bullets[0].kind,
            crate::entities::BulletKind::Homing { target: 99 }
        ));
    }

    #[test]
    fn test_player_death_ends_the_run() {
        let mut g = started();
        g.player.shield = 0;
        g.player.health = 1;
        let pos = g.player.pos;
        g.enemy_bullets
            .push(Bullet::enemy(pos, 50, &Tuning::default().bullet));
        g.update(frame(), 0.016);
        assert_eq!(g.phase(), GamePhase::GameOver);
        assert_eq!(g.phase_data().final_score, Some(g.score()));
        assert!(g
            .drain_events()
            .iter()
            .any(|e| matches!(e, FrameEvent::GameOver { .. })));
    }

    #[test]
    fn test_wave_completion_transitions_and_continue_starts_next() {
        let mut g = started();
        // Meet the kill target directly, then let the frame judge it
        g.wave.record_kills(g.wave.target());
        let dt = Tuning::default().wave.min_duration + 1.0;
        let steps = (dt / MAX_FRAME_DT).ceil() as u32 + 1;
        for _ in 0..steps {
            g.enemies.clear();
            g.enemy_bullets.clear();
            g.update(frame(), MAX_FRAME_DT);
            if g.phase() == GamePhase::WaveTransition {
                break;
            }
        }
        assert_eq!(g.phase(), GamePhase::WaveTransition);
        assert_eq!(g.phase_data().wave, Some(1));
        assert_eq!(g.phase_data().wave_label.as_deref(), Some("Scout Patrol"));
        assert!(g.score() > 0);

        g.handle_action(MenuAction::Continue);
        assert_eq!(g.phase(), GamePhase::Playing);
        assert_eq!(g.wave_number(), 2);
    }

    #[test]
    fn test_wave_timeout_ends_the_run() {
        let mut g = started();
        let duration = Tuning::default().wave.duration;
        let steps = (duration / MAX_FRAME_DT).ceil() as u32 + 2;
        for _ in 0..steps {
            // Keep the field clear of threats so the player survives
            g.enemies.clear();
            g.enemy_bullets.clear();
            g.update(frame(), MAX_FRAME_DT);
            if g.phase() != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(g.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_cleanup_compacts_dead_entities() {
        let mut g = started();
        let t = Tuning::default();
        g.enemies.push(Enemy::new(
            1,
            EnemyType::Scout,
            Vec2::new(600.0, SCREEN_HEIGHT + 100.0),
            DifficultyProfile::default(),
            &mut rand_pcg::Pcg32::seed_from_u64(2),
        ));
        g.player_bullets
            .push(Bullet::player(Vec2::new(600.0, -500.0), 25, &t.bullet));
        g.update(frame(), 0.016);
        assert!(g.enemies.iter().all(|e| !e.past_bottom()));
        assert!(g.player_bullets.iter().all(|b| b.alive));
    }

    #[test]
    fn test_upgrade_flow_consumes_skill_point() {
        let mut g = started();
        g.player.skill_points = 1;
        // Not reachable mid-combat
        g.handle_action(MenuAction::OpenUpgrades);
        assert_eq!(g.phase(), GamePhase::Playing);

        g.state.change(
            GamePhase::WaveTransition,
            PhaseData::wave_cleared(1, 100, "Scout Patrol"),
        );
        g.handle_action(MenuAction::OpenUpgrades);
        assert_eq!(g.phase(), GamePhase::UpgradeSelect);

        g.handle_action(MenuAction::ConfirmUpgrade(UpgradeKind::Damage));
        assert_eq!(g.phase(), GamePhase::WaveTransition);
        // The transition payload survives the upgrade detour
        assert_eq!(g.phase_data().wave, Some(1));
        assert_eq!(g.player.skill_points, 0);
        assert!(g.player.damage > Tuning::default().bullet.damage);

        g.handle_action(MenuAction::Continue);
        assert_eq!(g.phase(), GamePhase::Playing);
        assert_eq!(g.wave_number(), 2);
    }

    #[test]
    fn test_upgrades_need_a_skill_point() {
        let mut g = started();
        g.state.change(
            GamePhase::WaveTransition,
            PhaseData::wave_cleared(1, 100, "Scout Patrol"),
        );
        g.handle_action(MenuAction::OpenUpgrades);
        assert_eq!(g.phase(), GamePhase::WaveTransition);
    }

    #[test]
    fn test_laser_damage_tracks_player_damage() {
        let mut g = started();
        let pos = Vec2::new(g.player.pos.x, g.player.pos.y - 150.0);
        g.enemies.push(Enemy::new(
            7,
            EnemyType::Bomber,
            pos,
            DifficultyProfile::default(),
            &mut rand_pcg::Pcg32::seed_from_u64(5),
        ));
        g.player.damage = 60;
        g.update(
            FrameInput {
                laser: true,
                ..Default::default()
            },
            0.016,
        );
        let bomber = &g.enemies[0];
        assert_eq!(bomber.max_health - bomber.health, 30);
    }

    #[test]
    fn test_hud_snapshot_matches_state() {
        let g = started();
        let hud = g.hud();
        assert_eq!(hud.health, g.player.health);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.score, 0);
        assert!(hud.wave_progress.abs() < f32::EPSILON);
    }
}
