//! Wave lifecycle: per-wave targets, timers, and completion bonuses

use serde::{Deserialize, Serialize};

use crate::timer::Countdown;
use crate::tuning::{DifficultyProfile, WaveTuning};

/// Per-wave targets. The first five waves are hand-tuned; later waves are
/// synthesized from the wave number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub enemy_count: u32,
    pub difficulty: f32,
    pub label: String,
}

pub fn wave_config(wave: u32) -> WaveConfig {
    let (enemy_count, difficulty, label) = match wave {
        0 | 1 => (10, 1.0, "Scout Patrol".to_owned()),
        2 => (15, 1.2, "Fighter Squadron".to_owned()),
        3 => (20, 1.5, "Mixed Assault".to_owned()),
        4 => (18, 1.8, "Bomber Run".to_owned()),
        5 => (25, 2.0, "Elite Strike".to_owned()),
        n => (20 + 3 * n, 1.0 + 0.3 * n as f32, format!("Wave {n} Assault")),
    };
    WaveConfig {
        enemy_count,
        difficulty,
        label,
    }
}

/// What the frame's wave check decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveOutcome {
    InProgress,
    /// Target met; bonus already includes the time component
    Completed { bonus: i64 },
    /// Timer ran out with the target unmet
    TimedOut,
}

#[derive(Debug)]
pub struct WaveSystem {
    wave: u32,
    config: WaveConfig,
    profile: DifficultyProfile,
    defeated: u32,
    timer: Countdown,
    duration: f32,
    elapsed: f32,
}

impl WaveSystem {
    pub fn new() -> Self {
        Self {
            wave: 0,
            config: wave_config(1),
            profile: DifficultyProfile::default(),
            defeated: 0,
            timer: Countdown::default(),
            duration: 0.0,
            elapsed: 0.0,
        }
    }

    /// Begin the given wave and return its difficulty profile.
    pub fn start_wave(&mut self, wave: u32, tuning: &WaveTuning) -> DifficultyProfile {
        self.wave = wave;
        self.config = wave_config(wave);
        self.profile = DifficultyProfile::new(self.config.difficulty);
        self.defeated = 0;
        self.duration = tuning.duration;
        self.elapsed = 0.0;
        self.timer.start_for(tuning.duration);
        log::info!(
            "wave {} ({}) started: {} enemies, difficulty x{:.1}",
            wave,
            self.config.label,
            self.config.enemy_count,
            self.config.difficulty
        );
        self.profile
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    pub fn target(&self) -> u32 {
        self.config.enemy_count
    }

    /// Descriptive name of the current wave
    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn defeated(&self) -> u32 {
        self.defeated
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Elapsed-time fraction of the wave in [0, 1]; a zero-duration wave
    /// reads as 0 rather than dividing by zero.
    pub fn timer_ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Kill-progress fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.config.enemy_count == 0 {
            1.0
        } else {
            (self.defeated as f32 / self.config.enemy_count as f32).min(1.0)
        }
    }

    pub fn record_kills(&mut self, count: u32) {
        self.defeated += count;
    }

    /// Advance the wave timer and judge the frame. Completion requires the
    /// kill target met, the minimum duration elapsed, and no enemies left
    /// on the field.
    pub fn update(&mut self, dt: f32, live_enemies: usize, tuning: &WaveTuning) -> WaveOutcome {
        self.timer.tick(dt);
        self.elapsed += dt;

        if self.defeated >= self.config.enemy_count
            && self.elapsed >= tuning.min_duration
            && live_enemies == 0
        {
            let time_bonus = (tuning.time_bonus_rate * self.timer.remaining()) as i64;
            let bonus = tuning.completion_bonus * self.wave as i64 + time_bonus;
            return WaveOutcome::Completed { bonus };
        }

        if !self.timer.active() {
            return WaveOutcome::TimedOut;
        }

        WaveOutcome::InProgress
    }
}

impl Default for WaveSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_wave_table_and_synthesis() {
        assert_eq!(wave_config(1).enemy_count, 10);
        assert_eq!(wave_config(3).difficulty, 1.5);
        assert_eq!(wave_config(5).enemy_count, 25);
        // Wave 6 and up are synthesized
        assert_eq!(wave_config(6).enemy_count, 38);
        assert!((wave_config(6).difficulty - 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_wave_labels() {
        assert_eq!(wave_config(1).label, "Scout Patrol");
        assert_eq!(wave_config(2).label, "Fighter Squadron");
        assert_eq!(wave_config(3).label, "Mixed Assault");
        assert_eq!(wave_config(4).label, "Bomber Run");
        assert_eq!(wave_config(5).label, "Elite Strike");
        assert_eq!(wave_config(7).label, "Wave 7 Assault");

        let t = Tuning::default();
        let mut ws = WaveSystem::new();
        ws.start_wave(4, &t.wave);
        assert_eq!(ws.label(), "Bomber Run");
    }

    #[test]
    fn test_completion_requires_empty_field() {
        let t = Tuning::default();
        let mut ws = WaveSystem::new();
        ws.start_wave(1, &t.wave);
        ws.record_kills(10);
        // Past the minimum duration but enemies still alive
        let outcome = ws.update(t.wave.min_duration + 1.0, 3, &t.wave);
        assert_eq!(outcome, WaveOutcome::InProgress);
        let outcome = ws.update(0.1, 0, &t.wave);
        assert!(matches!(outcome, WaveOutcome::Completed { .. }));
    }

    #[test]
    fn test_completion_respects_min_duration() {
        let t = Tuning::default();
        let mut ws = WaveSystem::new();
        ws.start_wave(1, &t.wave);
        ws.record_kills(10);
        assert_eq!(ws.update(1.0, 0, &t.wave), WaveOutcome::InProgress);
    }

    #[test]
    fn test_timer_ratio_handles_zero_duration() {
        let mut t = Tuning::default();
        let mut ws = WaveSystem::new();
        assert_eq!(ws.timer_ratio(), 0.0);

        t.wave.duration = 0.0;
        ws.start_wave(1, &t.wave);
        ws.update(1.0, 0, &t.wave);
        assert_eq!(ws.timer_ratio(), 0.0);
    }

    #[test]
    fn test_timeout_when_target_unmet() {
        let t = Tuning::default();
        let mut ws = WaveSystem::new();
        ws.start_wave(2, &t.wave);
        ws.record_kills(5);
        let outcome = ws.update(t.wave.duration + 0.1, 4, &t.wave);
        assert_eq!(outcome, WaveOutcome::TimedOut);
    }

    #[test]
    fn test_bonus_scales_with_wave_and_time() {
        let t = Tuning::default();
        let mut ws = WaveSystem::new();
        ws.start_wave(3, &t.wave);
        ws.record_kills(20);
        let outcome = ws.update(t.wave.min_duration + 1.0, 0, &t.wave);
        if let WaveOutcome::Completed { bonus } = outcome {
            let remaining = t.wave.duration - (t.wave.min_duration + 1.0);
            let expected = t.wave.completion_bonus * 3 + (t.wave.time_bonus_rate * remaining) as i64;
            assert_eq!(bonus, expected);
        } else {
            panic!("wave should have completed: {outcome:?}");
        }
    }
}
