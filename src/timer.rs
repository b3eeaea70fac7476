//! Countdown timers used for cooldowns and timed effect windows
//!
//! The simulation never samples a wall clock; everything is advanced by the
//! per-frame delta, so both types are plain accumulators.

use serde::{Deserialize, Serialize};

/// Rate limiter with a fixed minimum interval between firings.
///
/// Starts ready. `fire` succeeds only when the interval has elapsed and
/// re-arms the timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooldown {
    period: f32,
    remaining: f32,
}

impl Cooldown {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            remaining: 0.0,
        }
    }

    /// Start with part of the interval already pending. Used to seed enemy
    /// shot timers with jitter so salvos desynchronize.
    pub fn with_remaining(period: f32, remaining: f32) -> Self {
        Self { period, remaining }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Consume the cooldown if ready. Returns whether it fired.
    pub fn fire(&mut self) -> bool {
        if self.ready() {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Change the interval without disturbing the pending remainder.
    pub fn set_period(&mut self, period: f32) {
        self.period = period;
    }
}

/// One-shot countdown window (invulnerability, hit flash, emitter duration).
///
/// Inactive until started; `ratio` reports remaining/total for fade-outs and
/// treats a zero-length window as already finished (0/0 = 0).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn start_for(&mut self, duration: f32) {
        self.duration = duration;
        self.remaining = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    pub fn active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Fraction of the window still remaining, in [0, 1].
    pub fn ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_rate_limits() {
        let mut cd = Cooldown::new(0.15);
        assert!(cd.fire());
        assert!(!cd.fire());
        cd.tick(0.10);
        assert!(!cd.fire());
        cd.tick(0.06);
        assert!(cd.fire());
    }

    #[test]
    fn test_cooldown_jitter_seed() {
        let mut cd = Cooldown::with_remaining(2.0, 0.5);
        assert!(!cd.ready());
        cd.tick(0.5);
        assert!(cd.ready());
    }

    #[test]
    fn test_countdown_window() {
        let mut inv = Countdown::new(1.0);
        assert!(!inv.active());
        inv.start();
        assert!(inv.active());
        inv.tick(0.4);
        assert!((inv.ratio() - 0.6).abs() < 1e-6);
        inv.tick(0.7);
        assert!(!inv.active());
        assert_eq!(inv.ratio(), 0.0);
    }

    #[test]
    fn test_countdown_zero_duration_ratio() {
        let mut c = Countdown::new(0.0);
        c.start();
        assert!(!c.active());
        assert_eq!(c.ratio(), 0.0);
    }
}
