//! Neonfall - simulation core for a top-down neon arcade shooter
//!
//! Core modules:
//! - `game`: Top-level frame step, entity containers, menu actions
//! - `entities`: Player, enemies, bullets, particles, pickups
//! - `systems`: Collision resolution, spawning, wave progression
//! - `collide`: Pixel-mask and rectangle overlap tests
//! - `tuning`: Data-driven game balance
//!
//! The crate is headless: it exposes per-frame drawable state and discrete
//! side-effect requests (`FrameEvent`) and consumes input snapshots plus a
//! time delta. Rendering, audio and UI presentation live in the host.

pub mod collide;
pub mod entities;
pub mod events;
pub mod game;
pub mod state;
pub mod systems;
pub mod timer;
pub mod tuning;

pub use events::{FrameEvent, SoundCue};
pub use game::{FrameInput, Game, HudStats, MenuAction};
pub use state::{GamePhase, PhaseData, StateManager};
pub use tuning::{DifficultyProfile, Tuning, UpgradeKind};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical pixels)
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Largest frame delta the simulation will accept (seconds).
    /// Longer stalls are clamped to keep integration stable.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Reference frame rate the px/frame speeds are tuned at. Velocities
    /// expressed in px/frame are multiplied by this and `dt`.
    pub const FRAME_SCALE: f32 = 60.0;

    /// Hard cap on concurrently live particles
    pub const MAX_PARTICLES: usize = 500;

    /// Margin beyond the screen rect inside which entities stay alive
    pub const CULL_MARGIN: f32 = 64.0;
}

/// Center of the playfield
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}

/// True if a centered `size` rect at `pos` still touches the screen rect
/// grown by the cull margin.
#[inline]
pub fn on_screen(pos: Vec2, size: Vec2) -> bool {
    let half = size / 2.0;
    pos.x + half.x > -consts::CULL_MARGIN
        && pos.x - half.x < consts::SCREEN_WIDTH + consts::CULL_MARGIN
        && pos.y + half.y > -consts::CULL_MARGIN
        && pos.y - half.y < consts::SCREEN_HEIGHT + consts::CULL_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_screen_margins() {
        let size = Vec2::new(30.0, 30.0);
        assert!(on_screen(screen_center(), size));
        // Just above the top edge, inside the cull margin
        assert!(on_screen(Vec2::new(600.0, -40.0), size));
        // Far below the bottom edge
        assert!(!on_screen(Vec2::new(600.0, 1000.0), size));
    }
}
