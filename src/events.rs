//! Side-effect requests emitted by the simulation
//!
//! The core never shakes a screen or plays a sound itself. It queues
//! requests here; the host drains the queue once per frame and is free to
//! batch, degrade or drop them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound cues for the host audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    PlayerShot,
    EnemyShot,
    MissileLaunch,
    Explosion,
    PlayerHit,
    PickupCollected,
    LevelUp,
    WaveComplete,
    GameOver,
}

/// One frame's worth of discrete side effects, newest last
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FrameEvent {
    /// Request a camera shake of the given intensity (host scale)
    ScreenShake { intensity: f32 },
    /// Play a sound cue
    Sound(SoundCue),
    /// An enemy was destroyed; position is where the kill happened
    EnemyDestroyed { score_value: i64, pos: Vec2 },
    /// The player reached a new level
    LevelUp { level: u32 },
    /// A wave was cleared with the given total score bonus
    WaveCompleted { wave: u32, bonus: i64 },
    /// A wave timed out before completion
    WaveFailed { wave: u32 },
    /// The run ended
    GameOver { score: i64 },
}

/// FIFO queue of frame events, drained by the host each frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<FrameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    pub fn shake(&mut self, intensity: f32) {
        self.events.push(FrameEvent::ScreenShake { intensity });
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(FrameEvent::Sound(cue));
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut q = EventQueue::default();
        q.shake(2.0);
        q.sound(SoundCue::Explosion);
        assert_eq!(q.drain().len(), 2);
        assert!(q.is_empty());
    }
}
