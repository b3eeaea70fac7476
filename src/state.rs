//! Top-level game phase state machine
//!
//! The manager only gates which systems run each frame; it performs no game
//! logic of its own. One level of "back" history is retained so Paused and
//! UpgradeSelect can return to whatever preceded them.

use serde::{Deserialize, Serialize};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    GameOver,
    UpgradeSelect,
    WaveTransition,
}

/// Auxiliary payload attached to a phase transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseData {
    /// Final score, set when entering GameOver
    pub final_score: Option<i64>,
    /// Wave number, set when entering WaveTransition
    pub wave: Option<u32>,
    /// Score bonus banked for the cleared wave
    pub wave_bonus: Option<i64>,
    /// Descriptive name of the cleared wave
    pub wave_label: Option<String>,
}

impl PhaseData {
    pub fn score(score: i64) -> Self {
        Self {
            final_score: Some(score),
            ..Default::default()
        }
    }

    pub fn wave_cleared(wave: u32, bonus: i64, label: impl Into<String>) -> Self {
        Self {
            wave: Some(wave),
            wave_bonus: Some(bonus),
            wave_label: Some(label.into()),
            ..Default::default()
        }
    }
}

/// Phase manager with single-level history
#[derive(Debug, Clone, Default)]
pub struct StateManager {
    current: GamePhase,
    previous: Option<GamePhase>,
    data: PhaseData,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    pub fn is(&self, phase: GamePhase) -> bool {
        self.current == phase
    }

    pub fn data(&self) -> &PhaseData {
        &self.data
    }

    /// Swap to a new phase, remembering the one being left.
    pub fn change(&mut self, phase: GamePhase, data: PhaseData) {
        self.previous = Some(self.current);
        self.current = phase;
        self.data = data;
    }

    /// Swap current and previous. No-op when there is no history.
    pub fn return_to_previous(&mut self, data: PhaseData) {
        if let Some(prev) = self.previous {
            self.previous = Some(self.current);
            self.current = prev;
            self.data = data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase_is_main_menu() {
        let sm = StateManager::new();
        assert_eq!(sm.current(), GamePhase::MainMenu);
    }

    #[test]
    fn test_change_records_previous() {
        let mut sm = StateManager::new();
        sm.change(GamePhase::Playing, PhaseData::default());
        sm.change(GamePhase::Paused, PhaseData::default());
        assert!(sm.is(GamePhase::Paused));
        sm.return_to_previous(PhaseData::default());
        assert!(sm.is(GamePhase::Playing));
    }

    #[test]
    fn test_only_one_level_of_history() {
        let mut sm = StateManager::new();
        sm.change(GamePhase::Playing, PhaseData::default());
        sm.change(GamePhase::Paused, PhaseData::default());
        sm.return_to_previous(PhaseData::default());
        // A second return swaps back again rather than walking further up
        sm.return_to_previous(PhaseData::default());
        assert!(sm.is(GamePhase::Paused));
    }

    #[test]
    fn test_payload_replaced_on_change() {
        let mut sm = StateManager::new();
        sm.change(GamePhase::GameOver, PhaseData::score(4200));
        assert_eq!(sm.data().final_score, Some(4200));
        sm.change(GamePhase::MainMenu, PhaseData::default());
        assert_eq!(sm.data().final_score, None);
    }
}
