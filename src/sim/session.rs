//! Session state machine shared by both games
//!
//! `Menu -> Playing <-> Paused`, `Playing -> GameOver`, and `reset` returns to
//! `Menu` from anywhere.

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run
    Paused,
    /// Run ended, overlay shown by the UI shell
    GameOver,
}

/// Notifications for the UI shell, drained after every command and frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    GameOver { score: u64 },
    /// Celebratory notification, at most once per game over
    NewHighScore { score: u64, previous: u64 },
}

/// Phase and score for one play-through
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Only ever increases between `start` calls
    pub score: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Begin a fresh run from any phase
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
    }

    /// Flip between `Playing` and `Paused`; returns the event if anything changed
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                Some(GameEvent::Paused)
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                Some(GameEvent::Resumed)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.phase = GamePhase::Menu;
        self.score = 0;
    }

    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Enter `GameOver`; returns false if the session was not playing
    pub fn finish(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }
}
