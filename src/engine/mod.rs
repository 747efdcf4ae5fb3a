//! Game engines and the frame-loop host
//!
//! An engine owns one game's state exclusively. The host drives it once per
//! display refresh (update, then render) and the surrounding UI only ever
//! sees a [`Snapshot`] and drained [`GameEvent`]s.

mod catcher;
mod glider;
mod host;

pub use catcher::CatcherEngine;
pub use glider::GliderEngine;
pub use host::{FrameObserver, GameHost, Mounted};

use serde::Serialize;

use crate::platform::InputEvent;
use crate::renderer::Surface;
use crate::sim::{GameEvent, GamePhase};

/// Derived display values for the UI shell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub game: &'static str,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Catcher only: seconds left in the round
    pub time_left: Option<u32>,
    /// Glider only: frames flown this run
    pub distance: Option<u64>,
    /// Glider only: distance shown as meters
    pub distance_meters: Option<u64>,
}

/// One self-contained game
pub trait Engine {
    /// Short name, also the high score key prefix
    fn name(&self) -> &'static str;

    /// Reset entities and counters and begin playing, from any phase
    fn start(&mut self);

    /// `Playing <-> Paused`; no-op in other phases
    fn toggle_pause(&mut self);

    /// Back to `Menu`, clearing all transient entities
    fn reset(&mut self);

    /// Advance one display frame. Mutates nothing unless playing.
    fn update(&mut self, dt_ms: u32);

    /// Draw the current frame; never mutates game state
    fn render(&self, surface: &mut dyn Surface);

    /// Input filtered by the current phase
    fn handle_input(&mut self, event: &InputEvent);

    fn snapshot(&self) -> Snapshot;

    /// Events raised since the last drain
    fn drain_events(&mut self) -> Vec<GameEvent>;

    /// Demo AI takes over the controls
    fn set_idle_mode(&mut self, enabled: bool);

    fn idle_mode(&self) -> bool;

    fn phase(&self) -> GamePhase {
        self.snapshot().phase
    }
}
