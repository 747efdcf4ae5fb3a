//! Simulation module
//!
//! All gameplay logic lives here:
//! - Advances only while the session is `Playing`
//! - Randomness only through the caller's RNG
//! - No rendering or platform dependencies

pub mod catcher;
pub mod collision;
pub mod glider;
pub mod session;

pub use catcher::{CatcherInput, CatcherState, Collector, FallingItem, ItemColor};
pub use collision::Rect;
pub use glider::{Cloud, GliderInput, GliderState, Obstacle, ObstacleKind, Player};
pub use session::{GameEvent, GamePhase, Session};
