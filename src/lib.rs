//! Desert Arcade - two canvas mini-games
//!
//! Core modules:
//! - `sim`: Simulation state and per-frame update (no rendering, no platform)
//! - `renderer`: Drawing-surface abstraction and scene painters
//! - `engine`: Engine trait, the two game engines, and the frame-loop host
//! - `platform`: Input events and frame scheduling (browser/native)
//! - `persistence`: High score storage port
//! - `tuning`: Data-driven game balance

pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{CatcherEngine, Engine, GameHost, GliderEngine, Snapshot};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical drawing surface size (both games)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Nominal frame length (~60 Hz), used for the first frame after arming the loop
    pub const FRAME_MS: u32 = 16;
    /// Longest frame delta fed to an engine (tab switches, debugger stalls)
    pub const MAX_FRAME_MS: u32 = 100;

    /// Date catcher defaults
    pub const CATCHER_ROUND_SECONDS: u32 = 60;
    pub const CATCHER_SPAWN_INTERVAL_MS: u64 = 1000;
    pub const COLLECTOR_WIDTH: f32 = 80.0;
    pub const COLLECTOR_HEIGHT: f32 = 40.0;
    /// Items enter this far above the top edge
    pub const ITEM_SPAWN_Y: f32 = -30.0;
    /// Spawn x is drawn from [0, CANVAS_WIDTH - ITEM_SPAWN_MARGIN)
    pub const ITEM_SPAWN_MARGIN: f32 = 30.0;
    pub const ITEM_MIN_SPEED: f32 = 2.0;
    pub const ITEM_MAX_SPEED: f32 = 5.0;
    pub const ITEM_MIN_SIZE: f32 = 15.0;
    pub const ITEM_MAX_SIZE: f32 = 25.0;

    /// Falcon glider defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_X: f32 = 150.0;
    pub const PLAYER_START_Y: f32 = 300.0;
    /// Gravity in pixels/frame²
    pub const GRAVITY: f32 = 0.5;
    /// Upward velocity set by a flap (pixels/frame)
    pub const FLAP_IMPULSE: f32 = -8.0;
    /// Rotation cue forced by a flap (degrees)
    pub const FLAP_ROTATION: f32 = -20.0;
    /// Rotation is 3° per unit of velocity, clamped to ±45°
    pub const ROTATION_PER_VELOCITY: f32 = 3.0;
    pub const MAX_ROTATION: f32 = 45.0;
    pub const GROUND_HEIGHT: f32 = 50.0;
    pub const BASE_SCROLL_SPEED: f32 = 2.0;
    pub const MAX_SCROLL_SPEED: f32 = 5.0;
    /// Scroll speed gained per elapsed frame
    pub const SCROLL_RAMP: f32 = 0.001;
    pub const OBSTACLE_SPAWN_FRAMES: u64 = 150;
    pub const CLOUD_COUNT: usize = 5;

    /// Points per caught item / passed obstacle
    pub const POINTS: u64 = 10;
}

/// Clamped linear map used for derived visual values
#[inline]
pub fn clamp_scaled(value: f32, scale: f32, limit: f32) -> f32 {
    (value * scale).clamp(-limit, limit)
}
