//! Data-driven game balance
//!
//! Defaults mirror `crate::consts`; any field missing from a settings JSON
//! falls back to its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Date catcher balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatcherTuning {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Play time between spawns (ms)
    pub spawn_interval_ms: u64,
    pub collector_width: f32,
    pub collector_height: f32,
    /// Fall speed range in pixels/frame
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub points: u64,
}

impl Default for CatcherTuning {
    fn default() -> Self {
        Self {
            round_seconds: CATCHER_ROUND_SECONDS,
            spawn_interval_ms: CATCHER_SPAWN_INTERVAL_MS,
            collector_width: COLLECTOR_WIDTH,
            collector_height: COLLECTOR_HEIGHT,
            min_speed: ITEM_MIN_SPEED,
            max_speed: ITEM_MAX_SPEED,
            min_size: ITEM_MIN_SIZE,
            max_size: ITEM_MAX_SIZE,
            points: POINTS,
        }
    }
}

impl CatcherTuning {
    /// Raise degenerate values to something playable
    pub fn sanitized(mut self) -> Self {
        self.round_seconds = self.round_seconds.max(1);
        self.spawn_interval_ms = self.spawn_interval_ms.max(1);
        self.collector_width = self.collector_width.clamp(1.0, CANVAS_WIDTH);
        self.collector_height = self.collector_height.clamp(1.0, CANVAS_HEIGHT);
        self.min_speed = self.min_speed.max(0.1);
        self.max_speed = self.max_speed.max(self.min_speed);
        self.min_size = self.min_size.max(1.0);
        self.max_size = self.max_size.max(self.min_size);
        self
    }
}

/// Falcon glider balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GliderTuning {
    pub player_size: f32,
    pub player_x: f32,
    pub start_y: f32,
    pub gravity: f32,
    /// Must be negative (upward)
    pub flap_impulse: f32,
    pub ground_height: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    pub speed_ramp: f32,
    pub spawn_interval_frames: u64,
    pub cloud_count: usize,
    pub points: u64,
}

impl Default for GliderTuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_x: PLAYER_X,
            start_y: PLAYER_START_Y,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            ground_height: GROUND_HEIGHT,
            base_speed: BASE_SCROLL_SPEED,
            max_speed: MAX_SCROLL_SPEED,
            speed_ramp: SCROLL_RAMP,
            spawn_interval_frames: OBSTACLE_SPAWN_FRAMES,
            cloud_count: CLOUD_COUNT,
            points: POINTS,
        }
    }
}

impl GliderTuning {
    /// Raise degenerate values to something playable
    pub fn sanitized(mut self) -> Self {
        self.player_size = self.player_size.clamp(1.0, CANVAS_HEIGHT / 4.0);
        self.gravity = self.gravity.max(0.0);
        if self.flap_impulse >= 0.0 {
            log::warn!("flap_impulse {} is not upward, using default", self.flap_impulse);
            self.flap_impulse = FLAP_IMPULSE;
        }
        self.ground_height = self.ground_height.clamp(0.0, CANVAS_HEIGHT / 2.0);
        self.base_speed = self.base_speed.max(0.1);
        self.max_speed = self.max_speed.max(self.base_speed);
        self.speed_ramp = self.speed_ramp.max(0.0);
        self.spawn_interval_frames = self.spawn_interval_frames.max(1);
        self
    }

    /// Scroll speed after `frames` simulated frames
    #[inline]
    pub fn scroll_speed(&self, frames: u64) -> f32 {
        (self.base_speed + frames as f32 * self.speed_ramp).min(self.max_speed)
    }

    /// Top edge of the ground band
    #[inline]
    pub fn ground_y(&self) -> f32 {
        CANVAS_HEIGHT - self.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_speed_ramps_and_caps() {
        let tuning = GliderTuning::default();
        assert_eq!(tuning.scroll_speed(0), 2.0);
        assert!((tuning.scroll_speed(1000) - 3.0).abs() < 1e-4);
        assert_eq!(tuning.scroll_speed(3000), 5.0);
        assert_eq!(tuning.scroll_speed(1_000_000), 5.0);
    }

    #[test]
    fn test_sanitized_fixes_degenerate_values() {
        let tuning = GliderTuning {
            flap_impulse: 4.0,
            spawn_interval_frames: 0,
            max_speed: 1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.flap_impulse, FLAP_IMPULSE);
        assert_eq!(tuning.spawn_interval_frames, 1);
        assert_eq!(tuning.max_speed, tuning.base_speed);

        let catcher = CatcherTuning {
            spawn_interval_ms: 0,
            min_size: 30.0,
            max_size: 10.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(catcher.spawn_interval_ms, 1);
        assert_eq!(catcher.max_size, 30.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: GliderTuning = serde_json::from_str(r#"{"gravity": 0.25}"#).unwrap();
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.flap_impulse, FLAP_IMPULSE);
        assert_eq!(tuning.cloud_count, CLOUD_COUNT);
    }
}
