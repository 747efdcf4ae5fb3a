//! Date catcher simulation
//!
//! Dates fall at a fixed per-item speed, a basket slides along the bottom
//! edge, and a 60 second round counts down on accumulated play time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::session::{GameEvent, GamePhase, Session};
use crate::consts::*;
use crate::tuning::CatcherTuning;

/// Palette for falling dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemColor {
    SaddleBrown,
    Sienna,
    Peru,
    Chocolate,
}

impl ItemColor {
    pub const ALL: [ItemColor; 4] = [
        ItemColor::SaddleBrown,
        ItemColor::Sienna,
        ItemColor::Peru,
        ItemColor::Chocolate,
    ];

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ItemColor::SaddleBrown => (0x8B, 0x45, 0x13),
            ItemColor::Sienna => (0xA0, 0x52, 0x2D),
            ItemColor::Peru => (0xCD, 0x85, 0x3F),
            ItemColor::Chocolate => (0xD2, 0x69, 0x1E),
        }
    }
}

/// A falling date. `x, y` is the top-left of a `size`×`size` box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub x: f32,
    pub y: f32,
    /// Pixels per frame
    pub speed: f32,
    pub size: f32,
    pub color: ItemColor,
}

impl FallingItem {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

/// The basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    /// Left edge, kept within `[0, CANVAS_WIDTH - width]`
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Collector {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: CANVAS_WIDTH / 2.0 - width / 2.0,
            width,
            height,
        }
    }

    /// Top edge of the catch zone
    #[inline]
    pub fn top(&self) -> f32 {
        CANVAS_HEIGHT - self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.top(), self.width, self.height)
    }

    /// Center the basket on a pointer x, clamped to the play field
    pub fn follow_pointer(&mut self, pointer_x: f32) {
        let max_x = (CANVAS_WIDTH - self.width).max(0.0);
        self.x = (pointer_x - self.width / 2.0).clamp(0.0, max_x);
    }
}

/// Per-frame input
#[derive(Debug, Clone, Default)]
pub struct CatcherInput {
    /// Latest pointer x in surface coordinates
    pub pointer_x: Option<f32>,
}

/// Complete date catcher state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatcherState {
    pub session: Session,
    pub tuning: CatcherTuning,
    pub items: Vec<FallingItem>,
    pub collector: Collector,
    /// Accumulated play time; pauses do not count
    pub play_time_ms: u64,
    /// Play time at the last spawn
    pub last_spawn_ms: u64,
    pub time_left: u32,
    /// Pending notifications for the UI shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl CatcherState {
    pub fn new(tuning: CatcherTuning) -> Self {
        let collector = Collector::new(tuning.collector_width, tuning.collector_height);
        let time_left = tuning.round_seconds;
        Self {
            session: Session::new(),
            tuning,
            items: Vec::new(),
            collector,
            play_time_ms: 0,
            last_spawn_ms: 0,
            time_left,
            events: Vec::new(),
        }
    }

    /// Clear entities and counters back to their initial values
    pub fn clear(&mut self) {
        self.items.clear();
        self.collector = Collector::new(self.tuning.collector_width, self.tuning.collector_height);
        self.play_time_ms = 0;
        self.last_spawn_ms = 0;
        self.time_left = self.tuning.round_seconds;
    }

    /// Begin a fresh run from any phase
    pub fn start(&mut self) {
        self.clear();
        self.session.start();
        self.events.push(GameEvent::Started);
    }

    pub fn toggle_pause(&mut self) {
        if let Some(event) = self.session.toggle_pause() {
            self.events.push(event);
        }
    }

    pub fn reset(&mut self) {
        self.clear();
        self.session.reset();
        self.events.push(GameEvent::Reset);
    }

    /// Drop a new item at a random column
    pub fn spawn_item(&mut self, rng: &mut impl Rng) {
        let tuning = &self.tuning;
        let max_x = (CANVAS_WIDTH - ITEM_SPAWN_MARGIN).max(1.0);
        let color = ItemColor::ALL[rng.random_range(0..ItemColor::ALL.len())];
        let item = FallingItem {
            x: rng.random_range(0.0..max_x),
            y: ITEM_SPAWN_Y,
            speed: random_in(rng, tuning.min_speed, tuning.max_speed),
            size: random_in(rng, tuning.min_size, tuning.max_size),
            color,
        };
        self.items.push(item);
    }

    /// Seconds left given the accumulated play time
    fn remaining_seconds(&self) -> u32 {
        let elapsed = (self.play_time_ms / 1000).min(u32::MAX as u64) as u32;
        self.tuning.round_seconds.saturating_sub(elapsed)
    }
}

/// Uniform draw in `[lo, hi)`; a collapsed range yields `lo`
fn random_in(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Single filtering pass: returns points earned this frame
///
/// An item is caught once its bottom edge has reached the basket's top edge
/// while the horizontal extents overlap. Items whose top edge has left the
/// bottom of the surface are dropped without score.
pub fn resolve_catches(items: &mut Vec<FallingItem>, collector: &Collector, points: u64) -> u64 {
    let zone = collector.bounds();
    let mut earned = 0;
    items.retain(|item| {
        let bounds = item.bounds();
        if bounds.bottom() >= zone.y && bounds.overlaps_x(&zone) {
            earned += points;
            return false;
        }
        item.y < CANVAS_HEIGHT
    });
    earned
}

/// Advance the catcher by one display frame of `dt_ms` play time
pub fn tick(state: &mut CatcherState, input: &CatcherInput, dt_ms: u32, rng: &mut impl Rng) {
    if state.session.phase != GamePhase::Playing {
        return;
    }

    if let Some(x) = input.pointer_x {
        state.collector.follow_pointer(x);
    }

    state.play_time_ms += dt_ms as u64;

    if state.play_time_ms - state.last_spawn_ms >= state.tuning.spawn_interval_ms {
        state.spawn_item(rng);
        state.last_spawn_ms = state.play_time_ms;
    }

    for item in &mut state.items {
        item.y += item.speed;
    }

    let earned = resolve_catches(&mut state.items, &state.collector, state.tuning.points);
    state.session.award(earned);

    state.time_left = state.remaining_seconds();
    if state.time_left == 0 && state.session.finish() {
        state.events.push(GameEvent::GameOver {
            score: state.session.score,
        });
    }
}

/// Demo AI: slide under the lowest item
pub fn autopilot(state: &CatcherState) -> CatcherInput {
    let target = state
        .items
        .iter()
        .filter(|item| item.y < state.collector.top())
        .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
        .map(|item| item.bounds().center().x);
    CatcherInput { pointer_x: target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> (CatcherState, Pcg32) {
        let mut state = CatcherState::new(CatcherTuning::default());
        state.start();
        (state, Pcg32::seed_from_u64(7))
    }

    fn item_at(x: f32, y: f32, size: f32, speed: f32) -> FallingItem {
        FallingItem {
            x,
            y,
            speed,
            size,
            color: ItemColor::Peru,
        }
    }

    #[test]
    fn test_spawn_after_one_second_of_play() {
        let (mut state, mut rng) = playing_state();
        let input = CatcherInput::default();
        for _ in 0..9 {
            tick(&mut state, &input, 100, &mut rng);
        }
        assert!(state.items.is_empty());

        tick(&mut state, &input, 100, &mut rng);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.play_time_ms, 1000);
    }

    #[test]
    fn test_spawned_item_ranges() {
        let (mut state, mut rng) = playing_state();
        for _ in 0..200 {
            state.spawn_item(&mut rng);
        }
        for item in &state.items {
            assert!(item.x >= 0.0 && item.x < CANVAS_WIDTH - ITEM_SPAWN_MARGIN);
            assert_eq!(item.y, ITEM_SPAWN_Y);
            assert!(item.speed >= ITEM_MIN_SPEED && item.speed < ITEM_MAX_SPEED);
            assert!(item.size >= ITEM_MIN_SIZE && item.size < ITEM_MAX_SIZE);
        }
    }

    #[test]
    fn test_catch_awards_points_once() {
        let (mut state, mut rng) = playing_state();
        let top = state.collector.top();
        let x = state.collector.x + 10.0;
        // Bottom edge lands exactly on the basket top after one frame
        state.items.push(item_at(x, top - 20.0 - 4.0, 20.0, 4.0));

        tick(&mut state, &CatcherInput::default(), 16, &mut rng);
        assert_eq!(state.session.score, 10);
        assert!(state.items.is_empty());

        tick(&mut state, &CatcherInput::default(), 16, &mut rng);
        assert_eq!(state.session.score, 10);
    }

    #[test]
    fn test_miss_removes_without_score() {
        let (mut state, mut rng) = playing_state();
        state.collector.x = 0.0;
        state.items.push(item_at(600.0, CANVAS_HEIGHT - 2.0, 20.0, 5.0));

        tick(&mut state, &CatcherInput::default(), 16, &mut rng);
        assert!(state.items.is_empty());
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_item_above_basket_not_caught() {
        let (mut state, mut rng) = playing_state();
        let x = state.collector.x;
        state.items.push(item_at(x, 100.0, 20.0, 3.0));
        tick(&mut state, &CatcherInput::default(), 16, &mut rng);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].y, 103.0);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_pointer_clamped() {
        let (mut state, mut rng) = playing_state();
        tick(&mut state, &CatcherInput { pointer_x: Some(-50.0) }, 16, &mut rng);
        assert_eq!(state.collector.x, 0.0);
        tick(&mut state, &CatcherInput { pointer_x: Some(5000.0) }, 16, &mut rng);
        assert_eq!(state.collector.x, CANVAS_WIDTH - COLLECTOR_WIDTH);
        tick(&mut state, &CatcherInput { pointer_x: Some(400.0) }, 16, &mut rng);
        assert_eq!(state.collector.x, 360.0);
    }

    #[test]
    fn test_timer_runs_out() {
        let (mut state, mut rng) = playing_state();
        let input = CatcherInput::default();
        tick(&mut state, &input, 1500, &mut rng);
        assert_eq!(state.time_left, 59);

        for _ in 0..58 {
            tick(&mut state, &input, 1000, &mut rng);
        }
        assert_eq!(state.time_left, 1);
        assert_eq!(state.session.phase, GamePhase::Playing);

        tick(&mut state, &input, 500, &mut rng);
        assert_eq!(state.time_left, 0);
        assert_eq!(state.session.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_frozen_when_not_playing() {
        let (mut state, mut rng) = playing_state();
        state.items.push(item_at(100.0, 100.0, 20.0, 3.0));
        state.toggle_pause();

        tick(&mut state, &CatcherInput { pointer_x: Some(10.0) }, 1000, &mut rng);
        assert_eq!(state.items[0].y, 100.0);
        assert_eq!(state.play_time_ms, 0);
        assert_eq!(state.collector.x, 360.0);
    }

    #[test]
    fn test_autopilot_targets_lowest_item() {
        let (mut state, _) = playing_state();
        state.items.push(item_at(100.0, 50.0, 20.0, 3.0));
        state.items.push(item_at(500.0, 300.0, 20.0, 3.0));
        assert_eq!(autopilot(&state).pointer_x, Some(510.0));

        state.items.clear();
        assert_eq!(autopilot(&state).pointer_x, None);
    }
}
