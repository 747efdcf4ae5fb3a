//! Falcon glider simulation
//!
//! Frame-based: every tick is one simulated frame. Gravity pulls the falcon
//! down, a flap sets an upward velocity, and desert obstacles scroll in from
//! the right at a slowly rising speed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::session::{GameEvent, GamePhase, Session};
use crate::clamp_scaled;
use crate::consts::*;
use crate::tuning::GliderTuning;

/// The falcon. `x` is fixed for a run; `x, y` is the top-left of its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Pixels per frame, positive is downward
    pub velocity: f32,
    /// Visual tilt in degrees, derived from velocity
    pub rotation: f32,
    pub size: f32,
}

impl Player {
    pub fn new(tuning: &GliderTuning) -> Self {
        Self {
            x: tuning.player_x,
            y: tuning.start_y,
            velocity: 0.0,
            rotation: 0.0,
            size: tuning.player_size,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Cactus: narrow and tall
    TallBarrier,
    /// Rock: wide and low
    WideBarrier,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 2] = [ObstacleKind::TallBarrier, ObstacleKind::WideBarrier];

    /// (width, height)
    pub fn size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::TallBarrier => (30.0, 120.0),
            ObstacleKind::WideBarrier => (50.0, 80.0),
        }
    }
}

/// A scrolling obstacle standing on the bottom edge of the surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Set once the falcon has cleared it and the points were awarded
    #[serde(default)]
    pub passed: bool,
}

impl Obstacle {
    /// New obstacle at the right edge
    pub fn new(kind: ObstacleKind) -> Self {
        let (width, height) = kind.size();
        Self {
            x: CANVAS_WIDTH,
            y: CANVAS_HEIGHT - height,
            width,
            height,
            kind,
            passed: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Background cloud, cosmetic only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
}

impl Cloud {
    fn random(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.random_range(0.0..CANVAS_WIDTH * 2.0),
            y: rng.random_range(50.0..250.0),
            size: rng.random_range(30.0..70.0),
            speed: rng.random_range(0.2..0.7),
        }
    }

    /// Drift left, re-entering from beyond the right edge
    pub fn drift(&mut self, rng: &mut impl Rng) {
        self.x -= self.speed;
        if self.x < -self.size {
            self.x = CANVAS_WIDTH + rng.random_range(0.0..200.0);
            self.y = rng.random_range(50.0..250.0);
        }
    }
}

/// Per-frame input
#[derive(Debug, Clone, Default)]
pub struct GliderInput {
    pub flap: bool,
}

/// Complete glider state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GliderState {
    pub session: Session,
    pub tuning: GliderTuning,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    /// Current scroll speed (pixels/frame)
    pub speed: f32,
    /// Simulated frames this run; shown as distance
    pub frames: u64,
    /// Frame of the last obstacle spawn
    pub last_spawn_frame: u64,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GliderState {
    pub fn new(tuning: GliderTuning, rng: &mut impl Rng) -> Self {
        let mut state = Self {
            session: Session::new(),
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            clouds: Vec::new(),
            speed: tuning.base_speed,
            frames: 0,
            last_spawn_frame: 0,
            events: Vec::new(),
            tuning,
        };
        state.clear(rng);
        state
    }

    /// Clear entities and counters, re-seed the cloud layer
    pub fn clear(&mut self, rng: &mut impl Rng) {
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.speed = self.tuning.base_speed;
        self.frames = 0;
        self.last_spawn_frame = 0;
        self.clouds = (0..self.tuning.cloud_count)
            .map(|_| Cloud::random(rng))
            .collect();
    }

    pub fn start(&mut self, rng: &mut impl Rng) {
        self.clear(rng);
        self.session.start();
        self.events.push(GameEvent::Started);
    }

    pub fn toggle_pause(&mut self) {
        if let Some(event) = self.session.toggle_pause() {
            self.events.push(event);
        }
    }

    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.clear(rng);
        self.session.reset();
        self.events.push(GameEvent::Reset);
    }

    pub fn spawn_obstacle(&mut self, rng: &mut impl Rng) {
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        self.obstacles.push(Obstacle::new(kind));
    }

    /// Distance shown to the player (one meter per ten frames)
    pub fn distance_meters(&self) -> u64 {
        self.frames / 10
    }

    /// Falcon touches the ceiling or sinks into the ground band
    fn out_of_bounds(&self) -> bool {
        let bounds = self.player.bounds();
        bounds.y <= 0.0 || bounds.bottom() > self.tuning.ground_y()
    }

    fn hits_obstacle(&self) -> bool {
        let bounds = self.player.bounds();
        self.obstacles.iter().any(|o| o.bounds().overlaps(&bounds))
    }

    fn crash(&mut self) {
        if self.session.finish() {
            log::debug!("Falcon crashed at frame {}", self.frames);
            self.events.push(GameEvent::GameOver {
                score: self.session.score,
            });
        }
    }
}

/// Advance the glider by one simulated frame
pub fn tick(state: &mut GliderState, input: &GliderInput, rng: &mut impl Rng) {
    if state.session.phase != GamePhase::Playing {
        return;
    }

    // A falcon left resting on a boundary ends the run before integrating
    if state.out_of_bounds() {
        state.crash();
        return;
    }

    state.frames += 1;

    let player = &mut state.player;
    player.velocity += state.tuning.gravity;
    if input.flap {
        player.velocity = state.tuning.flap_impulse;
    }
    player.y += player.velocity;
    player.rotation = if input.flap {
        FLAP_ROTATION
    } else {
        clamp_scaled(player.velocity, ROTATION_PER_VELOCITY, MAX_ROTATION)
    };

    state.speed = state.tuning.scroll_speed(state.frames);

    if state.frames - state.last_spawn_frame >= state.tuning.spawn_interval_frames {
        state.spawn_obstacle(rng);
        state.last_spawn_frame = state.frames;
    }

    let speed = state.speed;
    let player_x = state.player.x;
    let points = state.tuning.points;
    let mut earned = 0;
    state.obstacles.retain_mut(|obstacle| {
        obstacle.x -= speed;
        if !obstacle.passed && obstacle.right() < player_x {
            obstacle.passed = true;
            earned += points;
        }
        obstacle.x > -obstacle.width
    });
    state.session.award(earned);

    for cloud in &mut state.clouds {
        cloud.drift(rng);
    }

    if state.out_of_bounds() || state.hits_obstacle() {
        state.crash();
    }
}

/// Demo AI: flap to stay above the next obstacle, otherwise hold mid-air
pub fn autopilot(state: &GliderState) -> GliderInput {
    let player = &state.player;
    let ahead = state
        .obstacles
        .iter()
        .filter(|o| o.right() >= player.x)
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    let cruise = state.tuning.ground_y() / 2.0;
    let target_bottom = match ahead {
        Some(obstacle) if obstacle.x - player.x < 250.0 => obstacle.y - 30.0,
        _ => cruise + player.size,
    };

    // Look a few frames ahead so the flap lands before the falcon sinks too far
    let predicted_bottom = player.y + player.size + player.velocity * 4.0;
    GliderInput {
        flap: player.velocity >= 0.0 && predicted_bottom > target_bottom,
    }
}
