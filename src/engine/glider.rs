//! Falcon glider engine

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{Engine, Snapshot};
use crate::highscores::{GLIDER_KEY, HighScore};
use crate::persistence::ScoreStore;
use crate::platform::{InputEvent, KeyCode};
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::glider::{self, GliderInput, GliderState};
use crate::sim::{GameEvent, GamePhase};

pub struct GliderEngine {
    state: GliderState,
    rng: Pcg32,
    store: Box<dyn ScoreStore>,
    high_score: HighScore,
    /// Flap requested since the last update
    flap_pending: bool,
    show_hud: bool,
    sun_glow: bool,
    idle_mode: bool,
}

impl GliderEngine {
    pub fn new(settings: &Settings, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let high_score = HighScore::load(store.as_ref(), GLIDER_KEY);
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            state: GliderState::new(settings.glider_tuning(), &mut rng),
            rng,
            store,
            high_score,
            flap_pending: false,
            show_hud: settings.show_hud,
            sun_glow: settings.sun_glow,
            idle_mode: settings.autopilot,
        }
    }

    /// Read-only view of the simulation, for tests and tooling
    pub fn state(&self) -> &GliderState {
        &self.state
    }

    fn record_result(&mut self) {
        let score = self.state.session.score;
        if let Some(previous) = self.high_score.submit(score, self.store.as_mut()) {
            self.state
                .events
                .push(GameEvent::NewHighScore { score, previous });
        }
    }
}

impl Engine for GliderEngine {
    fn name(&self) -> &'static str {
        "falconGlide"
    }

    fn start(&mut self) {
        self.flap_pending = false;
        self.state.start(&mut self.rng);
        log::info!("Falcon glider started");
    }

    fn toggle_pause(&mut self) {
        self.flap_pending = false;
        self.state.toggle_pause();
    }

    fn reset(&mut self) {
        self.flap_pending = false;
        self.state.reset(&mut self.rng);
    }

    /// One simulated frame; `dt_ms` is not used by the glider
    fn update(&mut self, _dt_ms: u32) {
        let mut input = GliderInput {
            flap: std::mem::take(&mut self.flap_pending),
        };
        if self.idle_mode {
            input.flap |= glider::autopilot(&self.state).flap;
        }

        let was_playing = self.state.session.is_playing();
        glider::tick(&mut self.state, &input, &mut self.rng);

        if was_playing && self.state.session.phase == GamePhase::GameOver {
            log::info!(
                "Falcon glider over, score {} at {} m",
                self.state.session.score,
                self.state.distance_meters()
            );
            self.record_result();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        renderer::glider::draw(&self.state, self.show_hud, self.sun_glow, surface);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if !self.state.session.is_playing() {
            return;
        }
        match event {
            InputEvent::PointerDown { .. } | InputEvent::KeyDown(KeyCode::Space) => {
                self.flap_pending = true;
            }
            _ => {}
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: self.name(),
            phase: self.state.session.phase,
            score: self.state.session.score,
            high_score: self.high_score.best(),
            time_left: None,
            distance: Some(self.state.frames),
            distance_meters: Some(self.state.distance_meters()),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    fn set_idle_mode(&mut self, enabled: bool) {
        self.idle_mode = enabled;
    }

    fn idle_mode(&self) -> bool {
        self.idle_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Obstacle, ObstacleKind};
    use proptest::prelude::*;

    fn engine_with(store: &MemoryStore) -> GliderEngine {
        GliderEngine::new(&Settings::default(), Box::new(store.clone()), 9)
    }

    #[test]
    fn test_ceiling_forces_game_over() {
        let store = MemoryStore::new();
        let mut engine = engine_with(&store);
        engine.start();
        engine.state.player.y = 0.0;
        engine.state.player.velocity = 0.0;
        engine.update(16);
        assert_eq!(engine.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_flap_sets_impulse_on_next_update() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.start();
        engine.state.player.velocity = 6.0;
        engine.handle_input(&InputEvent::KeyDown(KeyCode::Space));
        engine.update(16);
        assert_eq!(engine.state().player.velocity, FLAP_IMPULSE);

        engine.handle_input(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        engine.update(16);
        assert_eq!(engine.state().player.velocity, FLAP_IMPULSE);
    }

    #[test]
    fn test_flap_ignored_unless_playing() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.handle_input(&InputEvent::KeyDown(KeyCode::Space));
        engine.start();
        engine.update(16);
        assert_eq!(engine.state().player.velocity, GRAVITY);

        engine.toggle_pause();
        engine.handle_input(&InputEvent::KeyDown(KeyCode::Space));
        engine.toggle_pause();
        engine.update(16);
        assert_eq!(engine.state().player.velocity, 2.0 * GRAVITY);
    }

    #[test]
    fn test_pass_obstacle_scores_once() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.start();
        let player_x = engine.state.player.x;
        let mut obstacle = Obstacle::new(ObstacleKind::TallBarrier);
        obstacle.x = player_x - obstacle.width + 0.5;
        engine.state.obstacles.push(obstacle);

        engine.update(16);
        assert_eq!(engine.snapshot().score, 10);

        engine.state.obstacles[0].x = player_x - engine.state.obstacles[0].width + 0.5;
        engine.update(16);
        assert_eq!(engine.snapshot().score, 10);
    }

    #[test]
    fn test_crash_records_high_score_once() {
        let store = MemoryStore::with_entry(GLIDER_KEY, "10");
        let mut engine = engine_with(&store);
        engine.start();
        engine.state.session.score = 40;
        engine.state.player.y = -5.0;
        engine.update(16);
        engine.update(16);

        let events = engine.drain_events();
        let records = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count();
        assert_eq!(records, 1);
        assert_eq!(store.get(GLIDER_KEY), Some(40));

        // A new session with a lower score leaves the record alone
        engine.start();
        engine.state.session.score = 20;
        engine.state.player.y = 0.0;
        engine.update(16);
        assert_eq!(store.get(GLIDER_KEY), Some(40));
        assert_eq!(engine.snapshot().high_score, 40);
    }

    #[test]
    fn test_snapshot_distance() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.set_idle_mode(true);
        engine.start();
        for _ in 0..35 {
            engine.update(16);
        }
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.distance, Some(35));
        assert_eq!(snapshot.distance_meters, Some(3));
        assert_eq!(snapshot.time_left, None);
    }

    #[test]
    fn test_autopilot_setting_flies_unattended() {
        let settings = Settings {
            autopilot: true,
            ..Default::default()
        };
        let mut engine = GliderEngine::new(&settings, Box::new(MemoryStore::new()), 9);
        assert!(engine.idle_mode());
        engine.start();
        for _ in 0..35 {
            engine.update(16);
        }
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    proptest! {
        #[test]
        fn prop_reset_idempotent(frames in 0usize..300, flaps in prop::collection::vec(any::<bool>(), 300)) {
            let mut engine = engine_with(&MemoryStore::new());
            engine.start();
            for flap in flaps.iter().take(frames) {
                if *flap {
                    engine.handle_input(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
                }
                engine.update(16);
            }
            engine.reset();
            let once = engine.snapshot();
            let obstacles_once = engine.state().obstacles.len();
            engine.reset();
            prop_assert_eq!(once.clone(), engine.snapshot());
            prop_assert_eq!(obstacles_once, 0);
            prop_assert_eq!(engine.state().obstacles.len(), 0);
            prop_assert_eq!(once.phase, GamePhase::Menu);
            prop_assert_eq!(once.score, 0);
            prop_assert_eq!(once.distance, Some(0));
        }

        #[test]
        fn prop_paused_glider_frozen(frames in 1usize..100) {
            let mut engine = engine_with(&MemoryStore::new());
            engine.set_idle_mode(true);
            engine.start();
            for _ in 0..frames {
                engine.update(16);
            }
            engine.toggle_pause();
            let y = engine.state().player.y;
            let xs: Vec<f32> = engine.state().obstacles.iter().map(|o| o.x).collect();
            let before = engine.snapshot();
            for _ in 0..10 {
                engine.handle_input(&InputEvent::KeyDown(KeyCode::Space));
                engine.update(16);
            }
            prop_assert_eq!(engine.state().player.y, y);
            let after: Vec<f32> = engine.state().obstacles.iter().map(|o| o.x).collect();
            prop_assert_eq!(xs, after);
            prop_assert_eq!(before, engine.snapshot());
        }
    }
}
