//! Date catcher engine

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{Engine, Snapshot};
use crate::highscores::{CATCHER_KEY, HighScore};
use crate::persistence::ScoreStore;
use crate::platform::InputEvent;
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::catcher::{self, CatcherInput, CatcherState};
use crate::sim::{GameEvent, GamePhase};

pub struct CatcherEngine {
    state: CatcherState,
    rng: Pcg32,
    store: Box<dyn ScoreStore>,
    high_score: HighScore,
    show_hud: bool,
    idle_mode: bool,
}

impl CatcherEngine {
    pub fn new(settings: &Settings, store: Box<dyn ScoreStore>, seed: u64) -> Self {
        let high_score = HighScore::load(store.as_ref(), CATCHER_KEY);
        Self {
            state: CatcherState::new(settings.catcher_tuning()),
            rng: Pcg32::seed_from_u64(seed),
            store,
            high_score,
            show_hud: settings.show_hud,
            idle_mode: settings.autopilot,
        }
    }

    /// Read-only view of the simulation, for tests and tooling
    pub fn state(&self) -> &CatcherState {
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

impl Engine for CatcherEngine {
    fn name(&self) -> &'static str {
        "dateCatcher"
    }

    fn start(&mut self) {
        self.state.start();
        log::info!("Date catcher started");
    }

    fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn update(&mut self, dt_ms: u32) {
        let input = if self.idle_mode {
            catcher::autopilot(&self.state)
        } else {
            CatcherInput::default()
        };

        let was_playing = self.state.session.is_playing();
        catcher::tick(&mut self.state, &input, dt_ms, &mut self.rng);

        if was_playing && self.state.session.phase == GamePhase::GameOver {
            log::info!("Date catcher over, score {}", self.state.session.score);
            self.record_result();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        renderer::catcher::draw(&self.state, self.show_hud, surface);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if !self.state.session.is_playing() || self.idle_mode {
            return;
        }
        if let InputEvent::PointerMove { x, .. } = *event {
            self.state.collector.follow_pointer(x);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: self.name(),
            phase: self.state.session.phase,
            score: self.state.session.score,
            high_score: self.high_score.best(),
            time_left: Some(self.state.time_left),
            distance: None,
            distance_meters: None,
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
    use crate::persistence::MemoryStore;
    use crate::renderer::RecordingSurface;
    use crate::sim::{FallingItem, ItemColor};
    use proptest::prelude::*;

    fn engine_with(store: &MemoryStore) -> CatcherEngine {
        CatcherEngine::new(&Settings::default(), Box::new(store.clone()), 42)
    }

    fn count_new_records(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewHighScore { .. }))
            .count()
    }

    #[test]
    fn test_one_second_spawns_one_item_then_catch() {
        let store = MemoryStore::new();
        let mut engine = engine_with(&store);
        engine.start();
        for _ in 0..10 {
            engine.update(100);
        }
        assert_eq!(engine.state().items.len(), 1);

        // Put the item right above the basket so it lands next frame
        let collector = engine.state.collector.clone();
        let item = &mut engine.state.items[0];
        item.x = collector.x + 5.0;
        item.y = collector.top() - item.size - item.speed;
        engine.update(16);

        assert_eq!(engine.snapshot().score, 10);
        assert!(engine.state().items.is_empty());
    }

    #[test]
    fn test_timeout_records_high_score_once() {
        let store = MemoryStore::with_entry(CATCHER_KEY, "30");
        let mut engine = engine_with(&store);
        assert_eq!(engine.snapshot().high_score, 30);

        engine.start();
        engine.drain_events();
        engine.state.session.score = 50;
        engine.state.play_time_ms = 59_990;
        engine.update(16);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, GamePhase::GameOver);
        assert_eq!(snapshot.time_left, Some(0));
        assert_eq!(snapshot.high_score, 50);
        assert_eq!(store.get(CATCHER_KEY), Some(50));

        let events = engine.drain_events();
        assert_eq!(count_new_records(&events), 1);
        assert!(events.contains(&GameEvent::NewHighScore {
            score: 50,
            previous: 30
        }));

        // Overlay frames do not celebrate again
        for _ in 0..5 {
            engine.update(16);
        }
        assert_eq!(count_new_records(&engine.drain_events()), 0);
    }

    #[test]
    fn test_lower_score_not_persisted() {
        let store = MemoryStore::with_entry(CATCHER_KEY, "90");
        let mut engine = engine_with(&store);
        engine.start();
        engine.state.session.score = 40;
        engine.state.play_time_ms = 60_000;
        engine.update(16);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(store.get(CATCHER_KEY), Some(90));
        assert_eq!(count_new_records(&engine.drain_events()), 0);
    }

    #[test]
    fn test_pointer_ignored_unless_playing() {
        let mut engine = engine_with(&MemoryStore::new());
        let start_x = engine.state().collector.x;
        engine.handle_input(&InputEvent::PointerMove { x: 100.0, y: 0.0 });
        assert_eq!(engine.state().collector.x, start_x);

        engine.start();
        engine.handle_input(&InputEvent::PointerMove { x: 100.0, y: 0.0 });
        assert_eq!(engine.state().collector.x, 60.0);

        engine.toggle_pause();
        engine.handle_input(&InputEvent::PointerMove { x: 700.0, y: 0.0 });
        assert_eq!(engine.state().collector.x, 60.0);
    }

    #[test]
    fn test_reset_twice_matches_once() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.start();
        engine.update(1500);
        engine.reset();
        let once = engine.snapshot();
        engine.reset();
        let twice = engine.snapshot();
        assert_eq!(once, twice);
        assert_eq!(twice.phase, GamePhase::Menu);
        assert_eq!(twice.score, 0);
        assert_eq!(twice.time_left, Some(60));
        assert!(engine.state().items.is_empty());
    }

    #[test]
    fn test_render_does_not_mutate() {
        let mut engine = engine_with(&MemoryStore::new());
        engine.start();
        engine.state.items.push(FallingItem {
            x: 10.0,
            y: 10.0,
            speed: 2.0,
            size: 20.0,
            color: ItemColor::Chocolate,
        });
        let before = engine.snapshot();
        let mut surface = RecordingSurface::new();
        engine.render(&mut surface);
        engine.render(&mut surface);
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.state().items[0].y, 10.0);
    }

    #[test]
    fn test_autopilot_setting_starts_idle() {
        let settings = Settings {
            autopilot: true,
            ..Default::default()
        };
        let engine = CatcherEngine::new(&settings, Box::new(MemoryStore::new()), 1);
        assert!(engine.idle_mode());
        assert!(!engine_with(&MemoryStore::new()).idle_mode());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        TogglePause,
        Reset,
        Update(u32),
        Pointer(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => Just(Op::Start),
            1 => Just(Op::TogglePause),
            1 => Just(Op::Reset),
            8 => (1u32..2000).prop_map(Op::Update),
            3 => (-100.0f32..900.0).prop_map(Op::Pointer),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_and_high_score_monotonic(ops in prop::collection::vec(op(), 1..200)) {
            let store = MemoryStore::new();
            let mut engine = engine_with(&store);
            let mut last = engine.snapshot();
            for op in ops {
                let restarts = matches!(op, Op::Start | Op::Reset);
                match op {
                    Op::Start => engine.start(),
                    Op::TogglePause => engine.toggle_pause(),
                    Op::Reset => engine.reset(),
                    Op::Update(dt) => engine.update(dt),
                    Op::Pointer(x) => engine.handle_input(&InputEvent::PointerMove { x, y: 0.0 }),
                }
                let now = engine.snapshot();
                if !restarts {
                    prop_assert!(now.score >= last.score);
                }
                prop_assert!(now.high_score >= last.high_score);
                prop_assert_eq!(store.get(CATCHER_KEY).unwrap_or(0), now.high_score);
                last = now;
            }
        }

        #[test]
        fn prop_frozen_unless_playing(dt in 1u32..5000, pause in any::<bool>()) {
            let mut engine = engine_with(&MemoryStore::new());
            engine.start();
            engine.update(1000);
            if pause {
                engine.toggle_pause();
            } else {
                engine.reset();
            }
            let items: Vec<(f32, f32)> = engine.state().items.iter().map(|i| (i.x, i.y)).collect();
            let before = engine.snapshot();
            engine.update(dt);
            let after: Vec<(f32, f32)> = engine.state().items.iter().map(|i| (i.x, i.y)).collect();
            prop_assert_eq!(items, after);
            prop_assert_eq!(before, engine.snapshot());
        }
    }
}
