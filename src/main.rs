//! Desert Arcade entry point
//!
//! On the web this mounts the game named by the canvas `data-game` attribute
//! and wires the page's controls to it. Natively it plays both games headless
//! on autopilot and prints their final snapshots.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use desert_arcade::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use desert_arcade::engine::{
        CatcherEngine, Engine, GameHost, GliderEngine, Mounted, Snapshot,
    };
    use desert_arcade::persistence::LocalStorageStore;
    use desert_arcade::platform::web::{BrowserScheduler, EventListener};
    use desert_arcade::platform::{FrameScheduler, InputEvent, KeyCode};
    use desert_arcade::renderer::{CanvasSurface, Surface};
    use desert_arcade::settings::Settings;
    use desert_arcade::sim::{GameEvent, GamePhase};

    thread_local! {
        /// The mounted game and the DOM listeners feeding it
        static MOUNTED: RefCell<Option<Mounted<EventListener>>> = const { RefCell::new(None) };
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Desert Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        let settings = Rc::new(RefCell::new(Settings::load()));
        let seed = js_sys::Date::now() as u64;
        let store = Box::new(LocalStorageStore::new());
        let game = canvas
            .get_attribute("data-game")
            .unwrap_or_else(|| "catcher".to_string());

        let mounted = {
            let config = settings.borrow();
            match game.as_str() {
                "glider" => {
                    let engine = GliderEngine::new(&config, store, seed);
                    mount(engine, &canvas, &document, settings.clone())?
                }
                _ => {
                    let engine = CatcherEngine::new(&config, store, seed);
                    mount(engine, &canvas, &document, settings.clone())?
                }
            }
        };
        let previous = MOUNTED.with(|slot| slot.borrow_mut().replace(mounted));
        drop(previous);

        log::info!("Desert Arcade running {} with seed {}", game, seed);
        Ok(())
    }

    fn mount<E: Engine + 'static>(
        engine: E,
        canvas: &HtmlCanvasElement,
        document: &Document,
        settings: Rc<RefCell<Settings>>,
    ) -> Result<Mounted<EventListener>, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let scheduler: Rc<dyn FrameScheduler> =
            Rc::new(BrowserScheduler::new().ok_or("requestAnimationFrame unavailable")?);

        let surface = CanvasSurface::from_canvas(canvas).map(|s| Box::new(s) as Box<dyn Surface>);
        if surface.is_none() {
            log::warn!("Canvas 2D context unavailable, drawing disabled");
        }

        let host = Rc::new(GameHost::mount(engine, surface, scheduler));
        update_hud(document, &host.snapshot(), &[]);
        {
            let document = document.clone();
            host.set_observer(Box::new(move |snapshot, events| {
                update_hud(&document, snapshot, events)
            }));
        }

        let mut listeners = Mounted::new(&host);

        // Mouse move - CSS pixels scaled to the logical surface
        {
            let host = host.clone();
            let canvas_el = canvas.clone();
            listeners.push(EventListener::new(canvas, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let (x, y) = to_surface(&canvas_el, event);
                    host.handle_input(&InputEvent::PointerMove { x, y });
                }
            }));
        }

        // Click - flap
        {
            let host = host.clone();
            let canvas_el = canvas.clone();
            listeners.push(EventListener::new(canvas, "mousedown", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let (x, y) = to_surface(&canvas_el, event);
                    host.handle_input(&InputEvent::PointerDown { x, y });
                }
            }));
        }

        // Keyboard
        {
            let host = host.clone();
            listeners.push(EventListener::new(&window, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                match KeyCode::from_dom(&event.code()) {
                    KeyCode::Space => {
                        // Keep the page from scrolling
                        event.prevent_default();
                        host.handle_input(&InputEvent::KeyDown(KeyCode::Space));
                    }
                    KeyCode::Escape | KeyCode::KeyP => host.toggle_pause(),
                    KeyCode::KeyI => {
                        let enabled = !host.idle_mode();
                        host.set_idle_mode(enabled);
                        log::info!("Idle mode: {}", enabled);
                        let mut settings = settings.borrow_mut();
                        settings.autopilot = enabled;
                        settings.save();
                    }
                    KeyCode::Other => {}
                }
            }));
        }

        // Auto-pause when the tab is hidden
        {
            let host = host.clone();
            let doc = document.clone();
            listeners.push(EventListener::new(document, "visibilitychange", move |_| {
                if doc.hidden() && host.snapshot().phase == GamePhase::Playing {
                    host.toggle_pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            }));
        }

        {
            let host = host.clone();
            listeners.extend(button(document, "start-btn", move || host.start()));
        }
        {
            let host = host.clone();
            listeners.extend(button(document, "pause-btn", move || host.toggle_pause()));
        }
        {
            let host = host.clone();
            listeners.extend(button(document, "reset-btn", move || host.reset()));
        }
        listeners.extend(button(document, "back-btn", move || {
            host.unmount();
            release_after_handler();
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                let _ = history.back();
            }
        }));

        Ok(listeners)
    }

    /// Drop the mounted game and its listeners once the running handler has
    /// returned; its own closure is one of them.
    fn release_after_handler() {
        let release = Closure::once_into_js(|| {
            let mounted = MOUNTED.with(|slot| slot.borrow_mut().take());
            drop(mounted);
            log::info!("Released game listeners");
        });
        let Some(window) = web_sys::window() else {
            return;
        };
        if window
            .set_timeout_with_callback(release.unchecked_ref())
            .is_err()
        {
            log::warn!("Failed to schedule listener release");
        }
    }

    fn button(
        document: &Document,
        id: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Option<EventListener> {
        let element = document.get_element_by_id(id)?;
        Some(EventListener::new(&element, "click", move |_| handler()))
    }

    fn to_surface(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
        let width = canvas.client_width().max(1) as f32;
        let height = canvas.client_height().max(1) as f32;
        (
            event.offset_x() as f32 * CANVAS_WIDTH / width,
            event.offset_y() as f32 * CANVAS_HEIGHT / height,
        )
    }

    /// Update HUD elements and overlays in the DOM
    fn update_hud(document: &Document, snapshot: &Snapshot, events: &[GameEvent]) {
        set_text(document, "hud-score", &snapshot.score.to_string());
        set_text(document, "hud-high", &snapshot.high_score.to_string());
        if let Some(time_left) = snapshot.time_left {
            set_text(document, "hud-time", &format!("{}s", time_left));
        }
        if let Some(meters) = snapshot.distance_meters {
            set_text(document, "hud-distance", &format!("{}m", meters));
        }

        set_visible(document, "menu-overlay", snapshot.phase == GamePhase::Menu);
        set_visible(document, "pause-overlay", snapshot.phase == GamePhase::Paused);
        set_visible(document, "game-over", snapshot.phase == GamePhase::GameOver);
        if snapshot.phase == GamePhase::GameOver {
            set_text(document, "final-score", &snapshot.score.to_string());
        }

        for event in events {
            match event {
                GameEvent::Started | GameEvent::Reset => set_visible(document, "toast", false),
                GameEvent::NewHighScore { score, previous } => {
                    set_text(document, "toast", &format!("New high score: {}!", score));
                    set_visible(document, "toast", true);
                    log::info!("New high score {} (was {})", score, previous);
                }
                _ => {}
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use desert_arcade::persistence::MemoryStore;
    use desert_arcade::{CatcherEngine, GliderEngine, Settings};

    env_logger::init();
    log::info!("Desert Arcade (native) starting...");
    log::info!("The playable build runs in the browser; playing both games on autopilot");

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Seed: {}", seed);

    // One store for both games, as in a browser profile
    let store = MemoryStore::new();
    headless::play(CatcherEngine::new(&settings, Box::new(store.clone()), seed));
    headless::play(GliderEngine::new(&settings, Box::new(store.clone()), seed));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use desert_arcade::consts::FRAME_MS;
    use desert_arcade::engine::{Engine, GameHost};
    use desert_arcade::platform::ManualScheduler;
    use desert_arcade::renderer::RecordingSurface;

    /// A little under three minutes of 60 Hz frames
    const MAX_FRAMES: usize = 10_000;

    /// Run one game on autopilot until it ends or the frame cap is hit
    pub fn play<E: Engine + 'static>(engine: E) {
        let scheduler = Rc::new(ManualScheduler::new());
        let host = GameHost::mount(
            engine,
            Some(Box::new(RecordingSurface::new())),
            scheduler.clone(),
        );
        host.set_observer(Box::new(|snapshot, events| {
            for event in events {
                log::info!("{}: {:?}", snapshot.game, event);
            }
        }));
        host.set_idle_mode(true);
        host.start();

        let mut frames = 0;
        while host.is_running() && frames < MAX_FRAMES {
            scheduler.advance(FRAME_MS as f64);
            frames += 1;
        }

        match serde_json::to_string(&host.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
        host.unmount();
    }
}
