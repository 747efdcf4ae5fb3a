//! Mounted-engine host: frame loop, commands, teardown
//!
//! The loop only runs while the engine is `Playing`. Every scheduled frame
//! carries the loop epoch and a weak reference back to the host, so a frame
//! that fires after a stop or unmount does nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{Engine, Snapshot};
use crate::consts::{FRAME_MS, MAX_FRAME_MS};
use crate::platform::{FrameHandle, FrameScheduler, InputEvent};
use crate::renderer::Surface;
use crate::sim::{GameEvent, GamePhase};

/// Called after every command and frame with fresh display values
pub type FrameObserver = Box<dyn FnMut(&Snapshot, &[GameEvent])>;

struct HostState<E> {
    engine: E,
    surface: Option<Box<dyn Surface>>,
    pending: Option<FrameHandle>,
    /// Bumped whenever the loop stops; stale frames compare against it
    epoch: u64,
    last_time: Option<f64>,
    mounted: bool,
    frames: u64,
    observer: Option<FrameObserver>,
}

impl<E: Engine> HostState<E> {
    fn render(&mut self) {
        match self.surface.as_deref_mut() {
            Some(surface) => self.engine.render(surface),
            None => log::debug!("No drawing surface, frame skipped"),
        }
    }
}

/// An engine mounted on a surface and driven by a frame scheduler
pub struct GameHost<E: Engine + 'static> {
    shared: Rc<RefCell<HostState<E>>>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl<E: Engine + 'static> GameHost<E> {
    /// Mount an engine and draw its first (menu) frame
    pub fn mount(
        engine: E,
        surface: Option<Box<dyn Surface>>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        log::info!("Mounting {}", engine.name());
        let host = Self {
            shared: Rc::new(RefCell::new(HostState {
                engine,
                surface,
                pending: None,
                epoch: 0,
                last_time: None,
                mounted: true,
                frames: 0,
                observer: None,
            })),
            scheduler,
        };
        host.shared.borrow_mut().render();
        host
    }

    pub fn set_observer(&self, observer: FrameObserver) {
        self.shared.borrow_mut().observer = Some(observer);
    }

    pub fn start(&self) {
        self.command(|engine| engine.start());
    }

    pub fn toggle_pause(&self) {
        self.command(|engine| engine.toggle_pause());
    }

    pub fn reset(&self) {
        self.command(|engine| engine.reset());
    }

    pub fn set_idle_mode(&self, enabled: bool) {
        let mut state = self.shared.borrow_mut();
        if state.mounted {
            state.engine.set_idle_mode(enabled);
        }
    }

    pub fn idle_mode(&self) -> bool {
        self.shared.borrow().engine.idle_mode()
    }

    /// Forward input while mounted; the engine filters by phase
    pub fn handle_input(&self, event: &InputEvent) {
        let mut state = self.shared.borrow_mut();
        if state.mounted {
            state.engine.handle_input(event);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.borrow().engine.snapshot()
    }

    /// A frame is waiting on the scheduler
    pub fn is_running(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }

    /// Frames simulated since mount
    pub fn frames(&self) -> u64 {
        self.shared.borrow().frames
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.borrow().mounted
    }

    /// Stop the loop and release the surface. Safe to call repeatedly.
    pub fn unmount(&self) {
        let mut state = self.shared.borrow_mut();
        if !state.mounted {
            return;
        }
        if let Some(handle) = state.pending.take() {
            self.scheduler.cancel(handle);
        }
        state.epoch += 1;
        state.mounted = false;
        state.surface = None;
        state.observer = None;
        log::info!("Unmounted {}", state.engine.name());
    }

    fn command(&self, f: impl FnOnce(&mut E)) {
        {
            let mut state = self.shared.borrow_mut();
            if !state.mounted {
                return;
            }
            f(&mut state.engine);
            state.render();
        }
        notify(&self.shared);
        self.sync_loop();
    }

    /// Arm the loop while playing, stop it otherwise
    fn sync_loop(&self) {
        let mut state = self.shared.borrow_mut();
        let playing = state.mounted && state.engine.phase() == GamePhase::Playing;
        if playing {
            if state.pending.is_none() {
                state.last_time = None;
                schedule(&self.shared, &self.scheduler, &mut state);
            }
        } else if let Some(handle) = state.pending.take() {
            self.scheduler.cancel(handle);
            state.epoch += 1;
        }
    }
}

impl<E: Engine + 'static> Drop for GameHost<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// A host together with the input registrations that feed it
///
/// Dropping it unmounts the host, then drops every guard. Guards usually hold
/// the last strong references to the host, so the engine is freed with them.
pub struct Mounted<G> {
    unmount: Box<dyn Fn()>,
    guards: Vec<G>,
}

impl<G> Mounted<G> {
    pub fn new<E: Engine + 'static>(host: &Rc<GameHost<E>>) -> Self {
        let weak = Rc::downgrade(host);
        Self {
            unmount: Box::new(move || {
                if let Some(host) = weak.upgrade() {
                    host.unmount();
                }
            }),
            guards: Vec::new(),
        }
    }

    pub fn push(&mut self, guard: G) {
        self.guards.push(guard);
    }
}

impl<G> Extend<G> for Mounted<G> {
    fn extend<I: IntoIterator<Item = G>>(&mut self, iter: I) {
        self.guards.extend(iter);
    }
}

impl<G> Drop for Mounted<G> {
    fn drop(&mut self) {
        (self.unmount)();
        self.guards.clear();
    }
}

fn schedule<E: Engine + 'static>(
    shared: &Rc<RefCell<HostState<E>>>,
    scheduler: &Rc<dyn FrameScheduler>,
    state: &mut HostState<E>,
) {
    let weak = Rc::downgrade(shared);
    let next = Rc::clone(scheduler);
    let epoch = state.epoch;
    let handle = scheduler.request_frame(Box::new(move |time| run_frame(weak, next, epoch, time)));
    state.pending = Some(handle);
}

/// One display refresh: update, then render, then reschedule while playing
fn run_frame<E: Engine + 'static>(
    weak: Weak<RefCell<HostState<E>>>,
    scheduler: Rc<dyn FrameScheduler>,
    epoch: u64,
    time: f64,
) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    {
        let mut state = shared.borrow_mut();
        if !state.mounted || state.epoch != epoch {
            log::debug!("Dropping stale frame");
            return;
        }
        state.pending = None;

        let dt_ms = match state.last_time {
            Some(last) => (time - last).clamp(0.0, MAX_FRAME_MS as f64).round() as u32,
            None => FRAME_MS,
        };
        state.last_time = Some(time);
        state.frames += 1;

        state.engine.update(dt_ms);
        state.render();
    }

    notify(&shared);

    let mut state = shared.borrow_mut();
    if state.mounted
        && state.epoch == epoch
        && state.pending.is_none()
        && state.engine.phase() == GamePhase::Playing
    {
        schedule(&shared, &scheduler, &mut state);
    }
}

/// Hand fresh values to the observer without holding the engine borrow
fn notify<E: Engine>(shared: &Rc<RefCell<HostState<E>>>) {
    let (snapshot, events, observer) = {
        let mut state = shared.borrow_mut();
        let events = state.engine.drain_events();
        (state.engine.snapshot(), events, state.observer.take())
    };
    let Some(mut observer) = observer else {
        return;
    };
    observer(&snapshot, &events);

    let mut state = shared.borrow_mut();
    if state.mounted && state.observer.is_none() {
        state.observer = Some(observer);
    }
}
