//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (already mapped into surface coordinates)
//! - Frame scheduling (`requestAnimationFrame` on web, manual stepping elsewhere)

use std::cell::{Cell, RefCell};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Keys the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    Escape,
    KeyP,
    KeyI,
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.code` / `key` value
    pub fn from_dom(code: &str) -> Self {
        match code {
            "Space" | " " => KeyCode::Space,
            "Escape" => KeyCode::Escape,
            "KeyP" | "p" | "P" => KeyCode::KeyP,
            "KeyI" | "i" | "I" => KeyCode::KeyI,
            _ => KeyCode::Other,
        }
    }
}

/// Input delivered to a mounted engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to `x, y` in surface coordinates
    PointerMove { x: f32, y: f32 },
    /// Click / tap
    PointerDown { x: f32, y: f32 },
    KeyDown(KeyCode),
}

/// Opaque handle for a scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Callback run on the next display refresh with a timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Display-refresh scheduler
///
/// Callbacks never run synchronously inside `request_frame`.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending frame; unknown or already-fired handles are ignored
    fn cancel(&self, handle: FrameHandle);
}

/// Scheduler stepped by hand, for tests and the headless native demo
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    next_id: Cell<u64>,
    /// Current timestamp in ms
    now: Cell<f64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Advance the clock by `dt_ms` and fire every frame pending at that
    /// moment. Frames requested by those callbacks wait for the next call.
    /// Returns the number of callbacks run.
    pub fn advance(&self, dt_ms: f64) -> usize {
        let time = self.now.get() + dt_ms;
        self.now.set(time);
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(time);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
    }
}
