//! High score persistence
//!
//! Games see a tiny key-value port instead of the browser storage directly:
//! - Values are written as decimal strings
//! - Missing or malformed values read as absent
//! - `MemoryStore` backs tests and the native build

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// Durable integer key-value port
pub trait ScoreStore {
    /// Raw stored string, if any
    fn read_raw(&self, key: &str) -> Option<String>;

    /// Store a raw string; failures are logged by the implementation
    fn write_raw(&mut self, key: &str, value: &str);

    /// Stored integer; malformed data reads as absent
    fn get(&self, key: &str) -> Option<u64> {
        let raw = self.read_raw(key)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: u64) {
        self.write_raw(key, &value.to_string());
    }
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while an engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw entry
    pub fn with_entry(key: &str, raw: &str) -> Self {
        let store = Self::new();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        store
    }
}

impl ScoreStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
