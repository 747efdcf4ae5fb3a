//! Per-game best score
//!
//! Read once when a game is mounted, written back only when a finished run
//! beats it.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Storage key for the date catcher
pub const CATCHER_KEY: &str = "dateCatcher-highScore";
/// Storage key for the falcon glider
pub const GLIDER_KEY: &str = "falconGlide-highScore";

/// Best score for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    key: String,
    best: u64,
}

impl HighScore {
    /// Load the stored value; absent or malformed data counts as 0
    pub fn load(store: &dyn ScoreStore, key: &str) -> Self {
        let best = store.get(key).unwrap_or(0);
        log::info!("Loaded {} = {}", key, best);
        Self {
            key: key.to_string(),
            best,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a finished run. Compares against the in-memory best (never a
    /// stale copy) and persists only on improvement. Returns the previous
    /// best when the score is a new record.
    pub fn submit(&mut self, score: u64, store: &mut dyn ScoreStore) -> Option<u64> {
        if score <= self.best {
            return None;
        }
        let previous = self.best;
        self.best = score;
        store.set(&self.key, score);
        log::info!("New high score for {}: {} (was {})", self.key, score, previous);
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store, CATCHER_KEY).best(), 0);

        let store = MemoryStore::with_entry(CATCHER_KEY, "not a number");
        assert_eq!(HighScore::load(&store, CATCHER_KEY).best(), 0);
    }

    #[test]
    fn test_submit_only_improves() {
        let mut store = MemoryStore::with_entry(GLIDER_KEY, "30");
        let mut high = HighScore::load(&store, GLIDER_KEY);
        assert_eq!(high.best(), 30);

        assert_eq!(high.submit(20, &mut store), None);
        assert_eq!(high.submit(30, &mut store), None);
        assert_eq!(store.get(GLIDER_KEY), Some(30));

        assert_eq!(high.submit(50, &mut store), Some(30));
        assert_eq!(store.get(GLIDER_KEY), Some(50));
        assert_eq!(high.best(), 50);
    }

    #[test]
    fn test_submit_uses_latest_best() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::load(&store, CATCHER_KEY);
        high.submit(80, &mut store);
        // A later, lower run must not overwrite with its own stale view
        assert_eq!(high.submit(60, &mut store), None);
        assert_eq!(store.get(CATCHER_KEY), Some(80));
    }
}
