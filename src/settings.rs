//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::{CatcherTuning, GliderTuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Draw score/timer text on the canvas
    pub show_hud: bool,

    // === Controls ===
    /// Start games with the demo autopilot driving
    pub autopilot: bool,

    // === Visual Effects ===
    /// Drifting clouds behind the glider (overrides tuning when set)
    pub decoration_count: Option<usize>,
    /// Sun glow in the glider sky
    pub sun_glow: bool,

    // === Balance ===
    pub catcher: CatcherTuning,
    pub glider: GliderTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hud: true,
            autopilot: false,
            decoration_count: None,
            sun_glow: true,
            catcher: CatcherTuning::default(),
            glider: GliderTuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "desert_arcade_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Clamp tuning values into playable ranges
    pub fn sanitized(mut self) -> Self {
        self.catcher = self.catcher.sanitized();
        self.glider = self.glider.sanitized();
        self
    }

    /// Catcher tuning as configured
    pub fn catcher_tuning(&self) -> CatcherTuning {
        self.catcher.clone()
    }

    /// Glider tuning with the decoration override applied
    pub fn glider_tuning(&self) -> GliderTuning {
        let mut tuning = self.glider.clone();
        if let Some(count) = self.decoration_count {
            tuning.cloud_count = count;
        }
        tuning
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: settings from the `DESERT_ARCADE_SETTINGS` JSON variable, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var("DESERT_ARCADE_SETTINGS") {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed DESERT_ARCADE_SETTINGS: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
