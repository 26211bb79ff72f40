//! Kiosk settings and preferences
//!
//! Persisted separately from play history in the key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::KeyValueStore;

/// Which input sources the kiosk listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSources {
    /// Arrow keys
    pub keyboard: bool,
    /// Mouse/pointer absolute positioning
    pub pointer: bool,
    /// Touch halves of the screen
    pub touch: bool,
}

impl Default for InputSources {
    fn default() -> Self {
        Self {
            keyboard: true,
            pointer: true,
            touch: true,
        }
    }
}

/// Kiosk settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enabled input sources
    pub inputs: InputSources,

    // === HUD ===
    /// Draw score and speed over the canvas
    pub show_hud: bool,

    /// Pause when the tab is hidden or the window loses focus
    pub auto_pause: bool,

    /// Fixed RNG seed for every session (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inputs: InputSources::default(),
            show_hud: true,
            auto_pause: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from the store, defaulting when absent or corrupt
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(SETTINGS_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded kiosk settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings ({}), using defaults", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            match store.set(SETTINGS_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_settings_round_trip_through_store() {
        let mut store = MemoryStore::default();
        let settings = Settings {
            inputs: InputSources {
                pointer: false,
                ..Default::default()
            },
            seed: Some(7),
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::default();
        store.set(SETTINGS_KEY, "][").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
