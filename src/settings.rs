//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

use crate::sim::Key;
use crate::tuning::Tuning;

/// Keyboard `key` values (as reported by `KeyboardEvent.key`) for each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub fire_forward: String,
    pub fire_backward: String,
    pub reset: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: "w".to_string(),
            down: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            fire_forward: "j".to_string(),
            fire_backward: "k".to_string(),
            reset: "r".to_string(),
        }
    }
}

impl KeyBindings {
    /// Map a key value to a game key (case-insensitive)
    pub fn lookup(&self, key: &str) -> Option<Key> {
        let key = key.to_lowercase();
        let table = [
            (&self.up, Key::Up),
            (&self.down, Key::Down),
            (&self.left, Key::Left),
            (&self.right, Key::Right),
            (&self.fire_forward, Key::FireForward),
            (&self.fire_backward, Key::FireBackward),
            (&self.reset, Key::Reset),
        ];
        table
            .into_iter()
            .find(|(bound, _)| bound.to_lowercase() == key)
            .map(|(_, k)| k)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bindings: KeyBindings,
    /// Draw level hint text
    pub show_labels: bool,
    /// Gameplay overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            show_labels: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "built_to_scale_settings";

    /// Parse settings JSON, falling back to defaults on a parse error or unusable tuning
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => match settings.tuning.validate() {
                Ok(()) => settings,
                Err(e) => {
                    log::warn!("Ignoring settings with invalid tuning: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
