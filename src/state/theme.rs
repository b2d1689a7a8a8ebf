//! Light/dark theme preference, persisted through a key-value store

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::SettingsError;

/// Storage key holding the theme flag
pub const THEME_KEY: &str = "theme";

/// Narrow load/save contract for small settings values
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Volatile store, used in tests and when no settings file is wanted
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self.values.lock().map_err(|_| SettingsError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.lock().map_err(|_| SettingsError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location under the user's config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sos-guardian")
            .join("settings.json")
    }

    fn read_all(&self) -> Result<HashMap<String, String>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(source) => Err(SettingsError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let write_err = |source: std::io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, text).map_err(write_err)?;
        debug!("Persisted {}={} to {}", key, value, self.path.display());
        Ok(())
    }
}

/// Colour set handed to clients for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub header_background: &'static str,
    pub header_text: &'static str,
    pub tab_bar_background: &'static str,
    pub border: &'static str,
    pub input_background: &'static str,
    pub input_border: &'static str,
    pub button_background: &'static str,
    pub button_text: &'static str,
    pub contact_background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const LIGHT_PALETTE: Palette = Palette {
    background: "#f5f6fa",
    text: "#2c3e50",
    text_secondary: "#95a5a6",
    header_background: "#fff",
    header_text: "#2c3e50",
    tab_bar_background: "#fff",
    border: "#ecf0f1",
    input_background: "#f8f9fa",
    input_border: "#ecf0f1",
    button_background: "#e74c3c",
    button_text: "#fff",
    contact_background: "#fff",
    primary: "#e74c3c",
    secondary: "#3498db",
};

pub const DARK_PALETTE: Palette = Palette {
    background: "#1e1e1e",
    text: "#ffffff",
    text_secondary: "#7f8c8d",
    header_background: "#2c3e50",
    header_text: "#ffffff",
    tab_bar_background: "#2c3e50",
    border: "#444444",
    input_background: "#333333",
    input_border: "#444444",
    button_background: "#e74c3c",
    button_text: "#ffffff",
    contact_background: "#333333",
    primary: "#e74c3c",
    secondary: "#3498db",
};

/// Theme preference. Constructed once at startup and passed to whoever
/// needs it; every change is written back to the store.
pub struct ThemeSettings {
    store: Arc<dyn KeyValueStore>,
    dark: Mutex<bool>,
}

impl std::fmt::Debug for ThemeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeSettings")
            .field("dark", &self.is_dark())
            .finish_non_exhaustive()
    }
}

impl ThemeSettings {
    /// Load the saved preference. Anything other than `"dark"` means light.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark = match store.get(THEME_KEY) {
            Ok(value) => value.as_deref() == Some("dark"),
            Err(e) => {
                warn!("Failed to load theme preference, using light: {}", e);
                false
            }
        };
        info!("Theme loaded: {}", if dark { "dark" } else { "light" });
        Self {
            store,
            dark: Mutex::new(dark),
        }
    }

    pub fn is_dark(&self) -> bool {
        *self.dark.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn palette(&self) -> &'static Palette {
        if self.is_dark() {
            &DARK_PALETTE
        } else {
            &LIGHT_PALETTE
        }
    }

    /// Flip the theme and persist it. Returns the new dark flag.
    pub fn toggle(&self) -> bool {
        let mut dark = self.dark.lock().unwrap_or_else(|p| p.into_inner());
        *dark = !*dark;
        self.persist(*dark);
        *dark
    }

    pub fn set_dark(&self, value: bool) {
        let mut dark = self.dark.lock().unwrap_or_else(|p| p.into_inner());
        *dark = value;
        self.persist(value);
    }

    fn persist(&self, dark: bool) {
        let value = if dark { "dark" } else { "light" };
        // The in-memory preference wins even if the disk write fails
        if let Err(e) = self.store.set(THEME_KEY, value) {
            warn!("Failed to persist theme preference: {}", e);
        }
    }
}
