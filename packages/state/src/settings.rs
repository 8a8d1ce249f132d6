//! Persisted editor settings.
//!
//! Settings are one JSON record stored under the `settings` key of a
//! key-value store. A record that fails to parse restores as `None` and
//! the caller falls back to the defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use mailcraft_common::{CommonError, CommonResult, FileSystem};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    #[default]
    Light,
    OneDark,
    Unicorn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub direction: Direction,
    pub responsive_font_sizes: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            direction: Direction::Ltr,
            responsive_font_sizes: true,
            theme: Theme::Light,
        }
    }
}

/// Partial settings; present fields win when merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub direction: Option<Direction>,
    pub responsive_font_sizes: Option<bool>,
    pub theme: Option<Theme>,
}

impl Settings {
    pub fn merge(&self, update: &SettingsUpdate) -> Settings {
        Settings {
            direction: update.direction.unwrap_or(self.direction),
            responsive_font_sizes: update
                .responsive_font_sizes
                .unwrap_or(self.responsive_font_sizes),
            theme: update.theme.unwrap_or(self.theme),
        }
    }
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CommonResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> CommonResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CommonResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CommonResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Key-value store kept as one JSON object in a file
pub struct FileStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileStore<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn entries(&self) -> CommonResult<BTreeMap<String, String>> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let text = self.fs.read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl<F: FileSystem> KeyValueStore for FileStore<F> {
    fn get(&self, key: &str) -> CommonResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CommonResult<()> {
        // An unreadable store is replaced rather than blocking every save
        let mut entries = self.entries().unwrap_or_else(|e| {
            warn!(error = %e, path = %self.path.display(), "Resetting unreadable store");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value);
        let text = serde_json::to_string_pretty(&entries)?;
        self.fs.write(&self.path, &text).map_err(CommonError::from)
    }
}

/// Settings bound to a store, with the current value cached
pub struct SettingsStore<S: KeyValueStore> {
    store: S,
    current: Settings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Load stored settings, or the defaults when there are none
    pub fn open(store: S) -> Self {
        let current = restore_settings(&store).unwrap_or_default();
        Self { store, current }
    }

    pub fn settings(&self) -> &Settings {
        &self.current
    }

    /// Merge `update` over the current settings and persist the result
    pub fn save(&mut self, update: &SettingsUpdate) -> CommonResult<&Settings> {
        let merged = self.current.merge(update);
        store_settings(&mut self.store, &merged)?;
        self.current = merged;
        Ok(&self.current)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Stored settings; `None` when missing or corrupt
pub fn restore_settings<S: KeyValueStore>(store: &S) -> Option<Settings> {
    let stored = match store.get(SETTINGS_KEY) {
        Ok(stored) => stored?,
        Err(e) => {
            warn!(error = %e, "Could not read settings");
            return None;
        }
    };
    serde_json::from_str(&stored).ok()
}

pub fn store_settings<S: KeyValueStore>(store: &mut S, settings: &Settings) -> CommonResult<()> {
    store.set(SETTINGS_KEY, serde_json::to_string(settings)?)
}
