//! A single persisted dark/light toggle.
//!
//! Loaded once at startup, flipped only by an explicit toggle and written back
//! before the toggle returns. A missing or unreadable value falls back to dark.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum ThemeStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Key-value backends
// ────────────────────────────────────────────────────────────────────────────

/// String-valued key-value persistence.
pub trait PreferenceStore: Send + Sync {
    /// `None` when the key is absent or the backing data cannot be read.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ThemeStoreError>;
}

/// TOML table on disk, rewritten atomically on every `set`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Option<toml::Table> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read preferences {:?}: {}", self.path, e);
                return None;
            }
        };

        match toml::from_str::<toml::Table>(&content) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("Ignoring corrupt preferences {:?}: {}", self.path, e);
                None
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_table()?
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ThemeStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut table = self.read_table().unwrap_or_default();
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let content = toml::to_string_pretty(&table)?;

        // Write to a sibling temp file, then rename it into place.
        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("Saved preference '{}' to {:?}", key, self.path);
        Ok(())
    }
}

/// Process-local store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ThemeStoreError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Theme store
// ────────────────────────────────────────────────────────────────────────────

/// Reads the persisted theme; absent or corrupt values yield the default.
pub fn load_preference(store: &dyn PreferenceStore) -> ThemePreference {
    match store.get(THEME_KEY) {
        None => ThemePreference::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("{}; falling back to {}", e, ThemePreference::default());
            ThemePreference::default()
        }),
    }
}

pub struct ThemeStore {
    store: Box<dyn PreferenceStore>,
    current: ThemePreference,
}

impl ThemeStore {
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let current = load_preference(store.as_ref());
        info!("Theme loaded: {}", current);
        Self { store, current }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flips the theme and persists it before returning.
    ///
    /// The in-memory value only changes once the write succeeded, so memory
    /// and storage never disagree.
    pub fn toggle(&mut self) -> Result<ThemePreference, ThemeStoreError> {
        let next = self.current.toggled();
        self.store.set(THEME_KEY, next.as_str())?;
        self.current = next;
        info!("Theme toggled to {}", next);
        Ok(next)
    }
}
