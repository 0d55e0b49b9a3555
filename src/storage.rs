//! Key/value persistence for settings and statistics.
//!
//! Modelled on browser local storage: string keys, string values, two keys
//! in use. Reads never fail; anything missing or unreadable loads as the
//! defaults. Writes report errors so a caller can decide whether to care.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::settings::Settings;
use crate::stats::Statistics;

/// Key of the persisted `Settings` blob.
pub const SETTINGS_KEY: &str = "casinoSolitaireSettings";
/// Key of the persisted `Statistics` blob.
pub const STATS_KEY: &str = "casinoSolitaireStats";

/// A string-to-string store.
pub trait Storage {
    /// The stored value, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage; forgets everything on drop.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStorage { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read stored value");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        fs::write(&path, value)?;
        debug!(path = %path.display(), "stored value written");
        Ok(())
    }
}

pub fn load_settings(storage: &dyn Storage) -> Settings {
    storage
        .get(SETTINGS_KEY)
        .map(|raw| Settings::from_json_lenient(&raw))
        .unwrap_or_default()
}

pub fn save_settings(storage: &mut dyn Storage, settings: &Settings) -> Result<(), StorageError> {
    let raw = settings.to_json().map_err(|source| StorageError::Encode {
        key: SETTINGS_KEY,
        source,
    })?;
    storage.set(SETTINGS_KEY, &raw)
}

pub fn load_statistics(storage: &dyn Storage) -> Statistics {
    storage
        .get(STATS_KEY)
        .map(|raw| Statistics::from_json_lenient(&raw))
        .unwrap_or_default()
}

pub fn save_statistics(storage: &mut dyn Storage, stats: &Statistics) -> Result<(), StorageError> {
    let raw = stats.to_json().map_err(|source| StorageError::Encode {
        key: STATS_KEY,
        source,
    })?;
    storage.set(STATS_KEY, &raw)
}
