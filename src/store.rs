//! High score and sound setting persistence.
//!
//! Two scalars live under the `GamePrefs` group of a key-value backend.  The
//! file backend keeps them in a small JSON document; the memory backend is
//! for tests and for running without a writable home directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::entities::{PersistedSettings, RecordOutcome};
use crate::error::Result;

pub const PREFS_GROUP: &str = "GamePrefs";
pub const KEY_HIGH_SCORE: &str = "HighScore";
pub const KEY_SOUND_ENABLED: &str = "soundEnabled";

/// Scalar key-value storage.  Each `put_*` is one immediate write.
pub trait KeyValueBackend {
    fn get_int(&self, key: &str) -> Result<Option<i64>>;
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;
    fn put_int(&mut self, key: &str, value: i64) -> Result<()>;
    fn put_bool(&mut self, key: &str, value: bool) -> Result<()>;
}

// ── Backends ─────────────────────────────────────────────────────────────────

/// Keeps values in memory and counts writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: HashMap<String, Value>,
    pub writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.values.get(key).and_then(Value::as_i64))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.get(key).and_then(Value::as_bool))
    }

    fn put_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), Value::from(value));
        self.writes += 1;
        Ok(())
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), Value::from(value));
        self.writes += 1;
        Ok(())
    }
}

/// One JSON file holding preference groups:
/// `{ "GamePrefs": { "HighScore": 50, "soundEnabled": true } }`.
///
/// Each write re-reads the file so other groups and unknown keys survive.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    group: String,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>, group: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            group: group.into(),
        }
    }

    /// `$HOME/.star_catcher_prefs.json`, or the working directory without HOME.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".star_catcher_prefs.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.read_document()?;
        Ok(doc
            .get(&self.group)
            .and_then(|g| g.get(key))
            .cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.read_document()?;
        let group = doc
            .entry(self.group.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !group.is_object() {
            *group = Value::Object(Map::new());
        }
        if let Value::Object(g) = group {
            g.insert(key.to_string(), value);
        }
        let text = serde_json::to_string_pretty(&Value::Object(doc))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueBackend for JsonFileBackend {
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.get(key)?.and_then(|v| v.as_i64()))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    fn put_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.put(key, Value::from(value))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.put(key, Value::from(value))
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

pub struct SettingsStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> SettingsStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read both settings.  Missing values take their defaults; a negative
    /// stored high score reads as 0.
    pub fn load(&self) -> Result<PersistedSettings> {
        let defaults = PersistedSettings::default();
        let high_score = self
            .backend
            .get_int(KEY_HIGH_SCORE)?
            .map(|v| v.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(defaults.high_score);
        let sound_enabled = self
            .backend
            .get_bool(KEY_SOUND_ENABLED)?
            .unwrap_or(defaults.sound_enabled);
        Ok(PersistedSettings {
            high_score,
            sound_enabled,
        })
    }

    /// Keep `score` if it strictly beats the stored high score.
    pub fn record_score(&mut self, score: u32) -> Result<RecordOutcome> {
        let previous = self.load()?.high_score;
        if score <= previous {
            return Ok(RecordOutcome {
                updated: false,
                high_score: previous,
            });
        }
        self.backend.put_int(KEY_HIGH_SCORE, score as i64)?;
        log::info!("New high score {score} (was {previous})");
        Ok(RecordOutcome {
            updated: true,
            high_score: score,
        })
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Result<()> {
        self.backend.put_bool(KEY_SOUND_ENABLED, enabled)?;
        log::info!("Sound {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }
}
