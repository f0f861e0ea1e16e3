//! Reader and app preferences
//!
//! Preferences are a small key-value aggregate: reader typography, app
//! behavior, the last-read location and the dark-mode override. On a
//! device they live in one JSON file (`PreferenceFile`); the server keeps
//! a per-user copy as a document at `users/<uid>/preferences`.

use crate::error::StoreError;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Typography and theme of the reading view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    pub font_size: f32,
    pub font_family: String,
    pub line_spacing: f32,
    /// "Light", "Dark", "Sepia" or "System"
    pub theme: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            font_family: "Serif".to_string(),
            line_spacing: 1.5,
            theme: "System".to_string(),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub locale: String,
    pub notifications_enabled: bool,
    /// Text version the daily verse is drawn from
    pub daily_verse_version: String,
    /// Book the daily verse is drawn from; the whole corpus when unset
    pub daily_verse_book: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            notifications_enabled: true,
            daily_verse_version: "KJV".to_string(),
            daily_verse_book: None,
        }
    }
}

/// Where the reader left off
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastRead {
    pub book: String,
    pub chapter: u32,
    /// Navigation route to restore, e.g. "bible/KJV/Genesis/1"
    pub route: String,
}

/// The full preference aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub reader: ReaderSettings,
    pub app: AppSettings,
    pub last_read: Option<LastRead>,
    /// Tri-state: unset follows the system
    pub dark_mode: Option<bool>,
}

/// Preferences persisted to a local JSON file
///
/// A missing file reads as defaults; saves replace the file atomically.
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Preferences, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let data = serde_json::to_string_pretty(prefs)?;

        let mut temp = self.path.clone();
        temp.as_mut_os_string().push(".tmp");
        std::fs::write(&temp, data).map_err(|e| StoreError::Backend(e.to_string()))?;
        std::fs::rename(&temp, &self.path).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Per-user preferences in the document store
#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<dyn DocumentStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn doc_path(uid: &str) -> String {
        format!("users/{}/preferences", uid)
    }

    /// A user with no saved preferences gets the defaults
    pub async fn get(&self, uid: &str) -> Result<Preferences, StoreError> {
        match self.store.get(&Self::doc_path(uid)).await? {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => Ok(Preferences::default()),
        }
    }

    pub async fn put(&self, uid: &str, prefs: &Preferences) -> Result<(), StoreError> {
        self.store
            .put(&Self::doc_path(uid), serde_json::to_value(prefs)?)
            .await
    }
}
