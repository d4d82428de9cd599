// tentcard-pdf: per-user settings and saved nameplate history

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::model::{AppConfig, NameEntry, SavedNameplate};

/// Saved snapshots kept per user; the oldest go first
pub const HISTORY_LIMIT: usize = 20;

/// Everything stored for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub current_config: AppConfig,
    pub current_names: Vec<NameEntry>,
    /// Oldest first
    pub history: Vec<SavedNameplate>,
}

/// Key-value storage keyed by user id
pub trait UserDataStore {
    fn load(&self, uid: &str) -> Result<Option<UserData>>;
    fn save(&self, uid: &str, data: &UserData) -> Result<()>;
}

// ============================================================================
// JSON File Store
// ============================================================================

/// One pretty-printed JSON document per user in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uid: &str) -> Result<PathBuf> {
        let valid = !uid.is_empty()
            && uid
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !uid.starts_with('.');
        if !valid {
            return Err(AppError::StoreError(format!("invalid user id: {:?}", uid)));
        }
        Ok(self.dir.join(format!("{}.json", uid)))
    }
}

impl UserDataStore for JsonFileStore {
    fn load(&self, uid: &str) -> Result<Option<UserData>> {
        let path = self.path_for(uid)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::StoreError(format!("{}: {}", path.display(), e)))?;
        let data = serde_json::from_str(&content)
            .map_err(|e| AppError::StoreError(format!("{}: {}", path.display(), e)))?;
        Ok(Some(data))
    }

    fn save(&self, uid: &str, data: &UserData) -> Result<()> {
        let path = self.path_for(uid)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "user data saved");
        Ok(())
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// Settings and history operations for one user
pub struct Workspace<'a, S: UserDataStore + ?Sized> {
    store: &'a S,
    uid: String,
}

impl<'a, S: UserDataStore + ?Sized> Workspace<'a, S> {
    pub fn new(store: &'a S, uid: impl Into<String>) -> Self {
        Self {
            store,
            uid: uid.into(),
        }
    }

    /// Stored data, or defaults for a user seen for the first time.
    pub fn load(&self) -> Result<UserData> {
        Ok(self.store.load(&self.uid)?.unwrap_or_default())
    }

    pub fn save_current(&self, config: &AppConfig, names: &[NameEntry]) -> Result<()> {
        let mut data = self.load()?;
        data.current_config = config.clone();
        data.current_names = names.to_vec();
        self.store.save(&self.uid, &data)
    }

    /// Append a named snapshot, evicting the oldest beyond `HISTORY_LIMIT`.
    pub fn save_to_history(&self, name: &str, config: &AppConfig, names: &[NameEntry]) -> Result<SavedNameplate> {
        let mut data = self.load()?;
        let entry = SavedNameplate {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            config: config.clone(),
            names: names.to_vec(),
            saved_at: Utc::now(),
        };
        data.history.push(entry.clone());
        if data.history.len() > HISTORY_LIMIT {
            let overflow = data.history.len() - HISTORY_LIMIT;
            data.history.drain(..overflow);
        }
        self.store.save(&self.uid, &data)?;
        info!(id = %entry.id, name, "saved to history");
        Ok(entry)
    }

    /// Configuration and names of a saved snapshot.
    pub fn restore(&self, id: &str) -> Result<(AppConfig, Vec<NameEntry>)> {
        let data = self.load()?;
        data.history
            .into_iter()
            .find(|h| h.id == id)
            .map(|h| (h.config, h.names))
            .ok_or_else(|| AppError::HistoryNotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut data = self.load()?;
        let before = data.history.len();
        data.history.retain(|h| h.id != id);
        if data.history.len() == before {
            return Err(AppError::HistoryNotFound(id.to_string()));
        }
        self.store.save(&self.uid, &data)
    }

    /// Newest first.
    pub fn history(&self) -> Result<Vec<SavedNameplate>> {
        let mut history = self.load()?.history;
        history.reverse();
        Ok(history)
    }
}
