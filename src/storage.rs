//! Durable history storage for the message log.
//!
//! One JSON-serialized array of messages under a fixed key. Loading is
//! best-effort: corrupt or non-array data yields an empty log, never an error.
//! Writes are best-effort too; a failed write is logged and the in-memory log
//! stays authoritative for the session.

use crate::types::Message;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// Storage key for the message log. Bump the suffix on format migrations.
pub const HISTORY_KEY: &str = "chat_messages_v1";

pub trait HistoryStorage: Send + Sync {
    /// Raw persisted value, if any.
    fn load_raw(&self) -> Option<String>;

    /// Persist a raw value. Errors are the implementation's to report.
    fn save_raw(&self, value: &str) -> Result<(), String>;

    /// Parse the persisted log, falling back to empty on any corruption.
    fn load(&self) -> Vec<Message> {
        let Some(raw) = self.load_raw() else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Serialize and persist the full log. Never fails the caller.
    fn save(&self, messages: &[Message]) {
        let json = match serde_json::to_string(messages) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to serialize chat history: {err}");
                return;
            }
        };
        if let Err(err) = self.save_raw(&json) {
            tracing::warn!("failed to persist chat history: {err}");
        }
    }
}

/// File-backed storage for native platforms, one file per key under the
/// platform data directory.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileHistory {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileHistory {
    pub fn new() -> Self {
        let dir = dirs::data_local_dir()
            .map(|d| d.join("floatchat"))
            .unwrap_or_else(|| PathBuf::from("cache"));
        Self::at(dir.join(format!("{HISTORY_KEY}.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FileHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HistoryStorage for FileHistory {
    fn load_raw(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn save_raw(&self, value: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create storage directory: {e}"))?;
        }
        fs::write(&self.path, value).map_err(|e| format!("write {}: {e}", self.path.display()))
    }
}

/// In-memory storage for WASM builds and tests.
#[derive(Default)]
pub struct MemoryHistory {
    value: Mutex<Option<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStorage for MemoryHistory {
    fn load_raw(&self) -> Option<String> {
        self.value.lock().ok()?.clone()
    }

    fn save_raw(&self, value: &str) -> Result<(), String> {
        let mut slot = self.value.lock().map_err(|e| e.to_string())?;
        *slot = Some(value.to_string());
        Ok(())
    }
}
