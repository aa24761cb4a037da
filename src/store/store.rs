use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::coordinator::messages::TabId;
use crate::error::SnapHideError;
use crate::store::record::{ElementCapture, HiddenElementRecord};

/// Partition key prefix for per-hostname record collections.
pub const DELETED_KEY_PREFIX: &str = "deleted_";
/// Partition key prefix for per-tab activation booleans.
pub const ACTIVE_KEY_PREFIX: &str = "active_";

// ============================================================================
// Storage backends
// ============================================================================

/// Flat key-value persistence. One value per key; whole-value writes.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<Value>, SnapHideError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), SnapHideError>;
    fn remove(&mut self, key: &str) -> Result<(), SnapHideError>;
    fn keys(&self) -> Result<Vec<String>, SnapHideError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: BTreeMap<String, Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Value>, SnapHideError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SnapHideError> {
        self.map.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SnapHideError> {
        self.map.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SnapHideError> {
        Ok(self.map.keys().cloned().collect())
    }
}

/// File-backed backend: the whole store is one JSON document, rewritten
/// on every mutation (writes are infrequent and user-driven). Writes go
/// through a temp file + rename so a crash never leaves a torn store.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileBackend {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn storage_err(&self, source: std::io::Error) -> SnapHideError {
        SnapHideError::Storage {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, SnapHideError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| SnapHideError::Json {
                    context: format!("store file {}", self.path.display()),
                    source: e,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.storage_err(e)),
        }
    }

    fn save(&self, map: &BTreeMap<String, Value>) -> Result<(), SnapHideError> {
        let content = serde_json::to_string_pretty(map).map_err(|e| SnapHideError::Json {
            context: "store document".to_string(),
            source: e,
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|e| self.storage_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.storage_err(e))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Value>, SnapHideError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SnapHideError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value);
        self.save(&map)
    }

    fn remove(&mut self, key: &str) -> Result<(), SnapHideError> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SnapHideError> {
        Ok(self.load()?.keys().cloned().collect())
    }
}

// ============================================================================
// Element store
// ============================================================================

fn deleted_key(hostname: &str) -> String {
    format!("{}{}", DELETED_KEY_PREFIX, hostname)
}

fn active_key(tab: TabId) -> String {
    format!("{}{}", ACTIVE_KEY_PREFIX, tab)
}

/// Hostname-partitioned store of hidden-element records, plus the per-tab
/// activation booleans. All record operations read-modify-write the full
/// hostname collection; last writer wins.
pub struct ElementStore {
    backend: Box<dyn StorageBackend>,
}

impl ElementStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        ElementStore { backend }
    }

    pub fn in_memory() -> Self {
        ElementStore::new(Box::new(MemoryBackend::new()))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        ElementStore::new(Box::new(FileBackend::new(path)))
    }

    /// Assign an id and capture timestamp, append to the hostname's
    /// collection, persist the full collection. Returns the new record.
    pub fn append(
        &mut self,
        hostname: &str,
        capture: ElementCapture,
    ) -> Result<HiddenElementRecord, SnapHideError> {
        let mut records = self.list(hostname)?;
        let record = HiddenElementRecord::new(capture);
        records.push(record.clone());
        self.write_records(hostname, &records)?;
        Ok(record)
    }

    /// Records for a hostname, capture order. Missing key is an empty
    /// collection, never an error.
    pub fn list(&self, hostname: &str) -> Result<Vec<HiddenElementRecord>, SnapHideError> {
        match self.backend.get(&deleted_key(hostname))? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| SnapHideError::Json {
                    context: format!("records for {}", hostname),
                    source: e,
                })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Remove one record. No-op (`Ok(false)`) if the id is absent, so
    /// restore stays idempotent.
    pub fn remove(&mut self, hostname: &str, id: &str) -> Result<bool, SnapHideError> {
        let mut records = self.list(hostname)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(hostname, &records)?;
        Ok(true)
    }

    /// Drop the whole hostname partition (restore-all).
    pub fn remove_all(&mut self, hostname: &str) -> Result<(), SnapHideError> {
        self.backend.remove(&deleted_key(hostname))
    }

    /// Every hostname partition this extension owns (prefix-tagged keys
    /// only; unrelated persisted keys are ignored).
    pub fn all_websites(
        &self,
    ) -> Result<BTreeMap<String, Vec<HiddenElementRecord>>, SnapHideError> {
        let mut out = BTreeMap::new();
        for key in self.backend.keys()? {
            if let Some(hostname) = key.strip_prefix(DELETED_KEY_PREFIX) {
                out.insert(hostname.to_string(), self.list(hostname)?);
            }
        }
        Ok(out)
    }

    pub fn set_active(&mut self, tab: TabId, active: bool) -> Result<(), SnapHideError> {
        self.backend.set(&active_key(tab), Value::Bool(active))
    }

    /// Missing key reads as inactive.
    pub fn is_active(&self, tab: TabId) -> Result<bool, SnapHideError> {
        Ok(self
            .backend
            .get(&active_key(tab))?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Drop a tab's activation key when the tab goes away.
    pub fn clear_tab(&mut self, tab: TabId) -> Result<(), SnapHideError> {
        self.backend.remove(&active_key(tab))
    }

    fn write_records(
        &mut self,
        hostname: &str,
        records: &[HiddenElementRecord],
    ) -> Result<(), SnapHideError> {
        let value = serde_json::to_value(records).map_err(|e| SnapHideError::Json {
            context: format!("records for {}", hostname),
            source: e,
        })?;
        self.backend.set(&deleted_key(hostname), value)
    }
}
