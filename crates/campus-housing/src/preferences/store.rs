use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use super::domain::{PreferenceFilter, PreferenceId, PreferenceRecord};

/// Append-only preference persistence. There is no update or delete.
pub trait PreferenceStore: Send + Sync {
    /// Stamps the payload with an id and timestamp, persists it, and returns the id.
    fn save(&self, data: Value, is_auto_save: bool) -> Result<PreferenceId, StoreError>;
    fn list(&self, filter: &PreferenceFilter) -> Result<Vec<PreferenceRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference storage unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("preference record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

/// One pretty-printed JSON file per record, named `<id>.json`.
///
/// The directory is created on first use.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    root: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &PreferenceId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read_record(path: &Path) -> Option<PreferenceRecord> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable preference file");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping malformed preference file");
                None
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn save(&self, data: Value, is_auto_save: bool) -> Result<PreferenceId, StoreError> {
        fs::create_dir_all(&self.root)?;

        let record = PreferenceRecord::new(data, is_auto_save);
        let encoded = serde_json::to_vec_pretty(&record)?;
        let path = self.record_path(&record.id);
        fs::write(&path, encoded)?;

        debug!(id = %record.id, is_auto_save, "preference saved");
        Ok(record.id)
    }

    fn list(&self, filter: &PreferenceFilter) -> Result<Vec<PreferenceRecord>, StoreError> {
        fs::create_dir_all(&self.root)?;

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = Self::read_record(&path) {
                records.push(record);
            }
        }

        Ok(filter.apply(records))
    }
}

/// Process-local store for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    records: Mutex<Vec<PreferenceRecord>>,
}

impl InMemoryPreferenceStore {
    pub fn with_records(records: Vec<PreferenceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn save(&self, data: Value, is_auto_save: bool) -> Result<PreferenceId, StoreError> {
        let record = PreferenceRecord::new(data, is_auto_save);
        let id = record.id.clone();
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("preference mutex poisoned".to_string()))?
            .push(record);
        Ok(id)
    }

    fn list(&self, filter: &PreferenceFilter) -> Result<Vec<PreferenceRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("preference mutex poisoned".to_string()))?
            .clone();
        Ok(filter.apply(records))
    }
}
