use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceId(pub String);

impl PreferenceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PreferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved or auto-saved preference submission. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub id: PreferenceId,
    pub timestamp: DateTime<Utc>,
    /// Client payload, stored verbatim.
    pub data: Value,
    #[serde(rename = "isAutoSave", default)]
    pub is_auto_save: bool,
}

impl PreferenceRecord {
    pub fn new(data: Value, is_auto_save: bool) -> Self {
        Self::at(data, is_auto_save, Utc::now())
    }

    pub fn at(data: Value, is_auto_save: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: PreferenceId::generate(),
            timestamp,
            data,
            is_auto_save,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoSaveFilter {
    #[default]
    ExcludeAutoSave,
    IncludeAll,
    OnlyAutoSave,
}

impl AutoSaveFilter {
    /// `only` wins over `include` when both are set.
    pub fn from_flags(include_auto_save: bool, only_auto_save: bool) -> Self {
        match (include_auto_save, only_auto_save) {
            (_, true) => Self::OnlyAutoSave,
            (true, false) => Self::IncludeAll,
            (false, false) => Self::ExcludeAutoSave,
        }
    }

    fn admits(self, record: &PreferenceRecord) -> bool {
        match self {
            Self::ExcludeAutoSave => !record.is_auto_save,
            Self::IncludeAll => true,
            Self::OnlyAutoSave => record.is_auto_save,
        }
    }
}

/// Cap on how many records a listing returns, applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLimit {
    /// Keep the newest `n` records.
    First(usize),
    /// Keep everything except the oldest `n` records.
    DropLast(usize),
}

impl RecordLimit {
    fn truncate(self, records: &mut Vec<PreferenceRecord>) {
        let keep = match self {
            Self::First(count) => count,
            Self::DropLast(count) => records.len().saturating_sub(count),
        };
        records.truncate(keep);
    }
}

/// Selection applied when listing preferences. The default hides auto-saves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceFilter {
    pub auto_save: AutoSaveFilter,
    pub limit: Option<RecordLimit>,
}

impl PreferenceFilter {
    pub fn all() -> Self {
        Self {
            auto_save: AutoSaveFilter::IncludeAll,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(RecordLimit::First(limit));
        self
    }

    /// Newest first, then filtered, then capped.
    pub fn apply(&self, mut records: Vec<PreferenceRecord>) -> Vec<PreferenceRecord> {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.retain(|record| self.auto_save.admits(record));
        if let Some(limit) = self.limit {
            limit.truncate(&mut records);
        }
        records
    }
}

/// JavaScript-style truthiness for loosely typed client payloads.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
