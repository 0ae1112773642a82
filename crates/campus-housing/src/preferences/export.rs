use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::domain::{
    is_truthy, AutoSaveFilter, PreferenceFilter, PreferenceId, PreferenceRecord, RecordLimit,
};

pub const DEFAULT_EXPORT_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Records,
    Ai,
}

impl ExportFormat {
    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "ai" => Self::Ai,
            _ => Self::Records,
        }
    }
}

/// `GET /api/preferences-export` query parameters, kept as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportParams {
    pub include_auto_save: Option<String>,
    pub only_auto_save: Option<String>,
    pub limit: Option<String>,
    pub format: Option<String>,
}

impl ExportParams {
    /// Reads a raw query string. A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "includeAutoSave" => &mut params.include_auto_save,
                "onlyAutoSave" => &mut params.only_auto_save,
                "limit" => &mut params.limit,
                "format" => &mut params.format,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Reads a limit the way a browser `parseInt` would.
///
/// Absent or empty means the default. A leading integer is used and trailing text ignored;
/// a negative value drops that many of the oldest records; no leading digits means zero.
pub fn parse_export_limit(raw: Option<&str>) -> RecordLimit {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw.trim_start(),
        _ => return RecordLimit::First(DEFAULT_EXPORT_LIMIT),
    };

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return RecordLimit::First(0);
    }

    let count = digits.parse::<usize>().unwrap_or(usize::MAX);
    match (negative, count) {
        (true, 0) => RecordLimit::First(0),
        (true, count) => RecordLimit::DropLast(count),
        (false, count) => RecordLimit::First(count),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub filter: PreferenceFilter,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(include_auto_save: bool, only_auto_save: bool, limit: usize) -> Self {
        Self {
            filter: PreferenceFilter {
                auto_save: AutoSaveFilter::from_flags(include_auto_save, only_auto_save),
                limit: Some(RecordLimit::First(limit)),
            },
            format: ExportFormat::Records,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<ExportParams> for ExportRequest {
    /// Only the literal `"true"` enables a flag.
    fn from(params: ExportParams) -> Self {
        let flag = |value: &Option<String>| value.as_deref() == Some("true");
        let format = params
            .format
            .as_deref()
            .map(ExportFormat::from_str)
            .unwrap_or_default();

        let mut request =
            Self::new(flag(&params.include_auto_save), flag(&params.only_auto_save), 0)
                .with_format(format);
        request.filter.limit = Some(parse_export_limit(params.limit.as_deref()));
        request
    }
}

/// Flattened record shape for downstream model training.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiPreferenceView {
    pub id: PreferenceId,
    pub timestamp: DateTime<Utc>,
    pub location: Value,
    pub price_range: Value,
    pub bedrooms: Value,
    pub amenities: Value,
    pub is_auto_save: bool,
    pub search_completed: Value,
    pub viewed_results: Value,
    pub query_count: u32,
}

impl From<&PreferenceRecord> for AiPreferenceView {
    fn from(record: &PreferenceRecord) -> Self {
        let data = &record.data;
        Self {
            id: record.id.clone(),
            timestamp: record.timestamp,
            location: field_or(data, "location", Value::String(String::new())),
            price_range: field_or(data, "price", Value::String(String::new())),
            bedrooms: field_or(data, "bedrooms", Value::String(String::new())),
            amenities: field_or(data, "amenities", Value::Array(Vec::new())),
            is_auto_save: record.is_auto_save,
            search_completed: field_or(data, "searchCompleted", Value::Bool(false)),
            viewed_results: field_or(data, "viewedResults", Value::Bool(false)),
            query_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportedPreferences {
    Records(Vec<PreferenceRecord>),
    Ai(Vec<AiPreferenceView>),
}

impl ExportedPreferences {
    pub fn shape(records: Vec<PreferenceRecord>, format: ExportFormat) -> Self {
        match format {
            ExportFormat::Records => Self::Records(records),
            ExportFormat::Ai => Self::Ai(records.iter().map(AiPreferenceView::from).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Ai(views) => views.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `{ success, count, preferences }`, with a notice when nothing matched.
    pub fn into_payload(self) -> Value {
        let count = self.len();
        let mut payload = json!({
            "success": true,
            "count": count,
            "preferences": self,
        });
        if count == 0 {
            payload["message"] = Value::from("No preferences found");
        }
        payload
    }
}

fn field_or(data: &Value, key: &str, fallback: Value) -> Value {
    match data.get(key) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => fallback,
    }
}
