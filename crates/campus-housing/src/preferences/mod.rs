//! Preference persistence, background capture, export, and suggestions.
//!
//! Records are append-only JSON blobs; the HTTP surface lives in [`router`].

pub mod autosave;
pub mod domain;
pub mod export;
pub mod router;
pub mod store;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use autosave::{AutoSaver, SearchSummary};
pub use domain::{AutoSaveFilter, PreferenceFilter, PreferenceId, PreferenceRecord, RecordLimit};
pub use export::{
    parse_export_limit, AiPreferenceView, ExportFormat, ExportParams, ExportRequest,
    ExportedPreferences, DEFAULT_EXPORT_LIMIT,
};
pub use router::preference_router;
pub use store::{FilePreferenceStore, InMemoryPreferenceStore, PreferenceStore, StoreError};
pub use suggestions::{
    bedrooms_label, popular_presets, suggested_preferences, PreferenceSuggestion, SuggestionKind,
};
