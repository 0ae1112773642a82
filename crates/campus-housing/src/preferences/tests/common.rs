use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::preferences::domain::{PreferenceFilter, PreferenceId, PreferenceRecord};
use crate::preferences::store::{InMemoryPreferenceStore, PreferenceStore, StoreError};

pub(super) struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn save(&self, _data: Value, _is_auto_save: bool) -> Result<PreferenceId, StoreError> {
        Err(StoreError::Unavailable("volume detached".to_string()))
    }

    fn list(&self, _filter: &PreferenceFilter) -> Result<Vec<PreferenceRecord>, StoreError> {
        Err(StoreError::Unavailable("volume detached".to_string()))
    }
}

pub(super) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 12, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Two explicit saves and two auto-saves, interleaved in time.
pub(super) fn seeded_store() -> Arc<InMemoryPreferenceStore> {
    Arc::new(InMemoryPreferenceStore::with_records(vec![
        PreferenceRecord::at(
            json!({ "location": "Boston University", "price": "1000-1500", "bedrooms": "1" }),
            false,
            at(9, 0),
        ),
        PreferenceRecord::at(
            json!({ "location": "Fenway", "amenities": ["gym", "laundry"] }),
            true,
            at(9, 5),
        ),
        PreferenceRecord::at(
            json!({ "location": "Northeastern University", "bedrooms": "2" }),
            false,
            at(9, 10),
        ),
        PreferenceRecord::at(json!({ "interactionType": "hover" }), true, at(9, 15)),
    ]))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
