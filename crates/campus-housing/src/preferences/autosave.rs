use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::store::PreferenceStore;
use crate::listings::ScoredProperty;
use crate::search::SearchQuery;

/// Result metadata attached to a tracked search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub result_count: usize,
    pub formatted_price: String,
    pub top_matches_count: usize,
}

/// Background preference capture. Every call spawns a detached task that stores the
/// payload as an auto-save; failures are logged and never reach the caller.
///
/// The returned handle may be dropped; awaiting it only waits for the write to finish.
#[derive(Clone)]
pub struct AutoSaver {
    store: Arc<dyn PreferenceStore>,
}

impl AutoSaver {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn capture(&self, preferences: Value) -> JoinHandle<()> {
        self.spawn("preference capture", preferences)
    }

    pub fn track_search(&self, query: &SearchQuery, summary: &SearchSummary) -> JoinHandle<()> {
        let timestamp = Utc::now().to_rfc3339();
        let mut payload = to_object(query);
        let mut results = to_object(summary);
        results.insert("timestamp".to_string(), Value::String(timestamp.clone()));

        payload.insert("timestamp".to_string(), Value::String(timestamp));
        payload.insert("results".to_string(), Value::Object(results));
        payload.insert("queryType".to_string(), Value::String("search".to_string()));
        self.spawn("search tracking", Value::Object(payload))
    }

    pub fn track_listing_view(
        &self,
        query: &SearchQuery,
        listing: &ScoredProperty,
    ) -> JoinHandle<()> {
        let property = &listing.property;
        let mut payload = to_object(query);
        payload.insert("interactionType".to_string(), json!("hover"));
        payload.insert("listingId".to_string(), json!(property.id));
        payload.insert(
            "listingDetails".to_string(),
            json!({
                "price": property.price,
                "bedrooms": property.description.beds,
                "location": property.location.address.display_line(),
            }),
        );
        self.spawn("listing view tracking", Value::Object(payload))
    }

    fn spawn(&self, purpose: &'static str, payload: Value) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || match store.save(payload, true) {
            Ok(id) => debug!(%id, purpose, "background preference stored"),
            Err(err) => warn!(error = %err, purpose, "background preference save failed"),
        })
    }
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
