use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::domain::{is_truthy, PreferenceFilter};
use super::export::{ExportParams, ExportRequest, ExportedPreferences};
use super::store::{PreferenceStore, StoreError};
use super::suggestions::suggested_preferences;

/// Save, list, export, and suggestion endpoints backed by a preference store.
pub fn preference_router<S>(store: Arc<S>) -> Router
where
    S: PreferenceStore + 'static,
{
    Router::new()
        .route(
            "/api/save-preferences",
            get(list_handler::<S>).post(save_handler::<S>),
        )
        .route("/api/preferences-export", get(export_handler::<S>))
        .route("/api/suggested-preferences", get(suggestions_handler::<S>))
        .with_state(store)
}

/// Runs a store call on the blocking pool so file I/O stays off the async workers.
async fn with_store<S, T, F>(store: Arc<S>, work: F) -> Result<T, StoreError>
where
    S: PreferenceStore + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(store.as_ref()))
        .await
        .map_err(|err| StoreError::Unavailable(format!("preference task failed: {err}")))?
}

/// Saves `body.preferences` when present, otherwise the whole body.
///
/// The body is read as JSON whatever its content type.
pub(crate) async fn save_handler<S>(State(store): State<Arc<S>>, body: Bytes) -> Response
where
    S: PreferenceStore + 'static,
{
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(err) => {
            error!(error = %err, "rejected preference payload");
            return failure("Failed to save preferences");
        }
    };

    let is_auto_save = body.get("isAutoSave").is_some_and(is_truthy);
    let data = match body.get("preferences") {
        Some(preferences) if is_truthy(preferences) => preferences.clone(),
        _ => body,
    };

    match with_store(store, move |store| store.save(data, is_auto_save)).await {
        Ok(id) => {
            if !is_auto_save {
                info!(%id, "preferences saved");
            }
            let payload = json!({
                "success": true,
                "message": "Preferences saved successfully",
                "id": id,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "preference save failed");
            failure("Failed to save preferences")
        }
    }
}

pub(crate) async fn list_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: PreferenceStore + 'static,
{
    match with_store(store, |store| store.list(&PreferenceFilter::all())).await {
        Ok(preferences) => {
            let payload = json!({ "success": true, "preferences": preferences });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "preference listing failed");
            failure("Failed to retrieve preferences")
        }
    }
}

pub(crate) async fn export_handler<S>(
    State(store): State<Arc<S>>,
    RawQuery(query): RawQuery,
) -> Response
where
    S: PreferenceStore + 'static,
{
    let params = ExportParams::from_query(query.as_deref().unwrap_or_default());
    let request = ExportRequest::from(params);
    let filter = request.filter;
    let records = match with_store(store, move |store| store.list(&filter)).await {
        Ok(records) => records,
        Err(err) => {
            error!(error = %err, "preference export failed");
            return failure("Failed to export preferences");
        }
    };

    let payload = ExportedPreferences::shape(records, request.format).into_payload();
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn suggestions_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: PreferenceStore + 'static,
{
    match with_store(store, |store| suggested_preferences(store)).await {
        Ok(suggestions) => {
            let payload = json!({ "success": true, "suggestions": suggestions });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "preference suggestions failed");
            failure("Failed to load suggestions")
        }
    }
}

fn failure(message: &str) -> Response {
    let payload = json!({ "success": false, "message": message });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
