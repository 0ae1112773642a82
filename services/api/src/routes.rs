use crate::infra::{health_report, resident_memory_mb, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use campus_housing::listings::ScoredProperty;
use campus_housing::preferences::{preference_router, PreferenceStore};
use campus_housing::presentation::MapView;
use campus_housing::search::{PreferenceForm, SearchParams};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Results page payload: ranked listings plus the configured map rendering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    pub(crate) location: String,
    pub(crate) price_label: String,
    pub(crate) amenities: Vec<String>,
    pub(crate) count: usize,
    pub(crate) top_matches: Vec<ScoredProperty>,
    pub(crate) others: Vec<ScoredProperty>,
    pub(crate) view: MapView,
    pub(crate) degraded: bool,
}

pub(crate) fn with_api_routes<S>(store: Arc<S>) -> axum::Router
where
    S: PreferenceStore + 'static,
{
    preference_router(store)
        .route("/health", axum::routing::get(healthcheck))
        .route("/api/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/search", axum::routing::get(search_endpoint))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<Value> {
    Json(health_report(&state.runtime, resident_memory_mb()))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        serde_json::json!({ "status": "ready" })
    } else {
        serde_json::json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn search_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let form = PreferenceForm::from(params);
    let outcome = state.search.search(&form).await;
    let view = state.map_view.render(&outcome.listings, None);
    let count = outcome.listings.len();

    Json(SearchResponse {
        location: form.location,
        price_label: outcome.price_label,
        amenities: form.amenities,
        count,
        top_matches: outcome.listings.top_matches,
        others: outcome.listings.others,
        view,
        degraded: outcome.degraded,
    })
}
