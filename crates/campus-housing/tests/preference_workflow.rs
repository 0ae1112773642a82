//! Preference capture through the HTTP router against a file-backed store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use campus_housing::preferences::{
    preference_router, AutoSaver, FilePreferenceStore, PreferenceFilter, PreferenceStore,
};
use campus_housing::wizard::{reduce, WizardAction, WizardEffect, WizardState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn auto_saves_stay_out_of_default_exports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FilePreferenceStore::new(dir.path().join("user-preferences")));

    let save = Request::post("/api/save-preferences")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "preferences": { "location": "Boston" }, "isAutoSave": true }).to_string(),
        ))
        .expect("request");
    let (status, payload) = call(preference_router(store.clone()), save).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["success"], true);
    let id = payload["id"].as_str().expect("id").to_string();
    assert!(dir
        .path()
        .join("user-preferences")
        .join(format!("{id}.json"))
        .is_file());

    let (_, payload) = call(preference_router(store.clone()), get("/api/preferences-export")).await;
    assert_eq!(payload["count"], 0);
    assert_eq!(payload["message"], "No preferences found");

    let (_, payload) = call(
        preference_router(store.clone()),
        get("/api/preferences-export?onlyAutoSave=true"),
    )
    .await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["preferences"][0]["id"], id.as_str());
    assert_eq!(payload["preferences"][0]["data"]["location"], "Boston");
}

#[tokio::test]
async fn wizard_auto_saves_feed_suggestions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(FilePreferenceStore::new(dir.path()));
    let autosave = AutoSaver::new(store.clone());

    let mut state = WizardState::default();
    for action in [
        WizardAction::SetLocation("Allston".to_string()),
        WizardAction::Next,
        WizardAction::SelectPrice("1500-2000".to_string()),
    ] {
        let transition = reduce(&state, action);
        for effect in transition.effects {
            if let WizardEffect::AutoSave(form) = effect {
                autosave
                    .capture(serde_json::to_value(&form).expect("form json"))
                    .await
                    .expect("auto-save joins");
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
        state = transition.state;
    }

    let auto_saved = store
        .list(&PreferenceFilter::all())
        .expect("list")
        .into_iter()
        .filter(|record| record.is_auto_save)
        .count();
    assert_eq!(auto_saved, 2);

    let (status, payload) = call(
        preference_router(store.clone()),
        get("/api/suggested-preferences"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recent = &payload["suggestions"][0];
    assert_eq!(recent["kind"], "recent");
    assert_eq!(recent["label"], "Allston");
    assert_eq!(recent["preferences"]["price"], "1500-2000");
    assert_eq!(recent["summary"], "$1500 - $2000");
}
