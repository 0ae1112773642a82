use std::fs;

use serde_json::json;

use super::common::*;
use crate::preferences::domain::{AutoSaveFilter, PreferenceFilter, RecordLimit};
use crate::preferences::export::ExportRequest;
use crate::preferences::store::{FilePreferenceStore, PreferenceStore};

#[test]
fn auto_saves_are_hidden_by_default_and_isolated_on_request() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FilePreferenceStore::new(dir.path().join("user-preferences"));

    let id = store
        .save(json!({ "location": "Boston" }), true)
        .expect("save succeeds");

    let default_view = store
        .list(&PreferenceFilter::default())
        .expect("list succeeds");
    assert!(default_view.is_empty());

    let only_auto = ExportRequest::new(false, true, 500);
    let records = store.list(&only_auto.filter).expect("list succeeds");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].data, json!({ "location": "Boston" }));
    assert!(records[0].is_auto_save);
}

#[test]
fn directory_is_created_on_first_use() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path().join("nested").join("prefs");
    let store = FilePreferenceStore::new(&root);

    assert!(store.list(&PreferenceFilter::all()).expect("list").is_empty());
    assert!(root.is_dir());
}

#[test]
fn one_file_per_record_named_by_id() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FilePreferenceStore::new(dir.path());

    let first = store.save(json!({ "location": "Allston" }), false).expect("save");
    let second = store.save(json!({ "location": "Allston" }), false).expect("save");
    assert_ne!(first, second, "saves are never deduplicated");

    let contents = fs::read_to_string(dir.path().join(format!("{first}.json"))).expect("file");
    let stored: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(stored["id"], first.0.as_str());
    assert_eq!(stored["isAutoSave"], false);
    assert!(contents.contains('\n'), "records are pretty printed");
}

#[test]
fn malformed_and_foreign_files_are_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FilePreferenceStore::new(dir.path());
    store.save(json!({ "location": "Cambridge" }), false).expect("save");

    fs::write(dir.path().join("broken.json"), "{ not json").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("write");

    let records = store.list(&PreferenceFilter::all()).expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data["location"], "Cambridge");
}

#[test]
fn limit_applies_after_sorting_and_filtering() {
    let store = seeded_store();

    let filter = PreferenceFilter {
        auto_save: AutoSaveFilter::IncludeAll,
        limit: Some(RecordLimit::First(3)),
    };
    let records = store.list(&filter).expect("list");
    let stamps: Vec<_> = records.iter().map(|record| record.timestamp).collect();
    assert_eq!(stamps, vec![at(9, 15), at(9, 10), at(9, 5)]);

    let explicit = store.list(&PreferenceFilter::default().with_limit(1)).expect("list");
    assert_eq!(explicit.len(), 1);
    assert_eq!(explicit[0].data["location"], "Northeastern University");
}
