//! End-to-end watch session through the public API: a fake record source
//! stands in for the driver's store, and each poll runs fetch → apply →
//! render the way a driver loop would.

use record_watch_core::{
    PollSnapshot, RecordSource, Renderer, Result, SingleRecord, WatchCollection, WatchError,
    Watcher,
};
use serde_json::json;
use std::cell::RefCell;

/// Record source backed by a scripted sequence of snapshots
struct ScriptedSource {
    snapshots: RefCell<Vec<PollSnapshot>>,
}

impl ScriptedSource {
    fn new(mut snapshots: Vec<PollSnapshot>) -> Self {
        snapshots.reverse();
        Self {
            snapshots: RefCell::new(snapshots),
        }
    }
}

impl RecordSource for ScriptedSource {
    fn fetch_snapshot(&self, identity: &str) -> Result<PollSnapshot> {
        self.snapshots
            .borrow_mut()
            .pop()
            .ok_or_else(|| WatchError::NotFound(identity.to_string()))
    }
}

fn snap(pairs: &[(&str, serde_json::Value)]) -> PollSnapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn watch_session_produces_the_expected_table() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = ScriptedSource::new(vec![
        snap(&[("status", json!("closed")), ("name", json!("Bob"))]),
        snap(&[("status", json!("closed")), ("name", json!("Bob"))]),
        snap(&[("status", json!("open")), ("name", json!("Bob"))]),
    ]);

    let collection = SingleRecord::with_fields(
        "users/1",
        vec!["status".to_string(), "name".to_string()],
    );
    let records = collection.records().unwrap();
    let handle = &records[0];

    let mut watcher = Watcher::new(
        handle.identity.clone(),
        handle.fields.clone().unwrap_or_default(),
    );

    // Driver loop: three polls, repaint on change
    let mut paints = 0;
    for _ in 0..3 {
        let snapshot = source.fetch_snapshot(watcher.identity()).unwrap();
        if watcher.apply(&snapshot).unwrap() {
            paints += 1;
        }
    }
    assert_eq!(paints, 2);

    let view = Renderer::render(&watcher);
    assert_eq!(view.title, "users/1");
    assert_eq!(view.header, vec!["Field", "Initial", "Change 1"]);
    assert_eq!(
        view.rows,
        vec![
            vec![
                "status".to_string(),
                "\"closed\"".to_string(),
                "\"open\"".to_string(),
            ],
            vec!["name".to_string(), "\"Bob\"".to_string(), String::new()],
        ]
    );
}

#[test]
fn exhausted_source_surfaces_not_found_to_the_driver() {
    let source = ScriptedSource::new(vec![snap(&[("status", json!("open"))])]);
    let mut watcher = Watcher::new("users/1", vec!["status".to_string()]);

    let first = source.fetch_snapshot(watcher.identity()).unwrap();
    assert!(watcher.apply(&first).unwrap());

    // The engine does not retry; the error reaches the caller unchanged
    let err = source.fetch_snapshot(watcher.identity()).unwrap_err();
    assert!(matches!(err, WatchError::NotFound(_)));
    assert_eq!(watcher.version_count(), 1);
}
