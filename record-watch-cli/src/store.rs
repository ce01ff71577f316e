//! JSON-file record store
//!
//! The store is a single JSON document mapping record identity to a flat
//! object of fields. Every fetch re-reads and re-parses the file - that
//! re-read IS the poll, the file is the live source of truth and another
//! process is expected to be mutating it.

use record_watch_core::{PollSnapshot, RecordSource, Result, WatchError};
use std::fs;
use std::path::PathBuf;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonFileStore {
    fn fetch_snapshot(&self, identity: &str) -> Result<PollSnapshot> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            WatchError::Connection(format!("Cannot read store {:?}: {}", self.path, e))
        })?;

        let document: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            WatchError::Connection(format!("Store {:?} is not valid JSON: {}", self.path, e))
        })?;

        let records = document.as_object().ok_or_else(|| {
            WatchError::Connection(format!(
                "Store {:?} must be a JSON object of records",
                self.path
            ))
        })?;

        let record = records
            .get(identity)
            .ok_or_else(|| WatchError::NotFound(identity.to_string()))?;

        let fields = record.as_object().ok_or_else(|| {
            WatchError::Connection(format!("Record '{}' is not a JSON object", identity))
        })?;

        log::trace!("Fetched {} field(s) for record '{}'", fields.len(), identity);

        Ok(fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn store_with(content: &str) -> (NamedTempFile, JsonFileStore) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let store = JsonFileStore::new(file.path());
        (file, store)
    }

    #[test]
    fn test_fetch_returns_record_fields() {
        let (_file, store) = store_with(r#"{"users/1": {"status": "open", "age": 7}}"#);

        let snapshot = store.fetch_snapshot("users/1").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["status"], json!("open"));
        assert_eq!(snapshot["age"], json!(7));
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let (_file, store) = store_with(r#"{"users/1": {}}"#);

        assert!(matches!(
            store.fetch_snapshot("users/2"),
            Err(WatchError::NotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_store_is_a_connection_error() {
        let store = JsonFileStore::new("/nonexistent/records.json");

        assert!(matches!(
            store.fetch_snapshot("users/1"),
            Err(WatchError::Connection(_))
        ));
    }

    #[test]
    fn test_malformed_store_is_a_connection_error() {
        let (_file, store) = store_with("not json at all");

        assert!(matches!(
            store.fetch_snapshot("users/1"),
            Err(WatchError::Connection(_))
        ));
    }

    #[test]
    fn test_non_object_record_is_a_connection_error() {
        let (_file, store) = store_with(r#"{"users/1": [1, 2, 3]}"#);

        assert!(matches!(
            store.fetch_snapshot("users/1"),
            Err(WatchError::Connection(_))
        ));
    }

    #[test]
    fn test_refetch_sees_file_mutations() {
        let (mut file, store) = store_with(r#"{"users/1": {"status": "open"}}"#);

        let before = store.fetch_snapshot("users/1").unwrap();
        assert_eq!(before["status"], json!("open"));

        file.as_file_mut().set_len(0).unwrap();
        file.rewind().unwrap();
        file.write_all(br#"{"users/1": {"status": "closed"}}"#)
            .unwrap();
        file.flush().unwrap();

        let after = store.fetch_snapshot("users/1").unwrap();
        assert_eq!(after["status"], json!("closed"));
    }
}
