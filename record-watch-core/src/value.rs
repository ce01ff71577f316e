//! Value normalization helpers
//!
//! Every raw value observed in a snapshot is reduced to a canonical string
//! before change detection. The canonical form is the equality domain: two
//! raw values with identical canonical strings are treated as unchanged,
//! and the canonical string is also what the renderer displays.
//!
//! Distinctness rules: text is always double-quoted, so an empty string
//! canonicalizes to `""` and the string `null` to `"null"` - neither can
//! collide with a present-but-null value (`null`) or a boolean (`false`).
//! "Absent from the snapshot" has no canonical form at all; absence is
//! handled by the watcher, never by stringification.

use crate::types::{FieldValue, PollSnapshot, Result};
use std::collections::BTreeMap;

/// Produce the canonical string form of a classified scalar.
pub fn canonical(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Boolean(v) => if *v { "true" } else { "false" }.to_string(),
        FieldValue::Integer(v) => v.to_string(),
        FieldValue::Float(v) => v.to_string(),
        // Debug formatting quotes and escapes, keeping Text("") and
        // Text("null") distinct from absence and FieldValue::Null
        FieldValue::Text(v) => format!("{:?}", v),
    }
}

/// Normalize a raw snapshot value, classifying it first.
///
/// Fails with [`WatchError::Normalization`](crate::WatchError::Normalization)
/// on values with no scalar classification (arrays, nested objects).
pub fn normalize(raw: &serde_json::Value) -> Result<String> {
    let value = FieldValue::try_from(raw.clone())?;
    Ok(canonical(&value))
}

/// Normalize an entire filtered snapshot.
///
/// All values are normalized up front so a failure on any one of them
/// leaves the caller with nothing to commit - this is what makes a poll
/// cycle's commit all-or-nothing.
pub fn normalize_snapshot(snapshot: &PollSnapshot) -> Result<BTreeMap<String, String>> {
    let mut normalized = BTreeMap::new();
    for (name, raw) in snapshot {
        normalized.insert(name.clone(), normalize(raw)?);
    }
    Ok(normalized)
}
