//! Core types for the record watch library
//!
//! This module defines the fundamental types that flow through the watch
//! engine: the raw field values a record source hands us, the per-poll
//! snapshot, and the error taxonomy. The engine itself is in `watcher`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type for watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// One fetch's full set of field→value pairs for the watched record.
///
/// Values are raw JSON as the record source produced them; classification
/// and canonicalization happen inside [`Watcher::apply`](crate::Watcher::apply).
/// Snapshots are ephemeral: a snapshot is consumed by a single `apply`
/// call and never retained.
pub type PollSnapshot = BTreeMap<String, serde_json::Value>;

/// A classified scalar value observed in a record snapshot
///
/// Composite values (arrays, nested objects) are deliberately not
/// representable: a record is a flat mapping of field name to scalar, and
/// anything else fails conversion with [`WatchError::Normalization`],
/// which aborts that poll cycle's commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// The field is present but has no value (distinct from "unchanged")
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Text value
    Text(String),
}

impl fmt::Display for FieldValue {
    /// Displays the canonical form, so `Text("null")` can never print
    /// the same as `Null` - see [`value::canonical`](crate::value::canonical).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::value::canonical(self))
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = WatchError;

    fn try_from(value: serde_json::Value) -> Result<FieldValue> {
        match value {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Bool(b) => Ok(FieldValue::Boolean(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FieldValue::Float(f))
                } else {
                    Err(WatchError::Normalization(format!(
                        "Numeric value out of range: {}",
                        n
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(FieldValue::Text(s)),
            other => Err(WatchError::Normalization(format!(
                "Unsupported value type for field: {}",
                type_name(&other)
            ))),
        }
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Errors that can occur while watching a record
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Invalid watch configuration - fatal to the watcher being built
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A raw value could not be canonicalized - aborts one poll cycle's
    /// commit, the watcher itself survives
    #[error("Failed to normalize value: {0}")]
    Normalization(String),

    /// The watched record does not exist in the store
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The record store could not be reached or read
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
