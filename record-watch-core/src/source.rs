//! Record source and collection contracts
//!
//! The engine never fetches anything itself: a driver resolves which
//! record(s) to watch through a [`WatchCollection`] and fetches snapshots
//! through a [`RecordSource`], then feeds them to the watcher. These
//! traits are the whole boundary - the engine performs no retries and
//! owns no storage.

use crate::types::{PollSnapshot, Result};

/// Fetches the current snapshot of a record from some persistent store
pub trait RecordSource {
    /// Fetch the record's full current field→value mapping.
    ///
    /// Fails with [`WatchError::NotFound`](crate::WatchError::NotFound)
    /// when the record does not exist and
    /// [`WatchError::Connection`](crate::WatchError::Connection) when the
    /// store cannot be read. Retry policy belongs to the caller.
    fn fetch_snapshot(&self, identity: &str) -> Result<PollSnapshot>;
}

/// A record selected for watching, with an optional explicit field list
///
/// When `fields` is `None` the watcher's tracked set is seeded from the
/// record's initial snapshot instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHandle {
    pub identity: String,
    pub fields: Option<Vec<String>>,
}

impl RecordHandle {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            fields: None,
        }
    }

    pub fn with_fields(identity: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            fields: Some(fields),
        }
    }
}

/// Resolves which records a watch session should cover
///
/// Variants are supplied by the driver (a single identity from the
/// command line, a named group from configuration, ...); the engine stays
/// agnostic to which one produced its records.
pub trait WatchCollection {
    fn records(&self) -> Result<Vec<RecordHandle>>;
}

/// The simplest collection: exactly one record, known by identity
pub struct SingleRecord {
    handle: RecordHandle,
}

impl SingleRecord {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            handle: RecordHandle::new(identity),
        }
    }

    pub fn with_fields(identity: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            handle: RecordHandle::with_fields(identity, fields),
        }
    }
}

impl WatchCollection for SingleRecord {
    fn records(&self) -> Result<Vec<RecordHandle>> {
        Ok(vec![self.handle.clone()])
    }
}
