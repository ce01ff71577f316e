//! The watch engine
//!
//! A [`Watcher`] owns one record's field-version history and decides, per
//! poll, what changed. Each poll cycle runs filter → normalize → detect →
//! commit, and a commit appends exactly one entry to every tracked field's
//! history, so every history is a dense column of the same length and the
//! whole set renders directly as a table.

use crate::types::{PollSnapshot, Result};
use crate::value;
use std::collections::BTreeMap;

/// Version history for a single tracked field
///
/// The first entry is a sentinel holding the field's own name - it labels
/// the table row and seeds the sequence, but is never an observed value
/// and is excluded from change comparisons. Every later entry is either
/// the canonical string of a newly observed value, or `None` meaning "no
/// change to report this cycle" (which covers both "same value" and
/// "field absent from the snapshot").
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHistory {
    name: String,
    versions: Vec<Option<String>>,
}

impl FieldHistory {
    fn new(name: String) -> Self {
        let sentinel = Some(name.clone());
        Self {
            name,
            versions: vec![sentinel],
        }
    }

    /// The tracked field's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries, sentinel included - one cell per table column
    pub fn versions(&self) -> &[Option<String>] {
        &self.versions
    }

    /// The last retained (non-`None`) value, scanning backward past any
    /// `None` placeholders. The sentinel is excluded: a field with no
    /// observed values yet has no retained value.
    pub fn last_retained(&self) -> Option<&str> {
        self.versions[1..].iter().rev().find_map(|v| v.as_deref())
    }

    fn push(&mut self, entry: Option<String>) {
        self.versions.push(entry);
    }
}

/// Watches a single record for field changes across successive snapshots
///
/// The set of tracked fields is fixed at construction and never grows or
/// shrinks; snapshot keys outside the set are ignored on every poll.
/// History is held entirely in memory for the lifetime of the watcher and
/// grows by one entry per committed cycle without bound - a long watch
/// session on a busy record grows linearly with its change count.
///
/// Not internally synchronized: callers must not invoke [`apply`](Self::apply)
/// on the same watcher from more than one thread at a time.
pub struct Watcher {
    identity: String,
    fields: Vec<FieldHistory>,
}

impl Watcher {
    /// Create a watcher tracking an explicit list of field names.
    ///
    /// Duplicate names collapse to their first occurrence. An empty list
    /// is accepted and yields a degenerate watcher that tracks nothing
    /// and always reports "no change"; callers that consider that a
    /// mistake should validate before constructing.
    pub fn new(identity: impl Into<String>, field_names: Vec<String>) -> Self {
        let identity = identity.into();
        let mut fields: Vec<FieldHistory> = Vec::with_capacity(field_names.len());
        for name in field_names {
            if !fields.iter().any(|f| f.name() == name) {
                fields.push(FieldHistory::new(name));
            }
        }
        log::debug!(
            "Watching record '{}' ({} tracked fields)",
            identity,
            fields.len()
        );
        Self { identity, fields }
    }

    /// Create a watcher tracking every field of an initial snapshot.
    ///
    /// Only the key set is taken; the snapshot's values are not applied.
    /// The first subsequent [`apply`](Self::apply) records each field's
    /// first observed value in the "Initial" column.
    pub fn from_snapshot(identity: impl Into<String>, snapshot: &PollSnapshot) -> Self {
        Self::new(identity, snapshot.keys().cloned().collect())
    }

    /// The watched record's identity (opaque to the engine)
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Tracked fields with their histories, in tracked order
    pub fn fields(&self) -> &[FieldHistory] {
        &self.fields
    }

    /// Whether a field name is in the tracked set
    pub fn is_tracked(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    /// Number of committed versions (columns after the sentinel)
    pub fn version_count(&self) -> usize {
        self.fields
            .first()
            .map(|f| f.versions().len() - 1)
            .unwrap_or(0)
    }

    /// Apply one poll's snapshot, committing a new version if anything
    /// changed.
    ///
    /// Snapshot keys outside the tracked set are discarded; missing keys
    /// are treated as "no change", never as an error. Each remaining value
    /// is normalized and compared against the field's last retained value.
    /// If at least one field changed, every tracked field gains one
    /// history entry (the new value, or `None`) and this returns
    /// `Ok(true)`; otherwise history is untouched and this returns
    /// `Ok(false)`.
    ///
    /// A normalization failure aborts the whole cycle before any history
    /// mutation and surfaces as [`WatchError::Normalization`](crate::WatchError::Normalization);
    /// the watcher stays usable for the next cycle.
    pub fn apply(&mut self, snapshot: &PollSnapshot) -> Result<bool> {
        // Filter: set intersection with the tracked set
        let filtered: PollSnapshot = snapshot
            .iter()
            .filter(|(name, _)| self.is_tracked(name))
            .map(|(name, raw)| (name.clone(), raw.clone()))
            .collect();

        // Normalize everything before touching history so a failure on
        // any one value leaves this cycle uncommitted
        let normalized = value::normalize_snapshot(&filtered)?;

        // Detect: keep only values that differ from the last retained one
        let mut changed: BTreeMap<String, String> = BTreeMap::new();
        for field in &self.fields {
            if let Some(canon) = normalized.get(field.name()) {
                if field.last_retained() != Some(canon.as_str()) {
                    changed.insert(field.name().to_string(), canon.clone());
                }
            }
        }

        if changed.is_empty() {
            log::trace!("Record '{}': no changes this cycle", self.identity);
            return Ok(false);
        }

        log::debug!(
            "Record '{}': {} field(s) changed, committing version {}",
            self.identity,
            changed.len(),
            self.version_count() + 1
        );

        // Commit: one entry for every tracked field, changed or not
        for field in &mut self.fields {
            let entry = changed.remove(field.name.as_str());
            field.push(entry);
        }

        Ok(true)
    }
}
