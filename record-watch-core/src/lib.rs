//! Record Watch Core Library
//!
//! A small, synchronous engine for watching a single persistent record
//! and reporting which fields changed between successive reads.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on change tracking:
//! - Maintains a rolling per-field version history for one record
//! - Decides per poll whether anything changed (canonical-string equality,
//!   comparing against the last retained value)
//! - Renders the accumulated history as a columnar diff table
//! - Defines the record source / collection traits drivers implement
//!
//! The library does NOT:
//! - Resolve which record(s) to watch from a command line or config
//! - Fetch snapshots (no storage layer, no retries)
//! - Run the poll loop or sleep between cycles
//! - Write to a terminal
//!
//! All of that is in the application layer (record-watch-cli).
//!
//! # Example Usage
//!
//! ```
//! use record_watch_core::{PollSnapshot, Renderer, Watcher};
//!
//! let mut snapshot = PollSnapshot::new();
//! snapshot.insert("status".to_string(), serde_json::json!("open"));
//!
//! // Track every field the record currently has
//! let mut watcher = Watcher::from_snapshot("users/1", &snapshot);
//!
//! // Each poll: fetch a fresh snapshot, apply it, render on change
//! if watcher.apply(&snapshot).unwrap() {
//!     let view = Renderer::render(&watcher);
//!     for line in view.to_lines() {
//!         println!("{}", line);
//!     }
//! }
//! ```

// Public modules
pub mod render;
pub mod source;
pub mod types;
pub mod value;
pub mod watcher;

// Re-export main types for convenience
pub use render::{Renderer, TableView};
pub use source::{RecordHandle, RecordSource, SingleRecord, WatchCollection};
pub use types::{FieldValue, PollSnapshot, Result, WatchError};
pub use watcher::{FieldHistory, Watcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh watcher has no committed versions
        let watcher = Watcher::new("users/1", vec!["status".to_string()]);
        assert_eq!(watcher.version_count(), 0);
        assert_eq!(watcher.identity(), "users/1");
    }
}
