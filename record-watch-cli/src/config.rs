//! Configuration loading and parsing
//!
//! The optional TOML config names the record store and defines watch
//! collections: named groups of records (with an optional shared field
//! list) that can be watched without spelling an identity on the command
//! line.

use anyhow::{Context, Result};
use record_watch_core::{RecordHandle, WatchCollection, WatchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from watch.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Path to the JSON record store
    pub store: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Named watch collections
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
}

// Derived Default would zero interval_ms; the serde default only covers
// deserialization, and running without --config goes through here
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: None,
            interval_ms: default_interval_ms(),
            collections: BTreeMap::new(),
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    /// Record identities in this collection
    pub records: Vec<String>,

    /// Optional explicit field list applied to every record; when absent
    /// each watcher seeds its tracked set from the record's first snapshot
    pub fields: Option<Vec<String>>,
}

/// A named static group of records from the config file
pub struct StaticCollection {
    name: String,
    config: CollectionConfig,
}

impl StaticCollection {
    pub fn new(name: impl Into<String>, config: CollectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

impl WatchCollection for StaticCollection {
    fn records(&self) -> record_watch_core::Result<Vec<RecordHandle>> {
        if self.config.records.is_empty() {
            return Err(WatchError::Configuration(format!(
                "Collection '{}' has no records",
                self.name
            )));
        }

        Ok(self
            .config
            .records
            .iter()
            .map(|identity| match &self.config.fields {
                Some(fields) => RecordHandle::with_fields(identity, fields.clone()),
                None => RecordHandle::new(identity),
            })
            .collect())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
