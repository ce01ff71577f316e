//! Record Watch CLI Application
//!
//! This is the command-line interface for the record watcher. It uses the
//! record-watch-core library and adds:
//! - Record/collection resolution (command line + TOML config)
//! - A JSON-file record store, re-read every poll
//! - The poll loop (fetch → apply → repaint → sleep)
//! - A refreshable terminal section for the change table

use anyhow::{bail, Context, Result};
use clap::Parser;
use record_watch_core::{
    PollSnapshot, RecordHandle, RecordSource, Renderer, SingleRecord, WatchCollection,
    WatchError, Watcher,
};
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

mod config;
mod display;
mod store;

use config::StaticCollection;
use display::ConsoleSection;
use store::JsonFileStore;

/// Record Watch - Watch a stored record for field changes
#[derive(Parser, Debug)]
#[command(name = "record-watch-cli")]
#[command(about = "Poll a record store and show which fields changed", long_about = None)]
#[command(version)]
struct Args {
    /// Record identity to watch, or the name of a collection in your config
    #[arg(value_name = "RECORD")]
    record: Option<String>,

    /// Specify which field(s) to show (can be repeated)
    #[arg(short, long, value_name = "NAME")]
    field: Vec<String>,

    /// How often (in milliseconds) to poll the store for changes
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Path to the JSON record store
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Path to configuration file (watch.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Record Watch CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using core library v{}", record_watch_core::VERSION);

    run(args)
}

fn run(args: Args) -> Result<()> {
    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    let store_path = args
        .store
        .clone()
        .or_else(|| app_config.store.clone())
        .context("No record store specified (use --store or set `store` in the config)")?;
    let store = JsonFileStore::new(&store_path);
    log::debug!("Record store: {:?}", store_path);

    let interval = Duration::from_millis(args.interval.unwrap_or(app_config.interval_ms));

    // Resolve what to watch: an explicit identity, a named collection, or
    // the config's default collection
    let collection = resolve_collection(&args, &app_config)?;
    let records = collection.records()?;
    let Some(handle) = records.first() else {
        bail!("No records to watch");
    };
    if records.len() > 1 {
        // Multiple records per session aren't supported.... yet!
        log::warn!(
            "Watching '{}' only; {} more record(s) in the collection ignored",
            handle.identity,
            records.len() - 1
        );
    }

    let mut watcher = build_watcher(handle, &args.field, &store)?;
    let mut section = ConsoleSection::new(io::stdout());

    log::info!(
        "Polling record '{}' every {} ms",
        watcher.identity(),
        interval.as_millis()
    );

    loop {
        let snapshot = store.fetch_snapshot(watcher.identity())?;

        match watcher.apply(&snapshot) {
            Ok(true) => {
                let view = Renderer::render(&watcher);
                let mut lines = view.to_lines();
                lines.push(display::change_footer(chrono::Local::now()));
                section.paint(&lines)?;
            }
            Ok(false) => {}
            // A value we can't canonicalize skips this cycle's commit; the
            // watcher is intact and the next poll may succeed
            Err(e @ WatchError::Normalization(_)) => {
                log::warn!("Skipping poll cycle: {}", e);
            }
            Err(e) => return Err(e.into()),
        }

        thread::sleep(interval);
    }
}

/// Pick the watch collection for this invocation.
///
/// A RECORD argument naming a configured collection resolves to that
/// collection; any other argument is a plain record identity. With no
/// argument at all, the config's `default` collection is used.
fn resolve_collection(
    args: &Args,
    app_config: &config::AppConfig,
) -> Result<Box<dyn WatchCollection>> {
    match &args.record {
        Some(record) => {
            if let Some(collection) = app_config.collections.get(record) {
                log::debug!("'{}' names a configured collection", record);
                Ok(Box::new(StaticCollection::new(record.as_str(), collection.clone())))
            } else {
                Ok(Box::new(SingleRecord::new(record.as_str())))
            }
        }
        None => {
            let collection = app_config
                .collections
                .get("default")
                .context("No record specified and no 'default' collection in the config")?;
            Ok(Box::new(StaticCollection::new("default", collection.clone())))
        }
    }
}

/// Construct the watcher for a record handle.
///
/// `--field` options beat the handle's field list; explicit fields are
/// validated against the record's current key set before the loop starts.
/// Without explicit fields the tracked set is seeded from the initial
/// snapshot.
fn build_watcher(
    handle: &RecordHandle,
    field_options: &[String],
    store: &JsonFileStore,
) -> Result<Watcher> {
    let initial = store
        .fetch_snapshot(&handle.identity)
        .with_context(|| format!("Cannot fetch initial snapshot of '{}'", handle.identity))?;

    let explicit = if !field_options.is_empty() {
        Some(field_options.to_vec())
    } else {
        handle.fields.clone()
    };

    match explicit {
        Some(fields) => {
            validate_fields(&fields, &initial)?;
            Ok(Watcher::new(handle.identity.clone(), fields))
        }
        None => Ok(Watcher::from_snapshot(handle.identity.clone(), &initial)),
    }
}

/// Reject explicit field lists that can never match the record.
fn validate_fields(fields: &[String], initial: &PollSnapshot) -> Result<(), WatchError> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(WatchError::Configuration(
            "Field names must not be empty".to_string(),
        ));
    }

    let invalid: Vec<&str> = fields
        .iter()
        .filter(|f| !initial.contains_key(f.as_str()))
        .map(String::as_str)
        .collect();

    if !invalid.is_empty() {
        return Err(WatchError::Configuration(format!(
            "Invalid field(s): {}",
            invalid.join(", ")
        )));
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn initial() -> PollSnapshot {
        let mut snapshot = PollSnapshot::new();
        snapshot.insert("status".to_string(), json!("open"));
        snapshot.insert("name".to_string(), json!("Bob"));
        snapshot
    }

    #[test]
    fn test_validate_fields_accepts_known_names() {
        assert!(validate_fields(&["status".to_string()], &initial()).is_ok());
    }

    #[test]
    fn test_validate_fields_rejects_unknown_names() {
        let err = validate_fields(
            &["status".to_string(), "bogus".to_string()],
            &initial(),
        )
        .unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_validate_fields_rejects_empty_names() {
        let err = validate_fields(&[String::new()], &initial()).unwrap_err();
        assert!(matches!(err, WatchError::Configuration(_)));
    }

    #[test]
    fn test_resolve_prefers_configured_collection() {
        let toml_content = r#"
            [collections.team]
            records = ["users/1", "users/2"]
        "#;
        let app_config: config::AppConfig = toml::from_str(toml_content).unwrap();

        let args = Args::parse_from(["record-watch-cli", "team"]);
        let collection = resolve_collection(&args, &app_config).unwrap();
        assert_eq!(collection.records().unwrap().len(), 2);

        let args = Args::parse_from(["record-watch-cli", "users/9"]);
        let collection = resolve_collection(&args, &app_config).unwrap();
        assert_eq!(
            collection.records().unwrap(),
            vec![RecordHandle::new("users/9")]
        );
    }

    #[test]
    fn test_resolve_without_record_needs_default_collection() {
        let args = Args::parse_from(["record-watch-cli"]);
        assert!(resolve_collection(&args, &config::AppConfig::default()).is_err());
    }
}
