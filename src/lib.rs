//! snapmark-config - typed, validated settings store for the snapmark
//! screenshot annotator.
//!
//! The library exposes [`config::ConfigStore`]; the binary wraps it in a
//! small command-line tool for inspecting and editing the settings file.

pub mod cli;
pub mod config;
pub mod error;
pub mod validation;
pub mod value;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use tokio::sync::broadcast;
use tracing::info;

use crate::cli::{Cli, Commands, ShowArgs, WatchArgs};
use crate::config::hot_reload::ConfigEvent;
use crate::config::{registry, ConfigStore, OpenOptions};
use crate::validation::{report, unrecognized};

/// Runs the command-line tool with the provided arguments.
pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.log_level())?;

    let path = cli.config_path();
    match cli.command {
        Commands::Check => check(&path),
        Commands::Show(args) => show(&path, &args),
        Commands::Get { key } => get(&path, &key),
        Commands::Set { key, value } => set(&path, &key, &value),
        Commands::Shortcut { name, sequence } => shortcut(&path, &name, sequence.as_deref()),
        Commands::Reset => reset(&path),
        Commands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        Commands::PreviewFilename => preview_filename(&path),
        Commands::Watch(args) => watch(&path, &args).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Opens the store for a one-shot command, without creating or watching the file.
fn open_store(path: &Path) -> Result<ConfigStore> {
    ConfigStore::open_with(
        path,
        OpenOptions {
            skip_initial_error_check: false,
            watch: false,
        },
    )
    .with_context(|| format!("Failed to open settings file {}", path.display()))
}

/// Fails with a helpful message unless `key` is recognized.
fn require_recognized(key: &str) -> Result<()> {
    if registry::kind_for(key).is_some() {
        return Ok(());
    }
    match unrecognized::closest_key(key) {
        Some(close) => bail!("Unrecognized key '{}'. Did you mean '{}'?", key, close),
        None => bail!("Unrecognized key '{}'", key),
    }
}

/// Validates the settings file and prints the report.
fn check(path: &Path) -> Result<()> {
    let store = open_store(path)?;
    let result = store.validate();
    println!("{}", report::format_report(&result));

    if !result.is_valid() {
        bail!("{} error(s) in {}", result.error_count(), path.display());
    }
    Ok(())
}

/// Prints every effective value grouped like the settings file.
fn show(path: &Path, args: &ShowArgs) -> Result<()> {
    let store = open_store(path)?;
    if store.has_error() {
        eprintln!("warning: {}; showing defaults", store.error_message());
    }

    let mut general = Mapping::new();
    for key in registry::recognized_general_options() {
        general.insert(Value::String(key.to_string()), store.value(key));
    }
    let mut shortcuts = Mapping::new();
    for name in registry::recognized_shortcut_names() {
        shortcuts.insert(
            Value::String(name.to_string()),
            Value::String(store.shortcut(name)),
        );
    }
    let mut root = Mapping::new();
    root.insert(Value::String("General".to_string()), Value::Mapping(general));
    root.insert(Value::String("Shortcuts".to_string()), Value::Mapping(shortcuts));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        print!("{}", serde_yaml::to_string(&root)?);
    }
    Ok(())
}

fn get(path: &Path, key: &str) -> Result<()> {
    require_recognized(key)?;
    let store = open_store(path)?;
    let value = store.value(key);
    match &value {
        Value::String(s) => println!("{}", s),
        other => print!("{}", serde_yaml::to_string(other)?),
    }
    Ok(())
}

/// Stores a value given on the command line.
///
/// The text is read as YAML so numbers, booleans and lists come through
/// typed; anything that does not fit the option is retried as plain text.
fn set(path: &Path, key: &str, text: &str) -> Result<()> {
    require_recognized(key)?;
    if let (config::model::Group::Shortcuts, name) = registry::split_key(key) {
        return shortcut(path, name, Some(text));
    }

    let mut store = open_store(path)?;
    let kind = registry::kind_for(key).context("key vanished from registry")?;
    let value = match serde_yaml::from_str::<Value>(text) {
        Ok(parsed) if !parsed.is_null() && kind.check(&parsed) => parsed,
        _ => Value::String(text.to_string()),
    };

    store
        .set_value(key, value)
        .with_context(|| format!("Failed to set '{}'", key))?;
    info!(key, "Setting updated");
    println!("{} = {}", key, text);
    Ok(())
}

fn shortcut(path: &Path, name: &str, sequence: Option<&str>) -> Result<()> {
    require_recognized(&registry::shortcut_key(name))?;
    let mut store = open_store(path)?;

    match sequence {
        None => println!("{}", store.shortcut(name)),
        Some(sequence) => {
            store
                .set_shortcut(name, sequence)
                .with_context(|| format!("Failed to bind '{}'", name))?;
            let bound = store.shortcut(name);
            if bound.is_empty() {
                println!("{} unbound", name);
            } else {
                println!("{} = {}", name, bound);
            }
        }
    }
    Ok(())
}

fn reset(path: &Path) -> Result<()> {
    let mut store = open_store(path)?;
    store
        .set_default_settings()
        .context("Failed to reset settings")?;
    println!("General options reset to defaults.");
    if store.has_error() {
        eprintln!("warning: {}", store.error_message());
    }
    Ok(())
}

fn preview_filename(path: &Path) -> Result<()> {
    let store = open_store(path)?;
    let now = chrono::Local::now();
    match store.render_filename(&now) {
        Some(name) => {
            println!("{}.{}", name, store.save_as_file_extension());
            Ok(())
        }
        None => bail!("Invalid filename pattern '{}'", store.filename_pattern()),
    }
}

/// Watches the settings file and prints notifications until Ctrl+C.
async fn watch(path: &Path, args: &WatchArgs) -> Result<()> {
    let store = ConfigStore::open(path)
        .with_context(|| format!("Failed to open settings file {}", path.display()))?;
    let mut events = store.subscribe();

    info!(path = %path.display(), "Watching settings file");
    println!("Watching {} (Ctrl+C to stop)", path.display());
    if store.has_error() {
        println!("error: {}", store.error_message());
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }

            _ = ticker.tick() => {
                store.process_file_events();
            }

            event = events.recv() => {
                match event {
                    Ok(ConfigEvent::FileChanged) => println!("file changed"),
                    Ok(ConfigEvent::Error) => println!("error: {}", store.error_message()),
                    Ok(ConfigEvent::ErrorResolved) => println!("errors resolved"),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed config events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}
