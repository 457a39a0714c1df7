//! Typed settings store with validation and change notification.

pub mod hot_reload;
pub mod loader;
pub mod model;
pub mod options;
pub mod registry;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tokio::sync::broadcast;

use crate::error::ConfigError;
use crate::validation::{self, report, shortcuts, ValidationResult};
use crate::value::{keyseq, OptionKind, OptionValue};
use hot_reload::{ConfigEvent, ConfigWatcher};
use loader::SettingsFile;
use model::Group;

pub use registry::{recognized_general_options, recognized_shortcut_names};

const EVENT_CAPACITY: usize = 16;

/// Location of the settings file when none is given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapmark")
        .join("snapmark.yaml")
}

/// How a [`ConfigStore`] starts up.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Do not validate the file while opening.
    pub skip_initial_error_check: bool,
    /// Create and watch the settings file.
    pub watch: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            skip_initial_error_check: false,
            watch: true,
        }
    }
}

/// Typed access to the settings file.
///
/// The store is confined to the thread that opened it. Watcher events are
/// queued in the background and handled when the owner calls
/// [`ConfigStore::process_file_events`]; state changes are published to
/// [`ConfigStore::subscribe`] receivers.
pub struct ConfigStore {
    path: PathBuf,
    settings: RefCell<SettingsFile>,
    watcher: RefCell<Option<ConfigWatcher>>,
    watch_enabled: bool,
    events: broadcast::Sender<ConfigEvent>,
    has_error: Cell<bool>,
    error_message: RefCell<String>,
    error_check_pending: Cell<bool>,
}

impl ConfigStore {
    /// Opens the settings file at `path` and validates it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Opens the settings file at its platform default location.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(default_config_path())
    }

    pub fn open_with(path: impl Into<PathBuf>, options: OpenOptions) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = SettingsFile::open(&path)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let store = Self {
            path,
            settings: RefCell::new(settings),
            watcher: RefCell::new(None),
            watch_enabled: options.watch,
            events,
            has_error: Cell::new(false),
            error_message: RefCell::new(String::new()),
            error_check_pending: Cell::new(false),
        };

        if options.skip_initial_error_check {
            store.ensure_file_watched();
        } else {
            store.check_and_handle_error();
        }
        tracing::debug!(
            path = %store.path.display(),
            has_error = store.has_error(),
            "Config store opened"
        );
        Ok(store)
    }

    /// Receives [`ConfigEvent`]s published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigEvent> {
        self.events.subscribe()
    }

    /// Path of the settings file.
    pub fn config_file_path(&self) -> &Path {
        &self.path
    }

    // ---- generic accessors ----

    /// Effective value of a recognized key, in normalized stored form.
    ///
    /// Shortcut keys carry the `Shortcuts/` prefix. Returns the built-in
    /// default when the key is missing, when its value is bad (which also
    /// puts the store in the error state) and while the store is in the
    /// error state.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not recognized.
    pub fn value(&self, key: &str) -> Value {
        let kind = assert_key_recognized(key);
        self.refresh();

        let (group, name) = registry::split_key(key);
        let raw = self.settings.borrow().get(group, name).cloned();
        if let Some(raw) = &raw {
            if !kind.check(raw) {
                tracing::warn!(key, "Bad value in config, using default");
                self.set_error_state(
                    true,
                    format!("Bad value in '{}'. Expected: {}", key, kind.expected()),
                );
            }
        }

        if self.has_error.get() {
            return kind.fallback();
        }
        kind.value(raw.as_ref())
    }

    /// Validates, normalizes and stores `value` under a recognized key.
    ///
    /// Refused while the store is in the error state.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not recognized.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let kind = assert_key_recognized(key);
        self.refresh();

        if self.has_error.get() {
            tracing::warn!(key, "Config has errors, refusing write");
            return Err(ConfigError::WritesSuspended);
        }

        let normalized = kind.normalize(&value).ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            expected: kind.expected(),
        })?;

        let (group, name) = registry::split_key(key);
        self.settings.get_mut().set(group, name, normalized)?;
        tracing::debug!(key, "Config value stored");
        Ok(())
    }

    pub(crate) fn typed<T: OptionValue + Default>(&self, key: &str) -> T {
        T::decode(&self.value(key)).unwrap_or_default()
    }

    pub(crate) fn set_typed<T: OptionValue>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), ConfigError> {
        self.set_value(key, value.encode())
    }

    // ---- shortcuts ----

    /// Key sequence bound to the shortcut `name`; empty when unbound.
    pub fn shortcut(&self, name: &str) -> String {
        self.typed(&registry::shortcut_key(name))
    }

    /// Binds the shortcut `name` to `sequence`; an empty sequence unbinds it.
    ///
    /// Reserved keys and sequences already bound to another stored shortcut
    /// are rejected.
    pub fn set_shortcut(&mut self, name: &str, sequence: &str) -> Result<(), ConfigError> {
        let key = registry::shortcut_key(name);
        let kind = assert_key_recognized(&key);

        let normalized = keyseq::normalize(sequence).ok_or_else(|| ConfigError::InvalidValue {
            key: key.clone(),
            expected: kind.expected(),
        })?;
        if keyseq::is_reserved(&normalized) {
            return Err(ConfigError::ShortcutReserved {
                sequence: normalized,
            });
        }

        if !normalized.is_empty() {
            self.refresh();
            let settings = self.settings.borrow();
            let taken_by = settings
                .keys(Group::Shortcuts)
                .into_iter()
                .filter(|other| other != name)
                .find(|other| {
                    shortcuts::bound_sequence(&settings, other).as_deref()
                        == Some(normalized.as_str())
                });
            if let Some(other) = taken_by {
                return Err(ConfigError::ShortcutConflict {
                    sequence: normalized,
                    other,
                });
            }
        }

        self.set_value(&key, Value::String(normalized))
    }

    /// Returns true if the raw key addresses the shortcuts namespace.
    pub fn is_shortcut(key: &str) -> bool {
        registry::is_shortcut(key)
    }

    // ---- defaults ----

    /// Drops every General entry so that all options use their built-in
    /// defaults. Shortcut bindings are kept. Allowed in the error state.
    pub fn set_default_settings(&mut self) -> Result<(), ConfigError> {
        self.settings.get_mut().reset_general()?;
        tracing::info!(path = %self.path.display(), "Config reset to defaults");
        self.check_and_handle_error();
        Ok(())
    }

    /// Keys present in `group` of the settings file, in file order.
    pub fn keys_from_group(&self, group: Group) -> Vec<String> {
        self.refresh();
        self.settings.borrow().keys(group)
    }

    // ---- validation ----

    /// Reports keys outside the recognized sets.
    pub fn check_unrecognized_settings(&self) -> ValidationResult {
        self.sync();
        validation::unrecognized::validate(&self.settings.borrow())
    }

    /// Reports pairs of stored shortcuts bound to the same sequence.
    pub fn check_shortcut_conflicts(&self) -> ValidationResult {
        self.sync();
        validation::shortcuts::validate(&self.settings.borrow())
    }

    /// Reports recognized entries whose values do not decode.
    pub fn check_semantics(&self) -> ValidationResult {
        self.sync();
        validation::semantic::validate(&self.settings.borrow())
    }

    /// Runs every check against the current file contents.
    pub fn validate(&self) -> ValidationResult {
        self.sync();
        validation::validate_settings(&self.settings.borrow())
    }

    /// Runs every check and returns true if any error was found.
    ///
    /// Each issue is written to `log` as a human-readable entry.
    pub fn check_for_errors(&self, log: Option<&mut dyn fmt::Write>) -> bool {
        let result = self.validate();
        if let Some(log) = log {
            for issue in result.issues() {
                if log.write_str(&report::format_issue(issue)).is_err() {
                    break;
                }
            }
        }
        !result.is_valid()
    }

    /// Re-reads the file, re-validates it and updates the error state.
    ///
    /// A missing file is never an error. Also (re)starts the file watch.
    pub fn check_and_handle_error(&self) {
        self.error_check_pending.set(false);

        let reloaded = {
            let mut settings = self.settings.borrow_mut();
            settings.reload().map(|()| settings.exists())
        };

        match reloaded {
            Err(e) => {
                tracing::warn!(error = %e, "Failed to re-read config file");
                self.set_error_state(true, e.to_string());
            }
            Ok(false) => self.set_error_state(false, String::new()),
            Ok(true) => {
                let result = validation::validate_settings(&self.settings.borrow());
                for issue in result.issues() {
                    tracing::warn!(
                        path = %issue.path,
                        severity = ?issue.severity,
                        message = %issue.message,
                        "Config issue"
                    );
                }
                if result.is_valid() {
                    self.set_error_state(false, String::new());
                } else {
                    self.set_error_state(true, report::format_brief_summary(&result));
                }
            }
        }

        self.ensure_file_watched();
    }

    // ---- error state ----

    /// Returns true if the last check found an error.
    pub fn has_error(&self) -> bool {
        self.has_error.get()
    }

    /// Description of the current error; empty when there is none.
    pub fn error_message(&self) -> String {
        self.error_message.borrow().clone()
    }

    fn set_error_state(&self, has_error: bool, message: String) {
        let changed = self.has_error.replace(has_error) != has_error;
        *self.error_message.borrow_mut() = message;
        if !changed {
            return;
        }

        let event = if has_error {
            tracing::warn!(message = %self.error_message.borrow(), "Config entered error state");
            ConfigEvent::Error
        } else {
            tracing::info!("Config errors resolved");
            ConfigEvent::ErrorResolved
        };
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    // ---- file watch ----

    /// Handles queued file events.
    ///
    /// Publishes [`ConfigEvent::FileChanged`] and re-validates once per
    /// batch. Changes written by this store are not re-validated. Returns
    /// true if the file changed.
    pub fn process_file_events(&self) -> bool {
        let changed = match self.watcher.borrow().as_ref() {
            Some(watcher) => watcher.drain(),
            None => false,
        };
        if !changed {
            return false;
        }

        let _ = self.events.send(ConfigEvent::FileChanged);

        let (own_write, exists) = {
            let settings = self.settings.borrow();
            (settings.is_own_write(), settings.exists())
        };
        if own_write {
            tracing::trace!("Ignoring own config write");
        } else if !exists {
            tracing::debug!(path = %self.path.display(), "Config file removed");
            self.error_check_pending.set(true);
        } else {
            tracing::info!(path = %self.path.display(), "Config file changed, re-checking");
            self.check_and_handle_error();
        }
        true
    }

    fn ensure_file_watched(&self) {
        if !self.watch_enabled || self.watcher.borrow().is_some() {
            return;
        }

        if !self.path.exists() {
            let created = self
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|()| std::fs::write(&self.path, b""));
            if let Err(e) = created {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not create config file"
                );
                return;
            }
        }

        match ConfigWatcher::start(&self.path) {
            Ok(watcher) => *self.watcher.borrow_mut() = Some(watcher),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not watch config file"
                );
            }
        }
    }

    /// Picks up external changes. A change leaves a re-check pending.
    fn sync(&self) {
        match self.settings.borrow_mut().sync() {
            Ok(true) => self.error_check_pending.set(true),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to sync config file"),
        }
    }

    /// Syncs and runs any pending re-check.
    fn refresh(&self) {
        self.sync();
        if self.error_check_pending.get() {
            self.check_and_handle_error();
        }
    }
}

/// Kind of a recognized key. An unrecognized key is a programming error.
fn assert_key_recognized(key: &str) -> OptionKind {
    match registry::kind_for(key) {
        Some(kind) => kind,
        None => {
            tracing::error!(key, "Access to unrecognized config key");
            panic!("unrecognized config key '{}'", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_store(dir: &TempDir, text: &str) -> ConfigStore {
        let path = dir.path().join("snapmark.yaml");
        std::fs::write(&path, text).unwrap();
        ConfigStore::open_with(
            path,
            OpenOptions {
                skip_initial_error_check: false,
                watch: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_generic_value_uses_default_when_missing() {
        let dir = TempDir::new().unwrap();
        let store = quiet_store(&dir, "");
        assert_eq!(store.value("drawFontSize"), Value::Number(8.into()));
        assert_eq!(store.value("Shortcuts/undo"), Value::String("Ctrl+Z".into()));
    }

    #[test]
    #[should_panic(expected = "unrecognized config key")]
    fn test_unrecognized_key_panics() {
        let dir = TempDir::new().unwrap();
        let store = quiet_store(&dir, "");
        store.value("noSuchOption");
    }

    #[test]
    fn test_bad_value_on_read_sets_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapmark.yaml");
        std::fs::write(&path, "General:\n  drawThickness: thick\n").unwrap();
        let store = ConfigStore::open_with(
            &path,
            OpenOptions {
                skip_initial_error_check: true,
                watch: false,
            },
        )
        .unwrap();

        assert!(!store.has_error());
        assert_eq!(store.draw_thickness(), 3);
        assert!(store.has_error());
        assert!(store.error_message().contains("drawThickness"));
    }

    #[test]
    fn test_writes_suspended_in_error_state() {
        let dir = TempDir::new().unwrap();
        let mut store = quiet_store(&dir, "General:\n  bogus: 1\n");
        assert!(store.has_error());
        assert!(matches!(
            store.set_show_help(false),
            Err(ConfigError::WritesSuspended)
        ));
    }

    #[test]
    fn test_getters_return_defaults_in_error_state() {
        let dir = TempDir::new().unwrap();
        let store = quiet_store(&dir, "General:\n  drawThickness: 9\n  bogus: 1\n");
        assert!(store.has_error());
        assert_eq!(store.draw_thickness(), 3);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = quiet_store(&dir, "");
        let err = store.set_draw_thickness(0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "drawThickness"));
        assert_eq!(store.draw_thickness(), 3);
    }

    #[test]
    fn test_is_shortcut() {
        assert!(ConfigStore::is_shortcut("Shortcuts/pin"));
        assert!(!ConfigStore::is_shortcut("buttons"));
    }

    #[test]
    fn test_error_events_on_transitions() {
        let dir = TempDir::new().unwrap();
        let store = quiet_store(&dir, "");
        let mut rx = store.subscribe();

        std::fs::write(store.config_file_path(), "General:\n  bogus: 1\n").unwrap();
        store.check_and_handle_error();
        store.check_and_handle_error();
        std::fs::write(store.config_file_path(), "General:\n  showHelp: true\n").unwrap();
        store.check_and_handle_error();

        assert_eq!(rx.try_recv().unwrap(), ConfigEvent::Error);
        assert_eq!(rx.try_recv().unwrap(), ConfigEvent::ErrorResolved);
        assert!(rx.try_recv().is_err());
    }
}
