//! Settings file loading, parsing and persistence.
//!
//! The file is a YAML document with two top-level maps:
//!
//! ```yaml
//! General:
//!   drawThickness: 5
//! Shortcuts:
//!   pencil: P
//! ```
//!
//! Anything else at the top level is kept so validation can report it.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};

use super::model::Group;
use crate::error::ConfigError;

/// In-memory copy of the settings file, kept in step with the disk.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    general: Mapping,
    shortcuts: Mapping,
    /// Top-level entries outside the known groups.
    other: Mapping,
    parse_error: Option<String>,
    /// Digest of the bytes the in-memory copy was built from (None: no file).
    loaded_digest: Option<String>,
    /// Digest of the bytes this process last wrote.
    written_digest: Option<String>,
}

/// Parsed top-level layout of a settings document.
#[derive(Debug, Default)]
struct Document {
    general: Mapping,
    shortcuts: Mapping,
    other: Mapping,
}

impl SettingsFile {
    /// Opens the settings file at `path`. A missing file is an empty store.
    ///
    /// A file that exists but does not parse is not an error here: the store
    /// comes up empty and [`SettingsFile::parse_error`] describes the problem.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut file = Self {
            path: path.into(),
            general: Mapping::new(),
            shortcuts: Mapping::new(),
            other: Mapping::new(),
            parse_error: None,
            loaded_digest: None,
            written_digest: None,
        };
        file.reload()?;
        Ok(file)
    }

    /// Returns true if the backing file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse failure of the current file contents, if any.
    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// Re-reads the file from disk unconditionally.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        match read_bytes(&self.path)? {
            Some(bytes) => self.apply(&bytes),
            None => {
                self.apply_document(Document::default(), None);
                self.loaded_digest = None;
            }
        }
        Ok(())
    }

    /// Re-reads the file if its contents changed since the last load.
    ///
    /// Returns true if the in-memory copy changed.
    pub fn sync(&mut self) -> Result<bool, ConfigError> {
        let bytes = read_bytes(&self.path)?;
        let digest = bytes.as_deref().map(digest);
        if digest == self.loaded_digest {
            return Ok(false);
        }

        match bytes {
            Some(bytes) => self.apply(&bytes),
            None => {
                self.apply_document(Document::default(), None);
                self.loaded_digest = None;
            }
        }
        Ok(true)
    }

    /// Returns true if the file on disk holds exactly what this process last wrote.
    pub fn is_own_write(&self) -> bool {
        match (&self.written_digest, read_bytes(&self.path)) {
            (Some(written), Ok(Some(bytes))) => *written == digest(&bytes),
            _ => false,
        }
    }

    /// Stored value of `key` in `group`.
    pub fn get(&self, group: Group, key: &str) -> Option<&Value> {
        self.group(group).get(key)
    }

    /// Keys present in `group`, in file order.
    pub fn keys(&self, group: Group) -> Vec<String> {
        self.group(group).keys().map(key_name).collect()
    }

    /// Top-level entries that are not a known group, in file order.
    pub fn unknown_groups(&self) -> Vec<String> {
        self.other.keys().map(key_name).collect()
    }

    /// Stores `value` under `key` and writes the file.
    ///
    /// The in-memory copy only changes once the write has succeeded.
    pub fn set(&mut self, group: Group, key: &str, value: Value) -> Result<(), ConfigError> {
        if self.parse_error.is_some() {
            return Err(ConfigError::WritesSuspended);
        }
        let mut document = self.snapshot();
        let entries = match group {
            Group::General => &mut document.general,
            Group::Shortcuts => &mut document.shortcuts,
        };
        entries.insert(Value::String(key.to_string()), value);

        self.save(&document)?;
        self.apply_document(document, None);
        Ok(())
    }

    /// Drops every General entry and every unknown top-level entry, keeping
    /// shortcut bindings. Overwrites an unparsable file.
    pub fn reset_general(&mut self) -> Result<(), ConfigError> {
        let document = Document {
            shortcuts: self.shortcuts.clone(),
            ..Document::default()
        };
        self.save(&document)?;
        self.apply_document(document, None);
        Ok(())
    }

    fn group(&self, group: Group) -> &Mapping {
        match group {
            Group::General => &self.general,
            Group::Shortcuts => &self.shortcuts,
        }
    }

    fn snapshot(&self) -> Document {
        Document {
            general: self.general.clone(),
            shortcuts: self.shortcuts.clone(),
            other: self.other.clone(),
        }
    }

    fn apply(&mut self, bytes: &[u8]) {
        match parse_document(&self.path, bytes) {
            Ok(document) => self.apply_document(document, None),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Config file is unreadable"
                );
                self.apply_document(Document::default(), Some(e.to_string()));
            }
        }
        self.loaded_digest = Some(digest(bytes));
    }

    fn apply_document(&mut self, document: Document, parse_error: Option<String>) {
        self.general = document.general;
        self.shortcuts = document.shortcuts;
        self.other = document.other;
        self.parse_error = parse_error;
    }

    /// Writes `document` to disk and records its digest. The in-memory maps
    /// are left alone.
    fn save(&mut self, document: &Document) -> Result<(), ConfigError> {
        let mut root = Mapping::new();
        for (group, entries) in [
            (Group::General, &document.general),
            (Group::Shortcuts, &document.shortcuts),
        ] {
            if !entries.is_empty() {
                let name = Value::String(group.name().to_string());
                root.insert(name, Value::Mapping(entries.clone()));
            }
        }
        for (key, value) in &document.other {
            root.insert(key.clone(), value.clone());
        }

        let text = if root.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&root)
                .map_err(|e| ConfigError::SerializeFailed(e.to_string()))?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }
        std::fs::write(&self.path, text.as_bytes()).map_err(|e| ConfigError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        let written = digest(text.as_bytes());
        self.loaded_digest = Some(written.clone());
        self.written_digest = Some(written);
        tracing::debug!(path = %self.path.display(), "Config file written");
        Ok(())
    }
}

/// Reads the file, treating a missing file as `None`.
fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, ConfigError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn parse_document(path: &Path, bytes: &[u8]) -> Result<Document, ConfigError> {
    let parse_failed = |message: String| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        message,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| parse_failed(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Document::default());
    }

    let parsed = serde_yaml::from_str::<Value>(text).map_err(|e| parse_failed(e.to_string()))?;
    let root = match parsed {
        Value::Null => return Ok(Document::default()),
        Value::Mapping(root) => root,
        _ => return Err(parse_failed("top level must be a mapping".to_string())),
    };

    let mut document = Document::default();
    for (key, value) in root {
        let group = match key.as_str() {
            Some(name) if name == Group::General.name() => Some(Group::General),
            Some(name) if name == Group::Shortcuts.name() => Some(Group::Shortcuts),
            _ => None,
        };
        let slot = match group {
            Some(Group::General) => &mut document.general,
            Some(Group::Shortcuts) => &mut document.shortcuts,
            None => {
                document.other.insert(key, value);
                continue;
            }
        };
        match value {
            Value::Mapping(entries) => *slot = entries,
            Value::Null => {}
            _ => {
                return Err(parse_failed(format!(
                    "'{}' must be a mapping of keys to values",
                    key_name(&key)
                )))
            }
        }
    }

    Ok(document)
}

/// Display form of a mapping key.
fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Computes the SHA256 hash of the given content.
fn digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("snapmark.yaml");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = SettingsFile::open(dir.path().join("absent.yaml")).unwrap();
        assert!(!file.exists());
        assert!(file.keys(Group::General).is_empty());
        assert!(file.parse_error().is_none());
    }

    #[test]
    fn test_groups_are_split() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "General:\n  drawThickness: 5\n  showHelp: false\nShortcuts:\n  pencil: P\nExtra: 1\n",
        );
        let file = SettingsFile::open(&path).unwrap();
        assert_eq!(file.keys(Group::General), vec!["drawThickness", "showHelp"]);
        assert_eq!(file.keys(Group::Shortcuts), vec!["pencil"]);
        assert_eq!(file.unknown_groups(), vec!["Extra"]);
        assert_eq!(file.get(Group::General, "drawThickness"), Some(&Value::Number(5.into())));
    }

    #[test]
    fn test_unparsable_file_records_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "General: [unclosed\n");
        let mut file = SettingsFile::open(&path).unwrap();
        assert!(file.parse_error().is_some());
        assert!(matches!(
            file.set(Group::General, "showHelp", Value::Bool(true)),
            Err(ConfigError::WritesSuspended)
        ));
    }

    #[test]
    fn test_group_must_be_mapping() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "General: 3\n");
        let file = SettingsFile::open(&path).unwrap();
        assert!(file.parse_error().unwrap().contains("General"));
    }

    #[test]
    fn test_set_writes_and_marks_own_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("snapmark.yaml");
        let mut file = SettingsFile::open(&path).unwrap();
        file.set(Group::General, "drawThickness", Value::Number(7.into()))
            .unwrap();

        assert!(path.exists());
        assert!(file.is_own_write());
        let reopened = SettingsFile::open(&path).unwrap();
        assert_eq!(
            reopened.get(Group::General, "drawThickness"),
            Some(&Value::Number(7.into()))
        );
    }

    #[test]
    fn test_sync_detects_external_change() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "General:\n  showHelp: true\n");
        let mut file = SettingsFile::open(&path).unwrap();
        assert!(!file.sync().unwrap());

        std::fs::write(&path, "General:\n  showHelp: false\n").unwrap();
        assert!(file.sync().unwrap());
        assert!(!file.is_own_write());
        assert_eq!(file.get(Group::General, "showHelp"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_reset_general_keeps_shortcuts() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "General:\n  drawThickness: 9\nShortcuts:\n  save: Ctrl+S\nJunk: x\n",
        );
        let mut file = SettingsFile::open(&path).unwrap();
        file.reset_general().unwrap();

        let reopened = SettingsFile::open(&path).unwrap();
        assert!(reopened.keys(Group::General).is_empty());
        assert!(reopened.unknown_groups().is_empty());
        assert_eq!(reopened.keys(Group::Shortcuts), vec!["save"]);
    }

    /// Replaces the settings file with a directory so the next write fails.
    fn block_writes(path: &Path) {
        std::fs::remove_file(path).unwrap();
        std::fs::create_dir(path).unwrap();
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "General:\n  drawThickness: 4\n");
        let mut file = SettingsFile::open(&path).unwrap();
        block_writes(&path);

        let result = file.set(Group::General, "drawThickness", Value::Number(9.into()));
        assert!(matches!(result, Err(ConfigError::WriteFailed { .. })));
        assert_eq!(
            file.get(Group::General, "drawThickness"),
            Some(&Value::Number(4.into()))
        );
        assert!(file.get(Group::Shortcuts, "drawThickness").is_none());
    }

    #[test]
    fn test_failed_reset_keeps_state() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "General: [unclosed\n");
        let mut file = SettingsFile::open(&path).unwrap();
        assert!(file.parse_error().is_some());
        block_writes(&path);

        assert!(file.reset_general().is_err());
        assert!(file.parse_error().is_some());

        let path = dir.path().join("second.yaml");
        std::fs::write(&path, "General:\n  showHelp: false\nJunk: x\n").unwrap();
        let mut file = SettingsFile::open(&path).unwrap();
        block_writes(&path);

        assert!(file.reset_general().is_err());
        assert_eq!(file.get(Group::General, "showHelp"), Some(&Value::Bool(false)));
        assert_eq!(file.unknown_groups(), vec!["Junk"]);
    }
}
