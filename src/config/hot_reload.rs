//! Settings file change detection.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::WatcherError;

/// Notifications published by a [`super::ConfigStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// The store entered the error state.
    Error,
    /// The store left the error state.
    ErrorResolved,
    /// The settings file changed on disk.
    FileChanged,
}

/// Watches the directory holding the settings file and queues the events
/// that concern the file itself.
///
/// The directory is watched rather than the file so that editors which
/// replace the file on save, and deletion followed by re-creation, keep
/// being observed.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    file_name: OsString,
}

impl ConfigWatcher {
    /// Starts watching `path`. Its parent directory must exist.
    pub fn start(path: &Path) -> Result<Self, WatcherError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| WatcherError::WatchFailed {
                path: path.to_path_buf(),
                message: "path has no file name".to_string(),
            })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::debug!(path = %path.display(), "Watching config file");
        Ok(Self {
            _watcher: watcher,
            rx,
            file_name,
        })
    }

    /// Takes every queued event without blocking.
    ///
    /// Returns true if at least one of them touched the settings file.
    pub fn drain(&self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if self.is_relevant(&event) {
                        changed = true;
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Config watcher reported an error");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Config watcher channel closed");
                    break;
                }
            }
        }
        changed
    }

    fn is_relevant(&self, event: &Event) -> bool {
        let kind = event.kind;
        if !(kind.is_modify() || kind.is_create() || kind.is_remove()) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}
