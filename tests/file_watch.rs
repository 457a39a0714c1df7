use std::path::PathBuf;
use std::time::{Duration, Instant};

use snapmark_config::config::hot_reload::ConfigEvent;
use snapmark_config::config::{ConfigStore, OpenOptions};
use tempfile::TempDir;
use tokio::sync::broadcast;

const TIMEOUT: Duration = Duration::from_secs(5);

fn settings_path(dir: &TempDir) -> PathBuf {
    dir.path().join("snapmark.yaml")
}

/// Drains file events until `done` holds or the timeout passes.
fn pump_until(store: &ConfigStore, mut done: impl FnMut(&ConfigStore) -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        store.process_file_events();
        if done(store) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

/// Drains file events until one batch touches the settings file.
fn wait_for_change(store: &ConfigStore) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if store.process_file_events() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

fn received(rx: &mut broadcast::Receiver<ConfigEvent>) -> Vec<ConfigEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_open_creates_and_watches_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("snapmark.yaml");

    let store = ConfigStore::open(&path).unwrap();
    assert!(path.exists());
    assert!(!store.has_error());
}

#[test]
fn test_external_change_triggers_recheck() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::open(settings_path(&dir)).unwrap();
    let mut rx = store.subscribe();

    std::fs::write(settings_path(&dir), "General:\n  totallyUnknownKey: x\n").unwrap();
    assert!(pump_until(&store, |s| s.has_error()));
    assert!(store.error_message().contains("totallyUnknownKey"));

    let events = received(&mut rx);
    assert!(events.contains(&ConfigEvent::FileChanged));
    assert!(events.contains(&ConfigEvent::Error));

    std::fs::write(settings_path(&dir), "General:\n  showHelp: false\n").unwrap();
    assert!(pump_until(&store, |s| !s.has_error()));
    assert!(received(&mut rx).contains(&ConfigEvent::ErrorResolved));
    assert!(!store.show_help());
}

#[test]
fn test_own_write_does_not_recheck() {
    let dir = TempDir::new().unwrap();
    std::fs::write(settings_path(&dir), "General:\n  bogus: 1\n").unwrap();
    let mut store = ConfigStore::open_with(
        settings_path(&dir),
        OpenOptions {
            skip_initial_error_check: true,
            watch: true,
        },
    )
    .unwrap();
    assert!(!store.has_error());
    let mut rx = store.subscribe();

    // The written file still carries the unknown key, so a re-check would fail it.
    store.set_draw_thickness(6).unwrap();
    assert!(wait_for_change(&store));
    std::thread::sleep(Duration::from_millis(200));
    store.process_file_events();

    assert!(!store.has_error());
    assert_eq!(store.draw_thickness(), 6);
    let events = received(&mut rx);
    assert!(events.contains(&ConfigEvent::FileChanged));
    assert!(!events.contains(&ConfigEvent::Error));
}

#[test]
fn test_deleted_file_resolves_on_next_access() {
    let dir = TempDir::new().unwrap();
    std::fs::write(settings_path(&dir), "General:\n  bogus: 1\n").unwrap();
    let store = ConfigStore::open(settings_path(&dir)).unwrap();
    assert!(store.has_error());

    std::fs::remove_file(settings_path(&dir)).unwrap();
    assert!(wait_for_change(&store));
    assert!(store.has_error());

    // The first access after the deletion runs the pending re-check.
    assert_eq!(store.draw_thickness(), 3);
    assert!(!store.has_error());
}
