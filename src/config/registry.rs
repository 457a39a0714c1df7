//! Recognized keys of both groups.
//!
//! General keys are declared together with their accessors in
//! [`super::options`]; shortcut names and their built-in bindings live here.

use super::model::Group;
use super::options::GENERAL_OPTIONS;
use crate::value::OptionKind;

/// Prefix that puts a raw key in the shortcuts namespace.
pub const SHORTCUT_PREFIX: &str = "Shortcuts/";

/// A recognized General option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
}

/// Recognized shortcut names with their built-in key sequence.
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("pencil", "P"),
    ("line", "D"),
    ("arrow", "A"),
    ("selection", "S"),
    ("rectangle", "R"),
    ("circle", "C"),
    ("marker", "M"),
    ("text", "T"),
    ("circle-count", ""),
    ("pixelate", "B"),
    ("invert", "I"),
    ("selection-indicator", ""),
    ("move-selection", "Ctrl+M"),
    ("undo", "Ctrl+Z"),
    ("redo", "Ctrl+Shift+Z"),
    ("copy", "Ctrl+C"),
    ("save", "Ctrl+S"),
    ("pin", ""),
    ("image-uploader", ""),
    ("open-app", "Ctrl+O"),
    ("size-increase", ""),
    ("size-decrease", ""),
    ("accept", "Return"),
    ("exit", "Ctrl+Q"),
    ("toggle-panel", "Space"),
    ("commit-current-tool", "Ctrl+Return"),
    ("delete-current-tool", "Delete"),
    ("move-left", "Left"),
    ("move-right", "Right"),
    ("move-up", "Up"),
    ("move-down", "Down"),
    ("resize-left", "Shift+Left"),
    ("resize-right", "Shift+Right"),
    ("resize-up", "Shift+Up"),
    ("resize-down", "Shift+Down"),
];

/// Looks up a General option by key.
pub fn general_option(key: &str) -> Option<&'static OptionSpec> {
    GENERAL_OPTIONS.iter().find(|spec| spec.key == key)
}

/// Built-in binding of a recognized shortcut name.
pub fn shortcut_default(name: &str) -> Option<&'static str> {
    SHORTCUTS
        .iter()
        .find(|(shortcut, _)| *shortcut == name)
        .map(|(_, default)| *default)
}

pub fn recognized_general_options() -> impl Iterator<Item = &'static str> {
    GENERAL_OPTIONS.iter().map(|spec| spec.key)
}

pub fn recognized_shortcut_names() -> impl Iterator<Item = &'static str> {
    SHORTCUTS.iter().map(|(name, _)| *name)
}

/// Returns true if the raw key addresses the shortcuts namespace.
pub fn is_shortcut(key: &str) -> bool {
    key.starts_with(SHORTCUT_PREFIX)
}

/// Raw key of a shortcut name.
pub fn shortcut_key(name: &str) -> String {
    format!("{}{}", SHORTCUT_PREFIX, name)
}

/// Splits a raw key into its group and the key within that group.
pub fn split_key(key: &str) -> (Group, &str) {
    match key.strip_prefix(SHORTCUT_PREFIX) {
        Some(name) => (Group::Shortcuts, name),
        None => (Group::General, key),
    }
}

/// Kind of a recognized raw key, or `None` if the key is unrecognized.
pub fn kind_for(key: &str) -> Option<OptionKind> {
    match split_key(key) {
        (Group::Shortcuts, name) => shortcut_default(name).map(OptionKind::KeySequence),
        (Group::General, key) => general_option(key).map(|spec| spec.kind),
    }
}
