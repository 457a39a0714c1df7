//! Shortcut conflict detection.

use crate::config::loader::SettingsFile;
use crate::config::model::Group;
use crate::config::registry::shortcut_default;
use crate::value::{self, keyseq};

use super::{ValidationIssue, ValidationResult};

/// Effective sequence a stored shortcut entry binds, normalized.
///
/// Returns `None` for undecodable entries, which are left to the semantic
/// layer, and for empty (unbound) ones.
pub fn bound_sequence(settings: &SettingsFile, name: &str) -> Option<String> {
    let raw = settings.get(Group::Shortcuts, name)?;
    let text = value::as_text(raw)?;
    keyseq::normalize(&text).filter(|seq| !seq.is_empty())
}

/// Reports every pair of stored shortcuts bound to the same sequence, and
/// bindings to reserved keys.
pub fn validate(settings: &SettingsFile) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut bound: Vec<(String, String)> = Vec::new();
    for name in settings.keys(Group::Shortcuts) {
        if shortcut_default(&name).is_none() {
            continue;
        }
        if let Some(sequence) = bound_sequence(settings, &name) {
            if keyseq::is_reserved(&sequence) {
                result.add(
                    ValidationIssue::warning(
                        format!("Shortcuts.{}", name),
                        format!("Shortcut '{}' uses the reserved key {}", name, sequence),
                    )
                    .with_suggestion("The capture window handles reserved keys itself"),
                );
            }
            bound.push((name, sequence));
        }
    }

    for (i, (name, sequence)) in bound.iter().enumerate() {
        for (other, _) in bound[i + 1..].iter().filter(|(_, seq)| seq == sequence) {
            result.add(
                ValidationIssue::error(
                    format!("Shortcuts.{}", name),
                    format!(
                        "Shortcut conflict: '{}' and '{}' have the same shortcut: {}",
                        name, other, sequence
                    ),
                )
                .with_suggestion(format!("Rebind '{}' or '{}'", name, other)),
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(text: &str) -> (TempDir, SettingsFile) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapmark.yaml");
        std::fs::write(&path, text).unwrap();
        let file = SettingsFile::open(&path).unwrap();
        (dir, file)
    }

    #[test]
    fn test_equal_bindings_conflict_once() {
        let (_dir, file) = open("Shortcuts:\n  copy: Ctrl+C\n  save: ctrl+c\n");
        let result = validate(&file);
        assert_eq!(result.error_count(), 1);
        assert_eq!(
            result.issues()[0].message,
            "Shortcut conflict: 'copy' and 'save' have the same shortcut: Ctrl+C"
        );
    }

    #[test]
    fn test_three_way_clash_reports_each_pair() {
        let (_dir, file) = open("Shortcuts:\n  pencil: X\n  line: X\n  arrow: X\n");
        assert_eq!(validate(&file).error_count(), 3);
    }

    #[test]
    fn test_empty_and_distinct_bindings_do_not_conflict() {
        let (_dir, file) =
            open("Shortcuts:\n  pin: ''\n  circle-count:\n  copy: Ctrl+C\n  save: Ctrl+S\n");
        assert_eq!(validate(&file).issue_count(), 0);
    }

    #[test]
    fn test_enter_and_return_are_the_same_key() {
        let (_dir, file) = open("Shortcuts:\n  accept: Return\n  exit: Enter\n");
        assert_eq!(validate(&file).error_count(), 1);
    }

    #[test]
    fn test_reserved_key_is_a_warning() {
        let (_dir, file) = open("Shortcuts:\n  exit: Escape\n");
        let result = validate(&file);
        assert!(result.is_valid());
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_bound_sequence() {
        let (_dir, file) =
            open("Shortcuts:\n  undo: ctrl+z\n  pin: ''\n  redo: 5\n  copy: [c]\n");
        assert_eq!(bound_sequence(&file, "undo").as_deref(), Some("Ctrl+Z"));
        assert_eq!(bound_sequence(&file, "pin"), None);
        assert_eq!(bound_sequence(&file, "redo").as_deref(), Some("5"));
        assert_eq!(bound_sequence(&file, "copy"), None);
        assert_eq!(bound_sequence(&file, "save"), None);
    }
}
