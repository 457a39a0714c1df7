//! Semantic validation for stored values.

use crate::config::loader::SettingsFile;
use crate::config::model::Group;
use crate::config::registry::{general_option, shortcut_default};
use crate::value::OptionKind;

use super::{ValidationIssue, ValidationResult};

/// Checks that every recognized entry decodes into its declared type.
///
/// Unrecognized entries are skipped; they are reported by the unrecognized
/// key layer.
pub fn validate(settings: &SettingsFile) -> ValidationResult {
    let mut result = ValidationResult::new();

    for key in settings.keys(Group::General) {
        if let Some(spec) = general_option(&key) {
            check_entry(settings, Group::General, &key, &spec.kind, &mut result);
        }
    }

    for name in settings.keys(Group::Shortcuts) {
        if let Some(default) = shortcut_default(&name) {
            check_entry(
                settings,
                Group::Shortcuts,
                &name,
                &OptionKind::KeySequence(default),
                &mut result,
            );
        }
    }

    result
}

fn check_entry(
    settings: &SettingsFile,
    group: Group,
    key: &str,
    kind: &OptionKind,
    result: &mut ValidationResult,
) {
    let Some(value) = settings.get(group, key) else {
        return;
    };
    if kind.check(value) {
        return;
    }
    result.add(
        ValidationIssue::error(
            format!("{}.{}", group.name(), key),
            format!("Bad value in '{}'. Expected: {}", key, kind.expected()),
        )
        .with_suggestion(format!("Found {}", describe(value))),
    );
}

/// Short rendering of a stored value for reports.
fn describe(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => format!("'{}'", s),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', " "))
            .unwrap_or_else(|_| "an unsupported value".to_string()),
    }
}
