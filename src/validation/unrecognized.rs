//! Detection of keys outside the recognized sets.

use crate::config::loader::SettingsFile;
use crate::config::model::Group;
use crate::config::registry::{
    self, general_option, recognized_general_options, recognized_shortcut_names, shortcut_default,
};

use super::{ValidationIssue, ValidationResult};

/// Largest edit distance at which a recognized key is offered as a correction.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Reports every key that is not recognized in its group, and every
/// top-level entry that is not a group.
pub fn validate(settings: &SettingsFile) -> ValidationResult {
    let mut result = ValidationResult::new();

    for key in settings.keys(Group::General) {
        if general_option(&key).is_some() {
            continue;
        }
        let mut issue = ValidationIssue::error(
            format!("General.{}", key),
            format!("Unrecognized setting: '{}'", key),
        );
        if shortcut_default(&key).is_some() {
            issue = issue
                .with_suggestion(format!("'{}' is a shortcut; move it under 'Shortcuts'", key));
        } else if let Some(close) = closest(&key, recognized_general_options()) {
            issue = issue.with_suggestion(format!("Did you mean '{}'?", close));
        }
        result.add(issue);
    }

    for name in settings.keys(Group::Shortcuts) {
        if shortcut_default(&name).is_some() {
            continue;
        }
        let mut issue = ValidationIssue::error(
            format!("Shortcuts.{}", name),
            format!("Unrecognized shortcut name: '{}'", name),
        );
        if general_option(&name).is_some() {
            issue = issue.with_suggestion(format!(
                "'{}' is a general option; move it under 'General'",
                name
            ));
        } else if let Some(close) = closest(&name, recognized_shortcut_names()) {
            issue = issue.with_suggestion(format!("Did you mean '{}'?", close));
        }
        result.add(issue);
    }

    for key in settings.unknown_groups() {
        let mut issue =
            ValidationIssue::error(key.clone(), format!("Unrecognized setting: '{}'", key));
        if general_option(&key).is_some() {
            issue = issue.with_suggestion("Move it under 'General'");
        } else if shortcut_default(&key).is_some() {
            issue = issue.with_suggestion("Move it under 'Shortcuts'");
        }
        result.add(issue);
    }

    result
}

/// Closest recognized raw key to `key`, for error messages.
pub fn closest_key(key: &str) -> Option<String> {
    match registry::split_key(key) {
        (Group::Shortcuts, name) => {
            closest(name, recognized_shortcut_names()).map(registry::shortcut_key)
        }
        (Group::General, key) => closest(key, recognized_general_options()).map(str::to_string),
    }
}

/// Finds the most similar candidate using Levenshtein distance.
fn closest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let lower = input.to_lowercase();
    candidates
        .map(|candidate| (strsim::levenshtein(&lower, &candidate.to_lowercase()), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}
