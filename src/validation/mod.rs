//! Settings validation system.

pub mod report;
pub mod semantic;
pub mod shortcuts;
pub mod unrecognized;

use crate::config::loader::SettingsFile;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Puts the store in the error state.
    Error,
    /// Logged but does not affect the error state.
    Warning,
}

/// A validation issue found while checking the settings file.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Location of the problematic entry (e.g., "General.drawThickness").
    pub path: String,
    /// Description of the issue.
    pub message: String,
    /// Optional suggestion for fixing the issue.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new error-level validation issue.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Error,
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates a new warning-level validation issue.
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Warning,
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of validating the settings file.
#[derive(Debug, Default)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Creates an empty validation result.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the result.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Extends the result with issues from another result.
    pub fn extend(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }

    /// Returns true if there are no errors (warnings are allowed).
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns every issue in the order found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Returns an iterator over error-level issues.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns an iterator over warning-level issues.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }

    /// Returns the total number of issues.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Reports a settings file that could not be parsed.
pub fn check_document(settings: &SettingsFile) -> ValidationResult {
    let mut result = ValidationResult::new();
    if let Some(message) = settings.parse_error() {
        result.add(
            ValidationIssue::error("document", format!("Unreadable config file: {}", message))
                .with_suggestion("Fix the syntax or reset the configuration to defaults"),
        );
    }
    result
}

/// Runs every validation layer over the settings file.
pub fn validate_settings(settings: &SettingsFile) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.extend(check_document(settings));
    result.extend(unrecognized::validate(settings));
    result.extend(shortcuts::validate(settings));
    result.extend(semantic::validate(settings));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(text: &str) -> (TempDir, SettingsFile) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapmark.yaml");
        std::fs::write(&path, text).unwrap();
        let file = SettingsFile::open(&path).unwrap();
        (dir, file)
    }

    #[test]
    fn test_clean_file_is_valid() {
        let (_dir, file) = settings("General:\n  drawThickness: 4\nShortcuts:\n  undo: Ctrl+Z\n");
        let result = validate_settings(&file);
        assert!(result.is_valid());
        assert_eq!(result.issue_count(), 0);
    }

    #[test]
    fn test_unparsable_file_is_one_error() {
        let (_dir, file) = settings("General: [oops\n");
        let result = validate_settings(&file);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.issues()[0].path, "document");
    }

    #[test]
    fn test_layers_are_combined() {
        let (_dir, file) = settings(
            "General:\n  drawThickness: thick\n  colour: red\nShortcuts:\n  copy: Ctrl+C\n  save: ctrl+c\n",
        );
        let result = validate_settings(&file);
        let paths: Vec<_> = result.errors().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"General.colour"));
        assert!(paths.contains(&"General.drawThickness"));
        assert!(paths.iter().any(|p| p.starts_with("Shortcuts.")));
    }
}
