//! Validation report formatting.

use super::{ValidationIssue, ValidationResult, ValidationSeverity};

/// Formats a validation result into a human-readable report.
pub fn format_report(result: &ValidationResult) -> String {
    let errors: Vec<_> = result.errors().collect();
    let warnings: Vec<_> = result.warnings().collect();

    if errors.is_empty() && warnings.is_empty() {
        return "Configuration is valid.".to_string();
    }

    let mut report = String::new();

    if !errors.is_empty() {
        report.push_str("\nConfig Validation Failed\n");
        report.push_str("========================\n\n");
    }

    // Format errors first
    for issue in &errors {
        report.push_str(&format_issue(issue));
        report.push('\n');
    }

    // Then warnings
    if !warnings.is_empty() {
        if !errors.is_empty() {
            report.push_str("\nWarnings:\n");
            report.push_str("---------\n\n");
        }
        for issue in &warnings {
            report.push_str(&format_issue(issue));
            report.push('\n');
        }
    }

    report.push_str("---\n");
    report.push_str(&format!(
        "{} warning(s), {} error(s)\n",
        warnings.len(),
        errors.len()
    ));

    if !errors.is_empty() {
        report.push_str(
            "Writes are suspended and defaults are in effect until the errors are fixed.\n",
        );
    }

    report
}

/// Formats a single validation issue.
pub fn format_issue(issue: &ValidationIssue) -> String {
    let prefix = match issue.severity {
        ValidationSeverity::Error => "ERROR",
        ValidationSeverity::Warning => "WARNING",
    };

    let mut output = format!("{} {}\n", prefix, issue.path);
    output.push_str(&format!("  └─ {}\n", issue.message));

    if let Some(suggestion) = &issue.suggestion {
        output.push_str(&format!("     {}\n", suggestion));
    }

    output
}

/// Formats a brief summary, used as the store's error message.
pub fn format_brief_summary(result: &ValidationResult) -> String {
    let error_count = result.error_count();
    let warning_count = result.warnings().count();

    if error_count == 0 && warning_count == 0 {
        "Configuration valid".to_string()
    } else if error_count == 0 {
        format!("Configuration valid with {} warning(s)", warning_count)
    } else {
        let first = result
            .errors()
            .next()
            .map(|issue| format!(": {}", issue.message))
            .unwrap_or_default();
        format!(
            "Configuration invalid: {} error(s), {} warning(s){}",
            error_count, warning_count, first
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert_eq!(format_report(&result), "Configuration is valid.");
        assert_eq!(format_brief_summary(&result), "Configuration valid");
    }

    #[test]
    fn test_report_lists_errors_before_warnings() {
        let mut result = ValidationResult::new();
        result.add(ValidationIssue::warning("Shortcuts.exit", "reserved"));
        result.add(
            ValidationIssue::error("General.colour", "Unrecognized setting: 'colour'")
                .with_suggestion("Did you mean 'uiColor'?"),
        );

        let report = format_report(&result);
        let error_at = report.find("ERROR General.colour").unwrap();
        let warning_at = report.find("WARNING Shortcuts.exit").unwrap();
        assert!(error_at < warning_at);
        assert!(report.contains("Did you mean 'uiColor'?"));
        assert!(report.contains("1 warning(s), 1 error(s)"));
    }

    #[test]
    fn test_brief_summary_names_first_error() {
        let mut result = ValidationResult::new();
        result.add(ValidationIssue::error("General.x", "Unrecognized setting: 'x'"));
        assert_eq!(
            format_brief_summary(&result),
            "Configuration invalid: 1 error(s), 0 warning(s): Unrecognized setting: 'x'"
        );
    }
}
