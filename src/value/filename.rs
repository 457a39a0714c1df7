//! Screenshot filename templates (strftime syntax).

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};

/// Template used when the user has not configured one.
pub const DEFAULT_PATTERN: &str = "%F_%H-%M";

/// Returns true if every `%` directive in the pattern is understood.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Expands `pattern` for the given time.
///
/// An empty pattern means [`DEFAULT_PATTERN`]. Path separators produced by
/// the expansion are replaced so the result is a single file name.
pub fn render_filename<Tz>(pattern: &str, time: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let pattern = if pattern.is_empty() { DEFAULT_PATTERN } else { pattern };
    if !is_valid_pattern(pattern) {
        return None;
    }

    let mut rendered = String::new();
    write!(rendered, "{}", time.format_with_items(StrftimeItems::new(pattern))).ok()?;
    Some(rendered.replace(['/', '\\'], "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 5, 0).unwrap()
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(render_filename("", &noon()).as_deref(), Some("2024-03-09_12-05"));
    }

    #[test]
    fn test_separators_are_replaced() {
        assert_eq!(render_filename("shot %D", &noon()).as_deref(), Some("shot 03_09_24"));
    }

    #[test]
    fn test_invalid_directive() {
        assert!(!is_valid_pattern("shot_%"));
        assert!(render_filename("shot_%", &noon()).is_none());
        assert!(is_valid_pattern("plain-name"));
    }
}
