//! Keyboard shortcut parsing and normalization.
//!
//! A key sequence is zero or more modifiers followed by exactly one key,
//! joined with `+` (e.g. `Ctrl+Shift+Z`). The empty string means "unbound".

/// Keys that can never be rebound to an action.
pub const RESERVED: &[&str] = &["Escape", "Backspace"];

/// Modifiers in their canonical output order.
const MODIFIERS: [&str; 4] = ["Ctrl", "Alt", "Shift", "Meta"];

const NAMED_KEYS: &[(&str, &str)] = &[
    ("return", "Return"),
    ("enter", "Return"),
    ("esc", "Escape"),
    ("escape", "Escape"),
    ("tab", "Tab"),
    ("backspace", "Backspace"),
    ("del", "Delete"),
    ("delete", "Delete"),
    ("ins", "Insert"),
    ("insert", "Insert"),
    ("home", "Home"),
    ("end", "End"),
    ("pgup", "PgUp"),
    ("pageup", "PgUp"),
    ("pgdown", "PgDown"),
    ("pagedown", "PgDown"),
    ("left", "Left"),
    ("right", "Right"),
    ("up", "Up"),
    ("down", "Down"),
    ("space", "Space"),
    ("print", "Print"),
];

fn modifier(token: &str) -> Option<usize> {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(0),
        "alt" | "option" => Some(1),
        "shift" => Some(2),
        "meta" | "super" | "win" | "cmd" => Some(3),
        _ => None,
    }
}

fn key(token: &str) -> Option<String> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c.is_ascii_graphic().then(|| c.to_ascii_uppercase().to_string());
    }

    let lower = token.to_ascii_lowercase();
    if let Some((_, name)) = NAMED_KEYS.iter().find(|(alias, _)| *alias == lower) {
        return Some((*name).to_string());
    }

    // Function keys F1..F35
    lower
        .strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=35).contains(n))
        .map(|n| format!("F{}", n))
}

/// Normalizes a key sequence to its canonical spelling.
///
/// Returns `None` if the text is not a valid key sequence. Whitespace-only
/// input normalizes to the empty (unbound) sequence.
pub fn normalize(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return Some(String::new());
    }

    // A trailing "++" binds the plus key itself.
    let (head, last) = match text.strip_suffix("++") {
        Some(head) => (head, "+"),
        None if text == "+" => ("", "+"),
        None => match text.rsplit_once('+') {
            Some((head, last)) => (head, last),
            None => ("", text),
        },
    };

    let mut held = [false; 4];
    if !head.is_empty() {
        for token in head.split('+') {
            held[modifier(token.trim())?] = true;
        }
    }

    let key = key(last.trim())?;
    let mut parts: Vec<String> = MODIFIERS
        .iter()
        .zip(held)
        .filter(|(_, on)| *on)
        .map(|(name, _)| name.to_string())
        .collect();
    parts.push(key);
    Some(parts.join("+"))
}

/// Returns true if the (normalized) sequence is reserved.
pub fn is_reserved(sequence: &str) -> bool {
    RESERVED.contains(&sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_orders_modifiers() {
        assert_eq!(normalize("shift+ctrl+z").as_deref(), Some("Ctrl+Shift+Z"));
        assert_eq!(normalize("Control + Alt + Delete").as_deref(), Some("Ctrl+Alt+Delete"));
    }

    #[test]
    fn test_enter_and_return_are_the_same_key() {
        assert_eq!(normalize("Enter"), normalize("Return"));
        assert_eq!(normalize("ctrl+enter").as_deref(), Some("Ctrl+Return"));
    }

    #[test]
    fn test_empty_is_unbound() {
        assert_eq!(normalize("").as_deref(), Some(""));
        assert_eq!(normalize("   ").as_deref(), Some(""));
    }

    #[test]
    fn test_function_and_plus_keys() {
        assert_eq!(normalize("f12").as_deref(), Some("F12"));
        assert_eq!(normalize("Ctrl++").as_deref(), Some("Ctrl++"));
        assert_eq!(normalize("f36"), None);
    }

    #[test]
    fn test_rejects_malformed_sequences() {
        assert_eq!(normalize("Ctrl+"), None);
        assert_eq!(normalize("Ctrl+A+B"), None);
        assert_eq!(normalize("Hyper+A"), None);
        assert_eq!(normalize("banana"), None);
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved("Escape"));
        assert!(!is_reserved("Ctrl+Escape"));
    }
}
