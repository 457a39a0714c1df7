//! Checking, normalizing and decoding of stored option values.
//!
//! Every recognized key has an [`OptionKind`] describing what a valid stored
//! value looks like and what to use when the stored value is missing or bad.
//! Typed accessors convert between the normalized stored form and Rust types
//! through [`OptionValue`].

pub mod color;
pub mod filename;
pub mod keyseq;

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::config::model::{default_user_colors, ToolKind, UserColor, WindowMode};
use color::Color;

/// Image formats the capture encoder can write.
pub const SAVE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "ppm", "tif", "tiff", "webp", "xbm", "xpm",
];

/// Extension used when none is configured.
pub const DEFAULT_SAVE_EXTENSION: &str = "png";

/// Storage type, bounds and built-in default of a recognized key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool(bool),
    Int { min: i32, max: i32, default: i32 },
    Text(&'static str),
    Color(Color),
    ExistingDir,
    FilenamePattern,
    SaveFileExtension,
    ButtonList,
    UserColors,
    WindowMode,
    /// A shortcut binding with its built-in sequence.
    KeySequence(&'static str),
}

impl OptionKind {
    /// Integer with only a lower bound.
    pub const fn at_least(min: i32, default: i32) -> Self {
        OptionKind::Int {
            min,
            max: i32::MAX,
            default,
        }
    }

    /// Integer bounded on both sides.
    pub const fn between(min: i32, max: i32, default: i32) -> Self {
        OptionKind::Int { min, max, default }
    }

    /// Returns the canonical stored form of `value`, or `None` if it is invalid.
    pub fn normalize(&self, value: &Value) -> Option<Value> {
        match self {
            OptionKind::Bool(_) => as_bool(value).map(Value::Bool),
            OptionKind::Int { min, max, .. } => as_int(value)
                .filter(|n| (i64::from(*min)..=i64::from(*max)).contains(n))
                .map(|n| Value::Number(n.into())),
            OptionKind::Text(_) => as_text(value).map(|s| Value::String(s.into_owned())),
            OptionKind::Color(_) => as_text(value)
                .and_then(|s| s.parse::<Color>().ok())
                .map(|c| Value::String(c.to_string())),
            OptionKind::ExistingDir => as_text(value)
                .filter(|s| !s.is_empty() && Path::new(s.as_ref()).is_dir())
                .map(|s| Value::String(s.into_owned())),
            OptionKind::FilenamePattern => as_text(value)
                .filter(|s| filename::is_valid_pattern(s))
                .map(|s| Value::String(s.into_owned())),
            OptionKind::SaveFileExtension => as_text(value)
                .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|s| SAVE_EXTENSIONS.contains(&s.as_str()))
                .map(Value::String),
            OptionKind::ButtonList => {
                let tools = decode_buttons(value)?;
                Some(encode_buttons(&tools))
            }
            OptionKind::UserColors => {
                let colors = decode_user_colors(value)?;
                Some(encode_user_colors(&colors))
            }
            OptionKind::WindowMode => WindowMode::decode(value).map(|mode| mode.encode()),
            OptionKind::KeySequence(_) => as_text(value)
                .and_then(|s| keyseq::normalize(&s))
                .map(Value::String),
        }
    }

    /// Returns true if `value` is acceptable for this kind.
    pub fn check(&self, value: &Value) -> bool {
        self.normalize(value).is_some()
    }

    /// Built-in default in stored form.
    pub fn fallback(&self) -> Value {
        match self {
            OptionKind::Bool(default) => Value::Bool(*default),
            OptionKind::Int { default, .. } => Value::Number((*default).into()),
            OptionKind::Text(default) => Value::String(default.to_string()),
            OptionKind::Color(default) => Value::String(default.to_string()),
            OptionKind::ExistingDir => {
                Value::String(default_save_dir().to_string_lossy().into_owned())
            }
            OptionKind::FilenamePattern => Value::String(filename::DEFAULT_PATTERN.to_string()),
            OptionKind::SaveFileExtension => Value::String(DEFAULT_SAVE_EXTENSION.to_string()),
            OptionKind::ButtonList => encode_buttons(&ToolKind::ALL),
            OptionKind::UserColors => encode_user_colors(&default_user_colors()),
            OptionKind::WindowMode => WindowMode::default().encode(),
            OptionKind::KeySequence(default) => Value::String(default.to_string()),
        }
    }

    /// Normalized stored value, or the fallback when missing or invalid.
    pub fn value(&self, raw: Option<&Value>) -> Value {
        let normalized = raw.and_then(|v| self.normalize(v));
        match (self, normalized) {
            // An empty template means "use the built-in one".
            (OptionKind::FilenamePattern, Some(Value::String(s))) if s.is_empty() => {
                self.fallback()
            }
            (_, Some(v)) => v,
            (_, None) => self.fallback(),
        }
    }

    /// Human-readable description of a valid value.
    pub fn expected(&self) -> String {
        match self {
            OptionKind::Bool(_) => "true or false".to_string(),
            OptionKind::Int { min, max, .. } if *max == i32::MAX => {
                format!("an integer of at least {}", min)
            }
            OptionKind::Int { min, max, .. } => format!("an integer between {} and {}", min, max),
            OptionKind::Text(_) => "a string".to_string(),
            OptionKind::Color(_) => "a color such as '#ff0000' or 'red'".to_string(),
            OptionKind::ExistingDir => "the path of an existing directory".to_string(),
            OptionKind::FilenamePattern => "a strftime pattern such as '%F_%H-%M'".to_string(),
            OptionKind::SaveFileExtension => format!("one of: {}", SAVE_EXTENSIONS.join(", ")),
            OptionKind::ButtonList => format!(
                "a list of tool names ({})",
                ToolKind::ALL.map(|t| t.name()).join(", ")
            ),
            OptionKind::UserColors => "a non-empty list of colors or 'picker'".to_string(),
            OptionKind::WindowMode => "'full-screen-all' or 'full-screen-current'".to_string(),
            OptionKind::KeySequence(_) => {
                "a key sequence such as 'Ctrl+Shift+Z', or empty to unbind".to_string()
            }
        }
    }
}

/// Directory screenshots go to when `savePath` is unset.
///
/// Falls back to the home directory when the platform pictures directory
/// does not exist.
pub fn default_save_dir() -> PathBuf {
    dirs::picture_dir()
        .filter(|dir| dir.is_dir())
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text form of a scalar. Numbers and booleans read as the text a user
/// typed; null reads as empty.
pub(crate) fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null => Some(Cow::Borrowed("")),
        _ => None,
    }
}

/// Reads a stored value through the type's serde representation.
fn from_stored<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_yaml::from_value(value.clone()).ok()
}

/// Stored form of a value through its serde representation.
fn to_stored<T: Serialize>(value: &T) -> Value {
    serde_yaml::to_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not encode option value");
        Value::Null
    })
}

fn decode_buttons(value: &Value) -> Option<BTreeSet<ToolKind>> {
    match value {
        Value::Null => Some(BTreeSet::new()),
        Value::Sequence(items) => items.iter().map(from_stored::<ToolKind>).collect(),
        _ => None,
    }
}

fn encode_buttons<'a>(tools: impl IntoIterator<Item = &'a ToolKind>) -> Value {
    Value::Sequence(tools.into_iter().map(to_stored).collect())
}

fn decode_user_colors(value: &Value) -> Option<Vec<UserColor>> {
    let Value::Sequence(items) = value else {
        return None;
    };
    if items.is_empty() {
        return None;
    }
    items.iter().map(from_stored::<UserColor>).collect()
}

fn encode_user_colors(colors: &[UserColor]) -> Value {
    Value::Sequence(colors.iter().map(to_stored).collect())
}

/// Conversion between a normalized stored value and a typed option value.
pub trait OptionValue: Sized {
    fn decode(value: &Value) -> Option<Self>;
    fn encode(&self) -> Value;
}

impl OptionValue for bool {
    fn decode(value: &Value) -> Option<Self> {
        as_bool(value)
    }

    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

impl OptionValue for i32 {
    fn decode(value: &Value) -> Option<Self> {
        as_int(value).and_then(|n| i32::try_from(n).ok())
    }

    fn encode(&self) -> Value {
        Value::Number((*self).into())
    }
}

impl OptionValue for String {
    fn decode(value: &Value) -> Option<Self> {
        as_text(value).map(Cow::into_owned)
    }

    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl OptionValue for PathBuf {
    fn decode(value: &Value) -> Option<Self> {
        as_text(value).map(|s| PathBuf::from(s.as_ref()))
    }

    fn encode(&self) -> Value {
        Value::String(self.to_string_lossy().into_owned())
    }
}

impl OptionValue for Color {
    fn decode(value: &Value) -> Option<Self> {
        as_text(value).and_then(|s| s.parse().ok())
    }

    fn encode(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl OptionValue for WindowMode {
    fn decode(value: &Value) -> Option<Self> {
        from_stored(value)
    }

    fn encode(&self) -> Value {
        to_stored(self)
    }
}

impl OptionValue for Vec<ToolKind> {
    fn decode(value: &Value) -> Option<Self> {
        decode_buttons(value).map(|tools| tools.into_iter().collect())
    }

    fn encode(&self) -> Value {
        encode_buttons(self)
    }
}

impl OptionValue for Vec<UserColor> {
    fn decode(value: &Value) -> Option<Self> {
        decode_user_colors(value)
    }

    fn encode(&self) -> Value {
        encode_user_colors(self)
    }
}
