//! Semantic types stored in the settings file.

use serde::{Deserialize, Serialize};

use crate::value::color::{Color, ParseColorError};

/// Namespace partition of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    General,
    Shortcuts,
}

impl Group {
    /// Top-level section name in the settings file.
    pub fn name(&self) -> &'static str {
        match self {
            Group::General => "General",
            Group::Shortcuts => "Shortcuts",
        }
    }
}

/// A capture tool that can appear as a button in the annotation toolbar.
///
/// Declaration order is the canonical toolbar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Pencil,
    Line,
    Arrow,
    Selection,
    Rectangle,
    Circle,
    Marker,
    Text,
    CircleCount,
    Pixelate,
    Invert,
    SelectionIndicator,
    MoveSelection,
    Undo,
    Redo,
    Copy,
    Save,
    Pin,
    ImageUploader,
    OpenApp,
    SizeIncrease,
    SizeDecrease,
    Accept,
    Exit,
}

impl ToolKind {
    /// Every tool kind, in canonical toolbar order.
    pub const ALL: [ToolKind; 24] = [
        ToolKind::Pencil,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Selection,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Marker,
        ToolKind::Text,
        ToolKind::CircleCount,
        ToolKind::Pixelate,
        ToolKind::Invert,
        ToolKind::SelectionIndicator,
        ToolKind::MoveSelection,
        ToolKind::Undo,
        ToolKind::Redo,
        ToolKind::Copy,
        ToolKind::Save,
        ToolKind::Pin,
        ToolKind::ImageUploader,
        ToolKind::OpenApp,
        ToolKind::SizeIncrease,
        ToolKind::SizeDecrease,
        ToolKind::Accept,
        ToolKind::Exit,
    ];

    /// Name as written in the settings file.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "pencil",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Selection => "selection",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Marker => "marker",
            ToolKind::Text => "text",
            ToolKind::CircleCount => "circle-count",
            ToolKind::Pixelate => "pixelate",
            ToolKind::Invert => "invert",
            ToolKind::SelectionIndicator => "selection-indicator",
            ToolKind::MoveSelection => "move-selection",
            ToolKind::Undo => "undo",
            ToolKind::Redo => "redo",
            ToolKind::Copy => "copy",
            ToolKind::Save => "save",
            ToolKind::Pin => "pin",
            ToolKind::ImageUploader => "image-uploader",
            ToolKind::OpenApp => "open-app",
            ToolKind::SizeIncrease => "size-increase",
            ToolKind::SizeDecrease => "size-decrease",
            ToolKind::Accept => "accept",
            ToolKind::Exit => "exit",
        }
    }
}

/// Which screen area a new capture starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    /// Span every connected screen.
    #[default]
    FullScreenAll,
    /// Only the screen under the cursor.
    FullScreenCurrent,
}

/// Entry of the user color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UserColor {
    /// Slot that opens the color picker instead of selecting a color.
    Picker,
    Color(Color),
}

const PICKER: &str = "picker";

impl TryFrom<String> for UserColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(PICKER) {
            Ok(UserColor::Picker)
        } else {
            value.parse().map(UserColor::Color)
        }
    }
}

impl From<UserColor> for String {
    fn from(value: UserColor) -> Self {
        match value {
            UserColor::Picker => PICKER.to_string(),
            UserColor::Color(color) => color.to_string(),
        }
    }
}

/// Built-in palette offered before the user customizes it.
pub fn default_user_colors() -> Vec<UserColor> {
    let mut colors = vec![UserColor::Picker];
    colors.extend(
        [
            Color::rgb(128, 0, 0),
            Color::rgb(255, 0, 0),
            Color::rgb(255, 255, 0),
            Color::rgb(0, 255, 0),
            Color::rgb(0, 128, 0),
            Color::rgb(0, 255, 255),
            Color::rgb(0, 0, 255),
            Color::rgb(255, 0, 255),
            Color::rgb(128, 0, 128),
        ]
        .into_iter()
        .map(UserColor::Color),
    );
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_serde_matches_name() {
        for tool in ToolKind::ALL {
            let value = serde_yaml::to_value(tool).unwrap();
            assert_eq!(value.as_str(), Some(tool.name()));
            assert_eq!(serde_yaml::from_value::<ToolKind>(value).unwrap(), tool);
        }
        assert!(serde_yaml::from_str::<ToolKind>("lasso").is_err());
    }

    #[test]
    fn test_window_mode_names() {
        let value = serde_yaml::to_value(WindowMode::FullScreenCurrent).unwrap();
        assert_eq!(value.as_str(), Some("full-screen-current"));
    }

    #[test]
    fn test_all_tools_in_canonical_order() {
        let mut sorted = ToolKind::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, ToolKind::ALL.to_vec());
    }

    #[test]
    fn test_user_color_picker_is_case_insensitive() {
        assert_eq!(UserColor::try_from("Picker".to_string()).unwrap(), UserColor::Picker);
        assert!(UserColor::try_from("not-a-color".to_string()).is_err());
        let value = serde_yaml::to_value(UserColor::Color(Color::rgb(255, 0, 0))).unwrap();
        assert_eq!(value.as_str(), Some("#ff0000"));
    }

    #[test]
    fn test_default_palette_starts_with_picker() {
        let colors = default_user_colors();
        assert_eq!(colors[0], UserColor::Picker);
        assert_eq!(colors.len(), 10);
    }
}
