//! Color values: `#rgb`, `#rrggbb`, `#aarrggbb` or a small set of names.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}'")]
pub struct ParseColorError(pub String);

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("darkred", Color::rgb(128, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("darkgreen", Color::rgb(0, 100, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("darkblue", Color::rgb(0, 0, 139)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("darkcyan", Color::rgb(0, 139, 139)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("darkmagenta", Color::rgb(139, 0, 139)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || ParseColorError(s.to_string());

        let Some(digits) = text.strip_prefix('#') else {
            let lower = text.to_ascii_lowercase();
            return NAMED_COLORS
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, color)| *color)
                .ok_or_else(err);
        };

        // Short form doubles every nibble: #f80 == #ff8800
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        let bytes = hex::decode(&expanded).map_err(|_| err())?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            [a, r, g, b] => Ok(Color::rgba(*r, *g, *b, *a)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
        } else {
            write!(f, "#{}", hex::encode([self.a, self.r, self.g, self.b]))
        }
    }
}
