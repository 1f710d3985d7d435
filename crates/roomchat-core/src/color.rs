//! Sender colors.
//!
//! Colors travel as bare hex RGB triplets (`00ff00`, no leading `#`).
//! The three-digit shorthand (`0f0`) is accepted as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hex RGB triplet without leading marker.
///
/// Keeps the exact text it was parsed from, so a decoded color is handed
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Color used for the local user's own messages.
    pub fn local() -> Self {
        Self("0000ff".to_string())
    }

    /// Color used for the synthetic connection error notice.
    pub fn error() -> Self {
        Self("ff0000".to_string())
    }

    /// The triplet as delivered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components, with shorthand expanded.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let digits: Vec<u8> = self
            .0
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();
        match digits.as_slice() {
            [r, g, b] => (r * 17, g * 17, b * 17),
            [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2),
            // Unreachable for a parsed color.
            _ => (0, 0, 0),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !matches!(s.len(), 3 | 6) {
            return Err(ColorParseError::Length(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::NotHex(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Error parsing a color string.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must have 3 or 6 hex digits, got: {0:?}")]
    Length(String),
    #[error("color contains non-hex characters: {0:?}")]
    NotHex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_triplet() {
        let color: Color = "00ff00".parse().unwrap();
        assert_eq!(color.as_str(), "00ff00");
        assert_eq!(color.rgb(), (0, 255, 0));
    }

    #[test]
    fn parse_shorthand() {
        let color: Color = "F00".parse().unwrap();
        assert_eq!(color.as_str(), "F00");
        assert_eq!(color.rgb(), (255, 0, 0));
    }

    #[test]
    fn rejects_leading_marker() {
        assert!(matches!(
            "#00ff00".parse::<Color>(),
            Err(ColorParseError::Length(_))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            "00gg00".parse::<Color>(),
            Err(ColorParseError::NotHex(_))
        ));
    }

    #[test]
    fn serde_keeps_text() {
        let color: Color = serde_json::from_str("\"00A1b2\"").unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"00A1b2\"");
    }

    #[test]
    fn builtin_colors() {
        assert_eq!(Color::local().rgb(), (0, 0, 255));
        assert_eq!(Color::error().rgb(), (255, 0, 0));
    }
}
