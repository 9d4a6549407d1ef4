//! Stroke and label colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0:?}")]
pub struct ColorParseError(pub String);

/// An 8-bit RGBA color.
///
/// Serialized as a CSS-style hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `rgb(r, g, b)`.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let err = || ColorParseError(input.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            // from_str_radix would also take a leading sign
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
            return match hex.len() {
                3 => {
                    let r = channel(&hex[0..1])? * 17;
                    let g = channel(&hex[1..2])? * 17;
                    let b = channel(&hex[2..3])? * 17;
                    Ok(Color::rgb(r, g, b))
                }
                6 => Ok(Color::rgb(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                8 => Ok(Color::rgba(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => Err(err()),
            };
        }

        if let Some(body) = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<u8> = body
                .split(',')
                .map(|part| {
                    let part = part.trim();
                    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(err());
                    }
                    part.parse::<u8>().map_err(|_| err())
                })
                .collect::<Result<_, _>>()?;
            if let [r, g, b] = parts[..] {
                return Ok(Color::rgb(r, g, b));
            }
        }

        Err(err())
    }

    /// Format as a lowercase hex string, omitting alpha when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#000000").unwrap(), Color::BLACK);
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#FF8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(
            Color::parse("#00000080").unwrap(),
            Color::rgba(0, 0, 0, 128)
        );
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(
            Color::parse("rgb(12, 34, 56)").unwrap(),
            Color::rgb(12, 34, 56)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("").is_err());
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("rgb(1, 2, 300)").is_err());
        assert!(Color::parse("blue").is_err());
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert!(Color::parse("#+f+f+f").is_err());
        assert!(Color::parse("#+ff").is_err());
        assert!(Color::parse("#-1-1-1").is_err());
        assert!(Color::parse("rgb(+1, 2, 3)").is_err());
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Color::BLACK.with_alpha(128).to_hex(), "#00000080");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
