//! 24-bit RGB color handling for style settings.
//!
//! Colors travel through the API and the database as `#rrggbb` hex
//! strings and through the renderer as inline CSS values. [`Rgb`] is the
//! single in-memory representation for all of them.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 24-bit RGB color.
///
/// Serializes to and from the `#rrggbb` hex form used by the editor UI
/// and stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error produced when parsing a hex color string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid hex color '{0}'. Expected #rrggbb")]
pub struct ColorParseError(pub String);

impl Rgb {
    /// Construct a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#rrggbb` (lowercase).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as a CSS `rgba()` value with the given alpha in `0.0..=1.0`.
    ///
    /// Used by the document builder for decorative elements, whose
    /// opacity is tracked separately from the color itself.
    pub fn to_rgba(self, alpha: f64) -> String {
        let alpha = alpha.clamp(0.0, 1.0);
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }
        // Length/charset checked above, so these cannot fail.
        let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ColorParseError(s.to_string()))?;
        let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ColorParseError(s.to_string()))?;
        let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ColorParseError(s.to_string()))?;
        Ok(Self { r, g, b })
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct RgbVisitor;

impl Visitor<'_> for RgbVisitor {
    type Value = Rgb;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a hex color string like #1a2b3c")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Rgb, E> {
        value.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(RgbVisitor)
    }
}
