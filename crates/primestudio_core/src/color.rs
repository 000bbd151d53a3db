//! RGBA colors parsed from theme hex strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha as a `0.0..=1.0` fraction.
    pub fn alpha(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Parse `RRGGBB` or `AARRGGBB` hex, with or without a leading `#`.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Returns
    /// `None` for any other length or a non-hex digit.
    pub fn from_hex(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
            _ => None,
        }
    }

    /// Render as `#RRGGBB` when opaque, otherwise `#AARRGGBB`.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{}'", raw)))
    }
}
