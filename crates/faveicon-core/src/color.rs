//! Fill and tint colors.
//!
//! Colors travel through configuration as hex strings and through the host
//! interface as plain RGBA bytes, so the core never depends on a rendering
//! crate's color type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const GRAY: Rgba = Rgba::rgb(0x80, 0x80, 0x80);
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Parse a hex color string.
    /// Accepts formats: "#RGB", "RGB", "#RRGGBB", "RRGGBB", "#RRGGBBAA", "RRGGBBAA"
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            // Short form: RGB -> RRGGBB
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::GRAY
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse_hex(s).ok_or_else(|| crate::Error::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Rgba {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse_hex("808080"), Some(Rgba::GRAY));
        assert_eq!(
            Rgba::parse_hex("#e2264d"),
            Some(Rgba::rgb(0xe2, 0x26, 0x4d))
        );
        assert_eq!(
            Rgba::parse_hex("#00000080"),
            Some(Rgba::new(0, 0, 0, 0x80))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgba::parse_hex(""), None);
        assert_eq!(Rgba::parse_hex("#12345"), None);
        assert_eq!(Rgba::parse_hex("#gggggg"), None);
        assert_eq!(Rgba::parse_hex("★★★"), None);
        assert!("nope".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for color in [Rgba::GRAY, Rgba::rgb(1, 2, 3), Rgba::new(9, 8, 7, 6)] {
            assert_eq!(color.to_string().parse::<Rgba>().unwrap(), color);
        }
        assert_eq!(Rgba::rgb(0xe2, 0x26, 0x4d).to_string(), "#e2264d");
    }
}
