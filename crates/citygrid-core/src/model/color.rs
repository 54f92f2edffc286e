// ── Display colors ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An opaque `#RRGGBB` color.
///
/// Serialized as its hex string so datasets stay human-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build at compile time from a `0xRRGGBB` literal.
    #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// The color with a two-digit hex alpha suffix, e.g. `#3B82F6b2`.
    pub fn with_alpha(self, alpha: u8) -> String {
        format!("{self}{alpha:02x}")
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::ValidationFailed {
            message: format!("invalid color '{s}', expected #RRGGBB"),
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl TryFrom<String> for HexColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

/// Palette shared by the charts and the topology renderer.
pub mod palette {
    use super::HexColor;

    pub const BLUE: HexColor = HexColor::from_u32(0x3B_82_F6);
    pub const RED: HexColor = HexColor::from_u32(0xEF_44_44);
    pub const GREEN: HexColor = HexColor::from_u32(0x10_B9_81);
    pub const AMBER: HexColor = HexColor::from_u32(0xF5_9E_0B);
    pub const GRAY: HexColor = HexColor::from_u32(0x6B_72_80);
    pub const NEUTRAL: HexColor = HexColor::from_u32(0x99_99_99);
    pub const WHITE: HexColor = HexColor::from_u32(0xFF_FF_FF);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_uppercase() {
        let c: HexColor = "#3b82f6".parse().unwrap();
        assert_eq!(c, palette::BLUE);
        assert_eq!(c.to_string(), "#3B82F6");
    }

    #[test]
    fn alpha_suffix_is_two_lowercase_digits() {
        assert_eq!(palette::BLUE.with_alpha(10), "#3B82F60a");
        assert_eq!(palette::BLUE.with_alpha(82), "#3B82F652");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("3B82F6".parse::<HexColor>().is_err());
        assert!("#3B82F".parse::<HexColor>().is_err());
        assert!("#GG0000".parse::<HexColor>().is_err());
    }
}
