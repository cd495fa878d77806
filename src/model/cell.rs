//! Rasterized formula output types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A formula rasterized to a PNG bitmap.
///
/// The bitmap keeps its pixel dimensions so the composer can derive a
/// display size by fixed-height scaling without decoding the image again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFormula {
    /// Encoded PNG bytes.
    pub png: Vec<u8>,

    /// Bitmap width in pixels.
    pub width_px: u32,

    /// Bitmap height in pixels.
    pub height_px: u32,
}

impl RenderedFormula {
    /// Width-to-height ratio of the bitmap.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height_px == 0 {
            1.0
        } else {
            f64::from(self.width_px) / f64::from(self.height_px)
        }
    }

    /// Display size in layout units for a fixed target height,
    /// preserving aspect ratio.
    pub fn display_size(&self, target_height: f64) -> (f64, f64) {
        (target_height * self.aspect_ratio(), target_height)
    }
}

/// Color identifier accepted at the rasterizer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextColor {
    /// Black text, the document default.
    Black,
    /// White text, used on dark backgrounds.
    White,
    /// Arbitrary RGB color.
    Rgb(u8, u8, u8),
}

impl TextColor {
    /// Parse a color name (`black`, `white`) or a `#rrggbb` hex value.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(TextColor::Black),
            "white" => return Ok(TextColor::White),
            _ => {}
        }
        let hex = trimmed
            .strip_prefix('#')
            .filter(|rest| rest.len() == 6 && rest.is_ascii())
            .ok_or_else(|| Error::InvalidColor(input.to_string()))?;
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| Error::InvalidColor(input.to_string()))
        };
        Ok(TextColor::Rgb(
            component(0..2)?,
            component(2..4)?,
            component(4..6)?,
        ))
    }

    /// The color as a Typst color expression.
    pub fn to_typst(self) -> String {
        match self {
            TextColor::Black => "black".to_string(),
            TextColor::White => "white".to_string(),
            TextColor::Rgb(r, g, b) => format!("rgb(\"#{r:02x}{g:02x}{b:02x}\")"),
        }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        TextColor::Black
    }
}

impl std::fmt::Display for TextColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextColor::Black => write!(f, "black"),
            TextColor::White => write!(f, "white"),
            TextColor::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl TryFrom<String> for TextColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        TextColor::parse(&value)
    }
}

impl From<TextColor> for String {
    fn from(color: TextColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_size_scales_by_height() {
        let formula = RenderedFormula {
            png: Vec::new(),
            width_px: 200,
            height_px: 50,
        };
        let (width, height) = formula.display_size(40.0);
        assert_eq!(height, 40.0);
        assert_eq!(width, 160.0);
    }

    #[test]
    fn test_zero_height_bitmap_keeps_square_aspect() {
        let formula = RenderedFormula {
            png: Vec::new(),
            width_px: 10,
            height_px: 0,
        };
        assert_eq!(formula.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_color_parse_names() {
        assert_eq!(TextColor::parse("black").unwrap(), TextColor::Black);
        assert_eq!(TextColor::parse(" White ").unwrap(), TextColor::White);
    }

    #[test]
    fn test_color_parse_hex() {
        assert_eq!(
            TextColor::parse("#1a2B3c").unwrap(),
            TextColor::Rgb(0x1a, 0x2b, 0x3c)
        );
        assert!(TextColor::parse("#12345").is_err());
        assert!(TextColor::parse("blurple").is_err());
    }

    #[test]
    fn test_color_parse_rejects_non_ascii_hex() {
        // Six bytes, but not six hex digits.
        assert!(TextColor::parse("#€€").is_err());
        assert!(TextColor::parse("#áéí").is_err());
    }

    #[test]
    fn test_color_to_typst() {
        assert_eq!(TextColor::Black.to_typst(), "black");
        assert_eq!(TextColor::Rgb(255, 0, 16).to_typst(), "rgb(\"#ff0010\")");
    }
}
