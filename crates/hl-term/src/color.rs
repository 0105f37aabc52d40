//! Color types and the highlight styling derived from them.
//!
//! Each term owns an opaque [`Color`]; annotations render with an
//! [`AnnotationStyle`] derived from it: the term color at a fixed alpha as
//! the background, and black or white text picked by perceived luminance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// Luminance value at or above which black text is used over a color.
pub const CONTRAST_THRESHOLD: u8 = 128;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rgb` or `#rrggbb` hex color.
    ///
    /// The leading `#` is optional. Three-digit colors expand each digit
    /// (`#fd4` is `#ffdd44`).
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let digits: Vec<char> = input.strip_prefix('#').unwrap_or(input).chars().collect();
        match digits.as_slice() {
            [r, g, b] => Ok(Self::new(
                hex_value(input, *r)? * 17,
                hex_value(input, *g)? * 17,
                hex_value(input, *b)? * 17,
            )),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(
                hex_value(input, *r1)? * 16 + hex_value(input, *r0)?,
                hex_value(input, *g1)? * 16 + hex_value(input, *g0)?,
                hex_value(input, *b1)? * 16 + hex_value(input, *b0)?,
            )),
            _ => Err(ColorError::InvalidFormat {
                input: input.to_string(),
            }),
        }
    }

    /// Perceived luminance on the YIQ scale (0-255).
    pub fn luminance(self) -> u8 {
        let weighted =
            299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        (weighted / 1000) as u8
    }

    /// Picks black or white text for use over this color.
    ///
    /// Colors at or above [`CONTRAST_THRESHOLD`] luminance get black text,
    /// darker colors get white.
    pub fn contrast_text(self) -> Self {
        if self.luminance() >= CONTRAST_THRESHOLD {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    /// Pairs this color with an alpha value.
    pub const fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba { color: self, alpha }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color with an alpha component, as used for highlight backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// The base color.
    pub color: Color,
    /// Alpha in `[0.0, 1.0]`.
    pub alpha: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            self.color.r, self.color.g, self.color.b, self.alpha
        )
    }
}

/// Display colors for one annotation.
///
/// Both values are derived from the owning term's color; neither is stored
/// on the term itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Background laid over the matched text: the term color at an alpha.
    pub background: Rgba,
    /// Foreground picked black or white for contrast with the term color.
    pub foreground: Color,
}

impl AnnotationStyle {
    /// Derives the annotation style for a term color.
    pub fn for_color(color: Color, alpha: f32) -> Self {
        Self {
            background: color.with_alpha(alpha),
            foreground: color.contrast_text(),
        }
    }
}

/// Fixed highlight palette, cycled by term creation order.
///
/// Mid-brightness hues chosen so adjacent terms stay visually distinct and
/// both black and white foregrounds occur.
pub const PALETTE: [Color; 8] = [
    Color::new(0xff, 0xd5, 0x4f), // amber
    Color::new(0x66, 0xbb, 0x6a), // green
    Color::new(0x4f, 0xc3, 0xf7), // sky
    Color::new(0xff, 0x8a, 0x65), // coral
    Color::new(0xba, 0x68, 0xc8), // violet
    Color::new(0x4d, 0xb6, 0xac), // teal
    Color::new(0xf0, 0x62, 0x92), // pink
    Color::new(0xdc, 0xe7, 0x75), // lime
];

/// Returns the palette color for the nth created term.
pub fn palette_color(sequence: usize) -> Color {
    PALETTE[sequence % PALETTE.len()]
}

/// Converts a hex digit to its value, reporting the full input on failure.
fn hex_value(input: &str, digit: char) -> Result<u8, ColorError> {
    digit
        .to_digit(16)
        .map(|value| value as u8)
        .ok_or_else(|| ColorError::InvalidDigit {
            input: input.to_string(),
            digit,
        })
}
