//! Color value types.
//!
//! Canvas variants store channels in the 0-255 range, GPU variants in 0-1.
//! The types do not enforce either; the owner decides the scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Channel triple without alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Rgb {
    /// All channels zero.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (or `RRGGBB`) into 0-255 channels.
    pub fn from_hex(hex: &str) -> ConfigResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ConfigError::InvalidColor(hex.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(f32::from)
                .map_err(|_| ConfigError::InvalidColor(hex.to_owned()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Multiplies each channel independently.
    #[must_use]
    pub fn scaled(self, r: f32, g: f32, b: f32) -> Self {
        Self::new(self.r * r, self.g * g, self.b * b)
    }

    /// Attaches an alpha value, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Converts to a flat array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Channel triple with alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0-255)
    pub r: f32,
    /// Green channel (0-255)
    pub g: f32,
    /// Blue channel (0-255)
    pub b: f32,
    /// Opacity (0-1)
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Creates a new color. Alpha is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgb::new(r, g, b).with_alpha(a)
    }

    /// Formats as a CSS `rgba(...)` string for browser-backed canvases.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r.round(),
            self.g.round(),
            self.b.round(),
            self.a
        )
    }
}
