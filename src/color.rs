//! Hex color parsing plus the two color operations the compiler relies on:
//! per-channel shifting and luminance-based text color selection.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::ColorError;

/// Text color picked for light backgrounds.
pub const NEAR_BLACK: &str = "#1a1a1a";
/// Text color picked for dark backgrounds.
pub const NEAR_WHITE: &str = "#f5f5f5";
/// Luminance above which a background counts as light.
const LUMINANCE_THRESHOLD: f64 = 128.0;

/// A 24-bit color parsed from `RRGGBB` or `#RRGGBB`.
///
/// The leading `#` is remembered so shifted colors keep the caller's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    hash_prefix: bool,
}

impl HexColor {
    /// Build a `#`-prefixed color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            hash_prefix: true,
        }
    }

    /// Add `amount` to every channel, clamping to `[0, 255]`.
    pub fn adjust(self, amount: i32) -> Self {
        let shift = |channel: u8| (i32::from(channel).saturating_add(amount)).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            hash_prefix: self.hash_prefix,
        }
    }

    /// Perceived brightness on the 0-255 scale.
    pub fn luminance(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// Readable text color for this background.
    pub fn text_color(self) -> &'static str {
        if self.luminance() > LUMINANCE_THRESHOLD {
            NEAR_BLACK
        } else {
            NEAR_WHITE
        }
    }

    /// Same channels, rendered with a leading `#` (the only form CSS accepts).
    pub fn with_hash(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    pub fn has_hash_prefix(self) -> bool {
        self.hash_prefix
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (digits, hash_prefix) = match trimmed.strip_prefix('#') {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(input.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(input.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::InvalidDigit(input.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
            hash_prefix,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hash_prefix {
            f.write_str("#")?;
        }
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Shift a hex color string by `amount` per channel.
pub fn adjust(hex: &str, amount: i32) -> Result<String, ColorError> {
    Ok(hex.parse::<HexColor>()?.adjust(amount).to_string())
}

/// Pick near-black or near-white text for a hex background.
pub fn text_color_for(hex: &str) -> Result<&'static str, ColorError> {
    Ok(hex.parse::<HexColor>()?.text_color())
}

/// Uniformly random 24-bit color.
pub fn random_color<R: Rng>(rng: &mut R) -> HexColor {
    let value: u32 = rng.gen_range(0..=0x00ff_ffff);
    HexColor::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
}
