//! Palette resolution: decide the concrete colors and gradient angle for one
//! compile.
//!
//! Randomized palettes are rolled on every call and never cached, so repeated
//! applies of a random config visibly change. Degree sanitization here is the
//! only guard between attacker-influenced text and the emitted CSS.

use std::fmt;

use rand::Rng;

use crate::color::{random_color, HexColor};
use crate::types::ThemeConfig;

/// Stand-in for colors missing from (or malformed in) a short color list.
pub const PAD_COLOR: HexColor = HexColor::rgb(0, 0, 0);
/// Angle used when the configured direction is unusable.
pub const DEFAULT_DEGREES: Degrees = Degrees(90);
const MAX_DEGREES: u16 = 360;

/// A gradient angle in `[0, 360]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degrees(u16);

impl Degrees {
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.0)
    }
}

/// Colors and angle for one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPalette {
    pub colors: Vec<HexColor>,
    pub direction: Degrees,
}

impl ResolvedPalette {
    pub fn new(colors: Vec<HexColor>, direction: Degrees) -> Self {
        Self { colors, direction }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Parse `"<digits>deg"`, clamping into `[0, 360]`; anything else is `90deg`.
pub fn sanitize_degrees(input: &str) -> Degrees {
    let Some(digits) = input.strip_suffix("deg") else {
        return DEFAULT_DEGREES;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_DEGREES;
    }
    // All-digit strings that overflow are simply very large angles.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    Degrees(value.min(u64::from(MAX_DEGREES)) as u16)
}

/// Resolve the palette for `config`, rolling random values when requested.
pub fn resolve<R: Rng>(config: &ThemeConfig, rng: &mut R) -> ResolvedPalette {
    let count = config.effective_color_count();
    if config.use_random_colors {
        let colors = (0..count).map(|_| random_color(rng)).collect();
        let direction = Degrees(rng.gen_range(0..MAX_DEGREES));
        return ResolvedPalette::new(colors, direction);
    }

    if config.colors.len() < count {
        tracing::warn!(
            available = config.colors.len(),
            requested = count,
            "theme has fewer colors than colorCount; padding with {PAD_COLOR}"
        );
    }
    let colors = (0..count)
        .map(|idx| match config.colors.get(idx) {
            // CSS needs the `#` form whatever the popup stored.
            Some(raw) => match raw.parse::<HexColor>() {
                Ok(color) => color.with_hash(),
                Err(err) => {
                    tracing::warn!(%err, "replacing malformed theme color");
                    PAD_COLOR
                }
            },
            None => PAD_COLOR,
        })
        .collect();
    ResolvedPalette::new(colors, sanitize_degrees(&config.gradient_direction))
}
