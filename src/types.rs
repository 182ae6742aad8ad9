//! Wire types shared between the popup, the store, and the engine.
//!
//! Field names follow the popup's camelCase JSON so a stored record and an
//! inbound `updateTheme` payload deserialize into the same struct.

use serde::{Deserialize, Deserializer, Serialize};

/// Fewest colors a theme can carry.
pub const MIN_COLOR_COUNT: usize = 1;
/// Most colors a theme can carry.
pub const MAX_COLOR_COUNT: usize = 5;

/// User-authored theme configuration.
///
/// Owned by the popup; the engine only reads it and keeps a clone of the last
/// one it applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Requested number of colors. Any JSON number is accepted here; the
    /// 1-5 domain is applied by `effective_color_count`.
    #[serde(deserialize_with = "deserialize_color_count")]
    pub color_count: i64,
    /// Gradient stops in order; may be longer than `color_count`.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Gradient angle as `"<int>deg"`.
    #[serde(default = "default_gradient_direction")]
    pub gradient_direction: String,
    /// Ignore `colors` and `gradient_direction` and roll a fresh palette.
    #[serde(default)]
    pub use_random_colors: bool,
}

impl ThemeConfig {
    /// Requested color count clamped into the supported range.
    pub fn effective_color_count(&self) -> usize {
        self.color_count
            .clamp(MIN_COLOR_COUNT as i64, MAX_COLOR_COUNT as i64) as usize
    }
}

impl Default for ThemeConfig {
    /// First-use defaults shown by the popup.
    fn default() -> Self {
        Self {
            color_count: 2,
            colors: vec!["#213220".to_string(), "#344e41".to_string()],
            gradient_direction: default_gradient_direction(),
            use_random_colors: false,
        }
    }
}

fn default_gradient_direction() -> String {
    "90deg".to_string()
}

/// Accept integers of either sign and fractional numbers (rounded, saturating).
fn deserialize_color_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(i64),
        Float(f64),
    }

    Ok(match RawCount::deserialize(deserializer)? {
        RawCount::Int(n) => n,
        RawCount::Float(f) => f.round() as i64,
    })
}
