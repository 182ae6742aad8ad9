//! Theme compilation: turn a resolved palette and the host's light/dark mode
//! into the CSS block injected into the page.
//!
//! Every value the host page sees resolves through this module, so the
//! custom-property names and mix constants below are the public contract with
//! the host's own variable scales.

use std::collections::BTreeMap;

use crate::dom::Document;
use crate::palette::ResolvedPalette;

/// Root class the host sets in light mode.
pub const HOST_LIGHT_CLASS: &str = "theme-light";
/// Root class the host sets in dark mode.
pub const HOST_DARK_CLASS: &str = "theme-dark";

const DARK_VARIANT_SHIFT: i32 = -35;
const LIGHT_VARIANT_SHIFT: i32 = 130;

/// Custom property carrying the page background.
pub const PROP_BACKGROUND: &str = "--tintcast-background";
pub const PROP_BASE_DARK: &str = "--tintcast-base-dark";
pub const PROP_BASE_LIGHT: &str = "--tintcast-base-light";
pub const PROP_TEXT_DARK: &str = "--tintcast-text-dark";
pub const PROP_TEXT_LIGHT: &str = "--tintcast-text-light";
pub const PROP_BASE_MIX: &str = "--tintcast-base-mix";
pub const PROP_TEXT_MIX: &str = "--tintcast-text-mix";

/// Light/dark signal read from the host page's root classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostMode {
    #[default]
    Dark,
    Light,
}

impl HostMode {
    /// Classify a root class list. `theme-light` wins; no signal means dark.
    pub fn from_classes<'a, I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut dark = false;
        for class in classes {
            match class {
                HOST_LIGHT_CLASS => return Self::Light,
                HOST_DARK_CLASS => dark = true,
                _ => {}
            }
        }
        if dark {
            Self::Dark
        } else {
            Self::default()
        }
    }

    /// Mix amount for base-color variants against the host scale.
    pub fn base_mix(self) -> &'static str {
        match self {
            Self::Dark => "70.4%",
            Self::Light => "15.2%",
        }
    }

    /// Mix amount for text-color variants against the host scale.
    pub fn text_mix(self) -> &'static str {
        match self {
            Self::Dark => "30%",
            Self::Light => "40%",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Point-in-time host mode read from the document root.
pub fn detect_host_mode(document: &dyn Document) -> HostMode {
    let classes = document.root_classes();
    HostMode::from_classes(classes.iter().map(String::as_str))
}

/// Custom properties and body rule for one compile. Discarded once serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTheme {
    scope: String,
    pub properties: BTreeMap<&'static str, String>,
}

impl CompiledTheme {
    /// Value of one custom property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Serialize to the stylesheet text written into the style element.
    pub fn to_css(&self) -> String {
        let mut css = format!("{} {{\n", self.scope);
        for (name, value) in &self.properties {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css.push_str(&format!(
            "{} body {{\n  background: var({PROP_BACKGROUND}) !important;\n}}\n",
            self.scope
        ));
        css
    }
}

/// Compiles palettes into CSS scoped to the activation class.
#[derive(Debug, Clone)]
pub struct ThemeCompiler {
    scope: String,
}

impl ThemeCompiler {
    pub fn new(activation_class: &str) -> Self {
        Self {
            scope: format!("html.{activation_class}"),
        }
    }

    /// Compile a palette; `None` when it has no colors.
    pub fn compile(&self, palette: &ResolvedPalette, mode: HostMode) -> Option<CompiledTheme> {
        let main = palette.colors.first()?.with_hash();
        let dark = main.adjust(DARK_VARIANT_SHIFT);
        let light = main.adjust(LIGHT_VARIANT_SHIFT);

        let mut properties = BTreeMap::new();
        properties.insert(PROP_BACKGROUND, background_value(palette));
        properties.insert(PROP_BASE_DARK, dark.to_string());
        properties.insert(PROP_BASE_LIGHT, light.to_string());
        properties.insert(PROP_TEXT_DARK, dark.text_color().to_string());
        properties.insert(PROP_TEXT_LIGHT, light.text_color().to_string());
        properties.insert(PROP_BASE_MIX, mode.base_mix().to_string());
        properties.insert(PROP_TEXT_MIX, mode.text_mix().to_string());

        Some(CompiledTheme {
            scope: self.scope.clone(),
            properties,
        })
    }

    /// Compile straight to CSS text; empty palettes give an empty string.
    pub fn compile_css(&self, palette: &ResolvedPalette, mode: HostMode) -> String {
        self.compile(palette, mode)
            .map(|theme| theme.to_css())
            .unwrap_or_default()
    }
}

fn background_value(palette: &ResolvedPalette) -> String {
    match palette.colors.as_slice() {
        [single] => single.with_hash().to_string(),
        colors => {
            let stops = colors
                .iter()
                .map(|color| color.with_hash().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("linear-gradient({}, {stops})", palette.direction)
        }
    }
}
