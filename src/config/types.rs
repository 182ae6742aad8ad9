//! Settings data model.
//!
//! `FileSettings` mirrors the TOML layout with every field optional. The loader
//! resolves it into `Settings`, where every value is concrete.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_ACTIVATION_CLASS, DEFAULT_LOG_FILTER, DEFAULT_STYLE_ID, DEFAULT_UPDATE_ENDPOINT,
    DEFAULT_UPDATE_INTERVAL_HOURS,
};

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub engine: EngineSettings,
    pub storage: StorageSettings,
    pub updates: UpdateSettings,
    pub log: LogSettings,
}

/// Names the engine writes into the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub style_id: String,
    pub activation_class: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            style_id: DEFAULT_STYLE_ID.to_string(),
            activation_class: DEFAULT_ACTIVATION_CLASS.to_string(),
        }
    }
}

/// Where the JSON store keeps its scope files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub dir: PathBuf,
}

/// Update notifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub interval_hours: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_UPDATE_ENDPOINT.to_string(),
            interval_hours: DEFAULT_UPDATE_INTERVAL_HOURS,
        }
    }
}

/// Logging settings for the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Raw TOML file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileSettings {
    pub engine: EngineSettings,
    pub storage: FileStorageSettings,
    pub updates: UpdateSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct FileStorageSettings {
    pub dir: Option<String>,
}

/// Settings plus the file they came from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: SettingsSource,
}

/// Which settings file won the precedence race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// `--config` path.
    Explicit(PathBuf),
    /// `./tintcast.toml`.
    Local,
    /// `<config root>/tintcast/tintcast.toml`.
    Global(PathBuf),
    /// No file found.
    BuiltInDefaults,
}

impl SettingsSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(path) | Self::Global(path) => path.display().to_string(),
            Self::Local => "./tintcast.toml".to_string(),
            Self::BuiltInDefaults => "built-in defaults".to_string(),
        }
    }
}
