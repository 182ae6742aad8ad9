//! Settings-file source discovery.
//!
//! Source order: explicit path > local file > global file > built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::{APP_DIR_NAME, SETTINGS_FILE_NAME};
use super::SettingsSource;

/// Read settings text from the highest-precedence available source.
pub(super) fn read_settings_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, SettingsSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; the fallbacks are optional.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, SettingsSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(SETTINGS_FILE_NAME)) {
        return Ok((text, SettingsSource::Local));
    }

    if let Some(dir) = config_root() {
        let global = dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, SettingsSource::Global(global)));
        }
    }

    Ok((String::new(), SettingsSource::BuiltInDefaults))
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

/// Default store directory under a config root.
pub(super) fn default_store_dir(config_root: Option<PathBuf>) -> PathBuf {
    match config_root {
        Some(root) => root.join(APP_DIR_NAME).join("store"),
        None => PathBuf::from(".tintcast").join("store"),
    }
}
