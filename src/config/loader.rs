//! Top-level settings loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::apply_env_overrides;
use super::sources::{config_root_dir, default_store_dir, read_settings_text_with_sources};
use super::{FileSettings, LoadedSettings, Settings, StorageSettings};

/// Load settings from disk and environment, reporting which file they came from.
///
/// `path_override` is an explicit settings file path (from `--config`).
pub fn load_settings_with_source(
    path_override: Option<&str>,
) -> Result<LoadedSettings, ConfigError> {
    load_settings_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_settings_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedSettings, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_settings_text_with_sources(path_override, &read_file, &config_root)?;
    let parsed: FileSettings = toml::from_str(&text)?;
    let mut settings = resolve_file_settings(parsed, config_root());
    apply_env_overrides(&mut settings, &env_lookup)?;
    validate(&settings)?;
    Ok(LoadedSettings { settings, source })
}

fn resolve_file_settings(parsed: FileSettings, config_root: Option<PathBuf>) -> Settings {
    let dir = parsed
        .storage
        .dir
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_store_dir(config_root));
    let mut updates = parsed.updates;
    updates.interval_hours = updates.interval_hours.max(1);
    Settings {
        engine: parsed.engine,
        storage: StorageSettings { dir },
        updates,
        log: parsed.log,
    }
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    check_identifier("engine.style_id", &settings.engine.style_id)?;
    check_identifier("engine.activation_class", &settings.engine.activation_class)?;
    if settings.updates.enabled && settings.updates.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "updates.endpoint must be set when updates are enabled".to_string(),
        ));
    }
    Ok(())
}

/// Check `value` is a plain CSS identifier (`[A-Za-z_-][A-Za-z0-9_-]*`).
pub(super) fn check_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '-' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} `{value}` is not a valid CSS identifier"
        )))
    }
}
