//! Environment overrides.
//!
//! `TINTCAST_*` variables win over every settings file.

use std::path::PathBuf;

use crate::error::ConfigError;

use super::Settings;

pub(super) const ENV_STORE_DIR: &str = "TINTCAST_STORE_DIR";
pub(super) const ENV_UPDATE_ENDPOINT: &str = "TINTCAST_UPDATE_ENDPOINT";
pub(super) const ENV_UPDATE_INTERVAL_HOURS: &str = "TINTCAST_UPDATE_INTERVAL_HOURS";

pub(super) fn apply_env_overrides<FEnv>(
    settings: &mut Settings,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(dir) = non_empty(env_lookup, ENV_STORE_DIR) {
        settings.storage.dir = PathBuf::from(dir);
    }
    if let Some(endpoint) = non_empty(env_lookup, ENV_UPDATE_ENDPOINT) {
        settings.updates.endpoint = endpoint;
    }
    if let Some(hours) = non_empty(env_lookup, ENV_UPDATE_INTERVAL_HOURS) {
        let parsed = hours.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_UPDATE_INTERVAL_HOURS} value `{hours}`: expected positive integer hours"
            ))
        })?;
        settings.updates.interval_hours = parsed.max(1);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
