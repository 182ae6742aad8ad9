//! Settings loading from TOML files and environment variables.
//!
//! Settings are loaded in this order of precedence (highest wins):
//! 1. Environment variables (`TINTCAST_STORE_DIR`, `TINTCAST_UPDATE_ENDPOINT`,
//!    `TINTCAST_UPDATE_INTERVAL_HOURS`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./tintcast.toml in the current directory
//! 4. $XDG_CONFIG_HOME/tintcast/tintcast.toml (or ~/.config/tintcast/tintcast.toml)
//! 5. Built-in defaults

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use loader::load_settings_with_source;
pub use sources::config_root_dir;
pub use types::{
    EngineSettings, LoadedSettings, LogSettings, Settings, SettingsSource, StorageSettings,
    UpdateSettings,
};
use types::FileSettings;

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            storage: StorageSettings {
                dir: sources::default_store_dir(config_root_dir()),
            },
            updates: UpdateSettings::default(),
            log: LogSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::loader::{check_identifier, load_settings_from_sources};
    use super::*;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn files(entries: &[(&str, &str)]) -> BTreeMap<PathBuf, String> {
        entries
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect()
    }

    fn load(
        path_override: Option<&str>,
        files: &BTreeMap<PathBuf, String>,
        env: &[(&str, &str)],
    ) -> Result<LoadedSettings, crate::error::ConfigError> {
        let env: BTreeMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_settings_from_sources(
            path_override,
            |path: &Path| {
                files
                    .get(path)
                    .cloned()
                    .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
            },
            |name| env.get(name).cloned(),
            || Some(PathBuf::from("/cfg")),
        )
    }

    #[test]
    fn defaults_are_sensible() {
        let loaded = load(None, &files(&[]), &[]).unwrap();
        let s = loaded.settings;
        assert_eq!(loaded.source, SettingsSource::BuiltInDefaults);
        assert_eq!(s.engine.style_id, "tintcast-theme-style-4f1c");
        assert_eq!(s.engine.activation_class, "tintcast-themed");
        assert_eq!(s.storage.dir, PathBuf::from("/cfg/tintcast/store"));
        assert!(s.updates.enabled);
        assert_eq!(s.updates.interval_hours, 24);
        assert_eq!(s.log.filter, "warn");
    }

    #[test]
    fn parse_partial_toml() {
        let f = files(&[(
            "tintcast.toml",
            r#"
                [engine]
                activation_class = "my-theme"

                [updates]
                enabled = false
                interval_hours = 0
            "#,
        )]);
        let loaded = load(None, &f, &[]).unwrap();
        assert_eq!(loaded.source, SettingsSource::Local);
        assert_eq!(loaded.settings.engine.activation_class, "my-theme");
        assert_eq!(loaded.settings.engine.style_id, "tintcast-theme-style-4f1c");
        assert!(!loaded.settings.updates.enabled);
        assert_eq!(loaded.settings.updates.interval_hours, 1);
    }

    #[test]
    fn explicit_path_beats_local_and_global() {
        let f = files(&[
            ("custom.toml", "[log]\nfilter = \"debug\"\n"),
            ("tintcast.toml", "[log]\nfilter = \"info\"\n"),
            ("/cfg/tintcast/tintcast.toml", "[log]\nfilter = \"trace\"\n"),
        ]);
        let loaded = load(Some("custom.toml"), &f, &[]).unwrap();
        assert_eq!(loaded.settings.log.filter, "debug");
        assert_eq!(
            loaded.source,
            SettingsSource::Explicit(PathBuf::from("custom.toml"))
        );

        let loaded = load(None, &f, &[]).unwrap();
        assert_eq!(loaded.settings.log.filter, "info");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let f = files(&[(
            "/cfg/tintcast/tintcast.toml",
            "[storage]\ndir = \"/data/themes\"\n",
        )]);
        let loaded = load(None, &f, &[]).unwrap();
        assert_eq!(loaded.settings.storage.dir, PathBuf::from("/data/themes"));
        assert_eq!(
            loaded.source.describe(),
            "/cfg/tintcast/tintcast.toml".to_string()
        );
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load(Some("nope.toml"), &files(&[]), &[]).unwrap_err();
        assert!(err.to_string().starts_with("io:"), "got: {err}");
    }

    #[test]
    fn env_overrides_win() {
        let f = files(&[(
            "tintcast.toml",
            "[updates]\nendpoint = \"https://file.example\"\ninterval_hours = 6\n",
        )]);
        let loaded = load(
            None,
            &f,
            &[
                ("TINTCAST_STORE_DIR", "/tmp/store"),
                ("TINTCAST_UPDATE_ENDPOINT", "https://env.example"),
                ("TINTCAST_UPDATE_INTERVAL_HOURS", "0"),
            ],
        )
        .unwrap();
        assert_eq!(loaded.settings.storage.dir, PathBuf::from("/tmp/store"));
        assert_eq!(loaded.settings.updates.endpoint, "https://env.example");
        assert_eq!(loaded.settings.updates.interval_hours, 1);
    }

    #[test]
    fn invalid_env_interval_is_rejected() {
        let err = load(
            None,
            &files(&[]),
            &[("TINTCAST_UPDATE_INTERVAL_HOURS", "soon")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("TINTCAST_UPDATE_INTERVAL_HOURS"));
    }

    #[test]
    fn unknown_sections_and_bad_toml_are_rejected() {
        let f = files(&[("tintcast.toml", "[colors]\nprimary = 1\n")]);
        assert!(load(None, &f, &[]).is_err());
        let f = files(&[("tintcast.toml", "[engine\n")]);
        let err = load(None, &f, &[]).unwrap_err();
        assert!(err.to_string().starts_with("toml:"), "got: {err}");
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(check_identifier("f", "tintcast-themed").is_ok());
        assert!(check_identifier("f", "_x1").is_ok());
        assert!(check_identifier("f", "").is_err());
        assert!(check_identifier("f", "1abc").is_err());
        assert!(check_identifier("f", "has space").is_err());

        let f = files(&[("tintcast.toml", "[engine]\nstyle_id = \"bad id\"\n")]);
        let err = load(None, &f, &[]).unwrap_err();
        assert!(err.to_string().contains("engine.style_id"));
    }
}
