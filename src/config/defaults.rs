//! Default settings constants.

/// Id of the injected `<style>` element.
pub(super) const DEFAULT_STYLE_ID: &str = "tintcast-theme-style-4f1c";
/// Root class that marks a themed page.
pub(super) const DEFAULT_ACTIVATION_CLASS: &str = "tintcast-themed";
/// Release feed polled by the update notifier.
pub(super) const DEFAULT_UPDATE_ENDPOINT: &str =
    "https://api.github.com/repos/tintcast/tintcast/releases/latest";
/// Hours between update checks.
pub(super) const DEFAULT_UPDATE_INTERVAL_HOURS: u64 = 24;
/// Default `tracing` filter directive.
pub(super) const DEFAULT_LOG_FILTER: &str = "warn";
/// Directory name under the config root.
pub(super) const APP_DIR_NAME: &str = "tintcast";
/// Settings file name, both local and global.
pub(super) const SETTINGS_FILE_NAME: &str = "tintcast.toml";
