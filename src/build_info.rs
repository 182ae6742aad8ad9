//! Compile-time build metadata exposed to CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("TINTCAST_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("TINTCAST_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `tintcast --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("TINTCAST_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("TINTCAST_BUILD_TIMESTAMP")
);

/// Body of `tintcast --version`; clap prefixes the binary name.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TINTCAST_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TINTCAST_BUILD_TIMESTAMP")
);

/// One-line version summary used in log lines and the update banner.
pub fn version_line() -> String {
    format!("tintcast v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}
