//! CLI argument parsing via clap.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tintcast::build_info;

/// Gradient theme injection for web app pages, driven from the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tintcast",
    version,
    long_version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to settings file (default: ./tintcast.toml or ~/.config/tintcast/tintcast.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the CSS a theme compiles to.
    Compile(ThemeArgs),
    /// Show the resolved palette as terminal swatches.
    Preview(ThemeArgs),
    /// Deliver an `updateTheme` message (file path or `-` for stdin).
    UpdateTheme {
        /// JSON message file, or `-` to read stdin.
        message: String,
    },
    /// Apply the stored theme to a page and print the injected style text.
    Apply {
        /// HTML snapshot to start from instead of an empty page.
        #[arg(long = "html")]
        html: Option<PathBuf>,
    },
    /// Print the stored theme config as JSON.
    Show,
    /// Check the release endpoint for a newer version.
    CheckUpdate {
        /// Check now even if the interval has not elapsed.
        #[arg(long)]
        force: bool,
    },
}

/// Inline theme description shared by `compile` and `preview`.
#[derive(Debug, Clone, ClapArgs)]
pub struct ThemeArgs {
    /// Gradient colors in order (`#rrggbb` or `rrggbb`).
    #[arg(long = "colors", num_args = 1.., value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Number of colors to use (1-5). Defaults to the number given.
    #[arg(long = "count")]
    pub count: Option<usize>,

    /// Gradient direction, e.g. `135deg`.
    #[arg(long = "direction", default_value = "90deg")]
    pub direction: String,

    /// Host page mode to compile for.
    #[arg(long = "mode", value_enum, default_value_t = ModeArg::Dark)]
    pub mode: ModeArg,

    /// Ignore colors and direction and roll a random palette.
    #[arg(long = "random")]
    pub random: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Dark,
    Light,
}
