//! CLI entry point for tintcast.

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::style::{Color, Stylize};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use tintcast::color::HexColor;
use tintcast::config::{load_settings_with_source, Settings};
use tintcast::dom::{Document, VirtualDocument};
use tintcast::engine::Engine;
use tintcast::palette::{self, ResolvedPalette};
use tintcast::store::{ConfigStore, JsonFileStore, KeyValueStore};
use tintcast::theme::{HostMode, ThemeCompiler};
use tintcast::types::ThemeConfig;
use tintcast::update::{unix_now_secs, UpdateChecker, Version};

use cli::{Args, Command, ModeArg, ThemeArgs};

/// Env var that overrides the settings log filter.
const LOG_ENV: &str = "TINTCAST_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let loaded = match load_settings_with_source(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error(&format!("failed to load settings: {e}"));
            std::process::exit(1);
        }
    };
    init_tracing(&loaded.settings.log.filter);
    tracing::debug!(source = %loaded.source.describe(), "settings loaded");

    if let Err(msg) = run(args.command, &loaded.settings).await {
        print_error(&msg);
        std::process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_error(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}

async fn run(command: Command, settings: &Settings) -> Result<(), String> {
    match command {
        Command::Compile(theme) => {
            let css = compile_inline(&theme, &settings.engine.activation_class);
            print!("{css}");
            Ok(())
        }
        Command::Preview(theme) => {
            preview_inline(&theme, &settings.engine.activation_class);
            Ok(())
        }
        Command::UpdateTheme { message } => update_theme(&message, settings).await,
        Command::Apply { html } => apply_stored(html.as_deref(), settings).await,
        Command::Show => show_stored(settings).await,
        Command::CheckUpdate { force } => check_update(force, settings).await,
    }
}

fn file_backend(settings: &Settings) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::new(settings.storage.dir.clone()))
}

// ---------------------------------------------------------------------------
// compile / preview
// ---------------------------------------------------------------------------

fn inline_config(theme: &ThemeArgs) -> ThemeConfig {
    let count = match theme.count {
        Some(count) => count,
        None if theme.colors.is_empty() => ThemeConfig::default().effective_color_count(),
        None => theme.colors.len(),
    };
    ThemeConfig {
        color_count: i64::try_from(count).unwrap_or(i64::MAX),
        colors: theme.colors.clone(),
        gradient_direction: theme.direction.clone(),
        use_random_colors: theme.random,
    }
}

fn host_mode(mode: ModeArg) -> HostMode {
    match mode {
        ModeArg::Dark => HostMode::Dark,
        ModeArg::Light => HostMode::Light,
    }
}

fn resolve_inline(theme: &ThemeArgs) -> ResolvedPalette {
    let mut rng = StdRng::from_entropy();
    palette::resolve(&inline_config(theme), &mut rng)
}

fn compile_inline(theme: &ThemeArgs, activation_class: &str) -> String {
    let resolved = resolve_inline(theme);
    ThemeCompiler::new(activation_class).compile_css(&resolved, host_mode(theme.mode))
}

fn preview_inline(theme: &ThemeArgs, activation_class: &str) {
    let resolved = resolve_inline(theme);
    println!("{} {}", "direction".bold(), resolved.direction);
    for color in &resolved.colors {
        println!("  {}", swatch(*color));
    }

    let compiler = ThemeCompiler::new(activation_class);
    let Some(compiled) = compiler.compile(&resolved, host_mode(theme.mode)) else {
        return;
    };
    println!("{}", "properties".bold());
    for (name, value) in &compiled.properties {
        let rendered = match value.parse::<HexColor>() {
            Ok(color) => swatch(color),
            Err(_) => value.clone(),
        };
        println!("  {name}: {rendered}");
    }
}

/// Hex label on its own color, in the text color the theme would pick.
fn swatch(color: HexColor) -> String {
    let fg = color
        .text_color()
        .parse::<HexColor>()
        .map(crossterm_color)
        .unwrap_or(Color::White);
    format!(" {color} ").with(fg).on(crossterm_color(color)).to_string()
}

fn crossterm_color(color: HexColor) -> Color {
    let (r, g, b) = color.to_rgb();
    Color::Rgb { r, g, b }
}

// ---------------------------------------------------------------------------
// engine-backed commands
// ---------------------------------------------------------------------------

async fn read_message(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        return Ok(text);
    }
    tokio::fs::read_to_string(source)
        .await
        .map_err(|e| format!("failed to read {source}: {e}"))
}

async fn update_theme(source: &str, settings: &Settings) -> Result<(), String> {
    let raw = read_message(source).await?;
    let store = ConfigStore::new(file_backend(settings));
    let mut engine = Engine::new(VirtualDocument::new(), store, &settings.engine);
    engine.initialize().await;

    let handled = engine
        .handle_message(&raw)
        .await
        .map_err(|e| format!("invalid message: {e}"))?;
    if !handled {
        println!("message ignored (not an updateTheme action)");
        return Ok(());
    }
    engine.pump();
    match engine.last_compiled_css() {
        Some(css) => print!("{css}"),
        None => println!("theme stored; nothing to apply"),
    }
    Ok(())
}

async fn apply_stored(html: Option<&Path>, settings: &Settings) -> Result<(), String> {
    let document = match html {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            VirtualDocument::from_html(&text).map_err(|e| e.to_string())?
        }
        None => VirtualDocument::new(),
    };
    let store = ConfigStore::new(file_backend(settings));
    let mut engine = Engine::new(document, store, &settings.engine);

    if engine.initialize().await.is_none() {
        println!("no theme applied");
        return Ok(());
    }
    engine.pump();
    let style_id = engine.applier().style_id().to_string();
    match engine.document().element_text(&style_id) {
        Some(text) => print!("{text}"),
        None => println!("no theme applied"),
    }
    Ok(())
}

async fn show_stored(settings: &Settings) -> Result<(), String> {
    let store = ConfigStore::new(file_backend(settings));
    match store.load().await.map_err(|e| e.to_string())? {
        Some(config) => {
            let text = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
            println!("{text}");
        }
        None => println!("no stored theme"),
    }
    Ok(())
}

async fn check_update(force: bool, settings: &Settings) -> Result<(), String> {
    if !settings.updates.enabled && !force {
        println!("update checks are disabled");
        return Ok(());
    }
    let current = Version::current().map_err(|e| e.to_string())?;
    let checker = UpdateChecker::new(&settings.updates, file_backend(settings));
    let notice = if force {
        checker.check(&current).await
    } else {
        checker.poll(&current, unix_now_secs()).await
    }
    .map_err(|e| format!("update check failed: {e}"))?;

    match notice {
        Some(notice) => println!(
            "{} {}",
            format!(" {} ", notice.badge_text()).black().on(Color::Yellow),
            notice.banner()
        ),
        None => println!("{} is up to date", tintcast::build_info::version_line()),
    }
    Ok(())
}
