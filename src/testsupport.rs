//! Shared test fixtures for store, channel and engine test modules.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::ThemeConfig;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("tintcast-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Three-stop, non-random theme.
pub fn sample_config() -> ThemeConfig {
    ThemeConfig {
        color_count: 3,
        colors: vec![
            "#1b263b".to_string(),
            "#415a77".to_string(),
            "#778da9".to_string(),
        ],
        gradient_direction: "135deg".to_string(),
        use_random_colors: false,
    }
}

/// Randomized theme with `count` colors.
pub fn random_config(count: usize) -> ThemeConfig {
    ThemeConfig {
        color_count: count as i64,
        use_random_colors: true,
        ..ThemeConfig::default()
    }
}

/// Serialized `updateTheme` message carrying `config`.
pub fn update_message(config: &ThemeConfig) -> String {
    crate::channel::update_theme_message(config).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().exists());
    }

    #[test]
    fn update_message_uses_wire_field_names() {
        let raw = update_message(&sample_config());
        assert!(raw.contains("\"action\":\"updateTheme\""));
        assert!(raw.contains("\"colorCount\":3"));
        assert!(raw.contains("\"gradientDirection\":\"135deg\""));
    }

    #[test]
    fn random_config_keeps_default_colors() {
        let config = random_config(4);
        assert!(config.use_random_colors);
        assert_eq!(config.effective_color_count(), 4);
    }
}
