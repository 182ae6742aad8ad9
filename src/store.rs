//! Persisted key-value storage with a synced scope for user settings and a
//! local scope for internal state.
//!
//! Backends are async trait objects so the engine does not care whether the
//! values live in a browser storage area, on disk, or in memory.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::ThemeConfig;

/// Key the theme configuration is stored under in the synced scope.
pub const THEME_CONFIG_KEY: &str = "themeConfig";

/// Storage area a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageScope {
    /// User settings that follow the user across devices.
    Sync,
    /// Per-install internal state.
    Local,
}

impl StorageScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Local => "local",
        }
    }
}

// ---------------------------------------------------------------------------
// KeyValueStore trait
// ---------------------------------------------------------------------------

/// Async key-value store over two scopes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// JSON file backend
// ---------------------------------------------------------------------------

/// One JSON object file per scope (`sync.json`, `local.json`) in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn scope_path(&self, scope: StorageScope) -> PathBuf {
        self.dir.join(format!("{}.json", scope.as_str()))
    }

    async fn read_scope(&self, scope: StorageScope) -> Result<BTreeMap<String, Value>, StoreError> {
        let path = self.scope_path(scope);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_scope(scope).await?.remove(key))
    }

    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.read_scope(scope).await?;
        entries.insert(key.to_string(), value);
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write-then-rename so a crash never leaves a half-written scope file.
        let path = self.scope_path(scope);
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// In-process store; can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<(StorageScope, String), Value>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(entries.get(&(scope, key.to_string())).cloned())
    }

    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<(), StoreError> {
        let fail = self.fail_writes.lock().map(|flag| *flag).unwrap_or(true);
        if fail {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        entries.insert((scope, key.to_string()), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed accessor
// ---------------------------------------------------------------------------

/// Typed access to the persisted `ThemeConfig`.
#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ConfigStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Last persisted config, if any.
    pub async fn load(&self) -> Result<Option<ThemeConfig>, StoreError> {
        let Some(value) = self.backend.get(StorageScope::Sync, THEME_CONFIG_KEY).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Persist `config` under the well-known key.
    pub async fn save(&self, config: &ThemeConfig) -> Result<(), StoreError> {
        let value = serde_json::to_value(config)?;
        self.backend
            .set(StorageScope::Sync, THEME_CONFIG_KEY, value)
            .await
    }
}
