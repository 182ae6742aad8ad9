//! Tintcast: gradient theme injection that survives host page re-renders.
//!
//! A `ThemeConfig` (colors, count, direction, or "random") is resolved into a
//! palette, compiled into CSS custom properties scoped to an activation class,
//! and written into a document as one `<style>` element plus one root class.
//! A persistence watcher re-applies the last compiled CSS whenever the host
//! rewrites the root `class` attribute.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tintcast::config::EngineSettings;
//! use tintcast::dom::VirtualDocument;
//! use tintcast::engine::Engine;
//! use tintcast::store::{ConfigStore, MemoryStore};
//! use tintcast::types::ThemeConfig;
//!
//! # async fn example() {
//! let store = ConfigStore::new(Arc::new(MemoryStore::new()));
//! let mut engine = Engine::new(VirtualDocument::new(), store, &EngineSettings::default());
//! engine.initialize().await;
//! engine.on_config_update(ThemeConfig::default()).await;
//! println!("{:?}", engine.last_compiled_css());
//! # }
//! ```

pub mod applier;
pub mod build_info;
pub mod channel;
pub mod color;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod palette;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
pub mod types;
pub mod update;
pub mod watcher;
