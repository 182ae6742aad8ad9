//! Per-document theming engine.
//!
//! One `Engine` is built per document. It owns the last applied config and the
//! last compiled CSS, and drives the pipeline
//! resolve -> compile -> apply, with the persistence watcher feeding back into
//! apply only.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::applier::{ApplyOutcome, StyleApplier};
use crate::channel::parse_message;
use crate::config::EngineSettings;
use crate::dom::{Document, VirtualDocument};
use crate::error::ChannelError;
use crate::palette;
use crate::store::ConfigStore;
use crate::theme::{detect_host_mode, ThemeCompiler};
use crate::types::ThemeConfig;
use crate::watcher::{CssCache, PersistenceWatcher};

/// Theme injection engine bound to one document.
pub struct Engine<D: Document> {
    document: D,
    store: ConfigStore,
    applier: StyleApplier,
    compiler: ThemeCompiler,
    watcher: PersistenceWatcher,
    rng: StdRng,
    last_applied_config: Option<ThemeConfig>,
    last_compiled_css: CssCache,
}

impl<D: Document> Engine<D> {
    pub fn new(document: D, store: ConfigStore, settings: &EngineSettings) -> Self {
        let applier = StyleApplier::new(&settings.style_id, &settings.activation_class);
        Self {
            document,
            store,
            compiler: ThemeCompiler::new(&settings.activation_class),
            watcher: PersistenceWatcher::new(applier.clone()),
            applier,
            rng: StdRng::from_entropy(),
            last_applied_config: None,
            last_compiled_css: Rc::new(RefCell::new(None)),
        }
    }

    /// Replace the random source (deterministic tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn applier(&self) -> &StyleApplier {
        &self.applier
    }

    pub fn last_applied_config(&self) -> Option<&ThemeConfig> {
        self.last_applied_config.as_ref()
    }

    pub fn last_compiled_css(&self) -> Option<String> {
        self.last_compiled_css.borrow().clone()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_observing()
    }

    /// Page-load entry point: start watching, then apply the stored config.
    ///
    /// Nothing is applied when no config was ever saved. Returns the apply
    /// outcome when something was written.
    pub async fn initialize(&mut self) -> Option<ApplyOutcome> {
        self.watcher
            .start(&mut self.document, Rc::clone(&self.last_compiled_css));

        let config = match self.store.load().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::info!("no stored theme; leaving page untouched");
                return None;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to read stored theme");
                return None;
            }
        };
        self.apply_config(&config)
    }

    /// Apply a config pushed from the popup, then persist it.
    ///
    /// Persistence failures are logged and do not undo the apply.
    pub async fn on_config_update(&mut self, config: ThemeConfig) -> Option<ApplyOutcome> {
        let outcome = self.apply_config(&config);
        if let Err(err) = self.store.save(&config).await {
            tracing::warn!(%err, "failed to persist theme config");
        }
        outcome
    }

    /// Decode and dispatch one raw channel message.
    ///
    /// Returns `Ok(false)` for messages addressed to someone else.
    pub async fn handle_message(&mut self, raw: &str) -> Result<bool, ChannelError> {
        match parse_message(raw)? {
            Some(config) => {
                self.on_config_update(config).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve, compile, and apply `config` against the current host mode.
    ///
    /// Non-empty CSS is cached even if the DOM was not ready, so the watcher
    /// can restore it on a later mutation.
    pub fn apply_config(&mut self, config: &ThemeConfig) -> Option<ApplyOutcome> {
        let resolved = palette::resolve(config, &mut self.rng);
        let mode = detect_host_mode(&self.document);
        let css = self.compiler.compile_css(&resolved, mode);
        if css.is_empty() {
            tracing::debug!("empty palette compiled to no css; skipping apply");
            return None;
        }

        *self.last_compiled_css.borrow_mut() = Some(css.clone());
        self.last_applied_config = Some(config.clone());

        match self.applier.apply(&mut self.document, &css) {
            Ok(outcome) => {
                tracing::debug!(
                    ?outcome,
                    mode = mode.as_str(),
                    colors = resolved.colors.len(),
                    random = config.use_random_colors,
                    "theme applied"
                );
                Some(outcome)
            }
            Err(err) => {
                tracing::debug!(%err, "document not ready; theme not applied");
                None
            }
        }
    }

    /// Release the watcher subscription.
    pub fn dispose_watcher(&mut self) {
        self.watcher.dispose();
    }
}

impl Engine<VirtualDocument> {
    /// Deliver queued mutations to observers (a microtask checkpoint).
    pub fn pump(&mut self) -> usize {
        self.document.deliver_mutations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testsupport::{random_config, sample_config, update_message};
    use std::sync::Arc;

    fn engine(doc: VirtualDocument) -> (Engine<VirtualDocument>, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = ConfigStore::new(backend.clone());
        let engine = Engine::new(doc, store, &EngineSettings::default())
            .with_rng(StdRng::seed_from_u64(11));
        (engine, backend)
    }

    #[tokio::test]
    async fn initialize_without_stored_config_applies_nothing() {
        let (mut engine, _) = engine(VirtualDocument::with_root_classes(&["theme-dark"]));
        assert_eq!(engine.initialize().await, None);
        assert!(engine.is_watching());
        assert!(engine.document().style_ids().is_empty());
        assert!(engine.last_compiled_css().is_none());
    }

    #[tokio::test]
    async fn initialize_applies_stored_config() {
        let (mut engine, backend) = engine(VirtualDocument::with_root_classes(&["theme-light"]));
        ConfigStore::new(backend)
            .save(&sample_config())
            .await
            .unwrap();
        assert_eq!(engine.initialize().await, Some(ApplyOutcome::Inserted));
        let css = engine.last_compiled_css().expect("css");
        assert!(css.contains("15.2%"));
        assert_eq!(
            engine.document().element_text(engine.applier().style_id()),
            Some(css)
        );
    }

    #[tokio::test]
    async fn update_applies_and_persists() {
        let (mut engine, backend) = engine(VirtualDocument::new());
        engine.initialize().await;
        let handled = engine
            .handle_message(&update_message(&sample_config()))
            .await
            .unwrap();
        assert!(handled);
        assert_eq!(engine.last_applied_config(), Some(&sample_config()));
        let stored = ConfigStore::new(backend).load().await.unwrap();
        assert_eq!(stored, Some(sample_config()));
    }

    #[tokio::test]
    async fn failed_persist_still_applies() {
        let (mut engine, backend) = engine(VirtualDocument::new());
        backend.set_fail_writes(true);
        let outcome = engine.on_config_update(sample_config()).await;
        assert_eq!(outcome, Some(ApplyOutcome::Inserted));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn unrelated_messages_are_ignored() {
        let (mut engine, _) = engine(VirtualDocument::new());
        let handled = engine
            .handle_message(r#"{"action":"checkForUpdates"}"#)
            .await
            .unwrap();
        assert!(!handled);
        assert!(engine.last_applied_config().is_none());
    }

    #[tokio::test]
    async fn missing_head_caches_css_for_later_restore() {
        let (mut engine, _) = engine(VirtualDocument::without_head());
        engine.initialize().await;
        assert_eq!(engine.on_config_update(sample_config()).await, None);
        let css = engine.last_compiled_css().expect("cached");

        engine.document_mut().attach_head();
        engine.document_mut().set_root_class_attribute("theme-dark");
        engine.pump();
        assert_eq!(
            engine.document().element_text(engine.applier().style_id()),
            Some(css)
        );
    }

    #[tokio::test]
    async fn host_mode_is_read_at_compile_time() {
        let (mut engine, _) = engine(VirtualDocument::with_root_classes(&["theme-dark"]));
        engine.on_config_update(sample_config()).await;
        assert!(engine.last_compiled_css().unwrap().contains("70.4%"));

        engine
            .document_mut()
            .set_root_class_attribute("theme-light tintcast-themed");
        engine.pump();
        // Mode flip alone does not recompile.
        assert!(engine.last_compiled_css().unwrap().contains("70.4%"));

        engine.on_config_update(sample_config()).await;
        assert!(engine.last_compiled_css().unwrap().contains("15.2%"));
    }

    #[tokio::test]
    async fn random_config_is_stored_as_sent() {
        let (mut engine, backend) = engine(VirtualDocument::new());
        engine.on_config_update(random_config(4)).await;
        let css = engine.last_compiled_css().expect("css");
        assert!(css.contains("linear-gradient("));
        let stored = ConfigStore::new(backend).load().await.unwrap();
        assert_eq!(stored, Some(random_config(4)));
    }
}
