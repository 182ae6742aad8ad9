//! Keeps the applied theme present while the host page re-renders.
//!
//! The watcher only listens to the root `class` attribute. Its own style
//! insertion is a head child-list change and never wakes it. On every batch it
//! re-applies the last compiled CSS, never a fresh compile, so a randomized
//! palette survives host re-renders unchanged.

use std::cell::RefCell;
use std::rc::Rc;

use crate::applier::StyleApplier;
use crate::dom::{Document, MutationRecord, ObserveOptions, Subscription};

/// Last compiled CSS, shared between the engine and the observer callback.
pub type CssCache = Rc<RefCell<Option<String>>>;

/// Observation state.
#[derive(Debug, Default)]
pub enum WatcherState {
    #[default]
    Idle,
    Observing(Subscription),
}

/// Root-class observer that restores the applied theme.
#[derive(Debug)]
pub struct PersistenceWatcher {
    applier: StyleApplier,
    state: WatcherState,
}

impl PersistenceWatcher {
    pub fn new(applier: StyleApplier) -> Self {
        Self {
            applier,
            state: WatcherState::Idle,
        }
    }

    pub fn is_observing(&self) -> bool {
        matches!(self.state, WatcherState::Observing(_))
    }

    /// `Idle -> Observing`. Returns `false` if already observing.
    pub fn start(&mut self, document: &mut dyn Document, cache: CssCache) -> bool {
        if self.is_observing() {
            return false;
        }
        let applier = self.applier.clone();
        let subscription = document.observe(
            ObserveOptions::root_attributes(&["class"]),
            Box::new(move |batch: &[MutationRecord], document: &mut dyn Document| {
                let css = cache.borrow();
                restore_if_broken(&applier, document, css.as_deref(), batch.len());
            }),
        );
        tracing::debug!(style_id = self.applier.style_id(), "persistence watcher observing");
        self.state = WatcherState::Observing(subscription);
        true
    }

    /// Drop the subscription and go back to `Idle`.
    pub fn dispose(&mut self) {
        if let WatcherState::Observing(subscription) = std::mem::take(&mut self.state) {
            subscription.dispose();
            tracing::debug!("persistence watcher disposed");
        }
    }
}

/// Re-apply `css` when the activation class or style element went missing.
///
/// Returns `true` when a restore was attempted.
pub fn restore_if_broken(
    applier: &StyleApplier,
    document: &mut dyn Document,
    css: Option<&str>,
    batch_len: usize,
) -> bool {
    if applier.is_intact(document) {
        return false;
    }
    let Some(css) = css else {
        // Nothing applied yet.
        return false;
    };
    match applier.apply(document, css) {
        Ok(outcome) => {
            tracing::debug!(?outcome, batch_len, "restored theme after host mutation");
        }
        Err(err) => {
            tracing::debug!(%err, "theme restore skipped");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VirtualDocument;

    fn setup() -> (VirtualDocument, StyleApplier, CssCache) {
        let doc = VirtualDocument::with_root_classes(&["theme-dark"]);
        let applier = StyleApplier::new("tc-style", "tc-on");
        let cache: CssCache = Rc::new(RefCell::new(None));
        (doc, applier, cache)
    }

    #[test]
    fn starts_once() {
        let (mut doc, applier, cache) = setup();
        let mut watcher = PersistenceWatcher::new(applier);
        assert!(watcher.start(&mut doc, Rc::clone(&cache)));
        assert!(!watcher.start(&mut doc, cache));
        assert_eq!(doc.active_observers(), 1);
    }

    #[test]
    fn restores_removed_class_with_cached_css() {
        let (mut doc, applier, cache) = setup();
        let mut watcher = PersistenceWatcher::new(applier.clone());
        watcher.start(&mut doc, Rc::clone(&cache));

        applier.apply(&mut doc, "x{}").unwrap();
        *cache.borrow_mut() = Some("x{}".to_string());
        doc.deliver_mutations();

        doc.set_root_class_attribute("theme-dark");
        doc.deliver_mutations();
        assert!(doc.root_has_class("tc-on"));
        assert_eq!(doc.element_text("tc-style").as_deref(), Some("x{}"));
    }

    #[test]
    fn restores_removed_style_on_next_class_mutation() {
        let (mut doc, applier, cache) = setup();
        let mut watcher = PersistenceWatcher::new(applier.clone());
        watcher.start(&mut doc, Rc::clone(&cache));
        applier.apply(&mut doc, "x{}").unwrap();
        *cache.borrow_mut() = Some("x{}".to_string());
        doc.deliver_mutations();

        doc.remove_element("tc-style");
        doc.deliver_mutations();
        assert!(!doc.has_element("tc-style"));

        doc.set_root_class_attribute("theme-light tc-on");
        doc.deliver_mutations();
        assert_eq!(doc.element_text("tc-style").as_deref(), Some("x{}"));
    }

    #[test]
    fn empty_cache_never_applies() {
        let (mut doc, applier, cache) = setup();
        let mut watcher = PersistenceWatcher::new(applier);
        watcher.start(&mut doc, cache);
        doc.set_root_class_attribute("theme-light");
        doc.deliver_mutations();
        assert!(!doc.root_has_class("tc-on"));
        assert!(doc.style_ids().is_empty());
    }

    #[test]
    fn dispose_stops_restoring() {
        let (mut doc, applier, cache) = setup();
        let mut watcher = PersistenceWatcher::new(applier.clone());
        watcher.start(&mut doc, Rc::clone(&cache));
        applier.apply(&mut doc, "x{}").unwrap();
        *cache.borrow_mut() = Some("x{}".to_string());
        doc.deliver_mutations();

        watcher.dispose();
        assert!(!watcher.is_observing());
        doc.set_root_class_attribute("theme-dark");
        doc.deliver_mutations();
        assert!(!doc.root_has_class("tc-on"));
        assert_eq!(doc.active_observers(), 0);
    }
}
