//! In-process `Document` with browser-like observer delivery.
//!
//! Mutations queue records; observers only run when `deliver_mutations` is
//! called, the equivalent of a microtask checkpoint. Callbacks may mutate the
//! document again, which queues another round.

use std::collections::BTreeMap;

use crate::error::DomError;

use super::{
    Document, MutationCallback, MutationRecord, MutationTarget, ObserveOptions, Subscription,
};

/// Upper bound on delivery rounds per checkpoint.
pub const MAX_DELIVERY_ROUNDS: usize = 16;

struct Observer {
    options: ObserveOptions,
    callback: MutationCallback,
    subscription: Subscription,
}

/// Element attached under the head (or elsewhere in the page).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    tag: String,
    text: String,
}

/// Minimal document: a root with classes, an optional head, and elements by id.
pub struct VirtualDocument {
    root: Option<Vec<String>>,
    head: bool,
    elements: BTreeMap<String, Element>,
    pending: Vec<MutationRecord>,
    observers: Vec<Observer>,
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDocument {
    /// Document with an empty root and a head.
    pub fn new() -> Self {
        Self {
            root: Some(Vec::new()),
            head: true,
            elements: BTreeMap::new(),
            pending: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Document whose root starts with these classes.
    pub fn with_root_classes(classes: &[&str]) -> Self {
        let mut doc = Self::new();
        doc.root = Some(classes.iter().map(|c| c.to_string()).collect());
        doc
    }

    /// Document that has not parsed its root element yet.
    pub fn without_root() -> Self {
        let mut doc = Self::new();
        doc.root = None;
        doc
    }

    /// Document with a root but no head.
    pub fn without_head() -> Self {
        let mut doc = Self::new();
        doc.head = false;
        doc
    }

    pub(super) fn from_parts(
        root: Option<Vec<String>>,
        head: bool,
        elements: Vec<(String, String, String)>,
    ) -> Self {
        let mut doc = Self::new();
        doc.root = root;
        doc.head = head;
        for (id, tag, text) in elements {
            doc.elements.insert(id, Element { tag, text });
        }
        doc
    }

    /// Replace the whole root `class` attribute, as host re-renders do.
    pub fn set_root_class_attribute(&mut self, value: &str) {
        let Some(classes) = self.root.as_mut() else {
            return;
        };
        let old = classes.join(" ");
        *classes = value.split_whitespace().map(str::to_string).collect();
        self.queue_class_record(old);
    }

    /// Remove one root class token if present.
    pub fn remove_root_class(&mut self, class: &str) {
        let Some(classes) = self.root.as_mut() else {
            return;
        };
        if !classes.iter().any(|token| token == class) {
            return;
        }
        let old = classes.join(" ");
        classes.retain(|token| token != class);
        self.queue_class_record(old);
    }

    /// Detach an element by id. Returns whether it existed.
    pub fn remove_element(&mut self, id: &str) -> bool {
        let removed = self.elements.remove(id).is_some();
        if removed {
            self.pending.push(MutationRecord::ChildList {
                target: MutationTarget::Head,
                added: Vec::new(),
                removed: vec![id.to_string()],
            });
        }
        removed
    }

    /// Attach the head late (documents that were still loading).
    pub fn attach_head(&mut self) {
        self.head = true;
    }

    /// Ids of every attached `<style>` element.
    pub fn style_ids(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, element)| element.tag == "style")
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn pending_records(&self) -> usize {
        self.pending.len()
    }

    /// Number of observers that have not been disposed.
    pub fn active_observers(&self) -> usize {
        self.observers
            .iter()
            .filter(|observer| observer.subscription.is_active())
            .count()
    }

    /// Run queued observer callbacks until the queue drains.
    ///
    /// Returns the number of non-empty batches delivered. Stops after
    /// `MAX_DELIVERY_ROUNDS` rounds and drops anything still queued.
    pub fn deliver_mutations(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_DELIVERY_ROUNDS {
            if self.pending.is_empty() {
                return delivered;
            }
            let records = std::mem::take(&mut self.pending);
            let mut observers = std::mem::take(&mut self.observers);
            observers.retain(|observer| observer.subscription.is_active());
            for observer in observers.iter_mut() {
                if !observer.subscription.is_active() {
                    continue;
                }
                let batch: Vec<MutationRecord> = records
                    .iter()
                    .filter(|record| observer.options.matches(record))
                    .cloned()
                    .collect();
                if batch.is_empty() {
                    continue;
                }
                (observer.callback)(&batch, self);
                delivered += 1;
            }
            // Keep registrations made from inside callbacks.
            observers.append(&mut self.observers);
            self.observers = observers;
        }
        if !self.pending.is_empty() {
            tracing::warn!(
                dropped = self.pending.len(),
                "mutation delivery did not settle; dropping queued records"
            );
            self.pending.clear();
        }
        delivered
    }

    fn queue_class_record(&mut self, old: String) {
        self.pending.push(MutationRecord::Attributes {
            target: MutationTarget::Root,
            attribute: "class".to_string(),
            old_value: Some(old),
        });
    }
}

impl Document for VirtualDocument {
    fn has_root(&self) -> bool {
        self.root.is_some()
    }

    fn has_head(&self) -> bool {
        self.head
    }

    fn root_classes(&self) -> Vec<String> {
        self.root.clone().unwrap_or_default()
    }

    fn add_root_class(&mut self, class: &str) -> Result<(), DomError> {
        let classes = self.root.as_mut().ok_or(DomError::MissingRoot)?;
        if classes.iter().any(|token| token == class) {
            return Ok(());
        }
        let old = classes.join(" ");
        classes.push(class.to_string());
        self.queue_class_record(old);
        Ok(())
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn create_style_element(&mut self, id: &str) -> Result<(), DomError> {
        if !self.head {
            return Err(DomError::MissingHead);
        }
        self.elements.insert(
            id.to_string(),
            Element {
                tag: "style".to_string(),
                text: String::new(),
            },
        );
        self.pending.push(MutationRecord::ChildList {
            target: MutationTarget::Head,
            added: vec![id.to_string()],
            removed: Vec::new(),
        });
        Ok(())
    }

    fn element_text(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|element| element.text.clone())
    }

    fn set_element_text(&mut self, id: &str, text: &str) -> Result<(), DomError> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| DomError::MissingElement(id.to_string()))?;
        element.text = text.to_string();
        Ok(())
    }

    fn observe(&mut self, options: ObserveOptions, callback: MutationCallback) -> Subscription {
        let subscription = Subscription::new();
        self.observers.push(Observer {
            options,
            callback,
            subscription: subscription.clone(),
        });
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_observer(
        doc: &mut VirtualDocument,
        options: ObserveOptions,
    ) -> (Subscription, Rc<RefCell<Vec<MutationRecord>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = doc.observe(
            options,
            Box::new(move |batch, _doc| sink.borrow_mut().extend_from_slice(batch)),
        );
        (sub, seen)
    }

    #[test]
    fn records_wait_for_checkpoint() {
        let mut doc = VirtualDocument::with_root_classes(&["theme-dark"]);
        let (_sub, seen) = recording_observer(&mut doc, ObserveOptions::root_attributes(&["class"]));
        doc.remove_root_class("theme-dark");
        assert!(seen.borrow().is_empty());
        assert_eq!(doc.deliver_mutations(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn attribute_observer_ignores_head_children() {
        let mut doc = VirtualDocument::new();
        let (_sub, seen) = recording_observer(&mut doc, ObserveOptions::root_attributes(&["class"]));
        doc.create_style_element("s").unwrap();
        doc.remove_element("s");
        assert_eq!(doc.deliver_mutations(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn child_list_observer_sees_head_children_only() {
        let mut doc = VirtualDocument::new();
        let options = ObserveOptions {
            child_list: true,
            ..ObserveOptions::default()
        };
        let (_sub, seen) = recording_observer(&mut doc, options);
        doc.create_style_element("s").unwrap();
        doc.set_root_class_attribute("theme-dark");
        doc.remove_element("s");
        assert_eq!(doc.deliver_mutations(), 1);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|record| record.target() == &MutationTarget::Head));
        assert_eq!(
            seen[1],
            MutationRecord::ChildList {
                target: MutationTarget::Head,
                added: Vec::new(),
                removed: vec!["s".to_string()],
            }
        );
    }

    #[test]
    fn disposed_observer_is_dropped() {
        let mut doc = VirtualDocument::new();
        let (sub, seen) = recording_observer(&mut doc, ObserveOptions::root_attributes(&[]));
        assert_eq!(doc.active_observers(), 1);
        sub.dispose();
        doc.set_root_class_attribute("a b");
        doc.deliver_mutations();
        assert!(seen.borrow().is_empty());
        assert_eq!(doc.active_observers(), 0);
    }

    #[test]
    fn add_root_class_is_idempotent() {
        let mut doc = VirtualDocument::new();
        doc.add_root_class("x").unwrap();
        doc.add_root_class("x").unwrap();
        assert_eq!(doc.root_classes(), vec!["x".to_string()]);
        assert_eq!(doc.pending_records(), 1);
    }

    #[test]
    fn missing_targets_are_reported() {
        let mut rootless = VirtualDocument::without_root();
        assert_eq!(rootless.add_root_class("x"), Err(DomError::MissingRoot));
        let mut headless = VirtualDocument::without_head();
        assert_eq!(headless.create_style_element("s"), Err(DomError::MissingHead));
    }

    #[test]
    fn callback_mutations_are_delivered_in_later_rounds() {
        let mut doc = VirtualDocument::new();
        let _sub = doc.observe(
            ObserveOptions::root_attributes(&["class"]),
            Box::new(|_batch, doc| {
                if !doc.root_has_class("restored") {
                    let _ = doc.add_root_class("restored");
                }
            }),
        );
        doc.set_root_class_attribute("host-render");
        assert_eq!(doc.deliver_mutations(), 2);
        assert!(doc.root_has_class("restored"));
        assert_eq!(doc.pending_records(), 0);
    }
}
