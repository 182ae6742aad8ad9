//! Document model the engine writes into.
//!
//! `Document` is the narrow slice of the DOM the engine touches: the root's
//! class list, the head, elements by id, and root-attribute observation. A
//! browser binding implements it over the real page; `VirtualDocument` is the
//! in-process implementation used by the CLI and tests.

mod snapshot;
mod virtual_doc;

use std::cell::Cell;
use std::rc::Rc;

use crate::error::DomError;

pub use virtual_doc::VirtualDocument;

/// Node a mutation record refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationTarget {
    Root,
    Head,
}

/// One observed change, shaped after the browser's `MutationRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// An attribute changed on the target.
    Attributes {
        target: MutationTarget,
        attribute: String,
        old_value: Option<String>,
    },
    /// Children were added to or removed from the target.
    ChildList {
        target: MutationTarget,
        added: Vec<String>,
        removed: Vec<String>,
    },
}

impl MutationRecord {
    pub fn target(&self) -> &MutationTarget {
        match self {
            Self::Attributes { target, .. } | Self::ChildList { target, .. } => target,
        }
    }
}

/// What an observer wants to hear about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Deliver attribute records on the root.
    pub attributes: bool,
    /// Only these attribute names; empty means all.
    pub attribute_filter: Vec<String>,
    /// Deliver child-list records on the head.
    pub child_list: bool,
}

impl ObserveOptions {
    /// Root attribute changes restricted to the given names.
    pub fn root_attributes(filter: &[&str]) -> Self {
        Self {
            attributes: true,
            attribute_filter: filter.iter().map(|name| name.to_string()).collect(),
            child_list: false,
        }
    }

    /// True when `record` should reach an observer with these options.
    pub fn matches(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::Attributes {
                target: MutationTarget::Root,
                attribute,
                ..
            } => {
                self.attributes
                    && (self.attribute_filter.is_empty()
                        || self.attribute_filter.iter().any(|name| name == attribute))
            }
            MutationRecord::ChildList {
                target: MutationTarget::Head,
                ..
            } => self.child_list,
            _ => false,
        }
    }
}

/// Observer callback. Gets the filtered batch and the document it came from.
pub type MutationCallback = Box<dyn FnMut(&[MutationRecord], &mut dyn Document)>;

/// Disposable handle for one observer registration.
///
/// Dropping the handle does not unsubscribe; only `dispose` does.
#[derive(Debug, Clone)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
        }
    }

    /// Stop delivering to this observer.
    pub fn dispose(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

/// The DOM surface the engine needs.
pub trait Document {
    fn has_root(&self) -> bool;
    fn has_head(&self) -> bool;

    /// Root class tokens in attribute order; empty when there is no root.
    fn root_classes(&self) -> Vec<String>;
    fn root_has_class(&self, class: &str) -> bool {
        self.root_classes().iter().any(|token| token == class)
    }
    /// Add one class token to the root if absent.
    fn add_root_class(&mut self, class: &str) -> Result<(), DomError>;

    /// True when an element with this id is attached anywhere in the document.
    fn has_element(&self, id: &str) -> bool;
    /// Create a `<style id=...>` and attach it to the head.
    fn create_style_element(&mut self, id: &str) -> Result<(), DomError>;
    /// Text content of the element with this id.
    fn element_text(&self, id: &str) -> Option<String>;
    /// Replace the text content of the element with this id.
    fn set_element_text(&mut self, id: &str, text: &str) -> Result<(), DomError>;

    /// Register an observer; records are delivered in batches later.
    fn observe(&mut self, options: ObserveOptions, callback: MutationCallback) -> Subscription;
}
