//! Writes compiled CSS into the page.
//!
//! The applier is the only code that touches the engine's style element or
//! the root activation class.

use crate::dom::Document;
use crate::error::DomError;

/// Result of one apply call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Style element created and written.
    Inserted,
    /// Existing style element overwritten.
    Updated,
    /// Empty CSS; the document was left alone.
    Skipped,
}

/// Upserts one style element by id and marks the root as themed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleApplier {
    style_id: String,
    activation_class: String,
}

impl StyleApplier {
    pub fn new(style_id: impl Into<String>, activation_class: impl Into<String>) -> Self {
        Self {
            style_id: style_id.into(),
            activation_class: activation_class.into(),
        }
    }

    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    pub fn activation_class(&self) -> &str {
        &self.activation_class
    }

    /// Write `css` into the style element and ensure the activation class.
    ///
    /// Missing targets are checked up front so a failed apply never leaves the
    /// style element and the class out of step.
    pub fn apply(&self, document: &mut dyn Document, css: &str) -> Result<ApplyOutcome, DomError> {
        if css.is_empty() {
            return Ok(ApplyOutcome::Skipped);
        }
        if !document.has_root() {
            return Err(DomError::MissingRoot);
        }
        let exists = document.has_element(&self.style_id);
        if !exists && !document.has_head() {
            return Err(DomError::MissingHead);
        }

        if !exists {
            document.create_style_element(&self.style_id)?;
        }
        document.set_element_text(&self.style_id, css)?;
        if !document.root_has_class(&self.activation_class) {
            document.add_root_class(&self.activation_class)?;
        }

        Ok(if exists {
            ApplyOutcome::Updated
        } else {
            ApplyOutcome::Inserted
        })
    }

    /// Both halves of the applied state are present.
    pub fn is_intact(&self, document: &dyn Document) -> bool {
        document.root_has_class(&self.activation_class) && document.has_element(&self.style_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VirtualDocument;

    fn applier() -> StyleApplier {
        StyleApplier::new("tc-style", "tc-on")
    }

    #[test]
    fn first_apply_inserts_then_updates() {
        let mut doc = VirtualDocument::with_root_classes(&["theme-dark"]);
        let applier = applier();
        assert_eq!(applier.apply(&mut doc, "a{}"), Ok(ApplyOutcome::Inserted));
        assert_eq!(applier.apply(&mut doc, "b{}"), Ok(ApplyOutcome::Updated));
        assert_eq!(doc.element_text("tc-style").as_deref(), Some("b{}"));
        assert_eq!(doc.style_ids(), vec!["tc-style".to_string()]);
        assert_eq!(
            doc.root_classes(),
            vec!["theme-dark".to_string(), "tc-on".to_string()]
        );
        assert!(applier.is_intact(&doc));
    }

    #[test]
    fn empty_css_is_a_no_op() {
        let mut doc = VirtualDocument::new();
        let applier = applier();
        assert_eq!(applier.apply(&mut doc, ""), Ok(ApplyOutcome::Skipped));
        assert!(!doc.has_element("tc-style"));
        assert!(!doc.root_has_class("tc-on"));
    }

    #[test]
    fn empty_css_keeps_existing_activation() {
        let mut doc = VirtualDocument::new();
        let applier = applier();
        applier.apply(&mut doc, "a{}").unwrap();
        applier.apply(&mut doc, "").unwrap();
        assert!(doc.root_has_class("tc-on"));
        assert_eq!(doc.element_text("tc-style").as_deref(), Some("a{}"));
    }

    #[test]
    fn missing_targets_leave_document_untouched() {
        let applier = applier();

        let mut rootless = VirtualDocument::without_root();
        assert_eq!(applier.apply(&mut rootless, "a{}"), Err(DomError::MissingRoot));
        assert!(!rootless.has_element("tc-style"));

        let mut headless = VirtualDocument::without_head();
        assert_eq!(applier.apply(&mut headless, "a{}"), Err(DomError::MissingHead));
        assert!(!headless.root_has_class("tc-on"));
    }

    #[test]
    fn restores_class_without_recreating_style() {
        let mut doc = VirtualDocument::new();
        let applier = applier();
        applier.apply(&mut doc, "a{}").unwrap();
        doc.remove_root_class("tc-on");
        assert!(!applier.is_intact(&doc));
        assert_eq!(applier.apply(&mut doc, "a{}"), Ok(ApplyOutcome::Updated));
        assert!(applier.is_intact(&doc));
    }
}
