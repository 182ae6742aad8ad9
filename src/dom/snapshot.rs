//! Build a `VirtualDocument` from a saved HTML page.
//!
//! Only what the engine reads survives the import: root classes, whether a
//! head exists, and elements that carry an id (with their text).

use scraper::{Html, Selector};

use crate::error::DomError;

use super::VirtualDocument;

impl VirtualDocument {
    /// Parse an HTML snapshot of the host page.
    pub fn from_html(html: &str) -> Result<Self, DomError> {
        let parsed = Html::parse_document(html);
        let root_sel = selector("html")?;
        let head_sel = selector("head")?;
        let id_sel = selector("[id]")?;

        // `Element::classes` is a hash set; keep the attribute's token order.
        let root = parsed.select(&root_sel).next().map(|root| {
            root.value()
                .attr("class")
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        // The parser synthesizes a head for any document, as browsers do.
        let head = parsed.select(&head_sel).next().is_some();
        let elements = parsed
            .select(&id_sel)
            .filter_map(|element| {
                let id = element.value().id()?.to_string();
                let tag = element.value().name().to_string();
                let text = element.text().collect::<String>();
                Some((id, tag, text))
            })
            .collect();

        Ok(Self::from_parts(root, head, elements))
    }
}

fn selector(raw: &str) -> Result<Selector, DomError> {
    Selector::parse(raw).map_err(|err| DomError::Snapshot(format!("selector `{raw}`: {err:?}")))
}
