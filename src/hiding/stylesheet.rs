use crate::dom::document::Document;
use crate::dom::dom_model::{ElementData, NodeId};

/// Id of the injected style element carrying all suppression rules.
pub const STYLE_ELEMENT_ID: &str = "snaphide-hidden-styles";

/// One combined rule hiding every selector in the set.
pub fn hidden_rule(selectors: &[String]) -> String {
    format!(
        "{} {{ display: none !important; visibility: hidden !important; opacity: 0 !important; }}",
        selectors.join(", ")
    )
}

/// Replace the suppression stylesheet with one covering `selectors`.
///
/// The new style element is prepended to head, not appended, so later
/// page stylesheets cannot win cascade ordering against it. Remove-old-
/// then-insert-new is atomic from the page's point of view: CSS matching
/// is synchronous, so there is no flicker window.
pub fn apply(doc: &mut Document, selectors: &[String]) -> Option<NodeId> {
    if let Some(existing) = find(doc) {
        doc.detach(existing);
    }
    if selectors.is_empty() {
        return None;
    }
    let style = ElementData::new("style")
        .with_id(STYLE_ELEMENT_ID)
        .with_text(&hidden_rule(selectors));
    let head = doc.head();
    Some(doc.insert_first_child(head, style))
}

/// The injected style element, if present.
pub fn find(doc: &Document) -> Option<NodeId> {
    doc.find_by_attr("id", STYLE_ELEMENT_ID)
        .filter(|n| doc.element(*n).tag == "style")
}

/// Rule text currently injected, if any.
pub fn injected_css(doc: &Document) -> Option<String> {
    find(doc).and_then(|n| doc.element(n).text.clone())
}
