use std::collections::HashMap;

use crate::dom::document::Document;
use crate::dom::dom_model::{ElementData, NodeId};
use crate::selector::matcher::css_escape;

/// Ancestor segments accumulated before the walk gives up on uniqueness.
pub const MAX_SELECTOR_DEPTH: usize = 5;

/// Derives a CSS selector identifying an element within its document.
///
/// The id-based terminal case is preferred: page-unique ids give an O(1)
/// `#id` selector. Otherwise the generator walks toward the body building
/// `tag.class…` segments, adding `:nth-of-type(n)` only when same-tag
/// siblings force disambiguation, and stops at the depth cap — collisions
/// past the cap are an accepted limitation, not an error.
///
/// Results are cached per generator (one page load) keyed by tag + id +
/// raw class string, since restore paths regenerate the same selectors.
pub struct SelectorGenerator {
    max_depth: usize,
    cache: HashMap<String, String>,
}

impl Default for SelectorGenerator {
    fn default() -> Self {
        SelectorGenerator::new(MAX_SELECTOR_DEPTH)
    }
}

impl SelectorGenerator {
    pub fn new(max_depth: usize) -> Self {
        SelectorGenerator {
            max_depth: max_depth.max(1),
            cache: HashMap::new(),
        }
    }

    /// Never fails: degenerate inputs degrade to the bare tag name.
    pub fn generate(&mut self, doc: &Document, node: NodeId) -> String {
        let key = cache_key(doc.element(node));
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let selector = self.build(doc, node);
        self.cache.insert(key, selector.clone());
        selector
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    fn build(&self, doc: &Document, node: NodeId) -> String {
        if let Some(id) = doc.element(node).id() {
            return format!("#{}", css_escape(id));
        }

        let mut path: Vec<String> = Vec::new();
        let mut current = node;
        loop {
            let el = doc.element(current);
            let mut segment = el.tag.clone();
            for class in el.classes() {
                segment.push('.');
                segment.push_str(&css_escape(class));
            }
            let (index, count) = doc.same_tag_position(current);
            if count > 1 {
                segment.push_str(&format!(":nth-of-type({})", index));
            }
            path.push(segment);

            match doc.parent(current) {
                Some(p) if p != doc.body() && p != doc.root() && path.len() < self.max_depth => {
                    current = p;
                }
                _ => break,
            }
        }

        if path.is_empty() {
            return doc.element(node).tag.clone();
        }
        path.reverse();
        path.join(" ")
    }
}

fn cache_key(el: &ElementData) -> String {
    format!(
        "{}\u{1}{}\u{1}{}",
        el.tag,
        el.attr("id").unwrap_or(""),
        el.class_attr()
    )
}
