use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle into a `Document`'s element arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Layout box of an element at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// One inline style declaration, with its priority flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProperty {
    pub value: String,
    pub important: bool,
}

/// An element's own data: tag, attributes, inline styles, text, layout box.
///
/// `id`, `class` and `name` live in the attribute map like everything else;
/// the accessors below give the views the rest of the crate needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, StyleProperty>,
    pub text: Option<String>,
    pub rect: BoundingBox,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: None,
            rect: BoundingBox::default(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.attributes.insert("id".into(), id.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.attributes.insert("class".into(), class.into());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Non-empty `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|v| !v.is_empty())
    }

    /// Raw `class` attribute string (may hold several names).
    pub fn class_attr(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Class names, whitespace-split, empties dropped.
    pub fn classes(&self) -> Vec<&str> {
        self.class_attr()
            .split_whitespace()
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| *c == class)
    }

    /// Human-readable label: name attribute, id, first class, or tag name,
    /// in that priority order.
    pub fn descriptor(&self) -> String {
        if let Some(name) = self.attr("name").filter(|v| !v.is_empty()) {
            return name.to_string();
        }
        if let Some(id) = self.id() {
            return id.to_string();
        }
        if let Some(first) = self.classes().first() {
            return first.to_string();
        }
        self.tag.clone()
    }

    pub fn set_style(&mut self, property: &str, value: &str, important: bool) {
        self.styles.insert(
            property.into(),
            StyleProperty {
                value: value.into(),
                important,
            },
        );
    }

    pub fn clear_style(&mut self, property: &str) {
        self.styles.remove(property);
    }

    pub fn style(&self, property: &str) -> Option<&StyleProperty> {
        self.styles.get(property)
    }

    /// Inline style text in declaration order (`prop: value !important; …`).
    pub fn style_text(&self) -> String {
        let mut out = String::new();
        for (prop, decl) in &self.styles {
            out.push_str(prop);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push_str("; ");
        }
        out.trim_end().to_string()
    }
}

/// Arena slot: element data plus tree links.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub data: ElementData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}
