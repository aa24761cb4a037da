use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dom::document::Document;
use crate::dom::dom_model::{BoundingBox, NodeId};

/// Everything captured about an element at snap time. Display/forensic
/// data only — re-identification goes through the selector and the
/// suppression marker, never through the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    #[serde(rename = "className")]
    pub class_name: String,
    pub id: String,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
    pub position: BoundingBox,
    pub styles: String,
    pub url: String,
    pub title: String,
}

/// The payload a page agent sends when saving a snapped element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementCapture {
    pub selector: String,
    pub descriptor: String,
    #[serde(flatten)]
    pub snapshot: ElementSnapshot,
}

impl ElementCapture {
    /// Capture an element from the live document with its selector.
    pub fn from_node(doc: &Document, node: NodeId, selector: &str) -> Self {
        let el = doc.element(node);
        ElementCapture {
            selector: selector.to_string(),
            descriptor: el.descriptor(),
            snapshot: ElementSnapshot {
                tag_name: el.tag.to_ascii_uppercase(),
                class_name: el.class_attr().to_string(),
                id: el.attr("id").unwrap_or("").to_string(),
                inner_html: doc.inner_html(node),
                outer_html: doc.outer_html(node),
                position: el.rect,
                styles: el.style_text(),
                url: doc.url.clone(),
                title: doc.title.clone(),
            },
        }
    }
}

/// One durable record per snapped element. Created on snap, never
/// mutated, deleted only by restore / restore-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenElementRecord {
    pub id: String,
    pub capture: ElementCapture,
    #[serde(rename = "deletedAt")]
    pub deleted_at: DateTime<Utc>,
}

impl HiddenElementRecord {
    pub fn new(capture: ElementCapture) -> Self {
        HiddenElementRecord {
            id: new_element_id(),
            capture,
            deleted_at: Utc::now(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.capture.selector
    }
}

const ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque record id: `element_<unix millis>_<9 base36 chars>`.
pub fn new_element_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("element_{}_{}", Utc::now().timestamp_millis(), suffix)
}
