use crate::dom::document::Document;
use crate::dom::dom_model::NodeId;
use crate::hiding::effects::{NoEffects, SnapEffects};
use crate::hiding::stylesheet;
use crate::selector::generator::SelectorGenerator;
use crate::selector::matcher::{self, CompiledSelector};
use crate::store::record::ElementCapture;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Marker set on every suppressed element; restore lookups scan for it.
pub const DELETED_ATTR: &str = "data-snaphide-deleted";
/// Record id stamped on a snapped element for exact restore-by-id.
pub const ID_ATTR: &str = "data-snaphide-id";

/// Per-element restore delay during restore-all.
pub const RESTORE_STAGGER_MS: u64 = 120;

const SUPPRESSED_PROPS: [(&str, &str); 3] = [
    ("display", "none"),
    ("visibility", "hidden"),
    ("opacity", "0"),
];

/// Keeps every element matching a known selector visually suppressed:
/// via the injected stylesheet (survives cascade ordering), via direct
/// inline properties plus a marker attribute (defends against CSS
/// overrides, enables exact restore), and via matching of newly inserted
/// nodes fed in by the mutation batcher.
pub struct HidingEngine {
    selectors: Vec<String>,
    generator: SelectorGenerator,
    effects: Box<dyn SnapEffects>,
}

impl Default for HidingEngine {
    fn default() -> Self {
        HidingEngine::new(Box::new(NoEffects))
    }
}

impl HidingEngine {
    pub fn new(effects: Box<dyn SnapEffects>) -> Self {
        HidingEngine {
            selectors: Vec::new(),
            generator: SelectorGenerator::default(),
            effects,
        }
    }

    /// Runtime selector index: rebuilt from the store at load, appended
    /// optimistically during the session.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn set_selectors(&mut self, selectors: Vec<String>) {
        self.selectors = selectors;
    }

    pub fn generate_selector(&mut self, doc: &Document, node: NodeId) -> String {
        self.generator.generate(doc, node)
    }

    /// Rebuild the injected stylesheet and re-suppress every current
    /// match directly. Invalid selectors are skipped one by one; the rest
    /// still apply.
    pub fn apply_hidden_styles(&mut self, doc: &mut Document, tracer: &TraceLogger) {
        stylesheet::apply(doc, &self.selectors);

        for selector in &self.selectors {
            match matcher::compile(selector) {
                Ok(compiled) => {
                    for node in compiled.query(doc) {
                        suppress_node(doc, node);
                    }
                }
                Err(e) => {
                    tracer.log(&TraceEvent::SelectorSkipped {
                        selector: selector.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracer.log(&TraceEvent::StylesApplied {
            hostname: doc.hostname(),
            selector_count: self.selectors.len(),
        });
    }

    /// Capture an element: its selector plus the full snapshot. The
    /// caller persists the capture, then calls `commit` with the id the
    /// store assigned.
    pub fn capture(&mut self, doc: &Document, node: NodeId) -> ElementCapture {
        let selector = self.generator.generate(doc, node);
        ElementCapture::from_node(doc, node, &selector)
    }

    /// Suppress a freshly snapped element immediately (belt and braces
    /// ahead of the stylesheet refresh), stamp its record id, and add its
    /// selector to the runtime index.
    pub fn commit(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        element_id: &str,
        selector: String,
        tracer: &TraceLogger,
    ) {
        self.effects.disintegrate(doc, node);
        suppress_node(doc, node);
        doc.element_mut(node)
            .attributes
            .insert(ID_ATTR.into(), element_id.into());
        self.selectors.push(selector);
        self.apply_hidden_styles(doc, tracer);
    }

    /// Whether the element is currently suppressed.
    pub fn is_suppressed(&self, doc: &Document, node: NodeId) -> bool {
        doc.element(node).attr(DELETED_ATTR) == Some("true")
    }

    /// Restore one element, located by its id marker — never by selector,
    /// since the stored selector may by now match unrelated elements.
    /// Returns false (a no-op, not an error) when nothing carries the id.
    pub fn restore_by_id(
        &mut self,
        doc: &mut Document,
        element_id: &str,
        tracer: &TraceLogger,
    ) -> bool {
        let Some(node) = doc.find_by_attr(ID_ATTR, element_id) else {
            return false;
        };
        clear_suppression(doc, node);

        // The regenerated selector is a cache hit from capture time
        let selector = self.generator.generate(doc, node);
        self.selectors.retain(|s| *s != selector);
        self.apply_hidden_styles(doc, tracer);
        self.effects.restore(doc, node, 0);

        tracer.log(&TraceEvent::ElementRestored {
            hostname: doc.hostname(),
            element_id: element_id.to_string(),
        });
        true
    }

    /// Restore every marked element on the page and clear the runtime
    /// index. Restore transitions are staggered per element. Idempotent:
    /// a second call finds nothing marked and an empty index.
    pub fn restore_all(&mut self, doc: &mut Document, tracer: &TraceLogger) -> usize {
        let marked: Vec<NodeId> = doc
            .all_elements()
            .into_iter()
            .filter(|n| doc.element(*n).attr(DELETED_ATTR) == Some("true"))
            .collect();

        for (i, node) in marked.iter().enumerate() {
            clear_suppression(doc, *node);
            self.effects.restore(doc, *node, i as u64 * RESTORE_STAGGER_MS);
        }

        self.selectors.clear();
        self.apply_hidden_styles(doc, tracer);

        tracer.log(&TraceEvent::AllRestored {
            hostname: doc.hostname(),
            count: marked.len(),
        });
        marked.len()
    }

    /// Match a batch of inserted nodes (and their subtrees) against the
    /// selector set and suppress hits. Invalid selectors are skipped, as
    /// in `apply_hidden_styles`; stale selectors matching coincidental
    /// lookalikes is accepted behavior, not a bug (see DESIGN notes).
    pub fn process_inserted(&mut self, doc: &mut Document, nodes: &[NodeId]) {
        let compiled: Vec<CompiledSelector> = self
            .selectors
            .iter()
            .filter_map(|s| matcher::compile(s).ok())
            .collect();
        if compiled.is_empty() {
            return;
        }

        for node in nodes {
            if !doc.is_attached(*node) {
                continue;
            }
            for candidate in doc.descendants_inclusive(*node) {
                if compiled.iter().any(|c| c.matches(doc, candidate)) {
                    suppress_node(doc, candidate);
                }
            }
        }
    }
}

fn suppress_node(doc: &mut Document, node: NodeId) {
    let el = doc.element_mut(node);
    for (prop, value) in SUPPRESSED_PROPS {
        el.set_style(prop, value, true);
    }
    el.attributes.insert(DELETED_ATTR.into(), "true".into());
}

fn clear_suppression(doc: &mut Document, node: NodeId) {
    let el = doc.element_mut(node);
    for (prop, _) in SUPPRESSED_PROPS {
        el.clear_style(prop);
    }
    el.attributes.remove(DELETED_ATTR);
    el.attributes.remove(ID_ATTR);
}
