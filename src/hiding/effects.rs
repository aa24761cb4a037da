use crate::dom::document::Document;
use crate::dom::dom_model::NodeId;

/// Cosmetic disintegration/restoration transitions (and sound), supplied
/// by an external collaborator. Resolved once at construction; the engine
/// never checks for its presence at call sites.
pub trait SnapEffects {
    /// Runs before an element is suppressed.
    fn disintegrate(&mut self, doc: &Document, node: NodeId);

    /// Runs after an element is restored. `delay_ms` staggers restore-all
    /// so every element does not pop back in at once.
    fn restore(&mut self, doc: &Document, node: NodeId, delay_ms: u64);
}

/// Default when no effects collaborator is installed.
pub struct NoEffects;

impl SnapEffects for NoEffects {
    fn disintegrate(&mut self, _doc: &Document, _node: NodeId) {}

    fn restore(&mut self, _doc: &Document, _node: NodeId, _delay_ms: u64) {}
}
