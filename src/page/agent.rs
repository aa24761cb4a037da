use crate::activation::machine::{
    ActivationMachine, OVERLAY_CLASS, NOTICE_ID, PageEvent, UiCommand,
};
use crate::coordinator::background::Background;
use crate::coordinator::messages::{Message, MessageSender, TabId};
use crate::dom::document::Document;
use crate::dom::dom_model::{ElementData, NodeId};
use crate::hiding::effects::SnapEffects;
use crate::hiding::engine::HidingEngine;
use crate::hiding::observer::{COALESCE_WINDOW_MS, FRAME_CHUNK, MutationBatcher};
use crate::store::record::new_element_id;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Tunables a page agent is built with.
#[derive(Debug, Clone, Copy)]
pub struct PageSettings {
    pub coalesce_window_ms: u64,
    pub frame_chunk: usize,
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            coalesce_window_ms: COALESCE_WINDOW_MS,
            frame_chunk: FRAME_CHUNK,
        }
    }
}

/// The per-page-load agent: one document, one hiding engine, one
/// activation machine, one mutation batcher. Everything a content
/// script does, minus rendering.
pub struct PageAgent {
    tab: TabId,
    doc: Document,
    hostname: String,
    engine: HidingEngine,
    machine: ActivationMachine,
    batcher: MutationBatcher,
    overlay: Option<NodeId>,
    notice: Option<NodeId>,
}

impl PageAgent {
    pub fn new(tab: TabId, doc: Document) -> Self {
        PageAgent::with_parts(tab, doc, HidingEngine::default(), PageSettings::default())
    }

    pub fn with_effects(tab: TabId, doc: Document, effects: Box<dyn SnapEffects>) -> Self {
        PageAgent::with_parts(tab, doc, HidingEngine::new(effects), PageSettings::default())
    }

    pub fn with_parts(
        tab: TabId,
        doc: Document,
        engine: HidingEngine,
        settings: PageSettings,
    ) -> Self {
        let hostname = doc.hostname();
        PageAgent {
            tab,
            doc,
            hostname,
            engine,
            machine: ActivationMachine::default(),
            batcher: MutationBatcher::new(settings.coalesce_window_ms, settings.frame_chunk),
            overlay: None,
            notice: None,
        }
    }

    /// Load-time sequence, in priority order: rehydrate the hidden set
    /// and apply suppression first, then pick up the tab's activation
    /// state, then start observing mutations.
    pub fn init(&mut self, background: &mut Background, tracer: &TraceLogger, now_ms: u64) {
        let sender = MessageSender::tab(self.tab);

        let response = background.handle(
            &Message::GetDeletedElements {
                hostname: self.hostname.clone(),
            },
            &sender,
            tracer,
        );
        let selectors: Vec<String> = response
            .elements
            .unwrap_or_default()
            .iter()
            .map(|r| r.selector().to_string())
            .collect();
        self.engine.set_selectors(selectors);
        self.engine.apply_hidden_styles(&mut self.doc, tracer);

        let body = self.doc.body();
        let overlay = self
            .doc
            .append_child(body, ElementData::new("div").with_class(OVERLAY_CLASS));
        self.doc.element_mut(overlay).set_style("display", "none", false);
        self.overlay = Some(overlay);

        let response = background.handle(
            &Message::GetExtensionState {
                tab_id: Some(self.tab),
            },
            &sender,
            tracer,
        );
        if response.active == Some(true) {
            self.apply_activation(true, now_ms);
        }

        // Everything built so far is initial content, not a mutation
        self.doc.take_inserted();
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable page access; insertions made here are picked up by the
    /// next `pump` like any other dynamic content.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    pub fn hidden_selectors(&self) -> &[String] {
        self.engine.selectors()
    }

    pub fn overlay_node(&self) -> Option<NodeId> {
        self.overlay
    }

    pub fn notice_node(&self) -> Option<NodeId> {
        self.notice
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.batcher.is_idle()
    }

    /// Mode flip delivered by the coordinator. Returns the UI commands
    /// that were executed, for the embedding surface.
    pub fn apply_activation(&mut self, active: bool, now_ms: u64) -> Vec<UiCommand> {
        let commands = self.machine.set_active(active, now_ms);
        for command in &commands {
            self.apply_ui(command);
        }
        commands
    }

    /// Route one pointer/key event through the machine and execute what
    /// it decides. The full command list (including `PreventDefault`) is
    /// returned so the surface can honor it too.
    pub fn handle_page_event(
        &mut self,
        event: PageEvent,
        background: &mut Background,
        tracer: &TraceLogger,
        now_ms: u64,
    ) -> Vec<UiCommand> {
        let commands = self.machine.handle_event(&self.doc, event);
        for command in commands.clone() {
            match command {
                UiCommand::Snap { target } => {
                    self.snap_element(target, background, tracer);
                }
                UiCommand::RequestDeactivate => {
                    background.handle(
                        &Message::ToggleSnapHide {
                            active: false,
                            tab_id: Some(self.tab),
                            from_content_script: true,
                        },
                        &MessageSender::tab(self.tab),
                        tracer,
                    );
                    self.apply_activation(false, now_ms);
                }
                other => self.apply_ui(&other),
            }
        }
        commands
    }

    /// Snap one element: capture, persist, suppress. If persistence
    /// fails the element is still hidden under a locally generated id;
    /// the record is simply absent until the user snaps again.
    pub fn snap_element(
        &mut self,
        node: NodeId,
        background: &mut Background,
        tracer: &TraceLogger,
    ) -> Option<String> {
        if self.engine.is_suppressed(&self.doc, node) {
            return None;
        }

        let capture = self.engine.capture(&self.doc, node);
        let selector = capture.selector.clone();
        let response = background.handle(
            &Message::SaveDeletedElement {
                element: capture,
                hostname: self.hostname.clone(),
            },
            &MessageSender::tab(self.tab),
            tracer,
        );

        let element_id = match response.element_id {
            Some(id) if response.success => id,
            _ => {
                tracer.log(&TraceEvent::MessageFailed {
                    message_type: "SAVE_DELETED_ELEMENT".to_string(),
                    reason: response
                        .error
                        .unwrap_or_else(|| "no element id in response".to_string()),
                });
                new_element_id()
            }
        };

        self.engine
            .commit(&mut self.doc, node, &element_id, selector, tracer);
        self.apply_ui(&UiCommand::HideOverlay);
        Some(element_id)
    }

    /// Restore one element by record id. No-op when nothing on the page
    /// carries the marker (already restored, or never on this page).
    pub fn restore_element(&mut self, element_id: &str, tracer: &TraceLogger) -> bool {
        self.engine.restore_by_id(&mut self.doc, element_id, tracer)
    }

    /// Restore every suppressed element and clear the runtime index.
    pub fn restore_all(&mut self, tracer: &TraceLogger) -> usize {
        self.engine.restore_all(&mut self.doc, tracer)
    }

    /// One cooperative frame: notice dismissal, then one chunk of
    /// mutation matching. A burst of insertions larger than the chunk
    /// size drains over successive frames.
    pub fn pump(&mut self, now_ms: u64) {
        for command in self.machine.pump(now_ms) {
            self.apply_ui(&command);
        }

        for node in self.doc.take_inserted() {
            self.batcher.record(node, now_ms);
        }

        let chunk = self.batcher.pump(now_ms);
        if !chunk.is_empty() {
            self.engine.process_inserted(&mut self.doc, &chunk);
        }
    }

    fn apply_ui(&mut self, command: &UiCommand) {
        match command {
            UiCommand::SetCursor(cursor) => {
                let body = self.doc.body();
                self.doc.element_mut(body).set_style("cursor", cursor, false);
            }
            UiCommand::ClearCursor => {
                let body = self.doc.body();
                self.doc.element_mut(body).clear_style("cursor");
            }
            UiCommand::ShowNotice => {
                if self.notice.is_none_or(|n| !self.doc.is_attached(n)) {
                    let notice = ElementData::new("div")
                        .with_id(NOTICE_ID)
                        .with_class("snaphide-activation-message")
                        .with_text("SnapHide Active");
                    let body = self.doc.body();
                    self.notice = Some(self.doc.append_child(body, notice));
                }
            }
            UiCommand::DismissNotice => {
                if let Some(notice) = self.notice.take() {
                    self.doc.detach(notice);
                }
            }
            UiCommand::ShowOverlay { target, descriptor } => {
                if let Some(overlay) = self.overlay {
                    let rect = self.doc.element(*target).rect;
                    let el = self.doc.element_mut(overlay);
                    el.set_style("display", "block", false);
                    el.set_style("left", &format!("{}px", rect.left), false);
                    el.set_style("top", &format!("{}px", rect.top), false);
                    el.set_style("width", &format!("{}px", rect.width), false);
                    el.set_style("height", &format!("{}px", rect.height), false);
                    el.text = Some(descriptor.clone());
                }
            }
            UiCommand::HideOverlay => {
                if let Some(overlay) = self.overlay {
                    self.doc.element_mut(overlay).set_style("display", "none", false);
                }
            }
            // Snap / RequestDeactivate are routed by the caller;
            // PreventDefault is for the embedding surface
            UiCommand::PreventDefault
            | UiCommand::Snap { .. }
            | UiCommand::RequestDeactivate => {}
        }
    }
}
