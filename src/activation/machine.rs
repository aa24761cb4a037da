use crate::dom::document::Document;
use crate::dom::dom_model::NodeId;

/// How long the activation notice stays up before auto-dismissing.
pub const NOTICE_DURATION_MS: u64 = 2000;

/// Class of the hover highlight overlay element.
pub const OVERLAY_CLASS: &str = "snaphide-overlay";
/// Id of the transient activation notice element.
pub const NOTICE_ID: &str = "snaphide-activation-message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Inactive,
    Active,
}

/// Pointer/key events delivered from the page while listeners are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    MouseOver(NodeId),
    MouseOut(NodeId),
    /// Capture-phase click; default behavior is always suppressed.
    Click(NodeId),
    ContextMenu(NodeId),
    KeyDown(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// What the embedding page surface must do in response to an event or a
/// mode change. The machine decides; it never touches the DOM itself.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SetCursor(&'static str),
    ClearCursor,
    ShowNotice,
    DismissNotice,
    ShowOverlay { target: NodeId, descriptor: String },
    HideOverlay,
    /// Swallow the event: no navigation, no submit, no context menu.
    PreventDefault,
    Snap { target: NodeId },
    /// Escape pressed: ask the coordinator to flip the persisted state.
    RequestDeactivate,
}

/// Per-page-load Active/Inactive machine. The boolean itself is persisted
/// per tab by the coordinator; this machine only lives until navigation.
pub struct ActivationMachine {
    mode: Mode,
    hovered: Option<NodeId>,
    notice_deadline: Option<u64>,
}

impl Default for ActivationMachine {
    fn default() -> Self {
        ActivationMachine {
            mode: Mode::Inactive,
            hovered: None,
            notice_deadline: None,
        }
    }
}

impl ActivationMachine {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == Mode::Active
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Explicit toggle from the coordinator. Entry into Active sets the
    /// cursor affordance and the transient notice; entry into Inactive
    /// reverses everything and drops the highlight.
    pub fn set_active(&mut self, active: bool, now_ms: u64) -> Vec<UiCommand> {
        match (self.mode, active) {
            (Mode::Inactive, true) => {
                self.mode = Mode::Active;
                self.notice_deadline = Some(now_ms + NOTICE_DURATION_MS);
                vec![UiCommand::SetCursor("crosshair"), UiCommand::ShowNotice]
            }
            (Mode::Active, false) => {
                self.mode = Mode::Inactive;
                self.hovered = None;
                self.notice_deadline = None;
                vec![
                    UiCommand::ClearCursor,
                    UiCommand::HideOverlay,
                    UiCommand::DismissNotice,
                ]
            }
            _ => Vec::new(),
        }
    }

    /// Route a page event. Inactive mode intercepts nothing (listeners
    /// are off). Extension-owned elements are never hover or snap
    /// targets.
    pub fn handle_event(&mut self, doc: &Document, event: PageEvent) -> Vec<UiCommand> {
        if self.mode != Mode::Active {
            return Vec::new();
        }

        match event {
            PageEvent::MouseOver(target) => {
                if is_extension_element(doc, target) {
                    return Vec::new();
                }
                self.hovered = Some(target);
                vec![UiCommand::ShowOverlay {
                    target,
                    descriptor: doc.element(target).descriptor(),
                }]
            }
            PageEvent::MouseOut(target) => {
                if is_extension_element(doc, target) {
                    return Vec::new();
                }
                self.hovered = None;
                vec![UiCommand::HideOverlay]
            }
            PageEvent::Click(target) => {
                if is_extension_element(doc, target) {
                    return Vec::new();
                }
                let mut commands = vec![UiCommand::PreventDefault, UiCommand::HideOverlay];
                if let Some(hovered) = self.hovered {
                    commands.push(UiCommand::Snap { target: hovered });
                }
                commands
            }
            PageEvent::ContextMenu(target) => {
                if is_extension_element(doc, target) {
                    Vec::new()
                } else {
                    vec![UiCommand::PreventDefault]
                }
            }
            PageEvent::KeyDown(Key::Escape) => vec![UiCommand::RequestDeactivate],
            PageEvent::KeyDown(Key::Other) => Vec::new(),
        }
    }

    /// Time-driven work: dismiss the activation notice once its deadline
    /// passes.
    pub fn pump(&mut self, now_ms: u64) -> Vec<UiCommand> {
        if self.notice_deadline.is_some_and(|d| now_ms >= d) {
            self.notice_deadline = None;
            return vec![UiCommand::DismissNotice];
        }
        Vec::new()
    }
}

/// Overlay, notice, and particle nodes belong to the extension and are
/// ignored by hover/click handling.
pub fn is_extension_element(doc: &Document, node: NodeId) -> bool {
    doc.closest(node, |el| {
        el.has_class(OVERLAY_CLASS)
            || el.id() == Some(NOTICE_ID)
            || el.has_class("snaphide-particle")
            || el.has_class("snaphide-dust-particle")
    })
    .is_some()
}
