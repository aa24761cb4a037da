use crate::coordinator::messages::{CoordinatorResponse, Message, MessageSender, TabId};
use crate::error::SnapHideError;
use crate::store::store::ElementStore;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// The privileged persistent process: owns the element store and the
/// per-tab activation booleans, and answers every store-facing request.
/// Tab-targeted page delivery is the `TabHost`'s job.
pub struct Background {
    store: ElementStore,
    focused_tab: Option<TabId>,
}

impl Background {
    pub fn new(store: ElementStore) -> Self {
        Background {
            store,
            focused_tab: None,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.store
    }

    /// The currently focused tab, the last fallback for requests arriving
    /// without any tab context (popup).
    pub fn set_focused_tab(&mut self, tab: Option<TabId>) {
        self.focused_tab = tab;
    }

    /// Tab context resolution: explicit id, then sender tab, then the
    /// focused tab.
    pub fn resolve_tab(&self, explicit: Option<TabId>, sender: &MessageSender) -> Option<TabId> {
        explicit.or(sender.tab).or(self.focused_tab)
    }

    /// Icon-click toggle: flip the persisted bit, return the new state.
    pub fn toggle_tab(&mut self, tab: TabId) -> Result<bool, SnapHideError> {
        let next = !self.store.is_active(tab)?;
        self.store.set_active(tab, next)?;
        Ok(next)
    }

    /// Drop a hostname's whole record partition (restore-all).
    pub fn clear_hostname(&mut self, hostname: &str) -> Result<(), SnapHideError> {
        self.store.remove_all(hostname)
    }

    /// Handle one request. Store failures come back as `success: false`
    /// with the error string; nothing here is fatal to a page.
    pub fn handle(
        &mut self,
        request: &Message,
        sender: &MessageSender,
        tracer: &TraceLogger,
    ) -> CoordinatorResponse {
        match request {
            Message::ToggleSnapHide { active, tab_id, .. } => {
                let Some(tab) = self.resolve_tab(*tab_id, sender) else {
                    return CoordinatorResponse::failed("no tab context for toggle");
                };
                match self.store.set_active(tab, *active) {
                    Ok(()) => {
                        tracer.log(&TraceEvent::ActivationChanged {
                            tab,
                            active: *active,
                        });
                        CoordinatorResponse::ok()
                    }
                    Err(e) => CoordinatorResponse::failed(e),
                }
            }

            Message::GetExtensionState { tab_id } => {
                match self.resolve_tab(*tab_id, sender) {
                    None => CoordinatorResponse::ok().with_active(false),
                    Some(tab) => match self.store.is_active(tab) {
                        Ok(active) => CoordinatorResponse::ok().with_active(active),
                        Err(e) => CoordinatorResponse::failed(e),
                    },
                }
            }

            Message::SaveDeletedElement { element, hostname } => {
                match self.store.append(hostname, element.clone()) {
                    Ok(record) => {
                        tracer.log(&TraceEvent::ElementSaved {
                            hostname: hostname.clone(),
                            element_id: record.id.clone(),
                            selector: record.selector().to_string(),
                        });
                        CoordinatorResponse::ok().with_element_id(record.id)
                    }
                    Err(e) => CoordinatorResponse::failed(e),
                }
            }

            Message::GetDeletedElements { hostname } => match self.store.list(hostname) {
                Ok(elements) => CoordinatorResponse::ok().with_elements(elements),
                Err(e) => CoordinatorResponse::failed(e),
            },

            Message::RestoreElement {
                element_id,
                hostname,
            } => match self.store.remove(hostname, element_id) {
                // Absent id is a no-op, not an error: restore idempotence
                Ok(removed) => {
                    if removed {
                        tracer.log(&TraceEvent::ElementRestored {
                            hostname: hostname.clone(),
                            element_id: element_id.clone(),
                        });
                    }
                    CoordinatorResponse::ok()
                }
                Err(e) => CoordinatorResponse::failed(e),
            },

            // Tab-targeted; only the TabHost knows which page to clear
            Message::RestoreAllElements => {
                CoordinatorResponse::failed("RESTORE_ALL_ELEMENTS requires tab routing")
            }

            Message::GetAllWebsites => match self.store.all_websites() {
                Ok(websites) => CoordinatorResponse::ok().with_websites(websites),
                Err(e) => CoordinatorResponse::failed(e),
            },
        }
    }
}
