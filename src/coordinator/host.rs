use std::collections::HashMap;

use crate::activation::machine::{PageEvent, UiCommand};
use crate::coordinator::background::Background;
use crate::coordinator::messages::{CoordinatorResponse, Message, MessageSender, TabId};
use crate::dom::document::Document;
use crate::page::agent::PageAgent;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Owns the background process and the per-tab page agents, and routes
/// messages between them. Delivery to a page whose agent has not loaded
/// is logged and dropped — the next page load rehydrates from the store,
/// so the failure is eventually consistent, never surfaced.
pub struct TabHost {
    background: Background,
    agents: HashMap<TabId, PageAgent>,
    tracer: TraceLogger,
}

impl TabHost {
    pub fn new(background: Background) -> Self {
        TabHost::with_tracer(background, TraceLogger::disabled())
    }

    pub fn with_tracer(background: Background, tracer: TraceLogger) -> Self {
        TabHost {
            background,
            agents: HashMap::new(),
            tracer,
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    pub fn agent(&self, tab: TabId) -> Option<&PageAgent> {
        self.agents.get(&tab)
    }

    pub fn agent_mut(&mut self, tab: TabId) -> Option<&mut PageAgent> {
        self.agents.get_mut(&tab)
    }

    /// A page finished loading in `tab`: build its agent and run the
    /// load-time rehydration (records fetched, styles applied, activation
    /// state picked up) before anything else happens on the page.
    pub fn open_page(&mut self, tab: TabId, doc: Document, now_ms: u64) {
        let agent = PageAgent::new(tab, doc);
        self.open_page_with(agent, now_ms);
    }

    /// Same as `open_page` for a pre-built agent (custom effects or
    /// settings).
    pub fn open_page_with(&mut self, mut agent: PageAgent, now_ms: u64) {
        agent.init(&mut self.background, &self.tracer, now_ms);
        self.agents.insert(agent.tab(), agent);
    }

    /// Navigation/unload: in-flight page state is simply discarded; the
    /// store is unaffected.
    pub fn close_page(&mut self, tab: TabId) {
        self.agents.remove(&tab);
    }

    /// Deliver a pointer/key event to a tab's page.
    pub fn page_event(&mut self, tab: TabId, event: PageEvent, now_ms: u64) -> Vec<UiCommand> {
        match self.agents.get_mut(&tab) {
            Some(agent) => {
                agent.handle_page_event(event, &mut self.background, &self.tracer, now_ms)
            }
            None => Vec::new(),
        }
    }

    /// One cooperative frame for every open page (mutation batches,
    /// notice dismissal).
    pub fn pump(&mut self, now_ms: u64) {
        for agent in self.agents.values_mut() {
            agent.pump(now_ms);
        }
    }

    /// Route one request. Store-facing requests go straight to the
    /// background; tab-targeted ones additionally deliver to the page
    /// agent when it is loaded.
    pub fn dispatch(
        &mut self,
        request: Message,
        sender: MessageSender,
        now_ms: u64,
    ) -> CoordinatorResponse {
        match &request {
            Message::ToggleSnapHide {
                active, tab_id, ..
            } => {
                let response = self.background.handle(&request, &sender, &self.tracer);
                if response.success {
                    if let Some(tab) = self.background.resolve_tab(*tab_id, &sender) {
                        match self.agents.get_mut(&tab) {
                            Some(agent) => {
                                agent.apply_activation(*active, now_ms);
                            }
                            None => {
                                self.tracer.log(&TraceEvent::MessageFailed {
                                    message_type: request.type_name().to_string(),
                                    reason: format!("page agent for tab {} not loaded", tab),
                                });
                            }
                        }
                    }
                }
                response
            }

            Message::RestoreElement {
                element_id,
                hostname,
            } => {
                let response = self.background.handle(&request, &sender, &self.tracer);
                let mut any_agent = false;
                for agent in self.agents.values_mut() {
                    if agent.hostname() == hostname.as_str() {
                        any_agent = true;
                        agent.restore_element(element_id, &self.tracer);
                    }
                }
                if !any_agent {
                    self.tracer.log(&TraceEvent::MessageFailed {
                        message_type: request.type_name().to_string(),
                        reason: format!("no loaded page for hostname {}", hostname),
                    });
                }
                response
            }

            Message::RestoreAllElements => {
                let Some(tab) = self.background.resolve_tab(None, &sender) else {
                    return CoordinatorResponse::failed("no tab context for restore-all");
                };
                let Some(agent) = self.agents.get_mut(&tab) else {
                    self.tracer.log(&TraceEvent::MessageFailed {
                        message_type: request.type_name().to_string(),
                        reason: format!("page agent for tab {} not loaded", tab),
                    });
                    return CoordinatorResponse::failed("page agent not loaded");
                };
                let hostname = agent.hostname().to_string();
                agent.restore_all(&self.tracer);
                match self.background.clear_hostname(&hostname) {
                    Ok(()) => CoordinatorResponse::ok(),
                    Err(e) => CoordinatorResponse::failed(e),
                }
            }

            _ => self.background.handle(&request, &sender, &self.tracer),
        }
    }
}
