use serde::Serialize;

use crate::coordinator::messages::TabId;

/// One JSONL trace line. Nothing here is surfaced to the user; failures
/// recorded as events reconcile at the next page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    ElementSaved {
        hostname: String,
        element_id: String,
        selector: String,
    },
    ElementRestored {
        hostname: String,
        element_id: String,
    },
    AllRestored {
        hostname: String,
        count: usize,
    },
    StylesApplied {
        hostname: String,
        selector_count: usize,
    },
    SelectorSkipped {
        selector: String,
        reason: String,
    },
    MessageFailed {
        message_type: String,
        reason: String,
    },
    ActivationChanged {
        tab: TabId,
        active: bool,
    },
}
