use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::record::{ElementCapture, HiddenElementRecord};

/// Browser-assigned tab identifier.
pub type TabId = u32;

/// Request sent between page agents, the popup surface, and the
/// background coordinator (one JSON object, tagged by `type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "TOGGLE_SNAPHIDE")]
    ToggleSnapHide {
        active: bool,
        #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
        #[serde(rename = "fromContentScript", default)]
        from_content_script: bool,
    },

    #[serde(rename = "GET_EXTENSION_STATE")]
    GetExtensionState {
        #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
    },

    #[serde(rename = "SAVE_DELETED_ELEMENT")]
    SaveDeletedElement {
        element: ElementCapture,
        hostname: String,
    },

    #[serde(rename = "GET_DELETED_ELEMENTS")]
    GetDeletedElements { hostname: String },

    #[serde(rename = "RESTORE_ELEMENT")]
    RestoreElement {
        #[serde(rename = "elementId")]
        element_id: String,
        hostname: String,
    },

    #[serde(rename = "RESTORE_ALL_ELEMENTS")]
    RestoreAllElements,

    #[serde(rename = "GET_ALL_WEBSITES")]
    GetAllWebsites,
}

impl Message {
    /// Wire name, for trace events.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::ToggleSnapHide { .. } => "TOGGLE_SNAPHIDE",
            Message::GetExtensionState { .. } => "GET_EXTENSION_STATE",
            Message::SaveDeletedElement { .. } => "SAVE_DELETED_ELEMENT",
            Message::GetDeletedElements { .. } => "GET_DELETED_ELEMENTS",
            Message::RestoreElement { .. } => "RESTORE_ELEMENT",
            Message::RestoreAllElements => "RESTORE_ALL_ELEMENTS",
            Message::GetAllWebsites => "GET_ALL_WEBSITES",
        }
    }
}

/// Who sent a message. Page agents carry their tab id; the popup has no
/// tab context and relies on the focused-tab fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageSender {
    pub tab: Option<TabId>,
}

impl MessageSender {
    pub fn none() -> Self {
        MessageSender { tab: None }
    }

    pub fn tab(tab: TabId) -> Self {
        MessageSender { tab: Some(tab) }
    }
}

/// Response to any coordinator request: one struct, fields populated per
/// request type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "elementId", default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<HiddenElementRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub websites: Option<BTreeMap<String, Vec<HiddenElementRecord>>>,
}

impl CoordinatorResponse {
    pub fn ok() -> Self {
        CoordinatorResponse {
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        CoordinatorResponse {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_element_id(mut self, element_id: impl ToString) -> Self {
        self.element_id = Some(element_id.to_string());
        self
    }

    pub fn with_elements(mut self, elements: Vec<HiddenElementRecord>) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_websites(
        mut self,
        websites: BTreeMap<String, Vec<HiddenElementRecord>>,
    ) -> Self {
        self.websites = Some(websites);
        self
    }
}
