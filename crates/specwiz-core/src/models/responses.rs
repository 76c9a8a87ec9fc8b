//! Acknowledgements returned by mutating backend calls.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{
    item::ItemType,
    step::{ApprovalStatus, StepType},
    timestamp,
};

/// Result of a step run. The engine treats it as opaque and reloads.
pub type StepRunOutcome = serde_json::Value;

/// Response to approve, reject and regenerate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovalAck {
    pub project_id: u64,
    pub step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default, with = "timestamp::option")]
    pub last_approved_at: Option<Timestamp>,
    #[serde(default)]
    pub message: String,
}

/// Response to a single-item toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSelectionAck {
    pub project_id: u64,
    pub item_type: ItemType,
    pub item_id: u64,
    pub is_selected: bool,
    #[serde(default)]
    pub message: String,
}

/// Response to select-all and deselect-all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkSelectionAck {
    pub project_id: u64,
    pub item_type: ItemType,
    pub updated_count: u32,
    pub selected_count: u32,
    pub total_count: u32,
}

/// Server-side selection counts for one item type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionSummary {
    pub project_id: u64,
    pub item_type: ItemType,
    pub selected_count: u32,
    pub total_count: u32,
}
