//! Parameter structures for wizard operations
//!
//! This module contains shared parameter structures that can be used across
//! different interfaces (CLI, MCP, etc.) without framework-specific derives.
//! Interface layers wrap or convert into these types:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema derives are only compiled with the `schema` feature, which the
//! MCP server enables.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    models::{ItemType, StepType},
    selection::{ItemFilter, SmartSelection},
};

/// Parameters for operations on a whole project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ProjectId {
    /// The project whose wizard to operate on
    pub project_id: u64,
}

/// Parameters for step commands that need nothing else (run, approve).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepCommand {
    /// The project whose wizard to operate on
    pub project_id: u64,
    /// One of objective, tech_stack, features, architecture, quality
    pub step_type: StepType,
}

/// Parameters for rejecting a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RejectStep {
    pub project_id: u64,
    pub step_type: StepType,
    /// Reviewer feedback explaining the rejection (required)
    pub feedback: String,
}

impl RejectStep {
    /// Validate the feedback and return it trimmed.
    ///
    /// # Errors
    ///
    /// * `WizardError::InvalidInput` - When the feedback is blank
    ///
    /// # Examples
    ///
    /// ```rust
    /// use specwiz_core::{models::StepType, params::RejectStep};
    ///
    /// let params = RejectStep {
    ///     project_id: 1,
    ///     step_type: StepType::Features,
    ///     feedback: "  Too generic  ".to_string(),
    /// };
    /// assert_eq!(params.validate()?, "Too generic");
    ///
    /// let blank = RejectStep { feedback: " ".to_string(), ..params };
    /// assert!(blank.validate().is_err());
    /// # Ok::<(), specwiz_core::WizardError>(())
    /// ```
    pub fn validate(&self) -> crate::Result<&str> {
        crate::rules::ensure_feedback(&self.feedback)?;
        Ok(self.feedback.trim())
    }
}

/// Parameters for regenerating a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RegenerateStep {
    pub project_id: u64,
    pub step_type: StepType,
    /// Optional guidance for the regeneration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Parameters for toggling one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ToggleItem {
    pub project_id: u64,
    /// One of objective, tech_stack, feature, architecture, dod, nfr, risk
    pub item_type: ItemType,
    pub item_id: u64,
}

/// Parameters for commands on every item of a type (select-all,
/// deselect-all, selection summary, validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ItemCommand {
    pub project_id: u64,
    /// One of objective, tech_stack, feature, architecture, dod, nfr, risk
    pub item_type: ItemType,
}

/// Parameters for selecting an explicit list of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct BulkSelect {
    pub project_id: u64,
    pub item_type: ItemType,
    /// Ids to select, applied in order
    pub ids: Vec<u64>,
    /// Keep the current selection instead of clearing it first
    #[serde(default)]
    pub preserve_existing: bool,
}

/// Parameters for applying a recommendation preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SmartSelect {
    pub project_id: u64,
    pub item_type: ItemType,
    /// recommended (critical + recommended), critical_only, or all
    #[serde(default)]
    pub preset: SmartSelection,
}

/// Parameters for listing items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListItems {
    pub project_id: u64,
    /// Restrict to one item type; all types when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(flatten)]
    pub filter: ItemFilter,
}

/// Parameters for operations on a single job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct JobId {
    pub job_id: u64,
}
