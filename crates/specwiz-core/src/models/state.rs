//! Aggregate wizard state and its read model.

use serde::{Deserialize, Serialize};

use super::{
    item::{Item, ItemType},
    step::{ApprovalStatus, StepStatus, StepSummary, StepType},
};
use crate::rules;

/// Step summaries as returned by `GET /projects/{id}/spec-wizard/summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WizardSummary {
    pub project_id: u64,
    #[serde(default)]
    pub steps: Vec<StepSummary>,
}

impl WizardSummary {
    /// Summary for one step, if the backend reported it.
    pub fn step(&self, step_type: StepType) -> Option<&StepSummary> {
        self.steps.iter().find(|s| s.step_type == step_type)
    }
}

/// Full item lists as returned by `GET /projects/{id}/spec-wizard/detail`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WizardDetail {
    pub project_id: u64,
    #[serde(default)]
    pub objectives: Vec<Item>,
    #[serde(default)]
    pub tech_stack: Vec<Item>,
    #[serde(default)]
    pub features: Vec<Item>,
    #[serde(default)]
    pub architecture: Vec<Item>,
    #[serde(default)]
    pub dod_items: Vec<Item>,
    #[serde(default)]
    pub nfr_items: Vec<Item>,
    #[serde(default)]
    pub risk_items: Vec<Item>,
}

impl WizardDetail {
    /// Creates an empty detail set for a project.
    pub fn empty(project_id: u64) -> Self {
        Self {
            project_id,
            ..Default::default()
        }
    }

    /// Items of one type.
    pub fn items(&self, item_type: ItemType) -> &[Item] {
        match item_type {
            ItemType::Objective => &self.objectives,
            ItemType::TechStack => &self.tech_stack,
            ItemType::Feature => &self.features,
            ItemType::Architecture => &self.architecture,
            ItemType::Dod => &self.dod_items,
            ItemType::Nfr => &self.nfr_items,
            ItemType::Risk => &self.risk_items,
        }
    }

    /// Mutable access to the items of one type.
    pub fn items_mut(&mut self, item_type: ItemType) -> &mut Vec<Item> {
        match item_type {
            ItemType::Objective => &mut self.objectives,
            ItemType::TechStack => &mut self.tech_stack,
            ItemType::Feature => &mut self.features,
            ItemType::Architecture => &mut self.architecture,
            ItemType::Dod => &mut self.dod_items,
            ItemType::Nfr => &mut self.nfr_items,
            ItemType::Risk => &mut self.risk_items,
        }
    }

    /// Selection counts for one item type, derived from `is_selected`.
    pub fn item_selection(&self, item_type: ItemType) -> SelectionCount {
        SelectionCount::of(self.items(item_type))
    }

    /// Selection counts across every item type the step owns.
    pub fn step_selection(&self, step_type: StepType) -> SelectionCount {
        step_type
            .item_types()
            .iter()
            .map(|t| self.item_selection(*t))
            .fold(SelectionCount::default(), SelectionCount::combine)
    }
}

/// `selected / total` counts for a slice of items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionCount {
    pub selected: u32,
    pub total: u32,
}

impl SelectionCount {
    /// Counts the selected items in `items`.
    pub fn of(items: &[Item]) -> Self {
        Self {
            selected: items.iter().filter(|i| i.is_selected).count() as u32,
            total: items.len() as u32,
        }
    }

    /// Sums two counts.
    pub fn combine(self, other: Self) -> Self {
        Self {
            selected: self.selected + other.selected,
            total: self.total + other.total,
        }
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected == 0
    }
}

/// The in-memory snapshot of one project's wizard.
///
/// Snapshots are never patched in place; every reload builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub project_id: u64,
    pub summary: WizardSummary,
    pub detail: WizardDetail,
}

impl WizardState {
    /// Combines the two slices fetched from the backend.
    pub fn new(summary: WizardSummary, detail: WizardDetail) -> Self {
        Self {
            project_id: summary.project_id,
            summary,
            detail,
        }
    }

    /// Returns a copy with the summary slice replaced.
    pub fn with_summary(&self, summary: WizardSummary) -> Self {
        Self {
            project_id: self.project_id,
            summary,
            detail: self.detail.clone(),
        }
    }

    /// Returns a copy with the detail slice replaced.
    pub fn with_detail(&self, detail: WizardDetail) -> Self {
        Self {
            project_id: self.project_id,
            summary: self.summary.clone(),
            detail,
        }
    }

    /// Summary for a step, if reported.
    pub fn step(&self, step_type: StepType) -> Option<&StepSummary> {
        self.summary.step(step_type)
    }

    /// Run status of a step; unreported steps count as planned.
    pub fn status(&self, step_type: StepType) -> StepStatus {
        self.step(step_type).map(|s| s.status).unwrap_or_default()
    }

    /// Items of one type.
    pub fn items(&self, item_type: ItemType) -> &[Item] {
        self.detail.items(item_type)
    }

    /// Selection counts across the step's item types.
    pub fn selection(&self, step_type: StepType) -> SelectionCount {
        self.detail.step_selection(step_type)
    }

    /// Selection counts for one item type.
    pub fn item_selection(&self, item_type: ItemType) -> SelectionCount {
        self.detail.item_selection(item_type)
    }

    /// Item count derived from the detail lists.
    ///
    /// For quality this is the sum of DoD, NFR and risk items.
    pub fn derived_item_count(&self, step_type: StepType) -> u32 {
        self.selection(step_type).total
    }

    /// Whether the step is gated behind the objective step.
    pub fn is_locked(&self, step_type: StepType) -> bool {
        rules::is_step_locked(step_type, self)
    }

    /// Whether the step is approved and therefore read-only.
    pub fn is_approved(&self, step_type: StepType) -> bool {
        self.step(step_type).is_some_and(StepSummary::is_approved)
    }

    /// Read model for every step in wizard order.
    pub fn views(&self, running: Option<StepType>) -> Vec<StepView> {
        StepType::ALL
            .iter()
            .map(|step_type| self.view(*step_type, running))
            .collect()
    }

    /// Read model for a single step.
    pub fn view(&self, step_type: StepType, running: Option<StepType>) -> StepView {
        let summary = self
            .step(step_type)
            .cloned()
            .unwrap_or_else(|| StepSummary::planned(step_type));
        StepView {
            step_type,
            status: summary.status,
            approval_status: summary.approval_status,
            item_count: summary.item_count,
            summary: summary.summary,
            locked: self.is_locked(step_type),
            approved: self.is_approved(step_type),
            running: running == Some(step_type),
            selection: self.selection(step_type),
        }
    }
}

/// What the rendering layer needs to draw one step.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepView {
    pub step_type: StepType,
    pub status: StepStatus,
    pub approval_status: Option<ApprovalStatus>,
    pub item_count: u32,
    pub summary: String,
    pub locked: bool,
    pub approved: bool,
    pub running: bool,
    pub selection: SelectionCount,
}

impl StepView {
    /// Approve is offered for completed, unapproved steps with a selection.
    pub fn can_approve(&self) -> bool {
        self.status == StepStatus::Completed
            && !self.approved
            && !self.running
            && !self.selection.is_empty()
    }

    /// Run is offered when the step is unlocked and idle.
    pub fn can_run(&self) -> bool {
        !self.locked && !self.running
    }
}
