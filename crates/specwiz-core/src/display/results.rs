//! Operation result types for displaying command outcomes.
//!
//! Each result pairs what the backend acknowledged with the step or item
//! state the engine reloaded afterwards, so the rendered output always shows
//! the refreshed snapshot.

use std::fmt;

use super::{collections::Items, datetime::OptionalDateTime};
use crate::{
    engine::BulkSelectOutcome,
    models::{ApprovalAck, BulkSelectionAck, ItemSelectionAck, ItemType, StepType, StepView},
    selection::{SelectionReport, SelectionStats},
};

/// Result of running a step.
///
/// # Examples
///
/// ```rust
/// use specwiz_core::{
///     display::RunResult,
///     models::{StepType, WizardDetail, WizardState, WizardSummary},
/// };
///
/// let state = WizardState::new(
///     WizardSummary { project_id: 1, steps: vec![] },
///     WizardDetail::empty(1),
/// );
/// let result = RunResult::new(state.view(StepType::Objective, None));
/// assert!(result.to_string().starts_with("Ran step objective"));
/// ```
#[derive(Debug)]
pub struct RunResult {
    pub view: StepView,
}

impl RunResult {
    /// Create a new RunResult wrapper.
    pub fn new(view: StepView) -> Self {
        Self { view }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ran step {}", self.view.step_type)?;
        writeln!(f)?;
        write!(f, "{}", self.view)
    }
}

/// Result of approve, reject or regenerate.
#[derive(Debug)]
pub struct ApprovalResult {
    pub ack: ApprovalAck,
    pub view: StepView,
    pub changes: Vec<String>,
}

impl ApprovalResult {
    /// Create a new ApprovalResult wrapper.
    pub fn new(ack: ApprovalAck, view: StepView) -> Self {
        Self {
            ack,
            view,
            changes: Vec::new(),
        }
    }

    /// Create an ApprovalResult with a list of changes made.
    pub fn with_changes(ack: ApprovalAck, view: StepView, changes: Vec<String>) -> Self {
        Self { ack, view, changes }
    }

    pub fn step_type(&self) -> StepType {
        self.ack.step_type
    }
}

impl fmt::Display for ApprovalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ack.message.is_empty() {
            writeln!(f, "Updated step {}", self.ack.step_type)?;
        } else {
            writeln!(f, "{}", self.ack.message)?;
        }
        if self.ack.last_approved_at.is_some() {
            writeln!(
                f,
                "Approved at: {}",
                OptionalDateTime(self.ack.last_approved_at.as_ref())
            )?;
        }

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.view)
    }
}

/// Result of toggling one item.
#[derive(Debug)]
pub struct ToggleResult {
    pub ack: ItemSelectionAck,
}

impl ToggleResult {
    /// Create a new ToggleResult wrapper.
    pub fn new(ack: ItemSelectionAck) -> Self {
        Self { ack }
    }
}

impl fmt::Display for ToggleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.ack.is_selected {
            "selected"
        } else {
            "deselected"
        };
        writeln!(
            f,
            "Item {} ({}) is now {state}",
            self.ack.item_id, self.ack.item_type
        )
    }
}

/// Result of select-all or deselect-all, with the refreshed items.
pub struct SelectionResult {
    pub ack: BulkSelectionAck,
    pub items: Items,
}

impl SelectionResult {
    /// Create a new SelectionResult wrapper.
    pub fn new(ack: BulkSelectionAck, items: Items) -> Self {
        Self { ack, items }
    }
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated {} {} items ({}/{} selected)",
            self.ack.updated_count,
            self.ack.item_type,
            self.ack.selected_count,
            self.ack.total_count
        )?;
        writeln!(f)?;
        write!(f, "{}", self.items)
    }
}

/// Result of a bulk or smart select, with the refreshed items and the
/// advisory validation of the new selection.
pub struct BulkSelectResult {
    pub outcome: BulkSelectOutcome,
    pub items: Items,
    pub report: SelectionReport,
}

impl BulkSelectResult {
    /// Create a new BulkSelectResult wrapper.
    pub fn new(outcome: BulkSelectOutcome, items: Items, report: SelectionReport) -> Self {
        Self {
            outcome,
            items,
            report,
        }
    }
}

impl fmt::Display for BulkSelectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.outcome.cleared {
            "Replaced"
        } else {
            "Extended"
        };
        writeln!(
            f,
            "{mode} {} selection: toggled {}, already selected {}",
            self.outcome.item_type,
            self.outcome.toggled.len(),
            self.outcome.already_selected.len()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.report)?;
        writeln!(f)?;
        write!(f, "{}", self.items)
    }
}

/// Advisory validation and statistics for one item type's selection.
pub struct ValidationResult {
    pub item_type: ItemType,
    pub stats: SelectionStats,
    pub report: SelectionReport,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} selection", self.item_type.label())?;
        writeln!(f)?;
        write!(f, "{}", self.stats)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}
