//! Client-side workflow rules.
//!
//! These checks run against the current snapshot before any backend call is
//! made. The backend enforces its own rules as well; a request that passes
//! here may still be rejected there.

use crate::{
    error::{Result, WizardError},
    models::{ItemType, StepStatus, StepType, WizardState},
};

/// Whether a step is gated behind the objective step.
///
/// The gate is flat: every step other than the objective unlocks as soon as
/// the objective step is completed, regardless of the intermediate steps.
pub fn is_step_locked(step_type: StepType, state: &WizardState) -> bool {
    step_type != StepType::Objective && state.status(StepType::Objective) != StepStatus::Completed
}

/// Rejects a run request for a locked step.
pub fn ensure_unlocked(state: &WizardState, step_type: StepType) -> Result<()> {
    if is_step_locked(step_type, state) {
        return Err(WizardError::LockedStep { step_type });
    }
    Ok(())
}

/// Rejects an approval request when none of the step's items are selected.
pub fn ensure_selection(state: &WizardState, step_type: StepType) -> Result<()> {
    if state.selection(step_type).is_empty() {
        return Err(WizardError::NoSelection { step_type });
    }
    Ok(())
}

/// Rejects a selection change on an item type whose step is approved.
pub fn ensure_writable(state: &WizardState, item_type: ItemType) -> Result<()> {
    let step_type = item_type.step_type();
    if state.is_approved(step_type) {
        return Err(WizardError::ApprovedStep {
            step_type,
            item_type,
        });
    }
    Ok(())
}

/// Rejects blank reviewer feedback.
pub fn ensure_feedback(feedback: &str) -> Result<()> {
    if feedback.trim().is_empty() {
        return Err(WizardError::invalid_input("feedback").with_reason("must not be empty"));
    }
    Ok(())
}
