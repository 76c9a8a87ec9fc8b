//! Step operations for the WizardEngine.

use std::sync::Arc;

use log::{debug, info};

use super::{Slice, WizardEngine};
use crate::{
    error::Result,
    models::{ApprovalAck, StepType, WizardState},
    rules,
};

impl WizardEngine {
    /// Runs a step on the backend, then reloads summary and detail.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::LockedStep` if the objective step is not
    /// completed, or `WizardError::StepBusy` if another step is in flight.
    /// Neither contacts the backend.
    pub async fn run_step(
        &self,
        project_id: u64,
        step_type: StepType,
    ) -> Result<Arc<WizardState>> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_unlocked(&state, step_type)?;

        let _running = self.begin_run(step_type)?;
        info!("Running step {} for project {project_id}", step_type.as_str());
        self.backend.run_step(project_id, step_type).await?;

        self.reload(project_id, Slice::Both).await
    }

    /// Approves a step, then reloads the summary.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::NoSelection` without contacting the backend when
    /// none of the step's items are selected.
    pub async fn approve_step(
        &self,
        project_id: u64,
        step_type: StepType,
    ) -> Result<ApprovalAck> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_selection(&state, step_type)?;

        let ack = self.backend.approve_step(project_id, step_type).await?;
        info!("Approved step {} for project {project_id}", step_type.as_str());

        self.reload(project_id, Slice::Summary).await?;
        Ok(ack)
    }

    /// Regenerates a step, then reloads summary and detail.
    ///
    /// Regeneration replaces the step's items and resets its approval to
    /// pending. It counts as a run for [`WizardEngine::running_step`].
    pub async fn regenerate_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: Option<&str>,
    ) -> Result<ApprovalAck> {
        let feedback = feedback.map(str::trim).filter(|f| !f.is_empty());

        let _running = self.begin_run(step_type)?;
        debug!(
            "Regenerating step {} for project {project_id} (feedback: {})",
            step_type.as_str(),
            feedback.is_some()
        );
        let ack = self
            .backend
            .regenerate_step(project_id, step_type, feedback)
            .await?;

        self.reload(project_id, Slice::Both).await?;
        Ok(ack)
    }

    /// Rejects a step with reviewer feedback, then reloads the summary.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::InvalidInput` for blank feedback.
    pub async fn reject_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: &str,
    ) -> Result<ApprovalAck> {
        rules::ensure_feedback(feedback)?;

        let ack = self
            .backend
            .reject_step(project_id, step_type, feedback.trim())
            .await?;
        info!("Rejected step {} for project {project_id}", step_type.as_str());

        self.reload(project_id, Slice::Summary).await?;
        Ok(ack)
    }
}
