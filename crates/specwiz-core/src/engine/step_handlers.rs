//! Step handler operations that return formatted wrapper types for the
//! WizardEngine.

use crate::{
    display::{ApprovalResult, Jobs, RunResult, StepViews},
    error::Result,
    models::{Job, StepType, StepView},
    params::{JobId, ProjectId, RegenerateStep, RejectStep, StepCommand},
};

use super::WizardEngine;

impl WizardEngine {
    /// Handle showing the whole wizard.
    ///
    /// Always fetches a fresh snapshot.
    ///
    /// # Arguments
    ///
    /// * `params` - The project to show
    ///
    /// # Returns
    ///
    /// Every step's view, in wizard order
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{params::ProjectId, EngineBuilder};
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let views = engine.show_wizard(&ProjectId { project_id: 1 }).await?;
    /// println!("{views}");
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn show_wizard(&self, params: &ProjectId) -> Result<StepViews> {
        let state = self.load_wizard_state(params.project_id).await?;
        Ok(StepViews(state.views(self.running_step())))
    }

    /// Handle showing one step.
    ///
    /// Uses the loaded snapshot when it belongs to the same project.
    pub async fn show_wizard_step(&self, params: &StepCommand) -> Result<StepView> {
        self.current_view(params.project_id, params.step_type).await
    }

    /// Handle running a step.
    ///
    /// Checks the objective gate, runs the step on the backend and reloads
    /// the snapshot.
    ///
    /// # Arguments
    ///
    /// * `params` - Project and step to run
    ///
    /// # Returns
    ///
    /// The step's view after the reload
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{models::StepType, params::StepCommand, EngineBuilder};
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = StepCommand {
    ///     project_id: 1,
    ///     step_type: StepType::Objective,
    /// };
    /// let result = engine.run_wizard_step(&params).await?;
    /// println!("{result}");
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn run_wizard_step(&self, params: &StepCommand) -> Result<RunResult> {
        let state = self.run_step(params.project_id, params.step_type).await?;
        Ok(RunResult::new(state.view(params.step_type, self.running_step())))
    }

    /// Handle approving a step.
    ///
    /// # Arguments
    ///
    /// * `params` - Project and step to approve
    ///
    /// # Returns
    ///
    /// The backend acknowledgement together with the refreshed step view
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{models::StepType, params::StepCommand, EngineBuilder};
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = StepCommand {
    ///     project_id: 1,
    ///     step_type: StepType::Features,
    /// };
    /// let result = engine.approve_wizard_step(&params).await?;
    /// assert!(result.view.approved);
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn approve_wizard_step(&self, params: &StepCommand) -> Result<ApprovalResult> {
        let ack = self
            .approve_step(params.project_id, params.step_type)
            .await?;
        let view = self.current_view(params.project_id, params.step_type).await?;

        let changes = vec![
            "Approval: approved".to_string(),
            format!("{} items are now read-only", view.selection.selected),
        ];
        Ok(ApprovalResult::with_changes(ack, view, changes))
    }

    /// Handle rejecting a step with feedback.
    ///
    /// The feedback is validated and trimmed before anything is sent.
    ///
    /// # Arguments
    ///
    /// * `params` - Project, step and reviewer feedback
    ///
    /// # Returns
    ///
    /// The backend acknowledgement together with the refreshed step view
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{models::StepType, params::RejectStep, EngineBuilder};
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = RejectStep {
    ///     project_id: 1,
    ///     step_type: StepType::Architecture,
    ///     feedback: "Needs a caching layer".to_string(),
    /// };
    /// let result = engine.reject_wizard_step(&params).await?;
    /// println!("{result}");
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn reject_wizard_step(&self, params: &RejectStep) -> Result<ApprovalResult> {
        let feedback = params.validate()?;
        let ack = self
            .reject_step(params.project_id, params.step_type, feedback)
            .await?;
        let view = self.current_view(params.project_id, params.step_type).await?;

        let changes = vec![
            "Approval: rejected".to_string(),
            format!("Feedback: {feedback}"),
        ];
        Ok(ApprovalResult::with_changes(ack, view, changes))
    }

    /// Handle regenerating a step.
    ///
    /// # Arguments
    ///
    /// * `params` - Project, step and optional guidance for the model
    ///
    /// # Returns
    ///
    /// The backend acknowledgement together with the refreshed step view,
    /// whose approval is back to pending
    pub async fn regenerate_wizard_step(&self, params: &RegenerateStep) -> Result<ApprovalResult> {
        let ack = self
            .regenerate_step(
                params.project_id,
                params.step_type,
                params.feedback.as_deref(),
            )
            .await?;
        let view = self.current_view(params.project_id, params.step_type).await?;

        let mut changes = vec![
            format!("Regenerated {} items", view.item_count),
            "Approval: pending".to_string(),
        ];
        if let Some(feedback) = params
            .feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
        {
            changes.push(format!("Feedback: {feedback}"));
        }
        Ok(ApprovalResult::with_changes(ack, view, changes))
    }

    /// Handle listing a project's jobs.
    pub async fn list_project_jobs(&self, params: &ProjectId) -> Result<Jobs> {
        Ok(Jobs(self.list_jobs(params.project_id).await?))
    }

    /// Handle showing one job.
    pub async fn show_job(&self, params: &JobId) -> Result<Job> {
        self.get_job(params.job_id).await
    }

    async fn current_view(&self, project_id: u64, step_type: StepType) -> Result<StepView> {
        let state = self.ensure_loaded(project_id).await?;
        Ok(state.view(step_type, self.running_step()))
    }
}
