//! Command handlers for the terminal front end
//!
//! Each handler converts its clap arguments into core parameters, calls the
//! engine's handler method and renders the returned display type.

use anyhow::{Context, Result};
use log::{debug, info};
use specwiz_core::{params::*, WizardEngine};

use crate::{
    args::{ItemCommands, JobArgs, JobCommands, ProjectArgs, StepCommands},
    renderer::TerminalRenderer,
};

/// Runs CLI commands against one engine
pub struct Cli {
    engine: WizardEngine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(engine: WizardEngine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    /// Show every step of the wizard
    pub async fn show_wizard(&self, args: ProjectArgs) -> Result<()> {
        let params = ProjectId::from(args);
        let views = self
            .engine
            .show_wizard(&params)
            .await
            .context("Failed to show wizard")?;
        self.renderer
            .render(&format!("# Project {}\n\n{views}", params.project_id))
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        let output = match command {
            StepCommands::Show(args) => {
                let view = self
                    .engine
                    .show_wizard_step(&args.into())
                    .await
                    .context("Failed to show step")?;
                view.to_string()
            }
            StepCommands::Run(args) => {
                let params = StepCommand::from(args);
                info!("Running step {}", params.step_type);
                self.engine
                    .run_wizard_step(&params)
                    .await
                    .with_context(|| format!("Failed to run step {}", params.step_type))?
                    .to_string()
            }
            StepCommands::Approve(args) => {
                let params = StepCommand::from(args);
                self.engine
                    .approve_wizard_step(&params)
                    .await
                    .with_context(|| format!("Failed to approve step {}", params.step_type))?
                    .to_string()
            }
            StepCommands::Reject(args) => {
                let params = RejectStep::from(args);
                self.engine
                    .reject_wizard_step(&params)
                    .await
                    .with_context(|| format!("Failed to reject step {}", params.step_type))?
                    .to_string()
            }
            StepCommands::Regenerate(args) => {
                let params = RegenerateStep::from(args);
                info!("Regenerating step {}", params.step_type);
                self.engine
                    .regenerate_wizard_step(&params)
                    .await
                    .with_context(|| format!("Failed to regenerate step {}", params.step_type))?
                    .to_string()
            }
        };
        self.renderer.render(&output)
    }

    pub async fn handle_item_command(&self, command: ItemCommands) -> Result<()> {
        let output = match command {
            ItemCommands::List(args) => {
                let groups = self
                    .engine
                    .list_wizard_items(&args.into())
                    .await
                    .context("Failed to list items")?;
                groups
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            ItemCommands::Toggle(args) => self
                .engine
                .toggle_wizard_item(&args.into())
                .await
                .context("Failed to toggle item")?
                .to_string(),
            ItemCommands::SelectAll(args) => self
                .engine
                .select_all_wizard_items(&args.into())
                .await
                .context("Failed to select items")?
                .to_string(),
            ItemCommands::DeselectAll(args) => self
                .engine
                .deselect_all_wizard_items(&args.into())
                .await
                .context("Failed to deselect items")?
                .to_string(),
            ItemCommands::Select(args) => self
                .engine
                .bulk_select_wizard_items(&args.into())
                .await
                .context("Failed to select items")?
                .to_string(),
            ItemCommands::Smart(args) => self
                .engine
                .smart_select_wizard_items(&args.into())
                .await
                .context("Failed to apply selection preset")?
                .to_string(),
            ItemCommands::Check(args) => self
                .engine
                .check_wizard_selection(&args.into())
                .await
                .context("Failed to check selection")?
                .to_string(),
        };
        self.renderer.render(&output)
    }

    pub async fn handle_job_command(&self, command: JobCommands) -> Result<()> {
        match command {
            JobCommands::List(args) => {
                let jobs = self
                    .engine
                    .list_project_jobs(&args.into())
                    .await
                    .context("Failed to list jobs")?;
                self.renderer.render(&jobs.to_string())
            }
            JobCommands::Show(args) => {
                let job = self
                    .engine
                    .show_job(&args.into())
                    .await
                    .context("Failed to show job")?;
                self.renderer.render(&job.to_string())
            }
            JobCommands::Watch(args) => self.watch_job(args).await,
        }
    }

    /// Render each new job snapshot until the job finishes or Ctrl-C.
    async fn watch_job(&self, args: JobArgs) -> Result<()> {
        // Fail fast on an unknown job instead of polling it forever
        let params = JobId::from(args);
        let first = self
            .engine
            .show_job(&params)
            .await
            .context("Failed to show job")?;
        self.renderer.render(&first.to_string())?;
        if first.status.is_terminal() {
            return Ok(());
        }

        let mut handle = self.engine.poll_job(params.job_id);
        let mut last = Some(first);
        loop {
            tokio::select! {
                next = handle.changed() => {
                    let Some(job) = next else { break };
                    if last.as_ref() != Some(&job) {
                        self.renderer.render(&job.to_string())?;
                    }
                    let done = job.status.is_terminal();
                    last = Some(job);
                    if done {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Stopped watching job {}", params.job_id);
                    handle.cancel();
                    break;
                }
            }
        }
        Ok(())
    }
}
