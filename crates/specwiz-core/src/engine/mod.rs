//! High-level engine API for driving the spec wizard.
//!
//! This module provides the main [`WizardEngine`] interface. The engine holds
//! the last snapshot fetched from the backend, checks client-side rules
//! against it, forwards commands, and refetches the slices a command
//! affects.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │     Backend     │
//! │ (step_handlers, │───▶│ (step_ops,      │───▶│ (HTTP / memory) │
//! │  item_handlers) │    │  item_ops)      │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Params + display       Rules + reloads        Server state
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`WizardEngine`] instances
//! - [`step_ops`]: Run, approve, reject and regenerate
//! - [`item_ops`]: Toggle, select-all, deselect-all, bulk and smart select
//! - [`step_handlers`] / [`item_handlers`]: Parameter-struct entry points
//!   returning display-ready results
//!
//! ## Snapshot discipline
//!
//! A snapshot is never patched. Every reload builds a new [`WizardState`]
//! and swaps it in whole, so readers holding an `Arc` keep a consistent
//! view. A failed load or mutation leaves the previous snapshot in place.
//!
//! # Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use specwiz_core::{
//!     backend::MemoryBackend,
//!     models::{Item, ItemType, StepType},
//!     EngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(
//!     MemoryBackend::new(1).with_staged_items(ItemType::Objective, vec![Item::new(1, false)]),
//! );
//! let engine = EngineBuilder::new().with_backend(backend).build()?;
//!
//! engine.run_step(1, StepType::Objective).await?;
//! engine.toggle_item(1, ItemType::Objective, 1).await?;
//! engine.approve_step(1, StepType::Objective).await?;
//!
//! let state = engine.state().await.expect("loaded");
//! assert!(state.is_approved(StepType::Objective));
//! # Ok(())
//! # }
//! ```

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use log::debug;
use tokio::sync::RwLock;

use crate::{
    backend::{JobBackend, WizardBackend},
    error::{Result, WizardError},
    models::{Job, StepType, StepView, WizardState},
    poller::{JobPollHandle, JobPoller},
};

pub mod builder;
pub mod item_handlers;
pub mod item_ops;
pub mod step_handlers;
pub mod step_ops;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use item_ops::{BulkSelectOptions, BulkSelectOutcome};

/// Which parts of the snapshot a command invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slice {
    Summary,
    Detail,
    Both,
}

/// Main engine interface for one client session.
///
/// Methods take `&self`; the engine can be shared behind an `Arc` so a
/// render loop can read [`WizardEngine::views`] while a command is in
/// flight.
pub struct WizardEngine {
    pub(crate) backend: Arc<dyn WizardBackend>,
    pub(crate) jobs: Arc<dyn JobBackend>,
    pub(crate) poll_interval: Duration,
    snapshot: RwLock<Option<Arc<WizardState>>>,
    running: Mutex<Option<StepType>>,
}

impl WizardEngine {
    pub(crate) fn new(
        backend: Arc<dyn WizardBackend>,
        jobs: Arc<dyn JobBackend>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            backend,
            jobs,
            poll_interval,
            snapshot: RwLock::new(None),
            running: Mutex::new(None),
        }
    }

    /// Fetches summary and detail together and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Load` if either fetch fails. The previous
    /// snapshot is kept.
    pub async fn load_wizard_state(&self, project_id: u64) -> Result<Arc<WizardState>> {
        debug!("Loading wizard state for project {project_id}");

        let (summary, detail) = tokio::try_join!(
            self.backend.get_summary(project_id),
            self.backend.get_detail(project_id),
        )
        .map_err(|e| load_error(project_id, e))?;

        let state = Arc::new(WizardState::new(summary, detail));
        *self.snapshot.write().await = Some(Arc::clone(&state));
        Ok(state)
    }

    /// Current snapshot, if one was loaded.
    pub async fn state(&self) -> Option<Arc<WizardState>> {
        self.snapshot.read().await.clone()
    }

    /// Read model for every step, or `None` before the first load.
    pub async fn views(&self) -> Option<Vec<StepView>> {
        let running = self.running_step();
        self.state().await.map(|state| state.views(running))
    }

    /// Step whose run or regeneration is in flight.
    pub fn running_step(&self) -> Option<StepType> {
        *self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Jobs recorded for a project.
    pub async fn list_jobs(&self, project_id: u64) -> Result<Vec<Job>> {
        self.jobs.list_jobs(project_id).await
    }

    /// A single job.
    pub async fn get_job(&self, job_id: u64) -> Result<Job> {
        self.jobs.get_job(job_id).await
    }

    /// Starts polling a job at the configured interval.
    pub fn poll_job(&self, job_id: u64) -> JobPollHandle {
        JobPoller::spawn(Arc::clone(&self.jobs), job_id, self.poll_interval)
    }

    /// Snapshot for `project_id`, loading it if absent or for another
    /// project.
    pub(crate) async fn ensure_loaded(&self, project_id: u64) -> Result<Arc<WizardState>> {
        match self.state().await {
            Some(state) if state.project_id == project_id => Ok(state),
            _ => self.load_wizard_state(project_id).await,
        }
    }

    /// Refetches the given slice and swaps in a new snapshot.
    pub(crate) async fn reload(&self, project_id: u64, slice: Slice) -> Result<Arc<WizardState>> {
        let current = self
            .state()
            .await
            .filter(|state| state.project_id == project_id);
        let Some(current) = current else {
            return self.load_wizard_state(project_id).await;
        };

        let next = match slice {
            Slice::Both => return self.load_wizard_state(project_id).await,
            Slice::Summary => {
                let summary = self
                    .backend
                    .get_summary(project_id)
                    .await
                    .map_err(|e| load_error(project_id, e))?;
                current.with_summary(summary)
            }
            Slice::Detail => {
                let detail = self
                    .backend
                    .get_detail(project_id)
                    .await
                    .map_err(|e| load_error(project_id, e))?;
                current.with_detail(detail)
            }
        };

        debug!("Reloaded {slice:?} for project {project_id}");
        let state = Arc::new(next);
        *self.snapshot.write().await = Some(Arc::clone(&state));
        Ok(state)
    }

    /// Marks `step_type` as running until the returned guard drops.
    pub(crate) fn begin_run(&self, step_type: StepType) -> Result<RunningGuard<'_>> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = *running {
            return Err(WizardError::StepBusy {
                running: current,
                requested: step_type,
            });
        }
        *running = Some(step_type);
        Ok(RunningGuard { engine: self })
    }
}

/// Clears the running step on drop, whichever way the command ends.
pub(crate) struct RunningGuard<'a> {
    engine: &'a WizardEngine,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self
            .engine
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn load_error(project_id: u64, error: WizardError) -> WizardError {
    WizardError::Load {
        project_id,
        message: error.to_string(),
    }
}
