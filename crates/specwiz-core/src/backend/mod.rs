//! Remote collaborators of the wizard engine.
//!
//! The engine owns no durable state. Everything it shows comes from a
//! [`WizardBackend`], and every command it accepts is forwarded there. Two
//! implementations ship with the crate:
//!
//! - [`HttpBackend`] talks to the spec-wizard REST API over reqwest.
//! - [`MemoryBackend`] keeps a single project in memory and enforces the
//!   same approval rules the server does. It backs the test suite and can
//!   be used to embed the wizard without a server.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        ApprovalAck, BulkSelectionAck, ItemSelectionAck, ItemType, Job, SelectionSummary,
        StepRunOutcome, StepType, WizardDetail, WizardSummary,
    },
};

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

/// Operations the wizard engine needs from the server.
///
/// Step-level calls take a [`StepType`]; item-level calls take an
/// [`ItemType`]. Implementations are responsible for spelling both the way
/// the server expects.
#[async_trait]
pub trait WizardBackend: Send + Sync {
    /// Fetch per-step summaries.
    async fn get_summary(&self, project_id: u64) -> Result<WizardSummary>;

    /// Fetch every item list.
    async fn get_detail(&self, project_id: u64) -> Result<WizardDetail>;

    /// Execute a step run. The outcome is opaque to the engine.
    async fn run_step(&self, project_id: u64, step_type: StepType) -> Result<StepRunOutcome>;

    /// Approve a completed step.
    async fn approve_step(&self, project_id: u64, step_type: StepType) -> Result<ApprovalAck>;

    /// Send a completed step back with reviewer feedback.
    async fn reject_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: &str,
    ) -> Result<ApprovalAck>;

    /// Re-run a step, optionally guided by feedback.
    async fn regenerate_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: Option<&str>,
    ) -> Result<ApprovalAck>;

    /// Flip one item's selection flag.
    async fn toggle_item(
        &self,
        project_id: u64,
        item_type: ItemType,
        item_id: u64,
    ) -> Result<ItemSelectionAck>;

    /// Select every item of a type.
    async fn select_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck>;

    /// Deselect every item of a type.
    async fn deselect_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck>;

    /// Server-side selection counts for one item type.
    async fn get_selection_summary(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionSummary>;
}

/// Read access to the background job queue.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Jobs recorded for a project, newest first.
    async fn list_jobs(&self, project_id: u64) -> Result<Vec<Job>>;

    /// A single job.
    async fn get_job(&self, job_id: u64) -> Result<Job>;
}
