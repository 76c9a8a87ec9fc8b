//! In-process backend holding a single project.
//!
//! Mirrors the server's own rules and error messages for approvals and
//! selections, records every call it receives, and can be told to fail a
//! given operation after a number of successes.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use jiff::Timestamp;
use serde_json::json;
use tokio::sync::Mutex;

use super::{JobBackend, WizardBackend};
use crate::{
    error::{Result, WizardError},
    models::{
        ApprovalAck, ApprovalStatus, BulkSelectionAck, Item, ItemSelectionAck, ItemType, Job,
        SelectionCount, SelectionSummary, StepRunOutcome, StepStatus, StepSummary, StepType,
        WizardDetail, WizardSummary,
    },
};

/// Backend operation names, used to match calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetSummary,
    GetDetail,
    RunStep,
    ApproveStep,
    RejectStep,
    RegenerateStep,
    ToggleItem,
    SelectAll,
    DeselectAll,
    SelectionSummary,
    ListJobs,
    GetJob,
}

/// One call received by the backend, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    GetSummary,
    GetDetail,
    RunStep(StepType),
    ApproveStep(StepType),
    RejectStep(StepType),
    RegenerateStep(StepType),
    ToggleItem(ItemType, u64),
    SelectAll(ItemType),
    DeselectAll(ItemType),
    SelectionSummary(ItemType),
    ListJobs,
    GetJob(u64),
}

impl BackendCall {
    /// The operation this call belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            BackendCall::GetSummary => Operation::GetSummary,
            BackendCall::GetDetail => Operation::GetDetail,
            BackendCall::RunStep(_) => Operation::RunStep,
            BackendCall::ApproveStep(_) => Operation::ApproveStep,
            BackendCall::RejectStep(_) => Operation::RejectStep,
            BackendCall::RegenerateStep(_) => Operation::RegenerateStep,
            BackendCall::ToggleItem(..) => Operation::ToggleItem,
            BackendCall::SelectAll(_) => Operation::SelectAll,
            BackendCall::DeselectAll(_) => Operation::DeselectAll,
            BackendCall::SelectionSummary(_) => Operation::SelectionSummary,
            BackendCall::ListJobs => Operation::ListJobs,
            BackendCall::GetJob(_) => Operation::GetJob,
        }
    }

    /// Whether the call changes server state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            BackendCall::GetSummary
                | BackendCall::GetDetail
                | BackendCall::SelectionSummary(_)
                | BackendCall::ListJobs
                | BackendCall::GetJob(_)
        )
    }
}

/// Feedback left through reject or regenerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub step_type: StepType,
    pub regenerate: bool,
    pub text: String,
}

#[derive(Debug)]
struct FailurePlan {
    operation: Operation,
    successes_left: usize,
    status: u16,
    message: String,
}

#[derive(Debug, Default)]
struct ProjectData {
    steps: BTreeMap<StepType, StepSummary>,
    detail: WizardDetail,
    staged: BTreeMap<ItemType, Vec<Item>>,
    jobs: BTreeMap<u64, VecDeque<Job>>,
    calls: Vec<BackendCall>,
    feedback: Vec<FeedbackRecord>,
    failures: Vec<FailurePlan>,
}

/// A [`WizardBackend`] and [`JobBackend`] kept entirely in memory.
///
/// # Examples
///
/// ```rust
/// use specwiz_core::backend::{MemoryBackend, WizardBackend};
/// use specwiz_core::models::{Item, ItemType, StepType};
///
/// # tokio_test(async {
/// let backend = MemoryBackend::new(1)
///     .with_staged_items(ItemType::Objective, vec![Item::new(1, false)]);
///
/// backend.run_step(1, StepType::Objective).await.unwrap();
/// let detail = backend.get_detail(1).await.unwrap();
/// assert_eq!(detail.objectives.len(), 1);
/// # });
/// # fn tokio_test<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryBackend {
    project_id: u64,
    data: Mutex<ProjectData>,
}

impl MemoryBackend {
    /// Creates an empty project where no step has run yet.
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            data: Mutex::new(ProjectData {
                detail: WizardDetail::empty(project_id),
                ..Default::default()
            }),
        }
    }

    /// Seeds a step summary.
    pub fn with_step(mut self, summary: StepSummary) -> Self {
        self.data
            .get_mut()
            .steps
            .insert(summary.step_type, summary);
        self
    }

    /// Seeds the current items of one type.
    pub fn with_items(mut self, item_type: ItemType, items: Vec<Item>) -> Self {
        *self.data.get_mut().detail.items_mut(item_type) = items;
        self
    }

    /// Items the next run of the owning step will produce.
    pub fn with_staged_items(mut self, item_type: ItemType, items: Vec<Item>) -> Self {
        self.data.get_mut().staged.insert(item_type, items);
        self
    }

    /// Seeds a job. Each later call for the same id queues a further
    /// snapshot that `get_job` moves to once the current one was read.
    pub fn with_job(mut self, job: Job) -> Self {
        self.data
            .get_mut()
            .jobs
            .entry(job.id)
            .or_default()
            .push_back(job);
        self
    }

    /// Project this backend serves.
    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Makes the next call of `operation` fail with a 400.
    pub async fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.fail_after(operation, 0, 400, message).await;
    }

    /// Lets `successes` calls of `operation` through, then fails the next
    /// one with `status` and `message`.
    pub async fn fail_after(
        &self,
        operation: Operation,
        successes: usize,
        status: u16,
        message: impl Into<String>,
    ) {
        self.data.lock().await.failures.push(FailurePlan {
            operation,
            successes_left: successes,
            status,
            message: message.into(),
        });
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<BackendCall> {
        self.data.lock().await.calls.clone()
    }

    /// Calls that changed server state.
    pub async fn mutations(&self) -> Vec<BackendCall> {
        self.data
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    /// Forgets recorded calls.
    pub async fn clear_calls(&self) {
        self.data.lock().await.calls.clear();
    }

    /// Feedback recorded by reject and regenerate.
    pub async fn feedback(&self) -> Vec<FeedbackRecord> {
        self.data.lock().await.feedback.clone()
    }

    /// Replaces the items of one type.
    pub async fn set_items(&self, item_type: ItemType, items: Vec<Item>) {
        *self.data.lock().await.detail.items_mut(item_type) = items;
    }

    /// Queues a further snapshot for a job.
    pub async fn push_job(&self, job: Job) {
        self.data
            .lock()
            .await
            .jobs
            .entry(job.id)
            .or_default()
            .push_back(job);
    }

    fn ensure_project(&self, project_id: u64) -> Result<()> {
        if project_id != self.project_id {
            return Err(not_found("Project not found"));
        }
        Ok(())
    }
}

impl ProjectData {
    /// Records a call and applies any failure planned for it.
    fn record(&mut self, call: BackendCall) -> Result<()> {
        let operation = call.operation();
        self.calls.push(call);

        let Some(index) = self
            .failures
            .iter()
            .position(|plan| plan.operation == operation)
        else {
            return Ok(());
        };

        let plan = &mut self.failures[index];
        if plan.successes_left > 0 {
            plan.successes_left -= 1;
            return Ok(());
        }

        let plan = self.failures.remove(index);
        Err(WizardError::backend(Some(plan.status), plan.message))
    }

    fn step_mut(&mut self, step_type: StepType) -> Result<&mut StepSummary> {
        self.steps.get_mut(&step_type).ok_or_else(|| {
            not_found(format!(
                "Step {} not found for this project",
                step_type.api_key()
            ))
        })
    }

    fn objective_completed(&self) -> bool {
        self.steps
            .get(&StepType::Objective)
            .is_some_and(StepSummary::is_completed)
    }

    /// Produces the step's items and marks it completed, pending approval.
    fn execute(&mut self, step_type: StepType) -> Result<()> {
        if step_type != StepType::Objective && !self.objective_completed() {
            return Err(bad_request("Objective step must be completed first"));
        }

        for item_type in step_type.item_types() {
            if let Some(items) = self.staged.get(item_type) {
                *self.detail.items_mut(*item_type) = items.clone();
            }
        }
        let total = self.detail.step_selection(step_type).total;

        let step = self
            .steps
            .entry(step_type)
            .or_insert_with(|| StepSummary::planned(step_type));
        step.status = StepStatus::Completed;
        step.approval_status = Some(ApprovalStatus::Pending);
        step.last_ai_run_at = Some(Timestamp::now());
        step.item_count = total;
        step.summary = format!("{total} {} generated", step_type.label().to_lowercase());
        Ok(())
    }

    fn ensure_completed(&mut self, step_type: StepType, action: &str) -> Result<()> {
        let step = self.step_mut(step_type)?;
        if step.status != StepStatus::Completed {
            return Err(bad_request(format!(
                "Step must be COMPLETED to {action} (current: {})",
                step.status.as_str()
            )));
        }
        Ok(())
    }

    fn ack(&self, project_id: u64, step_type: StepType, message: String) -> ApprovalAck {
        let step = self.steps.get(&step_type);
        ApprovalAck {
            project_id,
            step_type,
            approval_status: step.and_then(|s| s.approval_status),
            last_approved_at: step.and_then(|s| s.last_approved_at),
            message,
        }
    }

    fn bulk_set(
        &mut self,
        project_id: u64,
        item_type: ItemType,
        selected: bool,
    ) -> BulkSelectionAck {
        let items = self.detail.items_mut(item_type);
        let mut updated_count = 0;
        for item in items.iter_mut().filter(|i| i.is_selected != selected) {
            item.is_selected = selected;
            updated_count += 1;
        }
        let count = SelectionCount::of(items);
        BulkSelectionAck {
            project_id,
            item_type,
            updated_count,
            selected_count: count.selected,
            total_count: count.total,
        }
    }
}

fn not_found(message: impl Into<String>) -> WizardError {
    WizardError::backend(Some(404), message)
}

fn bad_request(message: impl Into<String>) -> WizardError {
    WizardError::backend(Some(400), message)
}

#[async_trait]
impl WizardBackend for MemoryBackend {
    async fn get_summary(&self, project_id: u64) -> Result<WizardSummary> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::GetSummary)?;
        self.ensure_project(project_id)?;

        let steps = StepType::ALL
            .iter()
            .filter_map(|step_type| data.steps.get(step_type))
            .map(|step| StepSummary {
                item_count: data.detail.step_selection(step.step_type).total,
                ..step.clone()
            })
            .collect();

        Ok(WizardSummary { project_id, steps })
    }

    async fn get_detail(&self, project_id: u64) -> Result<WizardDetail> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::GetDetail)?;
        self.ensure_project(project_id)?;
        Ok(data.detail.clone())
    }

    async fn run_step(&self, project_id: u64, step_type: StepType) -> Result<StepRunOutcome> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::RunStep(step_type))?;
        self.ensure_project(project_id)?;
        data.execute(step_type)?;

        Ok(json!({
            "project_id": project_id,
            "step_type": step_type.api_key(),
            "status": StepStatus::Completed.as_str(),
        }))
    }

    async fn approve_step(&self, project_id: u64, step_type: StepType) -> Result<ApprovalAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::ApproveStep(step_type))?;
        self.ensure_project(project_id)?;
        data.ensure_completed(step_type, "approve")?;

        if data.step_mut(step_type)?.is_approved() {
            return Err(bad_request("Step is already approved"));
        }
        if data.detail.step_selection(step_type).is_empty() {
            return Err(bad_request(
                "At least one item must be selected to approve this step",
            ));
        }

        let step = data.step_mut(step_type)?;
        step.approval_status = Some(ApprovalStatus::Approved);
        step.last_approved_at = Some(Timestamp::now());

        Ok(data.ack(
            project_id,
            step_type,
            format!("Step {} approved successfully", step_type.api_key()),
        ))
    }

    async fn reject_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: &str,
    ) -> Result<ApprovalAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::RejectStep(step_type))?;
        self.ensure_project(project_id)?;
        data.ensure_completed(step_type, "reject")?;

        let step = data.step_mut(step_type)?;
        step.approval_status = Some(ApprovalStatus::Rejected);
        step.last_approved_at = None;
        data.feedback.push(FeedbackRecord {
            step_type,
            regenerate: false,
            text: feedback.to_string(),
        });

        Ok(data.ack(
            project_id,
            step_type,
            format!("Step {} rejected with feedback", step_type.api_key()),
        ))
    }

    async fn regenerate_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: Option<&str>,
    ) -> Result<ApprovalAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::RegenerateStep(step_type))?;
        self.ensure_project(project_id)?;
        data.step_mut(step_type)?;

        if let Some(text) = feedback.filter(|f| !f.is_empty()) {
            data.feedback.push(FeedbackRecord {
                step_type,
                regenerate: true,
                text: text.to_string(),
            });
        }
        data.execute(step_type)?;

        Ok(data.ack(
            project_id,
            step_type,
            format!(
                "Step {} regenerated successfully (now PENDING approval)",
                step_type.api_key()
            ),
        ))
    }

    async fn toggle_item(
        &self,
        project_id: u64,
        item_type: ItemType,
        item_id: u64,
    ) -> Result<ItemSelectionAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::ToggleItem(item_type, item_id))?;
        self.ensure_project(project_id)?;

        let item = data
            .detail
            .items_mut(item_type)
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| not_found("Item not found"))?;
        item.is_selected = !item.is_selected;

        Ok(ItemSelectionAck {
            project_id,
            item_type,
            item_id,
            is_selected: item.is_selected,
            message: "Item selection toggled".to_string(),
        })
    }

    async fn select_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::SelectAll(item_type))?;
        self.ensure_project(project_id)?;
        Ok(data.bulk_set(project_id, item_type, true))
    }

    async fn deselect_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::DeselectAll(item_type))?;
        self.ensure_project(project_id)?;
        Ok(data.bulk_set(project_id, item_type, false))
    }

    async fn get_selection_summary(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionSummary> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::SelectionSummary(item_type))?;
        self.ensure_project(project_id)?;

        let count = data.detail.item_selection(item_type);
        Ok(SelectionSummary {
            project_id,
            item_type,
            selected_count: count.selected,
            total_count: count.total,
        })
    }
}

#[async_trait]
impl JobBackend for MemoryBackend {
    async fn list_jobs(&self, project_id: u64) -> Result<Vec<Job>> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::ListJobs)?;
        self.ensure_project(project_id)?;

        Ok(data
            .jobs
            .values()
            .rev()
            .filter_map(|snapshots| snapshots.front().cloned())
            .collect())
    }

    async fn get_job(&self, job_id: u64) -> Result<Job> {
        let mut data = self.data.lock().await;
        data.record(BackendCall::GetJob(job_id))?;

        let snapshots = data
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| not_found("Job not found"))?;
        let current = if snapshots.len() > 1 {
            snapshots.pop_front()
        } else {
            snapshots.front().cloned()
        };
        current.ok_or_else(|| not_found("Job not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(step_type: StepType) -> StepSummary {
        StepSummary {
            status: StepStatus::Completed,
            approval_status: Some(ApprovalStatus::Pending),
            ..StepSummary::planned(step_type)
        }
    }

    #[tokio::test]
    async fn test_run_replaces_items_with_staged() {
        let backend = MemoryBackend::new(1)
            .with_items(ItemType::Objective, vec![Item::new(1, true)])
            .with_staged_items(
                ItemType::Objective,
                vec![Item::new(2, false), Item::new(3, false)],
            );

        backend.run_step(1, StepType::Objective).await.unwrap();

        let detail = backend.get_detail(1).await.unwrap();
        let ids: Vec<u64> = detail.objectives.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let summary = backend.get_summary(1).await.unwrap();
        let step = summary.step(StepType::Objective).unwrap();
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.approval_status, Some(ApprovalStatus::Pending));
        assert_eq!(step.item_count, 2);
    }

    #[tokio::test]
    async fn test_run_requires_completed_objective() {
        let backend = MemoryBackend::new(1);
        let err = backend.run_step(1, StepType::Features).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_approve_rules_match_server() {
        let backend = MemoryBackend::new(1)
            .with_step(completed(StepType::Objective))
            .with_items(ItemType::Objective, vec![Item::new(1, false)]);

        let err = backend.approve_step(1, StepType::Objective).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one item must be selected to approve this step"
        );

        backend.toggle_item(1, ItemType::Objective, 1).await.unwrap();
        let ack = backend.approve_step(1, StepType::Objective).await.unwrap();
        assert_eq!(ack.approval_status, Some(ApprovalStatus::Approved));
        assert!(ack.last_approved_at.is_some());

        let err = backend.approve_step(1, StepType::Objective).await.unwrap_err();
        assert_eq!(err.to_string(), "Step is already approved");

        let err = backend.approve_step(1, StepType::Features).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Step features not found for this project");
    }

    #[tokio::test]
    async fn test_reject_records_feedback() {
        let backend = MemoryBackend::new(1).with_step(completed(StepType::Quality));

        let ack = backend
            .reject_step(1, StepType::Quality, "Too vague")
            .await
            .unwrap();
        assert_eq!(ack.approval_status, Some(ApprovalStatus::Rejected));
        assert_eq!(ack.message, "Step dod rejected with feedback");
        assert_eq!(
            backend.feedback().await,
            vec![FeedbackRecord {
                step_type: StepType::Quality,
                regenerate: false,
                text: "Too vague".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_bulk_set_counts() {
        let backend = MemoryBackend::new(1).with_items(
            ItemType::Risk,
            vec![Item::new(1, true), Item::new(2, false), Item::new(3, false)],
        );

        let ack = backend.select_all_items(1, ItemType::Risk).await.unwrap();
        assert_eq!(
            (ack.updated_count, ack.selected_count, ack.total_count),
            (2, 3, 3)
        );

        let ack = backend.deselect_all_items(1, ItemType::Risk).await.unwrap();
        assert_eq!(
            (ack.updated_count, ack.selected_count, ack.total_count),
            (3, 0, 3)
        );
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = MemoryBackend::new(1).with_items(
            ItemType::Feature,
            vec![Item::new(1, false), Item::new(2, false)],
        );
        backend
            .fail_after(Operation::ToggleItem, 1, 500, "database is locked")
            .await;

        backend.toggle_item(1, ItemType::Feature, 1).await.unwrap();
        let err = backend.toggle_item(1, ItemType::Feature, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "database is locked");
        backend.toggle_item(1, ItemType::Feature, 2).await.unwrap();

        assert_eq!(backend.mutations().await.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_project_and_item() {
        let backend = MemoryBackend::new(1);
        let err = backend.get_summary(2).await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");

        let err = backend.toggle_item(1, ItemType::Nfr, 99).await.unwrap_err();
        assert_eq!(err.to_string(), "Item not found");
    }
}
