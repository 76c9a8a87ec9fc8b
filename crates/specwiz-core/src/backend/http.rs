//! REST implementation of the backend traits.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{JobBackend, WizardBackend};
use crate::{
    error::{HttpResultExt, Result, WizardError},
    models::{
        ApprovalAck, BulkSelectionAck, ItemSelectionAck, ItemType, Job, SelectionSummary,
        StepRunOutcome, StepType, WizardDetail, WizardSummary,
    },
};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client for the spec-wizard REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct FeedbackBody<'a> {
    feedback: &'a str,
}

#[derive(Serialize)]
struct OptionalFeedbackBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<&'a str>,
}

#[derive(Serialize)]
struct ToggleBody {
    project_id: u64,
}

impl HttpBackend {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .http_context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .http_context(&format!("Failed to reach {url}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .http_context("Failed to read response body")?;

        if !status.is_success() {
            return Err(WizardError::backend(
                Some(status.as_u16()),
                error_message(status, &text),
            ));
        }

        decode_body(&text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::POST, path, None).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }
}

/// Request paths, relative to the base URL.
pub mod paths {
    use crate::models::{ItemType, StepType};

    pub fn summary(project_id: u64) -> String {
        format!("/projects/{project_id}/spec-wizard/summary")
    }

    pub fn detail(project_id: u64) -> String {
        format!("/projects/{project_id}/spec-wizard/detail")
    }

    pub fn run_step(project_id: u64, step_type: StepType) -> String {
        format!(
            "/projects/{project_id}/steps/{}/run",
            step_type.run_segment()
        )
    }

    /// `action` is one of `approve`, `reject` or `regenerate`.
    pub fn step_action(project_id: u64, step_type: StepType, action: &str) -> String {
        format!(
            "/projects/{project_id}/steps/{}/{action}",
            step_type.api_key()
        )
    }

    pub fn toggle_item(item_type: ItemType, item_id: u64) -> String {
        format!("/items/{}/{item_id}/toggle-select", item_type.as_str())
    }

    /// `action` is one of `select-all`, `deselect-all` or `selection-summary`.
    pub fn item_action(project_id: u64, item_type: ItemType, action: &str) -> String {
        format!(
            "/projects/{project_id}/items/{}/{action}",
            item_type.as_str()
        )
    }

    pub fn project_jobs(project_id: u64) -> String {
        format!("/projects/{project_id}/jobs")
    }

    pub fn job(job_id: u64) -> String {
        format!("/jobs/{job_id}")
    }
}

/// Extracts a human-readable message from an error response.
///
/// FastAPI wraps errors as `{"detail": "..."}`; anything else is passed
/// through verbatim.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    let body = body.trim();
    if body.is_empty() {
        return format!("Request failed: {}", status.as_u16());
    }

    match serde_json::from_str::<Detail>(body) {
        Ok(Detail {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(Detail { detail }) if !detail.is_null() => detail.to_string(),
        _ => body.to_string(),
    }
}

/// Decodes a success body; an empty body reads as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl WizardBackend for HttpBackend {
    async fn get_summary(&self, project_id: u64) -> Result<WizardSummary> {
        self.get(&paths::summary(project_id)).await
    }

    async fn get_detail(&self, project_id: u64) -> Result<WizardDetail> {
        self.get(&paths::detail(project_id)).await
    }

    async fn run_step(&self, project_id: u64, step_type: StepType) -> Result<StepRunOutcome> {
        self.post(&paths::run_step(project_id, step_type)).await
    }

    async fn approve_step(&self, project_id: u64, step_type: StepType) -> Result<ApprovalAck> {
        self.post(&paths::step_action(project_id, step_type, "approve"))
            .await
    }

    async fn reject_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: &str,
    ) -> Result<ApprovalAck> {
        self.post_json(
            &paths::step_action(project_id, step_type, "reject"),
            &FeedbackBody { feedback },
        )
        .await
    }

    async fn regenerate_step(
        &self,
        project_id: u64,
        step_type: StepType,
        feedback: Option<&str>,
    ) -> Result<ApprovalAck> {
        self.post_json(
            &paths::step_action(project_id, step_type, "regenerate"),
            &OptionalFeedbackBody { feedback },
        )
        .await
    }

    async fn toggle_item(
        &self,
        project_id: u64,
        item_type: ItemType,
        item_id: u64,
    ) -> Result<ItemSelectionAck> {
        self.post_json(
            &paths::toggle_item(item_type, item_id),
            &ToggleBody { project_id },
        )
        .await
    }

    async fn select_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        self.post(&paths::item_action(project_id, item_type, "select-all"))
            .await
    }

    async fn deselect_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        self.post(&paths::item_action(project_id, item_type, "deselect-all"))
            .await
    }

    async fn get_selection_summary(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionSummary> {
        self.get(&paths::item_action(
            project_id,
            item_type,
            "selection-summary",
        ))
        .await
    }
}

#[async_trait]
impl JobBackend for HttpBackend {
    async fn list_jobs(&self, project_id: u64) -> Result<Vec<Job>> {
        self.get(&paths::project_jobs(project_id)).await
    }

    async fn get_job(&self, job_id: u64) -> Result<Job> {
        self.get(&paths::job(job_id)).await
    }
}
