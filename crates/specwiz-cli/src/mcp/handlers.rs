//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use specwiz_core::{params as core, WizardEngine};

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper Implementation
// ============================================================================
//
// Core parameter types only derive JsonSchema behind the `schema` feature.
// The wrapper passes (de)serialization straight through to the core type and
// borrows its schema, so tool signatures stay in terms of core params.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn from(params: T) -> Self {
        Self(params)
    }
}

// Type aliases for cleaner usage in function signatures
pub type ProjectId = McpParams<core::ProjectId>;
pub type StepCommand = McpParams<core::StepCommand>;
pub type RejectStep = McpParams<core::RejectStep>;
pub type RegenerateStep = McpParams<core::RegenerateStep>;
pub type ListItems = McpParams<core::ListItems>;
pub type ToggleItem = McpParams<core::ToggleItem>;
pub type ItemCommand = McpParams<core::ItemCommand>;
pub type BulkSelect = McpParams<core::BulkSelect>;
pub type SmartSelect = McpParams<core::SmartSelect>;
pub type JobId = McpParams<core::JobId>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    engine: Arc<WizardEngine>,
}

impl McpHandlers {
    pub fn new(engine: Arc<WizardEngine>) -> Self {
        Self { engine }
    }

    pub async fn show_wizard(&self, Parameters(params): Parameters<ProjectId>) -> McpResult {
        debug!("show_wizard: {params:?}");

        let views = self
            .engine
            .show_wizard(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show wizard", &e))?;

        text(format!(
            "# Project {}\n\n{views}",
            params.as_ref().project_id
        ))
    }

    pub async fn show_step(&self, Parameters(params): Parameters<StepCommand>) -> McpResult {
        debug!("show_step: {params:?}");

        let view = self
            .engine
            .show_wizard_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show step", &e))?;
        text(view)
    }

    pub async fn run_step(&self, Parameters(params): Parameters<StepCommand>) -> McpResult {
        debug!("run_step: {params:?}");

        let result = self
            .engine
            .run_wizard_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to run step", &e))?;
        text(result)
    }

    pub async fn approve_step(&self, Parameters(params): Parameters<StepCommand>) -> McpResult {
        debug!("approve_step: {params:?}");

        let result = self
            .engine
            .approve_wizard_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to approve step", &e))?;
        text(result)
    }

    pub async fn reject_step(&self, Parameters(params): Parameters<RejectStep>) -> McpResult {
        debug!("reject_step: {params:?}");

        let result = self
            .engine
            .reject_wizard_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to reject step", &e))?;
        text(result)
    }

    pub async fn regenerate_step(
        &self,
        Parameters(params): Parameters<RegenerateStep>,
    ) -> McpResult {
        debug!("regenerate_step: {params:?}");

        let result = self
            .engine
            .regenerate_wizard_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to regenerate step", &e))?;
        text(result)
    }

    pub async fn list_items(&self, Parameters(params): Parameters<ListItems>) -> McpResult {
        debug!("list_items: {params:?}");

        let groups = self
            .engine
            .list_wizard_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list items", &e))?;

        let output = groups
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        text(output)
    }

    pub async fn toggle_item(&self, Parameters(params): Parameters<ToggleItem>) -> McpResult {
        debug!("toggle_item: {params:?}");

        let result = self
            .engine
            .toggle_wizard_item(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to toggle item", &e))?;
        text(result)
    }

    pub async fn select_all_items(
        &self,
        Parameters(params): Parameters<ItemCommand>,
    ) -> McpResult {
        debug!("select_all_items: {params:?}");

        let result = self
            .engine
            .select_all_wizard_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to select items", &e))?;
        text(result)
    }

    pub async fn deselect_all_items(
        &self,
        Parameters(params): Parameters<ItemCommand>,
    ) -> McpResult {
        debug!("deselect_all_items: {params:?}");

        let result = self
            .engine
            .deselect_all_wizard_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to deselect items", &e))?;
        text(result)
    }

    pub async fn bulk_select_items(
        &self,
        Parameters(params): Parameters<BulkSelect>,
    ) -> McpResult {
        debug!("bulk_select_items: {params:?}");

        let result = self
            .engine
            .bulk_select_wizard_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to select items", &e))?;
        text(result)
    }

    pub async fn smart_select_items(
        &self,
        Parameters(params): Parameters<SmartSelect>,
    ) -> McpResult {
        debug!("smart_select_items: {params:?}");

        let result = self
            .engine
            .smart_select_wizard_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to apply selection preset", &e))?;
        text(result)
    }

    pub async fn check_selection(&self, Parameters(params): Parameters<ItemCommand>) -> McpResult {
        debug!("check_selection: {params:?}");

        let result = self
            .engine
            .check_wizard_selection(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to check selection", &e))?;
        text(result)
    }

    pub async fn list_jobs(&self, Parameters(params): Parameters<ProjectId>) -> McpResult {
        debug!("list_jobs: {params:?}");

        let jobs = self
            .engine
            .list_project_jobs(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list jobs", &e))?;
        text(jobs)
    }

    pub async fn show_job(&self, Parameters(params): Parameters<JobId>) -> McpResult {
        debug!("show_job: {params:?}");

        let job = self
            .engine
            .show_job(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show job", &e))?;
        text(job)
    }
}
