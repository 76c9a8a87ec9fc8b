//! MCP server implementation for Specwiz
//!
//! Exposes the wizard's step, item and job commands as MCP tools so an AI
//! assistant can drive a project through the same approval workflow as the
//! terminal front end.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use specwiz_core::WizardEngine;
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{
    BulkSelect, ItemCommand, JobId, ListItems, McpResult, ProjectId, RegenerateStep, RejectStep,
    SmartSelect, StepCommand, ToggleItem,
};

/// MCP server for Specwiz
#[derive(Clone)]
pub struct SpecwizMcpServer {
    engine: Arc<WizardEngine>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SpecwizMcpServer {
    /// Create a new Specwiz MCP server
    pub fn new(engine: WizardEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(Arc::clone(&self.engine))
    }

    #[tool(
        name = "show_wizard",
        description = "Show all five wizard steps of a project (objective, tech_stack, features, architecture, quality) with their run status, approval status, selection counts and whether they are locked. Always fetches fresh state. Start here to see where a project stands."
    )]
    async fn show_wizard(&self, params: Parameters<ProjectId>) -> McpResult {
        self.handlers().show_wizard(params).await
    }

    #[tool(
        name = "show_step",
        description = "Show one wizard step: status, approval, how many of its items are selected, and its summary."
    )]
    async fn show_step(&self, params: Parameters<StepCommand>) -> McpResult {
        self.handlers().show_step(params).await
    }

    #[tool(
        name = "run_step",
        description = "Run a wizard step on the backend to generate its items. Every step except 'objective' is locked until the objective step has completed. Only one step can run at a time. Returns the refreshed step."
    )]
    async fn run_step(&self, params: Parameters<StepCommand>) -> McpResult {
        self.handlers().run_step(params).await
    }

    #[tool(
        name = "approve_step",
        description = "Approve a completed step. At least one of the step's items must be selected; after approval the step's items are read-only until the step is rejected or regenerated."
    )]
    async fn approve_step(&self, params: Parameters<StepCommand>) -> McpResult {
        self.handlers().approve_step(params).await
    }

    #[tool(
        name = "reject_step",
        description = "Reject a completed step with feedback explaining what needs to change. Feedback is required. The step's items become selectable again."
    )]
    async fn reject_step(&self, params: Parameters<RejectStep>) -> McpResult {
        self.handlers().reject_step(params).await
    }

    #[tool(
        name = "regenerate_step",
        description = "Regenerate a step's items, optionally guided by feedback. Replaces the current items (and their selection) and resets the step's approval to pending."
    )]
    async fn regenerate_step(&self, params: Parameters<RegenerateStep>) -> McpResult {
        self.handlers().regenerate_step(params).await
    }

    #[tool(
        name = "list_items",
        description = "List a project's generated items with their selection state, recommendation (critical/recommended/optional), priority, pros and cons, dependencies and conflicts. Restrict with item_type (objective, tech_stack, feature, architecture, dod, nfr, risk), recommendation, or selected_only."
    )]
    async fn list_items(&self, params: Parameters<ListItems>) -> McpResult {
        self.handlers().list_items(params).await
    }

    #[tool(
        name = "toggle_item",
        description = "Flip one item's selection. Fails if the item's step is approved."
    )]
    async fn toggle_item(&self, params: Parameters<ToggleItem>) -> McpResult {
        self.handlers().toggle_item(params).await
    }

    #[tool(
        name = "select_all_items",
        description = "Select every item of one type. Fails if the item's step is approved."
    )]
    async fn select_all_items(&self, params: Parameters<ItemCommand>) -> McpResult {
        self.handlers().select_all_items(params).await
    }

    #[tool(
        name = "deselect_all_items",
        description = "Deselect every item of one type. Fails if the item's step is approved."
    )]
    async fn deselect_all_items(&self, params: Parameters<ItemCommand>) -> McpResult {
        self.handlers().deselect_all_items(params).await
    }

    #[tool(
        name = "bulk_select_items",
        description = "Select the given item ids. Clears the current selection first unless preserve_existing=true. Items are toggled one at a time, so a failure part way through leaves earlier toggles applied. Returns the new selection with conflict and dependency warnings."
    )]
    async fn bulk_select_items(&self, params: Parameters<BulkSelect>) -> McpResult {
        self.handlers().bulk_select_items(params).await
    }

    #[tool(
        name = "smart_select_items",
        description = "Select items by recommendation. preset 'recommended' (default) adds critical and recommended items to the selection, 'critical_only' adds critical items, 'all' replaces the selection with every item."
    )]
    async fn smart_select_items(&self, params: Parameters<SmartSelect>) -> McpResult {
        self.handlers().smart_select_items(params).await
    }

    #[tool(
        name = "check_selection",
        description = "Check one item type's selection for conflicts, missing dependencies, exclusive-category clashes and unselected critical items. Advisory only; nothing is blocked."
    )]
    async fn check_selection(&self, params: Parameters<ItemCommand>) -> McpResult {
        self.handlers().check_selection(params).await
    }

    #[tool(
        name = "list_jobs",
        description = "List a project's backend jobs with status and progress, newest first."
    )]
    async fn list_jobs(&self, params: Parameters<ProjectId>) -> McpResult {
        self.handlers().list_jobs(params).await
    }

    #[tool(
        name = "show_job",
        description = "Show one backend job's status, progress, current step and error."
    )]
    async fn show_job(&self, params: Parameters<JobId>) -> McpResult {
        self.handlers().show_job(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SpecwizMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "specwiz".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(r#"Specwiz drives a project's specification through a five-step approval wizard.

## Steps
1. objective - what the project is for
2. tech_stack - technology options
3. features - product features
4. architecture - architecture components
5. quality - definition of done, non-functional requirements and risks

## Workflow
1. `show_wizard` to see every step's status
2. `run_step` to generate a step's items (everything after the objective is locked until the objective step has completed)
3. `list_items`, then select with `toggle_item`, `bulk_select_items` or `smart_select_items`
4. `check_selection` for conflicts and missing dependencies
5. `approve_step` (needs at least one selected item), or `reject_step` with feedback, or `regenerate_step`

Approved steps are read-only; reject or regenerate them to change their selection."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: SpecwizMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Specwiz MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
