//! Command-line argument definitions using clap
//!
//! Each `*Args` struct carries clap attributes only and converts into the
//! matching core parameter type, so the core stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → WizardEngine
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand};
use specwiz_core::{
    models::{ItemType, RecommendationType, StepType},
    params::*,
    selection::{ItemFilter, SmartSelection},
};

/// Terminal front end for the spec wizard
///
/// Walks a project through the five wizard steps (objective, tech stack,
/// features, architecture, quality): run each step on the backend, review
/// and select the generated items, then approve or reject the step. Can also
/// run as an MCP server so AI assistants drive the same workflow.
#[derive(Parser)]
#[command(version, about, name = "sw")]
pub struct Args {
    /// Base URL of the spec-wizard API. Overrides the config file and
    /// $SPECWIZ_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show every step of a project's wizard
    #[command(alias = "w")]
    Wizard(ProjectArgs),
    /// Run, approve, reject or regenerate steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Review and select generated items
    #[command(alias = "i")]
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Inspect backend jobs
    #[command(alias = "j")]
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Start the MCP server on stdio
    Serve,
}

/// The project to operate on
#[derive(ClapArgs)]
pub struct ProjectArgs {
    /// Project ID
    #[arg(short, long = "project", env = "SPECWIZ_PROJECT")]
    pub project_id: u64,
}

impl From<ProjectArgs> for ProjectId {
    fn from(val: ProjectArgs) -> Self {
        ProjectId {
            project_id: val.project_id,
        }
    }
}

// ============================================================================
// Step commands
// ============================================================================

/// A step of a project's wizard
#[derive(ClapArgs)]
pub struct StepArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    /// Step to operate on (objective, tech_stack, features, architecture,
    /// quality)
    pub step_type: StepType,
}

impl From<StepArgs> for StepCommand {
    fn from(val: StepArgs) -> Self {
        StepCommand {
            project_id: val.project.project_id,
            step_type: val.step_type,
        }
    }
}

/// Reject a step with feedback
///
/// Rejecting sends the step back for changes and makes its items selectable
/// again. The feedback is stored with the step and is required.
#[derive(ClapArgs)]
pub struct RejectStepArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub step_type: StepType,
    /// What needs to change
    #[arg(short, long)]
    pub feedback: String,
}

impl From<RejectStepArgs> for RejectStep {
    fn from(val: RejectStepArgs) -> Self {
        RejectStep {
            project_id: val.project.project_id,
            step_type: val.step_type,
            feedback: val.feedback,
        }
    }
}

/// Regenerate a step
///
/// Replaces the step's items with a fresh run and resets its approval to
/// pending. Any previous selection of those items is lost.
#[derive(ClapArgs)]
pub struct RegenerateStepArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub step_type: StepType,
    /// Optional guidance for the regeneration
    #[arg(short, long)]
    pub feedback: Option<String>,
}

impl From<RegenerateStepArgs> for RegenerateStep {
    fn from(val: RegenerateStepArgs) -> Self {
        RegenerateStep {
            project_id: val.project.project_id,
            step_type: val.step_type,
            feedback: val.feedback,
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Show one step
    #[command(alias = "s")]
    Show(StepArgs),
    /// Run a step on the backend
    #[command(alias = "r")]
    Run(StepArgs),
    /// Approve a step; its items become read-only
    #[command(alias = "a")]
    Approve(StepArgs),
    /// Reject a step with feedback
    Reject(RejectStepArgs),
    /// Regenerate a step's items
    #[command(alias = "regen")]
    Regenerate(RegenerateStepArgs),
}

// ============================================================================
// Item commands
// ============================================================================

/// List a project's items
///
/// Lists every item type when none is given. Filters only affect what is
/// shown.
#[derive(ClapArgs)]
pub struct ListItemsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    /// Item type (objective, tech_stack, feature, architecture, dod, nfr,
    /// risk)
    pub item_type: Option<ItemType>,
    /// Only show items with this recommendation (critical, recommended,
    /// optional)
    #[arg(short, long)]
    pub recommendation: Option<RecommendationType>,
    /// Only show selected items
    #[arg(long)]
    pub selected: bool,
}

impl From<ListItemsArgs> for ListItems {
    fn from(val: ListItemsArgs) -> Self {
        ListItems {
            project_id: val.project.project_id,
            item_type: val.item_type,
            filter: ItemFilter {
                recommendation: val.recommendation,
                selected_only: val.selected,
            },
        }
    }
}

/// Toggle one item's selection
#[derive(ClapArgs)]
pub struct ToggleItemArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub item_type: ItemType,
    /// ID of the item to toggle
    pub item_id: u64,
}

impl From<ToggleItemArgs> for ToggleItem {
    fn from(val: ToggleItemArgs) -> Self {
        ToggleItem {
            project_id: val.project.project_id,
            item_type: val.item_type,
            item_id: val.item_id,
        }
    }
}

/// Every item of one type
#[derive(ClapArgs)]
pub struct ItemTypeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub item_type: ItemType,
}

impl From<ItemTypeArgs> for ItemCommand {
    fn from(val: ItemTypeArgs) -> Self {
        ItemCommand {
            project_id: val.project.project_id,
            item_type: val.item_type,
        }
    }
}

/// Select an explicit set of items
///
/// Clears the current selection first unless --keep is given. Items are
/// toggled one at a time; a failure part way through leaves the earlier
/// toggles applied.
#[derive(ClapArgs)]
pub struct BulkSelectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub item_type: ItemType,
    /// Item IDs as a comma-separated list
    #[arg(value_delimiter = ',', required = true)]
    pub ids: Vec<u64>,
    /// Keep the current selection and add to it
    #[arg(short, long)]
    pub keep: bool,
}

impl From<BulkSelectArgs> for BulkSelect {
    fn from(val: BulkSelectArgs) -> Self {
        BulkSelect {
            project_id: val.project.project_id,
            item_type: val.item_type,
            ids: val.ids,
            preserve_existing: val.keep,
        }
    }
}

/// Select items by recommendation
#[derive(ClapArgs)]
pub struct SmartSelectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    pub item_type: ItemType,
    /// recommended (critical and recommended items, added to the current
    /// selection), critical, or all (replaces the selection)
    #[arg(long, default_value = "recommended")]
    pub preset: SmartSelection,
}

impl From<SmartSelectArgs> for SmartSelect {
    fn from(val: SmartSelectArgs) -> Self {
        SmartSelect {
            project_id: val.project.project_id,
            item_type: val.item_type,
            preset: val.preset,
        }
    }
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// List items
    #[command(aliases = ["l", "ls"])]
    List(ListItemsArgs),
    /// Toggle one item
    #[command(alias = "t")]
    Toggle(ToggleItemArgs),
    /// Select every item of a type
    SelectAll(ItemTypeArgs),
    /// Deselect every item of a type
    DeselectAll(ItemTypeArgs),
    /// Select the given item IDs
    Select(BulkSelectArgs),
    /// Select items by recommendation
    Smart(SmartSelectArgs),
    /// Check a selection for conflicts and missing dependencies
    Check(ItemTypeArgs),
}

// ============================================================================
// Job commands
// ============================================================================

/// A single job
#[derive(ClapArgs)]
pub struct JobArgs {
    /// Job ID
    pub job_id: u64,
}

impl From<JobArgs> for JobId {
    fn from(val: JobArgs) -> Self {
        JobId { job_id: val.job_id }
    }
}

#[derive(Subcommand)]
pub enum JobCommands {
    /// List a project's jobs
    #[command(aliases = ["l", "ls"])]
    List(ProjectArgs),
    /// Show one job
    #[command(alias = "s")]
    Show(JobArgs),
    /// Follow a job until it finishes
    #[command(alias = "w")]
    Watch(JobArgs),
}
