//! Core library for the spec wizard console.
//!
//! The spec wizard walks a project through five AI-generated planning steps
//! (objectives, tech stack, features, architecture, quality). Each step
//! produces items the user curates by selection and then approves, rejects
//! with feedback, or regenerates. This crate holds the client side of that
//! workflow: the read model, the client-side rules, selection helpers and
//! the engine that forwards commands to the planning API.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): backend data and the derived read model
//! - **Display** ([`display`]): markdown formatting for terminals and MCP
//!   clients
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use specwiz_core::{models::StepType, Config, EngineBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = EngineBuilder::new().with_config(Config::load()?).build()?;
//!
//! let state = engine.load_wizard_state(42).await?;
//! for view in state.views(None) {
//!     println!("{view}");
//! }
//!
//! if !state.is_locked(StepType::TechStack) {
//!     engine.run_step(42, StepType::TechStack).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod poller;
pub mod rules;
pub mod selection;

// Re-export commonly used types
pub use config::Config;
pub use display::{
    ApprovalResult, BulkSelectResult, Items, Jobs, OperationStatus, RunResult, SelectionResult,
    StepViews, ToggleResult,
};
pub use engine::{BulkSelectOptions, BulkSelectOutcome, EngineBuilder, WizardEngine};
pub use error::{Result, WizardError};
pub use models::{ItemType, StepType, WizardState};
pub use params::{
    BulkSelect, ItemCommand, JobId, ListItems, ProjectId, RegenerateStep, RejectStep, SmartSelect,
    StepCommand, ToggleItem,
};
pub use poller::{JobPollHandle, JobPoller};
