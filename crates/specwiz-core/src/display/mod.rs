//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! Collections and command outcomes are wrapped in types that add headers,
//! counts and change lists. Everything renders as markdown, which the CLI
//! passes through its terminal renderer and the MCP server returns as text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Collections &   │    │   Formatted     │
//! │ (StepView, Item)│───▶│  Result Types   │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (StepViews, Items, Jobs)
//! - [`results`]: Command result types (RunResult, ApprovalResult,
//!   ToggleResult, SelectionResult, BulkSelectResult, ValidationResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use specwiz_core::{
//!     display::{Items, OperationStatus},
//!     models::{Item, ItemType, RecommendationType},
//! };
//!
//! let items = Items::new(
//!     ItemType::Feature,
//!     vec![Item::new(1, true)
//!         .with_name("Export to PDF")
//!         .with_recommendation(RecommendationType::Recommended)],
//! );
//! let output = items.to_string();
//! assert!(output.contains("### Features (1/1 selected)"));
//! assert!(output.contains("★ RECOMMENDED"));
//!
//! let status = OperationStatus::success("Item selection toggled");
//! assert_eq!(status.to_string(), "Success: Item selection toggled\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{Items, Jobs, StepViews};
pub use datetime::{LocalDateTime, OptionalDateTime};
pub use results::{
    ApprovalResult, BulkSelectResult, RunResult, SelectionResult, ToggleResult, ValidationResult,
};
pub use status::OperationStatus;
