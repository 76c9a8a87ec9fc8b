//! Data models for wizard steps, items and jobs.
//!
//! This module contains the domain models the backend reports and the
//! read model the engine derives from them. Display implementations for these
//! models are located in [`crate::display::models`] to keep data structures
//! and presentation apart.
//!
//! # Shape of the wizard
//!
//! ```text
//! StepType        ItemType(s)              detail list
//! ───────────     ─────────────────────    ───────────────
//! objective   ──▶ objective                objectives
//! tech_stack  ──▶ tech_stack               tech_stack
//! features    ──▶ feature                  features
//! architecture──▶ architecture             architecture
//! quality     ──▶ dod, nfr, risk           dod_items, nfr_items, risk_items
//! ```
//!
//! Step keys and item keys differ (`features` vs `feature`); both are the
//! backend's own spelling and are used verbatim on the wire.
//!
//! # Examples
//!
//! ```rust
//! use specwiz_core::models::{Item, ItemType, StepType, WizardDetail};
//!
//! let mut detail = WizardDetail::empty(1);
//! detail.dod_items = vec![Item::new(1, true), Item::new(2, false)];
//! detail.nfr_items = vec![Item::new(3, false)];
//! detail.risk_items = vec![Item::new(4, true)];
//!
//! let quality = detail.step_selection(StepType::Quality);
//! assert_eq!((quality.selected, quality.total), (2, 4));
//! assert_eq!(ItemType::Nfr.step_type(), StepType::Quality);
//! ```

use serde::{Deserialize, Deserializer};

pub mod item;
pub mod job;
pub mod responses;
pub mod state;
pub mod step;
pub mod timestamp;

#[cfg(test)]
mod tests;

pub use item::{Item, ItemType, RecommendationType};
pub use job::{Job, JobStatus};
pub use responses::{
    ApprovalAck, BulkSelectionAck, ItemSelectionAck, SelectionSummary, StepRunOutcome,
};
pub use state::{SelectionCount, StepView, WizardDetail, WizardState, WizardSummary};
pub use step::{ApprovalStatus, StepStatus, StepSummary, StepType};

/// Decodes an explicit `null` as the type's default.
///
/// The backend sends `null` for empty optional lists; combine with
/// `#[serde(default)]` to also cover missing keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
