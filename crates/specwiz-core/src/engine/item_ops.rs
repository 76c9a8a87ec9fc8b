//! Item selection operations for the WizardEngine.

use std::collections::BTreeSet;

use log::{debug, warn};
use serde::Serialize;

use super::{Slice, WizardEngine};
use crate::{
    error::{Result, WizardError},
    models::{BulkSelectionAck, ItemSelectionAck, ItemType, SelectionSummary},
    rules,
    selection::{self, SelectionReport, SelectionStats, SmartSelection},
};

/// Options for [`WizardEngine::bulk_smart_select`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSelectOptions {
    /// Keep the current selection and only add the targets. When false,
    /// every item of the type is deselected first.
    pub preserve_existing: bool,
}

impl BulkSelectOptions {
    /// Replace the current selection with the targets.
    pub fn replace() -> Self {
        Self {
            preserve_existing: false,
        }
    }

    /// Add the targets to the current selection.
    pub fn preserve() -> Self {
        Self {
            preserve_existing: true,
        }
    }
}

/// What a completed bulk select did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkSelectOutcome {
    pub item_type: ItemType,
    /// Whether the type was cleared before toggling
    pub cleared: bool,
    /// Ids toggled on, in request order
    pub toggled: Vec<u64>,
    /// Targets skipped because they were already selected
    pub already_selected: Vec<u64>,
}

impl WizardEngine {
    /// Flips one item's selection, then reloads the detail.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::ApprovedStep` without contacting the backend if
    /// the owning step is approved.
    pub async fn toggle_item(
        &self,
        project_id: u64,
        item_type: ItemType,
        item_id: u64,
    ) -> Result<ItemSelectionAck> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_writable(&state, item_type)?;

        let ack = self
            .backend
            .toggle_item(project_id, item_type, item_id)
            .await?;
        debug!(
            "Toggled {} item {item_id} to {}",
            item_type.as_str(),
            ack.is_selected
        );

        self.reload(project_id, Slice::Detail).await?;
        Ok(ack)
    }

    /// Selects every item of a type in one call, then reloads the detail.
    pub async fn select_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_writable(&state, item_type)?;

        let ack = self
            .backend
            .select_all_items(project_id, item_type)
            .await?;
        self.reload(project_id, Slice::Detail).await?;
        Ok(ack)
    }

    /// Deselects every item of a type in one call, then reloads the detail.
    pub async fn deselect_all_items(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<BulkSelectionAck> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_writable(&state, item_type)?;

        let ack = self
            .backend
            .deselect_all_items(project_id, item_type)
            .await?;
        self.reload(project_id, Slice::Detail).await?;
        Ok(ack)
    }

    /// Selects `ids` through sequential toggles.
    ///
    /// Unless `preserve_existing` is set, the type is cleared first. With it
    /// set, targets that are already selected are left alone so the toggle
    /// cannot deselect them. Each toggle is awaited before the next one is
    /// sent.
    ///
    /// The operation is not atomic. The detail is reloaded whether or not
    /// every toggle went through, and the reloaded snapshot is the truth.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::ApprovedStep` before any call if the owning step
    /// is approved, and `WizardError::BulkSelect` carrying the first backend
    /// failure otherwise.
    pub async fn bulk_smart_select(
        &self,
        project_id: u64,
        item_type: ItemType,
        ids: &[u64],
        options: BulkSelectOptions,
    ) -> Result<BulkSelectOutcome> {
        let state = self.ensure_loaded(project_id).await?;
        rules::ensure_writable(&state, item_type)?;

        let mut seen = BTreeSet::new();
        let targets: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let selected: BTreeSet<u64> = if options.preserve_existing {
            state
                .items(item_type)
                .iter()
                .filter(|item| item.is_selected)
                .map(|item| item.id)
                .collect()
        } else {
            BTreeSet::new()
        };
        let (already_selected, pending): (Vec<u64>, Vec<u64>) =
            targets.into_iter().partition(|id| selected.contains(id));

        let applied = self
            .apply_toggles(project_id, item_type, &pending, !options.preserve_existing)
            .await;

        let reloaded = self.reload(project_id, Slice::Detail).await;

        match (applied, reloaded) {
            (Ok(()), Ok(_)) => Ok(BulkSelectOutcome {
                item_type,
                cleared: !options.preserve_existing,
                toggled: pending,
                already_selected,
            }),
            (Ok(()), Err(e)) => Err(e),
            (Err((applied, source)), reloaded) => {
                if let Err(e) = reloaded {
                    warn!("Reload after partial bulk select failed: {e}");
                }
                Err(WizardError::BulkSelect {
                    applied,
                    requested: pending.len(),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Applies a recommendation preset to one item type.
    ///
    /// Targets are computed from the loaded items; `All` replaces the
    /// current selection, the recommendation presets add to it.
    pub async fn smart_select(
        &self,
        project_id: u64,
        item_type: ItemType,
        preset: SmartSelection,
    ) -> Result<BulkSelectOutcome> {
        let state = self.ensure_loaded(project_id).await?;
        let targets = selection::smart_targets(state.items(item_type), preset);
        debug!(
            "Smart select {preset:?} on {} picked {} items",
            item_type.as_str(),
            targets.len()
        );

        let options = BulkSelectOptions {
            preserve_existing: preset.preserves_existing(),
        };
        self.bulk_smart_select(project_id, item_type, &targets, options)
            .await
    }

    /// Advisory checks over the current selection of one item type.
    pub async fn validate_selection(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionReport> {
        let state = self.ensure_loaded(project_id).await?;
        Ok(selection::validate(state.items(item_type)))
    }

    /// Recommendation breakdown of the current selection of one item type.
    pub async fn selection_stats(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionStats> {
        let state = self.ensure_loaded(project_id).await?;
        Ok(SelectionStats::of(state.items(item_type)))
    }

    /// Server-side selection counts for one item type.
    pub async fn selection_summary(
        &self,
        project_id: u64,
        item_type: ItemType,
    ) -> Result<SelectionSummary> {
        self.backend
            .get_selection_summary(project_id, item_type)
            .await
    }

    /// Optionally clears the type, then toggles `ids` one at a time.
    ///
    /// On failure returns how many toggles went through and the error.
    async fn apply_toggles(
        &self,
        project_id: u64,
        item_type: ItemType,
        ids: &[u64],
        clear_first: bool,
    ) -> std::result::Result<(), (usize, WizardError)> {
        if clear_first {
            self.backend
                .deselect_all_items(project_id, item_type)
                .await
                .map_err(|e| (0, e))?;
        }

        for (applied, id) in ids.iter().enumerate() {
            self.backend
                .toggle_item(project_id, item_type, *id)
                .await
                .map_err(|e| (applied, e))?;
        }
        Ok(())
    }
}
