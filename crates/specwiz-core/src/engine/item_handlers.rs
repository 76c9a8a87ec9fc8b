//! Item handler operations that return formatted wrapper types for the
//! WizardEngine.

use crate::{
    display::{BulkSelectResult, Items, SelectionResult, ToggleResult, ValidationResult},
    error::Result,
    models::{ItemType, WizardState},
    params::{BulkSelect, ItemCommand, ListItems, SmartSelect, ToggleItem},
    selection::{self, ItemFilter, SelectionStats},
};

use super::{BulkSelectOptions, BulkSelectOutcome, WizardEngine};

impl WizardEngine {
    /// Handle listing items.
    ///
    /// Filters are applied to the loaded snapshot only; nothing about them
    /// is stored on the engine.
    ///
    /// # Arguments
    ///
    /// * `params` - Project, optional item type and view filter
    ///
    /// # Returns
    ///
    /// One group per item type, in wizard order
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{
    /// #     models::{ItemType, RecommendationType},
    /// #     params::ListItems,
    /// #     selection::ItemFilter,
    /// #     EngineBuilder,
    /// # };
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = ListItems {
    ///     project_id: 1,
    ///     item_type: Some(ItemType::Feature),
    ///     filter: ItemFilter {
    ///         recommendation: Some(RecommendationType::Critical),
    ///         selected_only: false,
    ///     },
    /// };
    /// for group in engine.list_wizard_items(&params).await? {
    ///     println!("{group}");
    /// }
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn list_wizard_items(&self, params: &ListItems) -> Result<Vec<Items>> {
        let state = self.ensure_loaded(params.project_id).await?;
        let types: Vec<ItemType> = match params.item_type {
            Some(item_type) => vec![item_type],
            None => ItemType::ALL.to_vec(),
        };

        Ok(types
            .into_iter()
            .map(|item_type| filtered_items(&state, item_type, &params.filter))
            .collect())
    }

    /// Handle toggling one item.
    ///
    /// # Arguments
    ///
    /// * `params` - Project, item type and item id
    ///
    /// # Returns
    ///
    /// The item's new selection state as reported by the backend
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{models::ItemType, params::ToggleItem, EngineBuilder};
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = ToggleItem {
    ///     project_id: 1,
    ///     item_type: ItemType::Risk,
    ///     item_id: 12,
    /// };
    /// let result = engine.toggle_wizard_item(&params).await?;
    /// println!("{result}");
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn toggle_wizard_item(&self, params: &ToggleItem) -> Result<ToggleResult> {
        let ack = self
            .toggle_item(params.project_id, params.item_type, params.item_id)
            .await?;
        Ok(ToggleResult::new(ack))
    }

    /// Handle selecting every item of a type.
    pub async fn select_all_wizard_items(&self, params: &ItemCommand) -> Result<SelectionResult> {
        let ack = self
            .select_all_items(params.project_id, params.item_type)
            .await?;
        let items = self.current_items(params.project_id, params.item_type).await?;
        Ok(SelectionResult::new(ack, items))
    }

    /// Handle deselecting every item of a type.
    pub async fn deselect_all_wizard_items(&self, params: &ItemCommand) -> Result<SelectionResult> {
        let ack = self
            .deselect_all_items(params.project_id, params.item_type)
            .await?;
        let items = self.current_items(params.project_id, params.item_type).await?;
        Ok(SelectionResult::new(ack, items))
    }

    /// Handle selecting an explicit list of items.
    ///
    /// # Arguments
    ///
    /// * `params` - Project, item type, ids and whether to keep the current
    ///   selection
    ///
    /// # Returns
    ///
    /// What was toggled, the refreshed items and an advisory validation of
    /// the new selection
    pub async fn bulk_select_wizard_items(&self, params: &BulkSelect) -> Result<BulkSelectResult> {
        let options = BulkSelectOptions {
            preserve_existing: params.preserve_existing,
        };
        let outcome = self
            .bulk_smart_select(params.project_id, params.item_type, &params.ids, options)
            .await?;
        self.bulk_result(params.project_id, outcome).await
    }

    /// Handle applying a recommendation preset.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use specwiz_core::{
    /// #     models::ItemType, params::SmartSelect, selection::SmartSelection, EngineBuilder,
    /// # };
    /// # async {
    /// let engine = EngineBuilder::new().build()?;
    /// let params = SmartSelect {
    ///     project_id: 1,
    ///     item_type: ItemType::Feature,
    ///     preset: SmartSelection::Recommended,
    /// };
    /// let result = engine.smart_select_wizard_items(&params).await?;
    /// println!("{result}");
    /// # Result::<(), specwiz_core::WizardError>::Ok(())
    /// # };
    /// ```
    pub async fn smart_select_wizard_items(
        &self,
        params: &SmartSelect,
    ) -> Result<BulkSelectResult> {
        let outcome = self
            .smart_select(params.project_id, params.item_type, params.preset)
            .await?;
        self.bulk_result(params.project_id, outcome).await
    }

    /// Handle checking one item type's selection.
    ///
    /// Advisory only; nothing is blocked on the result.
    pub async fn check_wizard_selection(&self, params: &ItemCommand) -> Result<ValidationResult> {
        let state = self.ensure_loaded(params.project_id).await?;
        let items = state.items(params.item_type);
        Ok(ValidationResult {
            item_type: params.item_type,
            stats: SelectionStats::of(items),
            report: selection::validate(items),
        })
    }

    async fn current_items(&self, project_id: u64, item_type: ItemType) -> Result<Items> {
        let state = self.ensure_loaded(project_id).await?;
        Ok(Items::new(item_type, state.items(item_type).to_vec()))
    }

    async fn bulk_result(
        &self,
        project_id: u64,
        outcome: BulkSelectOutcome,
    ) -> Result<BulkSelectResult> {
        let items = self.current_items(project_id, outcome.item_type).await?;
        let report = selection::validate(&items.items);
        Ok(BulkSelectResult::new(outcome, items, report))
    }
}

fn filtered_items(state: &WizardState, item_type: ItemType, filter: &ItemFilter) -> Items {
    let items = filter
        .apply(state.items(item_type))
        .into_iter()
        .cloned()
        .collect();
    Items::new(item_type, items)
}
