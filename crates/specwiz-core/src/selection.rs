//! Client-side selection helpers.
//!
//! Everything here is pure and works on the items already loaded into the
//! snapshot. Smart selection computes target ids for a bulk select;
//! validation and stats are advisory and never block a mutation.

use std::collections::BTreeSet;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Item, RecommendationType};

/// Preset used to pick bulk-select targets from recommendation metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SmartSelection {
    /// Critical and recommended items
    #[default]
    Recommended,
    /// Critical items only
    CriticalOnly,
    /// Every item of the type
    All,
}

impl SmartSelection {
    /// Whether an item matches the preset.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            SmartSelection::All => true,
            SmartSelection::CriticalOnly => item.is_critical(),
            SmartSelection::Recommended => matches!(
                item.recommendation_type,
                Some(RecommendationType::Critical | RecommendationType::Recommended)
            ),
        }
    }

    /// Whether existing selections survive when the preset is applied.
    ///
    /// Recommendation presets add to the current selection; `All` replaces it.
    pub fn preserves_existing(&self) -> bool {
        !matches!(self, SmartSelection::All)
    }
}

impl std::str::FromStr for SmartSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recommended" | "smart" => Ok(SmartSelection::Recommended),
            "critical" | "critical_only" | "critical-only" => Ok(SmartSelection::CriticalOnly),
            "all" => Ok(SmartSelection::All),
            _ => Err(format!(
                "Invalid selection preset: {s}. Must be one of recommended, critical, all"
            )),
        }
    }
}

/// Ids of the items matching a preset, in item order.
pub fn smart_targets(items: &[Item], preset: SmartSelection) -> Vec<u64> {
    items
        .iter()
        .filter(|item| preset.matches(item))
        .map(|item| item.id)
        .collect()
}

/// A selected item that shares an exclusive category with other selections.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryViolation {
    pub item_id: u64,
    pub category: String,
    pub conflicting_ids: Vec<u64>,
}

/// Advisory findings about the current selection of one item type.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SelectionReport {
    /// Selected ids listed in another selected item's `conflicts_with`
    pub conflicts: Vec<u64>,
    /// Ids required by a selected item but not selected themselves
    pub missing_dependencies: Vec<u64>,
    pub category_violations: Vec<CategoryViolation>,
}

impl SelectionReport {
    /// True when no warnings were found.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
            && self.missing_dependencies.is_empty()
            && self.category_violations.is_empty()
    }
}

/// Checks the selected items for conflicts, missing dependencies and
/// exclusive-category clashes.
///
/// The result is informational; approval is only ever blocked by an empty
/// selection.
///
/// # Examples
///
/// ```rust
/// use specwiz_core::{models::Item, selection};
///
/// let mut a = Item::new(1, true);
/// a.conflicts_with = vec![2];
/// let b = Item::new(2, true);
///
/// let report = selection::validate(&[a, b]);
/// assert_eq!(report.conflicts, vec![2]);
/// assert!(!report.is_clean());
/// ```
pub fn validate(items: &[Item]) -> SelectionReport {
    let selected: Vec<&Item> = items.iter().filter(|i| i.is_selected).collect();
    let selected_ids: BTreeSet<u64> = selected.iter().map(|i| i.id).collect();

    let conflicts = selected
        .iter()
        .flat_map(|item| item.conflicts_with.iter().copied())
        .filter(|id| selected_ids.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let missing_dependencies = selected
        .iter()
        .flat_map(|item| item.requires.iter().copied())
        .filter(|id| !selected_ids.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let category_violations = selected
        .iter()
        .filter(|item| item.category_exclusive)
        .filter_map(|item| {
            let category = item.category.as_ref()?;
            let conflicting_ids: Vec<u64> = selected
                .iter()
                .filter(|other| other.id != item.id && other.category.as_ref() == Some(category))
                .map(|other| other.id)
                .collect();
            (!conflicting_ids.is_empty()).then(|| CategoryViolation {
                item_id: item.id,
                category: category.clone(),
                conflicting_ids,
            })
        })
        .collect();

    SelectionReport {
        conflicts,
        missing_dependencies,
        category_violations,
    }
}

/// Breakdown of a selection by recommendation type.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SelectionStats {
    pub selected: usize,
    pub critical: usize,
    pub recommended: usize,
    pub optional: usize,
    /// Distinct categories among the selected items
    pub categories: usize,
    /// Critical items that are not selected
    pub missing_critical: Vec<u64>,
}

impl SelectionStats {
    /// Computes stats over one item list.
    pub fn of(items: &[Item]) -> Self {
        let selected: Vec<&Item> = items.iter().filter(|i| i.is_selected).collect();
        let count = |kind: RecommendationType| {
            selected
                .iter()
                .filter(|i| i.recommendation_type == Some(kind))
                .count()
        };

        Self {
            selected: selected.len(),
            critical: count(RecommendationType::Critical),
            recommended: count(RecommendationType::Recommended),
            optional: count(RecommendationType::Optional),
            categories: selected
                .iter()
                .map(|i| i.category.as_deref())
                .collect::<BTreeSet<_>>()
                .len(),
            missing_critical: items
                .iter()
                .filter(|i| i.is_critical() && !i.is_selected)
                .map(|i| i.id)
                .collect(),
        }
    }
}

/// Read-only view filter for item lists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ItemFilter {
    /// Only show items with this recommendation
    #[serde(default)]
    pub recommendation: Option<RecommendationType>,
    /// Only show selected items
    #[serde(default)]
    pub selected_only: bool,
}

impl ItemFilter {
    /// Whether an item passes the filter.
    pub fn matches(&self, item: &Item) -> bool {
        if self.selected_only && !item.is_selected {
            return false;
        }
        match self.recommendation {
            Some(kind) => item.recommendation_type == Some(kind),
            None => true,
        }
    }

    /// Filters a list of items, keeping their order.
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
