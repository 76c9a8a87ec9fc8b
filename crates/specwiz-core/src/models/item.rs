//! Selectable item definitions.

use std::{collections::BTreeMap, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::{null_as_default, step::StepType};

/// Item-level keys used by the selection endpoints.
///
/// These are singular where the matching step keys are plural
/// (`features` → `feature`); both spellings are kept as the backend uses them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Objective,
    TechStack,
    Feature,
    Architecture,
    Dod,
    Nfr,
    Risk,
}

impl ItemType {
    /// Every item type in wizard order.
    pub const ALL: [ItemType; 7] = [
        ItemType::Objective,
        ItemType::TechStack,
        ItemType::Feature,
        ItemType::Architecture,
        ItemType::Dod,
        ItemType::Nfr,
        ItemType::Risk,
    ];

    /// Wire key used in `/items/{item_type}/…` paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Objective => "objective",
            ItemType::TechStack => "tech_stack",
            ItemType::Feature => "feature",
            ItemType::Architecture => "architecture",
            ItemType::Dod => "dod",
            ItemType::Nfr => "nfr",
            ItemType::Risk => "risk",
        }
    }

    /// The step that produces (and approves) items of this type.
    pub fn step_type(&self) -> StepType {
        match self {
            ItemType::Objective => StepType::Objective,
            ItemType::TechStack => StepType::TechStack,
            ItemType::Feature => StepType::Features,
            ItemType::Architecture => StepType::Architecture,
            ItemType::Dod | ItemType::Nfr | ItemType::Risk => StepType::Quality,
        }
    }

    /// Human-readable heading.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Objective => "Objectives",
            ItemType::TechStack => "Tech Stack Options",
            ItemType::Feature => "Features",
            ItemType::Architecture => "Architecture Components",
            ItemType::Dod => "Definition of Done",
            ItemType::Nfr => "Non-Functional Requirements",
            ItemType::Risk => "Risks",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "objective" => Ok(ItemType::Objective),
            "tech_stack" | "tech-stack" => Ok(ItemType::TechStack),
            "feature" => Ok(ItemType::Feature),
            "architecture" => Ok(ItemType::Architecture),
            "dod" => Ok(ItemType::Dod),
            "nfr" => Ok(ItemType::Nfr),
            "risk" => Ok(ItemType::Risk),
            _ => Err(format!(
                "Invalid item type: {s}. Must be one of objective, tech_stack, feature, architecture, dod, nfr, risk"
            )),
        }
    }
}

/// Backend recommendation attached to an item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Critical,
    Recommended,
    Optional,
}

impl RecommendationType {
    /// Convert to wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Critical => "critical",
            RecommendationType::Recommended => "recommended",
            RecommendationType::Optional => "optional",
        }
    }

    /// Badge text with icon.
    pub fn with_icon(&self) -> &'static str {
        match self {
            RecommendationType::Critical => "⚠ CRITICAL",
            RecommendationType::Recommended => "★ RECOMMENDED",
            RecommendationType::Optional => "· OPTIONAL",
        }
    }
}

impl FromStr for RecommendationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(RecommendationType::Critical),
            "recommended" => Ok(RecommendationType::Recommended),
            "optional" => Ok(RecommendationType::Optional),
            _ => Err(format!("Invalid recommendation type: {s}")),
        }
    }
}

/// Reads a recommendation the way the backend stores it: free text.
///
/// Case and surrounding whitespace are ignored. Anything that is not one of
/// the three known kinds, including non-string values, becomes `None` so a
/// single odd item never fails the whole detail payload.
fn lenient_recommendation<'de, D>(deserializer: D) -> Result<Option<RecommendationType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|value| value.trim().parse().ok()))
}

/// One selectable unit produced by a step.
///
/// Common decision-support metadata is typed. Fields specific to one item
/// type (an NFR's `type`, an architecture component's `layer`, the tech
/// stack sections) are kept verbatim in [`Item::extra`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Item {
    /// Unique per item type within a project
    pub id: u64,

    /// Whether the item is part of the current selection
    #[serde(default)]
    pub is_selected: bool,

    /// Objective title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Feature or component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Objective body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category used for exclusivity checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Priority, nominally 1 (low) to 5 (high); not range-checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<String>,

    /// Unrecognised values decode as `None`
    #[serde(
        default,
        deserialize_with = "lenient_recommendation",
        skip_serializing_if = "Option::is_none"
    )]
    pub recommendation_type: Option<RecommendationType>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category_tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub advantages: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub disadvantages: Vec<String>,

    /// Ids of same-type items this one conflicts with
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflicts_with: Vec<u64>,

    /// Ids of same-type items this one depends on
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires: Vec<u64>,

    /// At most one selected item per `category` when set
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_exclusive: bool,

    /// Type-specific fields not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Item {
    /// Creates a bare item with only an id and selection flag.
    pub fn new(id: u64, is_selected: bool) -> Self {
        Self {
            id,
            is_selected,
            ..Default::default()
        }
    }

    /// Sets the recommendation type.
    pub fn with_recommendation(mut self, recommendation: RecommendationType) -> Self {
        self.recommendation_type = Some(recommendation);
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Best available heading for the item.
    ///
    /// Tech stack options have no name of their own; their section names
    /// are joined instead.
    pub fn label(&self) -> String {
        if let Some(label) = self.name.as_ref().or(self.title.as_ref()) {
            return label.clone();
        }
        let sections: Vec<&str> = ["frontend", "backend", "database", "infra"]
            .iter()
            .filter_map(|key| self.extra.get(*key))
            .filter_map(|section| section.get("name").and_then(|n| n.as_str()))
            .collect();
        if !sections.is_empty() {
            return sections.join(", ");
        }
        self.description
            .clone()
            .unwrap_or_else(|| format!("Item {}", self.id))
    }

    /// Secondary text: description, objective text, or rationale.
    ///
    /// The description is skipped when [`Item::label`] already used it.
    pub fn body(&self) -> Option<&str> {
        let labelled = self.name.is_some() || self.title.is_some();
        self.description
            .as_deref()
            .filter(|_| labelled)
            .or(self.text.as_deref())
            .or(self.rationale.as_deref())
    }

    /// Whether the backend flagged this item as critical.
    pub fn is_critical(&self) -> bool {
        self.recommendation_type == Some(RecommendationType::Critical)
    }
}
