//! Step model definitions.

use std::str::FromStr;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{item::ItemType, timestamp};

/// The fixed, ordered stages of the spec wizard.
///
/// The backend reports the quality stage as `dod`; both spellings decode to
/// [`StepType::Quality`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// Project objectives; the only step that is never locked
    Objective,
    /// Technology stack options
    TechStack,
    /// Product features
    Features,
    /// Architecture components
    Architecture,
    /// Definition of done, non-functional requirements and risks
    #[serde(alias = "dod")]
    Quality,
}

impl StepType {
    /// Every step type in wizard order.
    pub const ALL: [StepType; 5] = [
        StepType::Objective,
        StepType::TechStack,
        StepType::Features,
        StepType::Architecture,
        StepType::Quality,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Objective => "objective",
            StepType::TechStack => "tech_stack",
            StepType::Features => "features",
            StepType::Architecture => "architecture",
            StepType::Quality => "quality",
        }
    }

    /// Key used by the approval endpoints (`/steps/{key}/approve`).
    ///
    /// The backend still names the quality step `dod` there.
    pub fn api_key(&self) -> &'static str {
        match self {
            StepType::Quality => "dod",
            other => other.as_str(),
        }
    }

    /// URL segment of the run endpoint (`/steps/{segment}/run`).
    pub fn run_segment(&self) -> &'static str {
        match self {
            StepType::Objective => "objective",
            StepType::TechStack => "tech-stack",
            StepType::Features => "features",
            StepType::Architecture => "architecture",
            StepType::Quality => "quality",
        }
    }

    /// Item types produced by this step.
    ///
    /// Quality is a composite step covering three item types.
    pub fn item_types(&self) -> &'static [ItemType] {
        match self {
            StepType::Objective => &[ItemType::Objective],
            StepType::TechStack => &[ItemType::TechStack],
            StepType::Features => &[ItemType::Feature],
            StepType::Architecture => &[ItemType::Architecture],
            StepType::Quality => &[ItemType::Dod, ItemType::Nfr, ItemType::Risk],
        }
    }

    /// Human-readable heading.
    pub fn label(&self) -> &'static str {
        match self {
            StepType::Objective => "Objectives",
            StepType::TechStack => "Tech Stack",
            StepType::Features => "Features",
            StepType::Architecture => "Architecture",
            StepType::Quality => "Quality",
        }
    }

    /// Zero-based position in the wizard.
    pub fn position(&self) -> usize {
        match self {
            StepType::Objective => 0,
            StepType::TechStack => 1,
            StepType::Features => 2,
            StepType::Architecture => 3,
            StepType::Quality => 4,
        }
    }
}

impl FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "objective" | "objectives" => Ok(StepType::Objective),
            "tech_stack" | "tech-stack" | "tech" => Ok(StepType::TechStack),
            "features" => Ok(StepType::Features),
            "architecture" => Ok(StepType::Architecture),
            "quality" | "dod" => Ok(StepType::Quality),
            _ => Err(format!("Invalid step type: {s}")),
        }
    }
}

/// Lifecycle status of a step run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Never run
    #[default]
    Planned,

    /// A run is in progress on the backend
    InProgress,

    /// Last run produced items
    Completed,

    /// Inputs changed since the last run
    Stale,

    /// Last run failed
    Failed,

    /// Reported by the backend for steps it refuses to run
    Locked,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(StepStatus::Planned),
            "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "stale" => Ok(StepStatus::Stale),
            "failed" => Ok(StepStatus::Failed),
            "locked" => Ok(StepStatus::Locked),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Planned => "planned",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Stale => "stale",
            StepStatus::Failed => "failed",
            StepStatus::Locked => "locked",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use specwiz_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Planned.with_icon(), "○ Planned");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Planned => "○ Planned",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Stale => "~ Stale",
            StepStatus::Failed => "✗ Failed",
            StepStatus::Locked => "■ Locked",
        }
    }
}

/// Approval state of a completed step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting a decision
    Pending,

    /// Accepted; the step's items are read-only
    Approved,

    /// Sent back with feedback; items are writable again
    Rejected,
}

impl ApprovalStatus {
    /// Convert to wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {s}")),
        }
    }
}

/// Server-computed summary of one wizard step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepSummary {
    /// Which stage this summary describes
    pub step_type: StepType,

    /// Run status
    #[serde(default)]
    pub status: StepStatus,

    /// Approval status; absent before the first run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,

    /// Number of items the step currently holds
    #[serde(default)]
    pub item_count: u32,

    /// One-line digest of the step's output
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub summary: String,

    /// When the backend last ran the step
    #[serde(default, with = "timestamp::option")]
    pub last_ai_run_at: Option<Timestamp>,

    /// When the step was last approved
    #[serde(default, with = "timestamp::option")]
    pub last_approved_at: Option<Timestamp>,
}

impl StepSummary {
    /// A never-run placeholder for a step the backend did not report.
    pub fn planned(step_type: StepType) -> Self {
        Self {
            step_type,
            status: StepStatus::Planned,
            approval_status: None,
            item_count: 0,
            summary: String::new(),
            last_ai_run_at: None,
            last_approved_at: None,
        }
    }

    /// Whether the step's approval status is `approved`.
    pub fn is_approved(&self) -> bool {
        self.approval_status == Some(ApprovalStatus::Approved)
    }

    /// Whether the last run completed.
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}
