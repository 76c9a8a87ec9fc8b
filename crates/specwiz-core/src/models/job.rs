//! Background job model, as reported by the task pipeline.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Job queue status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Convert to wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// A terminal job will not change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" | "canceled" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

/// A queued or running backend job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: u64,

    /// Job type, e.g. `task_pipeline_for_sprint`
    #[serde(rename = "type")]
    pub kind: String,

    pub status: JobStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_pct: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<Timestamp>,

    #[serde(default, with = "timestamp::option")]
    pub finished_at: Option<Timestamp>,
}

impl Job {
    /// A task pipeline job with no progress reported yet.
    pub fn new(id: u64, status: JobStatus) -> Self {
        Self {
            id,
            kind: "task_pipeline".to_string(),
            status,
            progress_pct: None,
            current_step: None,
            error_message: None,
            created_at: None,
            finished_at: None,
        }
    }
}
