//! Display implementations for domain models.
//!
//! Enum displays use the wire spelling so messages and logs match what the
//! backend reports. Structured models render as markdown for the terminal
//! and MCP clients.

use std::fmt;

use super::datetime::OptionalDateTime;
use crate::{
    models::{
        ApprovalStatus, Item, ItemType, Job, JobStatus, RecommendationType, StepStatus,
        StepSummary, StepType, StepView,
    },
    selection::{SelectionReport, SelectionStats},
};

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.running {
            "➤ Running"
        } else if self.locked {
            StepStatus::Locked.with_icon()
        } else {
            self.status.with_icon()
        };

        write!(
            f,
            "## {}. {} ({status})",
            self.step_type.position() + 1,
            self.step_type.label()
        )?;
        if let Some(approval) = self.approval_status {
            write!(f, " [{approval}]")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        writeln!(
            f,
            "- Selected: {}/{}",
            self.selection.selected, self.selection.total
        )?;
        if self.locked {
            writeln!(f, "- Locked until the objective step is completed")?;
        }
        if self.approved {
            writeln!(f, "- Approved; items are read-only")?;
        }

        if !self.summary.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.summary)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({})",
            self.step_type.label(),
            self.status.with_icon()
        )?;
        writeln!(f)?;
        if let Some(approval) = self.approval_status {
            writeln!(f, "- Approval: {approval}")?;
        }
        writeln!(f, "- Items: {}", self.item_count)?;
        writeln!(f, "- Last run: {}", OptionalDateTime(self.last_ai_run_at.as_ref()))?;
        writeln!(
            f,
            "- Last approved: {}",
            OptionalDateTime(self.last_approved_at.as_ref())
        )?;
        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_selected { "[x]" } else { "[ ]" };
        write!(f, "- {mark} **{}** (ID: {})", self.label(), self.id)?;
        if let Some(kind) = self.recommendation_type {
            write!(f, " {}", kind.with_icon())?;
        }
        if let Some(score) = self.priority_score {
            write!(f, " P{score}")?;
        }
        writeln!(f)?;

        if let Some(body) = self.body() {
            writeln!(f, "  {body}")?;
        }
        if let Some(category) = &self.category {
            let exclusive = if self.category_exclusive {
                " (exclusive)"
            } else {
                ""
            };
            writeln!(f, "  Category: {category}{exclusive}")?;
        }
        if !self.advantages.is_empty() {
            writeln!(f, "  + {}", self.advantages.join("; "))?;
        }
        if !self.disadvantages.is_empty() {
            writeln!(f, "  - {}", self.disadvantages.join("; "))?;
        }
        if !self.requires.is_empty() {
            writeln!(f, "  Requires: {}", join_ids(&self.requires))?;
        }
        if !self.conflicts_with.is_empty() {
            writeln!(f, "  Conflicts with: {}", join_ids(&self.conflicts_with))?;
        }
        Ok(())
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- Job {} `{}`: {}", self.id, self.kind, self.status)?;
        if let Some(progress) = self.progress_pct {
            write!(f, " {progress:.0}%")?;
        }
        if let Some(step) = &self.current_step {
            write!(f, " ({step})")?;
        }
        writeln!(f)?;
        if let Some(error) = &self.error_message {
            writeln!(f, "  Error: {error}")?;
        }
        if self.status.is_terminal() {
            writeln!(f, "  Finished: {}", OptionalDateTime(self.finished_at.as_ref()))?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "✓ Selection is consistent");
        }
        if !self.conflicts.is_empty() {
            writeln!(
                f,
                "⚠ Conflicts: selected items conflict with {}",
                join_ids(&self.conflicts)
            )?;
        }
        if !self.missing_dependencies.is_empty() {
            writeln!(
                f,
                "⚠ Missing dependencies: {} required but not selected",
                join_ids(&self.missing_dependencies)
            )?;
        }
        for violation in &self.category_violations {
            writeln!(
                f,
                "⚠ Several options selected for '{}': {} and {}",
                violation.category,
                violation.item_id,
                join_ids(&violation.conflicting_ids)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Selected: {}", self.selected)?;
        writeln!(f, "- Critical: {}", self.critical)?;
        writeln!(f, "- Recommended: {}", self.recommended)?;
        writeln!(f, "- Optional: {}", self.optional)?;
        writeln!(f, "- Categories: {}", self.categories)?;
        if !self.missing_critical.is_empty() {
            writeln!(
                f,
                "- Unselected critical items: {}",
                join_ids(&self.missing_critical)
            )?;
        }
        Ok(())
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
