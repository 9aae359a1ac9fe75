//! Display implementations for domain models.
//!
//! The Display implementations provide:
//! - Markdown-formatted output for rich terminal display
//! - Consistent formatting with status icons and structured sections

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Plan, PlanSummary, Step, StepStatus};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (completed, total) = self.progress();

        writeln!(f, "# Plan {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- Task: {}", self.task)?;
        writeln!(f, "- Progress: {completed}/{total} completed")?;
        let failed = self.failed_ids();
        if !failed.is_empty() {
            writeln!(f, "- Failed: {}", failed.join(", "))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.id, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;

        if !self.dependencies.is_empty() {
            writeln!(f, "- Depends on: {}", self.dependencies.join(", "))?;
        }
        if self.attempts > 1 {
            writeln!(f, "- Attempts: {}", self.attempts)?;
        }
        if !self.dependencies.is_empty() || self.attempts > 1 {
            writeln!(f)?;
        }

        // Show result only for completed steps
        if self.status == StepStatus::Completed {
            if let Some(result) = &self.result {
                writeln!(f, "#### Result")?;
                writeln!(f)?;
                writeln!(f, "{result}")?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({}/{})",
            self.id, self.completed_steps, self.total_steps
        )?;
        writeln!(f)?;
        writeln!(f, "- **Task**: {}", self.task)?;
        if self.failed_steps > 0 {
            writeln!(f, "- **Failed steps**: {}", self.failed_steps)?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)?;

        Ok(())
    }
}
