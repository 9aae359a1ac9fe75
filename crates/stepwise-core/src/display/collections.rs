//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{PlanSummary, Step};

/// Newtype wrapper for displaying collections of plan summaries.
///
/// # Examples
///
/// ```rust
/// use stepwise_core::{display::PlanSummaries, models::{Plan, PlanSummary, Step}};
///
/// let plan = Plan::new("Ship it", vec![Step::new("a", "Do a", &[])]);
/// let summaries = PlanSummaries(vec![PlanSummary::from(&plan)]);
/// let output = format!("{}", summaries);
/// assert!(output.contains("Ship it"));
/// assert!(output.contains("(0/1)"));
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plan summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the plan summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{plan}")?;
            }
            Ok(())
        }
    }
}

/// Borrowing wrapper for the output of the readiness resolver.
///
/// Lists step IDs with their descriptions, one bullet per step.
pub struct ReadySteps<'a>(pub Vec<&'a Step>);

impl ReadySteps<'_> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ReadySteps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps are ready.");
        }
        writeln!(f, "## Ready steps")?;
        writeln!(f)?;
        for step in &self.0 {
            writeln!(f, "- **{}**: {}", step.id, step.description)?;
        }
        Ok(())
    }
}
