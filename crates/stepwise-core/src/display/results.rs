//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Plan, PlanId};

/// Wrapper type for displaying a freshly built plan.
///
/// ```rust
/// use stepwise_core::{display::CreateResult, models::{Plan, Step}};
///
/// let plan = Plan::new("Write release notes", vec![Step::new("draft", "Draft", &[])]);
/// let output = CreateResult::new(plan.clone()).to_string();
/// assert!(output.starts_with(&format!("Created plan with ID: {}", plan.id)));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult {
    pub id: PlanId,
}

impl DeleteResult {
    pub fn new(id: PlanId) -> Self {
        Self { id }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted plan with ID: {}", self.id)
    }
}
