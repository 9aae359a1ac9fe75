//! Data models for plans and steps.
//!
//! A [`Plan`] is a task decomposed into [`Step`]s whose `dependencies` form a
//! directed acyclic graph. Display implementations for these models live in
//! [`crate::display::models`] so the data structures stay free of
//! presentation logic.
//!
//! # Examples
//!
//! ```rust
//! use stepwise_core::models::{Plan, Step, StepStatus};
//!
//! let plan = Plan::new(
//!     "Deploy new version of service",
//!     vec![
//!         Step::new("build", "Build the release artifact", &[]),
//!         Step::new("deploy", "Roll out the artifact", &["build"]),
//!     ],
//! );
//!
//! assert_eq!(plan.progress(), (0, 2));
//! assert_eq!(plan.step("deploy").map(|s| s.status), Some(StepStatus::Pending));
//! println!("{}", plan); // Markdown with a section per step
//! ```

pub mod plan;
pub mod status;
pub mod step;
pub mod summary;

#[cfg(test)]
mod tests;

pub use plan::{Plan, PlanId};
pub use status::StepStatus;
pub use step::Step;
pub use summary::PlanSummary;
