//! Structural validation of a step graph.
//!
//! Checks run in a fixed order (unique IDs, then dependency existence, then
//! acyclicity) and the first failure wins, so the reported error is
//! deterministic for a given step list.

use std::collections::{HashMap, HashSet};

use crate::{
    error::{PlannerError, Result},
    models::Step,
};

/// Validates that `steps` form a well-formed dependency DAG.
///
/// # Errors
///
/// - [`PlannerError::DuplicateStep`] if two steps share an ID
/// - [`PlannerError::DanglingDependency`] if a dependency names no step
/// - [`PlannerError::CyclicDependency`] if a step transitively depends on
///   itself
pub fn validate_steps(steps: &[Step]) -> Result<()> {
    let mut ids = HashSet::with_capacity(steps.len());
    for step in steps {
        if !ids.insert(step.id.as_str()) {
            return Err(PlannerError::DuplicateStep {
                step_id: step.id.clone(),
            });
        }
    }

    for step in steps {
        if let Some(dependency) = step
            .dependencies
            .iter()
            .find(|dep| !ids.contains(dep.as_str()))
        {
            return Err(PlannerError::DanglingDependency {
                step_id: step.id.clone(),
                dependency: dependency.clone(),
            });
        }
    }

    match find_cycle(steps) {
        Some(cycle) => Err(PlannerError::CyclicDependency { cycle }),
        None => Ok(()),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Returns the first cycle found, as an ID path that starts and ends with the
/// same step. Unknown dependency IDs are ignored here.
pub fn find_cycle(steps: &[Step]) -> Option<Vec<String>> {
    let graph: HashMap<&str, &Step> = steps.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(steps.len());
    let mut path: Vec<&str> = Vec::new();

    for step in steps {
        if !marks.contains_key(step.id.as_str()) {
            if let Some(cycle) = visit(step.id.as_str(), &graph, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, &'a Step>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    marks.insert(node, Mark::Visiting);
    path.push(node);

    if let Some(step) = graph.get(node) {
        for dep in &step.dependencies {
            let dep = dep.as_str();
            match marks.get(dep) {
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|id| *id == dep).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|id| (*id).to_string()).collect();
                    cycle.push(dep.to_string());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    if graph.contains_key(dep) {
                        if let Some(cycle) = visit(dep, graph, marks, path) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }
    }

    path.pop();
    marks.insert(node, Mark::Done);
    None
}
