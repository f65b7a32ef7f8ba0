//! Adaptive study-plan scheduler.
//!
//! Given a course's prerequisite graph of lessons, a student's progress on
//! each lesson and a time budget, builds an ordered, time-boxed study plan.
//! Plenty of time yields a full topological Deep Study plan; a tight budget
//! yields a Cram plan that greedily keeps the prerequisite chains with the best
//! exam value per minute. Practice-exam checkpoints are spliced in at the
//! structural midpoint and at the end.

pub mod config;
pub mod graph;
pub mod interner;
pub mod logging;
pub mod models;
pub mod planner;
pub mod source;

pub use config::PlannerConfig;
pub use graph::{GraphNode, StudyGraph};
pub use models::{DependencyEdge, LessonKind, LessonNode, MasteryStatus, NodeType, UserNodeState};
pub use planner::{PlanError, PlanModule, PlanStats, StudyMode, StudyPlan, StudyPlanner};
pub use source::{MemorySource, PlanDataSource, SourceError, StudyPlanService};

#[cfg(feature = "python")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("Invalid {}: {}", what, e)))
}

/// Build a study plan and return it as a JSON string.
///
/// # Arguments
/// * `nodes_json` - JSON array of lesson nodes
/// * `edges_json` - JSON array of `{parent_id, child_id}` edges
/// * `user_state_json` - JSON array of per-node student state
/// * `time_budget_minutes` - Positive time budget
/// * `config` - Planner configuration (defaults when omitted)
///
/// # Raises
/// * ValueError on malformed input or a non-positive time budget
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (nodes_json, edges_json, user_state_json, time_budget_minutes, config=None))]
fn generate_study_plan(
    nodes_json: &str,
    edges_json: &str,
    user_state_json: &str,
    time_budget_minutes: f64,
    config: Option<PlannerConfig>,
) -> PyResult<String> {
    let nodes: Vec<LessonNode> = parse_json("nodes", nodes_json)?;
    let edges: Vec<DependencyEdge> = parse_json("edges", edges_json)?;
    let user_state: Vec<UserNodeState> = parse_json("user state", user_state_json)?;

    let planner = StudyPlanner::new(config.unwrap_or_default());
    let plan = planner
        .plan(&nodes, &edges, &user_state, time_budget_minutes)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    plan.to_json()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// The lesson_scheduler Python module.
#[cfg(feature = "python")]
#[pymodule]
fn lesson_scheduler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PlannerConfig>()?;
    m.add_function(wrap_pyfunction!(generate_study_plan, m)?)?;
    Ok(())
}
