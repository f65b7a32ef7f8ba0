//! Study-plan pipeline: graph, costs, mode, ordering, checkpoints, output.

mod cram;
mod exams;
mod format;
mod mode;
mod ordering;

pub use cram::{
    build_chain, marginal_cost, plan_cram, roi, select_targets, Chain, ChainCommit, CramPlan,
};
pub use exams::{
    insert_checkpoints, mid_exam_index, Checkpoint, CheckpointKind, PlanItem, FINAL_EXAM_ID,
    MID_EXAM_ID,
};
pub use format::{
    format_plan, ExamModule, LessonModule, PlanExam, PlanLesson, PlanModule, PlanStats, StudyPlan,
    DEFAULT_MODULE_TITLE,
};
pub use mode::{select_mode, time_needed, StudyMode};
pub use ordering::{plan_deep_study, topological_order};

use thiserror::Error;

use crate::config::PlannerConfig;
use crate::graph::StudyGraph;
use crate::log_decisions;
use crate::models::{DependencyEdge, LessonNode, UserNodeState};
use crate::source::SourceError;

/// Errors that stop a plan from being produced.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Missing course id")]
    MissingCourseId,
    #[error("Missing user id")]
    MissingUserId,
    #[error("Course has no time budget")]
    MissingTimeBudget,
    #[error("Time budget must be a positive number of minutes, got {0}")]
    InvalidTimeBudget(f64),
    #[error("Failed to load plan data: {0}")]
    Source(#[from] SourceError),
}

/// Builds study plans from caller-supplied snapshots.
#[derive(Clone, Debug, Default)]
pub struct StudyPlanner {
    config: PlannerConfig,
}

impl StudyPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Produce an ordered, time-boxed plan for one student.
    ///
    /// # Returns
    /// * `Err(PlanError::InvalidTimeBudget)` if the budget is not a positive finite number
    pub fn plan(
        &self,
        nodes: &[LessonNode],
        edges: &[DependencyEdge],
        user_state: &[UserNodeState],
        time_budget_minutes: f64,
    ) -> Result<StudyPlan, PlanError> {
        if !time_budget_minutes.is_finite() || time_budget_minutes <= 0.0 {
            return Err(PlanError::InvalidTimeBudget(time_budget_minutes));
        }
        let config = &self.config;

        let mut graph = StudyGraph::build(nodes, edges, config);
        graph.hydrate(user_state, config);

        let mode = select_mode(&graph, time_budget_minutes, config);
        log_decisions!(
            config.verbosity,
            "Mode: {} ({:.1} min available, {:.1} min needed)",
            mode,
            time_budget_minutes,
            time_needed(&graph)
        );

        let (order, has_hidden_content) = match mode {
            StudyMode::DeepStudy => (plan_deep_study(&graph, config.verbosity), false),
            StudyMode::Cram => {
                let cram = plan_cram(&graph, time_budget_minutes, config);
                (cram.order, cram.has_hidden_content)
            }
        };

        let items = insert_checkpoints(&graph, &order, config);
        Ok(format_plan(&graph, &items, mode, has_hidden_content, config))
    }
}
