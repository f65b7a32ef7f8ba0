//! Data-access seam for the planner.
//!
//! The planner itself is a pure function of its inputs. [`StudyPlanService`]
//! owns a [`PlanDataSource`] injected at construction, loads the four inputs
//! for a course and student in parallel, and runs the planner once all of
//! them have loaded. Any failed fetch aborts the whole request.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::models::{DependencyEdge, LessonNode, UserNodeState};
use crate::planner::{PlanError, StudyPlan, StudyPlanner};

/// Errors raised by a data source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("course not found: {0}")]
    CourseNotFound(String),
    #[error("query failed: {0}")]
    Query(String),
}

/// Read-only access to course structure and student progress.
pub trait PlanDataSource: Sync {
    fn fetch_nodes(&self, course_id: &str) -> Result<Vec<LessonNode>, SourceError>;

    fn fetch_edges(&self, course_id: &str) -> Result<Vec<DependencyEdge>, SourceError>;

    fn fetch_user_state(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<UserNodeState>, SourceError>;

    /// Course-level time budget in minutes, if one is set.
    fn fetch_time_budget(&self, course_id: &str) -> Result<Option<f64>, SourceError>;
}

/// Loads plan inputs from a data source and runs the planner.
pub struct StudyPlanService<S> {
    source: S,
    planner: StudyPlanner,
}

impl<S: PlanDataSource> StudyPlanService<S> {
    pub fn new(source: S, planner: StudyPlanner) -> Self {
        Self { source, planner }
    }

    /// Build the study plan for `user_id` in `course_id`.
    ///
    /// Ids are checked before anything is fetched.
    pub fn generate(&self, course_id: &str, user_id: &str) -> Result<StudyPlan, PlanError> {
        if course_id.trim().is_empty() {
            return Err(PlanError::MissingCourseId);
        }
        if user_id.trim().is_empty() {
            return Err(PlanError::MissingUserId);
        }

        let source = &self.source;
        let ((nodes, edges), (user_state, budget)) = rayon::join(
            || {
                rayon::join(
                    || source.fetch_nodes(course_id),
                    || source.fetch_edges(course_id),
                )
            },
            || {
                rayon::join(
                    || source.fetch_user_state(user_id, course_id),
                    || source.fetch_time_budget(course_id),
                )
            },
        );

        let nodes = nodes?;
        let edges = edges?;
        let user_state = user_state?;
        let budget = budget?.ok_or(PlanError::MissingTimeBudget)?;

        self.planner.plan(&nodes, &edges, &user_state, budget)
    }
}

#[derive(Clone, Debug, Default)]
struct CourseRecord {
    nodes: Vec<LessonNode>,
    edges: Vec<DependencyEdge>,
    time_budget_minutes: Option<f64>,
}

/// In-memory data source keyed by course and student.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    courses: FxHashMap<String, CourseRecord>,
    user_states: FxHashMap<(String, String), Vec<UserNodeState>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(
        mut self,
        course_id: impl Into<String>,
        nodes: Vec<LessonNode>,
        edges: Vec<DependencyEdge>,
        time_budget_minutes: Option<f64>,
    ) -> Self {
        self.courses.insert(
            course_id.into(),
            CourseRecord {
                nodes,
                edges,
                time_budget_minutes,
            },
        );
        self
    }

    pub fn with_user_state(
        mut self,
        user_id: impl Into<String>,
        course_id: impl Into<String>,
        states: Vec<UserNodeState>,
    ) -> Self {
        self.user_states
            .insert((user_id.into(), course_id.into()), states);
        self
    }

    fn course(&self, course_id: &str) -> Result<&CourseRecord, SourceError> {
        self.courses
            .get(course_id)
            .ok_or_else(|| SourceError::CourseNotFound(course_id.to_string()))
    }
}

impl PlanDataSource for MemorySource {
    fn fetch_nodes(&self, course_id: &str) -> Result<Vec<LessonNode>, SourceError> {
        Ok(self.course(course_id)?.nodes.clone())
    }

    fn fetch_edges(&self, course_id: &str) -> Result<Vec<DependencyEdge>, SourceError> {
        Ok(self.course(course_id)?.edges.clone())
    }

    fn fetch_user_state(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<UserNodeState>, SourceError> {
        Ok(self
            .user_states
            .get(&(user_id.to_string(), course_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_time_budget(&self, course_id: &str) -> Result<Option<f64>, SourceError> {
        Ok(self.course(course_id)?.time_budget_minutes)
    }
}
