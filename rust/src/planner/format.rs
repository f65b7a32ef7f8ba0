//! Output assembly: modules, lock state, durations and totals.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::graph::StudyGraph;
use crate::interner::NodeIx;
use crate::models::{LessonKind, MasteryStatus, NodeType};

use super::exams::{Checkpoint, PlanItem};
use super::mode::StudyMode;

/// Title used for lessons without a module reference.
pub const DEFAULT_MODULE_TITLE: &str = "General";

/// A lesson as rendered in the plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanLesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    /// Rounded effective minutes; 0 for mastered lessons.
    pub duration: i64,
    pub is_locked: bool,
    pub status: MasteryStatus,
}

/// A run of consecutive lessons sharing a module reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonModule {
    pub title: String,
    pub lessons: Vec<PlanLesson>,
}

/// A checkpoint exam as rendered in the plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanExam {
    pub id: String,
    pub title: String,
    pub duration: i64,
    pub is_locked: bool,
    pub status: MasteryStatus,
    pub preceding_lessons: Vec<String>,
}

/// Standalone pseudo-module wrapping a checkpoint exam.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamModule {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub is_practice_exam_module: bool,
    pub exam: PlanExam,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanModule {
    Exam(ExamModule),
    Lessons(LessonModule),
}

/// The scheduler's output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub mode: StudyMode,
    pub total_minutes: i64,
    pub has_hidden_content: bool,
    pub modules: Vec<PlanModule>,
}

/// Aggregate counts over a formatted plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub lesson_count: usize,
    pub mastered_count: usize,
    pub locked_count: usize,
    pub exam_count: usize,
    pub module_count: usize,
}

impl StudyPlan {
    pub fn stats(&self) -> PlanStats {
        let mut stats = PlanStats {
            module_count: self.modules.len(),
            ..PlanStats::default()
        };
        for module in &self.modules {
            match module {
                PlanModule::Exam(_) => stats.exam_count += 1,
                PlanModule::Lessons(m) => {
                    for lesson in &m.lessons {
                        stats.lesson_count += 1;
                        if lesson.status.is_mastered() {
                            stats.mastered_count += 1;
                        }
                        if lesson.is_locked {
                            stats.locked_count += 1;
                        }
                    }
                }
            }
        }
        stats
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lesson ids in plan order, checkpoints excluded.
    pub fn lesson_ids(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter_map(|m| match m {
                PlanModule::Lessons(m) => Some(m.lessons.iter().map(|l| l.id.as_str())),
                PlanModule::Exam(_) => None,
            })
            .flatten()
            .collect()
    }
}

fn is_locked(graph: &StudyGraph, prerequisites: &[NodeIx]) -> bool {
    prerequisites
        .iter()
        .any(|&ix| graph.node(ix).mastery == MasteryStatus::Pending)
}

fn round_minutes(minutes: f64) -> i64 {
    minutes.round() as i64
}

fn render_lesson(graph: &StudyGraph, ix: NodeIx) -> (PlanLesson, f64) {
    let node = graph.node(ix);
    let kind = match node.lesson.node_type {
        NodeType::PracticeExam => LessonKind::PracticeExam,
        NodeType::Lesson => LessonKind::from_payload(node.lesson.content_payload.as_ref()),
    };
    let minutes = if node.is_mastered() {
        0.0
    } else {
        node.effective_cost
    };

    let lesson = PlanLesson {
        id: node.lesson.id.clone(),
        title: node.lesson.title.clone(),
        kind,
        duration: round_minutes(minutes),
        is_locked: is_locked(graph, &node.parents),
        status: node.mastery,
    };
    (lesson, minutes)
}

fn render_checkpoint(graph: &StudyGraph, checkpoint: &Checkpoint, config: &PlannerConfig) -> ExamModule {
    let kind = checkpoint.kind;
    ExamModule {
        title: kind.title().to_string(),
        kind: LessonKind::PracticeExam,
        is_practice_exam_module: true,
        exam: PlanExam {
            id: kind.id().to_string(),
            title: kind.title().to_string(),
            duration: round_minutes(kind.minutes(config)),
            is_locked: is_locked(graph, &checkpoint.preceding),
            status: MasteryStatus::Pending,
            preceding_lessons: checkpoint
                .preceding
                .iter()
                .map(|&ix| graph.node(ix).lesson.id.clone())
                .collect(),
        },
    }
}

/// Group plan items into modules and total the study minutes.
///
/// Consecutive lessons with the same module reference share a module; a
/// checkpoint ends the current run. Only non-mastered lessons count toward
/// `total_minutes`; checkpoints render their fixed duration but are not counted.
pub fn format_plan(
    graph: &StudyGraph,
    items: &[PlanItem],
    mode: StudyMode,
    has_hidden_content: bool,
    config: &PlannerConfig,
) -> StudyPlan {
    let mut modules: Vec<PlanModule> = Vec::new();
    let mut current_ref: Option<&str> = None;
    let mut total = 0.0;

    for item in items {
        match item {
            PlanItem::Lesson(ix) => {
                let (lesson, minutes) = render_lesson(graph, *ix);
                total += minutes;

                let module_ref = graph.node(*ix).lesson.module_ref.as_str();
                match modules.last_mut() {
                    Some(PlanModule::Lessons(module)) if current_ref == Some(module_ref) => {
                        module.lessons.push(lesson);
                    }
                    _ => {
                        let title = if module_ref.is_empty() {
                            DEFAULT_MODULE_TITLE.to_string()
                        } else {
                            module_ref.to_string()
                        };
                        modules.push(PlanModule::Lessons(LessonModule {
                            title,
                            lessons: vec![lesson],
                        }));
                        current_ref = Some(module_ref);
                    }
                }
            }
            PlanItem::Checkpoint(checkpoint) => {
                modules.push(PlanModule::Exam(render_checkpoint(graph, checkpoint, config)));
                current_ref = None;
            }
        }
    }

    StudyPlan {
        mode,
        total_minutes: round_minutes(total),
        has_hidden_content,
        modules,
    }
}
