//! Checkpoint exam insertion.
//!
//! Placement uses structural cost (static estimated minutes), so the mid-course
//! exam sits at the content midpoint whatever the student already knows.

use crate::config::PlannerConfig;
use crate::graph::StudyGraph;
use crate::interner::NodeIx;
use crate::log_decisions;

pub const MID_EXAM_ID: &str = "practice-exam-mid";
pub const FINAL_EXAM_ID: &str = "practice-exam-final";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointKind {
    Mid,
    Final,
}

impl CheckpointKind {
    pub fn id(self) -> &'static str {
        match self {
            CheckpointKind::Mid => MID_EXAM_ID,
            CheckpointKind::Final => FINAL_EXAM_ID,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CheckpointKind::Mid => "Mid-Course Practice Exam",
            CheckpointKind::Final => "Final Practice Exam",
        }
    }

    pub fn minutes(self, config: &PlannerConfig) -> f64 {
        match self {
            CheckpointKind::Mid => config.mid_exam_minutes,
            CheckpointKind::Final => config.final_exam_minutes,
        }
    }
}

/// A synthetic practice exam spliced into the plan.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub kind: CheckpointKind,
    /// Lessons before the checkpoint, in plan order.
    pub preceding: Vec<NodeIx>,
}

/// One entry of the ordered plan.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanItem {
    Lesson(NodeIx),
    Checkpoint(Checkpoint),
}

/// Running total of static minutes after each position.
fn cumulative_minutes(graph: &StudyGraph, order: &[NodeIx]) -> Vec<f64> {
    order
        .iter()
        .scan(0.0, |total, &ix| {
            *total += graph.node(ix).estimated_minutes;
            Some(*total)
        })
        .collect()
}

/// Position in `candidates` whose cumulative cost is closest to `target`.
/// Ties go to the earliest position.
fn closest(
    candidates: impl Iterator<Item = usize>,
    cumulative: &[f64],
    target: f64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for i in candidates {
        let distance = (cumulative[i] - target).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best
}

/// Index after which the mid-course exam goes, or `None` for fewer than two lessons.
///
/// Prefers the module boundary closest to the structural midpoint. When no
/// boundary exists or the best one is further than the tolerance (a fraction
/// of the total), any position between two lessons is considered instead.
pub fn mid_exam_index(graph: &StudyGraph, order: &[NodeIx], config: &PlannerConfig) -> Option<usize> {
    let cumulative = cumulative_minutes(graph, order);
    let total = cumulative.last().copied().unwrap_or(0.0);
    let midpoint = total / 2.0;
    let inner = 0..order.len().saturating_sub(1);

    let boundaries = inner.clone().filter(|&i| {
        graph.node(order[i]).lesson.module_ref != graph.node(order[i + 1]).lesson.module_ref
    });

    if let Some((i, distance)) = closest(boundaries, &cumulative, midpoint) {
        if distance <= total * config.boundary_tolerance {
            return Some(i);
        }
    }

    closest(inner, &cumulative, midpoint).map(|(i, _)| i)
}

/// Splice the mid-course exam into the ordered lessons and append the final exam.
pub fn insert_checkpoints(
    graph: &StudyGraph,
    order: &[NodeIx],
    config: &PlannerConfig,
) -> Vec<PlanItem> {
    let mut items: Vec<PlanItem> = Vec::with_capacity(order.len() + 2);
    let mid = mid_exam_index(graph, order, config);

    for (i, &ix) in order.iter().enumerate() {
        items.push(PlanItem::Lesson(ix));
        if mid == Some(i) {
            log_decisions!(
                config.verbosity,
                "Mid-course exam after {} ({} of {} lessons)",
                graph.node(ix).lesson.id,
                i + 1,
                order.len()
            );
            items.push(PlanItem::Checkpoint(Checkpoint {
                kind: CheckpointKind::Mid,
                preceding: order[..=i].to_vec(),
            }));
        }
    }

    items.push(PlanItem::Checkpoint(Checkpoint {
        kind: CheckpointKind::Final,
        preceding: order.to_vec(),
    }));
    items
}
