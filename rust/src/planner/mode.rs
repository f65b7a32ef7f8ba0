//! Planning mode selection.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::graph::StudyGraph;

/// Planning strategy for a study plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    /// Full coverage, chosen when time is abundant.
    #[serde(rename = "Deep Study")]
    DeepStudy,
    /// Selective, high-value-first coverage.
    #[serde(rename = "Cram")]
    Cram,
}

impl std::fmt::Display for StudyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyMode::DeepStudy => write!(f, "Deep Study"),
            StudyMode::Cram => write!(f, "Cram"),
        }
    }
}

/// Total effective cost of every node not yet mastered.
pub fn time_needed(graph: &StudyGraph) -> f64 {
    graph
        .nodes()
        .filter(|n| !n.is_mastered())
        .map(|n| n.effective_cost)
        .sum()
}

/// Deep Study only when the budget covers the remaining work with margin.
pub fn select_mode(graph: &StudyGraph, minutes_available: f64, config: &PlannerConfig) -> StudyMode {
    if minutes_available >= time_needed(graph) * config.deep_study_margin {
        StudyMode::DeepStudy
    } else {
        StudyMode::Cram
    }
}
