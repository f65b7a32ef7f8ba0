//! Cram planning: greedy selection of high-value prerequisite chains under a
//! time budget.
//!
//! Each target node is expanded into a chain of itself plus every non-mastered
//! ancestor. Chains are then taken one at a time by best return on marginal
//! cost (exam value per minute not already committed). A chain whose marginal
//! cost does not fit the remaining budget is dropped for good; there is no
//! backtracking.

use std::cmp::Ordering;

use crate::config::PlannerConfig;
use crate::graph::StudyGraph;
use crate::interner::NodeIx;
use crate::{log_checks, log_decisions};

use super::ordering::topological_order;

/// A target node with the non-mastered ancestors it needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub target: NodeIx,
    /// Exam value of the target, the chain's return.
    pub value: f64,
    /// Non-mastered ancestors followed by the target (when not mastered).
    pub nodes: Vec<NodeIx>,
}

/// A chain accepted by the greedy loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainCommit {
    pub target: NodeIx,
    /// Cost charged against the budget when the chain was taken.
    pub marginal_cost: f64,
}

/// Result of cram planning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CramPlan {
    /// Included nodes in topological order.
    pub order: Vec<NodeIx>,
    /// Chains committed, in selection order.
    pub commits: Vec<ChainCommit>,
    /// Whether any non-mastered node was left out.
    pub has_hidden_content: bool,
}

/// Compare f64 values for sorting, treating NaN as equal.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Pick the nodes worth cramming for.
///
/// Non-mastered nodes at or above the exam-value threshold, plus non-mastered
/// module quizzes. When none qualify, the top fraction of non-mastered nodes by
/// exam value (rounded up), ties kept in input order.
pub fn select_targets(graph: &StudyGraph, config: &PlannerConfig) -> Vec<NodeIx> {
    let open: Vec<NodeIx> = graph
        .indices()
        .filter(|&ix| !graph.node(ix).is_mastered())
        .collect();

    let targets: Vec<NodeIx> = open
        .iter()
        .copied()
        .filter(|&ix| {
            let lesson = &graph.node(ix).lesson;
            lesson.intrinsic_exam_value >= config.high_value_threshold || lesson.is_module_quiz()
        })
        .collect();

    if !targets.is_empty() {
        log_checks!(
            config.verbosity,
            "Cram targets: {} above threshold {}",
            targets.len(),
            config.high_value_threshold
        );
        return targets;
    }

    let take = (open.len() as f64 * config.fallback_target_fraction).ceil() as usize;
    let mut ranked = open;
    // Stable: equal values stay in input order
    ranked.sort_by(|&a, &b| {
        cmp_f64(
            graph.node(b).lesson.intrinsic_exam_value,
            graph.node(a).lesson.intrinsic_exam_value,
        )
    });
    ranked.truncate(take);

    log_checks!(
        config.verbosity,
        "Cram targets: none above threshold, falling back to top {}",
        ranked.len()
    );
    ranked
}

/// Expand a target into its chain, or `None` when nothing in it is left to study.
///
/// Ancestors are collected once each, which also bounds the walk on cyclic input.
pub fn build_chain(graph: &StudyGraph, target: NodeIx) -> Option<Chain> {
    let mut visited = vec![false; graph.len()];
    let mut ancestors: Vec<NodeIx> = Vec::new();
    let mut stack = vec![target];

    while let Some(ix) = stack.pop() {
        for &parent in &graph.node(ix).parents {
            if !visited[parent as usize] {
                visited[parent as usize] = true;
                ancestors.push(parent);
                stack.push(parent);
            }
        }
    }

    let mut nodes: Vec<NodeIx> = ancestors
        .into_iter()
        .filter(|&ix| !graph.node(ix).is_mastered())
        .collect();
    if !graph.node(target).is_mastered() && !nodes.contains(&target) {
        nodes.push(target);
    }

    if nodes.is_empty() {
        return None;
    }

    Some(Chain {
        target,
        value: graph.node(target).lesson.intrinsic_exam_value,
        nodes,
    })
}

/// Effective cost of the chain's nodes not already selected.
pub fn marginal_cost(graph: &StudyGraph, chain: &Chain, selected: &[bool]) -> f64 {
    chain
        .nodes
        .iter()
        .filter(|&&ix| !selected[ix as usize])
        .map(|&ix| graph.node(ix).effective_cost)
        .sum()
}

/// Exam value per marginal minute; a free chain ranks above everything.
pub fn roi(value: f64, marginal_cost: f64) -> f64 {
    if marginal_cost == 0.0 {
        f64::INFINITY
    } else {
        value / marginal_cost
    }
}

/// Plan a cram session within `minutes_available`.
///
/// The included set is every committed chain node, every mastered node and
/// every module quiz, returned in topological order.
pub fn plan_cram(graph: &StudyGraph, minutes_available: f64, config: &PlannerConfig) -> CramPlan {
    let verbosity = config.verbosity;

    let mut chains: Vec<Chain> = select_targets(graph, config)
        .into_iter()
        .filter_map(|target| build_chain(graph, target))
        .collect();

    let mut selected = vec![false; graph.len()];
    let mut remaining = minutes_available;
    let mut commits: Vec<ChainCommit> = Vec::new();

    while remaining > 0.0 && !chains.is_empty() {
        let mut ranked: Vec<(usize, f64, f64)> = chains
            .iter()
            .enumerate()
            .map(|(i, chain)| {
                let cost = marginal_cost(graph, chain, &selected);
                (i, cost, roi(chain.value, cost))
            })
            .collect();
        for &(i, cost, score) in &ranked {
            log_checks!(
                verbosity,
                "  chain {}: marginal={:.1} roi={:.4}",
                graph.node(chains[i].target).lesson.id,
                cost,
                score
            );
        }
        // Stable: equal ROI keeps target order
        ranked.sort_by(|a, b| cmp_f64(b.2, a.2));

        let (best, cost, _) = ranked[0];
        let chain = chains.remove(best);
        let target_id = &graph.node(chain.target).lesson.id;

        if cost <= remaining {
            for &ix in &chain.nodes {
                selected[ix as usize] = true;
            }
            remaining -= cost;
            log_decisions!(
                verbosity,
                "Committed chain {} ({} nodes, {:.1} min), {:.1} min left",
                target_id,
                chain.nodes.len(),
                cost,
                remaining
            );
            commits.push(ChainCommit {
                target: chain.target,
                marginal_cost: cost,
            });
        } else {
            log_decisions!(
                verbosity,
                "Skipped chain {}: needs {:.1} min, {:.1} left",
                target_id,
                cost,
                remaining
            );
        }
    }

    let include: Vec<bool> = graph
        .indices()
        .map(|ix| {
            let node = graph.node(ix);
            selected[ix as usize] || node.is_mastered() || node.lesson.is_module_quiz()
        })
        .collect();

    let open_total = graph.nodes().filter(|n| !n.is_mastered()).count();
    let open_included = graph
        .indices()
        .filter(|&ix| include[ix as usize] && !graph.node(ix).is_mastered())
        .count();

    CramPlan {
        order: topological_order(graph, Some(&include), verbosity),
        commits,
        has_hidden_content: open_included < open_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DependencyEdge, LessonNode, MasteryStatus, UserNodeState};

    fn make_graph(
        nodes: &[(&str, f64, f64)],
        edges: &[(&str, &str)],
        states: &[UserNodeState],
    ) -> StudyGraph {
        let nodes: Vec<LessonNode> = nodes
            .iter()
            .map(|(id, minutes, value)| {
                LessonNode::new(*id, *id, "m")
                    .with_minutes(*minutes)
                    .with_exam_value(*value)
            })
            .collect();
        let edges: Vec<DependencyEdge> = edges
            .iter()
            .map(|(p, c)| DependencyEdge::new(*p, *c))
            .collect();
        let config = PlannerConfig::default();
        let mut graph = StudyGraph::build(&nodes, &edges, &config);
        graph.hydrate(states, &config);
        graph
    }

    fn ids(graph: &StudyGraph, order: &[NodeIx]) -> Vec<String> {
        order
            .iter()
            .map(|&ix| graph.node(ix).lesson.id.clone())
            .collect()
    }

    fn fully_familiar(ids: &[&str]) -> Vec<UserNodeState> {
        ids.iter()
            .map(|id| UserNodeState::new(*id, MasteryStatus::Pending, 0.0))
            .collect()
    }

    #[test]
    fn test_targets_above_threshold() {
        let graph = make_graph(
            &[("a", 30.0, 2.0), ("b", 30.0, 7.0), ("c", 30.0, 9.0)],
            &[],
            &[UserNodeState::new("c", MasteryStatus::Mastered, 1.0)],
        );
        let targets = select_targets(&graph, &PlannerConfig::default());
        assert_eq!(ids(&graph, &targets), vec!["b"]);
    }

    #[test]
    fn test_module_quiz_is_target() {
        let nodes = vec![
            LessonNode::new("a", "Intro", "m").with_exam_value(1.0),
            LessonNode::new("q", "Module Quiz", "m").with_exam_value(1.0),
        ];
        let config = PlannerConfig::default();
        let graph = StudyGraph::build(&nodes, &[], &config);
        assert_eq!(ids(&graph, &select_targets(&graph, &config)), vec!["q"]);
    }

    #[test]
    fn test_fallback_top_fraction() {
        // A -> B -> {C, D}, nothing above threshold: ceil(4 * 0.2) = 1 target
        let graph = make_graph(
            &[("a", 30.0, 5.0), ("b", 30.0, 5.0), ("c", 30.0, 5.0), ("d", 30.0, 5.0)],
            &[("a", "b"), ("b", "c"), ("b", "d")],
            &[],
        );
        let targets = select_targets(&graph, &PlannerConfig::default());
        // Ties keep input order
        assert_eq!(ids(&graph, &targets), vec!["a"]);
    }

    #[test]
    fn test_fallback_ranks_by_value() {
        let graph = make_graph(
            &[
                ("a", 30.0, 1.0),
                ("b", 30.0, 4.0),
                ("c", 30.0, 3.0),
                ("d", 30.0, 6.0),
                ("e", 30.0, 2.0),
                ("f", 30.0, 5.0),
            ],
            &[],
            &[],
        );
        // ceil(6 * 0.2) = 2
        let targets = select_targets(&graph, &PlannerConfig::default());
        assert_eq!(ids(&graph, &targets), vec!["d", "f"]);
    }

    #[test]
    fn test_chain_excludes_mastered_ancestors() {
        let graph = make_graph(
            &[("a", 30.0, 0.0), ("b", 30.0, 0.0), ("c", 30.0, 9.0)],
            &[("a", "b"), ("b", "c")],
            &[UserNodeState::new("a", MasteryStatus::Mastered, 1.0)],
        );
        let chain = build_chain(&graph, 2).unwrap();
        let mut nodes = ids(&graph, &chain.nodes);
        nodes.sort();
        assert_eq!(nodes, vec!["b", "c"]);
        assert_eq!(chain.value, 9.0);
    }

    #[test]
    fn test_chain_discarded_when_fully_mastered() {
        let graph = make_graph(
            &[("a", 30.0, 0.0), ("b", 30.0, 9.0)],
            &[("a", "b")],
            &[
                UserNodeState::new("a", MasteryStatus::Mastered, 1.0),
                UserNodeState::new("b", MasteryStatus::Mastered, 1.0),
            ],
        );
        assert_eq!(build_chain(&graph, 1), None);
    }

    #[test]
    fn test_chain_on_cycle_contains_target_once() {
        let graph = make_graph(
            &[("a", 30.0, 0.0), ("b", 30.0, 9.0)],
            &[("a", "b"), ("b", "a")],
            &[],
        );
        let chain = build_chain(&graph, 1).unwrap();
        assert_eq!(chain.nodes.len(), 2);
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi(8.0, 4.0), 2.0);
        assert!(roi(8.0, 0.0).is_infinite());
        assert!(roi(0.0, 0.0).is_infinite());
    }

    #[test]
    fn test_shared_ancestors_cost_once() {
        // base -> x, base -> y; both targets share base
        let graph = make_graph(
            &[("base", 40.0, 0.0), ("x", 10.0, 9.0), ("y", 10.0, 8.0)],
            &[("base", "x"), ("base", "y")],
            &[],
        );
        let config = PlannerConfig::default();
        // Effective costs: base 36, x 9, y 9. x chain = 45, then y costs 9.
        let plan = plan_cram(&graph, 55.0, &config);

        assert_eq!(plan.commits.len(), 2);
        assert!((plan.commits[0].marginal_cost - 45.0).abs() < 1e-9);
        assert!((plan.commits[1].marginal_cost - 9.0).abs() < 1e-9);
        assert_eq!(ids(&graph, &plan.order), vec!["base", "x", "y"]);
        assert!(!plan.has_hidden_content);
    }

    #[test]
    fn test_best_roi_first_and_no_backtracking() {
        // big: value 9 for 100 min (roi 0.09); small: value 8 for 10 min (roi 0.8)
        let graph = make_graph(
            &[("big", 100.0, 9.0), ("small", 10.0, 8.0), ("mid", 60.0, 7.0)],
            &[],
            &fully_familiar(&["big", "small", "mid"]),
        );
        let plan = plan_cram(&graph, 65.0, &PlannerConfig::default());

        // small (0.8) then mid (0.117) doesn't fit 55 -> skipped, big skipped too
        let committed: Vec<&str> = plan
            .commits
            .iter()
            .map(|c| graph.node(c.target).lesson.id.as_str())
            .collect();
        assert_eq!(committed, vec!["small"]);
        assert_eq!(ids(&graph, &plan.order), vec!["small"]);
        assert!(plan.has_hidden_content);
    }

    #[test]
    fn test_skipped_chain_is_not_reconsidered() {
        // roi: a 0.5, b 0.3; after "a" is committed "b" no longer fits
        let graph = make_graph(
            &[("a", 20.0, 10.0), ("b", 30.0, 9.0), ("c", 5.0, 1.0)],
            &[],
            &fully_familiar(&["a", "b", "c"]),
        );
        let plan = plan_cram(&graph, 40.0, &PlannerConfig::default());
        let committed: Vec<&str> = plan
            .commits
            .iter()
            .map(|c| graph.node(c.target).lesson.id.as_str())
            .collect();
        assert_eq!(committed, vec!["a"]);
    }

    #[test]
    fn test_budget_respected() {
        let graph = make_graph(
            &[
                ("a", 25.0, 9.0),
                ("b", 35.0, 8.0),
                ("c", 15.0, 7.0),
                ("d", 45.0, 10.0),
                ("e", 20.0, 7.5),
            ],
            &[("a", "b"), ("c", "d")],
            &[],
        );
        let budget = 70.0;
        let plan = plan_cram(&graph, budget, &PlannerConfig::default());
        let spent: f64 = plan.commits.iter().map(|c| c.marginal_cost).sum();
        assert!(spent <= budget);
        assert!(!plan.commits.is_empty());
    }

    #[test]
    fn test_zero_budget_keeps_only_mastered_and_quizzes() {
        // No budget: only mastered nodes and module quizzes survive
        let nodes = vec![
            LessonNode::new("a", "A", "m").with_exam_value(9.0),
            LessonNode::new("b", "B", "m").with_exam_value(9.0),
            LessonNode::new("quiz", "Module Quiz", "m"),
        ];
        let edges = vec![DependencyEdge::new("a", "b")];
        let config = PlannerConfig::default();
        let mut graph = StudyGraph::build(&nodes, &edges, &config);
        graph.hydrate(&[UserNodeState::new("a", MasteryStatus::Mastered, 1.0)], &config);

        let plan = plan_cram(&graph, 0.0, &config);
        assert!(plan.commits.is_empty());
        assert_eq!(ids(&graph, &plan.order), vec!["a", "quiz"]);
        assert!(plan.has_hidden_content);
    }

    #[test]
    fn test_ancestor_chain_ordering() {
        // Fallback target "d" (value 6) pulls in its ancestors a and b
        let graph = make_graph(
            &[("a", 30.0, 5.0), ("b", 30.0, 5.0), ("c", 30.0, 5.0), ("d", 30.0, 6.0)],
            &[("a", "b"), ("b", "c"), ("b", "d")],
            &[],
        );
        let plan = plan_cram(&graph, 100.0, &PlannerConfig::default());
        assert_eq!(ids(&graph, &plan.order), vec!["a", "b", "d"]);
        assert!(plan.has_hidden_content);
    }
}
