//! Lesson graph construction and per-student cost hydration.

use rustc_hash::FxHashMap;
use std::ops::Range;

use crate::config::PlannerConfig;
use crate::interner::{NodeIdInterner, NodeIx};
use crate::log_debug;
use crate::models::{DependencyEdge, LessonNode, MasteryStatus, UserNodeState};

/// A lesson node with its adjacency and per-student derived fields.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub lesson: LessonNode,
    /// Direct prerequisites.
    pub parents: Vec<NodeIx>,
    /// Direct dependents.
    pub children: Vec<NodeIx>,
    /// Static duration with the default applied (minutes).
    pub estimated_minutes: f64,
    pub mastery: MasteryStatus,
    pub familiarity: f64,
    /// `estimated_minutes * (1 - familiarity)`, set by [`StudyGraph::hydrate`].
    pub effective_cost: f64,
}

impl GraphNode {
    pub fn is_mastered(&self) -> bool {
        self.mastery.is_mastered()
    }
}

/// Adjacency-indexed lesson graph. Node indices follow first-seen input order.
#[derive(Clone, Debug, Default)]
pub struct StudyGraph {
    index: NodeIdInterner,
    nodes: Vec<GraphNode>,
}

impl StudyGraph {
    /// Build the graph from flat node and edge lists.
    ///
    /// Edges naming an unknown parent or child are skipped. A repeated node id
    /// keeps its first position and takes the last record's fields.
    pub fn build(nodes: &[LessonNode], edges: &[DependencyEdge], config: &PlannerConfig) -> Self {
        let mut index = NodeIdInterner::with_capacity(nodes.len());
        let mut graph_nodes: Vec<GraphNode> = Vec::with_capacity(nodes.len());

        for lesson in nodes {
            let (ix, first_seen) = index.intern(&lesson.id);
            let estimated_minutes = lesson
                .estimated_minutes
                .unwrap_or(config.default_estimated_minutes);
            let node = GraphNode {
                lesson: lesson.clone(),
                parents: Vec::new(),
                children: Vec::new(),
                estimated_minutes,
                mastery: MasteryStatus::Pending,
                familiarity: config.default_familiarity,
                effective_cost: estimated_minutes * (1.0 - config.default_familiarity),
            };
            if first_seen {
                graph_nodes.push(node);
            } else {
                graph_nodes[ix as usize] = node;
            }
        }

        for edge in edges {
            let Some((parent, child)) = index.edge(edge) else {
                log_debug!(
                    config.verbosity,
                    "Skipping dangling edge {} -> {}",
                    edge.parent_id,
                    edge.child_id
                );
                continue;
            };
            if graph_nodes[child as usize].parents.contains(&parent) {
                continue;
            }
            graph_nodes[parent as usize].children.push(child);
            graph_nodes[child as usize].parents.push(parent);
        }

        log_debug!(
            config.verbosity,
            "Built graph: {} nodes from {} edges",
            graph_nodes.len(),
            edges.len()
        );

        Self {
            index,
            nodes: graph_nodes,
        }
    }

    /// Attach mastery, familiarity and effective cost from the student's state.
    ///
    /// Nodes without a state record keep pending mastery and the default
    /// familiarity. Familiarity is clamped to [0, 1].
    pub fn hydrate(&mut self, user_state: &[UserNodeState], config: &PlannerConfig) {
        let by_node: FxHashMap<&str, &UserNodeState> = user_state
            .iter()
            .map(|s| (s.node_id.as_str(), s))
            .collect();

        for node in &mut self.nodes {
            let state = by_node.get(node.lesson.id.as_str());
            node.mastery = state.map(|s| s.mastery_status).unwrap_or_default();
            node.familiarity = state
                .and_then(|s| s.familiarity_score)
                .unwrap_or(config.default_familiarity)
                .clamp(0.0, 1.0);
            node.effective_cost = node.estimated_minutes * (1.0 - node.familiarity);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node indices in input order.
    pub fn indices(&self) -> Range<NodeIx> {
        0..self.nodes.len() as NodeIx
    }

    #[inline]
    pub fn node(&self, ix: NodeIx) -> &GraphNode {
        &self.nodes[ix as usize]
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|ix| self.node(ix))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph(ids: &[&str], edges: &[(&str, &str)]) -> StudyGraph {
        let nodes: Vec<LessonNode> = ids.iter().map(|id| LessonNode::new(*id, *id, "m")).collect();
        let edges: Vec<DependencyEdge> = edges
            .iter()
            .map(|(p, c)| DependencyEdge::new(*p, *c))
            .collect();
        StudyGraph::build(&nodes, &edges, &PlannerConfig::default())
    }

    #[test]
    fn test_adjacency_from_edges() {
        let graph = make_graph(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("b", "c")]);

        let a = graph.get("a").unwrap();
        assert!(a.parents.is_empty());
        assert_eq!(a.children, vec![1, 2]);

        let c = graph.get("c").unwrap();
        assert_eq!(c.parents, vec![0, 1]);
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_dangling_edges_are_skipped() {
        let graph = make_graph(&["a", "b"], &[("ghost", "a"), ("a", "b"), ("b", "missing")]);

        assert_eq!(graph.get("a").unwrap().parents, Vec::<NodeIx>::new());
        assert_eq!(graph.get("b").unwrap().parents, vec![0]);
        assert!(graph.get("b").unwrap().children.is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = make_graph(&["a", "b"], &[("a", "b"), ("a", "b")]);
        assert_eq!(graph.get("b").unwrap().parents, vec![0]);
        assert_eq!(graph.get("a").unwrap().children, vec![1]);
    }

    #[test]
    fn test_default_estimated_minutes() {
        let nodes = vec![
            LessonNode::new("a", "A", "m"),
            LessonNode::new("b", "B", "m").with_minutes(50.0),
        ];
        let graph = StudyGraph::build(&nodes, &[], &PlannerConfig::default());
        assert_eq!(graph.get("a").unwrap().estimated_minutes, 30.0);
        assert_eq!(graph.get("b").unwrap().estimated_minutes, 50.0);
    }

    #[test]
    fn test_hydrate_effective_cost() {
        let nodes = vec![
            LessonNode::new("a", "A", "m").with_minutes(60.0),
            LessonNode::new("b", "B", "m").with_minutes(60.0),
            LessonNode::new("c", "C", "m").with_minutes(60.0),
        ];
        let config = PlannerConfig::default();
        let mut graph = StudyGraph::build(&nodes, &[], &config);
        graph.hydrate(
            &[
                UserNodeState::new("a", MasteryStatus::Mastered, 1.0),
                UserNodeState::new("b", MasteryStatus::NeedsReview, 0.5),
            ],
            &config,
        );

        let a = graph.get("a").unwrap();
        assert_eq!(a.mastery, MasteryStatus::Mastered);
        assert!(a.effective_cost.abs() < 1e-9);

        let b = graph.get("b").unwrap();
        assert_eq!(b.mastery, MasteryStatus::NeedsReview);
        assert!((b.effective_cost - 30.0).abs() < 1e-9);

        // No state: pending with default familiarity 0.1
        let c = graph.get("c").unwrap();
        assert_eq!(c.mastery, MasteryStatus::Pending);
        assert!((c.effective_cost - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_hydrate_clamps_familiarity() {
        let nodes = vec![LessonNode::new("a", "A", "m").with_minutes(30.0)];
        let config = PlannerConfig::default();
        let mut graph = StudyGraph::build(&nodes, &[], &config);
        graph.hydrate(&[UserNodeState::new("a", MasteryStatus::Pending, 1.7)], &config);
        assert!(graph.get("a").unwrap().effective_cost.abs() < 1e-9);
    }

    #[test]
    fn test_repeated_node_id_keeps_first_position() {
        let nodes = vec![
            LessonNode::new("a", "First", "m"),
            LessonNode::new("b", "B", "m"),
            LessonNode::new("a", "Second", "m"),
        ];
        let graph = StudyGraph::build(&nodes, &[], &PlannerConfig::default());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.node(0).lesson.id, "a");
        assert_eq!(graph.get("a").unwrap().lesson.title, "Second");
    }
}
