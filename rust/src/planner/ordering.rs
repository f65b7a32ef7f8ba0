//! Topological ordering of the lesson graph (parents before children).

use crate::graph::StudyGraph;
use crate::interner::NodeIx;
use crate::log_debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Order nodes so every parent precedes its children.
///
/// Depth-first over parent edges, emitting each node post-order. Roots are
/// taken in input order. When `include` is given, only nodes flagged in it
/// are emitted and only parent edges into the subset are followed.
///
/// A parent still on the traversal stack closes a cycle; that edge is
/// dropped and the walk continues, so cyclic input still yields every node
/// exactly once.
pub fn topological_order(
    graph: &StudyGraph,
    include: Option<&[bool]>,
    verbosity: u8,
) -> Vec<NodeIx> {
    let included = |ix: NodeIx| include.map_or(true, |set| set[ix as usize]);

    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut order: Vec<NodeIx> = Vec::with_capacity(graph.len());
    // (node, index of the next parent to visit)
    let mut stack: Vec<(NodeIx, usize)> = Vec::new();

    for root in graph.indices() {
        if !included(root) || marks[root as usize] != Mark::Unvisited {
            continue;
        }
        marks[root as usize] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (ix, cursor) = *frame;
            let parents = &graph.node(ix).parents;

            if cursor < parents.len() {
                frame.1 += 1;
                let parent = parents[cursor];
                if !included(parent) {
                    continue;
                }
                match marks[parent as usize] {
                    Mark::Unvisited => {
                        marks[parent as usize] = Mark::InProgress;
                        stack.push((parent, 0));
                    }
                    Mark::InProgress => {
                        log_debug!(
                            verbosity,
                            "Cycle: dropping edge {} -> {}",
                            graph.node(parent).lesson.id,
                            graph.node(ix).lesson.id
                        );
                    }
                    Mark::Done => {}
                }
            } else {
                stack.pop();
                marks[ix as usize] = Mark::Done;
                order.push(ix);
            }
        }
    }

    order
}

/// Full-coverage ordering: every node, mastered ones included.
pub fn plan_deep_study(graph: &StudyGraph, verbosity: u8) -> Vec<NodeIx> {
    topological_order(graph, None, verbosity)
}
