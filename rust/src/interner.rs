//! Lesson id interning.
//!
//! Lesson ids are opaque strings from the course store. The graph works on
//! dense `NodeIx` positions so adjacency lists and visit marks are plain
//! vectors indexed in first-seen input order.

use rustc_hash::FxHashMap;

use crate::models::DependencyEdge;

/// Dense position of a lesson in the graph.
pub type NodeIx = u32;

/// Maps lesson ids to positions in the order they are first seen.
#[derive(Debug, Clone, Default)]
pub struct NodeIdInterner {
    positions: FxHashMap<String, NodeIx>,
}

impl NodeIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Position for `id`, and whether this is its first sighting.
    ///
    /// A repeated id gets back the position it was first given.
    pub fn intern(&mut self, id: &str) -> (NodeIx, bool) {
        if let Some(&ix) = self.positions.get(id) {
            return (ix, false);
        }
        let ix = self.positions.len() as NodeIx;
        self.positions.insert(id.to_string(), ix);
        (ix, true)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<NodeIx> {
        self.positions.get(id).copied()
    }

    /// Both endpoints of a prerequisite edge as `(parent, child)`, or `None`
    /// when either lesson is not in the course.
    pub fn edge(&self, edge: &DependencyEdge) -> Option<(NodeIx, NodeIx)> {
        Some((self.get(&edge.parent_id)?, self.get(&edge.child_id)?))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
