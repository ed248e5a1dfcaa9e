use crate::{
    foundation::core::{ConnectionMode, NodeId, Point},
    graph::model::{Anchor, Node},
    graph::snapshot::CanvasSnapshot,
};

/// Programmatic snapshot construction for tests and hosts.
///
/// Ids are handed out in creation order, so the first spine added to an
/// otherwise free canvas becomes the root.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    next_id: u64,
    nodes: Vec<Node>,
}

impl SnapshotBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free spine with the given trim duration.
    pub fn spine(&mut self, duration_sec: f64) -> NodeId {
        self.push(|id| Node::spine(id, duration_sec))
    }

    /// Add a free satellite with the given trim duration.
    pub fn satellite(&mut self, duration_sec: f64) -> NodeId {
        self.push(|id| Node::satellite(id, duration_sec))
    }

    /// Add a node built by the caller from the allotted id.
    pub fn push(&mut self, make: impl FnOnce(NodeId) -> Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(make(id));
        id
    }

    /// Anchor `child` onto `parent` with zero drift.
    pub fn link(&mut self, child: NodeId, parent: NodeId, mode: ConnectionMode) -> &mut Self {
        self.link_with_drift(child, parent, mode, 0.0, 0)
    }

    /// Anchor `child` onto `parent` with explicit drift.
    pub fn link_with_drift(
        &mut self,
        child: NodeId,
        parent: NodeId,
        mode: ConnectionMode,
        drift_x: f64,
        drift_y: i32,
    ) -> &mut Self {
        if let Some(node) = self.node_mut(child) {
            node.anchor = Some(Anchor {
                parent,
                mode,
                drift_x,
                drift_y,
            });
            node.attic_parent = None;
        }
        self
    }

    /// Park `node` in the attic of `attic_parent`.
    pub fn park(&mut self, node: NodeId, attic_parent: NodeId) -> &mut Self {
        if let Some(node) = self.node_mut(node) {
            node.anchor = None;
            node.attic_parent = Some(attic_parent);
        }
        self
    }

    /// Set a node's raw canvas position.
    pub fn home(&mut self, node: NodeId, home: Point) -> &mut Self {
        if let Some(node) = self.node_mut(node) {
            node.home = home;
        }
        self
    }

    /// Build the normalized snapshot.
    pub fn build(self) -> CanvasSnapshot {
        CanvasSnapshot::from_nodes(self.nodes)
    }

    /// The raw records accumulated so far.
    pub fn records(&self) -> &[Node] {
        &self.nodes
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/dsl.rs"]
mod tests;
