use std::collections::BTreeMap;

use crate::{
    foundation::core::{CanvasId, NodeId},
    foundation::error::{SpindleError, SpindleResult},
    graph::model::Node,
    graph::snapshot::CanvasSnapshot,
};

/// Node persistence collaborator.
///
/// The engine never touches storage directly: it reads full snapshots through
/// [`NodeStore::list`] and commits planned transactions through
/// [`NodeStore::update`]. Implementations own node lifecycle; the engine only
/// ever mutates anchor and attic fields via planned link operations.
pub trait NodeStore {
    /// All nodes of a canvas.
    fn list(&self, canvas: CanvasId) -> SpindleResult<Vec<Node>>;

    /// Persist a new node.
    fn create(&mut self, canvas: CanvasId, node: Node) -> SpindleResult<Node>;

    /// Replace an existing node record.
    fn update(&mut self, canvas: CanvasId, node: Node) -> SpindleResult<Node>;

    /// Remove a node record.
    fn delete(&mut self, canvas: CanvasId, id: NodeId) -> SpindleResult<()>;
}

#[derive(Clone, Debug, Default)]
/// In-memory [`NodeStore`] used by tests and single-process hosts.
pub struct MemoryNodeStore {
    canvases: BTreeMap<CanvasId, BTreeMap<NodeId, Node>>,
}

impl MemoryNodeStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized snapshot of one canvas.
    pub fn snapshot(&self, canvas: CanvasId) -> CanvasSnapshot {
        let nodes = self
            .canvases
            .get(&canvas)
            .map(|m| m.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        CanvasSnapshot::from_nodes(nodes)
    }
}

impl NodeStore for MemoryNodeStore {
    fn list(&self, canvas: CanvasId) -> SpindleResult<Vec<Node>> {
        Ok(self
            .canvases
            .get(&canvas)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    fn create(&mut self, canvas: CanvasId, node: Node) -> SpindleResult<Node> {
        node.validate()?;
        let nodes = self.canvases.entry(canvas).or_default();
        if nodes.contains_key(&node.id) {
            return Err(SpindleError::validation(format!(
                "node {} already exists on this canvas",
                node.id
            )));
        }
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    fn update(&mut self, canvas: CanvasId, node: Node) -> SpindleResult<Node> {
        node.validate()?;
        let nodes = self.canvases.entry(canvas).or_default();
        if !nodes.contains_key(&node.id) {
            return Err(SpindleError::validation(format!(
                "node {} does not exist on this canvas",
                node.id
            )));
        }
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    fn delete(&mut self, canvas: CanvasId, id: NodeId) -> SpindleResult<()> {
        let removed = self
            .canvases
            .get_mut(&canvas)
            .and_then(|nodes| nodes.remove(&id));
        if removed.is_none() {
            return Err(SpindleError::validation(format!(
                "node {id} does not exist on this canvas"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/store.rs"]
mod tests;
