use std::collections::BTreeMap;

use crate::{
    foundation::core::{ConnectionMode, NodeId, NodeKind},
    graph::model::Node,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Structural corruption found while normalizing or resolving a snapshot.
///
/// Faults are always surfaced to the caller; the engine may fall back to a
/// node's stored coordinates but never repairs the underlying records.
pub enum StructuralFault {
    /// A node's anchor chain re-enters itself.
    CycleDetected {
        /// Node at which the cycle was entered.
        node: NodeId,
    },
    /// A node anchors to an id missing from the snapshot.
    OrphanedAnchor {
        /// Degraded node.
        node: NodeId,
        /// Missing parent id.
        missing: NodeId,
    },
    /// A node parks in an attic whose parent id is missing.
    OrphanedAttic {
        /// Degraded node.
        node: NodeId,
        /// Missing attic parent id.
        missing: NodeId,
    },
    /// Two children occupy the same single-occupancy sequence slot.
    SlotConflict {
        /// Parent owning the slot.
        parent: NodeId,
        /// Conflicting direction.
        mode: ConnectionMode,
        /// Occupant kept in the child index.
        kept: NodeId,
        /// Extra occupant left anchored but outside the index.
        extra: NodeId,
    },
    /// A node was both anchored and parked; degraded to free.
    AnchoredAndParked {
        /// Degraded node.
        node: NodeId,
    },
    /// A trim window with `clip_out < clip_in` or non-finite bounds.
    InvalidTrim {
        /// Degraded node.
        node: NodeId,
    },
}

impl std::fmt::Display for StructuralFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralFault::CycleDetected { node } => {
                write!(f, "anchor chain of node {node} loops back on itself")
            }
            StructuralFault::OrphanedAnchor { node, missing } => {
                write!(f, "node {node} anchors to missing node {missing}")
            }
            StructuralFault::OrphanedAttic { node, missing } => {
                write!(f, "node {node} parks under missing attic parent {missing}")
            }
            StructuralFault::SlotConflict {
                parent,
                mode,
                kept,
                extra,
            } => write!(
                f,
                "nodes {kept} and {extra} both occupy the {mode} slot of node {parent}"
            ),
            StructuralFault::AnchoredAndParked { node } => {
                write!(f, "node {node} was both anchored and parked; treated as free")
            }
            StructuralFault::InvalidTrim { node } => {
                write!(f, "node {node} has a malformed trim window")
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Per-node child index, built once per snapshot.
pub struct ChildSet {
    /// Children stacked on this node, in id order.
    pub stack: Vec<NodeId>,
    /// Single occupant of the prepend sequence slot.
    pub prepend: Option<NodeId>,
    /// Single occupant of the append sequence slot.
    pub append: Option<NodeId>,
}

impl ChildSet {
    /// Occupant of the given slot; stack children are not slotted.
    pub fn slot(&self, mode: ConnectionMode) -> Option<NodeId> {
        match mode {
            ConnectionMode::Stack => None,
            ConnectionMode::Prepend => self.prepend,
            ConnectionMode::Append => self.append,
        }
    }
}

static EMPTY_CHILDREN: ChildSet = ChildSet {
    stack: Vec::new(),
    prepend: None,
    append: None,
};

#[derive(Clone, Debug, Default)]
/// Immutable, id-indexed view of one canvas, fetched before each computation.
///
/// Construction normalizes malformed records (§ error design): impossible
/// field combinations degrade to free nodes with a recorded
/// [`StructuralFault`] rather than failing the whole canvas. Anchor cycles
/// are left in place here and detected during resolution.
pub struct CanvasSnapshot {
    nodes: BTreeMap<NodeId, Node>,
    children: BTreeMap<NodeId, ChildSet>,
    root: Option<NodeId>,
    faults: Vec<StructuralFault>,
}

impl CanvasSnapshot {
    /// Build a normalized snapshot from raw store records.
    pub fn from_nodes(records: impl IntoIterator<Item = Node>) -> Self {
        let mut faults = Vec::new();
        let mut nodes: BTreeMap<NodeId, Node> = BTreeMap::new();
        for node in records {
            nodes.insert(node.id, node);
        }

        // Degrade malformed records in id order so diagnostics are stable.
        let ids: Vec<NodeId> = nodes.keys().copied().collect();
        for id in &ids {
            let mut anchor_is_self = false;
            let mut anchor_parent_missing = None;
            let mut attic_parent_missing = None;
            {
                let node = &nodes[id];
                if let Some(anchor) = &node.anchor {
                    if anchor.parent == node.id {
                        anchor_is_self = true;
                    } else if !nodes.contains_key(&anchor.parent) {
                        anchor_parent_missing = Some(anchor.parent);
                    }
                }
                if let Some(attic) = node.attic_parent {
                    if attic == node.id || !nodes.contains_key(&attic) {
                        attic_parent_missing = Some(attic);
                    }
                }
            }

            let Some(node) = nodes.get_mut(id) else {
                continue;
            };
            if node.is_anchored() && node.is_parked() {
                tracing::warn!(node = %node.id, "node both anchored and parked; treating as free");
                faults.push(StructuralFault::AnchoredAndParked { node: node.id });
                node.anchor = None;
                node.attic_parent = None;
            }
            if anchor_is_self && node.anchor.take().is_some() {
                tracing::warn!(node = %node.id, "node anchors to itself; treating as free");
                faults.push(StructuralFault::CycleDetected { node: node.id });
            }
            if let Some(missing) = anchor_parent_missing {
                if node.anchor.take().is_some() {
                    tracing::warn!(node = %node.id, %missing, "orphaned anchor; treating as free");
                    faults.push(StructuralFault::OrphanedAnchor {
                        node: node.id,
                        missing,
                    });
                }
            }
            if let Some(missing) = attic_parent_missing {
                if node.attic_parent.take().is_some() {
                    tracing::warn!(node = %node.id, %missing, "orphaned attic parent; treating as free");
                    faults.push(StructuralFault::OrphanedAttic {
                        node: node.id,
                        missing,
                    });
                }
            }
            if !node.trim_is_well_formed() {
                tracing::warn!(node = %node.id, "malformed trim window; dropping clip_out");
                faults.push(StructuralFault::InvalidTrim { node: node.id });
                node.trim.clip_out = None;
                if !node.trim.clip_in.is_finite() {
                    node.trim.clip_in = 0.0;
                }
            }
        }

        // Child index. Sequence slots hold one occupant; extras stay anchored
        // (the resolver still places them) but are surfaced as conflicts.
        let mut children: BTreeMap<NodeId, ChildSet> = BTreeMap::new();
        for node in nodes.values() {
            let Some(anchor) = &node.anchor else { continue };
            let set = children.entry(anchor.parent).or_default();
            match anchor.mode {
                ConnectionMode::Stack => set.stack.push(node.id),
                ConnectionMode::Prepend => match set.prepend {
                    None => set.prepend = Some(node.id),
                    Some(kept) => faults.push(StructuralFault::SlotConflict {
                        parent: anchor.parent,
                        mode: ConnectionMode::Prepend,
                        kept,
                        extra: node.id,
                    }),
                },
                ConnectionMode::Append => match set.append {
                    None => set.append = Some(node.id),
                    Some(kept) => faults.push(StructuralFault::SlotConflict {
                        parent: anchor.parent,
                        mode: ConnectionMode::Append,
                        kept,
                        extra: node.id,
                    }),
                },
            }
        }

        // The root is the first free, unparked spine in id order; any later
        // free spine classifies as bucket content.
        let root = nodes
            .values()
            .find(|n| n.kind == NodeKind::Spine && n.is_free())
            .map(|n| n.id);

        Self {
            nodes,
            children,
            root,
            faults,
        }
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether the snapshot contains the id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the canvas is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The unique canvas root, if the canvas is non-empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Child index of a node.
    pub fn children(&self, id: NodeId) -> &ChildSet {
        self.children.get(&id).unwrap_or(&EMPTY_CHILDREN)
    }

    /// Faults recorded during normalization.
    pub fn faults(&self) -> &[StructuralFault] {
        &self.faults
    }

    /// Copy of the snapshot with the given records replacing their originals.
    ///
    /// Used to evaluate a hypothetical mutation (e.g. the second step of an
    /// insertion) without touching the store; the copy is renormalized.
    pub fn with_updates(&self, updates: &[Node]) -> CanvasSnapshot {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        for update in updates {
            match nodes.iter_mut().find(|n| n.id == update.id) {
                Some(slot) => *slot = update.clone(),
                None => nodes.push(update.clone()),
            }
        }
        CanvasSnapshot::from_nodes(nodes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/snapshot.rs"]
mod tests;
