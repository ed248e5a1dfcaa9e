use std::collections::BTreeMap;

use crate::{
    foundation::core::{LayoutMetrics, NodeId, NodeKind, Point},
    foundation::error::SpindleResult,
    graph::snapshot::{CanvasSnapshot, StructuralFault},
    layout::column::{ColumnMap, resolve_column_widths},
    layout::resolver::PositionSolver,
    zones::classify::{Zone, classify},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One node with fully derived placement.
pub struct PositionedNode {
    /// Node identifier.
    pub id: NodeId,
    /// Node role.
    pub kind: NodeKind,
    /// Zone membership for this pass.
    pub zone: Zone,
    /// Absolute canvas position of the node's top-left corner.
    pub pos: Point,
    /// Width of the node's own box.
    pub width: f64,
    /// Height of the node's own box.
    pub height: f64,
    /// Total column footprint including stacked descendants.
    pub column_width: f64,
    /// Rightward content shift inside the column.
    pub left_offset: f64,
    /// Layout pass that produced this placement.
    pub generation: u64,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// Result of one full layout pass.
pub struct LayoutPass {
    /// Monotonic pass counter.
    pub generation: u64,
    /// `false` when any structural fault forced a fallback placement.
    pub consistent: bool,
    /// Positioned nodes in id order.
    pub nodes: Vec<PositionedNode>,
    /// Structural faults from normalization, width computation and
    /// resolution, in discovery order.
    pub faults: Vec<StructuralFault>,
}

impl LayoutPass {
    /// Placement of one node.
    pub fn get(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|idx| &self.nodes[idx])
    }
}

#[derive(Clone, Debug)]
/// Position layout engine: anchor chains + column widths → final coordinates.
///
/// Single-threaded and call-and-return; each pass works against the snapshot
/// it is handed and holds no state beyond the metrics and a pass counter.
pub struct LayoutEngine {
    metrics: LayoutMetrics,
    generation: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: LayoutMetrics::default(),
            generation: 0,
        }
    }
}

impl LayoutEngine {
    /// Engine over validated metrics.
    pub fn new(metrics: LayoutMetrics) -> SpindleResult<Self> {
        metrics.validate()?;
        Ok(Self {
            metrics,
            generation: 0,
        })
    }

    /// The engine's metrics.
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    #[tracing::instrument(skip(self, snapshot), fields(nodes = snapshot.len()))]
    /// Derive a placement for every node of the snapshot.
    ///
    /// Assembly nodes resolve through their anchor chains; attic nodes line
    /// up above their spine; bucket nodes keep their stored coordinates.
    /// Structural faults never abort the pass: affected nodes fall back to
    /// their stored coordinates and the pass is flagged inconsistent.
    pub fn resolve_positions(&mut self, snapshot: &CanvasSnapshot) -> LayoutPass {
        self.generation += 1;
        let columns = resolve_column_widths(snapshot, &self.metrics);
        let mut solver = PositionSolver::new(snapshot, &self.metrics, &columns);

        self.seed_attic_rows(snapshot, &columns, &mut solver);

        let mut nodes = Vec::with_capacity(snapshot.len());
        for node in snapshot.nodes() {
            let zone = classify(node, snapshot);
            let pos = solver.resolve(node.id);
            nodes.push(PositionedNode {
                id: node.id,
                kind: node.kind,
                zone,
                pos,
                width: columns.base_for(node.id),
                height: self.metrics.node_height(node.kind),
                column_width: columns.width_for(node.id),
                left_offset: columns.left_offset_for(node.id),
                generation: self.generation,
            });
        }

        let resolver_faults = solver.into_faults();
        let mut faults: Vec<StructuralFault> = snapshot.faults().to_vec();
        for fault in columns.faults().iter().cloned().chain(resolver_faults) {
            if !faults.contains(&fault) {
                faults.push(fault);
            }
        }
        let consistent = faults.is_empty();
        if !consistent {
            tracing::warn!(fault_count = faults.len(), "layout pass is inconsistent");
        }

        LayoutPass {
            generation: self.generation,
            consistent,
            nodes,
            faults,
        }
    }

    /// Park attic rows above their spine before chain resolution so anchored
    /// descendants of a parked node resolve against its attic position.
    fn seed_attic_rows(
        &self,
        snapshot: &CanvasSnapshot,
        columns: &ColumnMap,
        solver: &mut PositionSolver<'_>,
    ) {
        let mut rows: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for node in snapshot.nodes() {
            if let Some(attic_parent) = node.attic_parent {
                rows.entry(attic_parent).or_default().push(node.id);
            }
        }
        for (attic_parent, parked) in rows {
            let origin = solver.resolve(attic_parent);
            let mut cursor = origin.x;
            for id in parked {
                let Some(node) = snapshot.get(id) else { continue };
                let y = origin.y - self.metrics.attic_gap - self.metrics.node_height(node.kind);
                solver.seed(id, Point::new(cursor, y));
                cursor += columns.base_for(id) + self.metrics.satellite_gap;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
