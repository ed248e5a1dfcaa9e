use std::collections::{HashMap, HashSet};

use crate::{
    foundation::core::{ConnectionMode, LayoutMetrics, NodeId, Point},
    graph::snapshot::{CanvasSnapshot, StructuralFault},
    layout::column::ColumnMap,
};

/// Recursive absolute-position resolution over one snapshot.
///
/// Positions are memoized within the pass; an explicit visited set turns a
/// cyclic anchor chain into a [`StructuralFault`] and a fallback to the
/// node's stored coordinates instead of unbounded recursion.
pub(crate) struct PositionSolver<'a> {
    snapshot: &'a CanvasSnapshot,
    metrics: &'a LayoutMetrics,
    columns: &'a ColumnMap,
    memo: HashMap<NodeId, Point>,
    visiting: HashSet<NodeId>,
    faults: Vec<StructuralFault>,
}

impl<'a> PositionSolver<'a> {
    pub(crate) fn new(
        snapshot: &'a CanvasSnapshot,
        metrics: &'a LayoutMetrics,
        columns: &'a ColumnMap,
    ) -> Self {
        Self {
            snapshot,
            metrics,
            columns,
            memo: HashMap::with_capacity(snapshot.len()),
            visiting: HashSet::new(),
            faults: Vec::new(),
        }
    }

    /// Pin a position computed outside the anchor chain (attic rows).
    pub(crate) fn seed(&mut self, id: NodeId, point: Point) {
        self.memo.insert(id, point);
    }

    pub(crate) fn resolve(&mut self, id: NodeId) -> Point {
        if let Some(point) = self.memo.get(&id) {
            return *point;
        }
        let Some(node) = self.snapshot.get(id) else {
            return Point::ZERO;
        };
        let Some(anchor) = node.anchor else {
            self.memo.insert(id, node.home);
            return node.home;
        };
        if !self.visiting.insert(id) {
            // Paradox: the chain re-entered this node. Fall back to the last
            // stored coordinates; the pass is flagged inconsistent.
            self.push_fault(StructuralFault::CycleDetected { node: id });
            self.memo.insert(id, node.home);
            return node.home;
        }
        let parent_point = self.resolve(anchor.parent);
        self.visiting.remove(&id);

        let Some(parent) = self.snapshot.get(anchor.parent) else {
            self.push_fault(StructuralFault::OrphanedAnchor {
                node: id,
                missing: anchor.parent,
            });
            self.memo.insert(id, node.home);
            return node.home;
        };

        let pps = self.metrics.pixels_per_second;
        let drift_px = anchor.drift_x * pps;
        let track_shift = f64::from(anchor.drift_y) * self.metrics.track_height;
        let gap = self.metrics.gap_between(parent.kind, node.kind);
        let parent_left = self.columns.left_offset_for(anchor.parent);

        let point = match anchor.mode {
            ConnectionMode::Stack => Point::new(
                parent_point.x + drift_px + parent_left,
                parent_point.y
                    - self.metrics.node_height(node.kind)
                    - self.metrics.stack_gap
                    - track_shift,
            ),
            ConnectionMode::Prepend => Point::new(
                parent_point.x + parent_left - self.columns.width_for(id) - gap + drift_px,
                parent_point.y - track_shift,
            ),
            ConnectionMode::Append => Point::new(
                parent_point.x + self.columns.width_for(anchor.parent) + gap + drift_px,
                parent_point.y - track_shift,
            ),
        };

        // A cycle through this node may have memoized the fallback while the
        // chain unwound; keep that value so the pass stays self-consistent.
        *self.memo.entry(id).or_insert(point)
    }

    pub(crate) fn into_faults(self) -> Vec<StructuralFault> {
        self.faults
    }

    fn push_fault(&mut self, fault: StructuralFault) {
        if !self.faults.contains(&fault) {
            self.faults.push(fault);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
