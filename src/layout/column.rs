use std::collections::{HashMap, HashSet};

use crate::{
    foundation::core::{LayoutMetrics, NodeId},
    graph::model::Node,
    graph::snapshot::{CanvasSnapshot, StructuralFault},
    timeline::duration::duration_secs,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Horizontal footprint of one node column.
pub struct ColumnEntry {
    /// Width of the node's own box (`max(min_node_width, duration · px/s)`).
    pub base: f64,
    /// Total column width including stacked descendants and their side
    /// attachments (the umbrella effect).
    pub width: f64,
    /// Rightward shift of the node's content inside its column: content never
    /// extends left of the column origin ("zero is absolute").
    pub left_offset: f64,
}

#[derive(Clone, Debug, Default)]
/// Column footprints for every node of one snapshot.
pub struct ColumnMap {
    entries: HashMap<NodeId, ColumnEntry>,
    faults: Vec<StructuralFault>,
}

impl ColumnMap {
    /// Column width of a node; zero for unknown ids.
    pub fn width_for(&self, id: NodeId) -> f64 {
        self.entries.get(&id).map(|e| e.width).unwrap_or_default()
    }

    /// Left offset of a node; zero for unknown ids.
    pub fn left_offset_for(&self, id: NodeId) -> f64 {
        self.entries
            .get(&id)
            .map(|e| e.left_offset)
            .unwrap_or_default()
    }

    /// Base box width of a node; zero for unknown ids.
    pub fn base_for(&self, id: NodeId) -> f64 {
        self.entries.get(&id).map(|e| e.base).unwrap_or_default()
    }

    /// Full entry for a node.
    pub fn entry_for(&self, id: NodeId) -> Option<&ColumnEntry> {
        self.entries.get(&id)
    }

    /// Faults hit while computing (cyclic stack or side chains).
    pub fn faults(&self) -> &[StructuralFault] {
        &self.faults
    }
}

/// Compute column footprints for every node, bottom-up over STACK descendants.
///
/// A node's footprint grows to contain everything stacked on it plus the
/// prepend/append chains hanging off those children; content left of a column
/// origin is absorbed into `left_offset` so nothing to the left of the node
/// ever moves.
pub fn resolve_column_widths(snapshot: &CanvasSnapshot, metrics: &LayoutMetrics) -> ColumnMap {
    let mut solver = ColumnSolver {
        snapshot,
        metrics,
        entries: HashMap::with_capacity(snapshot.len()),
        visiting: HashSet::new(),
        faults: Vec::new(),
    };
    for node in snapshot.nodes() {
        solver.entry(node.id);
    }
    ColumnMap {
        entries: solver.entries,
        faults: solver.faults,
    }
}

struct ColumnSolver<'a> {
    snapshot: &'a CanvasSnapshot,
    metrics: &'a LayoutMetrics,
    entries: HashMap<NodeId, ColumnEntry>,
    visiting: HashSet<NodeId>,
    faults: Vec<StructuralFault>,
}

impl ColumnSolver<'_> {
    fn entry(&mut self, id: NodeId) -> ColumnEntry {
        if let Some(entry) = self.entries.get(&id) {
            return *entry;
        }
        let Some(node) = self.snapshot.get(id) else {
            return ColumnEntry::default();
        };
        let base = self.base_width(node);
        if !self.visiting.insert(id) {
            // Cyclic stack chain: degrade to the bare box and surface it.
            self.fault_cycle(id);
            return ColumnEntry {
                base,
                width: base,
                left_offset: 0.0,
            };
        }

        let mut leftmost = 0.0f64;
        let mut rightmost = base;
        let stack = self.snapshot.children(id).stack.clone();
        for child_id in stack {
            let Some(child) = self.snapshot.get(child_id) else {
                continue;
            };
            let drift_x = child.anchor.as_ref().map(|a| a.drift_x).unwrap_or(0.0);
            let rel = drift_x * self.metrics.pixels_per_second;
            let child_entry = self.entry(child_id);
            let prepend = self.prepend_protrusion(child_id);
            let append = self.append_protrusion(child_id);
            leftmost = leftmost.min(rel + (child_entry.left_offset - prepend).min(0.0));
            rightmost = rightmost.max(rel + child_entry.width + append);
        }
        self.visiting.remove(&id);

        let entry = ColumnEntry {
            base,
            width: base.max(rightmost - leftmost),
            left_offset: (-leftmost).max(0.0),
        };
        self.entries.insert(id, entry);
        entry
    }

    fn base_width(&self, node: &Node) -> f64 {
        let scaled = duration_secs(node) * self.metrics.pixels_per_second;
        scaled.max(self.metrics.min_node_width)
    }

    /// Leftward reach of a node's prepend chain, measured from its content
    /// origin. Folded back-to-front so a deep chain's own prepends extend
    /// the reach of everything above it.
    fn prepend_protrusion(&mut self, id: NodeId) -> f64 {
        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = id;
        while let Some(prev) = self.snapshot.children(cursor).prepend {
            if self.visiting.contains(&prev) || !seen.insert(prev) {
                self.fault_cycle(prev);
                break;
            }
            let gap = self.gap(cursor, prev);
            links.push((gap, prev));
            cursor = prev;
        }

        let mut reach = 0.0;
        for (gap, prev) in links.into_iter().rev() {
            let entry = self.entry(prev);
            reach = (entry.width + gap) - (entry.left_offset - reach).min(0.0);
        }
        reach
    }

    /// Rightward reach of a node's append chain past its column edge.
    fn append_protrusion(&mut self, id: NodeId) -> f64 {
        let mut reach = 0.0;
        let mut seen = HashSet::new();
        let mut cursor = id;
        while let Some(next) = self.snapshot.children(cursor).append {
            if self.visiting.contains(&next) || !seen.insert(next) {
                self.fault_cycle(next);
                break;
            }
            reach += self.gap(cursor, next) + self.entry(next).width;
            cursor = next;
        }
        reach
    }

    fn gap(&self, parent: NodeId, child: NodeId) -> f64 {
        match (self.snapshot.get(parent), self.snapshot.get(child)) {
            (Some(p), Some(c)) => self.metrics.gap_between(p.kind, c.kind),
            _ => self.metrics.satellite_gap,
        }
    }

    fn fault_cycle(&mut self, node: NodeId) {
        let fault = StructuralFault::CycleDetected { node };
        if !self.faults.contains(&fault) {
            self.faults.push(fault);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/column.rs"]
mod tests;
