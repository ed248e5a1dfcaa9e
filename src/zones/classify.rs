use crate::{graph::model::Node, graph::snapshot::CanvasSnapshot};

/// Node membership category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Zone {
    /// Live anchored structure: the root and everything anchored to it.
    Assembly,
    /// Parked context above a spine.
    Attic,
    /// Unattached global storage.
    Bucket,
}

/// Classify a node for one pass.
///
/// Attic membership wins; otherwise anchored nodes and the canvas root are
/// assembly, and every remaining free node routes to the bucket. Only
/// assembly nodes participate in anchor-chain layout and expose drop zones.
pub fn classify(node: &Node, snapshot: &CanvasSnapshot) -> Zone {
    if node.is_parked() {
        Zone::Attic
    } else if node.is_anchored() || snapshot.root() == Some(node.id) {
        Zone::Assembly
    } else {
        Zone::Bucket
    }
}

#[cfg(test)]
#[path = "../../tests/unit/zones/classify.rs"]
mod tests;
