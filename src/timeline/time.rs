use std::collections::HashSet;

use crate::{
    foundation::core::{ConnectionMode, LayoutMetrics, NodeId},
    foundation::error::{SpindleError, SpindleResult},
    graph::snapshot::CanvasSnapshot,
    timeline::duration::duration_secs,
};

/// Absolute start time of a node in timeline seconds.
///
/// The temporal mirror of spatial resolution: STACK children start with
/// their parent, APPEND children start when the parent ends, PREPEND
/// children end when the parent starts; drift is added on top. Free and
/// parked nodes read their raw x position through the canvas time scale.
///
/// Fails fast on a cyclic or broken chain instead of looping.
pub fn derive_start_time(
    id: NodeId,
    snapshot: &CanvasSnapshot,
    metrics: &LayoutMetrics,
) -> SpindleResult<f64> {
    let mut visited = HashSet::new();
    visited.insert(id);

    let mut current = snapshot
        .get(id)
        .ok_or_else(|| SpindleError::structural(format!("node {id} is not in the snapshot")))?;
    let mut offset = 0.0;

    loop {
        let Some(anchor) = &current.anchor else {
            return Ok(offset + current.home.x / metrics.pixels_per_second);
        };
        let parent = snapshot.get(anchor.parent).ok_or_else(|| {
            SpindleError::structural(format!(
                "node {} anchors to missing node {}",
                current.id, anchor.parent
            ))
        })?;
        offset += match anchor.mode {
            ConnectionMode::Stack => anchor.drift_x,
            ConnectionMode::Append => duration_secs(parent) + anchor.drift_x,
            ConnectionMode::Prepend => -duration_secs(current) + anchor.drift_x,
        };
        if !visited.insert(parent.id) {
            return Err(SpindleError::structural(format!(
                "anchor chain of node {id} loops back through node {}",
                parent.id
            )));
        }
        current = parent;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/time.rs"]
mod tests;
