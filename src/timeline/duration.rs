use crate::graph::model::Node;

/// Deterministic playback duration for a node without a trim-out point.
pub const DEFAULT_DURATION_SECS: f64 = 5.0;

/// Playback duration derived from the trim window.
///
/// `clip_out - clip_in` when the out point is set, clamped at zero; the fixed
/// fallback otherwise. Pure, no side effects.
pub fn duration_secs(node: &Node) -> f64 {
    match node.trim.clip_out {
        Some(clip_out) if clip_out.is_finite() && node.trim.clip_in.is_finite() => {
            (clip_out - node.trim.clip_in).max(0.0)
        }
        _ => DEFAULT_DURATION_SECS,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/duration.rs"]
mod tests;
