use crate::{
    foundation::core::{ConnectionMode, LayoutMetrics, NodeId, NodeKind, Point, Rect},
    graph::snapshot::CanvasSnapshot,
    layout::engine::LayoutPass,
    zones::classify::Zone,
};

/// Drop target role of a zone rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DropZoneKind {
    /// Link before the node.
    Prepend,
    /// Link after the node.
    Append,
    /// Stack on top of the node.
    Stack,
    /// Park in the node's attic (spines only).
    Attic,
}

impl DropZoneKind {
    /// Connection mode this zone commits, if it links rather than parks.
    pub fn connection_mode(self) -> Option<ConnectionMode> {
        match self {
            DropZoneKind::Prepend => Some(ConnectionMode::Prepend),
            DropZoneKind::Append => Some(ConnectionMode::Append),
            DropZoneKind::Stack => Some(ConnectionMode::Stack),
            DropZoneKind::Attic => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One interactive snap-target rectangle.
pub struct DropZone {
    /// Stable index within the generated set; ties in hit-testing resolve to
    /// the smallest index.
    pub index: usize,
    /// Node the zone belongs to.
    pub node: NodeId,
    /// Target role.
    pub kind: DropZoneKind,
    /// Axis-aligned hit rectangle.
    pub rect: Rect,
}

/// Where a drop outside every zone routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum VoidDrop {
    /// Park in the attic of this spine root.
    Attic(NodeId),
    /// Route to the bucket.
    Bucket,
}

/// Generate snap-target rectangles for every assembly node.
///
/// Left and right zones flank the node's column so an append drop lands past
/// the whole umbrella; the stack zone covers the column's top edge; spines
/// additionally expose an attic rectangle further above.
pub fn generate_drop_zones(pass: &LayoutPass, metrics: &LayoutMetrics) -> Vec<DropZone> {
    let mut zones = Vec::new();
    for node in &pass.nodes {
        if node.zone != Zone::Assembly {
            continue;
        }
        let Point { x, y } = node.pos;
        let depth = metrics.drop_zone_depth;
        let column = node.column_width;

        push_zone(
            &mut zones,
            node.id,
            DropZoneKind::Prepend,
            Rect::new(x - depth, y, x, y + node.height),
        );
        push_zone(
            &mut zones,
            node.id,
            DropZoneKind::Append,
            Rect::new(x + column, y, x + column + depth, y + node.height),
        );
        push_zone(
            &mut zones,
            node.id,
            DropZoneKind::Stack,
            Rect::new(x, y - depth, x + column, y),
        );
        if node.kind == NodeKind::Spine {
            let top = y - metrics.attic_gap;
            push_zone(
                &mut zones,
                node.id,
                DropZoneKind::Attic,
                Rect::new(x, top - metrics.attic_zone_height, x + column, top),
            );
        }
    }
    zones
}

fn push_zone(zones: &mut Vec<DropZone>, node: NodeId, kind: DropZoneKind, rect: Rect) {
    let index = zones.len();
    zones.push(DropZone {
        index,
        node,
        kind,
        rect,
    });
}

/// The zone under the pointer: nearest containing rectangle by center
/// distance, ties resolved to the smallest zone index. `None` when the
/// pointer is outside every zone ("void"; see [`resolve_void_drop`]).
pub fn detect_drop_zone(pointer: Point, zones: &[DropZone]) -> Option<&DropZone> {
    zones
        .iter()
        .filter(|zone| zone.rect.contains(pointer))
        .min_by(|a, b| {
            let da = pointer.distance(a.rect.center());
            let db = pointer.distance(b.rect.center());
            da.total_cmp(&db).then(a.index.cmp(&b.index))
        })
}

/// Void policy for drops outside every zone: snap to the root spine's attic
/// when the pointer is within reach of its column, otherwise route to the
/// bucket.
pub fn resolve_void_drop(
    pointer: Point,
    pass: &LayoutPass,
    snapshot: &CanvasSnapshot,
    metrics: &LayoutMetrics,
) -> VoidDrop {
    let Some(root) = snapshot.root() else {
        return VoidDrop::Bucket;
    };
    let Some(positioned) = pass.get(root) else {
        return VoidDrop::Bucket;
    };
    let root_box = Rect::new(
        positioned.pos.x,
        positioned.pos.y,
        positioned.pos.x + positioned.column_width,
        positioned.pos.y + positioned.height,
    );
    if distance_to_rect(pointer, root_box) <= metrics.void_attic_radius {
        VoidDrop::Attic(root)
    } else {
        VoidDrop::Bucket
    }
}

fn distance_to_rect(point: Point, rect: Rect) -> f64 {
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    dx.hypot(dy)
}

#[cfg(test)]
#[path = "../../tests/unit/zones/drop.rs"]
mod tests;
