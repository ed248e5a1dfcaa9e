use crate::{
    foundation::core::{ConnectionMode, NodeId, NodeKind, Point},
    foundation::error::{SpindleError, SpindleResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Source trim window in media seconds.
pub struct TrimWindow {
    /// Trim-in point.
    #[serde(default)]
    pub clip_in: f64,
    /// Trim-out point; `None` means the node has no resolved out point yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_out: Option<f64>,
}

impl TrimWindow {
    /// Trim window spanning `[0, duration)`.
    pub fn spanning(duration_sec: f64) -> Self {
        Self {
            clip_in: 0.0,
            clip_out: Some(duration_sec),
        }
    }

    fn is_well_formed(&self) -> bool {
        if !self.clip_in.is_finite() {
            return false;
        }
        match self.clip_out {
            Some(out) => out.is_finite() && out >= self.clip_in,
            None => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Opaque reference to a media record owned by the store collaborator.
pub struct MediaRef {
    /// Stable media key in the external media table.
    pub key: String,
    /// Source duration in seconds, when the collaborator has probed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_duration_sec: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Directed reference from a child to the parent it is positioned against.
///
/// The connection mode is present exactly when the parent is: grouping both
/// in one struct encodes the pairing invariant by construction.
pub struct Anchor {
    /// Anchor parent.
    pub parent: NodeId,
    /// Geometric/temporal relationship to the parent.
    pub mode: ConnectionMode,
    /// Fine temporal offset in seconds, layered on the mode offset.
    #[serde(default)]
    pub drift_x: f64,
    /// Fine track offset in whole tracks.
    #[serde(default)]
    pub drift_y: i32,
}

impl Anchor {
    /// Anchor with zero drift.
    pub fn new(parent: NodeId, mode: ConnectionMode) -> Self {
        Self {
            parent,
            mode,
            drift_x: 0.0,
            drift_y: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A media reference placed on the canvas.
///
/// Exactly one of {anchored, parked-in-attic, free} holds per node. `home`
/// is meaningful only while the node is unanchored; width, height and
/// position are derived per layout pass and never stored here.
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Node role.
    pub kind: NodeKind,
    /// Optional media reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    /// Source trim window.
    #[serde(default)]
    pub trim: TrimWindow,
    /// Anchor link, when the node is part of the assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    /// Attic parent, when the node is parked above a spine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attic_parent: Option<NodeId>,
    /// Raw canvas position used while unanchored.
    #[serde(default = "origin")]
    pub home: Point,
}

fn origin() -> Point {
    Point::ZERO
}

impl Node {
    /// Free spine node with the given trim duration.
    pub fn spine(id: NodeId, duration_sec: f64) -> Self {
        Self {
            id,
            kind: NodeKind::Spine,
            media: None,
            trim: TrimWindow::spanning(duration_sec),
            anchor: None,
            attic_parent: None,
            home: Point::ZERO,
        }
    }

    /// Free satellite node with the given trim duration.
    pub fn satellite(id: NodeId, duration_sec: f64) -> Self {
        Self {
            kind: NodeKind::Satellite,
            ..Self::spine(id, duration_sec)
        }
    }

    /// Attach a media reference.
    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }

    /// Whether the node is anchored into the assembly.
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// Whether the node is parked in an attic.
    pub fn is_parked(&self) -> bool {
        self.attic_parent.is_some()
    }

    /// Whether the node is neither anchored nor parked.
    pub fn is_free(&self) -> bool {
        !self.is_anchored() && !self.is_parked()
    }

    /// Validate record invariants strictly.
    ///
    /// Snapshot construction degrades malformed records instead of failing;
    /// this is the strict check for callers that want to reject bad input at
    /// the boundary.
    pub fn validate(&self) -> SpindleResult<()> {
        if self.is_anchored() && self.is_parked() {
            return Err(SpindleError::validation(format!(
                "node {} is both anchored and parked in an attic",
                self.id
            )));
        }
        if let Some(anchor) = &self.anchor {
            if anchor.parent == self.id {
                return Err(SpindleError::validation(format!(
                    "node {} anchors to itself",
                    self.id
                )));
            }
            if !anchor.drift_x.is_finite() {
                return Err(SpindleError::validation(format!(
                    "node {} drift_x must be finite",
                    self.id
                )));
            }
        }
        if !self.trim.is_well_formed() {
            return Err(SpindleError::validation(format!(
                "node {} trim window is malformed (clip_out < clip_in or non-finite)",
                self.id
            )));
        }
        if !self.home.x.is_finite() || !self.home.y.is_finite() {
            return Err(SpindleError::validation(format!(
                "node {} home position must be finite",
                self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn trim_is_well_formed(&self) -> bool {
        self.trim.is_well_formed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
