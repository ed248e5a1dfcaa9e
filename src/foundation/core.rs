use crate::foundation::error::{SpindleError, SpindleResult};

pub use kurbo::{Point, Rect, Vec2};

/// Stable node identifier; id order doubles as creation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canvas identifier used by the node store collaborator.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanvasId(pub u64);

/// Node role on the canvas.
///
/// Spine nodes form the primary narrative sequence; satellites are side
/// attachments positioned relative to a spine or another satellite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// Primary-sequence node.
    Spine,
    /// Side attachment.
    Satellite,
}

/// Geometric/temporal relationship of a child to its anchor parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConnectionMode {
    /// Overlay above the parent, same time.
    Stack,
    /// Plays immediately before the parent.
    Prepend,
    /// Plays immediately after the parent.
    Append,
}

impl std::fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionMode::Stack => "STACK",
            ConnectionMode::Prepend => "PREPEND",
            ConnectionMode::Append => "APPEND",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas geometry constants shared by every layout pass.
///
/// The canvas doubles as a timeline: horizontal distance is time scaled by
/// [`LayoutMetrics::pixels_per_second`], vertical distance is track stacking.
pub struct LayoutMetrics {
    /// Temporal scale of the canvas x axis.
    #[serde(default = "default_pixels_per_second")]
    pub pixels_per_second: f64,
    /// Minimum width a node box reserves regardless of duration.
    #[serde(default = "default_min_node_width")]
    pub min_node_width: f64,
    /// Spine node box height.
    #[serde(default = "default_spine_height")]
    pub spine_height: f64,
    /// Satellite node box height.
    #[serde(default = "default_satellite_height")]
    pub satellite_height: f64,
    /// Vertical distance of one `drift_y` track step.
    #[serde(default = "default_track_height")]
    pub track_height: f64,
    /// Vertical gap between a node and a child stacked on it.
    #[serde(default = "default_stack_gap")]
    pub stack_gap: f64,
    /// Horizontal gap between two spine nodes in sequence.
    #[serde(default = "default_spine_gap")]
    pub spine_gap: f64,
    /// Horizontal gap for any link involving a satellite.
    #[serde(default = "default_satellite_gap")]
    pub satellite_gap: f64,
    /// Vertical clearance between a spine and its attic row.
    #[serde(default = "default_attic_gap")]
    pub attic_gap: f64,
    /// Height of the attic drop rectangle.
    #[serde(default = "default_attic_zone_height")]
    pub attic_zone_height: f64,
    /// Thickness of prepend/append/stack drop rectangles.
    #[serde(default = "default_drop_zone_depth")]
    pub drop_zone_depth: f64,
    /// Maximum pointer distance for a void drop to snap to the root attic.
    #[serde(default = "default_void_attic_radius")]
    pub void_attic_radius: f64,
}

fn default_pixels_per_second() -> f64 {
    20.0
}

fn default_min_node_width() -> f64 {
    40.0
}

fn default_spine_height() -> f64 {
    60.0
}

fn default_satellite_height() -> f64 {
    40.0
}

fn default_track_height() -> f64 {
    48.0
}

fn default_stack_gap() -> f64 {
    12.0
}

fn default_spine_gap() -> f64 {
    50.0
}

fn default_satellite_gap() -> f64 {
    16.0
}

fn default_attic_gap() -> f64 {
    90.0
}

fn default_attic_zone_height() -> f64 {
    40.0
}

fn default_drop_zone_depth() -> f64 {
    24.0
}

fn default_void_attic_radius() -> f64 {
    320.0
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            pixels_per_second: default_pixels_per_second(),
            min_node_width: default_min_node_width(),
            spine_height: default_spine_height(),
            satellite_height: default_satellite_height(),
            track_height: default_track_height(),
            stack_gap: default_stack_gap(),
            spine_gap: default_spine_gap(),
            satellite_gap: default_satellite_gap(),
            attic_gap: default_attic_gap(),
            attic_zone_height: default_attic_zone_height(),
            drop_zone_depth: default_drop_zone_depth(),
            void_attic_radius: default_void_attic_radius(),
        }
    }
}

impl LayoutMetrics {
    /// Validate metric invariants.
    pub fn validate(&self) -> SpindleResult<()> {
        for (name, value) in [
            ("pixels_per_second", self.pixels_per_second),
            ("min_node_width", self.min_node_width),
            ("spine_height", self.spine_height),
            ("satellite_height", self.satellite_height),
            ("track_height", self.track_height),
            ("spine_gap", self.spine_gap),
            ("satellite_gap", self.satellite_gap),
            ("attic_gap", self.attic_gap),
            ("attic_zone_height", self.attic_zone_height),
            ("drop_zone_depth", self.drop_zone_depth),
            ("void_attic_radius", self.void_attic_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SpindleError::validation(format!(
                    "metrics {name} must be finite and > 0"
                )));
            }
        }
        if !self.stack_gap.is_finite() || self.stack_gap < 0.0 {
            return Err(SpindleError::validation(
                "metrics stack_gap must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Box height for a node of the given kind.
    pub fn node_height(&self, kind: NodeKind) -> f64 {
        match kind {
            NodeKind::Spine => self.spine_height,
            NodeKind::Satellite => self.satellite_height,
        }
    }

    /// Horizontal gap between an anchored pair.
    ///
    /// Two spines in sequence sit further apart than any pair involving a
    /// satellite, visually separating the primary sequence from side
    /// attachments.
    pub fn gap_between(&self, parent: NodeKind, child: NodeKind) -> f64 {
        match (parent, child) {
            (NodeKind::Spine, NodeKind::Spine) => self.spine_gap,
            _ => self.satellite_gap,
        }
    }
}
