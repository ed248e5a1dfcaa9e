//! Spindle is the anchor-chain placement engine behind a node-based
//! documentary storyboard.
//!
//! Media references ("nodes") live on an infinite canvas that doubles as a
//! timeline. A node's absolute spatial and temporal placement is never
//! stored: it is derived from a chain of relative relationships — STACK,
//! PREPEND and APPEND anchors — to other nodes, down to the canvas root.
//!
//! # Pass overview
//!
//! 1. **Snapshot**: raw store records -> [`CanvasSnapshot`] (normalized,
//!    id-indexed, malformed records degraded with recorded faults)
//! 2. **Widths**: bottom-up column footprints over STACK descendants
//!    ([`resolve_column_widths`], the "umbrella effect")
//! 3. **Resolve**: anchor chains + column widths -> [`LayoutPass`] with a
//!    position for every node ([`LayoutEngine::resolve_positions`])
//! 4. **Interact**: drop zones, hit-testing and validated link transactions
//!    over the positioned result
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: every pass is a pure function of the
//!   snapshot it is handed; id order breaks all ties.
//! - **Fail fast, never loop**: cyclic anchor chains ("paradoxes") are
//!   detected with explicit visited sets and surfaced as structural faults
//!   while the affected nodes fall back to stored coordinates.
//! - **No partial mutations**: multi-step operations (insertion) validate
//!   every step before any store write ([`plan_link`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod foundation;
mod graph;
mod layout;
mod link;
mod timeline;
mod zones;

pub use foundation::core::{
    CanvasId, ConnectionMode, LayoutMetrics, NodeId, NodeKind, Point, Rect, Vec2,
};
pub use foundation::error::{SpindleError, SpindleResult};
pub use graph::dsl::SnapshotBuilder;
pub use graph::model::{Anchor, MediaRef, Node, TrimWindow};
pub use graph::snapshot::{CanvasSnapshot, ChildSet, StructuralFault};
pub use graph::store::{MemoryNodeStore, NodeStore};
pub use layout::column::{ColumnEntry, ColumnMap, resolve_column_widths};
pub use layout::engine::{LayoutEngine, LayoutPass, PositionedNode};
pub use link::relink::{LinkPlan, LinkTransaction, plan_link, plan_park, plan_unlink};
pub use link::validate::{
    LinkCheck, LinkReason, MAX_CHAIN_HOPS, validate_link, validate_link_with,
};
pub use timeline::duration::{DEFAULT_DURATION_SECS, duration_secs};
pub use timeline::time::derive_start_time;
pub use zones::classify::{Zone, classify};
pub use zones::drop::{
    DropZone, DropZoneKind, VoidDrop, detect_drop_zone, generate_drop_zones, resolve_void_drop,
};
