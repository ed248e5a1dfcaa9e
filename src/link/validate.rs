use crate::{
    foundation::core::{ConnectionMode, NodeId},
    graph::snapshot::CanvasSnapshot,
};

/// Upper bound on the upward anchor walk; a longer chain is reported as
/// unresolved rather than walked further.
pub const MAX_CHAIN_HOPS: usize = 500;

/// Why a proposed link was rejected. Every message is user-presentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum LinkReason {
    /// The target node is gone from the snapshot.
    UnknownParent(NodeId),
    /// The dragged node is gone from the snapshot.
    UnknownChild(NodeId),
    /// A node was dropped onto itself.
    SelfLink(NodeId),
    /// The link would make the chain loop (a paradox).
    WouldCycle {
        /// Dragged node.
        child: NodeId,
        /// Target node.
        parent: NodeId,
    },
    /// The target's chain exceeded the bounded walk and is likely corrupt.
    UnresolvedChain {
        /// Target node whose chain could not be verified.
        parent: NodeId,
    },
    /// The sequence slot already has an occupant.
    SlotOccupied {
        /// Target node.
        parent: NodeId,
        /// Occupied direction.
        mode: ConnectionMode,
        /// Current occupant.
        occupant: NodeId,
    },
    /// Unlink was requested for a node that is not attached to anything.
    NotAnchored(NodeId),
    /// Attic parking targets must be spine nodes.
    AtticRequiresSpine(NodeId),
}

impl std::fmt::Display for LinkReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkReason::UnknownParent(id) => {
                write!(f, "the target node {id} no longer exists")
            }
            LinkReason::UnknownChild(id) => {
                write!(f, "the dragged node {id} no longer exists")
            }
            LinkReason::SelfLink(id) => {
                write!(f, "node {id} cannot be linked to itself")
            }
            LinkReason::WouldCycle { child, parent } => write!(
                f,
                "linking {child} under {parent} would create a loop in the story chain"
            ),
            LinkReason::UnresolvedChain { parent } => write!(
                f,
                "the chain above {parent} is too deep to verify and may be corrupted"
            ),
            LinkReason::SlotOccupied {
                parent,
                mode,
                occupant,
            } => write!(
                f,
                "node {parent} already links {occupant} in its {mode} slot; \
                 the sequence holds one node per direction"
            ),
            LinkReason::NotAnchored(id) => {
                write!(f, "node {id} is not attached to anything")
            }
            LinkReason::AtticRequiresSpine(id) => {
                write!(f, "node {id} is not a spine and has no attic")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Typed verdict of a proposed link. Expected invalid states are values, not
/// errors: callers branch on [`LinkCheck::is_valid`] and show the reason.
pub struct LinkCheck {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<LinkReason>,
}

impl LinkCheck {
    /// Passing verdict.
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// Rejecting verdict.
    pub fn reject(reason: LinkReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    /// Whether the link may be committed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Rejection reason, when invalid.
    pub fn reason(&self) -> Option<LinkReason> {
        self.reason
    }
}

/// Validate a proposed link before it is committed.
pub fn validate_link(
    child: NodeId,
    parent: NodeId,
    mode: ConnectionMode,
    snapshot: &CanvasSnapshot,
) -> LinkCheck {
    validate_link_with(child, parent, mode, snapshot, false)
}

/// Validate a proposed link, optionally tolerating an occupied slot because
/// the caller performs an explicit insertion (§ re-link protocol).
///
/// Checks run in order: target existence, self-link, bounded upward cycle
/// walk, sequence slot occupancy.
pub fn validate_link_with(
    child: NodeId,
    parent: NodeId,
    mode: ConnectionMode,
    snapshot: &CanvasSnapshot,
    allow_insertion: bool,
) -> LinkCheck {
    if !snapshot.contains(parent) {
        return LinkCheck::reject(LinkReason::UnknownParent(parent));
    }
    if !snapshot.contains(child) {
        return LinkCheck::reject(LinkReason::UnknownChild(child));
    }
    if child == parent {
        return LinkCheck::reject(LinkReason::SelfLink(child));
    }

    // Walk the candidate parent's chain upward; the dragged node must not
    // appear anywhere above it.
    let mut cursor = parent;
    let mut hops = 0usize;
    while let Some(anchor) = snapshot.get(cursor).and_then(|n| n.anchor) {
        hops += 1;
        if hops > MAX_CHAIN_HOPS {
            return LinkCheck::reject(LinkReason::UnresolvedChain { parent });
        }
        if anchor.parent == child {
            return LinkCheck::reject(LinkReason::WouldCycle { child, parent });
        }
        cursor = anchor.parent;
    }

    if !allow_insertion {
        if let Some(occupant) = snapshot.children(parent).slot(mode) {
            if occupant != child {
                return LinkCheck::reject(LinkReason::SlotOccupied {
                    parent,
                    mode,
                    occupant,
                });
            }
        }
    }

    LinkCheck::ok()
}

#[cfg(test)]
#[path = "../../tests/unit/link/validate.rs"]
mod tests;
