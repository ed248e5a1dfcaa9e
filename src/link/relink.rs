use crate::{
    foundation::core::{CanvasId, ConnectionMode, LayoutMetrics, NodeId, NodeKind, Point},
    foundation::error::SpindleResult,
    graph::model::{Anchor, Node},
    graph::snapshot::CanvasSnapshot,
    graph::store::NodeStore,
    link::validate::{LinkReason, validate_link, validate_link_with},
    timeline::duration::duration_secs,
    timeline::time::derive_start_time,
};

#[derive(Clone, Debug, PartialEq)]
/// Fully validated mutation, ready to commit.
///
/// Every record in `steps` passed validation against the snapshot the plan
/// was built from, with earlier steps applied. Committing through
/// [`LinkTransaction::apply`] writes the records in order; nothing was
/// mutated while planning, so a rejected plan leaves no partial state —
/// this closes the orphaned-sibling gap of issuing two naive store calls.
pub struct LinkTransaction {
    steps: Vec<Node>,
}

impl LinkTransaction {
    /// Updated records in commit order.
    pub fn steps(&self) -> &[Node] {
        &self.steps
    }

    /// Commit every step through the store.
    pub fn apply(&self, store: &mut dyn NodeStore, canvas: CanvasId) -> SpindleResult<()> {
        for node in &self.steps {
            store.update(canvas, node.clone())?;
        }
        Ok(())
    }

    /// The snapshot as it will look after commit.
    pub fn applied_to(&self, snapshot: &CanvasSnapshot) -> CanvasSnapshot {
        snapshot.with_updates(&self.steps)
    }
}

/// Outcome of planning a link operation.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkPlan {
    /// Every step validated; commit via [`LinkTransaction::apply`].
    Ready(LinkTransaction),
    /// The operation violates an invariant; nothing was mutated.
    Rejected(LinkReason),
}

impl LinkPlan {
    /// The transaction, when the plan validated.
    pub fn transaction(&self) -> Option<&LinkTransaction> {
        match self {
            LinkPlan::Ready(tx) => Some(tx),
            LinkPlan::Rejected(_) => None,
        }
    }
}

#[tracing::instrument(skip(snapshot, metrics))]
/// Plan anchoring `child` onto `parent`.
///
/// A free slot yields a single-step plan. An occupied sequence slot performs
/// an insertion: the incoming node takes the slot and the previous occupant
/// re-anchors onto the incoming node at the same mode, its temporal drift
/// recomputed so its derived absolute start time is unchanged. Both steps
/// validate before either is committed.
pub fn plan_link(
    child: NodeId,
    parent: NodeId,
    mode: ConnectionMode,
    drift_x: f64,
    drift_y: i32,
    snapshot: &CanvasSnapshot,
    metrics: &LayoutMetrics,
) -> SpindleResult<LinkPlan> {
    let check = validate_link_with(child, parent, mode, snapshot, true);
    if let Some(reason) = check.reason() {
        return Ok(LinkPlan::Rejected(reason));
    }

    let Some(child_record) = snapshot.get(child) else {
        return Ok(LinkPlan::Rejected(LinkReason::UnknownChild(child)));
    };
    let mut incoming = child_record.clone();
    incoming.anchor = Some(Anchor {
        parent,
        mode,
        drift_x,
        drift_y,
    });
    incoming.attic_parent = None;

    let occupant = snapshot
        .children(parent)
        .slot(mode)
        .filter(|occupant| *occupant != child);
    let Some(occupant_id) = occupant else {
        return Ok(LinkPlan::Ready(LinkTransaction {
            steps: vec![incoming],
        }));
    };

    // Insertion. Capture the occupant's derived time before anything moves.
    let old_start = derive_start_time(occupant_id, snapshot, metrics)?;
    let Some(occupant_record) = snapshot.get(occupant_id) else {
        return Ok(LinkPlan::Rejected(LinkReason::UnknownChild(occupant_id)));
    };
    let mut displaced = occupant_record.clone();
    let old_drift_y = displaced.anchor.as_ref().map(|a| a.drift_y).unwrap_or(0);

    let mut detached = displaced.clone();
    detached.anchor = None;
    let staged = snapshot.with_updates(&[incoming.clone(), detached]);

    let second = validate_link(occupant_id, child, mode, &staged);
    if let Some(reason) = second.reason() {
        return Ok(LinkPlan::Rejected(reason));
    }

    let child_start = derive_start_time(child, &staged, metrics)?;
    let drift = match mode {
        ConnectionMode::Append => old_start - child_start - duration_secs(&incoming),
        ConnectionMode::Prepend => old_start - child_start + duration_secs(&displaced),
        ConnectionMode::Stack => old_start - child_start,
    };
    displaced.anchor = Some(Anchor {
        parent: child,
        mode,
        drift_x: drift,
        drift_y: old_drift_y,
    });
    displaced.attic_parent = None;

    Ok(LinkPlan::Ready(LinkTransaction {
        steps: vec![incoming, displaced],
    }))
}

#[tracing::instrument(skip(snapshot))]
/// Plan detaching a node into the bucket at the given canvas position.
pub fn plan_unlink(node: NodeId, home: Point, snapshot: &CanvasSnapshot) -> LinkPlan {
    let Some(record) = snapshot.get(node) else {
        return LinkPlan::Rejected(LinkReason::UnknownChild(node));
    };
    if record.is_free() {
        return LinkPlan::Rejected(LinkReason::NotAnchored(node));
    }
    let mut updated = record.clone();
    updated.anchor = None;
    updated.attic_parent = None;
    updated.home = home;
    LinkPlan::Ready(LinkTransaction {
        steps: vec![updated],
    })
}

#[tracing::instrument(skip(snapshot))]
/// Plan parking a node in the attic of a spine.
pub fn plan_park(node: NodeId, attic_parent: NodeId, snapshot: &CanvasSnapshot) -> LinkPlan {
    let Some(parent) = snapshot.get(attic_parent) else {
        return LinkPlan::Rejected(LinkReason::UnknownParent(attic_parent));
    };
    let Some(record) = snapshot.get(node) else {
        return LinkPlan::Rejected(LinkReason::UnknownChild(node));
    };
    if node == attic_parent {
        return LinkPlan::Rejected(LinkReason::SelfLink(node));
    }
    if parent.kind != NodeKind::Spine {
        return LinkPlan::Rejected(LinkReason::AtticRequiresSpine(attic_parent));
    }
    let mut updated = record.clone();
    updated.anchor = None;
    updated.attic_parent = Some(attic_parent);
    LinkPlan::Ready(LinkTransaction {
        steps: vec![updated],
    })
}

#[cfg(test)]
#[path = "../../tests/unit/link/relink.rs"]
mod tests;
