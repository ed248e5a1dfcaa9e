use super::*;
use crate::{
    graph::dsl::SnapshotBuilder,
    graph::store::MemoryNodeStore,
};

fn metrics() -> LayoutMetrics {
    LayoutMetrics::default()
}

#[test]
fn empty_slot_links_in_one_step() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let s = b.satellite(5.0);
    let snap = b.build();

    let plan = plan_link(s, a, ConnectionMode::Stack, 0.5, 1, &snap, &metrics()).unwrap();
    let LinkPlan::Ready(tx) = plan else {
        panic!("expected a ready plan");
    };
    assert_eq!(tx.steps().len(), 1);
    let anchor = tx.steps()[0].anchor.unwrap();
    assert_eq!(anchor.parent, a);
    assert_eq!(anchor.drift_x, 0.5);
    assert_eq!(anchor.drift_y, 1);
}

#[test]
fn linking_unparks_the_incoming_node() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let parked = b.satellite(5.0);
    b.park(parked, a);
    let snap = b.build();

    let plan = plan_link(parked, a, ConnectionMode::Stack, 0.0, 0, &snap, &metrics()).unwrap();
    let tx = plan.transaction().unwrap();
    assert!(tx.steps()[0].attic_parent.is_none());
    assert!(tx.steps()[0].is_anchored());
}

#[test]
fn invalid_links_are_rejected_without_steps() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    b.link(c, a, ConnectionMode::Append);
    let snap = b.build();

    let plan = plan_link(a, c, ConnectionMode::Append, 0.0, 0, &snap, &metrics()).unwrap();
    assert_eq!(
        plan,
        LinkPlan::Rejected(LinkReason::WouldCycle { child: a, parent: c })
    );
}

#[test]
fn occupied_append_slot_splices_and_preserves_start_time() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let tail = b.spine(8.0);
    let incoming = b.spine(4.0);
    b.link(tail, a, ConnectionMode::Append);
    let snap = b.build();
    let m = metrics();
    let before = derive_start_time(tail, &snap, &m).unwrap();

    let plan = plan_link(incoming, a, ConnectionMode::Append, 0.0, 0, &snap, &m).unwrap();
    let LinkPlan::Ready(tx) = plan else {
        panic!("expected insertion to validate");
    };
    assert_eq!(tx.steps().len(), 2);

    let after_snap = tx.applied_to(&snap);
    // The incoming node took the slot; the tail re-anchored onto it.
    assert_eq!(after_snap.children(a).append, Some(incoming));
    assert_eq!(
        after_snap.get(tail).unwrap().anchor.unwrap().parent,
        incoming
    );
    // Position-continuity law.
    let after = derive_start_time(tail, &after_snap, &m).unwrap();
    assert_eq!(after, before);
}

#[test]
fn occupied_prepend_slot_splices_a_satellite_in_front() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let lead = b.satellite(5.0);
    let incoming = b.satellite(6.0);
    b.link(lead, a, ConnectionMode::Prepend);
    let snap = b.build();
    let m = metrics();
    let before = derive_start_time(lead, &snap, &m).unwrap();
    assert_eq!(before, -5.0);

    let plan = plan_link(incoming, a, ConnectionMode::Prepend, 0.0, 0, &snap, &m).unwrap();
    let tx = plan.transaction().unwrap().clone();
    let after_snap = tx.applied_to(&snap);
    assert_eq!(after_snap.children(a).prepend, Some(incoming));
    assert_eq!(after_snap.get(lead).unwrap().anchor.unwrap().parent, incoming);
    assert_eq!(derive_start_time(lead, &after_snap, &m).unwrap(), before);
}

#[test]
fn drifted_occupants_keep_their_absolute_time_too() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let tail = b.spine(8.0);
    let incoming = b.spine(4.0);
    b.link_with_drift(tail, a, ConnectionMode::Append, 2.5, 1);
    let snap = b.build();
    let m = metrics();
    let before = derive_start_time(tail, &snap, &m).unwrap();

    let plan = plan_link(incoming, a, ConnectionMode::Append, 1.0, 0, &snap, &m).unwrap();
    let tx = plan.transaction().unwrap().clone();
    let after_snap = tx.applied_to(&snap);
    assert_eq!(derive_start_time(tail, &after_snap, &m).unwrap(), before);
    // Track drift survives the re-anchor.
    assert_eq!(after_snap.get(tail).unwrap().anchor.unwrap().drift_y, 1);
}

#[test]
fn insertion_rejects_when_the_second_step_cannot_validate() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let tail = b.spine(8.0);
    let incoming = b.spine(4.0);
    let blocker = b.spine(2.0);
    b.link(tail, a, ConnectionMode::Append);
    // The incoming node's own append slot is already taken.
    b.link(blocker, incoming, ConnectionMode::Append);
    let snap = b.build();

    let plan = plan_link(incoming, a, ConnectionMode::Append, 0.0, 0, &snap, &metrics()).unwrap();
    assert_eq!(
        plan,
        LinkPlan::Rejected(LinkReason::SlotOccupied {
            parent: incoming,
            mode: ConnectionMode::Append,
            occupant: blocker,
        })
    );
}

#[test]
fn transactions_commit_through_the_store() {
    let canvas = CanvasId(1);
    let mut store = MemoryNodeStore::new();
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let tail = b.spine(8.0);
    let incoming = b.spine(4.0);
    b.link(tail, a, ConnectionMode::Append);
    for record in b.records() {
        store.create(canvas, record.clone()).unwrap();
    }

    let snap = store.snapshot(canvas);
    let plan = plan_link(incoming, a, ConnectionMode::Append, 0.0, 0, &snap, &metrics()).unwrap();
    plan.transaction().unwrap().apply(&mut store, canvas).unwrap();

    let committed = store.snapshot(canvas);
    assert_eq!(committed.children(a).append, Some(incoming));
    assert_eq!(committed.children(incoming).append, Some(tail));
}

#[test]
fn unlink_detaches_into_the_bucket_at_the_given_point() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let s = b.satellite(5.0);
    b.link(s, a, ConnectionMode::Stack);
    let snap = b.build();

    let plan = plan_unlink(s, Point::new(400.0, 300.0), &snap);
    let LinkPlan::Ready(tx) = plan else {
        panic!("expected unlink to validate");
    };
    let node = &tx.steps()[0];
    assert!(node.is_free());
    assert_eq!(node.home, Point::new(400.0, 300.0));
}

#[test]
fn unlinking_a_free_node_is_rejected() {
    let mut b = SnapshotBuilder::new();
    let _root = b.spine(10.0);
    let s = b.satellite(5.0);
    let snap = b.build();
    assert_eq!(
        plan_unlink(s, Point::ZERO, &snap),
        LinkPlan::Rejected(LinkReason::NotAnchored(s))
    );
}

#[test]
fn parking_requires_a_spine_attic() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let s1 = b.satellite(5.0);
    let s2 = b.satellite(5.0);
    let snap = b.build();

    let plan = plan_park(s1, a, &snap);
    let tx = plan.transaction().unwrap();
    assert!(tx.steps()[0].is_parked());

    assert_eq!(
        plan_park(s2, s1, &snap),
        LinkPlan::Rejected(LinkReason::AtticRequiresSpine(s1))
    );
}
