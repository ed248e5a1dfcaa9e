use super::*;
use crate::graph::dsl::SnapshotBuilder;

#[test]
fn unknown_parent_is_the_first_check() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let snap = b.build();
    let check = validate_link(a, NodeId(99), ConnectionMode::Append, &snap);
    assert!(!check.is_valid());
    assert_eq!(check.reason(), Some(LinkReason::UnknownParent(NodeId(99))));
}

#[test]
fn unknown_child_is_reported() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let snap = b.build();
    let check = validate_link(NodeId(99), a, ConnectionMode::Stack, &snap);
    assert_eq!(check.reason(), Some(LinkReason::UnknownChild(NodeId(99))));
}

#[test]
fn self_link_is_rejected() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let snap = b.build();
    let check = validate_link(a, a, ConnectionMode::Stack, &snap);
    assert_eq!(check.reason(), Some(LinkReason::SelfLink(a)));
}

#[test]
fn link_that_would_close_a_cycle_is_rejected() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    b.link(c, a, ConnectionMode::Append);
    let snap = b.build();
    // B is anchored to A; anchoring A onto B would be a paradox.
    let check = validate_link(a, c, ConnectionMode::Append, &snap);
    assert_eq!(
        check.reason(),
        Some(LinkReason::WouldCycle { child: a, parent: c })
    );
}

#[test]
fn deep_cycles_are_caught_anywhere_up_the_chain() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let mid = b.spine(8.0);
    let tail = b.satellite(5.0);
    b.link(mid, a, ConnectionMode::Append);
    b.link(tail, mid, ConnectionMode::Stack);
    let snap = b.build();
    let check = validate_link(a, tail, ConnectionMode::Stack, &snap);
    assert!(matches!(check.reason(), Some(LinkReason::WouldCycle { .. })));
}

#[test]
fn second_append_child_is_rejected_with_a_specific_reason() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let first = b.spine(8.0);
    let second = b.spine(6.0);
    b.link(first, a, ConnectionMode::Append);
    let snap = b.build();
    let check = validate_link(second, a, ConnectionMode::Append, &snap);
    assert_eq!(
        check.reason(),
        Some(LinkReason::SlotOccupied {
            parent: a,
            mode: ConnectionMode::Append,
            occupant: first,
        })
    );
    let message = check.reason().unwrap().to_string();
    assert!(message.contains("APPEND"));
    assert!(message.contains("one node per direction"));
}

#[test]
fn occupied_slot_passes_when_insertion_is_explicit() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let first = b.spine(8.0);
    let second = b.spine(6.0);
    b.link(first, a, ConnectionMode::Prepend);
    let snap = b.build();
    assert!(!validate_link(second, a, ConnectionMode::Prepend, &snap).is_valid());
    assert!(validate_link_with(second, a, ConnectionMode::Prepend, &snap, true).is_valid());
}

#[test]
fn relinking_the_current_occupant_is_not_a_conflict() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let first = b.spine(8.0);
    b.link(first, a, ConnectionMode::Append);
    let snap = b.build();
    assert!(validate_link(first, a, ConnectionMode::Append, &snap).is_valid());
}

#[test]
fn stack_links_are_unbounded() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let s1 = b.satellite(2.0);
    let s2 = b.satellite(2.0);
    b.link(s1, a, ConnectionMode::Stack);
    let snap = b.build();
    assert!(validate_link(s2, a, ConnectionMode::Stack, &snap).is_valid());
}

#[test]
fn over_deep_chains_report_unresolved_instead_of_walking_forever() {
    let mut b = SnapshotBuilder::new();
    let mut prev = b.spine(1.0);
    for _ in 0..(MAX_CHAIN_HOPS + 1) {
        let next = b.spine(1.0);
        b.link(next, prev, ConnectionMode::Append);
        prev = next;
    }
    let probe = b.satellite(1.0);
    let snap = b.build();
    let check = validate_link(probe, prev, ConnectionMode::Stack, &snap);
    assert_eq!(
        check.reason(),
        Some(LinkReason::UnresolvedChain { parent: prev })
    );
}
