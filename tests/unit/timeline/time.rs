use super::*;
use crate::{
    foundation::core::Point,
    graph::dsl::SnapshotBuilder,
};

fn metrics() -> LayoutMetrics {
    LayoutMetrics::default()
}

#[test]
fn free_node_reads_home_through_the_time_scale() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    b.home(a, Point::new(200.0, 0.0));
    let snap = b.build();
    // 200 px at 20 px/s.
    assert_eq!(derive_start_time(a, &snap, &metrics()).unwrap(), 10.0);
}

#[test]
fn append_starts_when_the_parent_ends() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    b.link_with_drift(c, a, ConnectionMode::Append, 0.5, 0);
    let snap = b.build();
    assert_eq!(derive_start_time(c, &snap, &metrics()).unwrap(), 10.5);
}

#[test]
fn prepend_ends_when_the_parent_starts() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    b.link(c, a, ConnectionMode::Prepend);
    let snap = b.build();
    assert_eq!(derive_start_time(c, &snap, &metrics()).unwrap(), -8.0);
}

#[test]
fn stack_rides_the_parent_plus_drift() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.satellite(2.0);
    b.home(a, Point::new(40.0, 0.0));
    b.link_with_drift(c, a, ConnectionMode::Stack, 1.5, 2);
    let snap = b.build();
    assert_eq!(derive_start_time(c, &snap, &metrics()).unwrap(), 3.5);
}

#[test]
fn chains_accumulate_over_every_hop() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    let d = b.satellite(2.0);
    b.link(c, a, ConnectionMode::Append);
    b.link_with_drift(d, c, ConnectionMode::Stack, 1.0, 0);
    let snap = b.build();
    assert_eq!(derive_start_time(d, &snap, &metrics()).unwrap(), 11.0);
}

#[test]
fn cyclic_chain_fails_fast() {
    let mut b = SnapshotBuilder::new();
    let a = b.spine(10.0);
    let c = b.spine(8.0);
    b.link(a, c, ConnectionMode::Append);
    b.link(c, a, ConnectionMode::Append);
    let snap = b.build();
    let err = derive_start_time(a, &snap, &metrics()).unwrap_err();
    assert!(err.to_string().contains("loops back"));
}
