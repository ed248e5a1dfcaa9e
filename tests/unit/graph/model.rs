use super::*;
use crate::foundation::core::{ConnectionMode, NodeId, NodeKind};

#[test]
fn constructors_start_free() {
    let spine = Node::spine(NodeId(1), 10.0);
    assert_eq!(spine.kind, NodeKind::Spine);
    assert!(spine.is_free());
    assert!(!spine.is_anchored());
    assert!(!spine.is_parked());

    let satellite = Node::satellite(NodeId(2), 3.0);
    assert_eq!(satellite.kind, NodeKind::Satellite);
    assert_eq!(satellite.trim.clip_out, Some(3.0));
}

#[test]
fn anchored_and_parked_is_rejected() {
    let mut node = Node::satellite(NodeId(1), 3.0);
    node.anchor = Some(Anchor::new(NodeId(2), ConnectionMode::Stack));
    node.attic_parent = Some(NodeId(3));
    let err = node.validate().unwrap_err();
    assert!(err.to_string().contains("both anchored and parked"));
}

#[test]
fn self_anchor_is_rejected() {
    let mut node = Node::spine(NodeId(1), 3.0);
    node.anchor = Some(Anchor::new(NodeId(1), ConnectionMode::Append));
    assert!(node.validate().is_err());
}

#[test]
fn inverted_trim_is_rejected() {
    let mut node = Node::spine(NodeId(1), 3.0);
    node.trim = TrimWindow {
        clip_in: 5.0,
        clip_out: Some(2.0),
    };
    assert!(node.validate().is_err());
}

#[test]
fn node_round_trips_through_json() {
    let mut node = Node::satellite(NodeId(9), 4.0).with_media(MediaRef {
        key: "interview_03".to_string(),
        source_duration_sec: Some(61.5),
    });
    node.anchor = Some(Anchor {
        parent: NodeId(2),
        mode: ConnectionMode::Prepend,
        drift_x: -1.25,
        drift_y: 1,
    });
    let json = serde_json::to_string(&node).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back, node);
}
