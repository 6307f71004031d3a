use super::*;

#[test]
fn origin_has_no_inbound_segment() {
    assert_eq!(CheckpointIndex::ORIGIN.inbound_segment(), None);
    assert_eq!(CheckpointIndex(3).inbound_segment(), Some(SegmentIndex(2)));
}

#[test]
fn segment_endpoints_are_consecutive() {
    let s = SegmentIndex(4);
    assert_eq!(s.from_checkpoint(), CheckpointIndex(4));
    assert_eq!(s.to_checkpoint(), CheckpointIndex(5));
    assert_eq!(s.to_checkpoint().inbound_segment(), Some(s));
}

#[test]
fn indices_serialize_as_bare_numbers() {
    let s = serde_json::to_string(&CardIndex(7)).unwrap();
    assert_eq!(s, "7");
    let b: ScrollBehavior = serde_json::from_str("\"smooth\"").unwrap();
    assert_eq!(b, ScrollBehavior::Smooth);
}
