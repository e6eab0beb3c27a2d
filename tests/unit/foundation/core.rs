use super::*;

#[test]
fn node_id_rejects_non_positive_wire_values() {
    assert_eq!(NodeId::from_wire(0), None);
    assert_eq!(NodeId::from_wire(-5), None);
    assert_eq!(NodeId::from_wire(42), Some(NodeId(42)));
    assert_eq!(NodeId::from_wire(i32::MAX), Some(NodeId(i32::MAX as u32)));
}

#[test]
fn rect_inset_can_go_negative() {
    let r = Rect::new(0, 0, 200, 40).inset(4);
    assert_eq!(r, Rect::new(4, 4, 192, 32));
    assert!(!r.is_empty());

    let tiny = Rect::new(10, 10, 6, 6).inset(4);
    assert_eq!(tiny, Rect::new(14, 14, -2, -2));
    assert!(tiny.is_empty());
}

#[test]
fn surface_validation_and_bounds() {
    assert!(Surface::new(0, 10).is_err());
    assert!(Surface::new(10, 0).is_err());
    assert!(Surface::new(u32::MAX, 10).is_err());

    let s = Surface::new(640, 480).unwrap();
    assert_eq!(s.bounds(), Rect::new(0, 0, 640, 480));
    assert_eq!(s.rgb8_len(), 640 * 480 * 3);
}
