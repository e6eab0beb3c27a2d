use super::*;
use crate::patch::builder::PatchBuilder;
use crate::patch::decode::decode_patch;

fn apply(store: &mut SceneStore, b: &PatchBuilder) -> Vec<Result<(), EditError>> {
    let bytes = b.build();
    let decoded = decode_patch(&bytes);
    assert_eq!(decoded.error, None);
    decoded.ops.iter().map(|op| apply_op(store, op)).collect()
}

fn ids(v: &[u32]) -> Vec<NodeId> {
    v.iter().map(|&i| NodeId(i)).collect()
}

fn column_with_children(children: &[i32]) -> SceneStore {
    let mut store = SceneStore::new();
    let mut b = PatchBuilder::new();
    b.create_node(1, NodeKind::Column);
    for &c in children {
        b.create_node(c, NodeKind::Text).append_child(1, c);
    }
    for r in apply(&mut store, &b) {
        r.unwrap();
    }
    store
}

#[test]
fn recreate_retags_and_preserves_everything_else() {
    let mut store = column_with_children(&[2, 3]);
    let mut b = PatchBuilder::new();
    b.set_text(2, "keep")
        .set_gap(1, 6)
        .create_node(1, NodeKind::Row)
        .create_node(2, NodeKind::Button);
    for r in apply(&mut store, &b) {
        r.unwrap();
    }

    let root = store.node(NodeId(1)).unwrap();
    assert_eq!(root.kind(), NodeKind::Row);
    assert_eq!(root.props().gap, 6);
    assert_eq!(store.child_ids(NodeId(1)), ids(&[2, 3]));

    let two = store.node(NodeId(2)).unwrap();
    assert_eq!(two.kind(), NodeKind::Button);
    assert_eq!(two.text(), Some("keep"));
    assert_eq!(store.parent_of(NodeId(2)), Some(NodeId(1)));
}

#[test]
fn append_reparents_and_keeps_old_sibling_order() {
    let mut store = column_with_children(&[2, 3, 4, 5]);
    let mut b = PatchBuilder::new();
    b.create_node(10, NodeKind::Row).append_child(10, 3);
    for r in apply(&mut store, &b) {
        r.unwrap();
    }

    assert_eq!(store.parent_of(NodeId(3)), Some(NodeId(10)));
    assert_eq!(store.child_ids(NodeId(1)), ids(&[2, 4, 5]));
    assert_eq!(store.child_ids(NodeId(10)), ids(&[3]));
}

#[test]
fn append_to_same_parent_moves_to_end_without_duplicates() {
    let mut store = column_with_children(&[2, 3, 4]);
    let mut b = PatchBuilder::new();
    b.append_child(1, 2);
    apply(&mut store, &b)[0].clone().unwrap();
    assert_eq!(store.child_ids(NodeId(1)), ids(&[3, 4, 2]));
}

#[test]
fn insert_child_ignores_index() {
    let mut a = column_with_children(&[2, 3]);
    let mut b = column_with_children(&[2, 3]);
    let mut pa = PatchBuilder::new();
    pa.create_node(9, NodeKind::Text).append_child(1, 9);
    let mut pb = PatchBuilder::new();
    pb.create_node(9, NodeKind::Text).insert_child(1, 9, 0);
    apply(&mut a, &pa);
    apply(&mut b, &pb);
    assert_eq!(a.child_ids(NodeId(1)), b.child_ids(NodeId(1)));
    assert_eq!(a.child_ids(NodeId(1)), ids(&[2, 3, 9]));
}

#[test]
fn delete_orphans_children_without_cascading() {
    let mut store = column_with_children(&[2, 3]);
    let mut b = PatchBuilder::new();
    b.create_node(4, NodeKind::Text).append_child(2, 4);
    b.create_node(5, NodeKind::Column).append_child(5, 1);
    b.delete_node(1);
    for r in apply(&mut store, &b) {
        r.unwrap();
    }

    assert!(!store.contains(NodeId(1)));
    assert!(store.contains(NodeId(2)));
    assert!(store.contains(NodeId(3)));
    assert_eq!(store.parent_of(NodeId(2)), None);
    assert_eq!(store.parent_of(NodeId(3)), None);
    // Grandchildren stay attached to their own parent.
    assert_eq!(store.parent_of(NodeId(4)), Some(NodeId(2)));
    // The deleted node left its parent's list.
    assert!(store.child_ids(NodeId(5)).is_empty());
    assert_eq!(
        store.parentless().collect::<Vec<_>>(),
        ids(&[2, 3, 5])
    );
}

#[test]
fn structural_ops_on_missing_nodes_are_rejected() {
    let mut store = column_with_children(&[2]);
    let mut b = PatchBuilder::new();
    b.append_child(1, 99)
        .append_child(99, 2)
        .remove_child(1, 99)
        .replace_child(1, 2, 99)
        .delete_node(42)
        .append_child(0, 2);
    let results = apply(&mut store, &b);
    assert_eq!(results[0], Err(EditError::UnknownNode(NodeId(99))));
    assert_eq!(results[1], Err(EditError::UnknownNode(NodeId(99))));
    assert_eq!(results[2], Err(EditError::UnknownNode(NodeId(99))));
    assert_eq!(results[3], Err(EditError::UnknownNode(NodeId(99))));
    assert_eq!(results[4], Err(EditError::UnknownNode(NodeId(42))));
    assert_eq!(results[5], Err(EditError::InvalidId(0)));
    assert_eq!(store.child_ids(NodeId(1)), ids(&[2]));
}

#[test]
fn remove_child_only_when_present() {
    let mut store = column_with_children(&[2, 3, 4]);
    let mut b = PatchBuilder::new();
    b.create_node(7, NodeKind::Text)
        .remove_child(1, 7)
        .remove_child(1, 3);
    let results = apply(&mut store, &b);
    assert_eq!(
        results[1],
        Err(EditError::NotAChild {
            parent: NodeId(1),
            child: NodeId(7)
        })
    );
    assert_eq!(results[2], Ok(()));
    assert_eq!(store.child_ids(NodeId(1)), ids(&[2, 4]));
    assert_eq!(store.parent_of(NodeId(3)), None);
}

#[test]
fn replace_swaps_in_place() {
    let mut store = column_with_children(&[2, 3, 4]);
    let mut b = PatchBuilder::new();
    b.create_node(8, NodeKind::Row)
        .create_node(9, NodeKind::Text)
        .append_child(8, 9)
        .replace_child(1, 3, 9);
    for r in apply(&mut store, &b) {
        r.unwrap();
    }
    assert_eq!(store.child_ids(NodeId(1)), ids(&[2, 9, 4]));
    assert_eq!(store.parent_of(NodeId(9)), Some(NodeId(1)));
    assert_eq!(store.parent_of(NodeId(3)), None);
    assert!(store.child_ids(NodeId(8)).is_empty());
}

#[test]
fn replace_with_sibling_keeps_list_consistent() {
    let mut store = column_with_children(&[2, 3, 4]);
    let mut b = PatchBuilder::new();
    b.replace_child(1, 4, 2);
    apply(&mut store, &b)[0].clone().unwrap();
    assert_eq!(store.child_ids(NodeId(1)), ids(&[3, 2]));
    assert_eq!(store.parent_of(NodeId(4)), None);
}

#[test]
fn replace_when_old_is_not_a_child_is_a_no_op() {
    let mut store = column_with_children(&[5]);
    let mut b = PatchBuilder::new();
    b.create_node(2, NodeKind::Text)
        .create_node(3, NodeKind::Text)
        .replace_child(1, 2, 3);
    let results = apply(&mut store, &b);
    assert!(matches!(results[2], Err(EditError::NotAChild { .. })));
    assert_eq!(store.child_ids(NodeId(1)), ids(&[5]));
    assert_eq!(store.parent_of(NodeId(2)), None);
    assert_eq!(store.parent_of(NodeId(3)), None);
}

#[test]
fn cycle_forming_edits_are_rejected() {
    let mut store = column_with_children(&[2]);
    let mut b = PatchBuilder::new();
    b.create_node(3, NodeKind::Column)
        .append_child(2, 3)
        .append_child(3, 1)
        .append_child(1, 1)
        .create_node(4, NodeKind::Text)
        .append_child(3, 4)
        .replace_child(3, 4, 1);
    let results = apply(&mut store, &b);
    assert_eq!(results[1], Ok(()));
    assert_eq!(
        results[2],
        Err(EditError::WouldCycle {
            parent: NodeId(3),
            child: NodeId(1)
        })
    );
    assert!(matches!(results[3], Err(EditError::WouldCycle { .. })));
    assert!(matches!(results[6], Err(EditError::WouldCycle { .. })));
    assert_eq!(store.parent_of(NodeId(1)), None);
    assert_eq!(store.child_ids(NodeId(3)), ids(&[4]));
}

#[test]
fn properties_and_text() {
    let mut store = column_with_children(&[2]);
    let mut b = PatchBuilder::new();
    b.set_align(1, Align::End, Align::Center)
        .set_padding(
            1,
            Padding {
                left: 1,
                top: 2,
                right: 3,
                bottom: 4,
            },
        )
        .set_size(2, 200, 40)
        .set_prop(2, 999, 5)
        .set_prop_str(2, 202, "ignored")
        .set_text(2, "first")
        .set_text(2, "second");
    let results = apply(&mut store, &b);
    assert_eq!(results[5], Err(EditError::UnsupportedProperty(999)));
    assert_eq!(results[6], Err(EditError::UnsupportedProperty(202)));

    let p = store.node(NodeId(1)).unwrap().props();
    assert_eq!(p.main_align, Align::End);
    assert_eq!(p.cross_align, Align::Center);
    assert_eq!(p.padding.bottom, 4);
    let two = store.node(NodeId(2)).unwrap();
    assert_eq!((two.props().width, two.props().height), (200, 40));
    assert_eq!(two.text(), Some("second"));
}

#[test]
fn invalid_utf8_text_is_replaced() {
    let mut store = column_with_children(&[2]);
    let bytes = {
        let mut b = PatchBuilder::new();
        b.raw(&[8])
            .raw(&2i32.to_le_bytes())
            .raw(&prop::TEXT.to_le_bytes())
            .raw(&2i32.to_le_bytes())
            .raw(&[b'a', 0xFF]);
        b.build()
    };
    for op in decode_patch(&bytes).ops {
        apply_op(&mut store, &op).unwrap();
    }
    assert_eq!(store.node(NodeId(2)).unwrap().text(), Some("a\u{FFFD}"));
}

#[test]
fn unknown_type_code_is_rejected_and_keeps_existing_type() {
    let mut store = column_with_children(&[]);
    let mut b = PatchBuilder::new();
    b.create_node_raw(1, 42).create_node_raw(2, 0);
    let results = apply(&mut store, &b);
    assert_eq!(results[0], Err(EditError::UnknownNodeType(42)));
    assert_eq!(results[1], Err(EditError::UnknownNodeType(0)));
    assert_eq!(store.node(NodeId(1)).unwrap().kind(), NodeKind::Column);
    assert!(!store.contains(NodeId(2)));
}
