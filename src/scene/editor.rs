//! Applies decoded patch records to a [`SceneStore`].

use crate::foundation::core::NodeId;
use crate::patch::ops::{PatchOp, prop};
use crate::scene::node::{Align, NodeKind, Padding};
use crate::scene::store::{NodeKey, SceneStore};

/// Why a record was rejected. A rejected record never mutates the store.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum EditError {
    /// Wire identity is zero or negative.
    #[error("node id {0} is not positive")]
    InvalidId(i32),

    /// Create with a type code outside the known set.
    #[error("unknown node type code {0}")]
    UnknownNodeType(i32),

    /// The record names a node that does not exist.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// Remove/replace named a child that is not under the given parent.
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        /// Parent named by the record.
        parent: NodeId,
        /// Child named by the record.
        child: NodeId,
    },

    /// The edit would make a node its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// Property key outside the known set for this record kind.
    #[error("unsupported property key {0}")]
    UnsupportedProperty(i32),

    /// Storage for the edit could not be reserved.
    #[error("allocation failed while editing {0}")]
    Allocation(NodeId),

    /// A handle went stale mid-edit.
    #[error("stale node handle")]
    StaleHandle,
}

fn resolve(store: &SceneStore, raw: i32) -> Result<(NodeId, NodeKey), EditError> {
    let id = NodeId::from_wire(raw).ok_or(EditError::InvalidId(raw))?;
    let key = store.key_of(id).ok_or(EditError::UnknownNode(id))?;
    Ok((id, key))
}

/// Apply one record in document order.
pub fn apply_op(store: &mut SceneStore, op: &PatchOp<'_>) -> Result<(), EditError> {
    match *op {
        PatchOp::CreateNode { id, kind } => create_node(store, id, kind),
        PatchOp::DeleteNode { id } => delete_node(store, id),
        PatchOp::SetProp { id, key, value } => set_prop(store, id, key, value),
        PatchOp::AppendChild { parent, child } | PatchOp::InsertChild { parent, child, .. } => {
            append_child(store, parent, child)
        }
        PatchOp::RemoveChild { parent, child } => remove_child(store, parent, child),
        PatchOp::ReplaceChild { parent, old, new } => replace_child(store, parent, old, new),
        PatchOp::SetPropStr { id, key, bytes } => set_prop_str(store, id, key, bytes),
    }
}

fn create_node(store: &mut SceneStore, raw_id: i32, code: i32) -> Result<(), EditError> {
    let id = NodeId::from_wire(raw_id).ok_or(EditError::InvalidId(raw_id))?;
    let kind = NodeKind::from_code(code).ok_or(EditError::UnknownNodeType(code))?;
    match store.key_of(id) {
        Some(key) => {
            let node = store.get_mut(key).ok_or(EditError::StaleHandle)?;
            node.kind = kind;
        }
        None => {
            store.insert(id, kind)?;
        }
    }
    Ok(())
}

fn delete_node(store: &mut SceneStore, raw_id: i32) -> Result<(), EditError> {
    let (_, key) = resolve(store, raw_id)?;
    store.detach(key);
    let node = store.remove(key).ok_or(EditError::StaleHandle)?;
    for &child in &node.children {
        store.orphan(child);
    }
    Ok(())
}

fn set_prop(store: &mut SceneStore, raw_id: i32, key: i32, value: i32) -> Result<(), EditError> {
    let (_, node_key) = resolve(store, raw_id)?;
    let node = store.get_mut(node_key).ok_or(EditError::StaleHandle)?;
    let props = &mut node.props;
    match key {
        prop::MAIN_ALIGN => props.main_align = Align::from_code(value),
        prop::CROSS_ALIGN => props.cross_align = Align::from_code(value),
        prop::GAP => props.gap = value,
        prop::PADDING_LTRB => props.padding = Padding::unpack(value),
        prop::SIZE_W => props.width = value,
        prop::SIZE_H => props.height = value,
        other => return Err(EditError::UnsupportedProperty(other)),
    }
    Ok(())
}

fn set_prop_str(
    store: &mut SceneStore,
    raw_id: i32,
    key: i32,
    bytes: &[u8],
) -> Result<(), EditError> {
    let (id, node_key) = resolve(store, raw_id)?;
    if key != prop::TEXT {
        return Err(EditError::UnsupportedProperty(key));
    }
    let decoded = String::from_utf8_lossy(bytes);
    let mut text = String::new();
    text.try_reserve_exact(decoded.len())
        .map_err(|_| EditError::Allocation(id))?;
    text.push_str(&decoded);

    let node = store.get_mut(node_key).ok_or(EditError::StaleHandle)?;
    node.text = Some(text);
    Ok(())
}

fn append_child(store: &mut SceneStore, parent: i32, child: i32) -> Result<(), EditError> {
    let (parent_id, parent_key) = resolve(store, parent)?;
    let (child_id, child_key) = resolve(store, child)?;
    if store.is_ancestor_or_self(child_key, parent_key) {
        return Err(EditError::WouldCycle {
            parent: parent_id,
            child: child_id,
        });
    }
    store.reserve_child(parent_key)?;
    store.detach(child_key);
    store.attach_last(parent_key, child_key)
}

fn remove_child(store: &mut SceneStore, parent: i32, child: i32) -> Result<(), EditError> {
    let (parent_id, parent_key) = resolve(store, parent)?;
    let (child_id, child_key) = resolve(store, child)?;
    if !store.children(parent_key).contains(&child_key) {
        return Err(EditError::NotAChild {
            parent: parent_id,
            child: child_id,
        });
    }
    store.detach(child_key);
    Ok(())
}

fn replace_child(store: &mut SceneStore, parent: i32, old: i32, new: i32) -> Result<(), EditError> {
    let (parent_id, parent_key) = resolve(store, parent)?;
    let (old_id, old_key) = resolve(store, old)?;
    let (new_id, new_key) = resolve(store, new)?;

    if !store.children(parent_key).contains(&old_key) {
        return Err(EditError::NotAChild {
            parent: parent_id,
            child: old_id,
        });
    }
    if old_key == new_key {
        return Ok(());
    }
    if store.is_ancestor_or_self(new_key, parent_key) {
        return Err(EditError::WouldCycle {
            parent: parent_id,
            child: new_id,
        });
    }

    store.detach(new_key);
    // Detaching `new` may have shifted `old` if both shared this parent.
    let pos = store
        .children(parent_key)
        .iter()
        .position(|&k| k == old_key)
        .ok_or(EditError::StaleHandle)?;
    store.replace_at(parent_key, pos, new_key);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/editor.rs"]
mod tests;
