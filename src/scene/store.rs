//! Identity-addressed node arena.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::foundation::core::NodeId;
use crate::scene::editor::EditError;
use crate::scene::node::{Node, NodeKind};

const INITIAL_SLOTS: usize = 64;

/// Handle to a live node slot.
///
/// Carries the slot's generation so a handle taken before a delete never resolves to whatever
/// node later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    idx: u32,
    generation: u32,
}

impl NodeKey {
    /// Raw slot index (diagnostics only).
    pub fn index(self) -> u32 {
        self.idx
    }

    /// Slot generation at the time the handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({}@gen{})", self.idx, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of node slots keyed by caller identity.
///
/// Deleted slots are tombstoned, their generation bumped, and recycled through a free list.
/// The set of parentless nodes is kept up to date by every structural edit so the layout root is
/// available without scanning.
#[derive(Debug)]
pub struct SceneStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: HashMap<NodeId, NodeKey>,
    roots: BTreeSet<NodeId>,
    max_id: Option<NodeId>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_SLOTS),
            free: Vec::new(),
            index: HashMap::with_capacity(INITIAL_SLOTS),
            roots: BTreeSet::new(),
            max_id: None,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return `true` when no node is live.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Allocated slot capacity. Grows geometrically and never shrinks.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Highest identity ever created in this store.
    pub fn max_observed_id(&self) -> Option<NodeId> {
        self.max_id
    }

    /// Resolve an identity to its current handle.
    pub fn key_of(&self, id: NodeId) -> Option<NodeKey> {
        self.index.get(&id).copied()
    }

    /// Return `true` when `id` is live.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Borrow a node by handle; stale handles resolve to `None`.
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        let slot = self.slots.get(key.idx as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        let slot = self.slots.get_mut(key.idx as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Borrow a node by identity.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.key_of(id).and_then(|k| self.get(k))
    }

    /// Identity of a node's parent.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        self.get(parent).map(Node::id)
    }

    /// Identities of a node's children, in order.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&k| self.get(k).map(Node::id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Child handles of a node, in order.
    pub(crate) fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.get(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The layout root: the parentless node with the lowest identity.
    pub fn root(&self) -> Option<NodeKey> {
        self.roots.first().and_then(|&id| self.key_of(id))
    }

    /// All parentless identities in ascending order.
    pub fn parentless(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.iter().copied()
    }

    /// Live identities in ascending order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Allocate a fresh parentless node. The caller guarantees `id` is not live.
    pub(crate) fn insert(&mut self, id: NodeId, kind: NodeKind) -> Result<NodeKey, EditError> {
        self.index
            .try_reserve(1)
            .map_err(|_| EditError::Allocation(id))?;

        let key = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(Node::new(id, kind));
            NodeKey {
                idx,
                generation: slot.generation,
            }
        } else {
            self.slots
                .try_reserve(1)
                .map_err(|_| EditError::Allocation(id))?;
            let idx = u32::try_from(self.slots.len()).map_err(|_| EditError::Allocation(id))?;
            self.slots.push(Slot {
                generation: 0,
                node: Some(Node::new(id, kind)),
            });
            NodeKey { idx, generation: 0 }
        };

        self.index.insert(id, key);
        self.roots.insert(id);
        if self.max_id.is_none_or(|m| id > m) {
            self.max_id = Some(id);
        }
        Ok(key)
    }

    /// Tombstone a node, returning it. Links are not touched; detach first.
    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<Node> {
        let slot = self.slots.get_mut(key.idx as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.idx);
        self.index.remove(&node.id);
        self.roots.remove(&node.id);
        Some(node)
    }

    /// Return `true` when `ancestor` is `node` or lies on `node`'s parent chain.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut cur = Some(node);
        // A well-formed chain is never longer than the number of slots.
        for _ in 0..=self.slots.len() {
            match cur {
                Some(k) if k == ancestor => return true,
                Some(k) => cur = self.get(k).and_then(|n| n.parent),
                None => return false,
            }
        }
        true
    }

    /// Unlink `child` from its parent, if any, keeping sibling order.
    pub(crate) fn detach(&mut self, child: NodeKey) {
        let Some(parent) = self.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent)
            && let Some(pos) = p.children.iter().position(|&k| k == child)
        {
            p.children.remove(pos);
        }
        self.orphan(child);
    }

    /// Clear a node's parent link without touching the former parent's list.
    pub(crate) fn orphan(&mut self, key: NodeKey) {
        if let Some(n) = self.get_mut(key) {
            n.parent = None;
            let id = n.id;
            self.roots.insert(id);
        }
    }

    /// Make room for one more child under `parent`.
    pub(crate) fn reserve_child(&mut self, parent: NodeKey) -> Result<(), EditError> {
        let p = self.get_mut(parent).ok_or(EditError::StaleHandle)?;
        let id = p.id;
        p.children
            .try_reserve(1)
            .map_err(|_| EditError::Allocation(id))
    }

    /// Push `child` at the end of `parent`'s list. `child` must be parentless.
    pub(crate) fn attach_last(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), EditError> {
        if self.get(child).is_none() {
            return Err(EditError::StaleHandle);
        }
        self.reserve_child(parent)?;
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        self.link_parent(parent, child);
        Ok(())
    }

    /// Put `new` into `parent`'s child slot `pos`, orphaning the previous occupant.
    /// `new` must be parentless.
    pub(crate) fn replace_at(&mut self, parent: NodeKey, pos: usize, new: NodeKey) {
        let old = match self.get_mut(parent).and_then(|p| p.children.get_mut(pos)) {
            Some(entry) => std::mem::replace(entry, new),
            None => return,
        };
        self.orphan(old);
        self.link_parent(parent, new);
    }

    fn link_parent(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
            let id = c.id;
            self.roots.remove(&id);
        }
    }

    /// Release every node from the lowest to the highest identity. Returns how many were freed.
    pub fn release_all(&mut self) -> usize {
        let ids = self.ids();
        let mut released = 0usize;
        for id in ids {
            if let Some(key) = self.key_of(id)
                && self.remove(key).is_some()
            {
                released += 1;
            }
        }
        released
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
