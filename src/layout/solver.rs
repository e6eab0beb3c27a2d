use crate::foundation::core::{NodeId, Rect};
use crate::scene::node::{Node, NodeKind};
use crate::scene::store::{NodeKey, SceneStore};

/// Children deeper than this are not laid out.
pub const MAX_LAYOUT_DEPTH: usize = 1024;

/// Height given to a Column child with no explicit height.
pub const COLUMN_CHILD_HEIGHT: i32 = 32;

/// Width given to a Row child with no explicit width.
pub const ROW_CHILD_WIDTH: i32 = 96;

/// Absolute geometry assigned to one reachable node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LayoutEntry {
    /// Node identity.
    pub id: NodeId,
    /// Node type at layout time.
    pub kind: NodeKind,
    /// Assigned box in surface coordinates.
    pub rect: Rect,
    /// Painted as a filled leaf rather than an outlined container.
    pub leaf: bool,
    /// Distance from the root (root = 0).
    pub depth: u16,
}

/// Result of one layout pass, in pre-order (parents before children).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayoutTree {
    entries: Vec<LayoutEntry>,
    depth_limited: bool,
}

impl LayoutTree {
    /// All entries in pre-order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Number of laid-out nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing was laid out (no root).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The root entry, if any.
    pub fn root(&self) -> Option<&LayoutEntry> {
        self.entries.first()
    }

    /// Entry for `id`, if the node was reached this pass.
    pub fn get(&self, id: NodeId) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Box assigned to `id`, if the node was reached this pass.
    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|e| e.rect)
    }

    /// Return `true` when some subtree was cut at [`MAX_LAYOUT_DEPTH`].
    pub fn depth_limited(&self) -> bool {
        self.depth_limited
    }
}

/// Lay out the tree under the store's root, assigning it `bounds`.
///
/// Returns an empty tree when the store has no parentless node. Nodes not reachable from the
/// root get no entry.
pub fn solve(store: &SceneStore, bounds: Rect) -> LayoutTree {
    let mut solver = Solver {
        store,
        out: LayoutTree::default(),
    };
    if let Some(root) = store.root() {
        solver.place(root, bounds, 0);
    }
    if solver.out.depth_limited {
        tracing::warn!(
            max_depth = MAX_LAYOUT_DEPTH,
            "layout stopped descending at the depth limit"
        );
    }
    solver.out
}

struct Solver<'a> {
    store: &'a SceneStore,
    out: LayoutTree,
}

/// Inner box after padding. Sizes never go negative.
fn content_box(node: &Node, rect: Rect) -> Rect {
    let p = node.props().padding;
    let (l, t, r, b) = (
        i32::from(p.left),
        i32::from(p.top),
        i32::from(p.right),
        i32::from(p.bottom),
    );
    Rect {
        x: rect.x.saturating_add(l),
        y: rect.y.saturating_add(t),
        w: rect.w.saturating_sub(l).saturating_sub(r).max(0),
        h: rect.h.saturating_sub(t).saturating_sub(b).max(0),
    }
}

fn live_children<'a>(
    store: &'a SceneStore,
    node: &'a Node,
) -> impl Iterator<Item = (NodeKey, &'a Node)> + 'a {
    node.children
        .iter()
        .filter_map(move |&k| store.get(k).map(|n| (k, n)))
}

fn first_child<'a>(store: &'a SceneStore, node: &'a Node) -> Option<(NodeKey, &'a Node)> {
    let &key = node.children.first()?;
    store.get(key).map(|n| (key, n))
}

impl<'a> Solver<'a> {
    fn place(&mut self, key: NodeKey, rect: Rect, depth: usize) {
        let store = self.store;
        let Some(node) = store.get(key) else {
            return;
        };
        if depth > MAX_LAYOUT_DEPTH {
            self.out.depth_limited = true;
            return;
        }
        self.out.entries.push(LayoutEntry {
            id: node.id(),
            kind: node.kind(),
            rect,
            leaf: node.is_leaf(),
            depth: u16::try_from(depth).unwrap_or(u16::MAX),
        });

        match node.kind() {
            NodeKind::Column => self.column(node, rect, depth),
            NodeKind::Row => self.row(node, rect, depth),
            NodeKind::Center => self.center(node, rect, depth),
            NodeKind::SizedBox => self.sized_box(node, rect, depth),
            NodeKind::Text | NodeKind::Button => {}
        }
    }

    fn column(&mut self, node: &'a Node, rect: Rect, depth: usize) {
        let content = content_box(node, rect);
        let gap = node.props().gap.max(0);
        let cross = node.props().cross_align;
        let mut cursor = content.y;
        for (key, child) in live_children(self.store, node) {
            let h = child.props().height_hint().unwrap_or(COLUMN_CHILD_HEIGHT);
            let w = child.props().width_hint().unwrap_or(content.w);
            let x = content.x.saturating_add(cross.offset(content.w, w));
            self.place(key, Rect::new(x, cursor, w, h), depth + 1);
            cursor = cursor.saturating_add(h).saturating_add(gap);
        }
    }

    fn row(&mut self, node: &'a Node, rect: Rect, depth: usize) {
        let content = content_box(node, rect);
        let gap = node.props().gap.max(0);
        let cross = node.props().cross_align;
        let mut cursor = content.x;
        for (key, child) in live_children(self.store, node) {
            let w = child.props().width_hint().unwrap_or(ROW_CHILD_WIDTH);
            let h = child.props().height_hint().unwrap_or(content.h);
            let y = content.y.saturating_add(cross.offset(content.h, h));
            self.place(key, Rect::new(cursor, y, w, h), depth + 1);
            cursor = cursor.saturating_add(w).saturating_add(gap);
        }
    }

    fn center(&mut self, node: &'a Node, rect: Rect, depth: usize) {
        let Some((key, child)) = first_child(self.store, node) else {
            return;
        };
        let content = content_box(node, rect);
        let w = child.props().width_hint().unwrap_or(content.w / 2);
        let h = child.props().height_hint().unwrap_or(content.h / 2);
        let x = content.x.saturating_add(content.w.saturating_sub(w) / 2);
        let y = content.y.saturating_add(content.h.saturating_sub(h) / 2);
        self.place(key, Rect::new(x, y, w, h), depth + 1);
    }

    // Ignores padding: the child starts at the node's own origin.
    fn sized_box(&mut self, node: &'a Node, rect: Rect, depth: usize) {
        let Some((key, child)) = first_child(self.store, node) else {
            return;
        };
        let w = child.props().width_hint().unwrap_or(rect.w);
        let h = child.props().height_hint().unwrap_or(rect.h);
        self.place(key, Rect::new(rect.x, rect.y, w, h), depth + 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
