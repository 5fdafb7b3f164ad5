use std::{
    iter, mem,
    ops::{Index, IndexMut},
};

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Represents a node somewhere in the tree.
    pub struct NodeId;
}

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One key of the tree together with its links and cached layout.
///
/// Links are only changed through the linkage methods on [`NodeId`], which
/// keep `parent` and the parent's child slot in agreement.
#[derive(Clone, Debug)]
pub struct Node<K, H> {
    pub(super) key: K,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Horizontal footprint of the subtree rooted here. `None` until a width
    /// pass reaches this node, and again after any relink below it.
    pub(super) subtree_width: Option<f64>,
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) handle: H,
}

impl<K, H> Node<K, H> {
    pub(super) fn new(key: K, handle: H) -> Self {
        Node {
            key,
            parent: None,
            left: None,
            right: None,
            subtree_width: None,
            x: 0.0,
            y: 0.0,
            handle,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn subtree_width(&self) -> Option<f64> {
        self.subtree_width
    }

    /// Last computed `(x, y)`. Stale until the next position pass.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// The rendering surface's handle for this node.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Arena that owns every node of a tree.
pub struct NodeMap<K, H> {
    map: SlotMap<NodeId, Node<K, H>>,
}

impl<K, H> NodeMap<K, H> {
    pub(super) fn new() -> Self {
        NodeMap { map: SlotMap::with_key() }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.map.contains_key(node)
    }

    pub fn get(&self, node: NodeId) -> Option<&Node<K, H>> {
        self.map.get(node)
    }

    pub(super) fn insert(&mut self, node: Node<K, H>) -> NodeId {
        self.map.insert(node)
    }

    pub(super) fn remove(&mut self, node: NodeId) -> Option<Node<K, H>> {
        self.map.remove(node)
    }

    pub(super) fn drain(&mut self) -> impl Iterator<Item = Node<K, H>> + '_ {
        self.map.drain().map(|(_, node)| node)
    }

    /// Exchanges the keys of two distinct nodes, leaving links untouched.
    pub(super) fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        if let Some([a, b]) = self.map.get_disjoint_mut([a, b]) {
            mem::swap(&mut a.key, &mut b.key);
        }
    }
}

impl<K, H> Index<NodeId> for NodeMap<K, H> {
    type Output = Node<K, H>;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.map[index]
    }
}

impl<K, H> IndexMut<NodeId> for NodeMap<K, H> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.map[index]
    }
}

impl NodeId {
    #[track_caller]
    pub fn key<K, H>(self, map: &NodeMap<K, H>) -> &K {
        &map[self].key
    }

    #[track_caller]
    pub fn parent<K, H>(self, map: &NodeMap<K, H>) -> Option<NodeId> {
        map[self].parent
    }

    #[track_caller]
    pub fn left<K, H>(self, map: &NodeMap<K, H>) -> Option<NodeId> {
        map[self].left
    }

    #[track_caller]
    pub fn right<K, H>(self, map: &NodeMap<K, H>) -> Option<NodeId> {
        map[self].right
    }

    /// Left child first, then right.
    #[track_caller]
    pub fn children<K, H>(self, map: &NodeMap<K, H>) -> impl Iterator<Item = NodeId> {
        let node = &map[self];
        node.left.into_iter().chain(node.right)
    }

    /// Returns an iterator over all ancestors of the current node, including itself.
    #[track_caller]
    pub fn ancestors<K, H>(self, map: &NodeMap<K, H>) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(self), move |&n| map[n].parent)
    }

    /// The parent of this node and the slot of the parent that holds it.
    #[track_caller]
    pub fn slot<K, H>(self, map: &NodeMap<K, H>) -> Option<(NodeId, Side)> {
        let parent = map[self].parent?;
        if map[parent].left == Some(self) {
            Some((parent, Side::Left))
        } else if map[parent].right == Some(self) {
            Some((parent, Side::Right))
        } else {
            None
        }
    }

    /// The leftmost node of the subtree rooted here.
    #[track_caller]
    pub fn leftmost<K, H>(self, map: &NodeMap<K, H>) -> NodeId {
        let mut node = self;
        while let Some(left) = map[node].left {
            node = left;
        }
        node
    }

    /// The in-order successor within this node's subtree: the leftmost node
    /// of the right subtree, or `None` without a right child.
    #[track_caller]
    pub fn find_successor<K, H>(self, map: &NodeMap<K, H>) -> Option<NodeId> {
        map[self].right.map(|right| right.leftmost(map))
    }
}

impl NodeId {
    pub(super) fn set_left<K, H>(self, child: Option<NodeId>, map: &mut NodeMap<K, H>) {
        self.set_child(Side::Left, child, map)
    }

    pub(super) fn set_right<K, H>(self, child: Option<NodeId>, map: &mut NodeMap<K, H>) {
        self.set_child(Side::Right, child, map)
    }

    /// Puts `child` into the given slot.
    ///
    /// A previous occupant of the slot is left parentless but otherwise
    /// untouched. A `child` that is attached elsewhere is detached from its old
    /// parent first.
    #[track_caller]
    pub(super) fn set_child<K, H>(self, side: Side, child: Option<NodeId>, map: &mut NodeMap<K, H>) {
        if let Some(child) = child {
            // Self and parent loops only; an ancestor walk per attach is O(depth).
            debug_assert!(
                child != self && map[self].parent != Some(child),
                "cannot attach a node beneath itself"
            );
        }
        if let Some(old) = map[self].slot_mut(side).take() {
            map[old].parent = None;
        }
        if let Some(child) = child {
            child.unlink_from_parent(map);
            map[child].parent = Some(self);
        }
        *map[self].slot_mut(side) = child;
        self.invalidate_width(map);
    }

    /// Clears whichever slot of the parent holds this node. No-op on a root.
    #[track_caller]
    pub(super) fn unlink_from_parent<K, H>(self, map: &mut NodeMap<K, H>) {
        let Some(parent) = map[self].parent.take() else {
            return;
        };
        let node = &mut map[parent];
        if node.left == Some(self) {
            node.left = None;
        } else if node.right == Some(self) {
            node.right = None;
        }
        parent.invalidate_width(map);
    }

    /// Marks the cached width of this node and every ancestor as stale.
    ///
    /// Stops at the first node that is already stale: width passes fill in
    /// whole subtrees, so the ancestors of a stale node are stale too.
    fn invalidate_width<K, H>(self, map: &mut NodeMap<K, H>) {
        let mut next = Some(self);
        while let Some(node) = next {
            if map[node].subtree_width.take().is_none() {
                break;
            }
            next = map[node].parent;
        }
    }
}
