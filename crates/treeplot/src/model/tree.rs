use std::{cmp::Ordering, fmt::Debug};

use tracing::{debug, debug_span, trace};

use super::{
    diagram::Diagram,
    layout::LayoutConfig,
    node::{Node, NodeId, NodeMap},
    render::{NodeRenderer, NoopRenderer},
    traverse::{Order, Traverse},
};
use crate::error::Error;

/// An unbalanced binary search tree laid out as a diagram.
///
/// All interactions with the data model happen through the public APIs on this
/// type. Keys are unique. Mutations leave the cached layout stale; call
/// [`SearchTree::relayout`] once after a batch of them.
pub struct SearchTree<K, R: NodeRenderer<K> = NoopRenderer> {
    pub(super) map: NodeMap<K, R::Handle>,
    pub(super) root: Option<NodeId>,
    config: LayoutConfig,
    renderer: R,
}

static_assertions::assert_impl_all!(SearchTree<i64>: Send, Sync);

/// Outcome of [`SearchTree::search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Search {
    /// The node holding the key, or the last node visited when it is absent.
    /// This is where the key would be attached on insert. `None` only for an
    /// empty tree.
    pub node: Option<NodeId>,
    pub found: bool,
}

impl<K: Ord + Debug> SearchTree<K, NoopRenderer> {
    pub fn new() -> Self {
        Self::with_renderer(LayoutConfig::default(), NoopRenderer)
    }
}

impl<K: Ord + Debug> Default for SearchTree<K, NoopRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Debug, R: NodeRenderer<K>> SearchTree<K, R> {
    pub fn with_renderer(config: LayoutConfig, renderer: R) -> Self {
        SearchTree {
            map: NodeMap::new(),
            root: None,
            config,
            renderer,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Direct access to the layout parameters, without validation.
    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), Error> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn map(&self) -> &NodeMap<K, R::Handle> {
        &self.map
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, node: NodeId) -> Option<&Node<K, R::Handle>> {
        self.map.get(node)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).found
    }

    /// Descends from the root towards `key`.
    pub fn search(&self, key: &K) -> Search {
        let Some(mut node) = self.root else {
            return Search { node: None, found: false };
        };
        loop {
            let n = &self.map[node];
            let next = match key.cmp(n.key()) {
                Ordering::Equal => return Search { node: Some(node), found: true },
                Ordering::Less => n.left(),
                Ordering::Greater => n.right(),
            };
            match next {
                Some(next) => node = next,
                None => return Search { node: Some(node), found: false },
            }
        }
    }

    /// Adds `key` as a new leaf. Duplicates are refused and leave the tree
    /// untouched.
    pub fn insert(&mut self, key: K) -> Result<NodeId, Error> {
        let search = self.search(&key);
        if search.found {
            debug!(?key, "refusing duplicate key");
            return Err(Error::DuplicateKey);
        }
        // The search stopped at a node whose slot on this side is empty.
        let attach_to = search.node.map(|parent| {
            let goes_left = key < self.map[parent].key;
            (parent, goes_left)
        });

        let handle = self.renderer.create(&key);
        trace!(?key, "inserting");
        let node = self.map.insert(Node::new(key, handle));
        match attach_to {
            Some((parent, true)) => parent.set_left(Some(node), &mut self.map),
            Some((parent, false)) => parent.set_right(Some(node), &mut self.map),
            None => self.root = Some(node),
        }
        Ok(node)
    }

    /// Removes `key` and returns it.
    pub fn remove(&mut self, key: &K) -> Result<K, Error> {
        match self.search(key) {
            Search { node: Some(node), found: true } => self.remove_node(node),
            _ => {
                debug!(?key, "key to remove not found");
                Err(Error::KeyNotFound)
            }
        }
    }

    /// Removes the key held by `node` and returns it.
    ///
    /// A node with two children is not physically removed. Its key is swapped
    /// with that of its in-order successor and its handle is relabelled; the
    /// successor node, which has no left child and now briefly holds the key
    /// being removed, is then unlinked and destroyed in its place.
    pub fn remove_node(&mut self, node: NodeId) -> Result<K, Error> {
        let Some(n) = self.map.get(node) else {
            return Err(Error::UnknownNode(node));
        };

        if let (Some(_), Some(right)) = (n.left(), n.right()) {
            let successor = right.leftmost(&self.map);
            trace!(key = ?n.key(), successor = ?successor.key(&self.map), "promoting successor");
            self.map.swap_keys(node, successor);
            let target = &mut self.map[node];
            self.renderer.set_label(&mut target.handle, &target.key);
            // The successor now holds the key being removed.
            return self.remove_node(successor);
        }

        let child = n.left().or(n.right());
        match node.slot(&self.map) {
            Some((parent, side)) => parent.set_child(side, child, &mut self.map),
            None => {
                if let Some(child) = child {
                    child.unlink_from_parent(&mut self.map);
                }
                self.root = child;
            }
        }

        let Some(removed) = self.map.remove(node) else {
            return Err(Error::UnknownNode(node));
        };
        trace!(key = ?removed.key, "removed");
        self.renderer.destroy(removed.handle);
        Ok(removed.key)
    }

    /// Recomputes every subtree width, then every position, from the root.
    ///
    /// This is the only operation that makes cached layout trustworthy.
    pub fn relayout(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let _span = debug_span!("relayout", nodes = self.map.len()).entered();
        let width = root.recompute_subtree_width(&mut self.map, &self.config, true);
        trace!(width, "widths computed");
        root.recompute_positions(&mut self.map, &mut self.renderer, &self.config, 0.0, 0.0);
        trace!("positions computed");
    }

    /// Destroys every node.
    pub fn clear(&mut self) {
        self.root = None;
        for node in self.map.drain() {
            self.renderer.destroy(node.handle);
        }
    }

    pub fn traverse(&self, order: Order) -> Traverse<'_, K, R::Handle> {
        Traverse::new(&self.map, self.root, order)
    }

    pub fn keys(&self, order: Order) -> Vec<&K> {
        self.traverse(order).map(|node| node.key(&self.map)).collect()
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.traverse(Order::InOrder).map(|node| node.key(&self.map))
    }

    pub fn diagram(&self) -> Diagram<'_, K, R::Handle>
    where
        K: std::fmt::Display,
    {
        Diagram::new(&self.map, self.root)
    }
}
