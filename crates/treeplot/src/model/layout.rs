use std::fmt::Debug;

use tracing::debug;

use super::{
    node::{NodeId, NodeMap},
    render::NodeRenderer,
};
use crate::error::Error;

/// Parameters of the diagram layout.
///
/// Read afresh on every pass, so changes take effect on the next relayout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal footprint of one node, including any padding around it.
    pub node_width: f64,
    /// Vertical distance between a node and its children.
    pub node_height: f64,
    /// Gap between two sibling subtrees.
    pub inter_tree_space: f64,
    /// Center a parent with two children over their final positions.
    pub center_parent: bool,
    /// Emit `debug!` events bracketing the width pass.
    pub trace_widths: bool,
    /// Emit a `debug!` event for every node placed by the position pass.
    pub trace_positions: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let node_width = 32.0 + 2.0 * 3.0 + 2.0 * 3.0;
        LayoutConfig {
            node_width,
            node_height: 16.0 + 2.0 * 3.0 + 2.0 * 3.0,
            inter_tree_space: node_width / 2.0,
            center_parent: false,
            trace_widths: false,
            trace_positions: false,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("inter_tree_space", self.inter_tree_space),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

impl NodeId {
    /// Bottom-up width pass over the subtree rooted here.
    ///
    /// Without `force`, a child whose cached width is still valid is not
    /// descended into. Runs on an explicit stack, so list-shaped trees of any
    /// depth are fine.
    pub(super) fn recompute_subtree_width<K: Debug, H>(
        self,
        map: &mut NodeMap<K, H>,
        config: &LayoutConfig,
        force: bool,
    ) -> f64 {
        // `true` once the node's children have been scheduled.
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            if !expanded {
                if config.trace_widths {
                    debug!(key = ?map[node].key, force, "recompute_subtree_width >>");
                }
                stack.push((node, true));
                // Right first, so the left subtree is finished first.
                for child in [map[node].right(), map[node].left()].into_iter().flatten() {
                    if force || map[child].subtree_width.is_none() {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let mut width = 0.0;
            let mut subtrees = 0;
            for child in node.children(map) {
                subtrees += 1;
                // Every child is either reused or was finished before its parent.
                width += map[child].subtree_width.unwrap_or_default();
            }
            let width = match subtrees {
                0 => config.node_width,
                // A lone child packs tighter than a pair.
                1 => width + (config.inter_tree_space + config.node_width) / 2.0,
                _ => width + config.inter_tree_space,
            };
            map[node].subtree_width = Some(width);

            if config.trace_widths {
                debug!(key = ?map[node].key, force, width, "recompute_subtree_width <<");
            }
        }
        map[self].subtree_width.unwrap_or_default()
    }

    /// Top-down position pass over the subtree rooted here.
    ///
    /// Expects widths from a preceding width pass; stale ones are brought up
    /// to date first. With `center_parent`, nodes with two children are
    /// placed a second time, after all of their descendants.
    pub(super) fn recompute_positions<K: Debug, R: NodeRenderer<K>>(
        self,
        map: &mut NodeMap<K, R::Handle>,
        renderer: &mut R,
        config: &LayoutConfig,
        parent_x: f64,
        parent_y: f64,
    ) {
        // A stale width anywhere below marks this node stale as well.
        if map[self].subtree_width.is_none() {
            self.recompute_subtree_width(map, config, false);
        }

        let mut to_center = Vec::new();
        let mut stack = vec![(self, parent_x, parent_y)];
        while let Some((node, parent_x, parent_y)) = stack.pop() {
            let (left, right) = (map[node].left(), map[node].right());
            let left_width = match left {
                Some(left) => map[left].subtree_width.unwrap_or_default(),
                None => 0.0,
            };

            let x = match left {
                Some(_) => parent_x + left_width + (config.inter_tree_space - config.node_width) / 2.0,
                None => parent_x,
            };
            node.place(map, renderer, x, parent_y);
            if config.trace_positions {
                debug!(key = ?map[node].key, parent_x, parent_y, x, y = parent_y, "recompute_positions");
            }

            let child_y = parent_y + config.node_height;
            if let Some(right) = right {
                stack.push((right, parent_x + left_width + config.inter_tree_space, child_y));
            }
            if let Some(left) = left {
                stack.push((left, parent_x, child_y));
            }
            if config.center_parent && left.is_some() && right.is_some() {
                to_center.push(node);
            }
        }

        // Reverse pre-order visits every node after all of its descendants.
        for node in to_center.into_iter().rev() {
            let (Some(left), Some(right)) = (map[node].left(), map[node].right()) else {
                continue;
            };
            let x = (map[left].x + map[right].x) / 2.0;
            let y = map[node].y;
            node.place(map, renderer, x, y);
            if config.trace_positions {
                debug!(key = ?map[node].key, x, y, "recompute_positions centered");
            }
        }
    }

    fn place<K, R: NodeRenderer<K>>(
        self,
        map: &mut NodeMap<K, R::Handle>,
        renderer: &mut R,
        x: f64,
        y: f64,
    ) {
        let node = &mut map[self];
        node.x = x;
        node.y = y;
        renderer.set_position(&mut node.handle, x, y);
    }
}
