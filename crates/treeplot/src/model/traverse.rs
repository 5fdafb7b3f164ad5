use std::{fmt, str::FromStr};

use super::node::{NodeId, NodeMap};
use crate::error::ParseOrderError;

/// Depth-first visiting order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, node, right subtree. Yields keys in ascending order.
    #[default]
    InOrder,
    /// Left subtree, right subtree, then node.
    PostOrder,
}

impl FromStr for Order {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" | "preorder" | "prefix" => Ok(Order::PreOrder),
            "in" | "inorder" | "infix" => Ok(Order::InOrder),
            "post" | "postorder" | "postfix" => Ok(Order::PostOrder),
            _ => Err(ParseOrderError(s.to_owned())),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::PreOrder => "pre-order",
            Order::InOrder => "in-order",
            Order::PostOrder => "post-order",
        })
    }
}

/// Iterator over the nodes of a tree in a given [`Order`].
///
/// Uses an explicit stack, so degenerate (list-shaped) trees do not recurse.
pub struct Traverse<'a, K, H> {
    map: &'a NodeMap<K, H>,
    order: Order,
    /// Pending nodes; `true` once a node's children have been scheduled.
    stack: Vec<(NodeId, bool)>,
}

impl<'a, K, H> Traverse<'a, K, H> {
    pub(super) fn new(map: &'a NodeMap<K, H>, root: Option<NodeId>, order: Order) -> Self {
        Traverse {
            map,
            order,
            stack: root.map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a, K, H> Iterator for Traverse<'a, K, H> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node);
            }
            // Pushed in reverse of the order they should come out.
            let left = node.left(self.map).map(|n| (n, false));
            let right = node.right(self.map).map(|n| (n, false));
            let this = Some((node, true));
            let pending = match self.order {
                Order::PreOrder => [right, left, this],
                Order::InOrder => [right, this, left],
                Order::PostOrder => [this, right, left],
            };
            self.stack.extend(pending.into_iter().flatten());
        }
        None
    }
}
