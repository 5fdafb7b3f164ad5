use std::fmt::{self, Display, Write as _};

use super::{
    node::{NodeId, NodeMap, Side},
    traverse::{Order, Traverse},
};

/// Text drawing of a tree, one line per node.
///
/// Each line shows the node's slot under its parent, its key, and once a
/// width pass has reached it, the last computed position and width.
///
/// Trees taller than [`Diagram::MAX_DRAWN_HEIGHT`] are listed flat in
/// pre-order with each node's depth instead of being drawn with indentation.
pub struct Diagram<'a, K, H> {
    map: &'a NodeMap<K, H>,
    root: Option<NodeId>,
}

impl<'a, K: Display, H> Diagram<'a, K, H> {
    pub const MAX_DRAWN_HEIGHT: usize = 256;

    pub(super) fn new(map: &'a NodeMap<K, H>, root: Option<NodeId>) -> Self {
        Diagram { map, root }
    }

    fn describe(&self, node: NodeId) -> String {
        let n = &self.map[node];
        let mut desc = match node.slot(self.map) {
            Some((_, Side::Left)) => format!("L {}", n.key()),
            Some((_, Side::Right)) => format!("R {}", n.key()),
            None => n.key().to_string(),
        };
        if let Some(width) = n.subtree_width() {
            let (x, y) = n.position();
            // Writing into a String cannot fail.
            let _ = write!(desc, " @ ({x}, {y}) w={width}");
        }
        desc
    }

    /// Nodes paired with their depth, in pre-order.
    fn with_depth(&self, root: NodeId) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        let mut stack = vec![(root, 0)];
        std::iter::from_fn(move || {
            let (node, depth) = stack.pop()?;
            let children = [node.right(self.map), node.left(self.map)];
            stack.extend(children.into_iter().flatten().map(|c| (c, depth + 1)));
            Some((node, depth))
        })
    }

    /// Builds the drawing bottom-up, children before their parent.
    fn ascii_tree(&self, root: NodeId) -> ascii_tree::Tree {
        let mut built = Vec::new();
        for node in Traverse::new(self.map, Some(root), Order::PostOrder) {
            // The right subtree was finished last, so it sits on top.
            let right = node.right(self.map).and_then(|_| built.pop());
            let left = node.left(self.map).and_then(|_| built.pop());
            let children: Vec<_> = left.into_iter().chain(right).collect();
            let desc = self.describe(node);
            built.push(if children.is_empty() {
                ascii_tree::Tree::Leaf(vec![desc])
            } else {
                ascii_tree::Tree::Node(desc, children)
            });
        }
        built.pop().unwrap_or_else(|| ascii_tree::Tree::Leaf(Vec::new()))
    }
}

impl<K: Display, H> Display for Diagram<'_, K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return writeln!(f, "(empty)");
        };
        let height = self.with_depth(root).map(|(_, depth)| depth).max().unwrap_or_default();
        if height <= Self::MAX_DRAWN_HEIGHT {
            return ascii_tree::write_tree(f, &self.ascii_tree(root));
        }
        for (node, depth) in self.with_depth(root) {
            writeln!(f, "{depth:>6} {}", self.describe(node))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchTree;

    #[test]
    fn empty() {
        let tree = SearchTree::<i32>::new();
        assert_eq!(tree.diagram().to_string(), "(empty)\n");
    }

    #[test]
    fn lists_every_node_with_its_slot() {
        let mut tree = SearchTree::new();
        for key in [10, 5, 15, 12] {
            tree.insert(key).unwrap();
        }
        let text = tree.diagram().to_string();
        println!("{text}");
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().next().unwrap().ends_with("10"));
        assert!(text.contains("L 5"));
        assert!(text.contains("R 15"));
        assert!(text.contains("L 12"));
        assert!(!text.contains('@'), "no layout has run yet");
    }

    #[test]
    fn tall_trees_are_listed_flat() {
        let height = Diagram::<i32, ()>::MAX_DRAWN_HEIGHT;
        let mut tree = SearchTree::new();
        for key in (0..=height as i32).rev() {
            tree.insert(key).unwrap();
        }
        // Exactly at the limit the tree is still drawn.
        assert!(tree.diagram().to_string().contains(" └─ L 0"));

        tree.insert(-1).unwrap();
        let text = tree.diagram().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), height + 2);
        assert_eq!(lines[0], format!("     0 {height}"));
        assert_eq!(lines[1], format!("     1 L {}", height - 1));
        assert_eq!(*lines.last().unwrap(), format!("{:>6} L -1", height + 1));
    }

    #[test]
    fn shows_layout_after_relayout() {
        let mut tree = SearchTree::new();
        for key in [10, 5] {
            tree.insert(key).unwrap();
        }
        tree.relayout();
        let text = tree.diagram().to_string();
        assert!(text.contains("10 @ (33, 0) w=77"), "{text}");
        assert!(text.contains("L 5 @ (0, 28) w=44"), "{text}");
    }
}
