use std::fmt::Display;

use slotmap::SlotMap;

/// Capability through which the tree drives a rendering surface.
///
/// The tree never reads anything back from the surface; every call is a
/// side effect.
pub trait NodeRenderer<K> {
    /// The surface's representation of one node.
    type Handle;

    /// Called once when a node is constructed.
    fn create(&mut self, key: &K) -> Self::Handle;

    /// Called when a node takes over a different key.
    fn set_label(&mut self, handle: &mut Self::Handle, key: &K);

    /// Called whenever the position pass places a node.
    fn set_position(&mut self, handle: &mut Self::Handle, x: f64, y: f64);

    /// Called once when a node is removed from the tree.
    fn destroy(&mut self, handle: Self::Handle);
}

/// Renderer for headless trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl<K> NodeRenderer<K> for NoopRenderer {
    type Handle = ();

    fn create(&mut self, _key: &K) {}
    fn set_label(&mut self, _handle: &mut (), _key: &K) {}
    fn set_position(&mut self, _handle: &mut (), _x: f64, _y: f64) {}
    fn destroy(&mut self, _handle: ()) {}
}

slotmap::new_key_type! {
    /// Handle of a sprite on a [`Canvas`].
    pub struct SpriteId;
}

/// What a [`Canvas`] knows about one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// An in-memory surface holding one labelled, positioned sprite per node.
#[derive(Debug, Default)]
pub struct Canvas {
    sprites: SlotMap<SpriteId, Sprite>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id)
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> + '_ {
        self.sprites.iter()
    }
}

impl<K: Display> NodeRenderer<K> for Canvas {
    type Handle = SpriteId;

    fn create(&mut self, key: &K) -> SpriteId {
        self.sprites.insert(Sprite {
            label: key.to_string(),
            x: 0.0,
            y: 0.0,
        })
    }

    fn set_label(&mut self, handle: &mut SpriteId, key: &K) {
        if let Some(sprite) = self.sprites.get_mut(*handle) {
            sprite.label = key.to_string();
        }
    }

    fn set_position(&mut self, handle: &mut SpriteId, x: f64, y: f64) {
        if let Some(sprite) = self.sprites.get_mut(*handle) {
            sprite.x = x;
            sprite.y = y;
        }
    }

    fn destroy(&mut self, handle: SpriteId) {
        self.sprites.remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{LayoutConfig, SearchTree};

    fn sprite_for(tree: &SearchTree<i32, Canvas>, key: i32) -> Sprite {
        let node = tree.search(&key).node.unwrap();
        let handle = *tree.map()[node].handle();
        tree.renderer().sprite(handle).unwrap().clone()
    }

    #[test]
    fn canvas_mirrors_the_tree() {
        let mut tree = SearchTree::with_renderer(LayoutConfig::default(), Canvas::new());
        for key in [10, 5, 15] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.renderer().len(), 3);
        tree.relayout();
        assert_eq!(
            sprite_for(&tree, 15),
            Sprite { label: "15".into(), x: 66.0, y: 28.0 }
        );
    }

    #[test]
    fn canvas_follows_relabel_and_destroy() {
        let mut tree = SearchTree::with_renderer(LayoutConfig::default(), Canvas::new());
        for key in [10, 5, 15, 12, 20] {
            tree.insert(key).unwrap();
        }
        let root = tree.root().unwrap();
        let root_sprite = *tree.map()[root].handle();

        assert_eq!(tree.remove(&10), Ok(10));
        assert_eq!(tree.renderer().len(), 4);
        assert_eq!(tree.renderer().sprite(root_sprite).unwrap().label, "12");
        let mut labels: Vec<_> = tree.renderer().sprites().map(|(_, s)| s.label.clone()).collect();
        labels.sort();
        assert_eq!(labels, ["12", "15", "20", "5"]);

        tree.clear();
        assert!(tree.renderer().is_empty());
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut canvas = Canvas::new();
        let mut id = NodeRenderer::<i32>::create(&mut canvas, &1);
        NodeRenderer::<i32>::destroy(&mut canvas, id);
        NodeRenderer::<i32>::set_position(&mut canvas, &mut id, 1.0, 2.0);
        NodeRenderer::<i32>::set_label(&mut canvas, &mut id, &2);
        assert!(canvas.is_empty());
    }
}
