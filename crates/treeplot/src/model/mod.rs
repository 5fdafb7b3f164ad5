//! This module defines the [`SearchTree`][tree::SearchTree] data structure and
//! the layout passes that run over it.

mod diagram;
mod layout;
mod node;
mod render;
mod traverse;
mod tree;

pub use diagram::Diagram;
pub use layout::LayoutConfig;
pub use node::{Node, NodeId, NodeMap, Side};
pub use render::{Canvas, NodeRenderer, NoopRenderer, Sprite, SpriteId};
pub use traverse::{Order, Traverse};
pub use tree::{Search, SearchTree};
