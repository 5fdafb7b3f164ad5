//! An unbalanced binary search tree whose nodes carry a diagram layout.
//!
//! Mutations go through [`SearchTree`]; positions become trustworthy only
//! after an explicit [`SearchTree::relayout`].

pub mod error;
pub mod model;

pub use error::{Error, ParseOrderError};
pub use model::{
    Canvas, Diagram, LayoutConfig, Node, NodeId, NodeMap, NodeRenderer, NoopRenderer, Order,
    Search, SearchTree, Side, Sprite, SpriteId, Traverse,
};
