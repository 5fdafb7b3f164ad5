use thiserror::Error;

use crate::model::NodeId;

/// Every way a tree operation can be refused. None of them leave the tree
/// modified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("key is already present in the tree")]
    DuplicateKey,

    #[error("key is not present in the tree")]
    KeyNotFound,

    #[error("node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),

    #[error("layout parameter `{field}` must be finite and non-negative, got {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown traversal order `{0}` (expected pre, in, or post)")]
pub struct ParseOrderError(pub String);
