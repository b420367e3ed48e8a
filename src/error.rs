use thiserror::Error;

use crate::model::NodeId;

/// Rejections reported by [`TreeStore::try_from_seed`](crate::TreeStore::try_from_seed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("duplicate node id in seed: {0}")]
    DuplicateId(NodeId),

    #[error("seed node has an empty id")]
    EmptyId,

    #[error("seed node {0} is nested too deep")]
    TooDeep(NodeId),
}

/// Structural violations found by [`TreeStore::check_invariants`](crate::TreeStore::check_invariants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("root node {0} is missing or has a parent")]
    MissingRoot(NodeId),

    #[error("node {0} has no parent but is not the root")]
    MultipleRoots(NodeId),

    #[error("node {parent} lists unknown child {child}")]
    DanglingChild { parent: NodeId, child: NodeId },

    #[error("node {parent} lists child {child} more than once")]
    DuplicateChild { parent: NodeId, child: NodeId },

    #[error("node {child} and parent {parent} disagree about their link")]
    ParentMismatch { parent: NodeId, child: NodeId },

    #[error("node {id} has depth {found}, expected {expected}")]
    DepthMismatch {
        id: NodeId,
        expected: u32,
        found: u32,
    },

    #[error("node {0} sits below a parent at maximum depth")]
    DepthOverflow(NodeId),

    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),
}
