use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Read-only tree contract used by traversal helpers.
///
/// A proper tree is expected (not a DAG):
/// - no cycles (DFS traversal is used directly);
/// - each node has exactly one parent;
/// - identifiers are stable between snapshots.
pub trait TreeModel {
    /// Node identifier type.
    type Id: Clone + Eq + Hash;

    /// Returns the root node (or `None` if the tree is empty).
    fn root(&self) -> Option<&Self::Id>;
    /// Returns the node's children in display order (empty for unknown ids).
    fn children(&self, id: &Self::Id) -> &[Self::Id];
    /// Returns the node's parent, `None` for the root and unknown ids.
    fn parent(&self, id: &Self::Id) -> Option<&Self::Id>;
    /// Returns `true` if the node exists in the model.
    fn contains(&self, id: &Self::Id) -> bool;
    /// Returns whether the node's children are shown.
    fn is_expanded(&self, id: &Self::Id) -> bool;
    /// Returns an approximate size hint (not required to be exact).
    fn size_hint(&self) -> usize {
        0
    }
}

/// Opaque node identifier.
///
/// Backed by a shared string so snapshots can clone ids freely.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl Deref for NodeId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A single node record owned by a [`TreeStore`](crate::TreeStore).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// Immutable identifier.
    pub id: NodeId,
    /// Display text.
    pub label: String,
    /// Children in display order.
    pub children_ids: Vec<NodeId>,
    /// Parent id, `None` only for the root.
    pub parent_id: Option<NodeId>,
    /// Whether the children are visible.
    pub is_expanded: bool,
    /// Distance from the root, fixed at creation.
    pub depth: u32,
}

impl TreeNode {
    /// Returns `true` if the node has at least one child.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }

    /// Returns `true` if this node is the root (has no parent).
    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
