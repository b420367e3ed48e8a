use crate::model::NodeId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nested description of a tree used to build the initial snapshot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedNode {
    pub id: NodeId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<SeedNode>,
    /// Expansion flag; `None` means expanded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_expanded: Option<bool>,
}

impl SeedNode {
    /// Creates a seed entry without children and with the default expansion.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
            is_expanded: None,
        }
    }

    /// Appends a child entry.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Replaces the children with the given entries.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Sets an explicit expansion flag.
    #[must_use]
    pub const fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    /// The tree every store resets to: `Root -> {HA -> {A1, A2}, B -> {B1, B2}}`.
    pub fn canonical() -> Self {
        Self::new("root", "Root").expanded(true).children([
            Self::new("ha", "HA")
                .expanded(true)
                .children([Self::new("a1", "A1"), Self::new("a2", "A2")]),
            Self::new("b", "B")
                .expanded(true)
                .children([Self::new("b1", "B1"), Self::new("b2", "B2")]),
        ])
    }

    /// Total number of entries in this seed (including itself).
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
