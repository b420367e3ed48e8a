use crate::model::NodeId;

/// Mutations a controller can issue against a [`TreeStore`](crate::TreeStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeCommand {
    /// Flip the expansion flag of a node.
    ToggleExpand(NodeId),
    /// Set the expansion flag of a node to a fixed value.
    SetExpanded(NodeId, bool),
    /// Append a fresh child under the node and expand it.
    AddChild(NodeId),
    /// Replace the node's label; blank labels are ignored.
    Rename(NodeId, String),
    /// Remove the node together with its subtree; the root is never removed.
    Delete(NodeId),
    /// Expand every node on the path from the root to the node.
    Reveal(NodeId),
    /// Restore the canonical tree.
    Reset,
}

impl TreeCommand {
    /// Returns the node the command targets, if any.
    pub const fn target(&self) -> Option<&NodeId> {
        match self {
            Self::ToggleExpand(id)
            | Self::SetExpanded(id, _)
            | Self::AddChild(id)
            | Self::Rename(id, _)
            | Self::Delete(id)
            | Self::Reveal(id) => Some(id),
            Self::Reset => None,
        }
    }
}

/// Result of applying a command.
///
/// Rejected commands report `Unchanged`; callers should not treat that as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    /// The snapshot changed.
    Changed,
    /// A child was created with the given id.
    Added(NodeId),
    /// Nothing to do (unknown id, root deletion, blank label, ...).
    Unchanged,
}

impl TreeEvent {
    /// Returns `true` unless the command was a no-op.
    #[inline]
    pub const fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub(crate) const fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// Direction of a keyboard selection step through the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMove {
    Parent,
    /// First child of an expanded node.
    FirstChild,
    NextSibling,
    PrevSibling,
}

/// Actions a user or application can initiate on the graph view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphAction<Custom = ()> {
    /// Move the selection.
    Select(SelectionMove),
    /// Toggle expansion of the selected node.
    ToggleExpand,
    /// Add a child under the selected node.
    AddChild,
    /// Request renaming the selected node; the caller collects the label.
    Rename,
    /// Delete the selected node and its subtree.
    Delete,
    /// Start typing a search query.
    Search,
    /// Jump to the next search match.
    NextMatch,
    /// Jump to the previous search match.
    PrevMatch,
    /// Pan the viewport by whole cells.
    Pan(i16, i16),
    /// Center the viewport on the selected node.
    CenterSelected,
    /// Restore the canonical tree.
    Reset,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

impl<C> GraphAction<C> {
    /// Store command for actions that only need a target node.
    ///
    /// `Rename` needs a label and is left to the caller.
    pub fn command(&self, target: &NodeId) -> Option<TreeCommand> {
        match self {
            Self::ToggleExpand => Some(TreeCommand::ToggleExpand(target.clone())),
            Self::AddChild => Some(TreeCommand::AddChild(target.clone())),
            Self::Delete => Some(TreeCommand::Delete(target.clone())),
            Self::Reset => Some(TreeCommand::Reset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_maps_target_actions() {
        let id = NodeId::from("b");

        assert_eq!(
            GraphAction::<()>::AddChild.command(&id),
            Some(TreeCommand::AddChild(id.clone()))
        );
        assert_eq!(GraphAction::<()>::Reset.command(&id), Some(TreeCommand::Reset));
        assert_eq!(GraphAction::<()>::Rename.command(&id), None);
        assert_eq!(GraphAction::<()>::Pan(1, 0).command(&id), None);
    }

    #[test]
    fn target_of_reset_is_none() {
        assert_eq!(TreeCommand::Reset.target(), None);
        assert_eq!(
            TreeCommand::Delete(NodeId::from("a1")).target().map(NodeId::as_str),
            Some("a1")
        );
    }
}
