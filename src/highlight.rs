use rustc_hash::FxHashSet;

use crate::action::SelectionMove;
use crate::model::NodeId;
use crate::store::TreeStore;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Emphasis level of a node or edge. Ordered so that `Selected` wins over `Hovered`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightTier {
    #[default]
    Default,
    Hovered,
    Selected,
}

impl HighlightTier {
    /// Tier of the edge `source -> target`: selected if either end is selected,
    /// otherwise hovered if either end is hovered.
    pub fn for_edge(highlight: &HighlightState, source: &str, target: &str) -> Self {
        Self::for_node(highlight, source).max(Self::for_node(highlight, target))
    }

    /// Tier of a single node.
    pub fn for_node(highlight: &HighlightState, id: &str) -> Self {
        if highlight.is_selected(id) {
            Self::Selected
        } else if highlight.is_hovered(id) {
            Self::Hovered
        } else {
            Self::Default
        }
    }

    /// Returns `true` for the hovered and selected tiers.
    #[inline]
    pub const fn is_emphasized(self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Hover, selection and search-match state owned by the controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub hovered: Option<NodeId>,
    pub selected: Option<NodeId>,
    pub search_matches: FxHashSet<NodeId>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hovered(mut self, id: impl Into<NodeId>) -> Self {
        self.hovered = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_selected(mut self, id: impl Into<NodeId>) -> Self {
        self.selected = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_search_matches<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.search_matches = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered = id;
    }

    /// Selects the node, or clears the selection if it was already selected.
    pub fn toggle_selected(&mut self, id: &NodeId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.clone());
        }
    }

    pub fn set_search_matches(&mut self, ids: &[NodeId]) {
        self.search_matches.clear();
        self.search_matches.extend(ids.iter().cloned());
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_search_match(&self, id: &str) -> bool {
        self.search_matches.contains(id)
    }

    /// Steps the selection through the tree. Starts at the root when nothing is selected.
    ///
    /// Children of collapsed nodes are never entered. Returns `true` if the selection moved.
    pub fn move_selection(&mut self, store: &TreeStore, step: SelectionMove) -> bool {
        let Some(current) = self.selected.as_ref().and_then(|id| store.get(id)) else {
            self.selected = Some(store.root_id().clone());
            return true;
        };

        let next = match step {
            SelectionMove::Parent => current.parent_id.clone(),
            SelectionMove::FirstChild => current
                .is_expanded
                .then(|| current.children_ids.first().cloned())
                .flatten(),
            SelectionMove::NextSibling | SelectionMove::PrevSibling => current
                .parent_id
                .as_ref()
                .and_then(|parent| store.get(parent))
                .and_then(|parent| {
                    let siblings = &parent.children_ids;
                    let idx = siblings.iter().position(|id| *id == current.id)?;
                    let target = if step == SelectionMove::NextSibling {
                        idx.checked_add(1)?
                    } else {
                        idx.checked_sub(1)?
                    };
                    siblings.get(target).cloned()
                }),
        };

        match next {
            Some(id) => {
                self.selected = Some(id);
                true
            }
            None => false,
        }
    }

    /// Drops references to nodes that no longer exist in the store.
    pub fn prune_removed(&mut self, store: &TreeStore) {
        if self.hovered.as_ref().is_some_and(|id| !store.contains(id)) {
            self.hovered = None;
        }
        if self.selected.as_ref().is_some_and(|id| !store.contains(id)) {
            self.selected = None;
        }
        self.search_matches.retain(|id| store.contains(id));
    }

    /// Clears hover, selection and matches.
    pub fn clear(&mut self) {
        self.hovered = None;
        self.selected = None;
        self.search_matches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_beats_hovered() {
        let highlight = HighlightState::new().with_hovered("a").with_selected("b");

        assert_eq!(
            HighlightTier::for_edge(&highlight, "a", "b"),
            HighlightTier::Selected
        );
        assert_eq!(
            HighlightTier::for_edge(&highlight, "a", "c"),
            HighlightTier::Hovered
        );
        assert_eq!(
            HighlightTier::for_edge(&highlight, "c", "d"),
            HighlightTier::Default
        );
    }

    #[test]
    fn same_node_hovered_and_selected_is_selected() {
        let highlight = HighlightState::new().with_hovered("a").with_selected("a");

        assert_eq!(HighlightTier::for_node(&highlight, "a"), HighlightTier::Selected);
    }

    #[test]
    fn toggle_selected_clears_on_second_click() {
        let mut highlight = HighlightState::new();
        let id = NodeId::from("b1");

        highlight.toggle_selected(&id);
        assert!(highlight.is_selected("b1"));
        highlight.toggle_selected(&id);
        assert_eq!(highlight.selected, None);
    }

    #[test]
    fn move_selection_walks_tree() {
        let mut store = TreeStore::canonical();
        let mut highlight = HighlightState::new();

        assert!(highlight.move_selection(&store, SelectionMove::NextSibling));
        assert!(highlight.is_selected("root"));
        assert!(highlight.move_selection(&store, SelectionMove::FirstChild));
        assert!(highlight.is_selected("ha"));
        assert!(highlight.move_selection(&store, SelectionMove::NextSibling));
        assert!(highlight.is_selected("b"));
        assert!(!highlight.move_selection(&store, SelectionMove::NextSibling));
        assert!(highlight.move_selection(&store, SelectionMove::PrevSibling));
        assert!(highlight.is_selected("ha"));

        store.toggle_expand("ha");
        assert!(!highlight.move_selection(&store, SelectionMove::FirstChild));
        assert!(highlight.move_selection(&store, SelectionMove::Parent));
        assert!(highlight.is_selected("root"));
        assert!(!highlight.move_selection(&store, SelectionMove::Parent));
    }

    #[test]
    fn prune_drops_deleted_nodes() {
        let mut store = TreeStore::canonical();
        let mut highlight = HighlightState::new()
            .with_hovered("a1")
            .with_selected("b")
            .with_search_matches(["a1", "a2", "b1"]);
        store.delete_node("ha");

        highlight.prune_removed(&store);

        assert_eq!(highlight.hovered, None);
        assert!(highlight.is_selected("b"));
        assert!(highlight.is_search_match("b1"));
        assert!(!highlight.is_search_match("a2"));
    }
}
