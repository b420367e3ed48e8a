use rustc_hash::FxHashSet;

use crate::action::TreeCommand;
use crate::model::{NodeId, TreeModel};
use crate::store::TreeStore;

/// Returns ids whose label contains `query`, ignoring case, in insertion order.
///
/// A query that is blank after trimming matches nothing. Collapsed nodes are
/// searched too.
pub fn search(store: &TreeStore, query: &str) -> Vec<NodeId> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    store
        .nodes()
        .filter(|node| node.label.to_lowercase().contains(&needle))
        .map(|node| node.id.clone())
        .collect()
}

/// Returns the root-first chain of ids ending at `id`, or an empty list for unknown ids.
pub fn path_to_node<T: TreeModel>(model: &T, id: &T::Id) -> Vec<T::Id> {
    if !model.contains(id) {
        return Vec::new();
    }

    let mut path = vec![id.clone()];
    // Grows with the path, not with the tree.
    let mut seen = FxHashSet::default();
    seen.insert(id);
    let mut current = id;
    while let Some(parent) = model.parent(current) {
        // A malformed model could loop; stop at the first repeat.
        if !model.contains(parent) || !seen.insert(parent) {
            break;
        }
        path.push(parent.clone());
        current = parent;
    }
    path.reverse();
    path
}

/// Search results with a cursor for next/previous match navigation.
#[derive(Clone, Debug, Default)]
pub struct SearchMatches {
    query: String,
    matches: Vec<NodeId>,
    lookup: FxHashSet<NodeId>,
    current: usize,
}

impl SearchMatches {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `query` against the store and moves the cursor to the first match.
    pub fn with_query(store: &TreeStore, query: impl Into<String>) -> Self {
        let mut matches = Self::new();
        matches.set_query(store, query);
        matches
    }

    /// Replaces the query and resets the cursor.
    pub fn set_query(&mut self, store: &TreeStore, query: impl Into<String>) {
        self.query = query.into();
        self.current = 0;
        self.refresh(store);
    }

    /// Clears query, matches and cursor.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.lookup.clear();
        self.current = 0;
    }

    /// Recomputes matches for the current query after the store changed.
    ///
    /// The cursor keeps its index, clamped to the new match count.
    pub fn refresh(&mut self, store: &TreeStore) {
        self.matches = search(store, &self.query);
        self.lookup.clear();
        self.lookup.extend(self.matches.iter().cloned());
        self.current = self.current.min(self.matches.len().saturating_sub(1));
    }

    /// The active query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matches in search order.
    pub fn ids(&self) -> &[NodeId] {
        &self.matches
    }

    /// Set view of the matches for highlight lookups.
    pub const fn lookup(&self) -> &FxHashSet<NodeId> {
        &self.lookup
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns `true` if the node is one of the matches.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains(id)
    }

    /// The match under the cursor.
    pub fn current(&self) -> Option<&NodeId> {
        self.matches.get(self.current)
    }

    /// One-based cursor position and match count, e.g. `(3, 7)`.
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.matches.is_empty()).then(|| (self.current + 1, self.matches.len()))
    }

    /// Advances to the next match, wrapping to the first.
    pub fn select_next(&mut self) -> Option<&NodeId> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.current()
    }

    /// Steps back to the previous match, wrapping to the last.
    pub fn select_prev(&mut self) -> Option<&NodeId> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.matches.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    /// Command that expands the path to the current match.
    pub fn reveal_command(&self) -> Option<TreeCommand> {
        self.current().cloned().map(TreeCommand::Reveal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedNode;

    #[test]
    fn blank_query_matches_nothing() {
        let store = TreeStore::canonical();

        assert!(search(&store, "").is_empty());
        assert!(search(&store, "   ").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let store = TreeStore::canonical();

        assert_eq!(search(&store, "b1"), vec![NodeId::from("b1")]);
        assert_eq!(
            search(&store, "a"),
            vec![NodeId::from("ha"), NodeId::from("a1"), NodeId::from("a2")]
        );
        assert_eq!(search(&store, "a"), search(&store, "A"));
    }

    #[test]
    fn search_includes_collapsed_nodes() {
        let mut store = TreeStore::canonical();
        store.toggle_expand("b");

        assert_eq!(search(&store, "B2"), vec![NodeId::from("b2")]);
    }

    #[test]
    fn search_handles_unicode_case() {
        let seed = SeedNode::new("r", "Über").child(SeedNode::new("s", "straße"));
        let store = TreeStore::from_seed(&seed);

        assert_eq!(search(&store, "üb"), vec![NodeId::from("r")]);
        assert_eq!(search(&store, "STRASSE"), Vec::<NodeId>::new());
        assert_eq!(search(&store, "STRAẞE"), vec![NodeId::from("s")]);
    }

    #[test]
    fn path_is_root_first() {
        let store = TreeStore::canonical();

        assert_eq!(
            path_to_node(&store, &NodeId::from("b1")),
            vec![NodeId::from("root"), NodeId::from("b"), NodeId::from("b1")]
        );
        assert_eq!(
            path_to_node(&store, &NodeId::from("root")),
            vec![NodeId::from("root")]
        );
        assert!(path_to_node(&store, &NodeId::from("nope")).is_empty());
    }

    /// A malformed chain `x -> y -> z -> y` whose parent links loop.
    struct LoopedChain {
        ids: [NodeId; 3],
    }

    impl TreeModel for LoopedChain {
        type Id = NodeId;

        fn root(&self) -> Option<&NodeId> {
            None
        }

        fn children(&self, _id: &NodeId) -> &[NodeId] {
            &[]
        }

        fn parent(&self, id: &NodeId) -> Option<&NodeId> {
            match id.as_str() {
                "x" | "z" => Some(&self.ids[1]),
                "y" => Some(&self.ids[2]),
                _ => None,
            }
        }

        fn contains(&self, id: &NodeId) -> bool {
            self.ids.contains(id)
        }

        fn is_expanded(&self, _id: &NodeId) -> bool {
            true
        }
    }

    #[test]
    fn path_stops_at_parent_loop() {
        let model = LoopedChain {
            ids: ["x", "y", "z"].map(NodeId::from),
        };

        assert_eq!(
            path_to_node(&model, &NodeId::from("x")),
            vec![NodeId::from("z"), NodeId::from("y"), NodeId::from("x")]
        );
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let store = TreeStore::canonical();
        let mut matches = SearchMatches::with_query(&store, "b");

        assert_eq!(matches.position(), Some((1, 3)));
        assert_eq!(matches.select_prev().map(NodeId::as_str), Some("b2"));
        assert_eq!(matches.select_next().map(NodeId::as_str), Some("b"));
        assert_eq!(matches.select_next().map(NodeId::as_str), Some("b1"));
        assert_eq!(matches.position(), Some((2, 3)));
    }

    #[test]
    fn refresh_clamps_cursor() {
        let mut store = TreeStore::canonical();
        let mut matches = SearchMatches::with_query(&store, "b");
        matches.select_prev();
        store.delete_node("b1");
        store.delete_node("b2");

        matches.refresh(&store);

        assert_eq!(matches.current().map(NodeId::as_str), Some("b"));
        assert!(matches.contains("b"));
        assert!(!matches.contains("b2"));
    }

    #[test]
    fn cleared_matches_stay_empty_after_reset() {
        let mut store = TreeStore::canonical();
        let mut matches = SearchMatches::with_query(&store, "b");
        matches.select_next();

        matches.clear();
        store.reset();
        matches.refresh(&store);

        assert_eq!(matches.query(), "");
        assert!(matches.is_empty());
        assert_eq!(matches.position(), None);
        assert!(!matches.contains("b"));
    }

    #[test]
    fn empty_matches_have_no_cursor() {
        let store = TreeStore::canonical();
        let mut matches = SearchMatches::with_query(&store, "zzz");

        assert_eq!(matches.select_next(), None);
        assert_eq!(matches.select_prev(), None);
        assert_eq!(matches.position(), None);
        assert_eq!(matches.reveal_command(), None);
    }
}
