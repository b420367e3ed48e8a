use rstest::{fixture, rstest};

use tui_treegraph::{
    NEW_NODE_LABEL, NodeId, SearchMatches, SeedNode, TreeCommand, TreeEvent, TreeModel, TreeStore,
    path_to_node, search, visible_from_root, visible_ids,
};

#[fixture]
fn store() -> TreeStore {
    TreeStore::canonical()
}

fn ids(list: &[NodeId]) -> Vec<&str> {
    list.iter().map(NodeId::as_str).collect()
}

/// A deeper seed with collapsed branches and a label that reuses the generated id pattern.
fn wide_seed() -> SeedNode {
    SeedNode::new("top", "Top").children([
        SeedNode::new("left", "Left").children([
            SeedNode::new("left-a", "Alpha"),
            SeedNode::new("left-b", "Beta").child(SeedNode::new("left-b-x", "Gamma")),
        ]),
        SeedNode::new("mid", "Middle").expanded(false).children([
            SeedNode::new("mid-a", "alpha two"),
            SeedNode::new("node-1", "Taken"),
        ]),
        SeedNode::new("right", "Right"),
    ])
}

#[rstest]
fn concrete_scenario(mut store: TreeStore) {
    let visible = visible_from_root(&store);
    assert_eq!(ids(&visible), ["root", "ha", "a1", "a2", "b", "b1", "b2"]);

    store.toggle_expand("ha");
    let visible = visible_from_root(&store);
    assert_eq!(ids(&visible), ["root", "ha", "b", "b1", "b2"]);
    assert!(store.contains("a1"));
    assert!(store.contains("a2"));

    assert!(store.delete_node("ha"));
    assert_eq!(store.len(), 4);
    for gone in ["ha", "a1", "a2"] {
        assert!(!store.contains(gone));
    }
    let root = store.get("root").map(|node| ids(&node.children_ids));
    assert_eq!(root, Some(vec!["b"]));

    assert_eq!(ids(&search(&store, "B1")), ["b1"]);
    let b1 = NodeId::from("b1");
    assert_eq!(ids(&path_to_node(&store, &b1)), ["root", "b", "b1"]);
}

#[rstest]
#[case::canonical(TreeStore::canonical())]
#[case::wide(TreeStore::from_seed(&wide_seed()))]
fn visible_ids_start_at_root_and_keep_ancestors(#[case] store: TreeStore) {
    let visible = visible_from_root(&store);

    assert_eq!(visible.first(), Some(store.root_id()));
    for id in &visible {
        for ancestor in path_to_node(&store, id) {
            assert!(visible.contains(&ancestor), "{ancestor} missing before {id}");
        }
    }
}

#[rstest]
fn visible_ids_skip_collapsed_branch() {
    let store = TreeStore::from_seed(&wide_seed());

    let visible = visible_from_root(&store);

    assert_eq!(
        ids(&visible),
        ["top", "left", "left-a", "left-b", "left-b-x", "mid", "right"]
    );
    assert_eq!(ids(&visible_ids(&store, &NodeId::from("mid"))), ["mid"]);
    assert!(visible_ids(&store, &NodeId::from("nope")).is_empty());
}

#[rstest]
#[case::leaf("a1", &["a1"])]
#[case::branch("ha", &["ha", "a1", "a2"])]
#[case::other_branch("b", &["b", "b1", "b2"])]
fn delete_removes_exact_closure(
    mut store: TreeStore,
    #[case] target: &str,
    #[case] removed: &[&str],
) {
    let before: Vec<NodeId> = store.ids().cloned().collect();

    assert!(store.delete_node(target));

    for id in &before {
        assert_eq!(
            store.contains(id),
            !removed.contains(&id.as_str()),
            "unexpected state for {id}"
        );
    }
    assert!(store.check_invariants().is_ok());
}

#[rstest]
#[case::root("root")]
#[case::unknown("missing")]
fn delete_rejections_are_noops(mut store: TreeStore, #[case] target: &str) {
    let before = store.len();

    assert_eq!(
        store.apply(&TreeCommand::Delete(NodeId::from(target))),
        TreeEvent::Unchanged
    );
    assert_eq!(store.len(), before);
}

#[rstest]
#[case::unknown("missing")]
#[case::empty("")]
fn add_child_under_unknown_parent_is_noop(mut store: TreeStore, #[case] parent: &str) {
    let before: Vec<NodeId> = store.ids().cloned().collect();

    assert_eq!(
        store.apply(&TreeCommand::AddChild(NodeId::from(parent))),
        TreeEvent::Unchanged
    );

    let after: Vec<NodeId> = store.ids().cloned().collect();
    assert_eq!(after, before);
    // The id counter did not advance either.
    assert_eq!(store.add_child("root").as_deref(), Some("node-1"));
}

#[rstest]
fn deep_chain_keeps_exact_depths(mut store: TreeStore) {
    const LEVELS: u32 = u16::MAX as u32 + 2;
    let mut tip = NodeId::from("a1");

    for _ in 0..LEVELS {
        let Some(next) = store.add_child(&tip) else {
            panic!("add_child failed under {tip}");
        };
        tip = next;
    }

    assert_eq!(store.get(&tip).map(|node| node.depth), Some(2 + LEVELS));
    assert_eq!(store.check_invariants(), Ok(()));
}

#[rstest]
#[case::collapsed_leaf("a1")]
#[case::collapsed_branch("b")]
fn add_child_appends_and_expands(mut store: TreeStore, #[case] parent: &str) {
    store.set_expanded(parent, false);
    let before_len = store.len();
    let before_children = store
        .get(parent)
        .map(|node| node.children_ids.clone())
        .unwrap_or_default();
    let parent_depth = store.get(parent).map(|node| node.depth);

    let new_id = store.add_child(parent);

    let Some(new_id) = new_id else {
        panic!("child was not created");
    };
    assert_eq!(store.len(), before_len + 1);
    let Some(parent_node) = store.get(parent) else {
        panic!("parent vanished");
    };
    assert!(parent_node.is_expanded);
    assert_eq!(
        parent_node.children_ids[..before_children.len()],
        before_children[..]
    );
    assert_eq!(parent_node.children_ids.last(), Some(&new_id));
    let child = store.get(&new_id).map(|node| (node.label.as_str(), node.depth, node.is_expanded));
    assert_eq!(
        child,
        parent_depth.map(|depth| (NEW_NODE_LABEL, depth + 1, false))
    );
}

#[rstest]
fn generated_ids_never_collide() {
    let mut store = TreeStore::from_seed(&wide_seed());

    let first = store.add_child("top");
    let second = store.add_child("top");

    assert_eq!(first.as_deref(), Some("node-2"));
    assert_eq!(second.as_deref(), Some("node-3"));
    assert_eq!(store.get("node-1").map(|node| node.label.as_str()), Some("Taken"));
}

#[rstest]
fn snapshot_form_leaves_original_untouched(store: TreeStore) {
    let next = store.applied(&TreeCommand::Delete(NodeId::from("b")));

    assert!(store.contains("b"));
    assert!(!next.contains("b"));
    assert_eq!(next.len(), store.len() - 3);
}

#[rstest]
#[case::empty("", &[])]
#[case::blank("   ", &[])]
#[case::upper("B1", &["b1"])]
#[case::lower("b1", &["b1"])]
#[case::shared("a", &["ha", "a1", "a2"])]
#[case::no_match("zzz", &[])]
fn search_cases(store: TreeStore, #[case] query: &str, #[case] expected: &[&str]) {
    let first = search(&store, query);
    let second = search(&store, query);

    assert_eq!(ids(&first), expected);
    assert_eq!(first, second);
}

#[rstest]
fn search_ignores_visibility(mut store: TreeStore) {
    store.toggle_expand("ha");

    assert_eq!(ids(&search(&store, "a2")), ["a2"]);
}

#[rstest]
fn path_to_root_and_unknown(store: TreeStore) {
    assert_eq!(ids(&path_to_node(&store, store.root_id())), ["root"]);
    assert!(path_to_node(&store, &NodeId::from("ghost")).is_empty());
}

#[rstest]
fn reveal_expands_collapsed_ancestors(mut store: TreeStore) {
    store.set_expanded("root", false);
    store.set_expanded("b", false);
    let mut matches = SearchMatches::with_query(&store, "b2");
    let Some(command) = matches.reveal_command() else {
        panic!("no match to reveal");
    };

    assert!(store.apply(&command).is_changed());

    assert!(visible_from_root(&store).iter().any(|id| id == "b2"));
    assert_eq!(matches.select_next().map(NodeId::as_str), Some("b2"));
}

#[rstest]
fn every_mutation_keeps_invariants(mut store: TreeStore) {
    let commands = [
        TreeCommand::AddChild(NodeId::from("a1")),
        TreeCommand::ToggleExpand(NodeId::from("b")),
        TreeCommand::Rename(NodeId::from("b2"), "  Bee two ".to_string()),
        TreeCommand::Delete(NodeId::from("ha")),
        TreeCommand::AddChild(NodeId::from("root")),
        TreeCommand::Reveal(NodeId::from("b1")),
        TreeCommand::Reset,
        TreeCommand::AddChild(NodeId::from("b")),
    ];

    for command in &commands {
        store.apply(command);
        assert_eq!(store.check_invariants(), Ok(()), "after {command:?}");
        assert_eq!(store.root(), Some(&NodeId::from("root")));
    }
    // The counter survives reset, so the last add does not reuse node-1 or node-2.
    assert!(store.contains("node-3"));
}
