use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use tui_treegraph::{
    HighlightState, LayoutConfig, SeedNode, TreeCommand, TreeStore, compute_layout, search,
    visible_from_root,
};

const FANOUT: usize = 5;
const DEPTH: usize = 6;

fn seed(id: String, depth: usize) -> SeedNode {
    let label = format!("Node {id}");
    let node = SeedNode::new(id.clone(), label);
    if depth == 0 {
        return node;
    }
    node.children((0..FANOUT).map(|idx| seed(format!("{id}.{idx}"), depth - 1)))
}

fn build_store() -> TreeStore {
    TreeStore::from_seed(&seed("n".to_string(), DEPTH))
}

fn bench_visibility(c: &mut Criterion) {
    let store = build_store();
    c.bench_function("visible_ids_full", |b| {
        b.iter(|| black_box(visible_from_root(black_box(&store))));
    });

    let collapsed = store.applied(&TreeCommand::ToggleExpand("n.0".into()));
    c.bench_function("visible_ids_collapsed_branch", |b| {
        b.iter(|| black_box(visible_from_root(black_box(&collapsed))));
    });
}

fn bench_search(c: &mut Criterion) {
    let store = build_store();
    c.bench_function("search_common_substring", |b| {
        b.iter(|| black_box(search(black_box(&store), black_box("3.1"))));
    });
    c.bench_function("search_no_match", |b| {
        b.iter(|| black_box(search(black_box(&store), black_box("zzz"))));
    });
}

fn bench_layout(c: &mut Criterion) {
    let store = build_store();
    let visible = visible_from_root(&store);
    let highlight = HighlightState::new()
        .with_selected("n.2")
        .with_search_matches(search(&store, "4.4"));
    let config = LayoutConfig::default();
    c.bench_function("compute_layout_full", |b| {
        b.iter(|| black_box(compute_layout(&store, black_box(&visible), &highlight, &config)));
    });
}

fn bench_mutation(c: &mut Criterion) {
    let store = build_store();
    c.bench_function("snapshot_delete_branch", |b| {
        b.iter(|| black_box(store.applied(&TreeCommand::Delete("n.1".into()))));
    });
}

criterion_group!(
    benches,
    bench_visibility,
    bench_search,
    bench_layout,
    bench_mutation
);
criterion_main!(benches);
