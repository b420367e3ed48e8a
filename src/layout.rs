use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use tracing::trace;

use crate::highlight::{HighlightState, HighlightTier};
use crate::model::{NodeId, TreeNode};
use crate::store::TreeStore;
use crate::style::{EdgeStroke, EdgeStrokes};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry settings for [`compute_layout`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Footprint width of every node.
    pub node_width: f32,
    /// Footprint height of every node.
    pub node_height: f32,
    /// Horizontal gap between neighbouring nodes of a rank.
    pub node_sep: f32,
    /// Vertical gap between ranks.
    pub rank_sep: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Stroke hints attached to edges by tier.
    pub edge_strokes: EdgeStrokes,
}

impl LayoutConfig {
    pub const fn new() -> Self {
        Self {
            node_width: 160.0,
            node_height: 80.0,
            node_sep: 60.0,
            rank_sep: 100.0,
            margin_x: 50.0,
            margin_y: 50.0,
            edge_strokes: EdgeStrokes::new(),
        }
    }

    #[must_use]
    pub const fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    #[must_use]
    pub const fn with_spacing(mut self, node_sep: f32, rank_sep: f32) -> Self {
        self.node_sep = node_sep;
        self.rank_sep = rank_sep;
        self
    }

    #[must_use]
    pub const fn with_margin(mut self, x: f32, y: f32) -> Self {
        self.margin_x = x;
        self.margin_y = y;
        self
    }

    #[must_use]
    pub const fn with_edge_strokes(mut self, strokes: EdgeStrokes) -> Self {
        self.edge_strokes = strokes;
        self
    }

    /// Distance between the centres of two horizontally adjacent slots.
    #[inline]
    pub fn slot_width(&self) -> f32 {
        self.node_width + self.node_sep
    }

    /// Distance between the centres of two adjacent ranks.
    #[inline]
    pub fn rank_height(&self) -> f32 {
        self.node_height + self.rank_sep
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pass-through annotations for the renderer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub has_children: bool,
    pub child_count: usize,
    pub is_expanded: bool,
    pub depth: u32,
    pub is_hovered: bool,
    pub is_selected: bool,
    pub is_search_match: bool,
}

/// A positioned node. `position` is the top-left corner of the footprint.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    /// Layer index within the layout graph.
    pub rank: usize,
    pub flags: NodeFlags,
}

impl LayoutNode {
    /// Centre of the footprint.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    /// Highlight tier derived from the node flags.
    pub const fn tier(&self) -> HighlightTier {
        if self.flags.is_selected {
            HighlightTier::Selected
        } else if self.flags.is_hovered {
            HighlightTier::Hovered
        } else {
            HighlightTier::Default
        }
    }
}

/// A parent-to-child connection between two visible nodes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
    /// `"{source}-{target}"`.
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub tier: HighlightTier,
    pub stroke: EdgeStroke,
}

/// Output of [`compute_layout`]: nodes in visible order, edges in child order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Overall width including margins.
    pub width: f32,
    /// Overall height including margins.
    pub height: f32,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&LayoutEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == *source && edge.target == *target)
    }

    pub const fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Visible nodes reduced to indices, with parent/child links restricted to the visible set.
struct LayoutGraph<'a> {
    members: Vec<&'a TreeNode>,
    parents: Vec<Option<usize>>,
    children: Vec<SmallVec<[usize; 4]>>,
}

impl<'a> LayoutGraph<'a> {
    fn build(store: &'a TreeStore, visible: &[NodeId]) -> Self {
        let mut index: FxHashMap<&NodeId, usize> =
            FxHashMap::with_capacity_and_hasher(visible.len(), FxBuildHasher);
        let mut members = Vec::with_capacity(visible.len());
        for id in visible {
            if let Some(node) = store.get(id)
                && !index.contains_key(&node.id)
            {
                index.insert(&node.id, members.len());
                members.push(node);
            }
        }

        let parents: Vec<Option<usize>> = members
            .iter()
            .map(|node| {
                node.parent_id
                    .as_ref()
                    .and_then(|parent| index.get(parent).copied())
            })
            .collect();

        let mut children = vec![SmallVec::new(); members.len()];
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(child);
            } else if members[child].parent_id.is_some() {
                trace!(
                    node = %members[child].id,
                    "visible node without visible parent, laid out as its own root"
                );
            }
        }

        Self {
            members,
            parents,
            children,
        }
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(idx, parent)| parent.is_none().then_some(idx))
    }

    /// Rank of every member: 0 for component roots, parent rank + 1 otherwise.
    fn ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0; self.len()];
        let mut stack: Vec<usize> = self.roots().collect();
        while let Some(node) = stack.pop() {
            for &child in &self.children[node] {
                ranks[child] = ranks[node] + 1;
                stack.push(child);
            }
        }
        ranks
    }

    /// Horizontal slot of every member and the number of leaf slots used.
    ///
    /// Leaves take consecutive slots in visible pre-order, parents sit midway
    /// between their first and last child. Keeping pre-order within each rank
    /// means tree edges never cross.
    fn slots(&self) -> (Vec<f32>, usize) {
        let mut slots = vec![0.0_f32; self.len()];
        let mut next_leaf = 0_usize;
        let mut stack: Vec<(usize, bool)> = Vec::with_capacity(self.len());
        let roots: SmallVec<[usize; 4]> = self.roots().collect();
        for root in roots {
            stack.push((root, false));
            while let Some((node, children_done)) = stack.pop() {
                let children = &self.children[node];
                match (children.first(), children.last()) {
                    (Some(&first), Some(&last)) if children_done => {
                        slots[node] = (slots[first] + slots[last]) / 2.0;
                    }
                    (Some(_), Some(_)) => {
                        stack.push((node, true));
                        stack.extend(children.iter().rev().map(|&child| (child, false)));
                    }
                    _ => {
                        slots[node] = next_leaf as f32;
                        next_leaf += 1;
                    }
                }
            }
        }
        (slots, next_leaf)
    }
}

/// Lays out the visible part of the tree top to bottom.
///
/// The result depends only on the arguments: the same snapshot, visible list,
/// highlight state and config always produce the same nodes and edges.
pub fn compute_layout(
    store: &TreeStore,
    visible: &[NodeId],
    highlight: &HighlightState,
    config: &LayoutConfig,
) -> LayoutResult {
    let graph = LayoutGraph::build(store, visible);
    if graph.len() == 0 {
        return LayoutResult {
            width: config.margin_x * 2.0,
            height: config.margin_y * 2.0,
            ..LayoutResult::default()
        };
    }

    let ranks = graph.ranks();
    let (slots, slot_count) = graph.slots();
    let slot_width = config.slot_width();
    let rank_height = config.rank_height();

    let nodes: Vec<LayoutNode> = graph
        .members
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            // Anchors are centres; shift by half the footprint to get the corner.
            let center_x = config.margin_x + config.node_width / 2.0 + slots[idx] * slot_width;
            let center_y =
                config.margin_y + config.node_height / 2.0 + ranks[idx] as f32 * rank_height;
            LayoutNode {
                id: node.id.clone(),
                label: node.label.clone(),
                position: Point::new(
                    center_x - config.node_width / 2.0,
                    center_y - config.node_height / 2.0,
                ),
                width: config.node_width,
                height: config.node_height,
                rank: ranks[idx],
                flags: NodeFlags {
                    has_children: node.has_children(),
                    child_count: node.children_ids.len(),
                    is_expanded: node.is_expanded,
                    depth: node.depth,
                    is_hovered: highlight.is_hovered(&node.id),
                    is_selected: highlight.is_selected(&node.id),
                    is_search_match: highlight.is_search_match(&node.id),
                },
            }
        })
        .collect();

    let edges: Vec<LayoutEdge> = graph
        .parents
        .iter()
        .enumerate()
        .filter_map(|(child, parent)| {
            parent.map(|parent| (graph.members[parent], graph.members[child]))
        })
        .map(|(source, target)| {
            let tier = HighlightTier::for_edge(highlight, &source.id, &target.id);
            LayoutEdge {
                id: format!("{}-{}", source.id, target.id),
                source: source.id.clone(),
                target: target.id.clone(),
                tier,
                stroke: config.edge_strokes.for_tier(tier),
            }
        })
        .collect();

    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let width = config.margin_x * 2.0
        + config.node_width
        + slot_count.saturating_sub(1) as f32 * slot_width;
    let height = config.margin_y * 2.0 + config.node_height + max_rank as f32 * rank_height;

    trace!(
        nodes = nodes.len(),
        edges = edges.len(),
        width,
        height,
        "computed layout"
    );
    LayoutResult {
        nodes,
        edges,
        width,
        height,
    }
}
