pub use crate::{
    CellScale, EdgeStroke, EdgeStrokes, GraphAction, GraphGlyphs, HighlightState, HighlightTier,
    LayoutConfig, LayoutEdge, LayoutNode, LayoutResult, NodeId, SearchMatches, SeedNode,
    SelectionMove, TreeCommand, TreeEvent, TreeGraphStyle, TreeGraphView, TreeModel, TreeNode,
    TreeStore, compute_layout, path_to_node, search, visible_from_root, visible_ids,
};

#[cfg(feature = "keymap")]
pub use crate::{GraphKeyBindings, KeymapProfile};
