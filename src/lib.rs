//! Hierarchical tree graph for ratatui: an immutable-snapshot tree store, visibility and
//! search over it, a top-down layered layout engine and a widget that draws the result.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings resolving to [`GraphAction`]s.
//! - `serde`: serde support for ids, seeds, layout output and stroke settings.

mod action;
mod error;
mod glyphs;
mod highlight;
#[cfg(feature = "keymap")]
mod keymap;
mod layout;
mod model;
pub mod prelude;
mod search;
mod seed;
mod store;
mod style;
mod visibility;
mod widget;

pub use action::{GraphAction, SelectionMove, TreeCommand, TreeEvent};
pub use error::{InvariantError, SeedError};
pub use glyphs::GraphGlyphs;
pub use highlight::{HighlightState, HighlightTier};
#[cfg(feature = "keymap")]
pub use keymap::{GraphKeyBindings, KeymapProfile};
pub use layout::{
    LayoutConfig, LayoutEdge, LayoutNode, LayoutResult, NodeFlags, Point, compute_layout,
};
pub use model::{NodeId, TreeModel, TreeNode};
pub use search::{SearchMatches, path_to_node, search};
pub use seed::SeedNode;
pub use store::{NEW_NODE_LABEL, TreeStats, TreeStore};
pub use style::{EdgeStroke, EdgeStrokes, TreeGraphStyle};
pub use visibility::{visible_from_root, visible_ids};
pub use widget::{CellScale, TreeGraphView};
