use std::ops::RangeInclusive;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::glyphs::GraphGlyphs;
use crate::highlight::HighlightTier;
use crate::layout::{LayoutEdge, LayoutNode, LayoutResult, Point};
use crate::model::NodeId;
use crate::style::TreeGraphStyle;

/// Cell coordinates stay this far inside `i32` so box and edge offsets cannot overflow.
const CELL_LIMIT: f32 = (i32::MAX / 4) as f32;

/// Layout units covered by one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellScale {
    x: f32,
    y: f32,
}

impl CellScale {
    /// Zero, negative or non-finite factors fall back to one unit per cell.
    pub fn new(x: f32, y: f32) -> Self {
        let sane = |value: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                1.0
            }
        };
        Self {
            x: sane(x),
            y: sane(y),
        }
    }

    pub const fn x(&self) -> f32 {
        self.x
    }

    pub const fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn col(&self, x: f32) -> i32 {
        (x / self.x).floor().clamp(-CELL_LIMIT, CELL_LIMIT) as i32
    }

    #[inline]
    pub fn row(&self, y: f32) -> i32 {
        (y / self.y).floor().clamp(-CELL_LIMIT, CELL_LIMIT) as i32
    }

    /// Pan offset that puts `point` in the middle of a viewport.
    pub fn center_offset(&self, point: Point, viewport: Rect) -> (i32, i32) {
        (
            self.col(point.x) - i32::from(viewport.width) / 2,
            self.row(point.y) - i32::from(viewport.height) / 2,
        )
    }
}

impl Default for CellScale {
    fn default() -> Self {
        // 160x80 nodes become 20x5 cells.
        Self::new(8.0, 16.0)
    }
}

/// Inclusive cell bounds of a node box in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl CellBox {
    fn of(node: &LayoutNode, scale: CellScale) -> Self {
        let left = scale.col(node.position.x);
        let top = scale.row(node.position.y);
        let right = (scale.col(node.position.x + node.width) - 1).max(left + 2);
        let bottom = (scale.row(node.position.y + node.height) - 1).max(top + 2);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    const fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.left && col <= self.right && row >= self.top && row <= self.bottom
    }
}

/// Clipped drawing surface with a pan offset.
struct Canvas<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    offset: (i32, i32),
}

impl Canvas<'_> {
    /// Part of `lo..=hi` that lands on screen along one axis.
    fn clip(lo: i32, hi: i32, offset: i32, extent: u16) -> RangeInclusive<i32> {
        let first = offset;
        let last = offset.saturating_add(i32::from(extent)).saturating_sub(1);
        lo.max(first)..=hi.min(last)
    }

    fn cols(&self, lo: i32, hi: i32) -> RangeInclusive<i32> {
        Self::clip(lo, hi, self.offset.0, self.area.width)
    }

    fn rows(&self, lo: i32, hi: i32) -> RangeInclusive<i32> {
        Self::clip(lo, hi, self.offset.1, self.area.height)
    }

    fn put(&mut self, col: i32, row: i32, symbol: &str, style: Style) {
        let x = i64::from(self.area.x) + i64::from(col) - i64::from(self.offset.0);
        let y = i64::from(self.area.y) + i64::from(row) - i64::from(self.offset.1);
        if x < i64::from(self.area.x)
            || x >= i64::from(self.area.right())
            || y < i64::from(self.area.y)
            || y >= i64::from(self.area.bottom())
        {
            return;
        }
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y))
            && let Some(cell) = self.buf.cell_mut((x, y))
        {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    fn text(&mut self, col: i32, row: i32, text: &str, max_chars: usize, style: Style) {
        let mut encoded = [0_u8; 4];
        for (idx, ch) in text.chars().take(max_chars).enumerate() {
            let Ok(idx) = i32::try_from(idx) else {
                break;
            };
            self.put(col.saturating_add(idx), row, ch.encode_utf8(&mut encoded), style);
        }
    }
}

/// Draws a [`LayoutResult`] as boxes and elbow edges.
pub struct TreeGraphView<'a> {
    layout: &'a LayoutResult,
    style: TreeGraphStyle<'a>,
    glyphs: GraphGlyphs<'a>,
    scale: CellScale,
    offset: (i32, i32),
}

impl<'a> TreeGraphView<'a> {
    pub fn new(layout: &'a LayoutResult, style: TreeGraphStyle<'a>) -> Self {
        Self {
            layout,
            style,
            glyphs: GraphGlyphs::unicode(),
            scale: CellScale::default(),
            offset: (0, 0),
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: GraphGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub const fn scale(mut self, scale: CellScale) -> Self {
        self.scale = scale;
        self
    }

    /// Pan offset in cells.
    #[must_use]
    pub const fn offset(mut self, offset: (i32, i32)) -> Self {
        self.offset = offset;
        self
    }

    fn block(&self) -> Block<'a> {
        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block
            .style(self.style.block_style)
            .border_style(self.style.border_style)
    }

    /// Returns the node under a terminal position, given the area the view is rendered in.
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<&'a NodeId> {
        let inner = self.block().inner(area);
        if column < inner.x || column >= inner.right() || row < inner.y || row >= inner.bottom() {
            return None;
        }
        let col = i32::from(column - inner.x).saturating_add(self.offset.0);
        let row = i32::from(row - inner.y).saturating_add(self.offset.1);
        // Later nodes are drawn on top.
        self.layout
            .nodes
            .iter()
            .rev()
            .find(|node| CellBox::of(node, self.scale).contains(col, row))
            .map(|node| &node.id)
    }

    fn draw_edge(
        &self,
        canvas: &mut Canvas<'_>,
        from: &LayoutNode,
        to: &LayoutNode,
        tier: HighlightTier,
    ) {
        let (horizontal, vertical) = self.glyphs.edge_segments(tier);
        let style = self.style.edge(tier);
        let parent_col = self.scale.col(from.center().x);
        let child_col = self.scale.col(to.center().x);
        let start = CellBox::of(from, self.scale).bottom + 1;
        let end = CellBox::of(to, self.scale).top - 1;
        if end < start {
            return;
        }

        let elbow = (start + end) / 2;
        for row in canvas.rows(start, elbow - 1) {
            canvas.put(parent_col, row, vertical, style);
        }
        for row in canvas.rows(elbow + 1, end) {
            canvas.put(child_col, row, vertical, style);
        }

        if parent_col == child_col {
            canvas.put(parent_col, elbow, vertical, style);
            return;
        }
        let (lo, hi) = (parent_col.min(child_col), parent_col.max(child_col));
        for col in canvas.cols(lo + 1, hi - 1) {
            canvas.put(col, elbow, horizontal, style);
        }
        if child_col > parent_col {
            canvas.put(parent_col, elbow, self.glyphs.turn_up_right, style);
            canvas.put(child_col, elbow, self.glyphs.turn_left_down, style);
        } else {
            canvas.put(parent_col, elbow, self.glyphs.turn_up_left, style);
            canvas.put(child_col, elbow, self.glyphs.turn_right_down, style);
        }
    }

    fn draw_node(&self, canvas: &mut Canvas<'_>, node: &LayoutNode) {
        let cells = CellBox::of(node, self.scale);
        let border = self.style.node(node.tier());
        let glyphs = &self.glyphs;

        for row in canvas.rows(cells.top, cells.bottom) {
            for col in canvas.cols(cells.left, cells.right) {
                let symbol = match (row, col) {
                    (r, c) if r == cells.top && c == cells.left => glyphs.box_top_left,
                    (r, c) if r == cells.top && c == cells.right => glyphs.box_top_right,
                    (r, c) if r == cells.bottom && c == cells.left => glyphs.box_bottom_left,
                    (r, c) if r == cells.bottom && c == cells.right => glyphs.box_bottom_right,
                    (r, _) if r == cells.top || r == cells.bottom => glyphs.horizontal,
                    (_, c) if c == cells.left || c == cells.right => glyphs.vertical,
                    _ => " ",
                };
                canvas.put(col, row, symbol, border);
            }
        }

        let inner_width = usize::try_from(cells.right - cells.left - 1).unwrap_or(0);
        let expander = glyphs.expander(node.flags.has_children, node.flags.is_expanded);
        let text = format!("{expander} {}", node.label);
        let text_len = text.chars().count().min(inner_width);
        let pad = i32::try_from((inner_width - text_len) / 2).unwrap_or(0);
        let label_style = if node.flags.is_search_match {
            self.style.match_style
        } else {
            border
        };
        let middle = (cells.top + cells.bottom) / 2;
        canvas.text(cells.left + 1 + pad, middle, &text, inner_width, label_style);

        if node.flags.has_children {
            let badge = format!("[{}]", node.flags.child_count);
            let badge_len = i32::try_from(badge.chars().count()).unwrap_or(0);
            let badge_col = cells.right - badge_len;
            if badge_col > cells.left {
                canvas.text(badge_col, cells.top, &badge, inner_width, self.style.badge_style);
            }
        }
    }
}

impl Widget for &TreeGraphView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        let mut canvas = Canvas {
            buf,
            area: inner,
            offset: self.offset,
        };

        let mut by_id: FxHashMap<&NodeId, &LayoutNode> =
            FxHashMap::with_capacity_and_hasher(self.layout.nodes.len(), FxBuildHasher);
        for node in &self.layout.nodes {
            by_id.insert(&node.id, node);
        }

        // Emphasised edges last so they stay on top of shared trunks.
        let mut edges: Vec<&LayoutEdge> = self.layout.edges.iter().collect();
        edges.sort_by_key(|edge| edge.tier);
        for edge in edges {
            if let (Some(from), Some(to)) = (by_id.get(&edge.source), by_id.get(&edge.target)) {
                self.draw_edge(&mut canvas, from, to, edge.tier);
            }
        }

        for node in &self.layout.nodes {
            self.draw_node(&mut canvas, node);
        }
    }
}

impl Widget for TreeGraphView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        (&self).render(area, buf);
    }
}
