use crate::highlight::HighlightTier;

/// Characters used to draw node boxes, edges and expander markers.
#[derive(Clone, Copy, Debug)]
pub struct GraphGlyphs<'a> {
    pub horizontal: &'a str,
    pub vertical: &'a str,
    pub box_top_left: &'a str,
    pub box_top_right: &'a str,
    pub box_bottom_left: &'a str,
    pub box_bottom_right: &'a str,
    /// Edge arriving from above and leaving to the right.
    pub turn_up_right: &'a str,
    /// Edge arriving from above and leaving to the left.
    pub turn_up_left: &'a str,
    /// Edge arriving from the left and leaving downwards.
    pub turn_left_down: &'a str,
    /// Edge arriving from the right and leaving downwards.
    pub turn_right_down: &'a str,
    /// Emphasised edge segments (hovered/selected).
    pub bold_horizontal: &'a str,
    pub bold_vertical: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    pub leaf: &'a str,
}

impl GraphGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            horizontal: "─",
            vertical: "│",
            box_top_left: "╭",
            box_top_right: "╮",
            box_bottom_left: "╰",
            box_bottom_right: "╯",
            turn_up_right: "└",
            turn_up_left: "┘",
            turn_left_down: "┐",
            turn_right_down: "┌",
            bold_horizontal: "━",
            bold_vertical: "┃",
            expanded: "▼",
            collapsed: "▶",
            leaf: "•",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            horizontal: "-",
            vertical: "|",
            box_top_left: "+",
            box_top_right: "+",
            box_bottom_left: "+",
            box_bottom_right: "+",
            turn_up_right: "`",
            turn_up_left: "'",
            turn_left_down: ".",
            turn_right_down: ",",
            bold_horizontal: "=",
            bold_vertical: "#",
            expanded: "v",
            collapsed: ">",
            leaf: "*",
        }
    }
}

impl<'a> GraphGlyphs<'a> {
    /// Straight segments for an edge of the given tier.
    pub const fn edge_segments(&self, tier: HighlightTier) -> (&'a str, &'a str) {
        if tier.is_emphasized() {
            (self.bold_horizontal, self.bold_vertical)
        } else {
            (self.horizontal, self.vertical)
        }
    }

    /// Expander marker for a node.
    pub const fn expander(&self, has_children: bool, is_expanded: bool) -> &'a str {
        match (has_children, is_expanded) {
            (false, _) => self.leaf,
            (true, true) => self.expanded,
            (true, false) => self.collapsed,
        }
    }
}

impl Default for GraphGlyphs<'static> {
    fn default() -> Self {
        Self::unicode()
    }
}
