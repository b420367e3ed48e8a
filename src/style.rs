use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

use crate::highlight::HighlightTier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stroke hints attached to layout edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStroke {
    pub width: f32,
    pub animated: bool,
    pub glow: bool,
}

impl EdgeStroke {
    pub const fn new(width: f32, animated: bool, glow: bool) -> Self {
        Self {
            width,
            animated,
            glow,
        }
    }
}

/// Stroke hints per highlight tier.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStrokes {
    pub default: EdgeStroke,
    pub hovered: EdgeStroke,
    pub selected: EdgeStroke,
}

impl EdgeStrokes {
    pub const fn new() -> Self {
        Self {
            default: EdgeStroke::new(1.5, false, false),
            hovered: EdgeStroke::new(2.0, true, true),
            selected: EdgeStroke::new(2.0, true, true),
        }
    }

    pub const fn for_tier(&self, tier: HighlightTier) -> EdgeStroke {
        match tier {
            HighlightTier::Default => self.default,
            HighlightTier::Hovered => self.hovered,
            HighlightTier::Selected => self.selected,
        }
    }
}

impl Default for EdgeStrokes {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual settings of the graph widget.
#[derive(Clone)]
pub struct TreeGraphStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub borders: Borders,
    pub node_style: Style,
    pub hovered_style: Style,
    pub selected_style: Style,
    pub match_style: Style,
    pub badge_style: Style,
    pub edge_style: Style,
    pub hovered_edge_style: Style,
    pub selected_edge_style: Style,
}

impl TreeGraphStyle<'_> {
    /// Style for an edge of the given tier.
    pub const fn edge(&self, tier: HighlightTier) -> Style {
        match tier {
            HighlightTier::Default => self.edge_style,
            HighlightTier::Hovered => self.hovered_edge_style,
            HighlightTier::Selected => self.selected_edge_style,
        }
    }

    /// Border style for a node box of the given tier.
    pub const fn node(&self, tier: HighlightTier) -> Style {
        match tier {
            HighlightTier::Default => self.node_style,
            HighlightTier::Hovered => self.hovered_style,
            HighlightTier::Selected => self.selected_style,
        }
    }
}

impl Default for TreeGraphStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            borders: Borders::ALL,
            node_style: Style::default(),
            hovered_style: Style::default().fg(Color::Cyan),
            selected_style: Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            match_style: Style::default().fg(Color::Black).bg(Color::Yellow),
            badge_style: Style::default().fg(Color::Cyan),
            edge_style: Style::default().fg(Color::DarkGray),
            hovered_edge_style: Style::default().fg(Color::Cyan),
            selected_edge_style: Style::default().fg(Color::LightRed),
        }
    }
}
