// Minimal example: lay out the canonical tree and draw it into an in-memory buffer.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

use tui_treegraph::{
    HighlightState, LayoutConfig, TreeGraphStyle, TreeGraphView, TreeStore, compute_layout,
    visible_from_root,
};

fn main() {
    // root -> {HA -> {A1, A2}, B -> {B1, B2}}
    let store = TreeStore::canonical();
    let visible = visible_from_root(&store);

    // Select one node so its edges are drawn emphasised.
    let highlight = HighlightState::new().with_selected("b");
    let layout = compute_layout(&store, &visible, &highlight, &LayoutConfig::default());

    let widget = TreeGraphView::new(&layout, TreeGraphStyle::default());

    // Render into a buffer (no terminal required for the example).
    let area = Rect::new(0, 0, 120, 36);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);

    for y in 0..area.height {
        let line: String = (0..area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
            .collect();
        println!("{}", line.trim_end());
    }
}
