use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};

use tui_treegraph::{
    CellScale, GraphAction, GraphKeyBindings, HighlightState, LayoutConfig, LayoutResult, NodeId,
    SearchMatches, TreeCommand, TreeEvent, TreeGraphStyle, TreeGraphView, TreeStore,
    compute_layout, visible_from_root,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DemoAction {
    Quit,
}

enum Mode {
    Normal,
    Search(String),
    Rename(NodeId, String),
}

struct App {
    store: TreeStore,
    highlight: HighlightState,
    matches: SearchMatches,
    bindings: GraphKeyBindings,
    config: LayoutConfig,
    scale: CellScale,
    style: TreeGraphStyle<'static>,
    layout: LayoutResult,
    graph_area: Rect,
    offset: (i32, i32),
    center_pending: bool,
    mode: Mode,
}

impl App {
    fn new() -> Self {
        let store = TreeStore::canonical();
        let mut style = TreeGraphStyle::default();
        style.block_style = Style::default()
            .fg(Color::Rgb(221, 227, 235))
            .bg(Color::Rgb(24, 28, 36));
        style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
        style.edge_style = Style::default().fg(Color::Rgb(86, 98, 120));
        style.selected_style = Style::default()
            .fg(Color::Rgb(255, 255, 255))
            .bg(Color::Rgb(52, 66, 96))
            .add_modifier(Modifier::BOLD);
        style.title = Some(Line::from(" tree graph "));

        Self {
            highlight: HighlightState::new().with_selected(store.root_id().clone()),
            store,
            matches: SearchMatches::new(),
            bindings: GraphKeyBindings::new(),
            config: LayoutConfig::default(),
            scale: CellScale::default(),
            style,
            layout: LayoutResult::default(),
            graph_area: Rect::default(),
            offset: (0, 0),
            center_pending: true,
            mode: Mode::Normal,
        }
    }

    fn relayout(&mut self) {
        let visible = visible_from_root(&self.store);
        self.highlight.set_search_matches(self.matches.ids());
        self.layout = compute_layout(&self.store, &visible, &self.highlight, &self.config);
    }

    fn apply(&mut self, command: &TreeCommand) {
        match self.store.apply(command) {
            TreeEvent::Added(id) => {
                self.highlight.selected = Some(id);
                self.center_pending = true;
            }
            TreeEvent::Changed => {}
            TreeEvent::Unchanged => return,
        }
        self.highlight.prune_removed(&self.store);
        self.matches.refresh(&self.store);
    }

    fn jump_to_match(&mut self, id: Option<NodeId>) {
        let Some(id) = id else {
            return;
        };
        self.apply(&TreeCommand::Reveal(id.clone()));
        self.highlight.selected = Some(id);
        self.center_pending = true;
    }

    fn render(&mut self, frame: &mut Frame) {
        let [graph_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        self.graph_area = graph_area;
        self.relayout();

        if self.center_pending {
            self.center_pending = false;
            if let Some(node) = self
                .highlight
                .selected
                .as_ref()
                .and_then(|id| self.layout.node(id))
            {
                self.offset = self.scale.center_offset(node.center(), graph_area);
            }
        }

        let view = TreeGraphView::new(&self.layout, self.style.clone())
            .scale(self.scale)
            .offset(self.offset);
        frame.render_widget(&view, graph_area);
        frame.render_widget(Paragraph::new(self.status_line()), status_area);
    }

    fn status_line(&self) -> Line<'static> {
        match &self.mode {
            Mode::Search(query) => Line::from(vec![
                Span::styled("search: ", Style::default().fg(Color::Yellow)),
                Span::raw(query.clone()),
            ]),
            Mode::Rename(_, label) => Line::from(vec![
                Span::styled("rename: ", Style::default().fg(Color::Yellow)),
                Span::raw(label.clone()),
            ]),
            Mode::Normal => {
                let stats = self.store.stats(&visible_from_root(&self.store));
                let position = self
                    .matches
                    .position()
                    .map(|(idx, count)| format!("  match {idx}/{count}"))
                    .unwrap_or_default();
                Line::from(format!(
                    "{} nodes, {} visible{position}  |  / search  n/N matches  a add  r rename  d delete  R reset  q quit",
                    stats.node_count, stats.visible_count
                ))
            }
        }
    }

    /// Returns `false` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Search(mut query) => {
                match key.code {
                    KeyCode::Enter => {
                        self.matches.set_query(&self.store, query);
                        let first = self.matches.current().cloned();
                        self.jump_to_match(first);
                    }
                    KeyCode::Esc => self.matches.clear(),
                    KeyCode::Backspace => {
                        query.pop();
                        self.mode = Mode::Search(query);
                    }
                    KeyCode::Char(ch) => {
                        query.push(ch);
                        self.mode = Mode::Search(query);
                    }
                    _ => self.mode = Mode::Search(query),
                }
                true
            }
            Mode::Rename(id, mut label) => {
                match key.code {
                    KeyCode::Enter => self.apply(&TreeCommand::Rename(id, label)),
                    KeyCode::Esc => {}
                    KeyCode::Backspace => {
                        label.pop();
                        self.mode = Mode::Rename(id, label);
                    }
                    KeyCode::Char(ch) => {
                        label.push(ch);
                        self.mode = Mode::Rename(id, label);
                    }
                    _ => self.mode = Mode::Rename(id, label),
                }
                true
            }
            Mode::Normal => self.handle_action(key),
        }
    }

    fn handle_action(&mut self, key: KeyEvent) -> bool {
        let action = self.bindings.resolve_with(key, |event| match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(DemoAction::Quit),
            _ => None,
        });
        let Some(action) = action else {
            return true;
        };

        match action {
            GraphAction::Custom(DemoAction::Quit) => return false,
            GraphAction::Select(step) => {
                if self.highlight.move_selection(&self.store, step) {
                    self.center_pending = true;
                }
            }
            GraphAction::Rename => {
                if let Some(node) = self
                    .highlight
                    .selected
                    .as_ref()
                    .and_then(|id| self.store.get(id))
                {
                    self.mode = Mode::Rename(node.id.clone(), node.label.clone());
                }
            }
            GraphAction::Search => self.mode = Mode::Search(self.matches.query().to_string()),
            GraphAction::NextMatch => {
                let next = self.matches.select_next().cloned();
                self.jump_to_match(next);
            }
            GraphAction::PrevMatch => {
                let prev = self.matches.select_prev().cloned();
                self.jump_to_match(prev);
            }
            GraphAction::Pan(dx, dy) => {
                self.offset.0 += i32::from(dx);
                self.offset.1 += i32::from(dy);
            }
            GraphAction::CenterSelected => self.center_pending = true,
            GraphAction::Reset => {
                self.matches.clear();
                self.apply(&TreeCommand::Reset);
                self.highlight.selected = Some(self.store.root_id().clone());
                self.center_pending = true;
            }
            GraphAction::ToggleExpand | GraphAction::AddChild | GraphAction::Delete => {
                if let Some(command) = self
                    .highlight
                    .selected
                    .as_ref()
                    .and_then(|id| action.command(id))
                {
                    self.apply(&command);
                }
            }
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let view = TreeGraphView::new(&self.layout, self.style.clone())
            .scale(self.scale)
            .offset(self.offset);
        let hit = view
            .hit_test(self.graph_area, mouse.column, mouse.row)
            .cloned();

        match mouse.kind {
            MouseEventKind::Moved => self.highlight.set_hovered(hit),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = hit {
                    self.highlight.toggle_selected(&id);
                }
            }
            _ => {}
        }
    }
}

fn run_app(mut terminal: DefaultTerminal, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = run_app(terminal, App::new());
    execute!(io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}
