use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{GraphAction, SelectionMove};

/// Cells moved by one pan step; shifted keys pan four times as far.
const PAN_STEP: i16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct GraphKeyBindings {
    profile: KeymapProfile,
}

impl Default for GraphKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<GraphAction<C>> {
        if key.modifiers.contains(KeyModifiers::SHIFT)
            && let Some(action) = Self::resolve_pan(key.code, PAN_STEP * 4)
        {
            return Some(action);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && let Some(action) = Self::resolve_pan(key.code, PAN_STEP)
        {
            return Some(action);
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => Self::resolve_default_nav(key),
            KeymapProfile::Vim => Self::resolve_vim_nav(key),
            KeymapProfile::Arrows => Self::resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        Self::resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<GraphAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(GraphAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_pan<C>(code: KeyCode, step: i16) -> Option<GraphAction<C>> {
        match code {
            KeyCode::Up => Some(GraphAction::Pan(0, -step)),
            KeyCode::Down => Some(GraphAction::Pan(0, step)),
            KeyCode::Left => Some(GraphAction::Pan(-step, 0)),
            KeyCode::Right => Some(GraphAction::Pan(step, 0)),
            _ => None,
        }
    }

    const fn resolve_default_nav<C>(key: KeyEvent) -> Option<GraphAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(GraphAction::Select(SelectionMove::Parent)),
            KeyCode::Down | KeyCode::Char('j') => {
                Some(GraphAction::Select(SelectionMove::FirstChild))
            }
            KeyCode::Left | KeyCode::Char('h') => {
                Some(GraphAction::Select(SelectionMove::PrevSibling))
            }
            KeyCode::Right | KeyCode::Char('l') => {
                Some(GraphAction::Select(SelectionMove::NextSibling))
            }
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(key: KeyEvent) -> Option<GraphAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(GraphAction::Select(SelectionMove::Parent)),
            KeyCode::Char('j') => Some(GraphAction::Select(SelectionMove::FirstChild)),
            KeyCode::Char('h') => Some(GraphAction::Select(SelectionMove::PrevSibling)),
            KeyCode::Char('l') => Some(GraphAction::Select(SelectionMove::NextSibling)),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(key: KeyEvent) -> Option<GraphAction<C>> {
        match key.code {
            KeyCode::Up => Some(GraphAction::Select(SelectionMove::Parent)),
            KeyCode::Down => Some(GraphAction::Select(SelectionMove::FirstChild)),
            KeyCode::Left => Some(GraphAction::Select(SelectionMove::PrevSibling)),
            KeyCode::Right => Some(GraphAction::Select(SelectionMove::NextSibling)),
            _ => None,
        }
    }

    const fn resolve_common<C>(key: KeyEvent) -> Option<GraphAction<C>> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(GraphAction::ToggleExpand),
            KeyCode::Char('a' | '+') => Some(GraphAction::AddChild),
            KeyCode::Char('e' | 'r') => Some(GraphAction::Rename),
            KeyCode::Delete | KeyCode::Char('d') => Some(GraphAction::Delete),
            KeyCode::Char('/') => Some(GraphAction::Search),
            KeyCode::Char('n') => Some(GraphAction::NextMatch),
            KeyCode::Char('N') => Some(GraphAction::PrevMatch),
            KeyCode::Char('c') => Some(GraphAction::CenterSelected),
            KeyCode::Char('R') => Some(GraphAction::Reset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_profile_maps_arrows_and_letters() {
        let bindings = GraphKeyBindings::new();

        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Down)),
            Some(GraphAction::Select(SelectionMove::FirstChild))
        );
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Char('h'))),
            Some(GraphAction::Select(SelectionMove::PrevSibling))
        );
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Enter)),
            Some(GraphAction::ToggleExpand)
        );
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Char('N'))),
            Some(GraphAction::PrevMatch)
        );
    }

    #[test]
    fn arrow_profile_ignores_vim_letters() {
        let bindings = GraphKeyBindings::with_profile(KeymapProfile::Arrows);

        assert_eq!(bindings.resolve::<()>(key(KeyCode::Char('j'))), None);
    }

    #[test]
    fn modified_arrows_pan() {
        let bindings = GraphKeyBindings::new();

        assert_eq!(
            bindings.resolve::<()>(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL)),
            Some(GraphAction::Pan(-PAN_STEP, 0))
        );
        assert_eq!(
            bindings.resolve::<()>(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)),
            Some(GraphAction::Pan(0, PAN_STEP * 4))
        );
    }

    #[test]
    fn custom_resolver_takes_precedence() {
        let bindings = GraphKeyBindings::new();

        let action = bindings.resolve_with(key(KeyCode::Char('q')), |event| {
            (event.code == KeyCode::Char('q')).then_some("quit")
        });

        assert_eq!(action, Some(GraphAction::Custom("quit")));
    }
}
