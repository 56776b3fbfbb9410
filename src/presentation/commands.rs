use crate::domain::keybinding::{Action, Keybind};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press after rule resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    /// Printable character not claimed by any rule.
    Char(char),
    /// Anything else, including key releases.
    Ignored,
}

impl Input {
    #[must_use]
    pub const fn action(self) -> Option<Action> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }
}

/// Ordered key rules. The first rule matching a key wins.
pub struct KeyRules {
    rules: Vec<(KeyEvent, Action)>,
    hints: Vec<Keybind>,
}

impl Default for KeyRules {
    fn default() -> Self {
        let mut rules = Vec::new();
        let mut register = |code: KeyCode, modifiers: KeyModifiers, action: Action| {
            rules.push((KeyEvent::new(code, modifiers), action));
        };

        register(KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit);
        register(KeyCode::Esc, KeyModifiers::NONE, Action::Cancel);
        register(KeyCode::Enter, KeyModifiers::NONE, Action::Select);
        register(KeyCode::Up, KeyModifiers::NONE, Action::NavigateUp);
        register(KeyCode::Down, KeyModifiers::NONE, Action::NavigateDown);
        register(KeyCode::Left, KeyModifiers::NONE, Action::NavigateLeft);
        register(KeyCode::Right, KeyModifiers::NONE, Action::NavigateRight);
        register(KeyCode::Tab, KeyModifiers::NONE, Action::FocusNext);
        register(KeyCode::BackTab, KeyModifiers::SHIFT, Action::FocusPrevious);
        register(KeyCode::BackTab, KeyModifiers::NONE, Action::FocusPrevious);
        register(KeyCode::Backspace, KeyModifiers::NONE, Action::Backspace);

        let hints = vec![
            Keybind::new(
                KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
                Action::NavigateUp,
                "Navigate",
            )
            .display_as("←↑↓→"),
            Keybind::new(
                KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
                Action::Select,
                "Select",
            ),
            Keybind::new(
                KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
                Action::Cancel,
                "Back",
            )
            .display_as("ESC"),
            Keybind::new(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Action::Quit,
                "Quit",
            )
            .hidden(),
        ];

        Self { rules, hints }
    }
}

impl KeyRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find_action(&self, key: KeyEvent) -> Option<Action> {
        self.rules
            .iter()
            .find(|(k, _)| k.code == key.code && k.modifiers == key.modifiers)
            .map(|(_, a)| *a)
    }

    /// Resolves a terminal key event. Releases are dropped, and so are
    /// auto-repeats of `Select` so a held Enter activates once.
    #[must_use]
    pub fn resolve(&self, key: KeyEvent) -> Input {
        if key.kind == KeyEventKind::Release {
            return Input::Ignored;
        }

        if let Some(action) = self.find_action(key) {
            if key.kind == KeyEventKind::Repeat && action == Action::Select {
                return Input::Ignored;
            }
            return Input::Action(action);
        }

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Input::Char(c)
            }
            _ => Input::Ignored,
        }
    }

    /// Hints rendered in the frame footer.
    pub fn hints(&self) -> impl Iterator<Item = &Keybind> {
        self.hints.iter().filter(|k| k.visible_in_bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test_case(KeyCode::Up, KeyModifiers::NONE, Input::Action(Action::NavigateUp) ; "arrow")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, Input::Action(Action::Select) ; "enter")]
    #[test_case(KeyCode::Esc, KeyModifiers::NONE, Input::Action(Action::Cancel) ; "escape")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL, Input::Action(Action::Quit) ; "ctrl c")]
    #[test_case(KeyCode::BackTab, KeyModifiers::SHIFT, Input::Action(Action::FocusPrevious) ; "backtab")]
    #[test_case(KeyCode::Char('k'), KeyModifiers::NONE, Input::Char('k') ; "vim keys are text")]
    #[test_case(KeyCode::Char('A'), KeyModifiers::SHIFT, Input::Char('A') ; "shifted char")]
    #[test_case(KeyCode::Char('x'), KeyModifiers::CONTROL, Input::Ignored ; "unbound ctrl")]
    #[test_case(KeyCode::F(5), KeyModifiers::NONE, Input::Ignored ; "function key")]
    fn test_resolve(code: KeyCode, modifiers: KeyModifiers, expected: Input) {
        assert_eq!(KeyRules::new().resolve(press(code, modifiers)), expected);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(KeyRules::new().resolve(key), Input::Ignored);
    }

    #[test]
    fn test_repeat_select_is_ignored_but_repeat_navigation_is_not() {
        let rules = KeyRules::new();

        let mut enter = press(KeyCode::Enter, KeyModifiers::NONE);
        enter.kind = KeyEventKind::Repeat;
        assert_eq!(rules.resolve(enter), Input::Ignored);

        let mut down = press(KeyCode::Down, KeyModifiers::NONE);
        down.kind = KeyEventKind::Repeat;
        assert_eq!(rules.resolve(down), Input::Action(Action::NavigateDown));
    }

    #[test]
    fn test_visible_hints() {
        let labels: Vec<_> = KeyRules::new().hints().map(|k| k.label.clone()).collect();
        assert_eq!(labels, ["Navigate", "Select", "Back"]);
    }
}
