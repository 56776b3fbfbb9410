//! Vertical list of toggle / cycle / action / back items.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::component::{Component, HelpSink, Outcome};
use crate::domain::errors::UiError;
use crate::domain::keybinding::{Action, Direction};
use crate::presentation::commands::Input;
use crate::presentation::theme::{ColorToken, Theme};

const DEFAULT_BACK_LABEL: &str = "Go back";
const DEFAULT_BACK_DESCRIPTION: &str = "Return to previous menu";
const ROWS_PER_ITEM: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Toggle,
    Cycle,
    Action,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemState {
    Toggle(bool),
    Cycle { options: Vec<String>, index: usize },
    Action,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<K> {
    key: Option<K>,
    label: String,
    description: String,
    state: ItemState,
}

impl<K> MenuItem<K> {
    #[must_use]
    pub const fn kind(&self) -> MenuItemKind {
        match self.state {
            ItemState::Toggle(_) => MenuItemKind::Toggle,
            ItemState::Cycle { .. } => MenuItemKind::Cycle,
            ItemState::Action => MenuItemKind::Action,
            ItemState::Back => MenuItemKind::Back,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rendered item text without the list bullet.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.state {
            ItemState::Toggle(value) => {
                format!("{} {}", if *value { "[*]" } else { "[ ]" }, self.label)
            }
            ItemState::Cycle { options, index } => {
                let value = options.get(*index).map_or("", String::as_str);
                format!("{}: < {value} >", self.label)
            }
            ItemState::Action | ItemState::Back => self.label.clone(),
        }
    }
}

/// Reported by a [`SettingsList`] when an item is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent<K> {
    Toggled { key: K, value: bool },
    Cycled { key: K, option: String, index: usize },
    Invoked(K),
    Back,
}

/// Keyboard-navigable list of menu items.
#[derive(Debug, Clone)]
pub struct SettingsList<K> {
    items: Vec<MenuItem<K>>,
    current: usize,
    help: Option<HelpSink>,
    handoff: bool,
}

impl<K> Default for SettingsList<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: 0,
            help: None,
            handoff: false,
        }
    }
}

impl<K: Clone + PartialEq> SettingsList<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: Option<K>, label: &str, description: &str, state: ItemState) {
        self.items.push(MenuItem {
            key,
            label: label.to_string(),
            description: description.to_string(),
            state,
        });
        if self.items.len() == 1 {
            self.publish_help();
        }
    }

    pub fn add_toggle(&mut self, key: K, label: &str, description: &str, value: bool) -> &mut Self {
        self.push(Some(key), label, description, ItemState::Toggle(value));
        self
    }

    /// Adds a cycle item showing `options[index]`.
    ///
    /// # Errors
    /// Returns error if `options` is empty or `index` is out of range.
    pub fn add_cycle(
        &mut self,
        key: K,
        label: &str,
        description: &str,
        options: Vec<String>,
        index: usize,
    ) -> Result<&mut Self, UiError> {
        if options.is_empty() {
            return Err(UiError::empty_cycle(label));
        }
        if index >= options.len() {
            return Err(UiError::cycle_index(label, index, options.len()));
        }
        self.push(Some(key), label, description, ItemState::Cycle { options, index });
        Ok(self)
    }

    pub fn add_action(&mut self, key: K, label: &str, description: &str) -> &mut Self {
        self.push(Some(key), label, description, ItemState::Action);
        self
    }

    /// Adds a back item, defaulting to "Go back" / "Return to previous menu".
    pub fn add_back(&mut self, label: Option<&str>, description: Option<&str>) -> &mut Self {
        self.push(
            None,
            label.unwrap_or(DEFAULT_BACK_LABEL),
            description.unwrap_or(DEFAULT_BACK_DESCRIPTION),
            ItemState::Back,
        );
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem<K>] {
        &self.items
    }

    #[must_use]
    pub const fn current_item(&self) -> usize {
        self.current
    }

    /// Moves the highlight, clamping to the last item.
    pub fn set_current_item(&mut self, index: usize) {
        self.current = index.min(self.items.len().saturating_sub(1));
        self.publish_help();
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut MenuItem<K>> {
        self.items.iter_mut().find(|i| i.key.as_ref() == Some(key))
    }

    fn find(&self, key: &K) -> Option<&MenuItem<K>> {
        self.items.iter().find(|i| i.key.as_ref() == Some(key))
    }

    #[must_use]
    pub fn toggle_value(&self, key: &K) -> Option<bool> {
        match self.find(key)?.state {
            ItemState::Toggle(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn cycle_index(&self, key: &K) -> Option<usize> {
        match self.find(key)?.state {
            ItemState::Cycle { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Overwrites a toggle's value without reporting a change.
    pub fn set_toggle_value(&mut self, key: &K, value: bool) {
        if let Some(MenuItem {
            state: ItemState::Toggle(current),
            ..
        }) = self.find_mut(key)
        {
            *current = value;
        }
    }

    /// Overwrites a cycle's index without reporting a change.
    ///
    /// # Errors
    /// Returns error if `index` is outside the item's options.
    pub fn set_cycle_index(&mut self, key: &K, index: usize) -> Result<(), UiError> {
        if let Some(item) = self.find_mut(key)
            && let ItemState::Cycle {
                options,
                index: current,
            } = &mut item.state
        {
            if index >= options.len() {
                return Err(UiError::cycle_index(&item.label, index, options.len()));
            }
            *current = index;
        }
        Ok(())
    }

    pub fn set_description(&mut self, key: &K, description: impl Into<String>) {
        if let Some(item) = self.find_mut(key) {
            item.description = description.into();
        }
        self.publish_help();
    }

    /// Activates the highlighted item. `step` is `None` for a plain
    /// activation and `Some(±1)` for explicit left/right on a cycle.
    fn activate(&mut self, step: Option<isize>) -> Outcome<MenuEvent<K>> {
        let Some(item) = self.items.get_mut(self.current) else {
            return Outcome::Ignored;
        };

        match (&mut item.state, step) {
            (ItemState::Toggle(value), None) => {
                *value = !*value;
                item.key.clone().map_or(Outcome::Consumed, |key| {
                    Outcome::Event(MenuEvent::Toggled { key, value: *value })
                })
            }
            (ItemState::Cycle { options, index }, step) => {
                let len = options.len();
                *index = if step.unwrap_or(1) < 0 {
                    (*index + len - 1) % len
                } else {
                    (*index + 1) % len
                };
                let option = options[*index].clone();
                let index = *index;
                item.key.clone().map_or(Outcome::Consumed, |key| {
                    Outcome::Event(MenuEvent::Cycled { key, option, index })
                })
            }
            (ItemState::Action, None) => item
                .key
                .clone()
                .map_or(Outcome::Consumed, |key| Outcome::Event(MenuEvent::Invoked(key))),
            (ItemState::Back, None) => Outcome::Event(MenuEvent::Back),
            (_, Some(_)) => Outcome::Ignored,
        }
    }

    fn step(&mut self, direction: Direction) -> Outcome<MenuEvent<K>> {
        let last = self.items.len().saturating_sub(1);
        let next = match direction {
            Direction::Up if self.current == 0 => None,
            Direction::Up => Some(self.current - 1),
            Direction::Down if self.current >= last => None,
            Direction::Down => Some(self.current + 1),
            Direction::Left => return self.activate(Some(-1)),
            Direction::Right => return self.activate(Some(1)),
        };

        match next {
            Some(index) => {
                self.current = index;
                self.publish_help();
                Outcome::Consumed
            }
            None if self.handoff => Outcome::Boundary(direction),
            None => Outcome::Consumed,
        }
    }

    fn line_for(&self, index: usize, theme: &Theme, focused: bool) -> [Line<'static>; 2] {
        let item = &self.items[index];
        let selected = index == self.current;
        let bullet = Span::styled("- ", theme.style(ColorToken::Primary));

        let body = match &item.state {
            ItemState::Toggle(value) => {
                let mark = if *value { "[*] " } else { "[ ] " };
                vec![
                    bullet,
                    Span::styled(mark, theme.style(ColorToken::Primary)),
                    Self::label_span(item.label.clone(), selected, theme, focused),
                ]
            }
            ItemState::Cycle { .. } | ItemState::Action | ItemState::Back => {
                vec![bullet, Self::label_span(item.text(), selected, theme, focused)]
            }
        };

        [
            Line::from(body),
            Line::styled(
                format!("  {}", item.description),
                theme.style(ColorToken::Label),
            ),
        ]
    }

    fn label_span(text: String, selected: bool, theme: &Theme, focused: bool) -> Span<'static> {
        if selected {
            Span::styled(text, theme.highlight(focused))
        } else {
            Span::styled(text, theme.base_style())
        }
    }
}

impl<K: Clone + PartialEq> Component for SettingsList<K> {
    type Event = MenuEvent<K>;

    fn handle_input(&mut self, input: Input) -> Outcome<Self::Event> {
        if self.items.is_empty() {
            return Outcome::Ignored;
        }

        match input.action() {
            Some(Action::Select) => self.activate(None),
            Some(action) => action
                .direction()
                .map_or(Outcome::Ignored, |direction| self.step(direction)),
            None => Outcome::Ignored,
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.height == 0 || self.items.is_empty() {
            return;
        }
        buf.set_style(area, theme.base_style());

        let visible = usize::from((area.height / ROWS_PER_ITEM).max(1));
        let first = self.current.saturating_sub(visible - 1);

        let lines: Vec<Line<'static>> = (first..self.items.len())
            .take(visible)
            .flat_map(|i| self.line_for(i, theme, focused))
            .collect();

        Paragraph::new(lines).render(area, buf);
    }

    fn attach_help(&mut self, sink: HelpSink) {
        self.help = Some(sink);
        self.publish_help();
    }

    fn publish_help(&self) {
        if let (Some(sink), Some(item)) = (&self.help, self.items.get(self.current)) {
            sink.publish(item.description.clone());
        }
    }

    fn validate(&self) -> Result<(), UiError> {
        if self.items.is_empty() {
            return Err(UiError::EmptySettingsList);
        }
        Ok(())
    }

    fn set_boundary_handoff(&mut self, enabled: bool) {
        self.handoff = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Audio,
        Mode,
        Save,
    }

    fn press(action: Action) -> Input {
        Input::Action(action)
    }

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(ToString::to_string).collect()
    }

    fn sample() -> SettingsList<Key> {
        let mut list = SettingsList::new();
        list.add_toggle(Key::Audio, "Audio feedback", "Play a sound on scan", false);
        list.add_cycle(Key::Mode, "Scan mode", "Tap or hold tokens", options(&["Tap", "Hold"]), 0)
            .unwrap();
        list.add_action(Key::Save, "Save", "Save changes");
        list
    }

    #[test]
    fn test_activation_scenario() {
        let mut list = sample();

        assert_eq!(
            list.handle_input(press(Action::Select)),
            Outcome::Event(MenuEvent::Toggled {
                key: Key::Audio,
                value: true
            })
        );

        list.handle_input(press(Action::NavigateDown));
        assert_eq!(
            list.handle_input(press(Action::Select)),
            Outcome::Event(MenuEvent::Cycled {
                key: Key::Mode,
                option: "Hold".to_string(),
                index: 1
            })
        );

        list.handle_input(press(Action::NavigateDown));
        let before: Vec<_> = list.items().to_vec();
        assert_eq!(
            list.handle_input(press(Action::Select)),
            Outcome::Event(MenuEvent::Invoked(Key::Save))
        );
        assert_eq!(list.items(), before.as_slice());
    }

    #[test]
    fn test_toggle_reports_once_per_activation() {
        let mut list = sample();
        let values: Vec<_> = (0..3)
            .filter_map(|_| match list.handle_input(press(Action::Select)) {
                Outcome::Event(MenuEvent::Toggled { value, .. }) => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(values, [true, false, true]);
        assert_eq!(list.toggle_value(&Key::Audio), Some(true));
    }

    #[test_case(1 ; "one option")]
    #[test_case(3 ; "three options")]
    #[test_case(9 ; "nine options")]
    fn test_cycle_returns_to_start_after_n_steps(n: usize) {
        let labels: Vec<String> = (0..n).map(|i| format!("opt{i}")).collect();
        let mut list = SettingsList::new();
        list.add_cycle(Key::Mode, "Mode", "", labels, 0).unwrap();

        for _ in 0..n {
            list.handle_input(press(Action::NavigateRight));
        }
        assert_eq!(list.cycle_index(&Key::Mode), Some(0));
    }

    #[test]
    fn test_cycle_left_is_inverse_of_right() {
        let mut list = SettingsList::new();
        list.add_cycle(Key::Mode, "Mode", "", options(&["a", "b", "c", "d"]), 2)
            .unwrap();

        for _ in 0..5 {
            list.handle_input(press(Action::NavigateRight));
            list.handle_input(press(Action::NavigateLeft));
            assert_eq!(list.cycle_index(&Key::Mode), Some(2));
        }

        list.set_cycle_index(&Key::Mode, 0).unwrap();
        assert_eq!(
            list.handle_input(press(Action::NavigateLeft)),
            Outcome::Event(MenuEvent::Cycled {
                key: Key::Mode,
                option: "d".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn test_left_right_ignored_on_non_cycle_items() {
        let mut list = sample();
        assert_eq!(list.handle_input(press(Action::NavigateRight)), Outcome::Ignored);
        assert_eq!(list.toggle_value(&Key::Audio), Some(false));
    }

    #[test]
    fn test_add_cycle_rejects_invalid_registration() {
        let mut list: SettingsList<Key> = SettingsList::new();
        assert_eq!(
            list.add_cycle(Key::Mode, "Mode", "", Vec::new(), 0).err(),
            Some(UiError::empty_cycle("Mode"))
        );
        assert_eq!(
            list.add_cycle(Key::Mode, "Mode", "", options(&["a"]), 1).err(),
            Some(UiError::cycle_index("Mode", 1, 1))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_up_down_clamp_by_default() {
        let mut list = sample();
        assert_eq!(list.handle_input(press(Action::NavigateUp)), Outcome::Consumed);
        assert_eq!(list.current_item(), 0);

        for _ in 0..5 {
            list.handle_input(press(Action::NavigateDown));
        }
        assert_eq!(list.current_item(), 2);
    }

    #[test]
    fn test_handoff_reports_boundaries() {
        let mut list = sample();
        list.set_boundary_handoff(true);

        assert_eq!(
            list.handle_input(press(Action::NavigateUp)),
            Outcome::Boundary(Direction::Up)
        );
        list.set_current_item(2);
        assert_eq!(
            list.handle_input(press(Action::NavigateDown)),
            Outcome::Boundary(Direction::Down)
        );
        assert_eq!(list.current_item(), 2);
    }

    #[test]
    fn test_back_item_defaults() {
        let mut list: SettingsList<Key> = SettingsList::new();
        list.add_back(None, None);
        list.add_back(Some("Done"), Some("Close settings"));

        assert_eq!(list.items()[0].label(), "Go back");
        assert_eq!(list.items()[0].description(), "Return to previous menu");
        assert_eq!(list.items()[1].label(), "Done");
        assert_eq!(
            list.handle_input(press(Action::Select)),
            Outcome::Event(MenuEvent::Back)
        );
    }

    #[test]
    fn test_highlight_changes_publish_help() {
        let mut list = sample();
        let sink = HelpSink::new();
        list.attach_help(sink.clone());
        assert_eq!(sink.text(), "Play a sound on scan");

        list.handle_input(press(Action::NavigateDown));
        assert_eq!(sink.text(), "Tap or hold tokens");

        list.set_current_item(99);
        assert_eq!(list.current_item(), 2);
        assert_eq!(sink.text(), "Save changes");
    }

    #[test]
    fn test_validate_rejects_empty_list() {
        let list: SettingsList<Key> = SettingsList::new();
        assert_eq!(list.validate(), Err(UiError::EmptySettingsList));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_item_text_formats() {
        let mut list = sample();
        list.handle_input(press(Action::Select));
        let texts: Vec<_> = list.items().iter().map(MenuItem::text).collect();
        assert_eq!(texts, ["[*] Audio feedback", "Scan mode: < Tap >", "Save"]);
    }

    #[test]
    fn test_draw_keeps_current_item_visible() {
        let mut list = SettingsList::new();
        for i in 0..10 {
            list.add_action(i, &format!("Item {i}"), "");
        }
        list.set_current_item(9);

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        list.draw(area, &mut buf, &Theme::default(), true);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        assert!(rows.iter().any(|r| r.contains("Item 9")), "{rows:?}");
        assert!(!rows.iter().any(|r| r.contains("Item 0")));
    }
}
