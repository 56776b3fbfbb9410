//! Reusable widgets composed by pages.

mod button_bar;
mod button_grid;
mod check_list;
mod component;
mod footer_bar;
mod keyboard_layout;
mod modal;
mod on_screen_keyboard;
mod page_frame;
mod scanning_area;
mod settings_list;
mod status_bar;

pub use button_bar::{Button, ButtonBar, Hook};
pub use button_grid::{ButtonGrid, GridItem};
pub use check_list::{CheckEvent, CheckItem, CheckList};
pub use component::{Component, HelpSink, Outcome};
pub use footer_bar::{FooterBar, FooterBarStyle};
pub use keyboard_layout::{KeyCap, KeyboardLayout};
pub use modal::{MessageModal, ModalKind, ModalResponse};
pub use on_screen_keyboard::{KEYBOARD_WIDTH, KeyboardEvent, OnScreenKeyboard};
pub use page_frame::{PageFrame, Region};
pub use scanning_area::{FRAME_INTERVAL, ScanState, ScanningArea};
pub use settings_list::{MenuEvent, MenuItem, MenuItemKind, SettingsList};
pub use status_bar::{StatusBar, StatusLevel};
