use std::fmt;

/// Identifier of a top-level screen registered with the page router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Main,
    Settings,
    ReaderSettings,
    IgnoreSystems,
    TuiSettings,
    SearchMedia,
    WriteText,
    UpdateMedia,
}

impl PageId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Settings => "settings",
            Self::ReaderSettings => "reader_settings",
            Self::IgnoreSystems => "ignore_systems",
            Self::TuiSettings => "tui_settings",
            Self::SearchMedia => "search_media",
            Self::WriteText => "write_text",
            Self::UpdateMedia => "update_media",
        }
    }

    /// Breadcrumb label shown in the frame title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Settings => "Settings",
            Self::ReaderSettings => "Readers",
            Self::IgnoreSystems => "Ignore Systems",
            Self::TuiSettings => "TUI",
            Self::SearchMedia => "Search Media",
            Self::WriteText => "Write Custom Text",
            Self::UpdateMedia => "Update Media",
        }
    }

    /// Page that escape returns to. `None` means escape quits.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Main => None,
            Self::Settings | Self::SearchMedia | Self::WriteText | Self::UpdateMedia => {
                Some(Self::Main)
            }
            Self::ReaderSettings | Self::TuiSettings => Some(Self::Settings),
            Self::IgnoreSystems => Some(Self::ReaderSettings),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
