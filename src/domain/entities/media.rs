use std::path::Path;

use serde::{Deserialize, Serialize};

/// Label used for the "no system filter" choice.
pub const ALL_SYSTEMS_LABEL: &str = "All";

/// A game/media system known to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    pub id: String,
    pub name: String,
}

impl System {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// What gets written to a token when a search result is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteFormat {
    #[default]
    ZapScript,
    Path,
}

impl WriteFormat {
    pub const ALL: [Self; 2] = [Self::ZapScript, Self::Path];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ZapScript => "ZapScript",
            Self::Path => "File path",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::ZapScript => 0,
            Self::Path => 1,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Search request; an empty `system` means all systems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResult {
    pub name: String,
    pub path: String,
    pub zapscript: String,
    pub system: System,
}

impl MediaResult {
    /// Name shown in the results list for the given write format.
    ///
    /// Path mode shows the file stem, except for virtual paths such as
    /// `steam://123/Name` which keep the indexed name.
    #[must_use]
    pub fn display_name(&self, format: WriteFormat) -> String {
        match format {
            WriteFormat::ZapScript => self.name.clone(),
            WriteFormat::Path if self.path.contains("://") => self.name.clone(),
            WriteFormat::Path => Path::new(&self.path)
                .file_stem()
                .map_or_else(|| self.name.clone(), |s| s.to_string_lossy().into_owned()),
        }
    }

    #[must_use]
    pub fn write_value(&self, format: WriteFormat) -> &str {
        match format {
            WriteFormat::ZapScript => &self.zapscript,
            WriteFormat::Path => &self.path,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub results: Vec<MediaResult>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn result(path: &str) -> MediaResult {
        MediaResult {
            name: "Super Mario Bros.".to_string(),
            path: path.to_string(),
            zapscript: "@nes/Super Mario Bros.".to_string(),
            system: System::new("NES", "Nintendo Entertainment System"),
        }
    }

    #[test_case("/media/nes/smb (USA).nes", WriteFormat::Path, "smb (USA)" ; "path uses file stem")]
    #[test_case("steam://123/SMB", WriteFormat::Path, "Super Mario Bros." ; "virtual path keeps name")]
    #[test_case("/media/nes/smb.nes", WriteFormat::ZapScript, "Super Mario Bros." ; "zapscript uses name")]
    fn test_display_name(path: &str, format: WriteFormat, expected: &str) {
        assert_eq!(result(path).display_name(format), expected);
    }

    #[test]
    fn test_write_value_follows_format() {
        let media = result("/media/nes/smb.nes");
        assert_eq!(media.write_value(WriteFormat::Path), "/media/nes/smb.nes");
        assert_eq!(
            media.write_value(WriteFormat::ZapScript),
            "@nes/Super Mario Bros."
        );
    }
}
