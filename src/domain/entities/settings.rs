use serde::{Deserialize, Serialize};

/// How a scanned token is treated once it leaves the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Tap,
    Hold,
}

impl ScanMode {
    pub const ALL: [Self; 2] = [Self::Tap, Self::Hold];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tap => "Tap",
            Self::Hold => "Hold",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tap => 0,
            Self::Hold => 1,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Exit delay choice offered by the settings page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitDelayOption {
    pub label: &'static str,
    pub seconds: f32,
}

pub const EXIT_DELAY_OPTIONS: [ExitDelayOption; 9] = [
    ExitDelayOption { label: "Off", seconds: 0.0 },
    ExitDelayOption { label: "1s", seconds: 1.0 },
    ExitDelayOption { label: "2s", seconds: 2.0 },
    ExitDelayOption { label: "3s", seconds: 3.0 },
    ExitDelayOption { label: "5s", seconds: 5.0 },
    ExitDelayOption { label: "10s", seconds: 10.0 },
    ExitDelayOption { label: "15s", seconds: 15.0 },
    ExitDelayOption { label: "20s", seconds: 20.0 },
    ExitDelayOption { label: "30s", seconds: 30.0 },
];

impl ExitDelayOption {
    /// Index of the option closest to `seconds`.
    #[must_use]
    pub fn nearest_index(seconds: f32) -> usize {
        EXIT_DELAY_OPTIONS
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.seconds - seconds)
                    .abs()
                    .total_cmp(&(b.seconds - seconds).abs())
            })
            .map_or(0, |(i, _)| i)
    }
}

/// Service-side settings shown on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub audio_feedback: bool,
    pub debug_logging: bool,
    pub auto_detect_readers: bool,
    pub scan_mode: ScanMode,
    pub exit_delay_secs: f32,
    /// System ids whose tokens are not launched on scan.
    pub ignore_systems: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_feedback: true,
            debug_logging: false,
            auto_detect_readers: true,
            scan_mode: ScanMode::Tap,
            exit_delay_secs: 0.0,
            ignore_systems: Vec::new(),
        }
    }
}

/// Partial settings update; only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_feedback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_logging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detect_readers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_mode: Option<ScanMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_delay_secs: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_systems: Option<Vec<String>>,
}

impl From<&Settings> for SettingsUpdate {
    /// Update touching every field.
    fn from(settings: &Settings) -> Self {
        Self {
            audio_feedback: Some(settings.audio_feedback),
            debug_logging: Some(settings.debug_logging),
            auto_detect_readers: Some(settings.auto_detect_readers),
            scan_mode: Some(settings.scan_mode),
            exit_delay_secs: Some(settings.exit_delay_secs),
            ignore_systems: Some(settings.ignore_systems.clone()),
        }
    }
}

impl SettingsUpdate {
    #[must_use]
    pub fn audio_feedback(mut self, value: bool) -> Self {
        self.audio_feedback = Some(value);
        self
    }

    #[must_use]
    pub fn debug_logging(mut self, value: bool) -> Self {
        self.debug_logging = Some(value);
        self
    }

    #[must_use]
    pub fn auto_detect_readers(mut self, value: bool) -> Self {
        self.auto_detect_readers = Some(value);
        self
    }

    #[must_use]
    pub fn scan_mode(mut self, value: ScanMode) -> Self {
        self.scan_mode = Some(value);
        self
    }

    #[must_use]
    pub fn exit_delay_secs(mut self, value: f32) -> Self {
        self.exit_delay_secs = Some(value);
        self
    }

    #[must_use]
    pub fn ignore_systems(mut self, value: Vec<String>) -> Self {
        self.ignore_systems = Some(value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the present fields onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(value) = self.audio_feedback {
            settings.audio_feedback = value;
        }
        if let Some(value) = self.debug_logging {
            settings.debug_logging = value;
        }
        if let Some(value) = self.auto_detect_readers {
            settings.auto_detect_readers = value;
        }
        if let Some(value) = self.scan_mode {
            settings.scan_mode = value;
        }
        if let Some(value) = self.exit_delay_secs {
            settings.exit_delay_secs = value;
        }
        if let Some(value) = &self.ignore_systems {
            settings.ignore_systems.clone_from(value);
        }
    }

    /// The fields this update touches, taken from `settings`.
    ///
    /// Used to put a rejected update back to the last confirmed values.
    #[must_use]
    pub fn restore_from(&self, settings: &Settings) -> Self {
        Self {
            audio_feedback: self.audio_feedback.map(|_| settings.audio_feedback),
            debug_logging: self.debug_logging.map(|_| settings.debug_logging),
            auto_detect_readers: self.auto_detect_readers.map(|_| settings.auto_detect_readers),
            scan_mode: self.scan_mode.map(|_| settings.scan_mode),
            exit_delay_secs: self.exit_delay_secs.map(|_| settings.exit_delay_secs),
            ignore_systems: self
                .ignore_systems
                .as_ref()
                .map(|_| settings.ignore_systems.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_partial_update_touches_only_present_fields() {
        let mut settings = Settings::default();
        SettingsUpdate::default()
            .scan_mode(ScanMode::Hold)
            .apply_to(&mut settings);

        assert_eq!(settings.scan_mode, ScanMode::Hold);
        assert!(settings.audio_feedback);
        assert_eq!(settings.exit_delay_secs, 0.0);
    }

    #[test]
    fn test_empty_update() {
        assert!(SettingsUpdate::default().is_empty());
        assert!(!SettingsUpdate::default().debug_logging(true).is_empty());
    }

    #[test]
    fn test_restore_from_keeps_only_touched_fields() {
        let confirmed = Settings {
            audio_feedback: false,
            ignore_systems: vec!["NES".to_string()],
            ..Settings::default()
        };
        let update = SettingsUpdate::default()
            .audio_feedback(true)
            .ignore_systems(vec!["NES".to_string(), "SNES".to_string()]);

        assert_eq!(
            update.restore_from(&confirmed),
            SettingsUpdate::default()
                .audio_feedback(false)
                .ignore_systems(vec!["NES".to_string()])
        );
    }

    #[test]
    fn test_full_update_reproduces_settings() {
        let settings = Settings {
            scan_mode: ScanMode::Hold,
            ignore_systems: vec!["Genesis".to_string()],
            ..Settings::default()
        };
        let mut rebuilt = Settings {
            audio_feedback: false,
            ..Settings::default()
        };
        SettingsUpdate::from(&settings).apply_to(&mut rebuilt);
        assert_eq!(rebuilt, settings);
    }

    #[test_case(0.0, 0 ; "off")]
    #[test_case(5.0, 4 ; "exact")]
    #[test_case(4.4, 4 ; "rounds to nearest")]
    #[test_case(120.0, 8 ; "beyond last")]
    fn test_exit_delay_nearest_index(seconds: f32, expected: usize) {
        assert_eq!(ExitDelayOption::nearest_index(seconds), expected);
    }

    #[test]
    fn test_scan_mode_from_index_falls_back_to_tap() {
        assert_eq!(ScanMode::from_index(1), ScanMode::Hold);
        assert_eq!(ScanMode::from_index(7), ScanMode::Tap);
    }
}
