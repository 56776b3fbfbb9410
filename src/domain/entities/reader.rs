use chrono::{DateTime, Local};

/// A connected NFC reader as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderInfo {
    pub id: String,
    pub driver: String,
}

impl ReaderInfo {
    pub fn new(id: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            driver: driver.into(),
        }
    }
}

/// Contents of the most recently scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub scanned_at: DateTime<Local>,
    pub uid: String,
    pub text: String,
}

impl TokenInfo {
    pub fn new(uid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            scanned_at: Local::now(),
            uid: uid.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn with_time(mut self, scanned_at: DateTime<Local>) -> Self {
        self.scanned_at = scanned_at;
        self
    }
}
